//! Input plumbing for the game loop. Raw terminal keys are translated
//! into domain events right at the source, so the loop, the screens and
//! the headless tests all speak the same vocabulary and no crossterm
//! key codes leak past this module.

use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyCode, KeyEvent, KeyModifiers};

/// What the game loop consumes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    /// A lowercase letter aimed at the reboot code entry.
    Keystroke(char),
    Backspace,
    /// Enter: dismiss the post-game message.
    Acknowledge,
    /// Esc or Ctrl-C.
    Quit,
    Resize,
    /// A quiet interval elapsed; timers and the heat gauge advance.
    Tick,
}

/// Maps a terminal key to its domain event. Keys with no meaning in the
/// game (arrows, digits, function keys) are dropped here.
pub fn translate_key(key: &KeyEvent) -> Option<GameEvent> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(GameEvent::Quit),
            _ => None,
        };
    }
    match key.code {
        KeyCode::Esc => Some(GameEvent::Quit),
        KeyCode::Backspace => Some(GameEvent::Backspace),
        KeyCode::Enter => Some(GameEvent::Acknowledge),
        KeyCode::Char(c) if c.is_ascii_alphabetic() => {
            Some(GameEvent::Keystroke(c.to_ascii_lowercase()))
        }
        _ => None,
    }
}

/// Where the loop gets its events from; swapped for a plain channel in
/// headless tests.
pub trait GameEventSource: Send + 'static {
    /// Waits up to `timeout` for the next event. None means nothing the
    /// game cares about arrived in time.
    fn poll(&self, timeout: Duration) -> Option<GameEvent>;
}

/// Reads crossterm events on a background thread and forwards only the
/// ones that translate.
pub struct CrosstermEventSource {
    rx: Receiver<GameEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || loop {
            let translated = match event::read() {
                Ok(CtEvent::Key(key)) => translate_key(&key),
                Ok(CtEvent::Resize(_, _)) => Some(GameEvent::Resize),
                Ok(_) => None,
                Err(_) => break,
            };
            if let Some(ev) = translated {
                if tx.send(ev).is_err() {
                    break;
                }
            }
        });
        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl GameEventSource for CrosstermEventSource {
    fn poll(&self, timeout: Duration) -> Option<GameEvent> {
        self.rx.recv_timeout(timeout).ok()
    }
}

/// Channel-fed source for driving the loop without a terminal.
pub struct TestEventSource {
    rx: Receiver<GameEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<GameEvent>) -> Self {
        Self { rx }
    }
}

impl GameEventSource for TestEventSource {
    fn poll(&self, timeout: Duration) -> Option<GameEvent> {
        self.rx.recv_timeout(timeout).ok()
    }
}

/// Paces the loop: every quiet tick interval becomes a `Tick`, so the
/// overheat deadline keeps closing in even when the player freezes.
pub struct Runner<E: GameEventSource> {
    source: E,
    tick_interval: Duration,
}

impl<E: GameEventSource> Runner<E> {
    pub fn new(source: E, tick_interval: Duration) -> Self {
        Self {
            source,
            tick_interval,
        }
    }

    pub fn step(&self) -> GameEvent {
        self.source
            .poll(self.tick_interval)
            .unwrap_or(GameEvent::Tick)
    }
}
