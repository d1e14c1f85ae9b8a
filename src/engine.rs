//! The gameplay state machine: countdown, waves of reboot codes, the
//! overheat deadline, and the victory/failure hand-off.
//!
//! Everything here is synchronous. Keystrokes, backspace, acknowledge
//! and clock ticks arrive one at a time; timers are deadlines checked
//! against the caller-supplied monotonic `Instant` on each tick rather
//! than background threads, so tests can drive time explicitly.

use std::collections::VecDeque;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::feed::{MessageKind, TerminalFeed};
use crate::score::{score_delta, ScoreTally};
use crate::stages::{Stage, Tunables};
use crate::timer::{heat_ratio, OneShot};
use crate::wave::{
    activate_words_as_needed, find_active_match, generate_wave, wave_cleared, Wave, WordState,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Countdown,
    Playing,
    Victory,
    Failure,
    Done,
}

/// Completion signal handed back to the enclosing screen once the
/// post-game message is acknowledged or times out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOutcome {
    pub victory: bool,
    pub score: i64,
}

/// Mutable per-game state. Owned exclusively by the machine; components
/// see it only for the duration of a single transition.
#[derive(Debug)]
struct GameSession {
    remaining_waves: VecDeque<Vec<String>>,
    total_stages: usize,
    current_wave: Wave,
    focused: Option<String>,
    text_entry: String,
    tally: ScoreTally,
    wave_start: Option<Instant>,
    word_start: Option<Instant>,
}

#[derive(Debug)]
pub struct GameplayMachine {
    phase: Phase,
    session: GameSession,
    feed: TerminalFeed,
    tunables: Tunables,
    rng: StdRng,
    countdown_timer: OneShot,
    overheat_timer: OneShot,
    post_game_timer: OneShot,
    outcome: Option<GameOutcome>,
}

impl GameplayMachine {
    pub fn new(stages: &[Stage], tunables: Tunables, now: Instant) -> Self {
        Self::with_rng(stages, tunables, now, StdRng::from_entropy())
    }

    /// Deterministic constructor for tests and replays.
    pub fn with_rng(stages: &[Stage], tunables: Tunables, now: Instant, mut rng: StdRng) -> Self {
        let remaining_waves: VecDeque<Vec<String>> = stages
            .iter()
            .map(|stage| generate_wave(stage, &mut rng))
            .collect();
        let total_stages = remaining_waves.len();

        let mut feed = TerminalFeed::default();
        feed.push_boot_banner();

        let mut countdown_timer = OneShot::new();
        countdown_timer.arm(now, tunables.countdown);

        Self {
            phase: Phase::Countdown,
            session: GameSession {
                remaining_waves,
                total_stages,
                current_wave: Wave::new(),
                focused: None,
                text_entry: String::new(),
                tally: ScoreTally::new(),
                wave_start: None,
                word_start: None,
            },
            feed,
            tunables,
            rng,
            countdown_timer,
            overheat_timer: OneShot::new(),
            post_game_timer: OneShot::new(),
            outcome: None,
        }
    }

    // --- event interface -------------------------------------------------

    /// Advances every pending deadline. A fired timer is honored only in
    /// the phase that armed it; anything else is a stale no-op.
    pub fn on_tick(&mut self, now: Instant) {
        if self.countdown_timer.fire_if_due(now) && self.phase == Phase::Countdown {
            self.begin_playing(now);
        }

        if self.overheat_timer.fire_if_due(now) && self.phase == Phase::Playing {
            self.overheat(now);
        }

        if self.post_game_timer.fire_if_due(now)
            && matches!(self.phase, Phase::Victory | Phase::Failure)
        {
            self.finish();
        }
    }

    pub fn on_keystroke(&mut self, c: char, now: Instant) {
        if self.phase != Phase::Playing {
            return;
        }

        match self.session.focused.clone() {
            None => {
                // First keystroke routes by first character; a miss here
                // is silent and leaves the buffer empty.
                let matched = find_active_match(&self.session.current_wave, c)
                    .map(|word| word.to_string());
                if let Some(word) = matched {
                    self.session.focused = Some(word);
                    self.session.word_start = Some(now);
                    self.session.text_entry.push(c);
                    self.complete_if_done(now);
                }
            }
            Some(word) => {
                let position = self.session.text_entry.chars().count();
                let expected = word.chars().nth(position);

                if expected == Some(c) {
                    self.session.text_entry.push(c);
                    self.complete_if_done(now);
                } else {
                    let attempted = format!("{}{}", self.session.text_entry, c);
                    self.feed.push_command(&attempted);
                    self.feed.push(
                        MessageKind::Error,
                        format!("Unknown reboot code: `{}`", attempted),
                    );
                    self.score_attempt(now, false);
                    self.enter_idle(now);
                }
            }
        }
    }

    pub fn on_backspace(&mut self, now: Instant) {
        if self.phase != Phase::Playing || self.session.focused.is_none() {
            return;
        }

        if self.session.text_entry.chars().count() <= 1 {
            // Deleting the last buffered char drops the lock entirely.
            self.enter_idle(now);
        } else {
            self.session.text_entry.pop();
        }
    }

    /// OK-button / enter on the post-game message.
    pub fn on_acknowledge(&mut self) {
        if matches!(self.phase, Phase::Victory | Phase::Failure) {
            self.finish();
        }
    }

    // --- transitions ------------------------------------------------------

    fn begin_playing(&mut self, now: Instant) {
        let next = self.session.remaining_waves.pop_front().unwrap_or_default();
        self.session.current_wave = next
            .into_iter()
            .map(|word| (word, WordState::Inactive))
            .collect();
        self.session.wave_start = Some(now);

        self.overheat_timer.arm(now, self.tunables.max_game_duration);
        self.phase = Phase::Playing;
        self.enter_idle(now);
    }

    /// Idle settle point: buffer reset, scheduler top-up, wave-done check.
    fn enter_idle(&mut self, now: Instant) {
        self.session.text_entry.clear();
        self.session.focused = None;
        self.session.word_start = None;

        activate_words_as_needed(
            &mut self.session.current_wave,
            self.tunables.max_active_words,
            &mut self.rng,
        );

        if wave_cleared(&self.session.current_wave) {
            self.wave_done(now);
        }
    }

    fn wave_done(&mut self, now: Instant) {
        self.overheat_timer.cancel();

        if self.session.remaining_waves.is_empty() {
            self.victory(now);
        } else {
            // Seamless wave-to-wave transition: no repeated countdown.
            self.begin_playing(now);
        }
    }

    fn complete_if_done(&mut self, now: Instant) {
        let Some(word) = self.session.focused.clone() else {
            return;
        };
        if self.session.text_entry != word {
            return;
        }

        self.feed.push_command(&word);
        self.feed
            .push(MessageKind::Success, format!("Server `{}` saved!", word));
        self.score_attempt(now, true);
        self.session.current_wave.insert(word, WordState::Cleared);
        self.enter_idle(now);
    }

    fn score_attempt(&mut self, now: Instant, is_success: bool) {
        let elapsed_ms = self
            .session
            .word_start
            .map(|start| now.saturating_duration_since(start).as_millis() as u64)
            .unwrap_or(0);
        let delta = score_delta(
            self.level(),
            elapsed_ms,
            self.tunables.max_game_duration.as_millis() as u64,
            is_success,
        );
        self.session.tally.record(delta, is_success);
    }

    fn victory(&mut self, now: Instant) {
        self.phase = Phase::Victory;
        self.feed
            .push(MessageKind::Success, "All servers saved. You are a hero.");
        self.post_game_timer
            .arm(now, self.tunables.post_game_message_duration);
    }

    fn overheat(&mut self, now: Instant) {
        self.overheat_timer.cancel();
        self.phase = Phase::Failure;
        self.feed
            .push(MessageKind::Error, "CRITICAL: The servers have overheated.");
        self.post_game_timer
            .arm(now, self.tunables.post_game_message_duration);
    }

    fn finish(&mut self) {
        self.post_game_timer.cancel();
        let victory = self.phase == Phase::Victory;
        self.phase = Phase::Done;
        self.outcome = Some(GameOutcome {
            victory,
            score: self.session.tally.total(),
        });
    }

    // --- queries ----------------------------------------------------------

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_typing(&self) -> bool {
        self.session.focused.is_some()
    }

    pub fn focused(&self) -> Option<&str> {
        self.session.focused.as_deref()
    }

    pub fn text_entry(&self) -> &str {
        &self.session.text_entry
    }

    pub fn score(&self) -> i64 {
        self.session.tally.total()
    }

    pub fn wave(&self) -> &Wave {
        &self.session.current_wave
    }

    pub fn feed(&self) -> &TerminalFeed {
        &self.feed
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    /// 1-indexed difficulty of the stage in play.
    pub fn level(&self) -> usize {
        self.session.total_stages - self.session.remaining_waves.len()
    }

    pub fn total_stages(&self) -> usize {
        self.session.total_stages
    }

    pub fn heat_ratio(&self, now: Instant) -> f64 {
        match self.session.wave_start {
            Some(start) if self.phase == Phase::Playing => {
                heat_ratio(start, now, self.tunables.max_game_duration)
            }
            _ => 0.0,
        }
    }

    pub fn countdown_remaining(&self, now: Instant) -> Option<std::time::Duration> {
        if self.phase == Phase::Countdown {
            self.countdown_timer.remaining(now)
        } else {
            None
        }
    }

    pub fn tunables(&self) -> &Tunables {
        &self.tunables
    }
}
