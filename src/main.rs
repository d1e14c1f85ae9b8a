mod ui;

use std::error::Error;
use std::io::{self, stdin};
use std::time::{Duration, Instant};

use clap::{error::ErrorKind, CommandFactory, Parser, ValueEnum};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use overheat::config::{ConfigStore, FileConfigStore};
use overheat::engine::{GameOutcome, GameplayMachine};
use overheat::runtime::{CrosstermEventSource, GameEvent, Runner};
use overheat::scoreboard::{ScoreDb, ScoreRow};
use overheat::stages::{default_stages, short_stages, Stage, Tunables};

const TICK_RATE_MS: u64 = 50;
const LEADERBOARD_SIZE: usize = 10;

/// save the servers: type reboot codes before the racks overheat
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal arcade game: waves of servers overheat and each one wants its reboot code typed before the heat budget runs out. Scores land on a local leaderboard."
)]
pub struct Cli {
    /// player name for the leaderboard
    #[clap(short, long)]
    name: Option<String>,

    /// seconds allowed per wave before meltdown
    #[clap(short = 'd', long)]
    duration_secs: Option<u64>,

    /// how many codes are typeable at once
    #[clap(long)]
    max_active: Option<usize>,

    /// which stage campaign to play (defaults to the config file, then standard)
    #[clap(short = 's', long, value_enum)]
    stage_set: Option<StageSet>,

    /// print the local leaderboard and exit
    #[clap(long)]
    top: bool,
}

#[derive(Debug, Copy, Clone, ValueEnum, strum_macros::Display)]
pub enum StageSet {
    Standard,
    Short,
}

impl StageSet {
    fn stages(&self) -> Vec<Stage> {
        match self {
            StageSet::Standard => default_stages(),
            StageSet::Short => short_stages(),
        }
    }

    fn from_name(name: &str) -> Self {
        match name {
            "short" => StageSet::Short,
            _ => StageSet::Standard,
        }
    }
}

#[derive(Debug)]
pub enum Screen {
    Game,
    GameOver {
        outcome: GameOutcome,
        position: Option<u32>,
        top: Vec<ScoreRow>,
    },
}

pub struct App {
    pub engine: GameplayMachine,
    pub screen: Screen,
    pub player_name: String,
    pub tunables: Tunables,
    pub stages: Vec<Stage>,
    pub score_db: Option<ScoreDb>,
}

impl App {
    pub fn new(cli: &Cli) -> Self {
        let config = FileConfigStore::new().load();
        let mut tunables = config.tunables();
        if let Some(secs) = cli.duration_secs {
            tunables.max_game_duration = Duration::from_secs(secs);
        }
        if let Some(max_active) = cli.max_active {
            tunables.max_active_words = max_active.max(1);
        }

        let player_name = cli
            .name
            .clone()
            .or(config.player_name)
            .unwrap_or_else(|| "anonymous".to_string());

        let stages = cli
            .stage_set
            .unwrap_or_else(|| StageSet::from_name(&config.stage_set))
            .stages();
        let engine = GameplayMachine::new(&stages, tunables, Instant::now());

        Self {
            engine,
            screen: Screen::Game,
            player_name,
            tunables,
            stages,
            score_db: ScoreDb::new().ok(),
        }
    }

    pub fn restart(&mut self) {
        self.engine = GameplayMachine::new(&self.stages, self.tunables, Instant::now());
        self.screen = Screen::Game;
    }

    /// Routes one domain event to the active screen. Returns true when
    /// the player asked to leave.
    pub fn apply(&mut self, event: GameEvent) -> bool {
        let now = Instant::now();
        match self.screen {
            Screen::Game => match event {
                GameEvent::Keystroke(c) => self.engine.on_keystroke(c, now),
                GameEvent::Backspace => self.engine.on_backspace(now),
                GameEvent::Acknowledge => self.engine.on_acknowledge(),
                _ => {}
            },
            Screen::GameOver { .. } => match event {
                GameEvent::Keystroke('r') => self.restart(),
                GameEvent::Keystroke('q') => return true,
                _ => {}
            },
        }
        false
    }

    /// Promotes a finished game to the game-over screen, submitting the
    /// score along the way. A broken score DB only costs the ranking.
    fn settle_if_done(&mut self) {
        if !matches!(self.screen, Screen::Game) {
            return;
        }
        let Some(outcome) = self.engine.outcome() else {
            return;
        };

        let position = self
            .score_db
            .as_ref()
            .and_then(|db| db.submit_score(&self.player_name, outcome.score).ok());
        let top = self
            .score_db
            .as_ref()
            .and_then(|db| db.top_scores(LEADERBOARD_SIZE).ok())
            .unwrap_or_default();

        self.screen = Screen::GameOver {
            outcome,
            position,
            top,
        };
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if cli.top {
        return print_leaderboard();
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(&cli);
    let result = run(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn print_leaderboard() -> Result<(), Box<dyn Error>> {
    let db = ScoreDb::new()?;
    let top = db.top_scores(LEADERBOARD_SIZE)?;
    if top.is_empty() {
        println!("no scores recorded yet");
        return Ok(());
    }
    for (i, row) in top.iter().enumerate() {
        println!("{:>2}. {:<20} {:>8}", i + 1, row.name, row.score);
    }
    println!();
    println!("{} games on record", db.total_games()?);
    Ok(())
}

fn run<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let events = CrosstermEventSource::new();
    let runner = Runner::new(events, Duration::from_millis(TICK_RATE_MS));

    loop {
        let now = Instant::now();
        terminal.draw(|f| ui::draw(app, f, now))?;

        match runner.step() {
            GameEvent::Tick => app.engine.on_tick(Instant::now()),
            GameEvent::Quit => break,
            GameEvent::Resize => {}
            ev => {
                if app.apply(ev) {
                    break;
                }
            }
        }
        app.settle_if_done();
    }

    Ok(())
}
