use clap::{error::ErrorKind, CommandFactory, Parser, ValueEnum};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    time::Duration,
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use leapling::{
    arithmetic::{ArithmeticPhase, ArithmeticSession, UnitSource},
    config::{Config, ConfigStore, FileConfigStore},
    difficulty::{MAX_LEVEL, MIN_LEVEL},
    recorder::{
        JsonFileRecorder, SessionRecorder, SessionSummary, ARITHMETIC_HISTORY_FILE,
        TYPING_HISTORY_FILE,
    },
    runtime::{AppEvent, CrosstermEventSource, EventSource, Runner},
    typing::{TypingPhase, TypingSession},
    ui::history::render_history,
    words::WordBank,
    TICK_RATE_MS,
};

/// kid friendly typing and addition games in the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Two timed mini games for early readers: Letter Leap serves one word at a time and adapts its level to how you type, and Addition Adventure builds small sums one unit at a time. Finished rounds land in a local history."
)]
pub struct Cli {
    /// game to play
    #[clap(value_enum, default_value_t = Game::LetterLeap)]
    game: Game,

    /// number of seconds per round
    #[clap(short = 's', long)]
    seconds: Option<u64>,

    /// starting word level for letter leap (1-10)
    #[clap(short = 'l', long)]
    level: Option<u8>,

    /// keep the word level fixed instead of adjusting it mid round
    #[clap(long)]
    no_adaptive: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, ValueEnum, strum_macros::Display)]
pub enum Game {
    LetterLeap,
    AdditionAdventure,
}

impl Game {
    fn title(&self) -> &'static str {
        match self {
            Game::LetterLeap => "Letter Leap",
            Game::AdditionAdventure => "Addition Adventure",
        }
    }

    fn history_file(&self) -> &'static str {
        match self {
            Game::LetterLeap => TYPING_HISTORY_FILE,
            Game::AdditionAdventure => ARITHMETIC_HISTORY_FILE,
        }
    }
}

impl Cli {
    /// Flags win over whatever the config file holds.
    fn merged_config(&self, stored: Config) -> Config {
        Config {
            round_secs: self.seconds.unwrap_or(stored.round_secs),
            starting_level: self
                .level
                .unwrap_or(stored.starting_level)
                .clamp(MIN_LEVEL, MAX_LEVEL),
            adaptive: if self.no_adaptive {
                false
            } else {
                stored.adaptive
            },
        }
    }
}

enum ActiveGame {
    Typing(TypingSession),
    Arithmetic(ArithmeticSession),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Screen {
    Game,
    History,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum KeyOutcome {
    Continue,
    Quit,
}

struct App {
    game: Game,
    active: ActiveGame,
    screen: Screen,
    history: Vec<SessionSummary>,
    recorder: JsonFileRecorder,
}

impl App {
    fn new(game: Game, config: &Config, recorder: JsonFileRecorder) -> Self {
        let history = recorder.load_all().unwrap_or_else(|err| {
            tracing::warn!(%err, "history unavailable");
            Vec::new()
        });

        let active = match game {
            Game::LetterLeap => ActiveGame::Typing(TypingSession::new(
                WordBank::embedded(),
                config.round_secs,
                config.starting_level,
                config.adaptive,
                Box::new(recorder.clone()),
            )),
            Game::AdditionAdventure => ActiveGame::Arithmetic(ArithmeticSession::new(
                config.round_secs,
                Box::new(recorder.clone()),
            )),
        };

        Self {
            game,
            active,
            screen: Screen::Game,
            history,
            recorder,
        }
    }

    fn is_running(&self) -> bool {
        match &self.active {
            ActiveGame::Typing(session) => session.is_running(),
            ActiveGame::Arithmetic(session) => session.is_running(),
        }
    }

    fn on_tick(&mut self) {
        match &mut self.active {
            ActiveGame::Typing(session) => session.on_tick(),
            ActiveGame::Arithmetic(session) => session.on_tick(),
        }
    }

    fn stop(&mut self) {
        match &mut self.active {
            ActiveGame::Typing(session) => session.stop(),
            ActiveGame::Arithmetic(session) => session.stop(),
        }
    }

    fn refresh_history(&mut self) {
        match self.recorder.load_all() {
            Ok(history) => self.history = history,
            Err(err) => tracing::warn!(%err, "failed to reload history"),
        }
    }

    fn toggle_history(&mut self) {
        self.screen = match self.screen {
            Screen::Game => Screen::History,
            Screen::History => Screen::Game,
        };
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();

    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let config_store = FileConfigStore::new();
    let config = cli.merged_config(config_store.load());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(
        cli.game,
        &config,
        JsonFileRecorder::new(cli.game.history_file()),
    );
    let runner = Runner::new(
        CrosstermEventSource::new(),
        Duration::from_millis(TICK_RATE_MS),
    );
    let result = run(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    if let Err(err) = config_store.save(&config) {
        tracing::warn!(%err, "failed to save config");
    }

    result
}

fn init_tracing() {
    let filter =
        EnvFilter::new(std::env::var("RUST_LOG").unwrap_or_else(|_| "leapling=info".into()));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .init();
}

fn run<B: Backend, E: EventSource>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E>,
) -> Result<(), Box<dyn Error>> {
    terminal.draw(|f| ui(app, f))?;

    loop {
        match runner.step() {
            AppEvent::Tick => {
                let was_running = app.is_running();
                app.on_tick();
                if was_running && !app.is_running() {
                    app.refresh_history();
                }
                if was_running {
                    terminal.draw(|f| ui(app, f))?;
                }
            }
            AppEvent::Resize => {
                terminal.draw(|f| ui(app, f))?;
            }
            AppEvent::Key(key) => {
                if handle_key(app, key) == KeyOutcome::Quit {
                    break;
                }
                terminal.draw(|f| ui(app, f))?;
            }
        }
    }

    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) -> KeyOutcome {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return KeyOutcome::Quit;
    }

    match key.code {
        KeyCode::Esc => {
            if app.screen == Screen::History {
                app.screen = Screen::Game;
            } else if app.is_running() {
                app.stop();
                app.refresh_history();
            } else {
                return KeyOutcome::Quit;
            }
        }
        KeyCode::Enter => {
            if app.screen == Screen::Game {
                match &mut app.active {
                    ActiveGame::Typing(session) => {
                        if !session.is_running() {
                            session.start();
                        }
                    }
                    ActiveGame::Arithmetic(session) => {
                        if session.is_running() {
                            session.confirm();
                        } else {
                            session.start();
                        }
                    }
                }
            }
        }
        KeyCode::Char(c) => match &mut app.active {
            ActiveGame::Typing(session) if session.is_running() => {
                session.press_key(c);
            }
            ActiveGame::Arithmetic(session) if session.is_running() => match c {
                'a' => session.add_unit(UnitSource::PileA),
                'b' => session.add_unit(UnitSource::PileB),
                ' ' => session.add_unit(UnitSource::Tap),
                _ => {}
            },
            _ => {
                if c == 'h' {
                    app.toggle_history();
                }
            }
        },
        _ => {}
    }

    KeyOutcome::Continue
}

fn ui(app: &mut App, f: &mut Frame) {
    match app.screen {
        Screen::History => render_history(f, f.area(), app.game.title(), &app.history),
        Screen::Game => match &app.active {
            ActiveGame::Typing(session) => {
                if matches!(session.phase, TypingPhase::RoundOver) && !app.history.is_empty() {
                    let chunks = Layout::default()
                        .direction(Direction::Vertical)
                        .constraints([Constraint::Length(9), Constraint::Min(0)].as_ref())
                        .split(f.area());
                    f.render_widget(session, chunks[0]);
                    render_history(f, chunks[1], app.game.title(), &app.history);
                } else {
                    f.render_widget(session, f.area());
                }
            }
            ActiveGame::Arithmetic(session) => {
                if matches!(session.phase, ArithmeticPhase::RoundOver) && !app.history.is_empty() {
                    let chunks = Layout::default()
                        .direction(Direction::Vertical)
                        .constraints([Constraint::Length(9), Constraint::Min(0)].as_ref())
                        .split(f.area());
                    f.render_widget(session, chunks[0]);
                    render_history(f, chunks[1], app.game.title(), &app.history);
                } else {
                    f.render_widget(session, f.area());
                }
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leapling::problems::{AdditionProblem, Theme};
    use ratatui::backend::TestBackend;
    use tempfile::tempdir;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn temp_app(game: Game, round_secs: u64) -> (App, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let config = Config {
            round_secs,
            starting_level: 3,
            adaptive: false,
        };
        let recorder = JsonFileRecorder::with_path(dir.path().join("history.json"));
        (App::new(game, &config, recorder), dir)
    }

    fn rendered_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn cli_defaults() {
        let cli = Cli::parse_from(["leapling"]);
        assert_eq!(cli.game, Game::LetterLeap);
        assert_eq!(cli.seconds, None);
        assert_eq!(cli.level, None);
        assert!(!cli.no_adaptive);
    }

    #[test]
    fn cli_selects_addition_adventure() {
        let cli = Cli::parse_from(["leapling", "addition-adventure"]);
        assert_eq!(cli.game, Game::AdditionAdventure);
    }

    #[test]
    fn cli_parses_flags() {
        let cli = Cli::parse_from(["leapling", "letter-leap", "-s", "90", "-l", "7"]);
        assert_eq!(cli.seconds, Some(90));
        assert_eq!(cli.level, Some(7));

        let cli = Cli::parse_from(["leapling", "--no-adaptive"]);
        assert!(cli.no_adaptive);
    }

    #[test]
    fn game_displays_variant_names() {
        assert_eq!(Game::LetterLeap.to_string(), "LetterLeap");
        assert_eq!(Game::AdditionAdventure.to_string(), "AdditionAdventure");
    }

    #[test]
    fn merged_config_prefers_flags() {
        let cli = Cli::parse_from(["leapling", "-s", "30", "-l", "9", "--no-adaptive"]);
        let merged = cli.merged_config(Config::default());
        assert_eq!(merged.round_secs, 30);
        assert_eq!(merged.starting_level, 9);
        assert!(!merged.adaptive);
    }

    #[test]
    fn merged_config_falls_back_to_stored() {
        let cli = Cli::parse_from(["leapling"]);
        let stored = Config {
            round_secs: 120,
            starting_level: 5,
            adaptive: true,
        };
        let merged = cli.merged_config(stored.clone());
        assert_eq!(merged, stored);
    }

    #[test]
    fn merged_config_clamps_level() {
        let cli = Cli::parse_from(["leapling", "-l", "42"]);
        let merged = cli.merged_config(Config::default());
        assert_eq!(merged.starting_level, MAX_LEVEL);
    }

    #[test]
    fn new_app_is_idle_with_empty_history() {
        let (app, _dir) = temp_app(Game::LetterLeap, 60);
        assert!(!app.is_running());
        assert_eq!(app.screen, Screen::Game);
        assert!(app.history.is_empty());
    }

    #[test]
    fn ctrl_c_quits() {
        let (mut app, _dir) = temp_app(Game::LetterLeap, 60);
        let outcome = handle_key(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert_eq!(outcome, KeyOutcome::Quit);
    }

    #[test]
    fn escape_quits_when_idle_and_stops_when_running() {
        let (mut app, _dir) = temp_app(Game::LetterLeap, 60);
        assert_eq!(handle_key(&mut app, key(KeyCode::Esc)), KeyOutcome::Quit);

        assert_eq!(
            handle_key(&mut app, key(KeyCode::Enter)),
            KeyOutcome::Continue
        );
        assert!(app.is_running());

        assert_eq!(handle_key(&mut app, key(KeyCode::Esc)), KeyOutcome::Continue);
        assert!(!app.is_running());
        assert_eq!(app.history.len(), 1);
    }

    #[test]
    fn typed_letters_reach_the_typing_session() {
        let (mut app, _dir) = temp_app(Game::LetterLeap, 60);
        handle_key(&mut app, key(KeyCode::Enter));

        handle_key(&mut app, key(KeyCode::Char('z')));
        match &app.active {
            ActiveGame::Typing(session) => assert_eq!(session.total_presses, 1),
            ActiveGame::Arithmetic(_) => panic!("expected typing session"),
        }
    }

    #[test]
    fn pile_keys_reach_the_arithmetic_session() {
        let (mut app, _dir) = temp_app(Game::AdditionAdventure, 60);
        handle_key(&mut app, key(KeyCode::Enter));
        if let ActiveGame::Arithmetic(session) = &mut app.active {
            session.phase = ArithmeticPhase::BuildingSum {
                problem: AdditionProblem::new(3, 4, Theme::Ducks),
                taken_a: 0,
                taken_b: 0,
                sum: 0,
            };
        }

        handle_key(&mut app, key(KeyCode::Char('a')));
        handle_key(&mut app, key(KeyCode::Char(' ')));
        match &app.active {
            ActiveGame::Arithmetic(session) => match session.phase {
                ArithmeticPhase::BuildingSum { sum, .. } => assert_eq!(sum, 2),
                other => panic!("unexpected phase {other:?}"),
            },
            ActiveGame::Typing(_) => panic!("expected arithmetic session"),
        }
    }

    #[test]
    fn history_toggle_only_when_idle() {
        let (mut app, _dir) = temp_app(Game::LetterLeap, 60);
        handle_key(&mut app, key(KeyCode::Char('h')));
        assert_eq!(app.screen, Screen::History);
        handle_key(&mut app, key(KeyCode::Char('h')));
        assert_eq!(app.screen, Screen::Game);

        handle_key(&mut app, key(KeyCode::Enter));
        handle_key(&mut app, key(KeyCode::Char('h')));
        assert_eq!(app.screen, Screen::Game);
    }

    #[test]
    fn enter_does_not_start_a_round_behind_the_history_screen() {
        let (mut app, _dir) = temp_app(Game::LetterLeap, 60);
        handle_key(&mut app, key(KeyCode::Char('h')));
        handle_key(&mut app, key(KeyCode::Enter));
        assert!(!app.is_running());

        handle_key(&mut app, key(KeyCode::Esc));
        assert_eq!(app.screen, Screen::Game);
    }

    #[test]
    fn draws_the_idle_typing_screen() {
        let (mut app, _dir) = temp_app(Game::LetterLeap, 60);
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| ui(&mut app, f)).unwrap();

        let text = rendered_text(&terminal);
        assert!(text.contains("LETTER LEAP"));
        assert!(text.contains("Press Enter to start!"));
    }

    #[test]
    fn draws_the_running_arithmetic_screen() {
        let (mut app, _dir) = temp_app(Game::AdditionAdventure, 60);
        handle_key(&mut app, key(KeyCode::Enter));

        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| ui(&mut app, f)).unwrap();

        let text = rendered_text(&terminal);
        assert!(text.contains("Score 0"));
        assert!(text.contains("sum so far"));
    }

    #[test]
    fn draws_history_screen_title() {
        let (mut app, _dir) = temp_app(Game::AdditionAdventure, 60);
        app.screen = Screen::History;

        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| ui(&mut app, f)).unwrap();

        let text = rendered_text(&terminal);
        assert!(text.contains("Addition Adventure"));
        assert!(text.contains("No rounds played yet"));
    }

    #[test]
    fn round_over_screen_includes_history_table() {
        let (mut app, _dir) = temp_app(Game::LetterLeap, 1);
        handle_key(&mut app, key(KeyCode::Enter));
        handle_key(&mut app, key(KeyCode::Esc));
        assert_eq!(app.history.len(), 1);

        let backend = TestBackend::new(80, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| ui(&mut app, f)).unwrap();

        let text = rendered_text(&terminal);
        assert!(text.contains("Great Job!"));
        assert!(text.contains("Best Streak"));
    }
}
