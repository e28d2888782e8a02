mod ui;

use std::{
    error::Error,
    fs::{self, OpenOptions},
    io::{self, stdin, Read},
    path::{Path, PathBuf},
    sync::Mutex,
    time::{Duration, Instant},
};

use chrono::Local;
use clap::{error::ErrorKind, Args, CommandFactory, Parser, Subcommand};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing::{info, warn, Level};

use stenoscore::{
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    engine::{Engine, EvaluateOptions},
    error::StenoError,
    exam::ExamCatalog,
    history::{self, HistoryLog, HistoryRecord},
    language::Language,
    passage::PassageLibrary,
    practice::Practice,
    report::{self, ResultSheet, SheetContext},
    runtime::{CrosstermEventSource, FixedTicker, PracticeEvent, Runner},
    session::{FinishReason, SessionConfig},
    speed::ScoringMode,
};

const TICK_RATE_MS: u64 = 100;
const PAGE: usize = 10;

/// steno transcription practice with exam-style mistake scoring
#[derive(Parser, Debug, Clone)]
#[command(
    version,
    about,
    long_about = "Type a passage against the clock, or score an existing transcript, and get the result sheet an exam board would produce: full and half mistakes, gross and net speed, and a pass or fail verdict."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// extra exam profiles (JSON list) merged over the built-in ones
    #[arg(global = true, long, value_name = "PATH")]
    profiles: Option<PathBuf>,

    /// log at debug level
    #[arg(global = true, short, long)]
    verbose: bool,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// type a passage in the terminal (default)
    Practice(PracticeArgs),
    /// score a typed transcript against a reference passage
    Check(CheckArgs),
    /// list the exam profiles
    Profiles,
    /// show recent saved results
    History {
        /// number of results to show
        #[arg(short = 'n', long, default_value_t = 10)]
        count: usize,
    },
}

#[derive(Args, Debug, Clone, Default)]
struct ScoringArgs {
    /// exam profile key, e.g. HSSC_C
    #[arg(short, long)]
    exam: Option<String>,

    /// passage language; detected from the text when omitted
    #[arg(short, long, value_enum)]
    language: Option<Language>,

    /// speed formula
    #[arg(short, long, value_enum)]
    mode: Option<ScoringMode>,
}

impl ScoringArgs {
    fn options(&self, engine: &Engine, config: &Config) -> EvaluateOptions {
        let exam = self.exam.clone().or_else(|| config.exam_profile.clone());
        if let Some(key) = &exam {
            if engine.profile(key).is_none() {
                warn!(%key, "unknown exam profile, scoring with generic rules");
            }
        }
        EvaluateOptions {
            exam_profile: exam,
            scoring_mode: self.mode.unwrap_or(config.scoring_mode),
        }
    }

    fn language(&self, config: &Config, text: &str) -> Language {
        self.language
            .or(config.language)
            .unwrap_or_else(|| Language::detect(text))
    }
}

#[derive(Args, Debug, Clone, Default)]
struct PracticeArgs {
    #[command(flatten)]
    scoring: ScoringArgs,

    /// passage file to type
    #[arg(short, long, conflicts_with = "prompt")]
    file: Option<PathBuf>,

    /// passage text to type
    #[arg(short, long)]
    prompt: Option<String>,

    /// time limit in minutes; the profile default when omitted
    #[arg(short = 't', long)]
    minutes: Option<u32>,

    /// candidate name for the result sheet
    #[arg(long)]
    name: Option<String>,

    /// allow corrections even under an exam profile
    #[arg(long, conflicts_with = "no_backspace")]
    backspace: bool,

    /// block corrections
    #[arg(long)]
    no_backspace: bool,

    /// do not append the result to the history log
    #[arg(long)]
    no_save: bool,
}

impl PracticeArgs {
    fn backspace_choice(&self) -> Option<bool> {
        if self.backspace {
            Some(true)
        } else if self.no_backspace {
            Some(false)
        } else {
            None
        }
    }

    /// Folds the explicit flags into the remembered preferences.
    fn remember(&self, config: &mut Config) {
        if let Some(name) = &self.name {
            config.candidate_name = Some(name.clone());
        }
        if let Some(exam) = &self.scoring.exam {
            config.exam_profile = Some(exam.clone());
        }
        if let Some(language) = self.scoring.language {
            config.language = Some(language);
        }
        if let Some(mode) = self.scoring.mode {
            config.scoring_mode = mode;
        }
        if let Some(minutes) = self.minutes {
            config.minutes = Some(minutes);
        }
        if let Some(allow) = self.backspace_choice() {
            config.allow_backspace = Some(allow);
        }
    }
}

#[derive(Args, Debug, Clone)]
struct CheckArgs {
    /// reference passage file
    reference: PathBuf,

    /// typed transcript file, or - for stdin
    typed: PathBuf,

    #[command(flatten)]
    scoring: ScoringArgs,

    /// time taken, in seconds
    #[arg(short, long, default_value_t = 60.0)]
    seconds: f64,

    /// print the full result as JSON
    #[arg(long)]
    json: bool,

    /// append the result to the history log
    #[arg(long)]
    save: bool,

    /// candidate name for the result sheet
    #[arg(long)]
    name: Option<String>,

    /// time limit in minutes, shown on the sheet
    #[arg(long)]
    minutes: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Typing,
    Results,
    Breakdown,
}

pub struct App {
    pub engine: Engine,
    pub practice: Practice,
    pub state: AppState,
    pub passage_title: String,
    pub candidate: Option<String>,
    pub breakdown_scroll: usize,
    pub library: Option<PassageLibrary>,
    pub history: Option<HistoryLog>,
}

impl App {
    pub fn new(engine: Engine, practice: Practice, passage_title: String) -> Self {
        Self {
            engine,
            practice,
            state: AppState::Typing,
            passage_title,
            candidate: None,
            breakdown_scroll: 0,
            library: None,
            history: None,
        }
    }

    pub fn test_name(&self) -> String {
        self.practice
            .config
            .options
            .exam_profile
            .as_deref()
            .and_then(|key| self.engine.profile(key))
            .map(|profile| profile.name.clone())
            .unwrap_or_else(|| "Practice".to_string())
    }

    pub fn sheet(&self) -> Option<ResultSheet> {
        let result = self.practice.result()?;
        let context = SheetContext {
            candidate: self.candidate.clone(),
            time_limit_secs: self.practice.config.time_limit_secs.map(|s| s.round() as u64),
            time_up: self.practice.state.finished == Some(FinishReason::TimeUp),
        };
        Some(ResultSheet::build(result, self.engine.catalog(), &context))
    }

    pub fn has_library(&self) -> bool {
        self.library.is_some()
    }

    pub fn on_elapsed(&mut self, delta: Duration) {
        if self.state == AppState::Typing {
            self.practice.on_tick(&self.engine, delta);
            self.settle();
        }
    }

    /// Handles one key press. Returns true when the app should quit.
    pub fn on_key(&mut self, key: KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if key.code == KeyCode::Esc || (ctrl && key.code == KeyCode::Char('c')) {
            return true;
        }

        match self.state {
            AppState::Typing => {
                match key.code {
                    KeyCode::Char('p') if ctrl => self.practice.toggle_pause(),
                    KeyCode::Char('d') if ctrl => self.practice.check(&self.engine),
                    KeyCode::Char('w') if ctrl => {
                        self.practice.delete_word();
                    }
                    KeyCode::Char(_) if ctrl => {}
                    KeyCode::Char(c) => self.practice.write(&self.engine, c),
                    KeyCode::Enter => self.practice.write(&self.engine, ' '),
                    KeyCode::Backspace => {
                        self.practice.backspace();
                    }
                    _ => {}
                }
                self.settle();
            }
            AppState::Results => match key.code {
                KeyCode::Char('r') => self.restart(),
                KeyCode::Char('n') => self.new_passage(),
                KeyCode::Char('b') => {
                    self.breakdown_scroll = 0;
                    self.state = AppState::Breakdown;
                }
                _ => {}
            },
            AppState::Breakdown => match key.code {
                KeyCode::Up => self.breakdown_scroll = self.breakdown_scroll.saturating_sub(1),
                KeyCode::Down => self.breakdown_scroll += 1,
                KeyCode::PageUp => self.breakdown_scroll = self.breakdown_scroll.saturating_sub(PAGE),
                KeyCode::PageDown => self.breakdown_scroll += PAGE,
                KeyCode::Home => self.breakdown_scroll = 0,
                KeyCode::Char('b') | KeyCode::Backspace => self.state = AppState::Results,
                KeyCode::Char('r') => self.restart(),
                _ => {}
            },
        }
        false
    }

    /// Same passage, fresh clock.
    pub fn restart(&mut self) {
        let config = self.practice.config.clone();
        self.practice = Practice::new(self.practice.reference.clone(), config);
        self.state = AppState::Typing;
        self.breakdown_scroll = 0;
    }

    pub fn new_passage(&mut self) {
        let Some(passage) = self.library.as_ref().and_then(PassageLibrary::random) else {
            return;
        };
        let (title, text) = (passage.title.clone(), passage.text.clone());
        let config = self.practice.config.clone();
        self.practice = Practice::new(text, config);
        self.passage_title = title;
        self.state = AppState::Typing;
        self.breakdown_scroll = 0;
    }

    fn settle(&mut self) {
        if self.state != AppState::Typing || !self.practice.has_finished() {
            return;
        }
        self.state = AppState::Results;
        self.save_result();
    }

    fn save_result(&self) {
        let (Some(log), Some(result)) = (&self.history, self.practice.result()) else {
            return;
        };
        let record = HistoryRecord::from_result(result, self.candidate.as_deref(), Local::now());
        if let Err(e) = log.append(&record) {
            warn!(error = %e, "could not save result");
        }
    }
}

fn init_logging(verbose: bool, tui: bool) {
    let level = match (verbose, tui) {
        (true, _) => Level::DEBUG,
        (false, true) => Level::INFO,
        (false, false) => Level::WARN,
    };
    let builder = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false);

    if !tui {
        let _ = builder.with_writer(io::stderr).try_init();
        return;
    }

    // the terminal belongs to the TUI, so logs go to a file or nowhere
    let file = AppDirs::log_path().and_then(|path| {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).ok()?;
        }
        OpenOptions::new().create(true).append(true).open(path).ok()
    });
    let _ = match file {
        Some(file) => builder.with_ansi(false).with_writer(Mutex::new(file)).try_init(),
        None => builder.with_writer(io::sink).try_init(),
    };
}

fn load_engine(profiles: Option<&Path>) -> Result<Engine, StenoError> {
    let mut catalog = ExamCatalog::builtin()?;
    if let Some(path) = profiles {
        let added = catalog.merge_file(path)?;
        info!(path = %path.display(), added, "merged exam profiles");
    }
    Ok(Engine::new(catalog))
}

fn read_input(path: &Path) -> io::Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        fs::read_to_string(path)
    }
}

/// Picks the passage and settings for an interactive attempt. Flags win over
/// remembered preferences, which win over profile defaults.
fn build_practice(
    engine: &Engine,
    args: &PracticeArgs,
    config: &Config,
) -> Result<(Practice, String, Option<PassageLibrary>), Box<dyn Error>> {
    let options = args.scoring.options(engine, config);

    let (text, title, language, library) = if let Some(path) = &args.file {
        let text = fs::read_to_string(path)?;
        let title = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Passage".to_string());
        let language = args.scoring.language(config, &text);
        (text, title, language, None)
    } else if let Some(prompt) = &args.prompt {
        let language = args.scoring.language(config, prompt);
        (prompt.clone(), "Custom passage".to_string(), language, None)
    } else {
        let language = args.scoring.language.or(config.language).unwrap_or_default();
        let library = PassageLibrary::builtin(language)?;
        let passage = library.random().ok_or_else(|| {
            StenoError::Catalog(format!("no built-in {language} passages"))
        })?;
        (
            passage.text.clone(),
            passage.title.clone(),
            language,
            Some(library),
        )
    };

    let minutes = args.minutes.or(config.minutes).or_else(|| {
        options
            .exam_profile
            .as_deref()
            .and_then(|key| engine.profile(key))
            .and_then(|profile| profile.default_minutes())
    });

    let mut session = SessionConfig::new(language, options).time_limit_minutes(minutes);
    if let Some(allow) = args.backspace_choice().or(config.allow_backspace) {
        session = session.allow_backspace(allow);
    }

    Ok((Practice::new(text, session), title, library))
}

fn run_practice(engine: Engine, args: PracticeArgs) -> Result<(), Box<dyn Error>> {
    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let store = FileConfigStore::new();
    let mut config = store.load();
    let (practice, title, library) = build_practice(&engine, &args, &config)?;

    let mut app = App::new(engine, practice, title);
    app.candidate = args.name.clone().or_else(|| config.candidate_name.clone());
    app.library = library;
    if !args.no_save {
        app.history = AppDirs::history_path().map(HistoryLog::new);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let outcome = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    args.remember(&mut config);
    if let Err(e) = store.save(&config) {
        warn!(error = %e, "could not save preferences");
    }

    outcome
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );
    let mut last = Instant::now();
    terminal.draw(|f| ui::draw(app, f))?;

    loop {
        let event = runner.step();
        let now = Instant::now();
        app.on_elapsed(now - last);
        last = now;

        if let PracticeEvent::Key(key) = event {
            if app.on_key(key) {
                break;
            }
        }
        terminal.draw(|f| ui::draw(app, f))?;
    }

    Ok(())
}

fn run_check(engine: &Engine, args: CheckArgs) -> Result<(), Box<dyn Error>> {
    let reference = read_input(&args.reference)?;
    let typed = read_input(&args.typed)?;

    // scripted checks ignore remembered preferences
    let config = Config::default();
    let options = args.scoring.options(engine, &config);
    let language = args.scoring.language(&config, &reference);
    let result = engine.evaluate(&reference, &typed, args.seconds, language, &options);

    if args.json {
        println!("{}", report::to_json(&result)?);
    } else {
        let limit = args.minutes.map(|m| u64::from(m) * 60);
        let context = SheetContext {
            candidate: args.name.clone(),
            time_limit_secs: limit,
            time_up: limit.is_some_and(|l| args.seconds >= l as f64),
        };
        print!("{}", ResultSheet::build(&result, engine.catalog(), &context));
        println!();
        println!("{}", report::diff_text(&result.operations));
    }

    if args.save {
        let path = AppDirs::history_path().ok_or("no state directory for the history log")?;
        let record = HistoryRecord::from_result(&result, args.name.as_deref(), Local::now());
        HistoryLog::new(path).append(&record)?;
    }
    Ok(())
}

fn print_profiles(engine: &Engine) {
    println!("{:<10} {:<24} {:<8} {:<20} RULES", "KEY", "NAME", "LEVEL", "MINUTES");
    for profile in engine.catalog().profiles() {
        let minutes = profile
            .time_options_minutes
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let rules = profile
            .rules
            .iter()
            .map(|rule| rule.name())
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "{:<10} {:<24} {:<8} {:<20} {}",
            profile.key,
            profile.name,
            profile.level.to_string(),
            minutes,
            if rules.is_empty() { "-" } else { rules.as_str() }
        );
    }
}

fn show_history(count: usize) -> Result<(), Box<dyn Error>> {
    let Some(path) = AppDirs::history_path() else {
        println!("No saved results.");
        return Ok(());
    };
    let records = HistoryLog::new(path).recent(count)?;
    if records.is_empty() {
        println!("No saved results.");
        return Ok(());
    }

    for r in &records {
        println!(
            "{}  {:<8} {:<8} {:>6.1} wpm  {:>5.1}%  mistakes {:>4.1}/{:<3} {}",
            r.date.format("%Y-%m-%d %H:%M"),
            if r.exam.is_empty() { "-" } else { r.exam.as_str() },
            r.language,
            r.net_wpm,
            r.accuracy,
            r.weighted,
            r.allowed_max,
            if r.passed { "PASS" } else { "FAIL" }
        );
    }
    if let (Some(mean), Some(spread)) = (
        history::mean_net_wpm(&records),
        history::net_wpm_spread(&records),
    ) {
        println!(
            "mean net speed over {} results: {mean:.1} wpm (± {spread:.1})",
            records.len()
        );
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let command = cli
        .command
        .clone()
        .unwrap_or_else(|| Command::Practice(PracticeArgs::default()));
    init_logging(cli.verbose, matches!(command, Command::Practice(_)));

    let engine = load_engine(cli.profiles.as_deref())?;
    match command {
        Command::Practice(args) => run_practice(engine, args),
        Command::Check(args) => run_check(&engine, args),
        Command::Profiles => {
            print_profiles(&engine);
            Ok(())
        }
        Command::History { count } => show_history(count),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PASSAGE: &str = "The quick brown fox jumps over the lazy dog";

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn engine() -> Engine {
        Engine::with_builtin_profiles().unwrap()
    }

    fn practice_app(options: EvaluateOptions) -> App {
        let config = SessionConfig::new(Language::English, options).time_limit_minutes(Some(1));
        App::new(engine(), Practice::new(PASSAGE.to_string(), config), "Test".into())
    }

    fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            app.on_key(key(KeyCode::Char(c)));
        }
    }

    fn practice_args(args: &[&str]) -> PracticeArgs {
        match Cli::parse_from(args).command {
            Some(Command::Practice(args)) => args,
            other => panic!("expected practice, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_defaults_to_practice() {
        let cli = Cli::parse_from(["stenoscore"]);
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
        assert!(cli.profiles.is_none());
    }

    #[test]
    fn test_cli_practice_flags() {
        let args = practice_args(&[
            "stenoscore", "practice", "-e", "hssc_c", "-l", "hindi", "-m", "word-count", "-t", "15",
            "--name", "Asha", "--backspace",
        ]);
        assert_eq!(args.scoring.exam.as_deref(), Some("hssc_c"));
        assert_eq!(args.scoring.language, Some(Language::Hindi));
        assert_eq!(args.scoring.mode, Some(ScoringMode::WordCount));
        assert_eq!(args.minutes, Some(15));
        assert_eq!(args.name.as_deref(), Some("Asha"));
        assert_eq!(args.backspace_choice(), Some(true));
    }

    #[test]
    fn test_cli_backspace_flags_conflict() {
        let parsed = Cli::try_parse_from(["stenoscore", "practice", "--backspace", "--no-backspace"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_cli_file_and_prompt_conflict() {
        let parsed = Cli::try_parse_from(["stenoscore", "practice", "-f", "a.txt", "-p", "hello"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_cli_check_args() {
        let cli = Cli::parse_from([
            "stenoscore", "check", "ref.txt", "-", "--seconds", "300", "--json", "--profiles", "extra.json",
        ]);
        assert_eq!(cli.profiles, Some(PathBuf::from("extra.json")));
        match cli.command {
            Some(Command::Check(args)) => {
                assert_eq!(args.reference, PathBuf::from("ref.txt"));
                assert_eq!(args.typed, PathBuf::from("-"));
                assert_eq!(args.seconds, 300.0);
                assert!(args.json);
                assert!(!args.save);
            }
            other => panic!("expected check, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_history_count() {
        let cli = Cli::parse_from(["stenoscore", "history", "-n", "3"]);
        assert!(matches!(cli.command, Some(Command::History { count: 3 })));
        let cli = Cli::parse_from(["stenoscore", "history"]);
        assert!(matches!(cli.command, Some(Command::History { count: 10 })));
    }

    #[test]
    fn test_build_practice_uses_profile_minutes_and_blocks_backspace() {
        let engine = engine();
        let args = practice_args(&["stenoscore", "practice", "-e", "SSC_D", "-p", PASSAGE]);
        let (practice, title, library) = build_practice(&engine, &args, &Config::default()).unwrap();
        assert_eq!(title, "Custom passage");
        assert!(library.is_none());
        assert_eq!(practice.config.time_limit_secs, Some(600.0));
        assert!(!practice.config.allow_backspace);
        assert_eq!(practice.config.language, Language::English);
    }

    #[test]
    fn test_build_practice_flags_beat_config() {
        let engine = engine();
        let config = Config {
            exam_profile: Some("HSSC_C".into()),
            minutes: Some(30),
            allow_backspace: Some(false),
            ..Default::default()
        };
        let args = practice_args(&["stenoscore", "practice", "-t", "5", "--backspace", "-p", "नमस्ते दुनिया"]);
        let (practice, _, _) = build_practice(&engine, &args, &config).unwrap();
        assert_eq!(practice.config.options.exam_profile.as_deref(), Some("HSSC_C"));
        assert_eq!(practice.config.time_limit_secs, Some(300.0));
        assert!(practice.config.allow_backspace);
        assert_eq!(practice.config.language, Language::Hindi);
    }

    #[test]
    fn test_build_practice_picks_library_passage() {
        let engine = engine();
        let args = practice_args(&["stenoscore", "practice", "-l", "english"]);
        let (practice, title, library) = build_practice(&engine, &args, &Config::default()).unwrap();
        let library = library.unwrap();
        let passage = library.by_title(&title).unwrap();
        assert_eq!(practice.reference, passage.text);
        assert_eq!(practice.config.time_limit_secs, None);
    }

    #[test]
    fn test_remember_keeps_only_explicit_flags() {
        let mut config = Config {
            candidate_name: Some("Old".into()),
            minutes: Some(10),
            ..Default::default()
        };
        let args = practice_args(&["stenoscore", "practice", "-e", "SSC_C", "--no-backspace"]);
        args.remember(&mut config);
        assert_eq!(config.candidate_name.as_deref(), Some("Old"));
        assert_eq!(config.exam_profile.as_deref(), Some("SSC_C"));
        assert_eq!(config.minutes, Some(10));
        assert_eq!(config.allow_backspace, Some(false));
    }

    #[test]
    fn test_app_typing_and_check_moves_to_results() {
        let mut app = practice_app(EvaluateOptions::default());
        type_str(&mut app, "The quick brown");
        assert_eq!(app.practice.typed, "The quick brown");
        assert_eq!(app.state, AppState::Typing);

        app.on_elapsed(Duration::from_secs(30));
        assert!(!app.on_key(ctrl('d')));
        assert_eq!(app.state, AppState::Results);
        let sheet = app.sheet().unwrap();
        assert_eq!(sheet.title, "Result & Analysis: Practice");
    }

    #[test]
    fn test_app_time_up_moves_to_results() {
        let mut app = practice_app(EvaluateOptions::with_profile("SSC_C"));
        type_str(&mut app, "The quick");
        for _ in 0..61 {
            app.on_elapsed(Duration::from_secs(1));
        }
        assert_eq!(app.state, AppState::Results);
        assert_eq!(app.practice.state.finished, Some(FinishReason::TimeUp));
        assert_eq!(app.test_name(), "SSC Steno Group C");
        let text = app.sheet().unwrap().to_string();
        assert!(text.contains("(TIME UP)"));
    }

    #[test]
    fn test_app_ctrl_keys_do_not_type() {
        let mut app = practice_app(EvaluateOptions::default());
        type_str(&mut app, "The");
        app.on_key(ctrl('p'));
        assert!(app.practice.state.paused);
        app.on_key(key(KeyCode::Char('x')));
        assert_eq!(app.practice.typed, "The");
        app.on_key(ctrl('p'));
        app.on_key(ctrl('z'));
        assert_eq!(app.practice.typed, "The");
    }

    #[test]
    fn test_app_backspace_and_delete_word() {
        let mut app = practice_app(EvaluateOptions::default());
        type_str(&mut app, "The quick bro");
        app.on_key(key(KeyCode::Backspace));
        assert_eq!(app.practice.typed, "The quick br");
        app.on_key(ctrl('w'));
        assert_eq!(app.practice.typed, "The quick ");
        app.on_key(key(KeyCode::Enter));
        assert_eq!(app.practice.typed, "The quick  ");
    }

    #[test]
    fn test_app_exam_blocks_backspace() {
        let mut app = practice_app(EvaluateOptions::with_profile("HSSC_C"));
        type_str(&mut app, "The");
        app.on_key(key(KeyCode::Backspace));
        assert_eq!(app.practice.typed, "The");
        assert_eq!(app.practice.state.blocked_backspaces, 1);
    }

    #[test]
    fn test_app_results_navigation() {
        let mut app = practice_app(EvaluateOptions::default());
        type_str(&mut app, "The quack");
        app.on_key(ctrl('d'));

        app.on_key(key(KeyCode::Char('b')));
        assert_eq!(app.state, AppState::Breakdown);
        app.on_key(key(KeyCode::Down));
        app.on_key(key(KeyCode::PageDown));
        assert_eq!(app.breakdown_scroll, 11);
        app.on_key(key(KeyCode::PageUp));
        app.on_key(key(KeyCode::Up));
        assert_eq!(app.breakdown_scroll, 0);
        app.on_key(key(KeyCode::Backspace));
        assert_eq!(app.state, AppState::Results);

        // no library, so n does nothing
        app.on_key(key(KeyCode::Char('n')));
        assert_eq!(app.state, AppState::Results);

        app.on_key(key(KeyCode::Char('r')));
        assert_eq!(app.state, AppState::Typing);
        assert!(app.practice.typed.is_empty());
        assert!(!app.practice.has_started());
    }

    #[test]
    fn test_app_new_passage_from_library() {
        let mut app = practice_app(EvaluateOptions::default());
        app.library = Some(PassageLibrary::builtin(Language::English).unwrap());
        assert!(app.has_library());
        app.on_key(ctrl('d'));
        app.on_key(key(KeyCode::Char('n')));
        assert_eq!(app.state, AppState::Typing);
        let library = app.library.as_ref().unwrap();
        assert_eq!(
            library.by_title(&app.passage_title).map(|p| p.text.as_str()),
            Some(app.practice.reference.as_str())
        );
    }

    #[test]
    fn test_app_quit_keys() {
        let mut app = practice_app(EvaluateOptions::default());
        assert!(app.on_key(key(KeyCode::Esc)));
        assert!(app.on_key(ctrl('c')));
    }

    #[test]
    fn test_finished_session_is_saved() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = practice_app(EvaluateOptions::default());
        app.history = Some(HistoryLog::new(dir.path().join("results.csv")));
        app.candidate = Some("Asha".into());
        type_str(&mut app, "The quick");
        app.on_key(ctrl('d'));

        let records = app.history.as_ref().unwrap().read_all().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].candidate, "Asha");
    }

    #[test]
    fn test_load_engine_rejects_missing_profiles_file() {
        assert!(load_engine(Some(Path::new("/nonexistent/profiles.json"))).is_err());
        assert!(load_engine(None).is_ok());
    }
}
