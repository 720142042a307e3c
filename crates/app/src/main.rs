use std::fmt;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use dizai_core::model::{LevelCatalog, LevelId, LevelReport, QuizPhase, Theme};
use services::narration::phrases;
use services::{
    AiClient, AppSettingsService, Clock, FallbackQuestionProvider, Narrator, QuestionProvider,
    QuizLoopService, QuizSessionEngine,
};
use storage::repository::Storage;
use tracing_subscriber::EnvFilter;

mod console;

use console::ConsoleNarrator;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidLevel { raw: String },
    InvalidNumber { flag: &'static str, raw: String },
    InvalidTheme { raw: String },
    InvalidDbUrl { raw: String },
    MissingText { command: &'static str },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidLevel { raw } => write!(f, "invalid --level value: {raw}"),
            ArgsError::InvalidNumber { flag, raw } => write!(f, "invalid {flag} value: {raw}"),
            ArgsError::InvalidTheme { raw } => {
                write!(f, "invalid --theme value: {raw} (light, dark or contrast)")
            }
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::MissingText { command } => write!(f, "{command} requires an argument"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_number(args: &mut impl Iterator<Item = String>, flag: &'static str) -> Result<f32, ArgsError> {
    let value = require_value(args, flag)?;
    value
        .trim()
        .parse()
        .map_err(|_| ArgsError::InvalidNumber { flag, raw: value })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  dizai play     [--db <sqlite_url>] [--level <id>]");
    eprintln!("  dizai levels   [--db <sqlite_url>]");
    eprintln!("  dizai reset    [--db <sqlite_url>]");
    eprintln!("  dizai settings [--db <sqlite_url>] [--volume <0..1>] [--rate <0.5..1.5>] [--theme <light|dark|contrast>]");
    eprintln!("  dizai write    [--db <sqlite_url>] <text>");
    eprintln!("  dizai ask      [--db <sqlite_url>] <question>");
    eprintln!("  dizai read     [--db <sqlite_url>] <image.jpg>");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite://dizai.sqlite3");
    eprintln!("  --level highest unlocked level");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  DIZAI_DB_URL, DIZAI_AI_API_KEY, DIZAI_AI_BASE_URL, DIZAI_AI_MODEL, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Play,
    Levels,
    Reset,
    Settings,
    Write,
    Ask,
    Read,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "play" => Some(Self::Play),
            "levels" => Some(Self::Levels),
            "reset" => Some(Self::Reset),
            "settings" => Some(Self::Settings),
            "write" => Some(Self::Write),
            "ask" => Some(Self::Ask),
            "read" => Some(Self::Read),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Play => "play",
            Self::Levels => "levels",
            Self::Reset => "reset",
            Self::Settings => "settings",
            Self::Write => "write",
            Self::Ask => "ask",
            Self::Read => "read",
        }
    }

    fn takes_text(self) -> bool {
        matches!(self, Self::Write | Self::Ask | Self::Read)
    }
}

#[derive(Debug, Default)]
struct SettingsChange {
    volume: Option<f32>,
    rate: Option<f32>,
    theme: Option<Theme>,
}

impl SettingsChange {
    fn is_empty(&self) -> bool {
        self.volume.is_none() && self.rate.is_none() && self.theme.is_none()
    }
}

struct Args {
    db_url: String,
    level: Option<LevelId>,
    settings: SettingsChange,
    text: Vec<String>,
}

impl Args {
    fn parse(cmd: Command, args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("DIZAI_DB_URL")
            .ok()
            .map_or_else(|| "sqlite://dizai.sqlite3".into(), normalize_sqlite_url);
        let mut level = None;
        let mut settings = SettingsChange::default();
        let mut text = Vec::new();

        while let Some(arg) = args.next() {
            match (arg.as_str(), cmd) {
                ("--help" | "-h", _) => {
                    print_usage();
                    std::process::exit(0);
                }
                ("--db", _) => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                ("--level", Command::Play) => {
                    let value = require_value(args, "--level")?;
                    let parsed = value
                        .parse::<LevelId>()
                        .map_err(|_| ArgsError::InvalidLevel { raw: value.clone() })?;
                    level = Some(parsed);
                }
                ("--volume", Command::Settings) => {
                    settings.volume = Some(parse_number(args, "--volume")?);
                }
                ("--rate", Command::Settings) => {
                    settings.rate = Some(parse_number(args, "--rate")?);
                }
                ("--theme", Command::Settings) => {
                    let value = require_value(args, "--theme")?;
                    settings.theme = Some(parse_theme(&value)?);
                }
                (_, cmd) if cmd.takes_text() && !arg.starts_with("--") => text.push(arg),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        if cmd.takes_text() && text.is_empty() {
            return Err(ArgsError::MissingText {
                command: cmd.name(),
            });
        }

        Ok(Self {
            db_url,
            level,
            settings,
            text,
        })
    }
}

fn parse_theme(raw: &str) -> Result<Theme, ArgsError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "light" => Ok(Theme::Light),
        "dark" => Ok(Theme::Dark),
        "contrast" => Ok(Theme::Contrast),
        _ => Err(ArgsError::InvalidTheme {
            raw: raw.to_string(),
        }),
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,sqlx=warn,reqwest=warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .try_init();
}

fn question_provider(ai: AiClient) -> Arc<dyn QuestionProvider> {
    if ai.enabled() {
        Arc::new(FallbackQuestionProvider::new(Arc::new(ai)))
    } else {
        tracing::info!("DIZAI_AI_API_KEY not set; serving built-in questions");
        Arc::new(FallbackQuestionProvider::offline())
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    let cmd = match argv.first().map(String::as_str) {
        None => Command::Play,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Play,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            io::Error::new(io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if argv.first().is_some_and(|first| !first.starts_with("--")) {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(cmd, &mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    prepare_sqlite_file(&parsed.db_url)?;
    let storage = Storage::sqlite(&parsed.db_url).await?;
    let settings_service = AppSettingsService::new(Arc::clone(&storage.app_settings));

    if cmd == Command::Settings {
        return update_settings(&settings_service, &parsed.settings).await;
    }

    let settings = settings_service.load().await;
    let narrator: Arc<dyn Narrator> = Arc::new(ConsoleNarrator::from_settings(&settings));
    let ai = AiClient::from_env();

    if cmd.takes_text() {
        if !ai.enabled() {
            tracing::warn!("DIZAI_AI_API_KEY not set; replies will be fallbacks");
        }
        for line in run_ai_tool(cmd, &ai, narrator.as_ref(), &parsed.text.join(" ")).await? {
            println!("{line}");
        }
        return Ok(());
    }

    let loop_svc = QuizLoopService::new(
        Clock::system(),
        Arc::new(LevelCatalog::literacy()),
        question_provider(ai),
        Arc::clone(&narrator),
        Arc::clone(&storage.progress),
    );
    let mut engine = loop_svc.open().await;

    match cmd {
        Command::Play => play(&loop_svc, &mut engine, narrator.as_ref(), parsed.level).await,
        Command::Levels => {
            print_levels(&engine);
            Ok(())
        }
        Command::Reset => {
            loop_svc.reset_progress(&mut engine).await;
            println!("Progresso reiniciado: apenas o nível 1 está liberado.");
            Ok(())
        }
        Command::Settings | Command::Write | Command::Ask | Command::Read => Ok(()),
    }
}

fn print_levels(engine: &QuizSessionEngine) {
    for status in engine.levels() {
        let marker = if status.locked {
            "🔒"
        } else if status.completed {
            "✓"
        } else {
            "▶"
        };
        println!(
            "{marker} {}. {} - {}",
            status.level.id(),
            status.level.title(),
            status.level.description()
        );
    }
}

async fn play(
    loop_svc: &QuizLoopService,
    engine: &mut QuizSessionEngine,
    narrator: &dyn Narrator,
    level: Option<LevelId>,
) -> Result<(), Box<dyn std::error::Error>> {
    let level_id = level.unwrap_or_else(|| engine.max_unlocked_level());
    let locked = engine
        .levels()
        .iter()
        .any(|status| status.level.id() == level_id && status.locked);
    if locked {
        narrator.say(phrases::LEVEL_LOCKED);
    }
    loop_svc.start_level(engine, level_id).await?;

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let total = engine.questions_per_level();

    loop {
        match engine.phase() {
            None => return Ok(()),
            Some(QuizPhase::Finished) => {
                let report = loop_svc.finish(engine).await?;
                print_report(&report);
                return Ok(());
            }
            Some(phase) if phase.is_resolved() => {
                loop_svc.advance(engine).await?;
            }
            Some(QuizPhase::Loading) => {
                return Err(io::Error::other("question did not load").into());
            }
            Some(_) => {
                let Some(question) = engine.current_question() else {
                    return Err(io::Error::other("no question displayed").into());
                };
                let options = question.options().to_vec();
                println!();
                println!(
                    "Pergunta {}/{total}: {}",
                    engine.question_index().unwrap_or(1),
                    question.prompt()
                );
                for (i, option) in options.iter().enumerate() {
                    println!("  {}) {option}", i + 1);
                }
                print!("Resposta (número, r = repetir, q = sair): ");
                io::stdout().flush()?;

                let Some(line) = lines.next().transpose()? else {
                    engine.abandon();
                    return Ok(());
                };
                let input = line.trim();
                match input {
                    "q" => {
                        engine.abandon();
                        println!("Até logo!");
                        return Ok(());
                    }
                    "r" => {
                        engine.repeat_question();
                        continue;
                    }
                    _ => {}
                }
                let Some(choice) = input
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|i| options.get(i))
                else {
                    println!("Escolha um número de 1 a {}.", options.len());
                    continue;
                };

                let outcome = engine.submit_answer(choice)?;
                if !outcome.correct && !outcome.explanation.is_empty() {
                    println!("  {}", outcome.explanation);
                }
            }
        }
    }
}

fn print_report(report: &LevelReport) {
    println!();
    println!(
        "Nível {} concluído: {} de {} acertos, {} para praticar.",
        report.level_id(),
        report.score(),
        report.total(),
        report.wrong_count()
    );
    if let Some(next) = report.unlocked() {
        println!("Nível {next} desbloqueado!");
    }
}

async fn update_settings(
    service: &AppSettingsService,
    change: &SettingsChange,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut settings = service.load().await;
    if !change.is_empty() {
        let mut draft = settings.to_draft();
        if let Some(volume) = change.volume {
            draft.volume = volume;
        }
        if let Some(rate) = change.rate {
            draft.speech_rate = rate;
        }
        if let Some(theme) = change.theme {
            draft.theme = theme;
        }
        settings = service.save(draft).await?;
    }

    println!("volume:       {:.2}", settings.volume());
    println!("speech rate:  {:.2}", settings.speech_rate());
    println!("theme:        {:?}", settings.theme());
    println!("font:         {:?} ({:?})", settings.font_type(), settings.font_size());
    println!("auto repeat:  {}", settings.auto_repeat());
    println!("captions:     {}", settings.show_captions());
    Ok(())
}

/// Run one of the reading/writing helpers, narrating as it goes. Returns the
/// lines to print.
async fn run_ai_tool(
    cmd: Command,
    ai: &AiClient,
    narrator: &dyn Narrator,
    text: &str,
) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    let mut out = Vec::new();
    match cmd {
        Command::Write => {
            narrator.say(phrases::CHECKING_WRITING);
            let check = ai.check_writing(text).await;
            narrator.say(&phrases::writing_checked(&check.feedback));
            out.push(check.corrected);
            out.extend(check.changes.iter().map(|change| format!("  - {change}")));
            if !check.feedback.is_empty() {
                out.push(check.feedback);
            }
        }
        Command::Ask => {
            let reply = ai.ask_assistant(text).await;
            narrator.say(&reply);
            out.push(reply);
        }
        Command::Read => {
            let bytes = tokio::fs::read(text).await?;
            narrator.say(phrases::ANALYZING_IMAGE);
            let read = ai.read_image_text(&STANDARD.encode(bytes)).await;
            narrator.say(phrases::IMAGE_READ);
            out.push(read);
        }
        Command::Play | Command::Levels | Command::Reset | Command::Settings => {}
    }
    Ok(out)
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
