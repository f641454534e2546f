use std::fmt;
use std::str::FromStr;

use drive_core::model::{Level, LessonId};
use services::{AccountService, Clock, ProgressService, Session};
use storage::repository::Storage;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    MissingFlag { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidLevel { raw: String },
    InvalidLessonId { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingFlag { flag } => write!(f, "{flag} is required for this command"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidLevel { raw } => {
                write!(f, "invalid --level value (Beginner/Intermediate/Advanced/Expert): {raw}")
            }
            ArgsError::InvalidLessonId { raw } => write!(f, "invalid lesson id: {raw}"),
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

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Signup,
    Login,
    Logout,
    Lessons,
    Complete,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "signup" => Some(Self::Signup),
            "login" => Some(Self::Login),
            "logout" => Some(Self::Logout),
            "lessons" => Some(Self::Lessons),
            "complete" => Some(Self::Complete),
            _ => None,
        }
    }
}

struct Args {
    db_url: String,
    username: Option<String>,
    password: Option<String>,
    level: Level,
    lesson: Option<LessonId>,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- signup   --username <name> --password <pw> [--level <level>]");
    eprintln!("  cargo run -p app -- login    --username <name> --password <pw>");
    eprintln!("  cargo run -p app -- logout");
    eprintln!("  cargo run -p app -- lessons");
    eprintln!("  cargo run -p app -- complete <lesson-id>");
    eprintln!();
    eprintln!("Common flags:");
    eprintln!("  --db <sqlite_url>   defaults to sqlite://drive.sqlite3");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  DRIVE_DB_URL");
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut parsed = Self {
            db_url: std::env::var("DRIVE_DB_URL")
                .ok()
                .map_or_else(|| "sqlite://drive.sqlite3".into(), normalize_sqlite_url),
            username: None,
            password: None,
            level: Level::Beginner,
            lesson: None,
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    parsed.db_url = normalize_sqlite_url(value);
                }
                "--username" => {
                    parsed.username = Some(require_value(args, "--username")?);
                }
                "--password" => {
                    parsed.password = Some(require_value(args, "--password")?);
                }
                "--level" => {
                    let value = require_value(args, "--level")?;
                    parsed.level = Level::from_str(&value)
                        .map_err(|_| ArgsError::InvalidLevel { raw: value })?;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ if !arg.starts_with("--") && parsed.lesson.is_none() => {
                    parsed.lesson = Some(
                        arg.parse::<LessonId>()
                            .map_err(|_| ArgsError::InvalidLessonId { raw: arg })?,
                    );
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(parsed)
    }

    fn username(&self) -> Result<&str, ArgsError> {
        self.username
            .as_deref()
            .ok_or(ArgsError::MissingFlag { flag: "--username" })
    }

    fn password(&self) -> Result<&str, ArgsError> {
        self.password
            .as_deref()
            .ok_or(ArgsError::MissingFlag { flag: "--password" })
    }
}

/// Accepts bare paths, `sqlite:path`, and full `sqlite://` URLs; bare paths
/// are resolved against the working directory so sqlx and the file bootstrap
/// below agree on the target.
fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim();
    let path = std::path::Path::new(trimmed.strip_prefix("sqlite:").unwrap_or(trimmed));
    if path.is_absolute() {
        return format!("sqlite://{}", path.display());
    }
    let cwd = std::env::current_dir().unwrap_or_else(|_| std::path::PathBuf::from("."));
    format!("sqlite://{}", cwd.join(path).display())
}

/// Creates the database file (and parent directories) if missing; sqlx will
/// not create it on connect.
fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let invalid = || ArgsError::InvalidDbUrl {
        raw: db_url.to_string(),
    };
    let path = db_url.strip_prefix("sqlite://").ok_or_else(invalid)?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(invalid().into());
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

fn print_lessons(progress: &ProgressService, session: &Session) {
    let catalog = progress.catalog();
    println!("{} (level: {})", session.name(), session.level());

    println!("\nRecommended lessons:");
    for lesson in catalog.recommended_for(session.level()) {
        print_lesson_line(session, lesson);
    }

    let others = catalog.others_for(session.level());
    if !others.is_empty() {
        println!("\nOther modules:");
        for lesson in others {
            print_lesson_line(session, lesson);
        }
    }
}

fn print_lesson_line(session: &Session, lesson: &drive_core::model::Lesson) {
    let done = if session.completed_lessons().contains(&lesson.id()) {
        "x"
    } else {
        " "
    };
    let score = session
        .simulation_scores()
        .get(&lesson.id())
        .map(|s| format!(" (score {s})"))
        .unwrap_or_default();
    println!(
        "  [{done}] {} {:<22} {:<10} {}{score}",
        lesson.id(),
        lesson.title(),
        lesson.kind().as_str(),
        lesson.duration(),
    );
}

async fn resume_or_fail(accounts: &AccountService) -> Result<Session, Box<dyn std::error::Error>> {
    match accounts.resume().await? {
        Some(session) => Ok(session),
        None => {
            eprintln!("no active session; log in first");
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "no active session").into())
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    let cmd = match argv.first().map(String::as_str) {
        None | Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };
    argv.remove(0);

    let mut iter = argv.into_iter();
    let parsed = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    // Open + migrate SQLite at startup. Keep this in the binary glue so
    // core/services stay pure.
    prepare_sqlite_file(&parsed.db_url)?;
    let storage = Storage::sqlite(&parsed.db_url).await?;

    let clock = Clock::default_clock();
    let accounts = AccountService::new(clock, storage.accounts.clone(), storage.active.clone());
    let progress = ProgressService::new(
        drive_core::Catalog::builtin(),
        storage.accounts.clone(),
        storage.active.clone(),
    );

    match cmd {
        Command::Signup => {
            let session = accounts
                .sign_up(parsed.username()?, parsed.password()?, parsed.level)
                .await?;
            println!("Welcome, {}! Level: {}", session.name(), session.level());
        }
        Command::Login => {
            let session = accounts
                .log_in(parsed.username()?, parsed.password()?)
                .await?;
            println!("Welcome back, {}! Level: {}", session.name(), session.level());
        }
        Command::Logout => {
            let session = resume_or_fail(&accounts).await?;
            let name = session.name().to_owned();
            accounts.log_out(session).await?;
            println!("Logged out {name}.");
        }
        Command::Lessons => {
            let session = resume_or_fail(&accounts).await?;
            print_lessons(&progress, &session);
        }
        Command::Complete => {
            let lesson = parsed.lesson.ok_or(ArgsError::MissingFlag {
                flag: "<lesson-id>",
            })?;
            let mut session = resume_or_fail(&accounts).await?;
            let newly = progress.complete_lesson(&mut session, lesson).await?;
            if newly {
                println!("Lesson {lesson} marked complete.");
            } else {
                println!("Lesson {lesson} was already complete.");
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
