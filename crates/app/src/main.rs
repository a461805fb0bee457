use std::fmt;

use reader_core::Clock;
use reader_core::model::{
    ComprehensionQuestion, ComprehensionText, ContentId, Phoneme, PunctuationQuestion, Sentence,
    Subject, TextId, Word, unlock_flags,
};
use services::{AppServices, ReminderSchedule, ReminderService};
use storage::repository::Storage;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidSubject { raw: String },
    InvalidLevel { raw: String },
    InvalidDbUrl { raw: String },
    InvalidTime { raw: String },
    MissingFlag { flag: &'static str },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidSubject { raw } => write!(f, "invalid --subject value: {raw}"),
            ArgsError::InvalidLevel { raw } => write!(f, "invalid --level value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidTime { raw } => write!(f, "invalid time value: {raw}"),
            ArgsError::MissingFlag { flag } => write!(f, "{flag} is required"),
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

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- seed          [--db <sqlite_url>]");
    eprintln!("  cargo run -p app -- curriculum    [--db <sqlite_url>]");
    eprintln!("  cargo run -p app -- levels        --subject <key> [--db <sqlite_url>]");
    eprintln!("  cargo run -p app -- complete      --subject <key> --level <n> [--db <sqlite_url>]");
    eprintln!("  cargo run -p app -- next-reminder [--hour <0-23>] [--minute <0-59>]");
    eprintln!();
    eprintln!("Subject keys:");
    for subject in Subject::ALL {
        eprintln!("  {subject}");
    }
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite:reader.sqlite3  (or READER_DB_URL)");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Seed,
    Curriculum,
    Levels,
    Complete,
    NextReminder,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "seed" => Some(Self::Seed),
            "curriculum" => Some(Self::Curriculum),
            "levels" => Some(Self::Levels),
            "complete" => Some(Self::Complete),
            "next-reminder" => Some(Self::NextReminder),
            _ => None,
        }
    }
}

struct Args {
    db_url: String,
    subject: Option<Subject>,
    level: Option<u32>,
    hour: u32,
    minute: u32,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("READER_DB_URL")
            .ok()
            .map_or_else(|| "sqlite://reader.sqlite3".into(), normalize_sqlite_url);
        let mut subject = None;
        let mut level = None;
        let mut hour = 17;
        let mut minute = 0;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--subject" => {
                    let value = require_value(args, "--subject")?;
                    subject = Some(
                        Subject::from_key(&value).ok_or(ArgsError::InvalidSubject { raw: value })?,
                    );
                }
                "--level" => {
                    let value = require_value(args, "--level")?;
                    let parsed: u32 = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidLevel { raw: value.clone() })?;
                    if parsed == 0 {
                        return Err(ArgsError::InvalidLevel { raw: value });
                    }
                    level = Some(parsed);
                }
                "--hour" => {
                    let value = require_value(args, "--hour")?;
                    hour = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidTime { raw: value })?;
                }
                "--minute" => {
                    let value = require_value(args, "--minute")?;
                    minute = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidTime { raw: value })?;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            subject,
            level,
            hour,
            minute,
        })
    }

    fn require_subject(&self) -> Result<Subject, ArgsError> {
        self.subject
            .ok_or(ArgsError::MissingFlag { flag: "--subject" })
    }

    fn require_level(&self) -> Result<u32, ArgsError> {
        self.level.ok_or(ArgsError::MissingFlag { flag: "--level" })
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
    let args = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    if cmd == Command::NextReminder {
        let schedule =
            ReminderSchedule::daily_at(args.hour, args.minute).ok_or(ArgsError::InvalidTime {
                raw: format!("{}:{:02}", args.hour, args.minute),
            })?;
        let service = ReminderService::new(Clock::default_clock(), schedule);
        println!("next practice reminder: {}", service.next_reminder());
        return Ok(());
    }

    // Open + migrate SQLite at startup. Keep this in the binary glue so
    // core/services stay pure.
    prepare_sqlite_file(&args.db_url)?;
    let storage = Storage::sqlite(&args.db_url).await?;
    let services = AppServices::from_storage(&storage);

    match cmd {
        Command::Seed => seed(&storage).await,
        Command::Curriculum => show_curriculum(&services).await,
        Command::Levels => show_levels(&services, args.require_subject()?).await,
        Command::Complete => {
            complete_level(&services, args.require_subject()?, args.require_level()?).await
        }
        Command::NextReminder => Ok(()),
    }
}

async fn show_curriculum(services: &AppServices) -> Result<(), Box<dyn std::error::Error>> {
    let progress = services.progress().load().await?;
    let units = services.curriculum().units(&progress).await?;

    if units.is_empty() {
        println!("no units yet; run `seed` first");
        return Ok(());
    }

    for unit in &units {
        println!(
            "unit {} ({:.0}% complete)",
            unit.id(),
            unit.progress() * 100.0
        );
        let flags = unlock_flags(unit.levels());
        for (level, unlocked) in unit.levels().iter().zip(flags) {
            println!(
                "  {:>22} level {}  [{}]",
                level.subject.to_string(),
                level.number,
                marker(level.is_completed, unlocked)
            );
        }
    }
    Ok(())
}

async fn show_levels(
    services: &AppServices,
    subject: Subject,
) -> Result<(), Box<dyn std::error::Error>> {
    let progress = services.progress().load().await?;
    let levels = services.curriculum().levels_for(subject, &progress).await?;

    if levels.is_empty() {
        println!("{subject}: no content yet");
        return Ok(());
    }

    let flags = unlock_flags(&levels);
    for (level, unlocked) in levels.iter().zip(flags) {
        println!(
            "{subject} level {}  [{}]",
            level.number,
            marker(level.is_completed, unlocked)
        );
    }
    Ok(())
}

fn marker(is_completed: bool, unlocked: bool) -> &'static str {
    if is_completed {
        "done"
    } else if unlocked {
        "next"
    } else {
        "locked"
    }
}

async fn complete_level(
    services: &AppServices,
    subject: Subject,
    level: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let progress = services
        .progress()
        .mark_level_complete(subject, level)
        .await?;
    println!(
        "{subject}: completed levels {:?}",
        progress.completed_for(subject)
    );
    Ok(())
}

/// Starter content: two units of material (levels 1-4) for the quiz
/// subjects, plus one comprehension passage per level.
#[allow(clippy::too_many_lines)]
async fn seed(storage: &Storage) -> Result<(), Box<dyn std::error::Error>> {
    let phonemes = [
        ("sh", "ship", 1),
        ("ch", "chat", 1),
        ("th", "this", 2),
        ("wh", "whale", 2),
        ("ai", "rain", 3),
        ("ee", "tree", 3),
        ("oa", "boat", 4),
        ("igh", "light", 4),
    ];
    for (i, (symbol, sample_word, level)) in phonemes.iter().enumerate() {
        storage
            .content
            .upsert_phoneme(&Phoneme {
                id: ContentId::new(i as u64 + 1),
                symbol: (*symbol).into(),
                sample_word: (*sample_word).into(),
                level: *level,
            })
            .await?;
    }

    let words = [
        ("cat", 1),
        ("sun", 1),
        ("frog", 2),
        ("ship", 2),
        ("train", 3),
        ("sheep", 3),
        ("bright", 4),
        ("throat", 4),
    ];
    for (i, (text, level)) in words.iter().enumerate() {
        storage
            .content
            .upsert_word(&Word {
                id: ContentId::new(i as u64 + 1),
                text: (*text).into(),
                level: *level,
            })
            .await?;
    }

    let sentences = [
        ("The cat naps.", "cat", 1),
        ("I see the sun.", "sun", 1),
        ("The frog can hop.", "hop", 2),
        ("The ship is big.", "ship", 2),
        ("The train is on time.", "train", 3),
        ("The sheep eat grass.", "grass", 3),
        ("The light is bright.", "bright", 4),
        ("The boat floats away.", "floats", 4),
    ];
    for (i, (text, target_word, level)) in sentences.iter().enumerate() {
        storage
            .content
            .upsert_sentence(&Sentence {
                id: ContentId::new(i as u64 + 1),
                text: (*text).into(),
                target_word: (*target_word).into(),
                level: *level,
            })
            .await?;
    }

    let punctuation = [
        ("Which mark ends: We won", &["!", "?", ","][..], "!", 1),
        ("Which mark ends: The dog ran", &[".", ",", "?"][..], ".", 1),
        ("Which mark ends: Can you come", &["?", ".", "!"][..], "?", 2),
        ("Which mark pauses a list", &[",", ".", "?"][..], ",", 2),
        (
            "Which mark shows speech: Hello she said",
            &["\"", ".", ","][..],
            "\"",
            3,
        ),
        ("Which mark ends: Watch out", &["!", ",", "."][..], "!", 3),
        (
            "Which mark joins: It is Sam",
            &["'", ",", "."][..],
            "'",
            4,
        ),
        ("Which mark ends: Where is it", &["?", "!", ","][..], "?", 4),
    ];
    for (i, (prompt, options, answer, level)) in punctuation.iter().enumerate() {
        storage
            .content
            .upsert_punctuation(&PunctuationQuestion {
                id: ContentId::new(i as u64 + 1),
                prompt: (*prompt).into(),
                options: options.iter().map(|o| (*o).to_string()).collect(),
                answer: (*answer).into(),
                level: *level,
            })
            .await?;
    }

    let passages = [
        ("The Cat", "Pip the cat naps in the sun. Pip likes warm spots.", 1),
        ("The Pond", "A frog sits by the pond. It waits for flies.", 2),
        (
            "The Trip",
            "Sam rides the train to see Gran. The train is fast.",
            3,
        ),
        (
            "The Night Sky",
            "At night the stars come out. The moon gives light.",
            4,
        ),
    ];
    let questions = [
        ("Who naps in the sun?", &["Pip", "Sam"][..], "Pip"),
        ("What does the frog wait for?", &["flies", "rain"][..], "flies"),
        ("Who does Sam visit?", &["Gran", "Pip"][..], "Gran"),
        ("What gives light at night?", &["the moon", "the pond"][..], "the moon"),
    ];
    for (i, ((title, body, level), (prompt, options, answer))) in
        passages.iter().zip(questions.iter()).enumerate()
    {
        let text_id = TextId::new(i as u64 + 1);
        storage
            .content
            .upsert_comprehension_text(&ComprehensionText {
                id: text_id,
                title: (*title).into(),
                body: (*body).into(),
                level: *level,
            })
            .await?;
        storage
            .content
            .upsert_comprehension_question(&ComprehensionQuestion {
                id: ContentId::new(i as u64 + 1),
                text_id,
                prompt: (*prompt).into(),
                options: options.iter().map(|o| (*o).to_string()).collect(),
                answer: (*answer).into(),
            })
            .await?;
    }

    println!(
        "seeded {} phonemes, {} words, {} sentences, {} punctuation questions, {} passages",
        phonemes.len(),
        words.len(),
        sentences.len(),
        punctuation.len(),
        passages.len()
    );
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
