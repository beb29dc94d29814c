use std::fmt;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::{
    AddressBar, AppServices, Clock, IgnoreReason, IntakeOutcome, IntakeService,
    MemoryAddressBar, MotivationFetcher, ProgressService,
};
use stamp_core::StampCatalog;
use stamp_core::intake::share_url;
use stamp_core::model::ClaimOutcome;
use tracing_subscriber::EnvFilter;
use ui::{App, UiApp, build_app_context};
use url::Url;

const DEFAULT_DB_URL: &str = "sqlite:stamp-card.sqlite3";
const DEFAULT_ORIGIN: &str = "https://stamps.local/";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    MissingVisitUrl,
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidUrl { flag: &'static str, raw: String },
    ResetNotConfirmed,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingVisitUrl => write!(f, "visit requires a URL"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidUrl { flag, raw } => write!(f, "invalid {flag} value: {raw}"),
            ArgsError::ResetNotConfirmed => {
                write!(f, "reset erases every stamp; pass --yes to confirm")
            }
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

fn parse_url(raw: String, flag: &'static str) -> Result<Url, ArgsError> {
    Url::parse(raw.trim()).map_err(|_| ArgsError::InvalidUrl { flag, raw })
}

struct DesktopApp {
    services: AppServices,
    address_bar: Arc<MemoryAddressBar>,
    share_base: Url,
}

impl UiApp for DesktopApp {
    fn catalog(&self) -> Arc<StampCatalog> {
        self.services.catalog()
    }

    fn progress(&self) -> Arc<ProgressService> {
        self.services.progress()
    }

    fn intake(&self) -> Arc<IntakeService> {
        self.services.intake()
    }

    fn address_bar(&self) -> Arc<MemoryAddressBar> {
        Arc::clone(&self.address_bar)
    }

    fn share_base(&self) -> Url {
        self.share_base.clone()
    }
}

struct Args {
    db_url: String,
    origin: Url,
    url: Option<Url>,
    confirmed: bool,
    purge: bool,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  stamp-card [ui] [--db <sqlite_url>] [--origin <url>] [--url <visit_url>]");
    eprintln!("  stamp-card visit <visit_url> [--db <sqlite_url>] [--origin <url>]");
    eprintln!("  stamp-card status [--db <sqlite_url>] [--origin <url>]");
    eprintln!("  stamp-card claim  [--db <sqlite_url>] [--origin <url>]");
    eprintln!("  stamp-card reset --yes [--purge] [--db <sqlite_url>] [--origin <url>]");
    eprintln!("  stamp-card links [--origin <url>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db {DEFAULT_DB_URL}");
    eprintln!("  --origin {DEFAULT_ORIGIN}");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  STAMP_DB_URL, STAMP_ORIGIN, RUST_LOG");
    eprintln!("  STAMP_AI_API_KEY, STAMP_AI_BASE_URL, STAMP_AI_MODEL, STAMP_AI_TIMEOUT_SECS");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    Visit,
    Status,
    Claim,
    Reset,
    Links,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "visit" => Some(Self::Visit),
            "status" => Some(Self::Status),
            "claim" => Some(Self::Claim),
            "reset" => Some(Self::Reset),
            "links" => Some(Self::Links),
            _ => None,
        }
    }

    fn uses_storage(self) -> bool {
        !matches!(self, Self::Links)
    }
}

impl Args {
    fn parse(cmd: Command, args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = normalize_sqlite_url(
            std::env::var("STAMP_DB_URL")
                .ok()
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_DB_URL.into()),
        );
        let mut origin = match std::env::var("STAMP_ORIGIN") {
            Ok(raw) if !raw.trim().is_empty() => parse_url(raw, "STAMP_ORIGIN")?,
            _ => parse_url(DEFAULT_ORIGIN.into(), "STAMP_ORIGIN")?,
        };
        let mut url = None;
        let mut confirmed = false;
        let mut purge = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--origin" => {
                    origin = parse_url(require_value(args, "--origin")?, "--origin")?;
                }
                "--url" if cmd == Command::Ui => {
                    url = Some(parse_url(require_value(args, "--url")?, "--url")?);
                }
                "--yes" if cmd == Command::Reset => confirmed = true,
                "--purge" if cmd == Command::Reset => purge = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ if cmd == Command::Visit && url.is_none() && !arg.starts_with("--") => {
                    url = Some(parse_url(arg, "visit")?);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        if cmd == Command::Visit && url.is_none() {
            return Err(ArgsError::MissingVisitUrl);
        }
        if cmd == Command::Reset && !confirmed {
            return Err(ArgsError::ResetNotConfirmed);
        }

        Ok(Self {
            db_url,
            origin,
            url,
            confirmed,
            purge,
        })
    }

    /// Key the local store is partitioned by, like a browser origin.
    fn scope(&self) -> String {
        self.origin.origin().ascii_serialization()
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

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // No subcommand means the desktop card.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Ui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Ui,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(cmd, &mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    if !cmd.uses_storage() {
        print_links(&parsed.origin);
        return Ok(());
    }

    prepare_sqlite_file(&parsed.db_url)?;
    let services = AppServices::new_sqlite(
        &parsed.db_url,
        &parsed.scope(),
        Clock::system(),
        StampCatalog::standard(),
        MotivationFetcher::from_env(),
    )
    .await?;
    tracing::debug!(db = %parsed.db_url, scope = %parsed.scope(), "storage ready");

    match cmd {
        Command::Ui => {
            let start = parsed.url.clone().unwrap_or_else(|| parsed.origin.clone());
            let app = DesktopApp {
                services,
                address_bar: Arc::new(MemoryAddressBar::new(start)),
                share_base: parsed.origin.clone(),
            };
            let app: Arc<dyn UiApp> = Arc::new(app);
            let context = build_app_context(&app);

            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("Stamp Card")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
        Command::Visit => {
            let start = parsed.url.clone().unwrap_or_else(|| parsed.origin.clone());
            let address_bar = MemoryAddressBar::new(start);
            let report = services.intake().handle_visit_and_fetch(&address_bar).await;
            match report.outcome {
                IntakeOutcome::Recorded { record, .. } => {
                    println!("Collected stamp #{}: {}", record.id(), record.name());
                }
                IntakeOutcome::AlreadyCollected(id) => {
                    println!("Stamp #{id} was already collected.");
                }
                IntakeOutcome::Ignored(reason) => println!("{}", describe_ignored(&reason)),
            }
            if let Some(motivation) = report.motivation {
                println!();
                println!("{}", motivation.message);
                println!("{}", motivation.encouragement);
            }
            println!("Address: {}", address_bar.current_url());
            print_status(&services);
            Ok(())
        }
        Command::Status => {
            print_status(&services);
            Ok(())
        }
        Command::Claim => {
            match services.progress().claim_reward().await {
                ClaimOutcome::Claimed => println!("Reward claimed. Show this to the staff."),
                ClaimOutcome::AlreadyClaimed => println!("The reward was already claimed."),
                ClaimOutcome::Incomplete { collected, total } => {
                    println!("Card incomplete: {collected} / {total} stamps.");
                }
            }
            Ok(())
        }
        Command::Reset => {
            debug_assert!(parsed.confirmed);
            services.progress().reset().await;
            if parsed.purge {
                services.persistence().clear().await;
                println!("All stamps cleared and the stored record removed.");
            } else {
                println!("All stamps cleared.");
            }
            Ok(())
        }
        Command::Links => {
            print_links(&parsed.origin);
            Ok(())
        }
    }
}

fn describe_ignored(reason: &IgnoreReason) -> String {
    match reason {
        IgnoreReason::NoPoint => "No point in the address; nothing to collect.".into(),
        IgnoreReason::Malformed(raw) => format!("Ignored malformed point value: {raw:?}"),
        IgnoreReason::OutOfRange(id) => format!("Ignored unknown point #{id}"),
    }
}

fn print_status(services: &AppServices) {
    let catalog = services.catalog();
    let progress = services.progress().snapshot();
    println!("{} / {} stamps", progress.collected(), catalog.total());
    for definition in catalog.iter() {
        match progress.find(definition.index()) {
            Some(record) => println!(
                "  [x] #{} {} ({})",
                definition.index(),
                definition.name(),
                record.collected_at().to_rfc3339()
            ),
            None => println!("  [ ] #{} {}", definition.index(), definition.name()),
        }
    }
    if progress.reward_claimed() {
        println!("Reward claimed.");
    } else if progress.is_complete(catalog.total()) {
        println!("Card complete: the reward can be claimed.");
    }
}

fn print_links(origin: &Url) {
    let catalog = StampCatalog::standard();
    for id in catalog.ids() {
        println!("#{id} {}", share_url(origin, id));
    }
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
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
