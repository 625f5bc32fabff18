//! trainee-progress CLI: the `tprog` command.
//!
//! Registers trainees and admins, logs in, submits chapter results, and
//! reads progress and reports from a data directory.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};

use trainee_progress::time::{format_micros, micros_to_rfc3339};
use trainee_progress::{
    summarize, ChapterSubmission, DirIdentityStore, DirProgressStore, ProgressRecord, RecordId,
    Role, SigningKey, TrackerConfig, TrackerService,
};

type Service = TrackerService<DirIdentityStore, DirProgressStore>;

const CONFIG_FILE: &str = "config.toml";
const TOKEN_FILE: &str = "token";
const LISTING_TIME: &str = "%Y-%m-%d %H:%M:%S UTC";

// ── Directory helpers ─────────────────────────────────────────────────────────

fn default_data_dir() -> PathBuf {
    match std::env::var("HOME") {
        Ok(home) => PathBuf::from(home).join(".trainee-progress"),
        Err(_) => PathBuf::from(".trainee-progress"),
    }
}

fn config_path(cli: &Cli) -> PathBuf {
    cli.config
        .clone()
        .unwrap_or_else(|| cli.data_dir.join(CONFIG_FILE))
}

fn token_path(data_dir: &Path) -> PathBuf {
    data_dir.join(TOKEN_FILE)
}

// ── Input helpers ─────────────────────────────────────────────────────────────

fn read_password(given: Option<String>, prompt: &str) -> Result<String> {
    if let Some(password) = given {
        return Ok(password);
    }
    eprint!("{prompt}");
    let mut password = String::new();
    std::io::stdin()
        .read_line(&mut password)
        .context("failed to read password")?;
    Ok(password.trim_end_matches(['\r', '\n']).to_string())
}

fn read_submission(file: &Path) -> Result<Vec<ChapterSubmission>> {
    let text = if file == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read submission from stdin")?;
        buf
    } else {
        std::fs::read_to_string(file)
            .with_context(|| format!("failed to read {}", file.display()))?
    };
    serde_json::from_str(&text).context("submission must be a JSON array of {chapter, score, status}")
}

// ── Service construction ──────────────────────────────────────────────────────

fn load_config(cli: &Cli) -> Result<TrackerConfig> {
    let path = config_path(cli);
    if path.exists() {
        TrackerConfig::load(&path).with_context(|| format!("failed to load {}", path.display()))
    } else {
        TrackerConfig::from_env().map_err(|e| {
            anyhow!("{e}\nno configuration at {}; run `tprog init` first", path.display())
        })
    }
}

fn open_service(cli: &Cli) -> Result<Service> {
    let config = load_config(cli)?;
    log::debug!(
        "opening data directory {} ({} chapters, {} tokens)",
        cli.data_dir.display(),
        config.curriculum.len(),
        config.token_algorithm
    );
    let identities = DirIdentityStore::new(cli.data_dir.join("identities"))
        .context("failed to open identity store")?;
    let progress = DirProgressStore::new(cli.data_dir.join("progress"))
        .context("failed to open progress store")?;
    Ok(TrackerService::new(config, identities, progress)?)
}

fn session_token(cli: &Cli) -> Result<String> {
    if let Some(token) = &cli.token {
        return Ok(token.clone());
    }
    let path = token_path(&cli.data_dir);
    let token = std::fs::read_to_string(&path)
        .map_err(|_| anyhow!("not logged in (no --token and no {})", path.display()))?;
    Ok(token.trim().to_string())
}

// ── CLI structure ─────────────────────────────────────────────────────────────

/// trainee-progress CLI: track trainee progress through a simulation course.
#[derive(Parser, Debug)]
#[command(name = "tprog", about = "trainee-progress CLI", version)]
struct Cli {
    /// Data directory holding identities, records, and the saved token
    #[arg(long, global = true, default_value_os_t = default_data_dir())]
    data_dir: PathBuf,

    /// Configuration file (default: <data-dir>/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Bearer token (default: the token saved by `tprog login`)
    #[arg(long, global = true)]
    token: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create the data directory and a configuration with a fresh signing key
    Init {
        /// Overwrite an existing configuration
        #[arg(long)]
        force: bool,
    },

    /// Register a trainee or admin
    Register {
        #[arg(long)]
        email: String,

        /// Display name printed on reports
        #[arg(long)]
        name: String,

        /// Trainee or Admin
        #[arg(long, default_value = "Trainee")]
        role: String,

        /// Password (read from stdin if omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Log in and save the bearer token in the data directory
    Login {
        #[arg(long)]
        email: String,

        /// Password (read from stdin if omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Show the identity the current token belongs to
    Whoami,

    /// Submit chapter results for a trainee
    Submit {
        /// Email of the trainee the results belong to
        #[arg(long)]
        email: String,

        /// JSON file with an array of {chapter, score, status}; `-` for stdin
        #[arg(long)]
        file: PathBuf,
    },

    /// Show progress history, newest first
    Progress {
        /// Whose progress to show (default: your own)
        #[arg(long)]
        email: Option<String>,

        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render the report for one progress record
    Report {
        /// Record ID
        #[arg(long)]
        id: u64,

        /// Output path (default: the report's file name in the current directory)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// List registered identities (admin only)
    Users {
        #[arg(long, default_value_t = 0)]
        skip: usize,

        #[arg(long, default_value_t = 100)]
        limit: usize,
    },

    /// List every progress record, newest first (admin only)
    Sessions {
        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let result = match &cli.command {
        Commands::Init { force } => cmd_init(&cli, *force),
        Commands::Register {
            email,
            name,
            role,
            password,
        } => cmd_register(&cli, email, name, role, password.clone()),
        Commands::Login { email, password } => cmd_login(&cli, email, password.clone()),
        Commands::Whoami => cmd_whoami(&cli),
        Commands::Submit { email, file } => cmd_submit(&cli, email, file),
        Commands::Progress { email, json } => cmd_progress(&cli, email.as_deref(), *json),
        Commands::Report { id, output } => cmd_report(&cli, *id, output.as_deref()),
        Commands::Users { skip, limit } => cmd_users(&cli, *skip, *limit),
        Commands::Sessions { json } => cmd_sessions(&cli, *json),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

// ── Command implementations ───────────────────────────────────────────────────

/// `tprog init [--force]`
fn cmd_init(cli: &Cli, force: bool) -> Result<()> {
    let path = config_path(cli);
    if path.exists() && !force {
        return Err(anyhow!(
            "configuration already exists at {} (use --force to replace it)",
            path.display()
        ));
    }

    std::fs::create_dir_all(&cli.data_dir).context("failed to create data directory")?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).context("failed to create configuration directory")?;
    }

    let config = TrackerConfig {
        signing_key: SigningKey::generate(),
        ..TrackerConfig::default()
    };
    std::fs::write(&path, config.to_toml_string()?)
        .with_context(|| format!("failed to write {}", path.display()))?;

    println!("Initialized {}", cli.data_dir.display());
    println!("  Config: {}", path.display());
    if cli.verbose {
        println!("  Chapters: {}", config.curriculum.len());
        println!("  Token TTL: {} day(s)", config.token_ttl_days);
    }
    Ok(())
}

/// `tprog register --email EMAIL --name NAME [--role ROLE] [--password PW]`
fn cmd_register(
    cli: &Cli,
    email: &str,
    name: &str,
    role: &str,
    password: Option<String>,
) -> Result<()> {
    let role: Role = role.parse()?;
    let service = open_service(cli)?;
    let password = read_password(password, "Password: ")?;

    let identity = service.register(email, &password, role, name)?;

    println!("Registered {}", identity.email);
    println!("  Name: {}", identity.name);
    println!("  Role: {}", identity.role);
    Ok(())
}

/// `tprog login --email EMAIL [--password PW]`
fn cmd_login(cli: &Cli, email: &str, password: Option<String>) -> Result<()> {
    let service = open_service(cli)?;
    let password = read_password(password, "Password: ")?;

    let token = service.login(email, &password)?;
    let path = token_path(&cli.data_dir);
    std::fs::write(&path, &token.access_token)
        .with_context(|| format!("failed to save token to {}", path.display()))?;

    println!("Logged in as {email}");
    println!(
        "  Expires: {}",
        format_micros(token.expires_at.saturating_mul(1_000_000), LISTING_TIME)
    );
    if cli.verbose {
        println!("  Token: {}", token.access_token);
    }
    Ok(())
}

/// `tprog whoami`
fn cmd_whoami(cli: &Cli) -> Result<()> {
    let service = open_service(cli)?;
    let profile = service.whoami(&session_token(cli)?)?;

    println!("{}", profile.email);
    println!("  Name:       {}", profile.name);
    println!("  Role:       {}", profile.role);
    println!("  Registered: {}", micros_to_rfc3339(profile.created_at));
    Ok(())
}

/// `tprog submit --email EMAIL --file PATH`
fn cmd_submit(cli: &Cli, email: &str, file: &Path) -> Result<()> {
    let entries = read_submission(file)?;
    let service = open_service(cli)?;

    let record = service.submit_progress(email, &entries)?;

    println!("Stored record {} for {}", record.id, record.owner);
    if cli.verbose {
        print_chapters(&record);
    }
    Ok(())
}

/// `tprog progress [--email EMAIL] [--json]`
fn cmd_progress(cli: &Cli, email: Option<&str>, json: bool) -> Result<()> {
    let service = open_service(cli)?;
    let token = session_token(cli)?;
    let target = match email {
        Some(email) => email.to_string(),
        None => service.whoami(&token)?.email,
    };

    let records = service.fetch_progress(&token, &target)?;
    print_records(&records, json, cli.verbose)
}

/// `tprog report --id ID [--output PATH]`
fn cmd_report(cli: &Cli, id: u64, output: Option<&Path>) -> Result<()> {
    let service = open_service(cli)?;
    let report = service.fetch_report(&session_token(cli)?, RecordId(id))?;

    let path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&report.file_name));
    std::fs::write(&path, &report.bytes)
        .with_context(|| format!("failed to write {}", path.display()))?;

    println!("Wrote {}", path.display());
    Ok(())
}

/// `tprog users [--skip N] [--limit N]`
fn cmd_users(cli: &Cli, skip: usize, limit: usize) -> Result<()> {
    let service = open_service(cli)?;
    let users = service.list_identities(&session_token(cli)?, skip, limit)?;

    if users.is_empty() {
        println!("No identities found");
        return Ok(());
    }

    println!("{:<32} {:<8} {:<24} REGISTERED", "EMAIL", "ROLE", "NAME");
    println!("{}", "-".repeat(88));
    for user in &users {
        println!(
            "{:<32} {:<8} {:<24} {}",
            user.email,
            user.role,
            user.name,
            format_micros(user.created_at, LISTING_TIME)
        );
    }
    Ok(())
}

/// `tprog sessions [--json]`
fn cmd_sessions(cli: &Cli, json: bool) -> Result<()> {
    let service = open_service(cli)?;
    let records = service.list_all_progress(&session_token(cli)?)?;
    print_records(&records, json, cli.verbose)
}

// ── Output helpers ────────────────────────────────────────────────────────────

fn print_records(records: &[ProgressRecord], json: bool, verbose: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No progress records found");
        return Ok(());
    }

    println!(
        "{:<6} {:<32} {:<24} {:<10} AVERAGE",
        "ID", "OWNER", "SUBMITTED", "COMPLETED"
    );
    println!("{}", "-".repeat(84));
    for record in records {
        let summary = summarize(&record.chapters);
        println!(
            "{:<6} {:<32} {:<24} {:<10} {:.1}",
            record.id.to_string(),
            record.owner,
            format_micros(record.created_at, LISTING_TIME),
            format!("{}/{}", summary.completed_count, summary.total_count),
            summary.average_score
        );
        if verbose {
            print_chapters(record);
        }
    }
    Ok(())
}

fn print_chapters(record: &ProgressRecord) {
    for result in &record.chapters {
        println!(
            "    {:<28} {:<4} {}",
            result.chapter.as_str(),
            result.score.to_string(),
            result.status
        );
    }
}
