//! modsync: manifest-diff synchronization for a mod directory
//!
//! Compares a local directory against a remote server's content manifest,
//! downloads what is stale or missing, and deletes what the server dropped.

mod progress;

use std::path::PathBuf;

use clap::builder::styling::{AnsiColor, Effects};
use clap::{Parser, Subcommand, builder::Styles};
use color_eyre::Result;
use color_eyre::eyre::{bail, eyre};

use modsync_core::Config;
use modsync_transport::{ExportOutcome, Session};

use progress::SyncProgress;

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default())
    .valid(AnsiColor::Green.on_default())
    .invalid(AnsiColor::Red.on_default());

#[derive(Parser)]
#[command(name = "modsync")]
#[command(version)]
#[command(styles = STYLES)]
#[command(about = "Keep a mod directory in sync with a remote server")]
#[command(long_about = r#"
modsync keeps a local mod directory identical to a remote file server.

The server publishes a content manifest (filename -> SHA-256 digest) at
/manifest.json and file bytes under /mods/. modsync hashes the local
directory, diffs it against the manifest, downloads stale or missing files,
and deletes files the server no longer lists.

Examples:
  modsync check                          Probe server availability
  modsync compare ./mods                 Show the plan, change nothing
  modsync sync ./mods                    Apply the plan
  modsync export ./mods -o manifest.json Write the local manifest
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file location
    #[arg(long, global = true, default_value = "modsync.toml")]
    config: PathBuf,

    /// Override the configured server URL
    #[arg(long, global = true)]
    server: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Probe server availability (5 second timeout)
    Check,

    /// Show what a sync would download and delete, without doing it
    Compare {
        /// Directory to compare (defaults to the configured one)
        dir: Option<PathBuf>,

        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },

    /// Download stale or missing files and delete obsolete ones
    Sync {
        /// Directory to sync (defaults to the configured one)
        dir: Option<PathBuf>,
    },

    /// Write the local directory's manifest to a file
    Export {
        /// Directory to snapshot (defaults to the configured one)
        dir: Option<PathBuf>,

        /// Destination file
        #[arg(short, long)]
        out: PathBuf,
    },

    /// Remember a sync directory for future runs
    SetDir {
        /// Directory to remember
        dir: PathBuf,
    },

    /// Print the remembered sync directory
    Dir,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let mut config = Config::load(&cli.config)?;
    if let Some(server) = cli.server.clone() {
        config.server_url = Some(server);
    }

    match cli.command {
        Commands::SetDir { dir } => set_dir_command(config, &cli.config, dir)?,
        Commands::Dir => match config.game_dir {
            Some(dir) => println!("{}", dir.display()),
            None => println!("no directory configured"),
        },
        Commands::Check => check_command(&Session::new(config)).await?,
        Commands::Compare { dir, json } => {
            compare_command(&Session::new(config), dir, json).await?;
        }
        Commands::Sync { dir } => sync_command(&Session::new(config), dir).await?,
        Commands::Export { dir, out } => {
            export_command(&Session::new(config), dir, out).await?;
        }
    }

    Ok(())
}

/// Explicit directory argument, falling back to the configured one
fn resolve_dir(session: &Session, dir: Option<PathBuf>) -> Result<PathBuf> {
    dir.or_else(|| session.game_dir().map(PathBuf::from))
        .ok_or_else(|| eyre!("no directory selected (pass DIR or run `modsync set-dir`)"))
}

async fn check_command(session: &Session) -> Result<()> {
    let availability = session.check_availability().await?;
    if availability.online {
        println!("online: {}", availability.url);
    } else {
        let cause = availability.error.unwrap_or_else(|| "unknown".to_string());
        println!("offline: {} ({cause})", availability.url);
    }
    Ok(())
}

async fn compare_command(session: &Session, dir: Option<PathBuf>, json: bool) -> Result<()> {
    let dir = resolve_dir(session, dir)?;
    let plan = session.compare(&dir).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    if plan.is_empty() {
        println!("already in sync");
        return Ok(());
    }

    for name in &plan.to_download {
        println!("+ {name}");
    }
    for name in &plan.to_delete {
        println!("- {name}");
    }
    Ok(())
}

async fn sync_command(session: &Session, dir: Option<PathBuf>) -> Result<()> {
    let dir = resolve_dir(session, dir)?;

    let progress = SyncProgress::new();
    progress.syncing(&dir.display().to_string());

    let report = session.execute_sync(&dir).await?;
    if report.downloaded.is_empty() && report.deleted.is_empty() {
        progress.unchanged();
    } else {
        progress.synced(report.downloaded.len(), report.deleted.len());
    }
    Ok(())
}

async fn export_command(session: &Session, dir: Option<PathBuf>, out: PathBuf) -> Result<()> {
    let dir = resolve_dir(session, dir)?;

    let progress = SyncProgress::new();
    match session.export_manifest(&dir, Some(out)).await? {
        ExportOutcome::Written(path) => progress.exported(&path.display().to_string()),
        ExportOutcome::Cancelled => println!("export cancelled"),
    }
    Ok(())
}

fn set_dir_command(mut config: Config, config_path: &PathBuf, dir: PathBuf) -> Result<()> {
    if !dir.is_dir() {
        bail!("not a directory: {}", dir.display());
    }
    config.game_dir = Some(dir.clone());
    config.store(config_path)?;
    println!("sync directory set to {}", dir.display());
    Ok(())
}
