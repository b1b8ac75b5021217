//! `duet`: pairwise rating from the terminal or over HTTP.
//!
//! # Usage
//!
//! ```
//! duet rate                    # rate pairs interactively
//! duet serve                   # expose the JSON API on host:port
//! duet progress
//! duet --config ~/duet.toml migrate
//! ```
//!
//! Configuration is read from `duet.toml` (see [`settings`]) and `DUET_*`
//! environment variables.

mod rate;
mod settings;

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use clap::{Parser, Subcommand};
use duet_api::AppState;
use duet_core::{
  answer::canonical_header,
  log::AnswerLog as _,
  reader::canonicalize,
  scheduler::SchedulerState,
  session::Session,
};
use duet_store_sqlite::SqliteLog;
use rand_core::OsRng;
use settings::Settings;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "duet", author, version, about = "Pairwise rating engine")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, global = true, default_value = "duet.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Serve the JSON API.
  Serve,
  /// Rate pairs interactively on this terminal.
  Rate,
  /// Print progress and the current anchor.
  Progress,
  /// Rewrite a log with a legacy header into the canonical layout.
  Migrate,
  /// Delete every answer, leaving only the header.
  Reset {
    /// Required; there is no undo.
    #[arg(long)]
    yes: bool,
  },
  /// Print the argon2 hash for a password entered on stdin.
  HashPassword,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Logs go to stderr so they never interleave with `rate` prompts.
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  match cli.command {
    Command::HashPassword => hash_password(),
    Command::Serve => {
      let (settings, log) = load(&cli.config).await?;
      serve(settings, log).await
    }
    Command::Rate => {
      let (settings, log) = load(&cli.config).await?;
      let mut session = Session::open(log, settings.catalog()).await?;
      let input = tokio::io::BufReader::new(tokio::io::stdin());
      rate::run(&mut session, input, &mut std::io::stdout().lock()).await
    }
    Command::Progress => {
      let (settings, log) = load(&cli.config).await?;
      progress(settings, log).await
    }
    Command::Migrate => migrate(load(&cli.config).await?.1).await,
    Command::Reset { yes } => reset(load(&cli.config).await?.1, yes).await,
  }
}

/// Read settings and open the answer log they point at.
async fn load(config: &Path) -> anyhow::Result<(Settings, SqliteLog)> {
  let settings = Settings::load(config)?;
  let log = open_log(&settings).await?;
  Ok((settings, log))
}

async fn open_log(settings: &Settings) -> anyhow::Result<SqliteLog> {
  if let Some(dir) = settings.log_path.parent()
    && !dir.as_os_str().is_empty()
  {
    std::fs::create_dir_all(dir)
      .with_context(|| format!("failed to create {}", dir.display()))?;
  }
  SqliteLog::open(&settings.log_path)
    .await
    .with_context(|| format!("failed to open answer log at {:?}", settings.log_path))
}

// ─── Commands ─────────────────────────────────────────────────────────────────

async fn serve(settings: Settings, log: SqliteLog) -> anyhow::Result<()> {
  let session = Session::open(log, settings.catalog()).await?;
  let auth = settings.auth();
  if auth.is_none() {
    tracing::warn!("no credentials configured; the API is open");
  }

  let app = duet_api::api_router(AppState::new(session, auth));
  let address = format!("{}:{}", settings.host, settings.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;
  Ok(())
}

async fn progress(settings: Settings, log: SqliteLog) -> anyhow::Result<()> {
  let session = Session::open(log, settings.catalog()).await?;
  let global = session.global_progress();
  println!(
    "{}/{} pairs rated ({:.1}%)",
    global.answered,
    global.total,
    global.ratio() * 100.0
  );

  match session.state() {
    SchedulerState::AnchorActive(anchor) => {
      if let Some(p) = session.anchor_progress() {
        println!("anchor: {anchor} ({}/{})", p.answered, p.total);
      }
    }
    SchedulerState::AllDone => println!("all pairs rated"),
    SchedulerState::NoAnchor => println!("nothing to rate"),
  }
  Ok(())
}

async fn migrate(log: SqliteLog) -> anyhow::Result<()> {
  let rows = log.read_all().await?;
  let Some((header, data)) = rows.split_first() else {
    println!("answer log is empty; nothing to migrate");
    return Ok(());
  };

  let Some(migration) = canonicalize(&header.cells, data) else {
    println!("header {:?} needs no migration", header.cells);
    return Ok(());
  };

  let mut rows = migration.rows.into_iter();
  let new_header = rows.next().unwrap_or_else(canonical_header);
  let rows: Vec<_> = rows.collect();
  let kept = rows.len();

  log.clear_and_reset(new_header).await?;
  log.append_rows(rows).await?;

  tracing::info!(kept, dropped = migration.dropped, "answer log migrated");
  println!("migrated {kept} rows ({} unreadable rows dropped)", migration.dropped);
  Ok(())
}

async fn reset(log: SqliteLog, yes: bool) -> anyhow::Result<()> {
  if !yes {
    anyhow::bail!("refusing to delete answers without --yes");
  }
  let before = log.row_count().await?;
  log.clear_and_reset(canonical_header()).await?;
  println!("deleted {} answers", before.saturating_sub(1));
  Ok(())
}

fn hash_password() -> anyhow::Result<()> {
  let password = read_password()?;
  let salt = SaltString::generate(&mut OsRng);
  let hash = Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map_err(|e| anyhow::anyhow!("argon2 error: {e}"))?
    .to_string();
  println!("{hash}");
  Ok(())
}

/// Read a password from stdin.
fn read_password() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  print!("Password: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  io::stdin().lock().read_line(&mut line)?;
  Ok(line.trim_end_matches(['\n', '\r']).to_string())
}
