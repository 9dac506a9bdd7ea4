use std::env;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

use crate::app::App;
use crate::config::{ConfigLoader, CONFIG_ENV, STATE_ENV};

pub mod commands;

use self::commands::{ListArgs, ShowArgs};

#[derive(Parser, Debug)]
#[command(
    name = "mydiary",
    version,
    about = "Keyboard-first terminal diary, one entry per day"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Override the config file location (takes precedence over MYDIARY_CONFIG)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override the state directory holding logs (takes precedence over MYDIARY_STATE)
    #[arg(long)]
    pub state_dir: Option<PathBuf>,

    /// Minimum log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Launch the interactive diary (default)
    Tui,
    /// Print entries newest first, optionally filtered by tags
    List(ListArgs),
    /// Print the entry written on one day
    Show(ShowArgs),
    /// Print every tag in use
    Tags,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.config {
        env::set_var(CONFIG_ENV, path);
    }
    if let Some(path) = &cli.state_dir {
        env::set_var(STATE_ENV, path);
    }

    let loader = ConfigLoader::discover()?;
    loader.paths().ensure_directories()?;
    let command = cli.command.unwrap_or(Commands::Tui);

    let log_file = match command {
        Commands::Tui => Some(loader.paths().log_file()),
        _ => None,
    };
    init_tracing(&cli.log_level, log_file.as_deref())
        .with_context(|| format!("initialising logging at level {}", cli.log_level))?;

    let config = Arc::new(loader.load_or_init()?);
    match command {
        Commands::Tui => {
            let mut app = App::new(config);
            commands::run_tui(&mut app)
        }
        Commands::List(args) => commands::list_entries(config, args),
        Commands::Show(args) => commands::show_entry(config, args),
        Commands::Tags => commands::list_tags(config),
    }
}

/// Installs the global subscriber once. With a `log_file` the output goes
/// there without ANSI colours so the terminal UI is left untouched.
fn init_tracing(level: &str, log_file: Option<&Path>) -> Result<()> {
    static INIT: OnceCell<()> = OnceCell::new();
    INIT.get_or_try_init(|| {
        let env_filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
        match log_file {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)
                        .with_context(|| format!("creating log directory {}", parent.display()))?;
                }
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .with_context(|| format!("opening log file {}", path.display()))?;
                tracing::subscriber::set_global_default(file_subscriber(env_filter, file))
                    .context("installing log file subscriber")?;
            }
            None => {
                fmt()
                    .with_env_filter(env_filter)
                    .with_writer(std::io::stderr)
                    .init();
            }
        }
        Ok(())
    })
    .map(|_| ())
}

/// Plain-text subscriber for the log file, stamped in RFC 3339 UTC.
fn file_subscriber(env_filter: EnvFilter, file: File) -> impl tracing::Subscriber + Send + Sync {
    fmt()
        .with_env_filter(env_filter)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_ansi(false)
        .with_writer(Arc::new(file))
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn defaults_to_interactive_mode() {
        let cli = Cli::try_parse_from(["mydiary"]).expect("parse");
        assert!(cli.command.is_none());
        assert_eq!(cli.log_level, "info");
    }

    #[test]
    fn parses_repeated_tag_filters() {
        let cli = Cli::try_parse_from([
            "mydiary", "list", "--tag", "learning", "--tag", "coding", "--limit", "3",
        ])
        .expect("parse");
        assert_matches!(
            cli.command,
            Some(Commands::List(ListArgs { ref tags, limit: Some(3), json: false }))
                if tags == &["learning".to_string(), "coding".to_string()]
        );
    }

    #[test]
    fn show_requires_a_date() {
        assert!(Cli::try_parse_from(["mydiary", "show"]).is_err());
        let cli = Cli::try_parse_from(["mydiary", "--state-dir", "/tmp/x", "show", "2024-06-25"])
            .expect("parse");
        assert_eq!(cli.state_dir.as_deref(), Some(Path::new("/tmp/x")));
        assert_matches!(cli.command, Some(Commands::Show(ShowArgs { ref date })) if date == "2024-06-25");
    }

    #[test]
    fn log_file_lines_carry_utc_timestamps() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("mydiary.log");
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        tracing::subscriber::with_default(file_subscriber(EnvFilter::new("info"), file), || {
            tracing::info!("entry saved");
            tracing::debug!("filtered out");
        });

        let written = fs::read_to_string(&path)?;
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 1, "{written}");
        let stamp = lines[0].split_whitespace().next().expect("timestamp");
        assert!(stamp.ends_with('Z'), "{stamp}");
        assert!(time::OffsetDateTime::parse(
            stamp,
            &time::format_description::well_known::Rfc3339
        )
        .is_ok());
        assert!(lines[0].contains("entry saved"));
        assert!(!lines[0].contains('\u{1b}'));
        Ok(())
    }
}
