mod commands;
mod logging;
mod prompt;
mod render;
mod utils;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use medalcal_core::Color;
use medalcal_core::config::Config;
use tracing::error;

#[derive(Parser)]
#[command(name = "medalcal")]
#[command(about = "Color and remind Olympic broadcast events, and light the room to match")]
struct Cli {
    /// Config file (defaults to ~/.config/medalcal/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Remove re-airs, then converge event colors and reminders
    Reconcile {
        /// Show what would change without writing anything
        #[arg(long)]
        dry_run: bool,

        /// Remove unwanted events without asking
        #[arg(long)]
        force: bool,

        /// Only events from this date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
    },
    /// Show pending changes (same as `reconcile --dry-run`)
    Status {
        /// Only events from this date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Only updates that set this color (e.g. yellow, banana, dark blue)
        #[arg(long)]
        color: Option<Color>,
    },
    /// Set light color from the events in progress
    Lights {
        /// Run a single update instead of polling
        #[arg(long)]
        once: bool,
    },
    /// List the calendars on the account
    Calendars,
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write a commented config template
    Init {
        #[arg(long)]
        force: bool,
    },
    /// Print config and credential paths
    Show,
}

fn parse_from(from: Option<&str>, default: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let Some(from) = from else {
        return Ok(default);
    };

    let date = NaiveDate::parse_from_str(from, "%Y-%m-%d")
        .with_context(|| format!("Invalid --from date '{}', expected YYYY-MM-DD", from))?;

    Ok(date.and_time(chrono::NaiveTime::MIN).and_utc())
}

async fn run(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Commands::Reconcile {
            dry_run,
            force,
            from,
        } => {
            let time_min = parse_from(from.as_deref(), config.time_min)?;
            commands::reconcile::run(&config, time_min, dry_run, force).await
        }
        Commands::Status { from, color } => {
            let time_min = parse_from(from.as_deref(), config.time_min)?;
            commands::status::run(&config, time_min, color).await
        }
        Commands::Lights { once } => commands::lights::run(&config, config.time_min, once).await,
        Commands::Calendars => commands::calendars::run(&config).await,
        Commands::Config { action } => match action {
            ConfigAction::Init { force } => commands::config::init(cli.config.as_deref(), force),
            ConfigAction::Show => commands::config::show(cli.config.as_deref(), &config),
        },
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref());
    let log_dir = match &config {
        Ok(config) => config.log_dir(),
        Err(_) => Config::default().log_dir(),
    };

    let _guard = match logging::init(&log_dir) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{:#}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = match config {
        Ok(config) => run(cli, config).await,
        Err(e) => Err(e.into()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn from_date_is_midnight_utc() {
        let default = Utc.with_ymd_and_hms(2022, 2, 1, 0, 0, 0).unwrap();

        assert_eq!(parse_from(None, default).unwrap(), default);
        assert_eq!(
            parse_from(Some("2022-02-10"), default).unwrap(),
            Utc.with_ymd_and_hms(2022, 2, 10, 0, 0, 0).unwrap()
        );
        assert!(parse_from(Some("Feb 10"), default).is_err());
    }

    #[test]
    fn cli_parses_reconcile_flags() {
        let cli =
            Cli::try_parse_from(["medalcal", "reconcile", "--dry-run", "--from", "2022-02-04"])
                .unwrap();

        match cli.command {
            Commands::Reconcile { dry_run, force, from } => {
                assert!(dry_run);
                assert!(!force);
                assert_eq!(from.as_deref(), Some("2022-02-04"));
            }
            _ => panic!("expected reconcile"),
        }
    }

    #[test]
    fn status_color_accepts_google_labels() {
        let cli = Cli::try_parse_from(["medalcal", "status", "--color", "Banana"]).unwrap();

        match cli.command {
            Commands::Status { color, .. } => assert_eq!(color, Some(Color::Yellow)),
            _ => panic!("expected status"),
        }
        assert!(Cli::try_parse_from(["medalcal", "status", "--color", "chartreuse"]).is_err());
    }
}
