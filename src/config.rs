use clap::{Parser, Subcommand};
use std::path::PathBuf;

const DEFAULT_DB_PATH: &str = "budget.db";
const DEFAULT_LOG_PATH: &str = "budget.log";

#[derive(Debug, Parser)]
#[command(name = "monthly-budget", version, about = "Monthly income and expense dashboard")]
struct Args {
    /// SQLite file holding income and expenses.
    #[arg(long, env = "BUDGET_DB", default_value = DEFAULT_DB_PATH)]
    db: PathBuf,
    /// Log file (the dashboard owns the terminal, so logs never go to stdout).
    #[arg(long, env = "BUDGET_LOG", default_value = DEFAULT_LOG_PATH)]
    log_file: PathBuf,
    /// Log filter, e.g. `info` or `monthly_budget=debug`.
    #[arg(long, env = "BUDGET_LOG_LEVEL", default_value = "info")]
    log_level: String,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Interactive dashboard (default)
    Ui,
    /// Print this month's summary and exit
    Summary,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub db_path: PathBuf,
    pub log_file: PathBuf,
    pub log_level: String,
    pub command: Command,
}

impl Settings {
    pub fn load() -> Self {
        Self::from_args(Args::parse())
    }

    pub fn try_from_iter<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Ok(Self::from_args(Args::try_parse_from(args)?))
    }

    fn from_args(args: Args) -> Self {
        Settings {
            db_path: args.db,
            log_file: args.log_file,
            log_level: args.log_level,
            command: args.command.unwrap_or(Command::Ui),
        }
    }
}
