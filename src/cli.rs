//! Command-line argument parsing for opskit.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Operational CLI: managed query runner and seasonal schedule shifter.
#[derive(Parser, Debug)]
#[command(name = "opskit")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the configured query and print its results
    Query {
        /// Query text, overriding the configured statement
        #[arg(long, value_name = "SQL")]
        sql: Option<String>,
    },

    /// Apply a seasonal clock change to the configured rule schedules
    ClockShift {
        /// Target date (YYYY-MM-DD); defaults to today
        #[arg(long, value_name = "DATE")]
        date: Option<NaiveDate>,
    },
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    ///
    /// Uses the --config argument if provided, otherwise the default path.
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(opskit::config::Config::default_path)
    }
}
