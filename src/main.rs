//! opskit - operational CLI for a managed query service and scheduled rules.

mod cli;

use chrono::{Local, NaiveDate};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};
use opskit::config::Config;
use opskit::error::Result;
use opskit::notify::{format_report, format_subject, HttpNotifier, Notifier};
use opskit::params::{split_rules, HttpParameterStore, ParameterStore};
use opskit::query::runner::QueryRunner;
use opskit::query::{HttpQueryService, TokioSleeper};
use opskit::schedule::{reschedule_rules, shift_required, HttpRuleStore};
use opskit::storage::HttpObjectStore;

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    dotenvy::dotenv().ok();

    if let Err(e) = run().await {
        error!("{}: {}", e.category(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse_args();

    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let config = Config::load_from_file(&config_path)?;

    match cli.command {
        Command::Query { sql } => run_query(&config, sql).await,
        Command::ClockShift { date } => run_clock_shift(&config, date).await,
    }
}

/// Submits the configured query and prints its results.
async fn run_query(config: &Config, sql_override: Option<String>) -> Result<()> {
    let mut query_config = config.query.clone();
    if let Some(sql) = sql_override {
        query_config.sql = Some(sql);
    }

    let service = HttpQueryService::new(&config.service)?;
    let store = HttpObjectStore::new(&config.service)?;
    let runner = QueryRunner::new(&service, &store, &TokioSleeper);

    match runner
        .run(&query_config, config.service.region.as_deref())
        .await?
    {
        Some(table) => {
            println!("Query results:");
            print!("{}", table.render());
        }
        None => println!("Results are not available."),
    }

    Ok(())
}

/// Applies a seasonal clock change to every configured rule and reports
/// the outcome.
async fn run_clock_shift(config: &Config, date_override: Option<NaiveDate>) -> Result<()> {
    let date = date_override.unwrap_or_else(|| Local::now().date_naive());

    let Some(shift) = shift_required(date) else {
        info!("No clock change on {date}");
        println!("No clock change today.");
        return Ok(());
    };

    println!("Clock change on {date}: shifting stored hours by {shift}");

    let params = HttpParameterStore::new(&config.service)?;
    let value = params.get(config.shift.rules_parameter()?).await?;
    let rules = split_rules(&value);

    let store = HttpRuleStore::new(&config.service)?;
    let outcome = reschedule_rules(&store, &rules, shift).await?;

    let notifier = HttpNotifier::new(&config.service, config.shift.topic()?)?;
    let subject = format_subject(config.shift.account_alias()?);
    let message = format_report(&outcome, shift);
    notifier.publish(&subject, &message).await?;

    println!(
        "Updated {} rule(s), {} failed. Report sent to '{}'.",
        outcome.updated.len(),
        outcome.failed.len(),
        config.shift.topic()?
    );

    Ok(())
}
