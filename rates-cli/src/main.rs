//! Rates CLI
//!
//! Seeds base currencies and records / queries exchange rates.

mod commands;
mod config;

use std::path::PathBuf;

use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rates_hex::{CurrencyStore, RateStore};
use rates_repo::{RepoOptions, build_repo};

#[derive(Parser)]
#[command(name = "rates")]
#[command(author, version, about = "Currency and exchange rate store", long_about = None)]
struct Cli {
    /// Database URL (defaults to the DATABASE_URL environment variable)
    #[arg(long)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the base currencies that are not yet stored
    Seed {
        /// Codes to create instead of the built-in list (comma-separated)
        #[arg(long, value_delimiter = ',')]
        codes: Vec<String>,
    },
    /// Currency operations
    Currency {
        #[command(subcommand)]
        action: CurrencyCommands,
    },
    /// Rate operations
    Rate {
        #[command(subcommand)]
        action: RateCommands,
    },
}

#[derive(Subcommand)]
enum CurrencyCommands {
    /// Show a currency
    Get {
        /// Currency code (e.g. USD)
        code: String,
    },
    /// List all currencies
    List,
    /// Create a currency
    Add {
        /// Currency code (e.g. USD)
        code: String,
    },
}

#[derive(Subcommand)]
enum RateCommands {
    /// Record one rate (replaces the provider's rate for that day)
    Add {
        #[arg(long)]
        currency: String,
        #[arg(long)]
        provider: String,
        /// Day of the rate (YYYY-MM-DD; a time-of-day is ignored)
        #[arg(long)]
        date: String,
        #[arg(long)]
        rate: f64,
        #[arg(long, default_value_t = 1.0)]
        nominal: f64,
    },
    /// Record rates from a JSON file holding an array of rates
    Import {
        file: PathBuf,
    },
    /// Show the most recent matching rate
    Get {
        #[arg(long)]
        currency: String,
        #[arg(long)]
        provider: Option<String>,
        #[arg(long)]
        date: Option<String>,
    },
    /// List matching rates, newest first
    History {
        #[arg(long)]
        currency: String,
        #[arg(long)]
        provider: Option<String>,
    },
}

fn parse_date(s: &str) -> Result<NaiveDateTime> {
    let s = s.trim();
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(|d| d.and_time(NaiveTime::MIN))
        .map_err(|_| anyhow::anyhow!("Invalid date: {}. Expected YYYY-MM-DD", s))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,rates_cli=info,rates_hex=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = config::Config::from_env(cli.database_url)?;

    tracing::debug!("Using database: {}", config.database_url);

    let repo = build_repo(
        &config.database_url,
        RepoOptions {
            auto_migrate: config.auto_migrate,
        },
    )
    .await?;

    let currencies = CurrencyStore::connect(repo.clone()).await?;

    match cli.command {
        Commands::Seed { codes } => {
            let created = commands::seed(&currencies, &codes).await?;
            println!("{} currencies created.", created);
        }

        Commands::Currency { action } => match action {
            CurrencyCommands::Get { code } => match currencies.get_currency(&code).await? {
                Some(currency) => println!("{}", serde_json::to_string_pretty(&currency)?),
                None => println!("Currency {} not found", code),
            },
            CurrencyCommands::List => {
                let all = currencies.list_currencies().await?;
                println!("{}", serde_json::to_string_pretty(&all)?);
            }
            CurrencyCommands::Add { code } => {
                let currency = currencies.add_currency(&code).await?;
                println!("{}", serde_json::to_string_pretty(&currency)?);
            }
        },

        Commands::Rate { action } => {
            let rates = RateStore::connect(repo).await?;

            match action {
                RateCommands::Add {
                    currency,
                    provider,
                    date,
                    rate,
                    nominal,
                } => {
                    let saved = commands::add_rate(
                        &currencies,
                        &rates,
                        &currency,
                        provider,
                        parse_date(&date)?,
                        rate,
                        nominal,
                    )
                    .await?;
                    println!("{}", serde_json::to_string_pretty(&saved)?);
                }
                RateCommands::Import { file } => {
                    let inputs = commands::read_rate_file(&file).await?;
                    let saved = commands::import_rates(&currencies, &rates, inputs).await?;
                    println!("{} rates saved.", saved.len());
                }
                RateCommands::Get {
                    currency,
                    provider,
                    date,
                } => {
                    let date = date.as_deref().map(parse_date).transpose()?;
                    let found =
                        commands::latest_rate(&currencies, &rates, &currency, provider, date)
                            .await?;

                    match found {
                        Some(rate) => println!("{}", serde_json::to_string_pretty(&rate)?),
                        None => println!("No rate found for {}", currency),
                    }
                }
                RateCommands::History { currency, provider } => {
                    let history =
                        commands::rate_history(&currencies, &rates, &currency, provider).await?;
                    println!("{}", serde_json::to_string_pretty(&history)?);
                }
            }
        }
    }

    Ok(())
}
