use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

mod aggregate;
mod export;
mod feed;
mod filter;
mod models;
mod normalize;
mod report;

use models::{FilterCriteria, IndicatorRecord};

#[derive(Parser)]
#[command(name = "otx-pulse-dashboard")]
#[command(about = "Threat indicator dashboard over the AlienVault OTX pulse feed", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the full dashboard (indicator table plus charts) as markdown
    Dashboard {
        #[arg(long, value_delimiter = ',')]
        types: Vec<String>,
        #[arg(long, default_value = "")]
        value: String,
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Read a saved feed response instead of querying the API
        #[arg(long)]
        input: Option<PathBuf>,
        /// Write the dashboard to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// List filtered indicators as a terminal table
    Indicators {
        #[arg(long, value_delimiter = ',')]
        types: Vec<String>,
        #[arg(long, default_value = "")]
        value: String,
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        input: Option<PathBuf>,
        /// Maximum rows to print (0 prints everything)
        #[arg(long, default_value_t = 25)]
        limit: usize,
    },
    /// List the indicator types observed in the feed
    Types {
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Export filtered indicators to a CSV file
    Export {
        #[arg(long, value_delimiter = ',')]
        types: Vec<String>,
        #[arg(long, default_value = "")]
        value: String,
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long, default_value = "indicators.csv")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let api_base =
        std::env::var("OTX_API_BASE").unwrap_or_else(|_| feed::DEFAULT_API_BASE.to_string());
    // A missing key is not fatal: the request goes out unauthenticated and
    // the feed's rejection surfaces like any other fetch failure.
    let api_key = std::env::var("OTX_API_KEY").ok();
    let client = feed::OtxClient::new(api_base, api_key);

    match cli.command {
        Commands::Dashboard {
            types,
            value,
            date,
            input,
            out,
        } => {
            let records = load_records(&client, input.as_deref()).await;
            let criteria = FilterCriteria {
                selected_types: types,
                value_substring: value,
                exact_date: date,
            };
            let filtered = filter::apply(&records, &criteria);
            let dashboard = report::build_dashboard(&criteria, records.len(), &filtered);

            match out {
                Some(path) => {
                    std::fs::write(&path, dashboard)?;
                    println!("Dashboard written to {}.", path.display());
                }
                None => print!("{dashboard}"),
            }
        }
        Commands::Indicators {
            types,
            value,
            date,
            input,
            limit,
        } => {
            let records = load_records(&client, input.as_deref()).await;
            let criteria = FilterCriteria {
                selected_types: types,
                value_substring: value,
                exact_date: date,
            };
            let filtered = filter::apply(&records, &criteria);

            if filtered.is_empty() {
                println!("No indicators match the current filters.");
                return Ok(());
            }

            let shown = if limit == 0 { filtered.len() } else { limit.min(filtered.len()) };
            println!(
                "{:<18} {:<40} {:<28} {:>10}",
                "Type", "Value", "Pulse", "Created"
            );
            println!("{}", "-".repeat(98));
            for record in filtered.iter().take(shown) {
                println!(
                    "{:<18} {:<40} {:<28} {:>10}",
                    report::clip(&record.indicator_type, 18),
                    report::clip(&record.indicator_value, 40),
                    report::clip(&record.pulse_name, 28),
                    record.local_day().to_string()
                );
            }
            println!();
            println!("{} of {} filtered indicators shown.", shown, filtered.len());
        }
        Commands::Types { input } => {
            let records = load_records(&client, input.as_deref()).await;
            if records.is_empty() {
                println!("No indicators loaded.");
                return Ok(());
            }

            let by_type = aggregate::count_by_type(&records);
            println!("Observed indicator types:");
            for option in normalize::type_options(&records) {
                let count = by_type
                    .iter()
                    .find(|c| c.indicator_type == option.value)
                    .map(|c| c.count)
                    .unwrap_or(0);
                println!("- {} ({}): {} indicators", option.label, option.value, count);
            }
        }
        Commands::Export {
            types,
            value,
            date,
            input,
            out,
        } => {
            let records = load_records(&client, input.as_deref()).await;
            let criteria = FilterCriteria {
                selected_types: types,
                value_substring: value,
                exact_date: date,
            };
            let filtered = filter::apply(&records, &criteria);
            let written = export::write_csv(&out, &filtered)?;
            println!("Exported {written} indicators to {}.", out.display());
        }
    }

    Ok(())
}

/// Acquires the record set for one invocation. Any failure along the
/// fetch/parse/normalize path is logged to stderr and swallowed; the
/// commands then render against an empty set.
async fn load_records(client: &feed::OtxClient, input: Option<&Path>) -> Vec<IndicatorRecord> {
    let fetched = match input {
        Some(path) => feed::read_saved(path),
        None => client.fetch_subscribed().await,
    };

    match fetched.and_then(|pulses| normalize::flatten(&pulses)) {
        Ok(records) => records,
        Err(err) => {
            eprintln!("warning: could not load pulse data: {err:#}");
            Vec::new()
        }
    }
}
