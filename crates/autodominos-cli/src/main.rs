mod locations;
mod probe;
mod report;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use autodominos_core::{expand_case_variants, normalize_codes_file, Address, OrderType};

#[derive(Debug, Parser)]
#[command(name = "autodominos")]
#[command(about = "Find working promotional codes for Domino's Pizza stores")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Probe every candidate code against every store in the address file
    Probe {
        /// Only probe this order type (pick-up or delivery)
        #[arg(long)]
        only_type: Option<OrderType>,

        /// Stop after this many candidate codes per order type
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Probe a single code against the store serving one address
    Check {
        #[arg(long)]
        province: String,
        #[arg(long)]
        city: String,
        #[arg(long)]
        street: String,
        #[arg(long)]
        number: u32,
        #[arg(long = "type", default_value = "delivery")]
        order_type: OrderType,
        #[arg(long)]
        code: String,
    },
    /// Candidate code file maintenance
    Codes {
        #[command(subcommand)]
        command: CodesCommands,
    },
    /// Province/city lookup table maintenance
    Locations {
        #[command(subcommand)]
        command: LocationsCommands,
    },
}

#[derive(Debug, Subcommand)]
enum CodesCommands {
    /// Lower-case, dedupe, and sort the code file in place
    Normalize,
}

#[derive(Debug, Subcommand)]
enum LocationsCommands {
    /// Rebuild the lookup table from the site's city lists
    Refresh {
        /// JSON file mapping province name to province id
        #[arg(long)]
        provinces: PathBuf,
    },
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = autodominos_core::load_app_config()?;
    init_tracing(&config.log_level);

    let cli = Cli::parse();
    match cli.command {
        Commands::Probe { only_type, limit } => {
            probe::run_probe(&config, only_type, limit).await?;
        }
        Commands::Check {
            province,
            city,
            street,
            number,
            order_type,
            code,
        } => {
            let address = Address::new(province, city, street, number);
            probe::run_check(&config, &address, order_type, &code).await?;
        }
        Commands::Codes {
            command: CodesCommands::Normalize,
        } => {
            let codes = normalize_codes_file(&config.codes_path)?;
            let candidates = expand_case_variants(&codes);
            println!(
                "{} normalized codes in {} ({} candidates with case variants)",
                codes.len(),
                config.codes_path.display(),
                candidates.len()
            );
        }
        Commands::Locations {
            command: LocationsCommands::Refresh { provinces },
        } => {
            locations::run_refresh(&config, &provinces).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests;
