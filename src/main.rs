//! Daily Fortune command line entry point.
//!
//! Prints today's almanac: `daily-fortune [--format structured|text]`.

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use daily_fortune::{Config, FortuneFormat, FortuneProvider};

/// Print today's almanac fortune
#[derive(Parser, Debug)]
#[command(name = "daily-fortune", version)]
#[command(about = "Print today's almanac, from TianAPI or generated offline", long_about = None)]
struct Args {
    /// Output shape
    #[arg(short, long, value_enum, default_value_t = FortuneFormat::Structured)]
    format: FortuneFormat,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load .env file first (before anything else)
    dotenvy::dotenv().ok();

    // If RUST_LOG is not set, default to "info" level for our crate
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("daily_fortune=info,reqwest=warn"));

    // Logs go to stderr so stdout carries only the fortune.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!("Fetching today's fortune ({})", args.format.as_str());

    let config = Config::from_env();
    info!("Configuration loaded successfully");
    info!("Upstream: {}", config.api_base_url);

    let provider = FortuneProvider::new(&config)?;
    if provider.has_credential() {
        info!("TianAPI credential configured");
    }

    match args.format {
        FortuneFormat::Structured => {
            let record = provider.get_fortune_structured().await;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        FortuneFormat::Text => {
            println!("{}", provider.get_fortune_text().await);
        }
    }

    Ok(())
}
