// src/main.rs
mod utils;
mod edgar;
mod extractors;
mod pipeline;
mod storage;

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use utils::{AppError, EdgarConfig};
use edgar::EdgarClient;
use pipeline::HoldingsPipeline;
use storage::StorageManager;

/// Fetches a fund's 13F INFORMATION TABLE from SEC EDGAR and writes it to <TICKER>_data.csv
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Ticker or CIK of the mutual fund to explore
    #[arg(short, long)]
    ticker: String,

    /// How recent the report is (newest=1, 2nd newest=2, etc)
    #[arg(short, long, default_value_t = 1)]
    recent: usize,
}

#[tokio::main]
async fn main() -> ExitCode {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::info!("Starting processing for args: {:?}", args);

    match run(&args).await {
        Ok(path) => {
            println!("Wrote {}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::debug!("Processing failed for {}: {:?}", args.ticker, e);
            eprintln!("{}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(args: &Args) -> Result<PathBuf, AppError> {
    // 3. Configuration and HTTP client
    let config = EdgarConfig::from_env()?;
    let client = EdgarClient::new(&config)?;

    // 4. Fetch and flatten the requested filing's holdings
    let pipeline = HoldingsPipeline::new(&client, &config);
    let records = pipeline.run(&args.ticker, args.recent).await?;

    // 5. Write the artifact last, so a failed run leaves no file behind
    let storage = StorageManager::new(".")?;
    let path = storage.save_holdings(&args.ticker, &records)?;

    tracing::info!("Processing finished: {} holdings", records.len());
    Ok(path)
}
