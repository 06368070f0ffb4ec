use anyhow::Result;
use clap::Args;
use vnquotes_lib::validation;
use vnquotes_lib::{ClientConfig, Exchange, QuoteSource};

use crate::output::{print_snapshot, OutputFormat};

#[derive(Args)]
pub struct QuotesArgs {
    /// Exchange: hose or hnx
    #[arg(long)]
    pub exchange: String,

    /// Trading date (YYYY-MM-DD or DD/MM/YYYY)
    #[arg(long)]
    pub date: String,

    /// Show the raw HNX cells behind each quote
    #[arg(long)]
    pub raw: bool,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}

pub async fn run(args: &QuotesArgs, config: ClientConfig, format: &OutputFormat) -> Result<()> {
    let exchange: Exchange = args.exchange.parse()?;
    let date = validation::parse_date(&args.date)?;
    let fetcher = super::build_fetcher(config, exchange, args.timeout)?;

    let snapshot = fetcher.fetch(date).await?;

    match snapshot.source_bytes {
        Some(bytes) => eprintln!(
            "{} {}: {} quotes, {} rows skipped, {} bytes",
            exchange,
            snapshot.date_label,
            snapshot.quotes.len(),
            snapshot.skipped_rows,
            bytes
        ),
        None => eprintln!(
            "{} {}: {} quotes, {} records skipped",
            exchange,
            snapshot.date_label,
            snapshot.quotes.len(),
            snapshot.skipped_rows
        ),
    }

    print_snapshot(&snapshot, args.raw, format)
}
