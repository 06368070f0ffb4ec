//! CLI subcommand implementations.

pub mod compare;
pub mod quotes;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use vnquotes_lib::{Client, ClientConfig, Exchange, ExchangeFetcher};

/// Builds the fetcher for `exchange`, applying a `--timeout` override.
pub fn build_fetcher(
    mut config: ClientConfig,
    exchange: Exchange,
    timeout_secs: Option<u64>,
) -> Result<ExchangeFetcher> {
    if let Some(secs) = timeout_secs.filter(|s| *s > 0) {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    let client = Client::from_config(config)?;
    Ok(ExchangeFetcher::new(Arc::new(client), exchange))
}
