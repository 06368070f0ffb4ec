//! Quote fetchers: one per exchange, both producing a [`QuoteSnapshot`].

use std::future::Future;
use std::sync::Arc;

use chrono::NaiveDate;
use vnquotes_api::Client;

use crate::error::CompareError;
use crate::extract::extract_rows;
use crate::hose::decode_quote_report;
use crate::normalize::{normalize_rows, HnxColumnLayout};
use crate::quote::{Exchange, QuoteSnapshot};

/// Anything that can produce one exchange's snapshot for a date.
///
/// Implemented by the real fetchers and by test doubles.
pub trait QuoteSource {
    fn exchange(&self) -> Exchange;

    fn fetch(
        &self,
        date: NaiveDate,
    ) -> impl Future<Output = Result<QuoteSnapshot, CompareError>> + Send;
}

/// HOSE: JSON quote report, decoded at this boundary.
pub struct HoseFetcher {
    client: Arc<Client>,
}

impl HoseFetcher {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }
}

impl QuoteSource for HoseFetcher {
    fn exchange(&self) -> Exchange {
        Exchange::Hose
    }

    async fn fetch(&self, date: NaiveDate) -> Result<QuoteSnapshot, CompareError> {
        let value = self.client.hose_quote_report(date).await?;
        let report = decode_quote_report(&value)?;
        let date_label = Exchange::Hose.format_date(date);
        tracing::debug!(
            exchange = %Exchange::Hose,
            date = %date_label,
            quotes = report.quotes.len(),
            skipped = report.skipped,
            "quote report decoded"
        );
        Ok(QuoteSnapshot {
            exchange: Exchange::Hose,
            date,
            date_label,
            quotes: report.quotes,
            source_bytes: None,
            skipped_rows: report.skipped,
        })
    }
}

/// HNX: HTML report, run through the extractor and the normalizer.
pub struct HnxFetcher {
    client: Arc<Client>,
    layout: HnxColumnLayout,
}

impl HnxFetcher {
    pub fn new(client: Arc<Client>) -> Self {
        Self {
            client,
            layout: HnxColumnLayout::default(),
        }
    }

    pub fn with_layout(mut self, layout: HnxColumnLayout) -> Self {
        self.layout = layout;
        self
    }
}

impl QuoteSource for HnxFetcher {
    fn exchange(&self) -> Exchange {
        Exchange::Hnx
    }

    async fn fetch(&self, date: NaiveDate) -> Result<QuoteSnapshot, CompareError> {
        let html = self.client.hnx_listed_html(date).await?;
        Ok(parse_hnx_snapshot(&self.layout, date, &html))
    }
}

/// Builds an HNX snapshot from a raw report body.
pub fn parse_hnx_snapshot(layout: &HnxColumnLayout, date: NaiveDate, html: &str) -> QuoteSnapshot {
    let rows = extract_rows(html);
    let normalized = normalize_rows(layout, &rows);
    let date_label = Exchange::Hnx.format_date(date);

    tracing::debug!(
        exchange = %Exchange::Hnx,
        date = %date_label,
        html_len = html.len(),
        rows = rows.len(),
        quotes = normalized.quotes.len(),
        skipped = normalized.skipped,
        layout = layout.version,
        "listed report parsed"
    );
    if normalized.quotes.is_empty() && !html.trim().is_empty() {
        tracing::warn!(
            exchange = %Exchange::Hnx,
            date = %date_label,
            html_len = html.len(),
            rows = rows.len(),
            "no quotes recovered from a non-empty report; upstream layout may have changed"
        );
    }

    QuoteSnapshot {
        exchange: Exchange::Hnx,
        date,
        date_label,
        quotes: normalized.quotes,
        source_bytes: Some(html.len()),
        skipped_rows: normalized.skipped,
    }
}

/// Fetcher selected by exchange at runtime.
pub enum ExchangeFetcher {
    Hose(HoseFetcher),
    Hnx(HnxFetcher),
}

impl ExchangeFetcher {
    pub fn new(client: Arc<Client>, exchange: Exchange) -> Self {
        match exchange {
            Exchange::Hose => ExchangeFetcher::Hose(HoseFetcher::new(client)),
            Exchange::Hnx => ExchangeFetcher::Hnx(HnxFetcher::new(client)),
        }
    }
}

impl QuoteSource for ExchangeFetcher {
    fn exchange(&self) -> Exchange {
        match self {
            ExchangeFetcher::Hose(f) => f.exchange(),
            ExchangeFetcher::Hnx(f) => f.exchange(),
        }
    }

    async fn fetch(&self, date: NaiveDate) -> Result<QuoteSnapshot, CompareError> {
        match self {
            ExchangeFetcher::Hose(f) => f.fetch(date).await,
            ExchangeFetcher::Hnx(f) => f.fetch(date).await,
        }
    }
}
