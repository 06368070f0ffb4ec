//! Merge-join of two snapshots and the percentage-change arithmetic.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::CompareError;
use crate::fetch::QuoteSource;
use crate::quote::{Exchange, SecurityQuote};
use crate::validation::validate_date_range;

/// Rounds half away from zero to two decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Percentage change from `start` to `end`, rounded to two decimals.
///
/// A missing or zero start, or a missing end, has no meaningful baseline and
/// yields `0.0`.
pub fn pct_change(start: Option<f64>, end: Option<f64>) -> f64 {
    match (start, end) {
        (Some(s), Some(e)) if s != 0.0 && s.is_finite() && e.is_finite() => {
            round2((e - s) / s * 100.0)
        }
        _ => 0.0,
    }
}

/// One security's change between the start and end snapshots.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRecord {
    pub symbol: String,
    pub start_price: f64,
    pub end_price: f64,
    pub change_percent: f64,
    pub price_change: f64,
    pub is_positive: bool,
}

impl ComparisonRecord {
    /// Builds a record from two quotes of the same symbol. Prices use the
    /// resolved close, so a quote without one counts as zero.
    pub fn from_quotes(start: &SecurityQuote, end: &SecurityQuote) -> Self {
        let start_close = start.resolved().close.value();
        let end_close = end.resolved().close.value();
        let change_percent = pct_change(start.close_value(), end.close_value());
        Self {
            symbol: start.symbol.clone(),
            start_price: round2(start_close),
            end_price: round2(end_close),
            change_percent,
            price_change: round2(end_close - start_close),
            is_positive: change_percent >= 0.0,
        }
    }
}

/// Inner join on symbol. Output follows `start` order; symbols missing from
/// either side produce nothing. A symbol repeated in `end` resolves to its
/// last occurrence.
pub fn merge_join(start: &[SecurityQuote], end: &[SecurityQuote]) -> Vec<ComparisonRecord> {
    let mut lookup: HashMap<&str, &SecurityQuote> = HashMap::with_capacity(end.len());
    let mut duplicates = 0usize;
    for quote in end {
        if lookup.insert(quote.symbol.as_str(), quote).is_some() {
            duplicates += 1;
        }
    }
    if duplicates > 0 {
        tracing::warn!(duplicates, "end snapshot repeats symbols; keeping the last occurrence");
    }

    start
        .iter()
        .filter_map(|s| {
            lookup
                .get(s.symbol.as_str())
                .map(|e| ComparisonRecord::from_quotes(s, e))
        })
        .collect()
}

/// Column a comparison can be sorted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Symbol,
    ChangePercent,
    StartPrice,
    EndPrice,
    PriceChange,
}

impl FromStr for SortKey {
    type Err = CompareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "symbol" => Ok(SortKey::Symbol),
            "change" => Ok(SortKey::ChangePercent),
            "start" => Ok(SortKey::StartPrice),
            "end" => Ok(SortKey::EndPrice),
            "delta" => Ok(SortKey::PriceChange),
            other => Err(CompareError::InvalidInput(format!(
                "unknown sort key '{}' (expected symbol, change, start, end or delta)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Ordering applied after the join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordOrder {
    /// Keep start-snapshot order.
    #[default]
    Input,
    By(SortKey, SortDirection),
}

impl RecordOrder {
    /// Stable sort; ties keep their join order.
    pub fn apply(&self, records: &mut [ComparisonRecord]) {
        let RecordOrder::By(key, direction) = *self else {
            return;
        };
        records.sort_by(|a, b| {
            let ord = compare_by(key, a, b);
            match direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        });
    }
}

fn compare_by(key: SortKey, a: &ComparisonRecord, b: &ComparisonRecord) -> Ordering {
    match key {
        SortKey::Symbol => a.symbol.cmp(&b.symbol),
        SortKey::ChangePercent => a.change_percent.total_cmp(&b.change_percent),
        SortKey::StartPrice => a.start_price.total_cmp(&b.start_price),
        SortKey::EndPrice => a.end_price.total_cmp(&b.end_price),
        SortKey::PriceChange => a.price_change.total_cmp(&b.price_change),
    }
}

/// Knobs for [`compare`].
#[derive(Debug, Clone, Default)]
pub struct CompareOptions {
    pub order: RecordOrder,
    /// Upper bound on the two concurrent fetches together.
    pub deadline: Option<Duration>,
}

/// Result of one comparison request.
#[derive(Debug, Clone, Serialize)]
pub struct Comparison {
    pub exchange: Exchange,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub records: Vec<ComparisonRecord>,
}

/// Fetches both snapshots concurrently and joins them.
///
/// Both fetches are issued before either completes. If either fails, or the
/// deadline passes, the whole comparison fails.
pub async fn compare<S>(
    source: &S,
    start: NaiveDate,
    end: NaiveDate,
    options: &CompareOptions,
) -> Result<Comparison, CompareError>
where
    S: QuoteSource + Sync,
{
    validate_date_range(start, end)?;
    let exchange = source.exchange();

    let both = async { tokio::try_join!(source.fetch(start), source.fetch(end)) };
    let (start_snap, end_snap) = match options.deadline {
        Some(limit) => tokio::time::timeout(limit, both)
            .await
            .map_err(|_| CompareError::Timeout(limit))??,
        None => both.await?,
    };

    let mut records = merge_join(&start_snap.quotes, &end_snap.quotes);
    options.order.apply(&mut records);

    tracing::info!(
        exchange = %exchange,
        start = %start_snap.date_label,
        end = %end_snap.date_label,
        start_quotes = start_snap.quotes.len(),
        end_quotes = end_snap.quotes.len(),
        matched = records.len(),
        "comparison complete"
    );

    Ok(Comparison {
        exchange,
        start,
        end,
        records,
    })
}
