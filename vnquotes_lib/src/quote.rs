//! The quote model shared by both exchanges.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;
use vnquotes_api::date::{iso_date, slash_date};

use crate::error::CompareError;

/// Number of raw cells kept on an HTML-sourced quote for diagnostics.
pub const MAX_DIAGNOSTIC_CELLS: usize = 8;

/// The upstream exchange a snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Exchange {
    /// Ho Chi Minh City Stock Exchange. Clean JSON API.
    Hose,
    /// Hanoi Stock Exchange. HTML report only.
    Hnx,
}

impl Exchange {
    /// The date string this exchange expects for `date`.
    pub fn format_date(self, date: NaiveDate) -> String {
        match self {
            Exchange::Hose => iso_date(date),
            Exchange::Hnx => slash_date(date),
        }
    }
}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Exchange::Hose => write!(f, "HOSE"),
            Exchange::Hnx => write!(f, "HNX"),
        }
    }
}

impl FromStr for Exchange {
    type Err = CompareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hose" | "hsx" => Ok(Exchange::Hose),
            "hnx" => Ok(Exchange::Hnx),
            other => Err(CompareError::InvalidInput(format!(
                "unknown exchange '{}' (expected hose or hnx)",
                other
            ))),
        }
    }
}

fn digit_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[+-]?\d[\d,]*(?:\.\d+)?").expect("digit run pattern compiles")
    })
}

/// A price as the upstream wrote it, plus its numeric value.
///
/// Commas are thousands separators: `"10,000"` is ten thousand.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Price {
    text: String,
    value: f64,
}

impl Price {
    /// Parses the first comma-grouped digit run found anywhere in `text`, so
    /// `"(300)"` and `"KL: 1,200"` both count. Returns `None` when `text`
    /// holds no digit.
    pub fn parse(text: &str) -> Option<Price> {
        let trimmed = text.trim();
        let m = digit_run().find(trimmed)?;
        let value: f64 = m.as_str().replace(',', "").parse().ok()?;
        Some(Price {
            text: trimmed.to_string(),
            value,
        })
    }

    pub fn from_value(value: f64) -> Price {
        Price {
            text: value.to_string(),
            value,
        }
    }

    pub fn zero() -> Price {
        Price {
            text: "0".to_string(),
            value: 0.0,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

/// Original cells of an HTML row, kept to diagnose upstream layout drift.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowDiagnostics {
    /// The first [`MAX_DIAGNOSTIC_CELLS`] cells.
    pub raw_cells: Vec<String>,
    /// Total number of cells in the row.
    pub cell_count: usize,
}

impl RowDiagnostics {
    pub fn from_cells(cells: &[String]) -> Self {
        Self {
            raw_cells: cells.iter().take(MAX_DIAGNOSTIC_CELLS).cloned().collect(),
            cell_count: cells.len(),
        }
    }
}

/// One exchange's price record for one security on one date.
///
/// Missing prices stay `None`; [`SecurityQuote::resolved`] applies the
/// fallback chain when a full set is needed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecurityQuote {
    pub symbol: String,
    pub close: Option<Price>,
    pub open: Option<Price>,
    pub high: Option<Price>,
    pub low: Option<Price>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<RowDiagnostics>,
}

/// A complete price set after fallbacks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSet {
    pub close: Price,
    pub open: Price,
    pub high: Price,
    pub low: Price,
}

impl SecurityQuote {
    pub fn new(symbol: impl Into<String>, close: Option<Price>) -> Self {
        Self {
            symbol: symbol.into(),
            close,
            open: None,
            high: None,
            low: None,
            diagnostics: None,
        }
    }

    pub fn close_value(&self) -> Option<f64> {
        self.close.as_ref().map(Price::value)
    }

    /// `open`, `high` and `low` fall back to `close`; a quote with no close
    /// resolves every slot to zero.
    pub fn resolved(&self) -> PriceSet {
        let close = self.close.clone().unwrap_or_else(Price::zero);
        let or_close = |p: &Option<Price>| p.clone().unwrap_or_else(|| close.clone());
        PriceSet {
            open: or_close(&self.open),
            high: or_close(&self.high),
            low: or_close(&self.low),
            close: close.clone(),
        }
    }
}

/// A fetched, normalized end-of-day snapshot of one exchange.
#[derive(Debug, Clone, Serialize)]
pub struct QuoteSnapshot {
    pub exchange: Exchange,
    pub date: NaiveDate,
    /// The requested date in the exchange's own format.
    pub date_label: String,
    pub quotes: Vec<SecurityQuote>,
    /// Length of the raw upstream body, when it was HTML.
    pub source_bytes: Option<usize>,
    /// Rows or records that were dropped during normalization.
    pub skipped_rows: usize,
}
