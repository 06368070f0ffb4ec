//! Maps extracted HNX rows onto [`SecurityQuote`] records.
//!
//! Column meaning is positional. All positions live in [`HnxColumnLayout`] so
//! a change in the upstream report touches one table, not scattered indices.

use crate::extract::CellRow;
use crate::quote::{Price, RowDiagnostics, SecurityQuote};

/// Placeholder the report uses for empty cells.
const PLACEHOLDER: &str = "-";

/// Positional column map of the HNX listed-securities report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HnxColumnLayout {
    pub version: u32,
    /// Column holding the ticker. Column 0 is a serial number.
    pub symbol: usize,
    /// First column scanned for prices (the price-change column).
    pub first_price: usize,
    /// Rows with fewer cells are not quotes.
    pub min_cells: usize,
}

impl HnxColumnLayout {
    /// `STT | Mã CK | Mã ISIN | price columns...`
    pub const V1: HnxColumnLayout = HnxColumnLayout {
        version: 1,
        symbol: 1,
        first_price: 3,
        min_cells: 4,
    };
}

impl Default for HnxColumnLayout {
    fn default() -> Self {
        Self::V1
    }
}

/// Quotes recovered from a batch of rows and how many rows were dropped.
#[derive(Debug, Default)]
pub struct Normalized {
    pub quotes: Vec<SecurityQuote>,
    pub skipped: usize,
}

/// Normalizes one row with the current layout.
pub fn normalize_row(row: &[String]) -> Option<SecurityQuote> {
    normalize_row_with(&HnxColumnLayout::V1, row)
}

/// Returns `None` for rows that are not quotes: too few cells, an empty or
/// placeholder symbol, or no numeric cell at or after `first_price`.
///
/// Up to four numeric cells are taken in order as close, open, high, low.
/// Missing slots stay `None`; see [`SecurityQuote::resolved`].
pub fn normalize_row_with(layout: &HnxColumnLayout, row: &[String]) -> Option<SecurityQuote> {
    if row.len() < layout.min_cells {
        return None;
    }
    let symbol = row.get(layout.symbol)?.trim();
    if symbol.is_empty() || symbol == PLACEHOLDER {
        return None;
    }

    let mut prices = row
        .iter()
        .skip(layout.first_price)
        .filter(|cell| cell.as_str() != PLACEHOLDER)
        .filter_map(|cell| Price::parse(cell))
        .take(4);

    let close = prices.next()?;
    Some(SecurityQuote {
        symbol: symbol.to_string(),
        close: Some(close),
        open: prices.next(),
        high: prices.next(),
        low: prices.next(),
        diagnostics: Some(RowDiagnostics::from_cells(row)),
    })
}

/// Normalizes every row, keeping document order.
pub fn normalize_rows(layout: &HnxColumnLayout, rows: &[CellRow]) -> Normalized {
    let mut out = Normalized::default();
    for row in rows {
        match normalize_row_with(layout, row) {
            Some(quote) => out.quotes.push(quote),
            None => {
                tracing::trace!(cells = row.len(), first = ?row.first(), "row skipped");
                out.skipped += 1;
            }
        }
    }
    out
}
