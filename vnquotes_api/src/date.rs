//! Date formats expected by the two exchanges.

use chrono::NaiveDate;

/// `YYYY-MM-DD`, used by the HOSE quote report.
pub fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// `DD/MM/YYYY`, used by the HNX listed-securities report.
pub fn slash_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}
