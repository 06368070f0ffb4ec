use chrono::NaiveDate;

use crate::error::CompareError;

pub const MAX_SEARCH_LENGTH: usize = 100;

/// Parses `YYYY-MM-DD` or `DD/MM/YYYY`.
pub fn parse_date(input: &str) -> Result<NaiveDate, CompareError> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%d/%m/%Y"))
        .map_err(|_| {
            CompareError::InvalidInput(format!(
                "invalid date '{}': expected YYYY-MM-DD or DD/MM/YYYY",
                trimmed
            ))
        })
}

/// The end date may equal the start date but not precede it.
pub fn validate_date_range(start: NaiveDate, end: NaiveDate) -> Result<(), CompareError> {
    if end < start {
        return Err(CompareError::InvalidInput(format!(
            "end date {} is before start date {}",
            end, start
        )));
    }
    Ok(())
}

/// Strips control characters, trims, and enforces a length limit.
/// Returns `None` when nothing is left.
pub fn validate_search(input: &str) -> Result<Option<String>, CompareError> {
    if input.len() > MAX_SEARCH_LENGTH {
        return Err(CompareError::InvalidInput(format!(
            "search text exceeds maximum length of {} bytes",
            MAX_SEARCH_LENGTH
        )));
    }
    let cleaned: String = input.chars().filter(|c| !c.is_control()).collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        Ok(None)
    } else {
        Ok(Some(cleaned.to_string()))
    }
}
