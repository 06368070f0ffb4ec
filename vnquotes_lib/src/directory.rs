//! Symbol → company name lookup used for display and search.
//!
//! The comparison core never consults it; callers merge names onto records
//! after the fact.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;

use crate::compare::{ComparisonRecord, SortDirection};
use crate::error::CompareError;

#[derive(Debug, Clone, Default)]
pub struct CompanyDirectory {
    names: HashMap<String, String>,
}

impl CompanyDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, symbol: &str, name: &str) {
        let symbol = symbol.trim().to_ascii_uppercase();
        let name = name.trim();
        if !symbol.is_empty() && !name.is_empty() {
            self.names.insert(symbol, name.to_string());
        }
    }

    /// Accepts `{"VCB": "Vietcombank"}`, `{"VCB": {"fullName": "..."}}`, or an
    /// array of objects carrying `symbol`/`code` and `fullName`/`name`.
    pub fn from_json_str(json: &str) -> Result<Self, CompareError> {
        let value: Value = serde_json::from_str(json).map_err(|e| {
            CompareError::InvalidInput(format!("company directory is not valid JSON: {}", e))
        })?;
        let mut dir = Self::new();
        match &value {
            Value::Object(map) => {
                for (symbol, entry) in map {
                    if let Some(name) = entry_name(entry) {
                        dir.insert(symbol, name);
                    }
                }
            }
            Value::Array(items) => {
                for item in items {
                    let symbol = ["symbol", "code", "securitySymbol"]
                        .iter()
                        .find_map(|k| item.get(*k).and_then(Value::as_str));
                    if let (Some(symbol), Some(name)) = (symbol, entry_name(item)) {
                        dir.insert(symbol, name);
                    }
                }
            }
            _ => {
                return Err(CompareError::InvalidInput(
                    "company directory must be a JSON object or array".into(),
                ))
            }
        }
        Ok(dir)
    }

    pub fn load(path: &Path) -> Result<Self, CompareError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            CompareError::InvalidInput(format!(
                "cannot read company directory {}: {}",
                path.display(),
                e
            ))
        })?;
        let dir = Self::from_json_str(&text)?;
        tracing::debug!(companies = dir.len(), path = %path.display(), "company directory loaded");
        Ok(dir)
    }

    pub fn name(&self, symbol: &str) -> Option<&str> {
        self.names.get(symbol).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Stable sort by company name. Symbols without a name sort as the empty
/// string; names compare case-insensitively, then exactly.
pub fn sort_by_company(
    records: &mut [ComparisonRecord],
    directory: Option<&CompanyDirectory>,
    direction: SortDirection,
) {
    let name_of = |r: &ComparisonRecord| -> String {
        directory
            .and_then(|d| d.name(&r.symbol))
            .unwrap_or_default()
            .to_string()
    };
    records.sort_by(|a, b| {
        let (a, b) = (name_of(a), name_of(b));
        let ord = compare_names(&a, &b);
        match direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

fn entry_name(entry: &Value) -> Option<&str> {
    match entry {
        Value::String(name) => Some(name.as_str()),
        Value::Object(_) => ["fullName", "name", "companyName"]
            .iter()
            .find_map(|k| entry.get(*k).and_then(Value::as_str)),
        _ => None,
    }
}
