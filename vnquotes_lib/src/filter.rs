//! Post-join record filters: VN30 basket and free-text search.

use crate::compare::ComparisonRecord;
use crate::directory::CompanyDirectory;

/// Constituents of the VN30 basket.
pub const VN30: &[&str] = &[
    "ACB", "BCM", "BID", "BVH", "CTG", "FPT", "GAS", "GVR", "HDB", "HPG", "LPB", "MBB", "MSN",
    "MWG", "PLX", "SAB", "SHB", "SSB", "SSI", "STB", "TCB", "TPB", "VCB", "VHM", "VIC", "VJC",
    "VNM", "VPB", "VRE",
];

pub fn is_vn30(symbol: &str) -> bool {
    VN30.contains(&symbol)
}

#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    pub vn30_only: bool,
    /// Case-insensitive substring matched against symbol and company name.
    pub search: Option<String>,
}

impl RecordFilter {
    pub fn is_empty(&self) -> bool {
        !self.vn30_only && self.search.is_none()
    }

    pub fn matches(&self, record: &ComparisonRecord, directory: Option<&CompanyDirectory>) -> bool {
        if self.vn30_only && !is_vn30(&record.symbol) {
            return false;
        }
        let Some(term) = &self.search else {
            return true;
        };
        let term = term.to_lowercase();
        if record.symbol.to_lowercase().contains(&term) {
            return true;
        }
        directory
            .and_then(|d| d.name(&record.symbol))
            .map(|name| name.to_lowercase().contains(&term))
            .unwrap_or(false)
    }

    /// Keeps matching records in their current order.
    pub fn apply(
        &self,
        records: Vec<ComparisonRecord>,
        directory: Option<&CompanyDirectory>,
    ) -> Vec<ComparisonRecord> {
        if self.is_empty() {
            return records;
        }
        records
            .into_iter()
            .filter(|r| self.matches(r, directory))
            .collect()
    }
}
