use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Args;
use vnquotes_lib::validation;
use vnquotes_lib::{
    compare, sort_by_company, ClientConfig, CompanyDirectory, CompareOptions, Exchange,
    RecordFilter, RecordOrder, SortDirection, SortKey,
};

use crate::output::{print_comparison, OutputFormat};

#[derive(Args)]
pub struct CompareArgs {
    /// Exchange: hose or hnx
    #[arg(long)]
    pub exchange: String,

    /// Start date (YYYY-MM-DD or DD/MM/YYYY)
    #[arg(long)]
    pub start: String,

    /// End date (YYYY-MM-DD or DD/MM/YYYY)
    #[arg(long)]
    pub end: String,

    /// Sort field: symbol, company, change, start, end, delta
    #[arg(long)]
    pub sort_by: Option<String>,

    /// Sort descending instead of ascending
    #[arg(long)]
    pub desc: bool,

    /// Only VN30 constituents
    #[arg(long)]
    pub vn30: bool,

    /// Search by symbol or company name
    #[arg(long)]
    pub search: Option<String>,

    /// JSON file mapping symbols to company names
    #[arg(long)]
    pub companies: Option<PathBuf>,

    /// Per-request timeout in seconds; also bounds the whole comparison
    #[arg(long)]
    pub timeout: Option<u64>,
}

pub async fn run(args: &CompareArgs, config: ClientConfig, format: &OutputFormat) -> Result<()> {
    let exchange: Exchange = args.exchange.parse()?;
    let start = validation::parse_date(&args.start)?;
    let end = validation::parse_date(&args.end)?;
    validation::validate_date_range(start, end)?;

    let search = match &args.search {
        Some(term) => validation::validate_search(term)?,
        None => None,
    };

    let (order, company_order) = sort_plan(args.sort_by.as_deref(), args.desc)?;

    let directory = match &args.companies {
        Some(path) => Some(CompanyDirectory::load(path)?),
        None => None,
    };

    let options = CompareOptions {
        order,
        deadline: args.timeout.filter(|s| *s > 0).map(Duration::from_secs),
    };
    let fetcher = super::build_fetcher(config, exchange, args.timeout)?;

    let mut comparison = compare(&fetcher, start, end, &options).await?;
    let total = comparison.records.len();

    let filter = RecordFilter {
        vn30_only: args.vn30,
        search,
    };
    comparison.records = filter.apply(comparison.records, directory.as_ref());
    if let Some(direction) = company_order {
        sort_by_company(&mut comparison.records, directory.as_ref(), direction);
    }

    eprintln!(
        "{} {} -> {}: {} of {} symbols",
        exchange,
        exchange.format_date(start),
        exchange.format_date(end),
        comparison.records.len(),
        total
    );

    print_comparison(&comparison, directory.as_ref(), format)
}

/// Splits `--sort-by` into the order `compare` applies and an optional
/// company-name sort applied once names are available.
fn sort_plan(sort_by: Option<&str>, desc: bool) -> Result<(RecordOrder, Option<SortDirection>)> {
    let direction = if desc {
        SortDirection::Desc
    } else {
        SortDirection::Asc
    };
    match sort_by {
        None => Ok((RecordOrder::Input, None)),
        Some("company") => Ok((RecordOrder::Input, Some(direction))),
        Some(key) => {
            let key: SortKey = key.parse()?;
            Ok((RecordOrder::By(key, direction), None))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_plan_defaults_to_input_order() {
        let (order, company) = sort_plan(None, true).unwrap();
        assert_eq!(order, RecordOrder::Input);
        assert_eq!(company, None);
    }

    #[test]
    fn test_sort_plan_company_is_applied_after_compare() {
        let (order, company) = sort_plan(Some("company"), true).unwrap();
        assert_eq!(order, RecordOrder::Input);
        assert_eq!(company, Some(SortDirection::Desc));
    }

    #[test]
    fn test_sort_plan_core_keys() {
        let (order, company) = sort_plan(Some("change"), false).unwrap();
        assert_eq!(
            order,
            RecordOrder::By(SortKey::ChangePercent, SortDirection::Asc)
        );
        assert_eq!(company, None);
        assert!(sort_plan(Some("volume"), false).is_err());
    }
}
