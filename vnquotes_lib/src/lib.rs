//! Library layer for vnquotes: HNX report scraping, HOSE report decoding,
//! and the two-date comparison built on top of both.
//!
//! Wraps the `vnquotes_api` crate with the HTML extractor, the positional
//! record normalizer, per-exchange fetchers and the merge-join comparator.

pub mod compare;
pub mod directory;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod filter;
pub mod hose;
pub mod normalize;
pub mod quote;
pub mod session;
pub mod validation;

pub use vnquotes_api;
pub use vnquotes_api::{Client, ClientConfig};

pub use compare::{
    compare, merge_join, pct_change, round2, Comparison, ComparisonRecord, CompareOptions,
    RecordOrder, SortDirection, SortKey,
};
pub use directory::{sort_by_company, CompanyDirectory};
pub use error::CompareError;
pub use extract::{extract_rows, CellRow};
pub use fetch::{ExchangeFetcher, HnxFetcher, HoseFetcher, QuoteSource};
pub use filter::RecordFilter;
pub use normalize::{normalize_row, HnxColumnLayout};
pub use quote::{Exchange, Price, PriceSet, QuoteSnapshot, RowDiagnostics, SecurityQuote};
pub use session::{ComparisonSession, Outcome};
