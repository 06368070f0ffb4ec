//! Pure request builders for both exchanges.
//!
//! Nothing here performs I/O. A builder takes a date and returns the method,
//! path, query, headers and body that [`crate::Client`] will send.

use chrono::NaiveDate;
use reqwest::Method;
use url::{form_urlencoded, Url};

use crate::date::{iso_date, slash_date};
use crate::Error;

pub const HOSE_QUOTE_REPORT_PATH: &str = "/mk/api/v1/market/quote-report";
pub const HNX_LISTED_PATH: &str = "/ModuleReportStockETFs/Report_MD_PriceVolatilyti/ListData_Listed";

pub const HNX_ORIGIN: &str = "https://hnx.vn";
pub const HNX_REFERER: &str = "https://hnx.vn/vi-vn/co-phieu-etfs/du-lieu-thi-truong-ny.html";

/// Largest page the HNX report will serve in one response.
pub const HNX_MAX_PAGE_SIZE: u32 = 1000;

/// Body of an outbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    Empty,
    /// `application/x-www-form-urlencoded` payload, already encoded.
    Form(String),
}

/// A fully described upstream request.
#[derive(Debug, Clone)]
pub struct ExchangeRequest {
    pub method: Method,
    pub path: &'static str,
    pub query: Vec<(&'static str, String)>,
    pub headers: Vec<(&'static str, String)>,
    pub body: RequestBody,
}

impl ExchangeRequest {
    /// HOSE end-of-day quote report for `date`. The body is empty; all
    /// parameters travel in the query string.
    pub fn hose_quote_report(date: NaiveDate) -> Self {
        Self {
            method: Method::POST,
            path: HOSE_QUOTE_REPORT_PATH,
            query: vec![("tradingBy", "VNINDEX".to_string()), ("date", iso_date(date))],
            headers: vec![("content-type", "application/json".to_string())],
            body: RequestBody::Empty,
        }
    }

    /// HNX listed-securities price report for `date`, first page of up to
    /// [`HNX_MAX_PAGE_SIZE`] rows.
    pub fn hnx_listed(date: NaiveDate) -> Self {
        Self::hnx_listed_with(&HnxSearchForm::for_date(date))
    }

    /// HNX listed-securities price report for an explicit search form.
    ///
    /// The origin, referer and `X-Requested-With` headers are required; the
    /// upstream filters requests that lack them.
    pub fn hnx_listed_with(form: &HnxSearchForm) -> Self {
        Self {
            method: Method::POST,
            path: HNX_LISTED_PATH,
            query: Vec::new(),
            headers: vec![
                ("accept", "*/*".to_string()),
                ("accept-language", "en-US,en;q=0.9".to_string()),
                (
                    "content-type",
                    "application/x-www-form-urlencoded".to_string(),
                ),
                ("origin", HNX_ORIGIN.to_string()),
                ("referer", HNX_REFERER.to_string()),
                ("x-requested-with", "XMLHttpRequest".to_string()),
            ],
            body: RequestBody::Form(form.to_form_body()),
        }
    }

    /// Joins `path` and `query` onto `base_url`.
    pub fn url(&self, base_url: &str) -> Result<Url, Error> {
        let raw = format!("{}{}", base_url.trim_end_matches('/'), self.path);
        let mut url = Url::parse(&raw).map_err(|e| {
            tracing::error!("Invalid URL constructed: {}", e);
            Error::InvalidRequest(format!("{}: {}", raw, e))
        })?;
        if !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &self.query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// Returns the value of a header by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Form fields of the HNX `ListData_Listed` report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HnxSearchForm {
    date: NaiveDate,
    page: u32,
    page_size: u32,
    order_column: &'static str,
}

impl HnxSearchForm {
    /// Defaults: page 1, [`HNX_MAX_PAGE_SIZE`] rows, ascending on `col_a`.
    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            date,
            page: 1,
            page_size: HNX_MAX_PAGE_SIZE,
            order_column: "col_a",
        }
    }

    /// Sets the page number (1-indexed).
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    /// Sets rows per page, clamped to `1..=HNX_MAX_PAGE_SIZE`.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, HNX_MAX_PAGE_SIZE);
        self
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// The composite "as of date" key. The same date is repeated at both ends;
    /// that is the only form the upstream accepts for a single-day query.
    pub fn key_search(&self) -> String {
        let day = slash_date(self.date);
        format!("{}|0|-1|-1|0|{}", day, day)
    }

    pub fn to_form_body(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .append_pair("p_keysearch", &self.key_search())
            .append_pair("pColOrder", self.order_column)
            .append_pair("pOrderType", "ASC")
            .append_pair("pCurrentPage", &self.page.to_string())
            .append_pair("pRecordOnPage", &self.page_size.to_string())
            .append_pair("pIsSearch", "1")
            .finish()
    }
}
