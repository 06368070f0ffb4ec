//! HTTP client for the HOSE and HNX market data endpoints.

use chrono::NaiveDate;

use crate::{
    config::ClientConfig,
    request::{ExchangeRequest, RequestBody},
    user_agent::get_user_agent,
    Error,
};

/// HTTP client for both exchanges.
///
/// Holds one `reqwest::Client` with the configured timeout and a randomized
/// browser user agent. Every call goes to the network; nothing is cached.
pub struct Client {
    config: ClientConfig,
    http: reqwest::Client,
}

impl Client {
    /// Creates a client pointing at the production endpoints.
    pub fn new() -> Result<Self, Error> {
        Self::from_config(ClientConfig::default())
    }

    /// Creates a client with both exchanges at a custom base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str) -> Result<Self, Error> {
        Self::from_config(ClientConfig::with_base_url(base_url))
    }

    pub fn from_config(config: ClientConfig) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .user_agent(get_user_agent())
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::Transport(e.to_string())
            })?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Sends `request` to `base_url` and returns the body text of a 2xx response.
    pub async fn execute(&self, base_url: &str, request: &ExchangeRequest) -> Result<String, Error> {
        let url = request.url(base_url)?;
        let mut builder = self.http.request(request.method.clone(), url.clone());
        for (name, value) in &request.headers {
            builder = builder.header(*name, value);
        }
        if let RequestBody::Form(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let resp = builder.send().await.map_err(|e| {
            tracing::error!(%url, "Failed to send request: {}", e);
            Error::Transport(e.to_string())
        })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            tracing::error!(%url, "Failed to read response body: {}", e);
            Error::Transport(e.to_string())
        })?;

        if !status.is_success() {
            let snippet = truncate_body(&body);
            tracing::error!(%url, "Request failed with status {}: {}", status, snippet);
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: snippet,
            });
        }

        tracing::debug!(%url, status = status.as_u16(), bytes = body.len(), "upstream response");
        Ok(body)
    }

    /// Fetches the HOSE quote report for `date` and returns the decoded JSON
    /// document unchanged.
    pub async fn hose_quote_report(&self, date: NaiveDate) -> Result<serde_json::Value, Error> {
        let request = ExchangeRequest::hose_quote_report(date);
        let body = self.execute(&self.config.hose_base_url, &request).await?;
        serde_json::from_str(&body).map_err(|e| {
            let snippet = truncate_body(&body);
            tracing::error!("Failed to parse quote report: {} | body: {}", e, snippet);
            Error::MalformedResponse(format!("quote report is not valid JSON: {}", e))
        })
    }

    /// Fetches the raw HTML fragment of the HNX listed-securities report for `date`.
    pub async fn hnx_listed_html(&self, date: NaiveDate) -> Result<String, Error> {
        let request = ExchangeRequest::hnx_listed(date);
        self.execute(&self.config.hnx_base_url, &request).await
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        return body.to_string();
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...[truncated]", &body[..end])
}
