use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue};

use cvsift_core::{BackendError, PageFetcher};

use crate::html::html_to_text;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Browser-like user agent; profile pages refuse obvious bots.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Blocking HTTP implementation of [`PageFetcher`].
///
/// Any non-success status is reported as [`BackendError::Status`]; the body
/// of a successful response is reduced to its visible text.
pub struct HttpPageFetcher {
    client: Client,
}

impl Default for HttpPageFetcher {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_TIMEOUT_SECS), DEFAULT_USER_AGENT)
    }
}

impl HttpPageFetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .default_headers(headers)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "falling back to a default HTTP client");
                Client::new()
            });
        Self { client }
    }
}

impl PageFetcher for HttpPageFetcher {
    fn fetch_page(&self, url: &str) -> Result<String, BackendError> {
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| BackendError::Fetch(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(url, status = status.as_u16(), "profile page request failed");
            return Err(BackendError::Status(status.as_u16()));
        }

        let body = resp.text().map_err(|e| BackendError::Fetch(e.to_string()))?;
        tracing::debug!(url, bytes = body.len(), "fetched profile page");
        Ok(html_to_text(&body))
    }
}
