//! HTTP transport used by the gateways
//!
//! The gateways only ever issue single GET requests, so the seam is a small
//! trait returning the status code and the raw body. The production
//! implementation wraps a blocking `reqwest` client.

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::blocking::Client;
use thiserror::Error;
use tracing::{debug, warn};

/// Transport-level failures
#[derive(Error, Debug)]
pub enum TransportError {
    /// The request could not be sent or the body could not be read
    #[error(transparent)]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("HTTP status {status} for url ({url})")]
    Status { status: u16, url: String },

    /// Connection failure reported by a non-reqwest transport
    #[error("{0}")]
    Connection(String),
}

/// Status and body of a completed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// True for 2xx statuses
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-success status into a `TransportError::Status`
    ///
    /// The query string is dropped from the reported URL since it carries
    /// the API key.
    pub fn error_for_status(self, url: &str) -> Result<Self, TransportError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(TransportError::Status {
                status: self.status,
                url: strip_query(url).to_string(),
            })
        }
    }
}

/// Blocking GET transport
pub trait HttpTransport {
    fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, TransportError>;
}

impl<T: HttpTransport + ?Sized> HttpTransport for &T {
    fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, TransportError> {
        (**self).get(url, timeout)
    }
}

impl<T: HttpTransport + ?Sized> HttpTransport for Arc<T> {
    fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, TransportError> {
        (**self).get(url, timeout)
    }
}

/// `reqwest` backed transport
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a new transport
    ///
    /// Must be called outside of an async runtime: the blocking client owns
    /// its own runtime.
    pub fn new() -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(concat!("geoapify-gateway/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl HttpTransport for ReqwestTransport {
    fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, TransportError> {
        let start = Instant::now();
        let response = self.client.get(url).timeout(timeout).send().map_err(|e| {
            warn!(
                "GET {} failed after {:.3}s: {}",
                strip_query(url),
                start.elapsed().as_secs_f64(),
                e
            );
            e.without_url()
        })?;

        let status = response.status().as_u16();
        let body = response.text().map_err(reqwest::Error::without_url)?;

        debug!(
            "GET {} -> {} in {:.3}s",
            strip_query(url),
            status,
            start.elapsed().as_secs_f64()
        );

        Ok(HttpResponse { status, body })
    }
}

/// Build `base?k=v&...` with every value percent-encoded
#[must_use]
pub fn build_url(base: &str, params: &[(&str, String)]) -> String {
    let query = params
        .iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&");

    if query.is_empty() {
        base.to_string()
    } else {
        format!("{base}?{query}")
    }
}

fn strip_query(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}
