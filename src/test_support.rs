//! Test-only fakes for the transport and configuration seams.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use crate::transport::{HttpResponse, HttpTransport, TransportError};

/// Build a settings map from name/value pairs
pub fn settings(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}

/// Transport returning one canned outcome and recording every request
#[derive(Debug)]
pub struct FakeTransport {
    outcome: Result<HttpResponse, String>,
    requests: Mutex<Vec<(String, Duration)>>,
}

impl FakeTransport {
    pub fn with_response(response: HttpResponse) -> Self {
        Self {
            outcome: Ok(response),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            outcome: Err(message.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<(String, Duration)> {
        self.requests.lock().unwrap().clone()
    }

    /// The only request made; panics unless exactly one was recorded
    pub fn single_request(&self) -> (String, Duration) {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one request");
        requests.into_iter().next().unwrap()
    }
}

impl HttpTransport for FakeTransport {
    fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, TransportError> {
        self.requests
            .lock()
            .unwrap()
            .push((url.to_string(), timeout));
        self.outcome
            .clone()
            .map_err(TransportError::Connection)
    }
}
