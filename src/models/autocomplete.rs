//! Autocomplete suggestion model

use serde::Serialize;

/// One address suggestion, in provider relevance order
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Suggestion {
    /// Formatted address
    pub label: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    /// Provider place identifier
    pub place_id: Option<String>,
}
