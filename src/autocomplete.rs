//! Address autocomplete through the Geoapify Geocoding API

use std::time::Duration;

use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::Result;
use crate::config::{AUTOCOMPLETE_KEY_SETTING, ConfigProvider};
use crate::error::GeoapifyError;
use crate::models::Suggestion;
use crate::models::geoapify::AutocompleteFeature;
use crate::routing::resolve_api_key;
use crate::transport::{HttpTransport, build_url};

/// Timeout of the autocomplete request
pub const AUTOCOMPLETE_TIMEOUT: Duration = Duration::from_secs(8);
/// Queries shorter than this return no suggestions
pub const MIN_QUERY_CHARS: usize = 3;
/// Maximum number of suggestions returned
pub const MAX_SUGGESTIONS: usize = 10;

/// Gateway to the autocomplete endpoint
pub struct AutocompleteGateway<C, T> {
    config: C,
    transport: T,
}

impl<C: ConfigProvider, T: HttpTransport> AutocompleteGateway<C, T> {
    pub fn new(config: C, transport: T) -> Self {
        Self { config, transport }
    }

    /// Suggestions for free text, in provider order
    #[instrument(skip(self))]
    pub fn autocomplete(&self, text: Option<&str>) -> Result<Vec<Suggestion>> {
        let Some(text) = text.filter(|t| t.chars().count() >= MIN_QUERY_CHARS) else {
            debug!("Query too short, skipping autocomplete");
            return Ok(Vec::new());
        };

        let api_key = resolve_api_key(None, &self.config, AUTOCOMPLETE_KEY_SETTING)?;
        let url = build_url(
            &format!("{}/geocode/autocomplete", self.config.base_url()),
            &[("text", text.to_string()), ("apiKey", api_key)],
        );

        let response = self
            .transport
            .get(&url, AUTOCOMPLETE_TIMEOUT)?
            .error_for_status(&url)?;

        let body: Value = serde_json::from_str(&response.body)
            .map_err(|e| GeoapifyError::InvalidResponse(e.to_string()))?;

        let features: &[Value] = match body.get("features") {
            Some(Value::Array(features)) => features.as_slice(),
            _ => &[],
        };

        let suggestions = features
            .iter()
            .take(MAX_SUGGESTIONS)
            .map(|feature| {
                serde_json::from_value::<AutocompleteFeature>(feature.clone())
                    .map(Suggestion::from)
                    .map_err(|e| GeoapifyError::InvalidResponse(e.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;

        info!("Found {} suggestions", suggestions.len());
        Ok(suggestions)
    }
}
