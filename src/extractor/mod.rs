//! Structured extraction through the LLM messages API.
//!
//! The model is an opaque text-generation service with a fixed JSON
//! contract: content in, competitor-record sections out. Responses are
//! schema-validated immediately so everything downstream works with a
//! fully-typed, defaulted record instead of optional-chaining through
//! untyped JSON.

mod client;
mod generators;

pub use client::AnthropicExtractor;
pub use generators::generate_extras;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::app::{BattlecardError, Result};
use crate::config::CompanyProfile;
use crate::domain::{CompetitorAnalysis, ExtractedProfile, Swot, TalkingPoints};

#[async_trait]
pub trait Extractor: Send + Sync {
    /// Extract a structured competitor profile from normalized page text.
    async fn extract(&self, content: &str) -> Result<ExtractedProfile>;

    /// Generate a SWOT analysis positioning the user's company against the
    /// analyzed competitor.
    async fn generate_swot(
        &self,
        analysis: &CompetitorAnalysis,
        company: &CompanyProfile,
    ) -> Result<Swot>;

    /// Generate sales talking points against the analyzed competitor.
    async fn generate_talking_points(
        &self,
        analysis: &CompetitorAnalysis,
        company: &CompanyProfile,
    ) -> Result<TalkingPoints>;
}

/// Parse a model response that should be a single JSON object. The model
/// occasionally wraps the JSON in prose; retry on the outermost brace pair
/// before giving up. Malformed output is surfaced, never retried upstream.
fn parse_json_payload<T: DeserializeOwned>(text: &str) -> Result<T> {
    if let Ok(value) = serde_json::from_str(text) {
        return Ok(value);
    }

    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
        if end > start {
            if let Ok(value) = serde_json::from_str(&text[start..=end]) {
                return Ok(value);
            }
        }
    }

    Err(BattlecardError::ExtractionParse(
        "response was not valid JSON".into(),
    ))
}
