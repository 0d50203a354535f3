use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Where the analyzed content came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnalysisSource {
    Paste,
    Url { url: String },
    Shared,
}

impl AnalysisSource {
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisSource::Paste => "paste",
            AnalysisSource::Url { .. } => "url",
            AnalysisSource::Shared => "shared",
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            AnalysisSource::Url { url } => Some(url),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceModel {
    Free,
    PerSeat,
    Flat,
    UsageBased,
    ContactSales,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TierConfidence {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PricingTier {
    pub name: String,
    pub price: Option<String>,
    pub billing_period: Option<String>,
    pub price_model: Option<PriceModel>,
    pub target_customer: Option<String>,
    pub key_features: Vec<String>,
    pub limitations: Vec<String>,
    pub confidence: Option<TierConfidence>,
    pub seat_prices: Option<BTreeMap<String, String>>,
}

impl PricingTier {
    /// True when the tier carries a real price value. The extraction model
    /// sometimes emits the literal string "null", which counts as absent.
    pub fn is_priced(&self) -> bool {
        self.price
            .as_deref()
            .is_some_and(|p| !p.is_empty() && p != "null")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Pricing {
    pub tiers: Vec<PricingTier>,
    pub has_seat_types: bool,
    pub seat_types: Vec<String>,
    pub has_free_tier: bool,
    pub has_enterprise_tier: bool,
    pub trial_available: bool,
    pub trial_duration: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Positioning {
    pub tagline: Option<String>,
    pub target_customers: Vec<String>,
    pub differentiators: Vec<String>,
    pub value_propositions: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Features {
    pub highlighted: Vec<String>,
    pub by_tier: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SocialProof {
    pub customer_logos: Vec<String>,
    pub metrics_claimed: Vec<String>,
    pub case_studies: Vec<String>,
    pub awards: Vec<String>,
    pub partnerships: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CallsToAction {
    pub primary: Option<String>,
    pub secondary: Vec<String>,
    pub urgency_language: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Quote {
    pub text: String,
    pub category: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Swot {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub opportunities: Vec<String>,
    pub threats: Vec<String>,
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KeyDifferentiator {
    pub point: String,
    pub proof: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ObjectionHandler {
    pub objection: String,
    pub response: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TalkingPoints {
    pub elevator_pitch: Option<String>,
    pub key_differentiators: Vec<KeyDifferentiator>,
    pub objection_handlers: Vec<ObjectionHandler>,
    pub competitive_questions: Vec<String>,
    pub win_themes: Vec<String>,
}

/// A pricing snapshot taken when a competitor is re-analyzed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceSnapshot {
    pub date: DateTime<Utc>,
    pub tiers: Vec<TierSnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierSnapshot {
    pub name: String,
    pub price: Option<String>,
    pub price_model: Option<PriceModel>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeResult {
    Win,
    Loss,
    Pending,
}

/// A user-entered win/loss log entry against this competitor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outcome {
    pub id: String,
    pub result: OutcomeResult,
    pub date: DateTime<Utc>,
}

/// The sections returned by the extraction service, before the record is
/// tagged with an identifier, timestamp and source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExtractedProfile {
    pub company_name: String,
    pub pricing: Pricing,
    pub features: Features,
    pub positioning: Positioning,
    pub social_proof: SocialProof,
    pub calls_to_action: CallsToAction,
    pub extracted_quotes: Vec<Quote>,
}

/// A fully-tagged competitor analysis record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorAnalysis {
    pub id: String,
    pub company_name: String,
    pub analyzed_at: DateTime<Utc>,
    pub source: AnalysisSource,
    pub raw_content: String,
    pub pricing: Pricing,
    pub features: Features,
    pub positioning: Positioning,
    pub social_proof: SocialProof,
    pub calls_to_action: CallsToAction,
    #[serde(default)]
    pub extracted_quotes: Vec<Quote>,
    #[serde(default)]
    pub swot: Option<Swot>,
    #[serde(default)]
    pub talking_points: Option<TalkingPoints>,
    #[serde(default)]
    pub price_history: Vec<PriceSnapshot>,
    #[serde(default)]
    pub outcomes: Vec<Outcome>,
}

impl CompetitorAnalysis {
    /// Tag an extracted profile with a fresh identifier and timestamp.
    pub fn from_profile(
        profile: ExtractedProfile,
        source: AnalysisSource,
        raw_content: String,
    ) -> Self {
        let analyzed_at = Utc::now();
        let id = Self::generate_id(&profile.company_name, &analyzed_at);
        Self {
            id,
            company_name: profile.company_name,
            analyzed_at,
            source,
            raw_content,
            pricing: profile.pricing,
            features: profile.features,
            positioning: profile.positioning,
            social_proof: profile.social_proof,
            calls_to_action: profile.calls_to_action,
            extracted_quotes: profile.extracted_quotes,
            swot: None,
            talking_points: None,
            price_history: Vec::new(),
            outcomes: Vec::new(),
        }
    }

    /// Generate a deterministic ID from company name and analysis instant
    pub fn generate_id(company_name: &str, analyzed_at: &DateTime<Utc>) -> String {
        let mut hasher = Sha256::new();
        hasher.update(company_name.to_lowercase().as_bytes());
        hasher.update(analyzed_at.to_rfc3339().as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Case-insensitive company identity check.
    pub fn same_company(&self, other_name: &str) -> bool {
        self.company_name.to_lowercase() == other_name.to_lowercase()
    }

    /// Snapshot of current tier pricing, for the price history log.
    pub fn price_snapshot(&self) -> Option<PriceSnapshot> {
        if self.pricing.tiers.is_empty() {
            return None;
        }
        Some(PriceSnapshot {
            date: self.analyzed_at,
            tiers: self
                .pricing
                .tiers
                .iter()
                .map(|t| TierSnapshot {
                    name: t.name.clone(),
                    price: t.price.clone(),
                    price_model: t.price_model,
                })
                .collect(),
        })
    }

    /// Merge a fresh analysis over a previously-saved one of the same
    /// company. The original identifier survives, the previous pricing is
    /// appended to the history (deduplicated by date), and win/loss
    /// outcomes carry over.
    pub fn merge_resave(previous: &CompetitorAnalysis, mut fresh: CompetitorAnalysis) -> Self {
        fresh.id = previous.id.clone();

        let mut history = previous.price_history.clone();
        if let Some(snapshot) = previous.price_snapshot() {
            if !history.iter().any(|h| h.date == snapshot.date) {
                history.push(snapshot);
            }
        }
        fresh.price_history = history;
        fresh.outcomes = previous.outcomes.clone();
        fresh
    }
}
