use serde::Serialize;

use crate::domain::CompetitorAnalysis;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    pub fn label(&self) -> &'static str {
        match self {
            ConfidenceLevel::High => "High Confidence",
            ConfidenceLevel::Medium => "Medium Confidence",
            ConfidenceLevel::Low => "Low Confidence",
        }
    }
}

/// A 0-100 completeness score over an extracted record.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ConfidenceScore {
    pub score: u8,
    pub level: ConfidenceLevel,
}

/// Score how completely the record was populated from source content.
///
/// Fixed weighted rubric, 100 points total: pricing 40, positioning 25,
/// features 15, social proof 15, calls to action 5. Derived on demand from
/// current section population; absent fields contribute zero, never fail.
pub fn confidence_score(analysis: &CompetitorAnalysis) -> ConfidenceScore {
    let mut points = 0.0_f64;

    // Pricing (40): 20 for having tiers at all, up to 20 more scaled by
    // the fraction of tiers carrying a real price.
    let tiers = &analysis.pricing.tiers;
    if !tiers.is_empty() {
        points += 20.0;
        let priced = tiers.iter().filter(|t| t.is_priced()).count();
        points += (priced as f64 / tiers.len() as f64 * 20.0).min(20.0);
    }

    // Positioning (25)
    let positioning = &analysis.positioning;
    if positioning.tagline.as_deref().is_some_and(|t| !t.is_empty()) {
        points += 5.0;
    }
    if !positioning.target_customers.is_empty() {
        points += 5.0;
    }
    if !positioning.differentiators.is_empty() {
        points += 10.0;
    }
    if !positioning.value_propositions.is_empty() {
        points += 5.0;
    }

    // Features (15)
    if !analysis.features.highlighted.is_empty() {
        points += 10.0;
    }
    if !analysis.features.by_tier.is_empty() {
        points += 5.0;
    }

    // Social proof (15)
    if !analysis.social_proof.customer_logos.is_empty() {
        points += 5.0;
    }
    if !analysis.social_proof.metrics_claimed.is_empty() {
        points += 5.0;
    }
    if !analysis.social_proof.partnerships.is_empty() {
        points += 5.0;
    }

    // Calls to action (5)
    if analysis
        .calls_to_action
        .primary
        .as_deref()
        .is_some_and(|p| !p.is_empty())
    {
        points += 5.0;
    }

    let score = points.round() as u8;
    let level = if score >= 80 {
        ConfidenceLevel::High
    } else if score >= 50 {
        ConfidenceLevel::Medium
    } else {
        ConfidenceLevel::Low
    };

    ConfidenceScore { score, level }
}
