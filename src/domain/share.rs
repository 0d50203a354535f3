//! Compact share encoding for analyses.
//!
//! A record is reduced to its headline fields (company, tier names/prices,
//! tagline, top features and proof points), serialized as JSON and wrapped
//! in URL-safe base64. Decoding is lossy on deeper fields by design, but
//! company name, tier names/prices and tagline survive exactly.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::app::{BattlecardError, Result};
use crate::domain::analysis::{
    AnalysisSource, CompetitorAnalysis, Positioning, Pricing, PricingTier, SocialProof,
    TierConfidence,
};

#[derive(Debug, Serialize, Deserialize)]
struct SharePayload {
    n: String,
    d: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    p: Option<SharePricing>,
    #[serde(skip_serializing_if = "Option::is_none")]
    o: Option<SharePositioning>,
    f: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    s: Option<ShareSocialProof>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SharePricing {
    t: Vec<ShareTier>,
    f: bool,
    e: bool,
    tr: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct ShareTier {
    n: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    p: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    b: Option<String>,
    f: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SharePositioning {
    #[serde(skip_serializing_if = "Option::is_none")]
    tg: Option<String>,
    tc: Vec<String>,
    df: Vec<String>,
    vp: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ShareSocialProof {
    cl: Vec<String>,
    mc: Vec<String>,
}

fn truncated(list: &[String], max: usize) -> Vec<String> {
    list.iter().take(max).cloned().collect()
}

/// Encode an analysis into a URL-safe share token.
pub fn encode_for_share(analysis: &CompetitorAnalysis) -> Result<String> {
    let payload = SharePayload {
        n: analysis.company_name.clone(),
        d: analysis.analyzed_at,
        p: (!analysis.pricing.tiers.is_empty()).then(|| SharePricing {
            t: analysis
                .pricing
                .tiers
                .iter()
                .map(|t| ShareTier {
                    n: t.name.clone(),
                    p: t.price.clone(),
                    b: t.billing_period.clone(),
                    f: truncated(&t.key_features, 5),
                })
                .collect(),
            f: analysis.pricing.has_free_tier,
            e: analysis.pricing.has_enterprise_tier,
            tr: analysis.pricing.trial_available,
        }),
        o: Some(SharePositioning {
            tg: analysis.positioning.tagline.clone(),
            tc: truncated(&analysis.positioning.target_customers, 3),
            df: truncated(&analysis.positioning.differentiators, 3),
            vp: truncated(&analysis.positioning.value_propositions, 3),
        }),
        f: truncated(&analysis.features.highlighted, 10),
        s: Some(ShareSocialProof {
            cl: truncated(&analysis.social_proof.customer_logos, 5),
            mc: truncated(&analysis.social_proof.metrics_claimed, 3),
        }),
    };

    let json = serde_json::to_string(&payload)?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

/// Decode a share token back into a (lossy) analysis record.
pub fn decode_shared(encoded: &str) -> Result<CompetitorAnalysis> {
    let bytes = URL_SAFE_NO_PAD
        .decode(encoded.trim())
        .map_err(|e| BattlecardError::Other(format!("Invalid share token: {}", e)))?;
    let payload: SharePayload = serde_json::from_slice(&bytes)?;

    let pricing = payload
        .p
        .map(|p| Pricing {
            tiers: p
                .t
                .into_iter()
                .map(|t| PricingTier {
                    name: t.n,
                    price: t.p,
                    billing_period: t.b,
                    key_features: t.f,
                    confidence: Some(TierConfidence::Medium),
                    ..Default::default()
                })
                .collect(),
            has_free_tier: p.f,
            has_enterprise_tier: p.e,
            trial_available: p.tr,
            ..Default::default()
        })
        .unwrap_or_default();

    let positioning = payload
        .o
        .map(|o| Positioning {
            tagline: o.tg,
            target_customers: o.tc,
            differentiators: o.df,
            value_propositions: o.vp,
        })
        .unwrap_or_default();

    let social_proof = payload
        .s
        .map(|s| SocialProof {
            customer_logos: s.cl,
            metrics_claimed: s.mc,
            ..Default::default()
        })
        .unwrap_or_default();

    let id = CompetitorAnalysis::generate_id(&payload.n, &payload.d);
    Ok(CompetitorAnalysis {
        id,
        company_name: payload.n,
        analyzed_at: payload.d,
        source: AnalysisSource::Shared,
        raw_content: String::new(),
        pricing,
        features: crate::domain::analysis::Features {
            highlighted: payload.f,
            ..Default::default()
        },
        positioning,
        social_proof,
        calls_to_action: Default::default(),
        extracted_quotes: Vec::new(),
        swot: None,
        talking_points: None,
        price_history: Vec::new(),
        outcomes: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analysis::ExtractedProfile;
    use chrono::TimeZone;

    fn sample() -> CompetitorAnalysis {
        let mut a = CompetitorAnalysis::from_profile(
            ExtractedProfile {
                company_name: "Notion".into(),
                ..Default::default()
            },
            AnalysisSource::Paste,
            "raw".into(),
        );
        a.analyzed_at = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        a.pricing.tiers = vec![
            PricingTier {
                name: "Free".into(),
                price: Some("$0".into()),
                key_features: (0..8).map(|i| format!("feature {}", i)).collect(),
                ..Default::default()
            },
            PricingTier {
                name: "Plus".into(),
                price: Some("$10".into()),
                billing_period: Some("per seat/month".into()),
                ..Default::default()
            },
        ];
        a.pricing.has_free_tier = true;
        a.positioning.tagline = Some("Your wiki, docs, & projects. Together.".into());
        a.features.highlighted = vec!["Unlimited pages".into()];
        a.social_proof.customer_logos = vec!["Toyota".into(), "Spotify".into()];
        a
    }

    #[test]
    fn test_round_trip_preserves_core_fields() {
        let original = sample();
        let token = encode_for_share(&original).unwrap();
        let decoded = decode_shared(&token).unwrap();

        assert_eq!(decoded.company_name, "Notion");
        assert_eq!(decoded.analyzed_at, original.analyzed_at);
        assert_eq!(decoded.pricing.tiers.len(), 2);
        assert_eq!(decoded.pricing.tiers[0].name, "Free");
        assert_eq!(decoded.pricing.tiers[0].price.as_deref(), Some("$0"));
        assert_eq!(decoded.pricing.tiers[1].price.as_deref(), Some("$10"));
        assert_eq!(
            decoded.positioning.tagline.as_deref(),
            Some("Your wiki, docs, & projects. Together.")
        );
        assert_eq!(decoded.source, AnalysisSource::Shared);
    }

    #[test]
    fn test_tier_features_truncated_to_five() {
        let token = encode_for_share(&sample()).unwrap();
        let decoded = decode_shared(&token).unwrap();
        assert_eq!(decoded.pricing.tiers[0].key_features.len(), 5);
    }

    #[test]
    fn test_token_is_url_safe() {
        let token = encode_for_share(&sample()).unwrap();
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_shared("not!!valid@@base64").is_err());
    }
}
