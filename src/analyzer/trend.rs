use serde::Serialize;

use crate::domain::CompetitorAnalysis;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    PriceChange,
    TierAdded,
    TierRemoved,
    FeatureAdded,
    FeatureRemoved,
    TaglineChanged,
    DifferentiatorAdded,
    DifferentiatorRemoved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeCategory {
    Pricing,
    Features,
    Positioning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeImpact {
    PriceIncrease,
    PriceDecrease,
    Significant,
    Positive,
    Negative,
    Neutral,
}

/// One detected difference between two analyses of the same company.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Change {
    #[serde(rename = "type")]
    pub kind: ChangeKind,
    pub category: ChangeCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_value: Option<String>,
    pub impact: ChangeImpact,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendReport {
    pub has_changes: bool,
    pub changes: Vec<Change>,
    pub summary: String,
}

/// Compare two analyses of the same company taken at different times.
///
/// Emission order is fixed: tier price changes and additions (new-tier
/// order), tier removals (old-tier order), feature additions, feature
/// removals, tagline, differentiator additions, differentiator removals.
/// Never fails; unparsable prices degrade to neutral impact.
pub fn compare_analyses(old: &CompetitorAnalysis, new: &CompetitorAnalysis) -> TrendReport {
    let mut changes = Vec::new();

    let old_tiers = &old.pricing.tiers;
    let new_tiers = &new.pricing.tiers;

    for new_tier in new_tiers {
        let old_tier = old_tiers
            .iter()
            .find(|t| t.name.to_lowercase() == new_tier.name.to_lowercase());
        match old_tier {
            Some(old_tier) => {
                if old_tier.price != new_tier.price {
                    changes.push(Change {
                        kind: ChangeKind::PriceChange,
                        category: ChangeCategory::Pricing,
                        tier: Some(new_tier.name.clone()),
                        old_value: old_tier.price.clone(),
                        new_value: new_tier.price.clone(),
                        impact: price_impact(old_tier.price.as_deref(), new_tier.price.as_deref()),
                    });
                }
            }
            None => {
                changes.push(Change {
                    kind: ChangeKind::TierAdded,
                    category: ChangeCategory::Pricing,
                    tier: Some(new_tier.name.clone()),
                    old_value: None,
                    new_value: new_tier.price.clone(),
                    impact: ChangeImpact::Neutral,
                });
            }
        }
    }

    for old_tier in old_tiers {
        let still_exists = new_tiers
            .iter()
            .any(|t| t.name.to_lowercase() == old_tier.name.to_lowercase());
        if !still_exists {
            changes.push(Change {
                kind: ChangeKind::TierRemoved,
                category: ChangeCategory::Pricing,
                tier: Some(old_tier.name.clone()),
                old_value: old_tier.price.clone(),
                new_value: None,
                impact: ChangeImpact::Significant,
            });
        }
    }

    let old_features = &old.features.highlighted;
    let new_features = &new.features.highlighted;

    for feature in new_features.iter().filter(|f| !old_features.contains(f)) {
        changes.push(Change {
            kind: ChangeKind::FeatureAdded,
            category: ChangeCategory::Features,
            tier: None,
            old_value: None,
            new_value: Some(feature.clone()),
            impact: ChangeImpact::Positive,
        });
    }
    for feature in old_features.iter().filter(|f| !new_features.contains(f)) {
        changes.push(Change {
            kind: ChangeKind::FeatureRemoved,
            category: ChangeCategory::Features,
            tier: None,
            old_value: Some(feature.clone()),
            new_value: None,
            impact: ChangeImpact::Negative,
        });
    }

    // A tagline that disappears entirely is not reported.
    if old.positioning.tagline != new.positioning.tagline {
        if let Some(new_tagline) = new.positioning.tagline.as_deref().filter(|t| !t.is_empty()) {
            changes.push(Change {
                kind: ChangeKind::TaglineChanged,
                category: ChangeCategory::Positioning,
                tier: None,
                old_value: old.positioning.tagline.clone(),
                new_value: Some(new_tagline.to_string()),
                impact: ChangeImpact::Neutral,
            });
        }
    }

    let old_diffs = &old.positioning.differentiators;
    let new_diffs = &new.positioning.differentiators;

    for diff in new_diffs.iter().filter(|d| !old_diffs.contains(d)) {
        changes.push(Change {
            kind: ChangeKind::DifferentiatorAdded,
            category: ChangeCategory::Positioning,
            tier: None,
            old_value: None,
            new_value: Some(diff.clone()),
            impact: ChangeImpact::Neutral,
        });
    }
    for diff in old_diffs.iter().filter(|d| !new_diffs.contains(d)) {
        changes.push(Change {
            kind: ChangeKind::DifferentiatorRemoved,
            category: ChangeCategory::Positioning,
            tier: None,
            old_value: Some(diff.clone()),
            new_value: None,
            impact: ChangeImpact::Neutral,
        });
    }

    let summary = change_summary(&changes);
    TrendReport {
        has_changes: !changes.is_empty(),
        changes,
        summary,
    }
}

fn price_impact(old: Option<&str>, new: Option<&str>) -> ChangeImpact {
    let (Some(old_num), Some(new_num)) = (
        old.and_then(parse_price),
        new.and_then(parse_price),
    ) else {
        return ChangeImpact::Neutral;
    };

    if new_num > old_num {
        ChangeImpact::PriceIncrease
    } else if new_num < old_num {
        ChangeImpact::PriceDecrease
    } else {
        ChangeImpact::Neutral
    }
}

/// Extract the first contiguous digits/commas/decimal-point run from a
/// price display string and parse it as a number.
fn parse_price(price: &str) -> Option<f64> {
    let start = price.find(|c: char| c.is_ascii_digit() || c == ',' || c == '.')?;
    let run: String = price[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .filter(|c| *c != ',')
        .collect();
    run.parse::<f64>().ok()
}

fn change_summary(changes: &[Change]) -> String {
    let price_changes: Vec<_> = changes
        .iter()
        .filter(|c| c.kind == ChangeKind::PriceChange)
        .collect();
    let feature_changes = changes
        .iter()
        .filter(|c| c.category == ChangeCategory::Features)
        .count();
    let positioning_changes = changes
        .iter()
        .filter(|c| c.category == ChangeCategory::Positioning)
        .count();

    let mut parts = Vec::new();

    let increases = price_changes
        .iter()
        .filter(|c| c.impact == ChangeImpact::PriceIncrease)
        .count();
    let decreases = price_changes
        .iter()
        .filter(|c| c.impact == ChangeImpact::PriceDecrease)
        .count();
    if increases > 0 {
        parts.push(format!(
            "{} price increase{}",
            increases,
            if increases > 1 { "s" } else { "" }
        ));
    }
    if decreases > 0 {
        parts.push(format!(
            "{} price decrease{}",
            decreases,
            if decreases > 1 { "s" } else { "" }
        ));
    }
    if feature_changes > 0 {
        parts.push(format!(
            "{} feature change{}",
            feature_changes,
            if feature_changes > 1 { "s" } else { "" }
        ));
    }
    if positioning_changes > 0 {
        parts.push(format!(
            "{} positioning update{}",
            positioning_changes,
            if positioning_changes > 1 { "s" } else { "" }
        ));
    }

    if parts.is_empty() {
        "No significant changes".to_string()
    } else {
        parts.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AnalysisSource, ExtractedProfile, PricingTier};

    fn analysis_with_tiers(tiers: Vec<(&str, Option<&str>)>) -> CompetitorAnalysis {
        let mut a = CompetitorAnalysis::from_profile(
            ExtractedProfile {
                company_name: "Acme".into(),
                ..Default::default()
            },
            AnalysisSource::Paste,
            String::new(),
        );
        a.pricing.tiers = tiers
            .into_iter()
            .map(|(name, price)| PricingTier {
                name: name.into(),
                price: price.map(String::from),
                ..Default::default()
            })
            .collect();
        a
    }

    #[test]
    fn test_price_increase_detected() {
        let old = analysis_with_tiers(vec![("Pro", Some("$10"))]);
        let new = analysis_with_tiers(vec![("Pro", Some("$15"))]);

        let report = compare_analyses(&old, &new);
        assert!(report.has_changes);
        assert_eq!(report.changes.len(), 1);

        let change = &report.changes[0];
        assert_eq!(change.kind, ChangeKind::PriceChange);
        assert_eq!(change.impact, ChangeImpact::PriceIncrease);
        assert_eq!(change.old_value.as_deref(), Some("$10"));
        assert_eq!(change.new_value.as_deref(), Some("$15"));
        assert_eq!(report.summary, "1 price increase");
    }

    #[test]
    fn test_price_decrease_detected() {
        let old = analysis_with_tiers(vec![("Pro", Some("$15/month"))]);
        let new = analysis_with_tiers(vec![("Pro", Some("$12/month"))]);

        let report = compare_analyses(&old, &new);
        assert_eq!(report.changes[0].impact, ChangeImpact::PriceDecrease);
    }

    #[test]
    fn test_tier_name_match_is_case_insensitive() {
        let old = analysis_with_tiers(vec![("pro", Some("$10"))]);
        let new = analysis_with_tiers(vec![("Pro", Some("$10"))]);

        let report = compare_analyses(&old, &new);
        assert!(!report.has_changes);
    }

    #[test]
    fn test_tier_removed_is_significant() {
        let old = analysis_with_tiers(vec![("Basic", Some("$5")), ("Pro", Some("$10"))]);
        let new = analysis_with_tiers(vec![("Pro", Some("$10"))]);

        let report = compare_analyses(&old, &new);
        assert!(report.has_changes);
        assert_eq!(report.changes.len(), 1);
        assert_eq!(report.changes[0].kind, ChangeKind::TierRemoved);
        assert_eq!(report.changes[0].tier.as_deref(), Some("Basic"));
        assert_eq!(report.changes[0].impact, ChangeImpact::Significant);
    }

    #[test]
    fn test_tier_added_is_neutral() {
        let old = analysis_with_tiers(vec![("Pro", Some("$10"))]);
        let new = analysis_with_tiers(vec![("Pro", Some("$10")), ("Business", Some("$18"))]);

        let report = compare_analyses(&old, &new);
        assert_eq!(report.changes.len(), 1);
        assert_eq!(report.changes[0].kind, ChangeKind::TierAdded);
        assert_eq!(report.changes[0].impact, ChangeImpact::Neutral);
    }

    #[test]
    fn test_identical_records_have_no_changes() {
        let old = analysis_with_tiers(vec![("Pro", Some("$10"))]);
        let new = analysis_with_tiers(vec![("Pro", Some("$10"))]);

        let report = compare_analyses(&old, &new);
        assert!(!report.has_changes);
        assert!(report.changes.is_empty());
        assert_eq!(report.summary, "No significant changes");
    }

    #[test]
    fn test_unparsable_price_change_is_neutral() {
        let old = analysis_with_tiers(vec![("Enterprise", Some("Contact sales"))]);
        let new = analysis_with_tiers(vec![("Enterprise", Some("Talk to us"))]);

        let report = compare_analyses(&old, &new);
        assert_eq!(report.changes[0].kind, ChangeKind::PriceChange);
        assert_eq!(report.changes[0].impact, ChangeImpact::Neutral);
    }

    #[test]
    fn test_feature_additions_and_removals() {
        let mut old = analysis_with_tiers(vec![]);
        old.features.highlighted = vec!["SSO".into(), "Audit log".into()];
        let mut new = analysis_with_tiers(vec![]);
        new.features.highlighted = vec!["SSO".into(), "SCIM".into()];

        let report = compare_analyses(&old, &new);
        assert_eq!(report.changes.len(), 2);
        assert_eq!(report.changes[0].kind, ChangeKind::FeatureAdded);
        assert_eq!(report.changes[0].new_value.as_deref(), Some("SCIM"));
        assert_eq!(report.changes[0].impact, ChangeImpact::Positive);
        assert_eq!(report.changes[1].kind, ChangeKind::FeatureRemoved);
        assert_eq!(report.changes[1].old_value.as_deref(), Some("Audit log"));
        assert_eq!(report.changes[1].impact, ChangeImpact::Negative);
        assert_eq!(report.summary, "2 feature changes");
    }

    #[test]
    fn test_tagline_change_reported_when_new_is_present() {
        let mut old = analysis_with_tiers(vec![]);
        old.positioning.tagline = Some("Old tagline".into());
        let mut new = analysis_with_tiers(vec![]);
        new.positioning.tagline = Some("New tagline".into());

        let report = compare_analyses(&old, &new);
        assert_eq!(report.changes.len(), 1);
        assert_eq!(report.changes[0].kind, ChangeKind::TaglineChanged);
        assert_eq!(report.changes[0].impact, ChangeImpact::Neutral);
    }

    #[test]
    fn test_tagline_disappearing_is_not_reported() {
        let mut old = analysis_with_tiers(vec![]);
        old.positioning.tagline = Some("Old tagline".into());
        let new = analysis_with_tiers(vec![]);

        let report = compare_analyses(&old, &new);
        assert!(!report.has_changes);
    }

    #[test]
    fn test_differentiator_changes_are_neutral() {
        let mut old = analysis_with_tiers(vec![]);
        old.positioning.differentiators = vec!["Fastest".into()];
        let mut new = analysis_with_tiers(vec![]);
        new.positioning.differentiators = vec!["Most secure".into()];

        let report = compare_analyses(&old, &new);
        assert_eq!(report.changes.len(), 2);
        assert_eq!(report.changes[0].kind, ChangeKind::DifferentiatorAdded);
        assert_eq!(report.changes[1].kind, ChangeKind::DifferentiatorRemoved);
        assert!(report
            .changes
            .iter()
            .all(|c| c.impact == ChangeImpact::Neutral));
    }

    #[test]
    fn test_emission_order() {
        let mut old = analysis_with_tiers(vec![("Basic", Some("$5")), ("Pro", Some("$10"))]);
        old.features.highlighted = vec!["Old feature".into()];
        old.positioning.tagline = Some("Old".into());
        let mut new = analysis_with_tiers(vec![("Pro", Some("$15")), ("Business", Some("$18"))]);
        new.features.highlighted = vec!["New feature".into()];
        new.positioning.tagline = Some("New".into());

        let kinds: Vec<ChangeKind> = compare_analyses(&old, &new)
            .changes
            .iter()
            .map(|c| c.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                ChangeKind::PriceChange,
                ChangeKind::TierAdded,
                ChangeKind::TierRemoved,
                ChangeKind::FeatureAdded,
                ChangeKind::FeatureRemoved,
                ChangeKind::TaglineChanged,
            ]
        );
    }

    #[test]
    fn test_parse_price_handles_commas_and_noise() {
        assert_eq!(parse_price("$1,200.50/year"), Some(1200.50));
        assert_eq!(parse_price("from 99 per seat"), Some(99.0));
        assert_eq!(parse_price("Contact sales"), None);
        assert_eq!(parse_price("Contact sales."), None);
    }
}
