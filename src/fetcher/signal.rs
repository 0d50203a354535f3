use regex::Regex;

/// Heuristic classifier for whether a text blob contains actual numeric
/// pricing, as opposed to tier names alone.
///
/// Pages often render tier names ("Free", "Pro", "Enterprise") server-side
/// while the price numbers are injected by client-side script, so the
/// detector requires a recognizable currency/numeric token before a fetch
/// result is trusted to carry pricing.
#[derive(Debug, Clone)]
pub struct PricingSignalDetector {
    patterns: Vec<Regex>,
}

impl Default for PricingSignalDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl PricingSignalDetector {
    pub fn new() -> Self {
        let patterns = [
            r"(?i)\$\d+",                           // Dollar amounts ($10, $99)
            r"(?i)€\d+",                            // Euro amounts
            r"(?i)£\d+",                            // Pound amounts
            r"(?i)\d+\s*/\s*(mo|month|year|yr)",    // Per month/year (10/month)
            r"(?i)\d+\s*per\s+(user|seat|member)",  // Per user pricing (10 per user)
        ]
        .iter()
        .map(|p| Regex::new(p).expect("invalid pricing pattern"))
        .collect();

        Self { patterns }
    }

    /// True when at least one price-pattern category matches.
    pub fn has_pricing_signal(&self, content: &str) -> bool {
        let categories = self
            .patterns
            .iter()
            .filter(|p| p.is_match(content))
            .count();
        categories >= 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_names_alone_are_not_signal() {
        let detector = PricingSignalDetector::new();
        assert!(!detector.has_pricing_signal("Free\nPro\nEnterprise"));
    }

    #[test]
    fn test_dollar_amount_is_signal() {
        let detector = PricingSignalDetector::new();
        assert!(detector.has_pricing_signal("Pro \u{2013} $10/month"));
    }

    #[test]
    fn test_contact_us_is_not_signal() {
        let detector = PricingSignalDetector::new();
        assert!(!detector.has_pricing_signal("Contact us for pricing"));
    }

    #[test]
    fn test_per_seat_is_signal() {
        let detector = PricingSignalDetector::new();
        assert!(detector.has_pricing_signal("$10 per seat"));
        assert!(detector.has_pricing_signal("from 8 per user billed annually"));
    }

    #[test]
    fn test_european_currencies() {
        let detector = PricingSignalDetector::new();
        assert!(detector.has_pricing_signal("ab €15 im Monat"));
        assert!(detector.has_pricing_signal("£20 for teams"));
    }

    #[test]
    fn test_period_suffix_is_signal() {
        let detector = PricingSignalDetector::new();
        assert!(detector.has_pricing_signal("starts at 12 / mo"));
        assert!(detector.has_pricing_signal("99/year for everything"));
    }

    #[test]
    fn test_empty_text() {
        let detector = PricingSignalDetector::new();
        assert!(!detector.has_pricing_signal(""));
    }
}
