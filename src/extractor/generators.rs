use tracing::warn;

use crate::config::CompanyProfile;
use crate::domain::{CompetitorAnalysis, Swot, TalkingPoints};
use crate::extractor::Extractor;

/// Generate SWOT and talking points for a freshly-analyzed competitor.
///
/// The two calls are independent and awaited jointly; either branch
/// failing yields `None` for that branch without aborting the other.
pub async fn generate_extras(
    extractor: &dyn Extractor,
    analysis: &CompetitorAnalysis,
    company: &CompanyProfile,
) -> (Option<Swot>, Option<TalkingPoints>) {
    let (swot, talking_points) = tokio::join!(
        extractor.generate_swot(analysis, company),
        extractor.generate_talking_points(analysis, company),
    );

    let swot = match swot {
        Ok(s) => Some(s),
        Err(e) => {
            warn!(company = %analysis.company_name, error = %e, "SWOT generation failed");
            None
        }
    };
    let talking_points = match talking_points {
        Ok(t) => Some(t),
        Err(e) => {
            warn!(company = %analysis.company_name, error = %e, "talking points generation failed");
            None
        }
    };

    (swot, talking_points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{BattlecardError, Result};
    use crate::domain::{AnalysisSource, ExtractedProfile};
    use async_trait::async_trait;

    struct FakeExtractor {
        swot_fails: bool,
        talking_points_fail: bool,
    }

    #[async_trait]
    impl Extractor for FakeExtractor {
        async fn extract(&self, _content: &str) -> Result<ExtractedProfile> {
            Ok(ExtractedProfile::default())
        }

        async fn generate_swot(
            &self,
            _analysis: &CompetitorAnalysis,
            _company: &CompanyProfile,
        ) -> Result<Swot> {
            if self.swot_fails {
                Err(BattlecardError::ExtractionParse("bad swot".into()))
            } else {
                Ok(Swot {
                    strengths: vec!["Faster onboarding".into()],
                    ..Default::default()
                })
            }
        }

        async fn generate_talking_points(
            &self,
            _analysis: &CompetitorAnalysis,
            _company: &CompanyProfile,
        ) -> Result<TalkingPoints> {
            if self.talking_points_fail {
                Err(BattlecardError::ExtractionParse("bad points".into()))
            } else {
                Ok(TalkingPoints {
                    elevator_pitch: Some("We win on speed.".into()),
                    ..Default::default()
                })
            }
        }
    }

    fn analysis() -> CompetitorAnalysis {
        CompetitorAnalysis::from_profile(
            ExtractedProfile {
                company_name: "Acme".into(),
                ..Default::default()
            },
            AnalysisSource::Paste,
            String::new(),
        )
    }

    #[tokio::test]
    async fn test_both_branches_succeed() {
        let extractor = FakeExtractor {
            swot_fails: false,
            talking_points_fail: false,
        };
        let (swot, points) =
            generate_extras(&extractor, &analysis(), &CompanyProfile::default()).await;
        assert!(swot.is_some());
        assert!(points.is_some());
    }

    #[tokio::test]
    async fn test_failing_swot_does_not_abort_talking_points() {
        let extractor = FakeExtractor {
            swot_fails: true,
            talking_points_fail: false,
        };
        let (swot, points) =
            generate_extras(&extractor, &analysis(), &CompanyProfile::default()).await;
        assert!(swot.is_none());
        assert_eq!(points.unwrap().elevator_pitch.as_deref(), Some("We win on speed."));
    }

    #[tokio::test]
    async fn test_failing_talking_points_does_not_abort_swot() {
        let extractor = FakeExtractor {
            swot_fails: false,
            talking_points_fail: true,
        };
        let (swot, points) =
            generate_extras(&extractor, &analysis(), &CompanyProfile::default()).await;
        assert!(swot.is_some());
        assert!(points.is_none());
    }
}
