pub mod analysis;
pub mod share;

pub use analysis::{
    AnalysisSource, CallsToAction, CompetitorAnalysis, ExtractedProfile, Features, Outcome,
    OutcomeResult, Positioning, PriceModel, PriceSnapshot, Pricing, PricingTier, Quote,
    SocialProof, Swot, TalkingPoints, TierConfidence, TierSnapshot,
};
