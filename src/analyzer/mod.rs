//! Derived views over competitor records: completeness scoring and
//! analysis-over-time diffing. Both are pure functions of their inputs and
//! never fail; malformed or absent sub-fields contribute nothing.

mod confidence;
mod trend;

pub use confidence::{confidence_score, ConfidenceLevel, ConfidenceScore};
pub use trend::{
    compare_analyses, Change, ChangeCategory, ChangeImpact, ChangeKind, TrendReport,
};
