//! Safety screening domain module.
//!
//! Every submitted turn passes through the screener before any other
//! processing. Screening is substring matching over configurable phrase
//! lists; it errs toward false positives.
//!
//! # Module Structure
//!
//! - `lexicon`: Phrase lists (`SafetyLexicon`) - configuration data, not logic
//! - `screener`: Tier classification (`SafetyScreener`, `SafetyAssessment`)
//! - `response`: Per-tier response builders and the crisis resource table

mod lexicon;
mod response;
mod screener;

// Re-export public API
pub use lexicon::SafetyLexicon;
pub use response::{crisis_resources, CrisisResource, SafetyResponse};
pub use screener::{RiskCategory, RiskTier, SafetyAssessment, SafetyScreener};
