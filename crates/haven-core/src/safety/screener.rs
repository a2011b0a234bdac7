//! Per-turn risk classification.

use serde::{Deserialize, Serialize};
use strum_macros::Display;

use super::lexicon::SafetyLexicon;

/// Safety-risk classification level for one utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum RiskTier {
    None,
    Warning,
    Emergency,
}

/// Risk category attached to a non-`None` tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum RiskCategory {
    SuicidalIdeation,
    SelfHarm,
}

/// Result of screening a single utterance. Produced per turn and never
/// persisted beyond it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyAssessment {
    pub tier: RiskTier,
    pub category: Option<RiskCategory>,
}

impl SafetyAssessment {
    /// Whether this assessment requires a safety response instead of normal
    /// turn processing.
    pub fn is_flagged(&self) -> bool {
        self.tier != RiskTier::None
    }
}

/// Classifies utterances against the configured phrase lexicon.
///
/// `evaluate` is a pure function of the input text: it consults no session
/// or emotional state and mutates nothing.
#[derive(Debug, Clone)]
pub struct SafetyScreener {
    lexicon: SafetyLexicon,
}

impl SafetyScreener {
    pub fn new(lexicon: SafetyLexicon) -> Self {
        Self { lexicon }
    }

    /// Classifies `text` into a risk tier.
    ///
    /// The input is lowercased and whitespace-normalized, then checked
    /// against the suicidal-ideation phrases first (any match short-circuits
    /// to `Emergency`), then the self-harm phrases (`Warning`). Matching is
    /// plain substring containment.
    pub fn evaluate(&self, text: &str) -> SafetyAssessment {
        let normalized = normalize(text);

        if self
            .lexicon
            .suicidal_ideation
            .iter()
            .any(|phrase| normalized.contains(phrase.as_str()))
        {
            return SafetyAssessment {
                tier: RiskTier::Emergency,
                category: Some(RiskCategory::SuicidalIdeation),
            };
        }

        if self
            .lexicon
            .self_harm
            .iter()
            .any(|phrase| normalized.contains(phrase.as_str()))
        {
            return SafetyAssessment {
                tier: RiskTier::Warning,
                category: Some(RiskCategory::SelfHarm),
            };
        }

        SafetyAssessment {
            tier: RiskTier::None,
            category: None,
        }
    }
}

impl Default for SafetyScreener {
    fn default() -> Self {
        Self::new(SafetyLexicon::default())
    }
}

/// Lowercases and collapses all whitespace runs to single spaces, so phrases
/// match across line breaks and irregular spacing.
fn normalize(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_text_is_none() {
        let screener = SafetyScreener::default();
        let assessment = screener.evaluate("work has been stressful");
        assert_eq!(assessment.tier, RiskTier::None);
        assert_eq!(assessment.category, None);
        assert!(!assessment.is_flagged());
    }

    #[test]
    fn test_suicidal_ideation_is_emergency() {
        let screener = SafetyScreener::default();
        let assessment = screener.evaluate("I want to end my life");
        assert_eq!(assessment.tier, RiskTier::Emergency);
        assert_eq!(assessment.category, Some(RiskCategory::SuicidalIdeation));
    }

    #[test]
    fn test_self_harm_is_warning() {
        let screener = SafetyScreener::default();
        let assessment = screener.evaluate("sometimes I want to hurt myself");
        assert_eq!(assessment.tier, RiskTier::Warning);
        assert_eq!(assessment.category, Some(RiskCategory::SelfHarm));
    }

    #[test]
    fn test_ideation_outranks_self_harm_in_one_utterance() {
        let screener = SafetyScreener::default();
        let assessment = screener.evaluate("I hurt myself and I want to end my life");
        assert_eq!(assessment.tier, RiskTier::Emergency);
        assert_eq!(assessment.category, Some(RiskCategory::SuicidalIdeation));
    }

    #[test]
    fn test_matching_is_case_insensitive_and_whitespace_tolerant() {
        let screener = SafetyScreener::default();
        let assessment = screener.evaluate("I WANT TO\n  End   My Life");
        assert_eq!(assessment.tier, RiskTier::Emergency);
    }

    #[test]
    fn test_evaluate_is_pure() {
        let screener = SafetyScreener::default();
        let first = screener.evaluate("I want to die");
        let second = screener.evaluate("I want to die");
        assert_eq!(first, second);
    }

    #[test]
    fn test_custom_lexicon_phrases_match() {
        let screener = SafetyScreener::new(SafetyLexicon::extended(SafetyLexicon {
            suicidal_ideation: vec!["clock out for good".to_string()],
            self_harm: Vec::new(),
        }));
        let assessment = screener.evaluate("I'm going to clock out for good tonight");
        assert_eq!(assessment.tier, RiskTier::Emergency);
    }
}
