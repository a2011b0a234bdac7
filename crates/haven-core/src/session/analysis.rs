//! Deterministic lexical utterance analysis.
//!
//! No natural-language understanding: like the safety screener, this is
//! plain keyword matching. Each emotional dimension has a small lexicon;
//! hits produce an observed reading for that dimension, and topical keywords
//! surface recurring themes for the end-of-session summary.

use std::collections::BTreeMap;

use crate::emotion::Dimension;

/// Base intensity assigned when a dimension's lexicon matches at all.
const BASE_INTENSITY: f64 = 6.0;
/// Additional intensity per extra keyword hit.
const HIT_INTENSITY: f64 = 1.0;
/// Observed readings never exceed the raw scale ceiling.
const MAX_INTENSITY: f64 = 10.0;

const ANXIETY_WORDS: &[&str] = &[
    "anxious", "anxiety", "worried", "worry", "nervous", "panic", "stressed", "stressful",
    "stress", "overwhelmed", "on edge", "tense", "afraid", "dread",
];

const DEPRESSION_WORDS: &[&str] = &[
    "sad", "down", "depressed", "depressing", "hopeless", "empty", "numb", "worthless",
    "exhausted", "tired of everything", "unmotivated", "lonely",
];

const ANGER_WORDS: &[&str] = &[
    "angry", "anger", "furious", "frustrated", "frustrating", "irritated", "annoyed", "resent",
    "rage", "fed up",
];

const JOY_WORDS: &[&str] = &[
    "happy", "joy", "glad", "excited", "grateful", "proud", "hopeful", "good day", "better",
    "relieved", "calm",
];

const THEME_WORDS: &[(&str, &[&str])] = &[
    ("work", &["work", "job", "boss", "deadline", "coworker", "career"]),
    ("family", &["family", "parent", "mother", "father", "kids", "child"]),
    (
        "relationships",
        &["partner", "relationship", "friend", "marriage", "breakup"],
    ),
    ("sleep", &["sleep", "insomnia", "tired", "awake", "nightmare"]),
    ("health", &["health", "sick", "pain", "illness", "doctor"]),
    ("money", &["money", "debt", "bills", "rent", "finances"]),
];

/// What one utterance tells the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct UtteranceAnalysis {
    /// Observed emotional readings, raw scale [0, 10]. Dimensions whose
    /// lexicon didn't match are absent and carry over in the tracker.
    pub observed: BTreeMap<Dimension, f64>,
    /// Matched topical themes, in declaration order
    pub themes: Vec<String>,
}

/// Analyzes one utterance into observed dimension readings and themes.
///
/// Pure and deterministic: identical text always yields identical analysis.
pub fn analyze_utterance(text: &str) -> UtteranceAnalysis {
    let normalized = text.to_lowercase();

    let mut observed = BTreeMap::new();
    for (dimension, lexicon) in [
        (Dimension::Anxiety, ANXIETY_WORDS),
        (Dimension::Depression, DEPRESSION_WORDS),
        (Dimension::Anger, ANGER_WORDS),
        (Dimension::Joy, JOY_WORDS),
    ] {
        let hits = lexicon
            .iter()
            .filter(|word| normalized.contains(*word))
            .count();
        if hits > 0 {
            let intensity =
                (BASE_INTENSITY + HIT_INTENSITY * (hits as f64 - 1.0)).min(MAX_INTENSITY);
            observed.insert(dimension, intensity);
        }
    }

    let themes = THEME_WORDS
        .iter()
        .filter(|(_, words)| words.iter().any(|word| normalized.contains(word)))
        .map(|(theme, _)| theme.to_string())
        .collect();

    UtteranceAnalysis { observed, themes }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stressful_text_raises_anxiety() {
        let analysis = analyze_utterance("work has been stressful");
        assert!(analysis.observed.contains_key(&Dimension::Anxiety));
        assert_eq!(analysis.themes, vec!["work".to_string()]);
    }

    #[test]
    fn test_multiple_hits_raise_intensity() {
        let one = analyze_utterance("I feel anxious");
        let three = analyze_utterance("I feel anxious and worried, close to panic");
        assert!(three.observed[&Dimension::Anxiety] > one.observed[&Dimension::Anxiety]);
        assert!(three.observed[&Dimension::Anxiety] <= MAX_INTENSITY);
    }

    #[test]
    fn test_neutral_text_observes_nothing() {
        let analysis = analyze_utterance("I repotted the ficus this afternoon");
        assert!(analysis.observed.is_empty());
        assert!(analysis.themes.is_empty());
    }

    #[test]
    fn test_positive_text_registers_joy() {
        let analysis = analyze_utterance("today was a good day, I feel grateful");
        assert!(analysis.observed.contains_key(&Dimension::Joy));
        assert!(!analysis.observed.contains_key(&Dimension::Depression));
    }

    #[test]
    fn test_analysis_is_deterministic() {
        let text = "frustrated with my boss and not sleeping";
        assert_eq!(analyze_utterance(text), analyze_utterance(text));
    }
}
