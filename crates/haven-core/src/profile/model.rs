//! Profile domain model.
//!
//! The profile is long-lived state owned by the user. The engine only ever
//! reads it (goals, preferences, effectiveness scores); mutation happens
//! exclusively through [`super::ProfilePatch`].

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use strum_macros::{Display, EnumIter, EnumString};

/// A therapeutic goal tag.
///
/// Focus areas double as profile goals and as per-turn selection targets:
/// the glossary treats "focus area" and "therapeutic goal tag" as the same
/// closed vocabulary.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
    EnumString, EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum FocusArea {
    AnxietyManagement,
    MoodImprovement,
    StressReduction,
    SleepImprovement,
    SelfEsteem,
    Mindfulness,
    GeneralWellbeing,
}

/// The kind of therapeutic activity an intervention asks the user to do.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ActivityKind {
    Breathing,
    Meditation,
    Journaling,
    Movement,
    Cognitive,
    Grounding,
}

/// A user's long-lived therapeutic profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Unique profile identifier (UUID format)
    pub id: String,
    /// Display name used in greetings
    pub name: String,
    /// Ordered therapeutic goals; the first goal is the default focus when
    /// no emotional rule fires.
    pub goals: Vec<FocusArea>,
    /// Current stressor tags (free-form, e.g. "work", "sleep")
    #[serde(default)]
    pub stressors: BTreeSet<String>,
    /// Preferred number of days between sessions, in [1, 30]
    pub session_frequency_days: u32,
    /// Preferred activity duration in minutes, in [5, 120]
    pub preferred_duration_minutes: u32,
    /// Preferred kind of home activity
    pub preferred_activity: ActivityKind,
    /// Per-intervention effectiveness scores in [0, 1], keyed by
    /// intervention identifier. Written by out-of-scope feedback flows,
    /// only read by the engine.
    #[serde(default)]
    pub effectiveness: HashMap<String, f64>,
}

impl UserProfile {
    /// Creates a profile with neutral defaults for the given identity.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            goals: Vec::new(),
            stressors: BTreeSet::new(),
            session_frequency_days: 7,
            preferred_duration_minutes: 15,
            preferred_activity: ActivityKind::Breathing,
            effectiveness: HashMap::new(),
        }
    }

    /// Returns the recorded effectiveness for an intervention, if any.
    pub fn effectiveness_for(&self, intervention_id: &str) -> Option<f64> {
        self.effectiveness.get(intervention_id).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focus_area_kebab_case_round_trip() {
        let json = serde_json::to_string(&FocusArea::AnxietyManagement).unwrap();
        assert_eq!(json, "\"anxiety-management\"");
        let parsed: FocusArea = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, FocusArea::AnxietyManagement);
    }

    #[test]
    fn test_focus_area_display_matches_tag() {
        assert_eq!(FocusArea::GeneralWellbeing.to_string(), "general-wellbeing");
        assert_eq!(
            "mood-improvement".parse::<FocusArea>().unwrap(),
            FocusArea::MoodImprovement
        );
    }

    #[test]
    fn test_unknown_goal_tag_rejected() {
        let result: Result<FocusArea, _> = serde_json::from_str("\"world-domination\"");
        assert!(result.is_err());
    }
}
