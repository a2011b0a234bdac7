//! Validated partial profile updates.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use super::model::{ActivityKind, FocusArea, UserProfile};
use crate::error::{HavenError, Result};

/// Bounds for `session_frequency_days`.
const FREQUENCY_RANGE: std::ops::RangeInclusive<u32> = 1..=30;
/// Bounds for `preferred_duration_minutes`.
const DURATION_RANGE: std::ops::RangeInclusive<u32> = 5..=120;

/// A partial update to a [`UserProfile`].
///
/// Every field is optional; absent fields leave the current value untouched.
/// `apply` validates field by field and produces a new profile without
/// mutating the original, so a failed patch leaves no partial write behind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfilePatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub goals: Option<Vec<FocusArea>>,
    #[serde(default)]
    pub stressors: Option<BTreeSet<String>>,
    #[serde(default)]
    pub session_frequency_days: Option<u32>,
    #[serde(default)]
    pub preferred_duration_minutes: Option<u32>,
    #[serde(default)]
    pub preferred_activity: Option<ActivityKind>,
    #[serde(default)]
    pub effectiveness: Option<HashMap<String, f64>>,
}

impl ProfilePatch {
    /// Applies this patch to `profile`, returning the merged profile.
    ///
    /// # Errors
    ///
    /// Returns a `Validation` error if:
    /// - `name` is empty or whitespace-only
    /// - `goals` contains duplicates
    /// - `session_frequency_days` is outside [1, 30]
    /// - `preferred_duration_minutes` is outside [5, 120]
    /// - any effectiveness score is outside [0, 1]
    pub fn apply(&self, profile: &UserProfile) -> Result<UserProfile> {
        let mut merged = profile.clone();

        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(HavenError::validation("name", "must not be empty"));
            }
            merged.name = name.trim().to_string();
        }

        if let Some(goals) = &self.goals {
            let distinct: BTreeSet<_> = goals.iter().collect();
            if distinct.len() != goals.len() {
                return Err(HavenError::validation("goals", "contains duplicate goals"));
            }
            merged.goals = goals.clone();
        }

        if let Some(stressors) = &self.stressors {
            merged.stressors = stressors.clone();
        }

        if let Some(frequency) = self.session_frequency_days {
            if !FREQUENCY_RANGE.contains(&frequency) {
                return Err(HavenError::validation(
                    "session_frequency_days",
                    format!("{} is outside [1, 30]", frequency),
                ));
            }
            merged.session_frequency_days = frequency;
        }

        if let Some(duration) = self.preferred_duration_minutes {
            if !DURATION_RANGE.contains(&duration) {
                return Err(HavenError::validation(
                    "preferred_duration_minutes",
                    format!("{} is outside [5, 120]", duration),
                ));
            }
            merged.preferred_duration_minutes = duration;
        }

        if let Some(activity) = self.preferred_activity {
            merged.preferred_activity = activity;
        }

        if let Some(effectiveness) = &self.effectiveness {
            for (id, score) in effectiveness {
                if !(0.0..=1.0).contains(score) {
                    return Err(HavenError::validation(
                        "effectiveness",
                        format!("score {} for '{}' is outside [0, 1]", score, id),
                    ));
                }
            }
            // Merge per key rather than replacing the whole map, so a patch
            // carrying one score does not erase the rest.
            merged.effectiveness.extend(effectiveness.clone());
        }

        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_profile() -> UserProfile {
        let mut profile = UserProfile::new("user-1", "Alex");
        profile.goals = vec![FocusArea::StressReduction, FocusArea::SleepImprovement];
        profile
    }

    #[test]
    fn test_empty_patch_is_identity() {
        let profile = base_profile();
        let merged = ProfilePatch::default().apply(&profile).unwrap();
        assert_eq!(merged, profile);
    }

    #[test]
    fn test_frequency_out_of_range_rejected() {
        let patch = ProfilePatch {
            session_frequency_days: Some(31),
            ..Default::default()
        };
        let err = patch.apply(&base_profile()).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_effectiveness_merges_per_key() {
        let mut profile = base_profile();
        profile
            .effectiveness
            .insert("box-breathing".to_string(), 0.8);

        let patch = ProfilePatch {
            effectiveness: Some(HashMap::from([("gratitude-list".to_string(), 0.6)])),
            ..Default::default()
        };
        let merged = patch.apply(&profile).unwrap();
        assert_eq!(merged.effectiveness_for("box-breathing"), Some(0.8));
        assert_eq!(merged.effectiveness_for("gratitude-list"), Some(0.6));
    }

    #[test]
    fn test_effectiveness_score_out_of_range_rejected() {
        let patch = ProfilePatch {
            effectiveness: Some(HashMap::from([("box-breathing".to_string(), 1.2)])),
            ..Default::default()
        };
        assert!(patch.apply(&base_profile()).is_err());
    }

    #[test]
    fn test_duplicate_goals_rejected() {
        let patch = ProfilePatch {
            goals: Some(vec![FocusArea::Mindfulness, FocusArea::Mindfulness]),
            ..Default::default()
        };
        assert!(patch.apply(&base_profile()).is_err());
    }

    #[test]
    fn test_failed_patch_leaves_original_untouched() {
        let profile = base_profile();
        let patch = ProfilePatch {
            name: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(patch.apply(&profile).is_err());
        assert_eq!(profile.name, "Alex");
    }
}
