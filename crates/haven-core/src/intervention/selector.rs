//! Focus-area and intervention selection.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::catalog::{Intervention, InterventionCatalog};
use crate::config::EngineConfig;
use crate::emotion::{EmotionalState, Trend};
use crate::error::{HavenError, Result};
use crate::profile::{FocusArea, UserProfile};

/// Anxiety level above which `anxiety-management` is added.
const ANXIETY_RULE_THRESHOLD: f64 = 6.0;
/// Depression level above which `mood-improvement` is added.
const DEPRESSION_RULE_THRESHOLD: f64 = 5.0;

/// A suggested between-session activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomeActivity {
    pub activity: String,
    pub instructions: String,
    pub recommendation: String,
}

/// Picks focus areas and interventions for a session.
///
/// The selector holds only immutable reference data and tuning; per-session
/// state (recent focus areas, recent intervention ids) is passed in by the
/// orchestrator, so one selector can serve many sessions.
#[derive(Debug, Clone)]
pub struct InterventionSelector {
    catalog: Arc<InterventionCatalog>,
    config: EngineConfig,
}

impl InterventionSelector {
    pub fn new(catalog: Arc<InterventionCatalog>, config: EngineConfig) -> Self {
        Self { catalog, config }
    }

    /// Derives focus areas from the current emotional state and profile.
    ///
    /// Rules accumulate in order: anxiety > 6 adds `anxiety-management`,
    /// depression > 5 adds `mood-improvement`. If no rule fired, the
    /// profile's first goal applies, or `general-wellbeing` without goals.
    /// Areas not among the recently assigned ones are moved to the front so
    /// the same area doesn't repeat back-to-back unless it's the only
    /// viable candidate. The result is never empty.
    pub fn select_focus_areas(
        &self,
        profile: &UserProfile,
        state: &EmotionalState,
        recent: &[FocusArea],
    ) -> Vec<FocusArea> {
        let mut areas = Vec::new();
        if state.anxiety > ANXIETY_RULE_THRESHOLD {
            areas.push(FocusArea::AnxietyManagement);
        }
        if state.depression > DEPRESSION_RULE_THRESHOLD {
            areas.push(FocusArea::MoodImprovement);
        }
        if areas.is_empty() {
            areas.push(
                profile
                    .goals
                    .first()
                    .copied()
                    .unwrap_or(FocusArea::GeneralWellbeing),
            );
        }

        // Stable reorder: fresh areas first, recently assigned ones last.
        // If everything is recent the order is unchanged.
        if areas.iter().any(|area| !recent.contains(area)) {
            let (fresh, repeated): (Vec<_>, Vec<_>) =
                areas.into_iter().partition(|area| !recent.contains(area));
            areas = fresh;
            areas.extend(repeated);
        }

        tracing::debug!(
            "[InterventionSelector] Selected focus areas: {:?}",
            areas
        );
        areas
    }

    /// First few catalog entries for a focus area, used for
    /// start-of-session activity previews. Previews do not enter cool-down
    /// history.
    pub fn preview(&self, area: FocusArea, limit: usize) -> Vec<Intervention> {
        self.catalog
            .candidates(area)
            .iter()
            .take(limit)
            .cloned()
            .collect()
    }

    /// Selects an intervention for the given focus areas.
    ///
    /// Candidates come from the catalog in focus-area order. Interventions
    /// used within the cool-down window (`recent_ids`) are filtered out;
    /// the remainder are drawn probabilistically proportional to the
    /// profile's effectiveness score (default weight for unscored ids). If
    /// every candidate is cooling down, the constraint is relaxed and the
    /// globally highest-weighted candidate wins, first in catalog order on
    /// ties.
    ///
    /// # Errors
    ///
    /// Returns `CatalogExhausted` only when the catalog has zero entries for
    /// every requested focus area. That is a configuration problem; the
    /// orchestrator degrades it to a generic supportive response.
    pub fn select_intervention(
        &self,
        focus_areas: &[FocusArea],
        profile: &UserProfile,
        recent_ids: &[String],
        rng: &mut impl Rng,
    ) -> Result<Intervention> {
        let candidates: Vec<&Intervention> = focus_areas
            .iter()
            .flat_map(|area| self.catalog.candidates(*area))
            .collect();

        if candidates.is_empty() {
            return Err(HavenError::CatalogExhausted {
                focus_areas: focus_areas.iter().map(|a| a.to_string()).collect(),
            });
        }

        let weight = |intervention: &Intervention| -> f64 {
            profile
                .effectiveness_for(&intervention.id)
                .unwrap_or(self.config.default_effectiveness)
        };

        let available: Vec<&Intervention> = candidates
            .iter()
            .copied()
            .filter(|i| !recent_ids.contains(&i.id))
            .collect();

        if available.is_empty() {
            // Every candidate is in cool-down: relax and take the highest
            // weight, earliest in catalog order on ties.
            let mut best = candidates[0];
            for &candidate in &candidates[1..] {
                if weight(candidate) > weight(best) {
                    best = candidate;
                }
            }
            tracing::debug!(
                "[InterventionSelector] All candidates cooling down, relaxed to '{}'",
                best.id
            );
            return Ok(best.clone());
        }

        Ok(weighted_pick(&available, weight, rng).clone())
    }

    /// Suggests a between-session home activity.
    ///
    /// Prefers catalog entries matching the profile's preferred activity
    /// kind within the current focus areas; falls back to any kind for those
    /// areas, then to the whole catalog. The recommendation text is keyed by
    /// the session trend.
    pub fn suggest_home_activity(
        &self,
        profile: &UserProfile,
        focus_areas: &[FocusArea],
        trend: Trend,
    ) -> HomeActivity {
        let in_focus: Vec<&Intervention> = focus_areas
            .iter()
            .flat_map(|area| self.catalog.candidates(*area))
            .collect();

        let chosen = in_focus
            .iter()
            .copied()
            .find(|i| i.category == profile.preferred_activity)
            .or_else(|| in_focus.first().copied())
            .or_else(|| self.catalog.all().next());

        let recommendation = match trend {
            Trend::Improved => {
                "You made real progress this session. Practicing between sessions \
                 is how that progress compounds."
            }
            Trend::Declined => {
                "This session was a hard one. Be gentle with yourself and keep the \
                 practice small and regular rather than ambitious."
            }
            Trend::Neutral => {
                "Steady counts. A little daily practice between sessions keeps the \
                 momentum going."
            }
        }
        .to_string();

        match chosen {
            Some(intervention) => HomeActivity {
                activity: intervention.title.clone(),
                instructions: intervention.content.clone(),
                recommendation,
            },
            None => HomeActivity {
                activity: "Daily check-in".to_string(),
                instructions: "Take five quiet minutes each day to notice how you're \
                               feeling, without judgment."
                    .to_string(),
                recommendation,
            },
        }
    }
}

/// Draws one item proportionally to its weight. Zero-total weight falls back
/// to the first item (catalog order).
fn weighted_pick<'a>(
    items: &[&'a Intervention],
    weight: impl Fn(&Intervention) -> f64,
    rng: &mut impl Rng,
) -> &'a Intervention {
    let total: f64 = items.iter().map(|&i| weight(i)).sum();
    if total <= 0.0 {
        return items[0];
    }
    let mut roll = rng.gen_range(0.0..total);
    for &item in items {
        let w = weight(item);
        if roll < w {
            return item;
        }
        roll -= w;
    }
    items[items.len() - 1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::ActivityKind;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn selector() -> InterventionSelector {
        InterventionSelector::new(
            Arc::new(InterventionCatalog::builtin()),
            EngineConfig::default(),
        )
    }

    fn profile_with_goals(goals: &[FocusArea]) -> UserProfile {
        let mut profile = UserProfile::new("user-1", "Alex");
        profile.goals = goals.to_vec();
        profile
    }

    fn state(anxiety: f64, depression: f64) -> EmotionalState {
        EmotionalState::from_dimensions(anxiety, depression, 3.0, 5.0)
    }

    #[test]
    fn test_high_anxiety_adds_anxiety_management() {
        let areas = selector().select_focus_areas(
            &profile_with_goals(&[]),
            &state(8.0, 3.0),
            &[],
        );
        assert!(areas.contains(&FocusArea::AnxietyManagement));
    }

    #[test]
    fn test_rules_accumulate() {
        let areas = selector().select_focus_areas(
            &profile_with_goals(&[]),
            &state(7.0, 6.0),
            &[],
        );
        assert_eq!(
            areas,
            vec![FocusArea::AnxietyManagement, FocusArea::MoodImprovement]
        );
    }

    #[test]
    fn test_fallback_to_first_goal_then_general_wellbeing() {
        let with_goal = selector().select_focus_areas(
            &profile_with_goals(&[FocusArea::SleepImprovement]),
            &state(3.0, 3.0),
            &[],
        );
        assert_eq!(with_goal, vec![FocusArea::SleepImprovement]);

        let without_goal =
            selector().select_focus_areas(&profile_with_goals(&[]), &state(3.0, 3.0), &[]);
        assert_eq!(without_goal, vec![FocusArea::GeneralWellbeing]);
    }

    #[test]
    fn test_focus_areas_never_empty() {
        for (anxiety, depression) in [(1.0, 1.0), (10.0, 10.0), (6.0, 5.0)] {
            let areas = selector().select_focus_areas(
                &profile_with_goals(&[]),
                &state(anxiety, depression),
                &[FocusArea::GeneralWellbeing],
            );
            assert!(!areas.is_empty());
        }
    }

    #[test]
    fn test_recent_areas_deprioritized_but_kept_when_sole_candidate() {
        let sel = selector();
        // Both rules fire; anxiety-management was just used.
        let areas = sel.select_focus_areas(
            &profile_with_goals(&[]),
            &state(8.0, 7.0),
            &[FocusArea::AnxietyManagement],
        );
        assert_eq!(
            areas,
            vec![FocusArea::MoodImprovement, FocusArea::AnxietyManagement]
        );

        // Sole candidate stays even though recent.
        let sole = sel.select_focus_areas(
            &profile_with_goals(&[]),
            &state(8.0, 3.0),
            &[FocusArea::AnxietyManagement],
        );
        assert_eq!(sole, vec![FocusArea::AnxietyManagement]);
    }

    #[test]
    fn test_cooldown_filters_recent_interventions() {
        let sel = selector();
        let profile = profile_with_goals(&[]);
        let mut rng = StdRng::seed_from_u64(7);
        // Every anxiety-management candidate except one is cooling down.
        let recent: Vec<String> = vec![
            "box-breathing".to_string(),
            "grounding-54321".to_string(),
        ];
        for _ in 0..20 {
            let picked = sel
                .select_intervention(
                    &[FocusArea::AnxietyManagement],
                    &profile,
                    &recent,
                    &mut rng,
                )
                .unwrap();
            assert_eq!(picked.id, "worry-window");
        }
    }

    #[test]
    fn test_all_cooling_down_relaxes_to_highest_weight() {
        let sel = selector();
        let mut profile = profile_with_goals(&[]);
        profile
            .effectiveness
            .insert("grounding-54321".to_string(), 0.9);
        let recent: Vec<String> = vec![
            "box-breathing".to_string(),
            "grounding-54321".to_string(),
            "worry-window".to_string(),
        ];
        let mut rng = StdRng::seed_from_u64(7);
        let picked = sel
            .select_intervention(&[FocusArea::AnxietyManagement], &profile, &recent, &mut rng)
            .unwrap();
        assert_eq!(picked.id, "grounding-54321");
    }

    #[test]
    fn test_relaxed_ties_break_by_catalog_order() {
        let sel = selector();
        let profile = profile_with_goals(&[]); // all default weight
        let recent: Vec<String> = vec![
            "box-breathing".to_string(),
            "grounding-54321".to_string(),
            "worry-window".to_string(),
        ];
        let mut rng = StdRng::seed_from_u64(7);
        let picked = sel
            .select_intervention(&[FocusArea::AnxietyManagement], &profile, &recent, &mut rng)
            .unwrap();
        assert_eq!(picked.id, "box-breathing");
    }

    #[test]
    fn test_weighting_prefers_effective_interventions() {
        let sel = selector();
        let mut profile = profile_with_goals(&[]);
        profile
            .effectiveness
            .insert("worry-window".to_string(), 1.0);
        profile
            .effectiveness
            .insert("box-breathing".to_string(), 0.01);
        profile
            .effectiveness
            .insert("grounding-54321".to_string(), 0.01);

        let mut rng = StdRng::seed_from_u64(99);
        let mut wins = 0;
        for _ in 0..200 {
            let picked = sel
                .select_intervention(&[FocusArea::AnxietyManagement], &profile, &[], &mut rng)
                .unwrap();
            if picked.id == "worry-window" {
                wins += 1;
            }
        }
        assert!(wins > 150, "expected heavy preference, got {}/200", wins);
    }

    #[test]
    fn test_empty_catalog_is_exhausted() {
        let sel = InterventionSelector::new(
            Arc::new(InterventionCatalog::from_interventions(Vec::new())),
            EngineConfig::default(),
        );
        let mut rng = StdRng::seed_from_u64(7);
        let err = sel
            .select_intervention(
                &[FocusArea::Mindfulness],
                &profile_with_goals(&[]),
                &[],
                &mut rng,
            )
            .unwrap_err();
        assert!(err.is_catalog_exhausted());
    }

    #[test]
    fn test_home_activity_prefers_profile_kind() {
        let sel = selector();
        let mut profile = profile_with_goals(&[]);
        profile.preferred_activity = ActivityKind::Journaling;
        let activity = sel.suggest_home_activity(
            &profile,
            &[FocusArea::StressReduction],
            Trend::Neutral,
        );
        assert_eq!(activity.activity, "Brain Dump");
    }

    #[test]
    fn test_home_activity_falls_back_to_any_kind() {
        let sel = selector();
        let mut profile = profile_with_goals(&[]);
        // No self-esteem entries are breathing exercises.
        profile.preferred_activity = ActivityKind::Breathing;
        let activity =
            sel.suggest_home_activity(&profile, &[FocusArea::SelfEsteem], Trend::Declined);
        assert_eq!(activity.activity, "Strengths Inventory");
        assert!(activity.recommendation.contains("gentle"));
    }
}
