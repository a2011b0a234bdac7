//! Session lifecycle orchestration.

use chrono::{Duration, Timelike, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

use super::analysis::analyze_utterance;
use super::model::{
    NextSessionRecommendation, SessionPhase, SessionRecord, SessionStart, SessionSummary, Turn,
    TurnResponse,
};
use crate::catalog::{Intervention, InterventionCatalog};
use crate::config::EngineConfig;
use crate::emotion::{Dimension, EmotionTracker, EmotionalState, Trend};
use crate::error::{HavenError, Result};
use crate::intervention::InterventionSelector;
use crate::profile::{FocusArea, UserProfile};
use crate::safety::{SafetyLexicon, SafetyResponse, SafetyScreener};

/// Overall delta considered a noticeable intervention effect when deriving
/// insights.
const INSIGHT_DELTA: f64 = 0.5;
/// Urgency above which the next session is pulled closer.
const URGENCY_HIGH: f64 = 0.7;
/// Urgency below which the next session is pushed out.
const URGENCY_LOW: f64 = 0.3;

/// Owns the state machine for exactly one session at a time.
///
/// Sequencing per turn is fixed: screen first, then emotion update, then
/// intervention selection, then record. A flagged turn short-circuits after
/// screening; it is recorded with the unchanged emotional snapshot and does
/// not advance focus-area history, so crisis handling stays isolated from
/// therapeutic-progress tracking.
///
/// Orchestrators are independent: no state is shared between instances, so
/// separate sessions may run concurrently on separate orchestrators.
pub struct SessionOrchestrator {
    profile: UserProfile,
    screener: SafetyScreener,
    selector: InterventionSelector,
    config: EngineConfig,
    rng: StdRng,
    phase: SessionPhase,
    tracker: EmotionTracker,
    record: Option<SessionRecord>,
    /// Primary agent-assigned focus area per start/turn, in order
    focus_history: Vec<FocusArea>,
    /// Intervention ids in the order they were offered
    offered_interventions: Vec<String>,
    /// Topical themes in first-seen order, with occurrence counts
    theme_counts: Vec<(String, usize)>,
}

impl SessionOrchestrator {
    /// Creates an orchestrator in `Idle` with an explicit RNG seed.
    ///
    /// Every randomized decision (baseline jitter, greeting variety,
    /// weighted intervention choice) draws from this seeded generator, so
    /// identical seeds replay identical sessions for identical input.
    pub fn new(
        profile: UserProfile,
        catalog: Arc<InterventionCatalog>,
        lexicon: SafetyLexicon,
        config: EngineConfig,
        seed: u64,
    ) -> Self {
        Self {
            profile,
            screener: SafetyScreener::new(lexicon),
            selector: InterventionSelector::new(catalog, config.clone()),
            config,
            rng: StdRng::seed_from_u64(seed),
            phase: SessionPhase::Idle,
            tracker: EmotionTracker::new(),
            record: None,
            focus_history: Vec::new(),
            offered_interventions: Vec::new(),
            theme_counts: Vec::new(),
        }
    }

    /// Current phase of the state machine.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// The session record, if a session has been started.
    pub fn record(&self) -> Option<&SessionRecord> {
        self.record.as_ref()
    }

    /// Latest emotional snapshot, if a session has been started.
    pub fn current_state(&self) -> Option<&EmotionalState> {
        self.tracker.current_state()
    }

    /// The profile this orchestrator reads from.
    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    /// The append-only emotional history for the current session.
    pub fn emotional_history(&self) -> &[EmotionalState] {
        self.tracker.history()
    }

    /// Starts a new session.
    ///
    /// Valid from `Idle` or `Complete`; a fresh `SessionRecord` and
    /// emotional history replace any completed ones. Optional intake
    /// readings (raw [0, 10]) seed the baseline assessment.
    ///
    /// A failure during `Starting` returns the machine to the prior stable
    /// phase and discards the partially built session data.
    ///
    /// # Errors
    ///
    /// - `InvalidTransition` if a session is already starting, active, or ending
    /// - `Validation` if an intake reading is out of range
    pub fn start(&mut self, intake: &BTreeMap<Dimension, f64>) -> Result<SessionStart> {
        if !matches!(self.phase, SessionPhase::Idle | SessionPhase::Complete) {
            return Err(HavenError::invalid_transition(
                "start a session",
                self.phase.to_string(),
            ));
        }
        let prior = self.phase;
        self.phase = SessionPhase::Starting;

        // Build everything into locals first; commit only on success, so a
        // failed start leaves no half-written session behind.
        let mut tracker = EmotionTracker::new();
        let baseline = match tracker.assess_baseline(intake, &mut self.rng) {
            Ok(state) => state,
            Err(e) => {
                self.phase = prior;
                return Err(e);
            }
        };

        let focus_areas = self
            .selector
            .select_focus_areas(&self.profile, &baseline, &[]);
        let suggested_activities: Vec<Intervention> = focus_areas
            .iter()
            .flat_map(|area| self.selector.preview(*area, 2))
            .take(3)
            .collect();
        let greeting = compose_greeting(
            Utc::now().hour(),
            baseline.overall,
            &self.profile.name,
            &mut self.rng,
        );

        let record = SessionRecord::new(Uuid::new_v4().to_string());
        let session_id = record.id.clone();

        tracing::info!(
            "[SessionOrchestrator] Session {} started (baseline overall: {:.1}, focus: {:?})",
            session_id,
            baseline.overall,
            focus_areas
        );

        // Commit.
        self.tracker = tracker;
        self.record = Some(record);
        self.focus_history = focus_areas.clone();
        self.offered_interventions.clear();
        self.theme_counts.clear();
        self.phase = SessionPhase::Active;

        Ok(SessionStart {
            session_id,
            greeting,
            focus_areas,
            suggested_activities,
        })
    }

    /// Processes one user turn.
    ///
    /// Valid only in `Active`. Screening runs before anything else: a
    /// flagged turn yields a safety response, records the turn with the
    /// unchanged emotional state, and leaves the state machine in `Active`;
    /// whether to continue is the human's decision. An unflagged turn
    /// updates the tracker, re-evaluates focus areas against the recent
    /// window, and selects an intervention.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` if no session is active.
    pub fn submit(&mut self, text: &str) -> Result<TurnResponse> {
        if self.phase != SessionPhase::Active {
            return Err(HavenError::invalid_transition(
                "submit a turn",
                self.phase.to_string(),
            ));
        }

        let assessment = self.screener.evaluate(text);
        if assessment.is_flagged() {
            tracing::warn!(
                "[SessionOrchestrator] Turn flagged: tier {}, category {:?}",
                assessment.tier,
                assessment.category
            );
            let safety = SafetyResponse::for_tier(assessment.tier)
                .ok_or_else(|| HavenError::internal("flagged tier without response"))?;
            let response = TurnResponse::Safety {
                tier: safety.tier,
                message: safety.message,
                resources: safety.resources,
                guidance: safety.guidance,
            };
            let snapshot = self
                .tracker
                .current_state()
                .cloned()
                .ok_or_else(|| HavenError::internal("active session without baseline"))?;
            self.record_turn(text, response.clone(), snapshot)?;
            return Ok(response);
        }

        let analysis = analyze_utterance(text);
        let state = self.tracker.update(&analysis.observed)?;
        for theme in analysis.themes {
            match self.theme_counts.iter_mut().find(|(t, _)| *t == theme) {
                Some((_, count)) => *count += 1,
                None => self.theme_counts.push((theme, 1)),
            }
        }

        let recent = self.recent_focus_areas();
        let focus_areas = self
            .selector
            .select_focus_areas(&self.profile, &state, &recent);

        let cooldown_start = self
            .offered_interventions
            .len()
            .saturating_sub(self.config.cooldown_turns);
        let cooling_down = self.offered_interventions[cooldown_start..].to_vec();

        let response = match self.selector.select_intervention(
            &focus_areas,
            &self.profile,
            &cooling_down,
            &mut self.rng,
        ) {
            Ok(intervention) => {
                self.offered_interventions.push(intervention.id.clone());
                TurnResponse::Intervention {
                    title: intervention.title,
                    content: intervention.content,
                    follow_up: intervention.follow_up,
                    focus_areas: focus_areas.clone(),
                }
            }
            Err(HavenError::CatalogExhausted { focus_areas }) => {
                // Configuration gap, not a runtime fault: degrade to a
                // generic supportive message instead of surfacing an error.
                tracing::warn!(
                    "[SessionOrchestrator] Catalog exhausted for {:?}, using generic response",
                    focus_areas
                );
                TurnResponse::Informational {
                    message: "Thank you for sharing that. Take a moment to breathe, \
                              and know that what you're feeling is worth paying \
                              attention to. I'm here to keep working through it \
                              with you."
                        .to_string(),
                }
            }
            Err(e) => return Err(e),
        };

        if let Some(primary) = focus_areas.first() {
            self.focus_history.push(*primary);
        }
        self.record_turn(text, response.clone(), state)?;
        Ok(response)
    }

    /// Ends the active session.
    ///
    /// Computes the summary, seals the record, and enters `Complete`. A
    /// failure while `Ending` reverts to `Active` with the record intact.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` unless the session is `Active`.
    pub fn end(&mut self) -> Result<SessionSummary> {
        if self.phase != SessionPhase::Active {
            return Err(HavenError::invalid_transition(
                "end the session",
                self.phase.to_string(),
            ));
        }
        self.phase = SessionPhase::Ending;

        match self.build_summary() {
            Ok(summary) => {
                let Some(record) = self.record.as_mut() else {
                    self.phase = SessionPhase::Active;
                    return Err(HavenError::internal("ending session without a record"));
                };
                record.seal(summary.clone());
                self.phase = SessionPhase::Complete;
                tracing::info!(
                    "[SessionOrchestrator] Session {} complete (trend: {}, next in {} days)",
                    record.id,
                    summary.trend,
                    summary.next_session.in_days
                );
                Ok(summary)
            }
            Err(e) => {
                self.phase = SessionPhase::Active;
                Err(e)
            }
        }
    }

    // ============================================================================
    // Internals
    // ============================================================================

    fn record_turn(
        &mut self,
        text: &str,
        response: TurnResponse,
        snapshot: EmotionalState,
    ) -> Result<()> {
        let record = self
            .record
            .as_mut()
            .ok_or_else(|| HavenError::internal("turn submitted without a session record"))?;
        record.turns.push(Turn {
            user_text: text.to_string(),
            response,
            emotional_state: snapshot,
            recorded_at: Utc::now(),
        });
        Ok(())
    }

    /// The last few agent-assigned focus areas, per the configured window.
    fn recent_focus_areas(&self) -> Vec<FocusArea> {
        let start = self
            .focus_history
            .len()
            .saturating_sub(self.config.focus_history_window);
        self.focus_history[start..].to_vec()
    }

    fn build_summary(&mut self) -> Result<SessionSummary> {
        let journey = self.tracker.summarize_journey();
        let current = self
            .tracker
            .current_state()
            .ok_or_else(|| HavenError::internal("ending session without baseline"))?;

        // Distinct focus areas in first-use order.
        let mut distinct_areas: Vec<FocusArea> = Vec::new();
        for area in &self.focus_history {
            if !distinct_areas.contains(area) {
                distinct_areas.push(*area);
            }
        }
        let main_themes: Vec<String> = distinct_areas.iter().map(|a| a.to_string()).collect();

        let mut key_insights = Vec::new();
        for change in &journey.changes {
            key_insights.push(format!(
                "{} {} by {:.1} over the session.",
                capitalize(&change.dimension.to_string()),
                change.direction,
                change.magnitude
            ));
        }
        key_insights.extend(self.intervention_insights());
        for (theme, count) in &self.theme_counts {
            if *count >= 2 {
                key_insights.push(format!("The topic of {} came up repeatedly.", theme));
            }
        }
        if key_insights.is_empty() {
            key_insights.push("A steady session with no sharp emotional swings.".to_string());
        }

        let home_activity =
            self.selector
                .suggest_home_activity(&self.profile, &distinct_areas, journey.trend);

        let next_session = self.recommend_next_session(current.overall, journey.trend);

        Ok(SessionSummary {
            main_themes,
            key_insights,
            trend: journey.trend,
            changes: journey.changes,
            home_activity,
            next_session,
        })
    }

    /// Derives insights from per-intervention overall deltas: the change in
    /// `overall` between the turn an intervention was offered and the next
    /// recorded snapshot.
    fn intervention_insights(&self) -> Vec<String> {
        let Some(record) = self.record.as_ref() else {
            return Vec::new();
        };
        let mut insights = Vec::new();
        for window in record.turns.windows(2) {
            let TurnResponse::Intervention { title, .. } = &window[0].response else {
                continue;
            };
            let delta = window[1].emotional_state.overall - window[0].emotional_state.overall;
            if delta > INSIGHT_DELTA {
                insights.push(format!(
                    "'{}' was followed by a noticeable lift in overall state.",
                    title
                ));
            } else if delta < -INSIGHT_DELTA {
                insights.push(format!(
                    "'{}' did not hold; overall state dipped afterwards.",
                    title
                ));
            }
        }
        insights
    }

    /// Computes the next-session recommendation.
    ///
    /// `urgency = 0.7 * ((10 - overall) / 10) + 0.3 * (0.6 if declined else 0.4)`.
    /// High urgency halves the preferred interval (floor, min 1), low
    /// urgency adds two days, otherwise the preference stands.
    fn recommend_next_session(&self, overall: f64, trend: Trend) -> NextSessionRecommendation {
        let trend_factor = if trend == Trend::Declined { 0.6 } else { 0.4 };
        let urgency = 0.7 * ((10.0 - overall) / 10.0) + 0.3 * trend_factor;

        let preferred = self.profile.session_frequency_days;
        let mut in_days = if urgency > URGENCY_HIGH {
            (preferred / 2).max(1)
        } else if urgency < URGENCY_LOW {
            preferred + 2
        } else {
            preferred
        };
        // A session that ended on a declining trend never waits longer than
        // half the preferred interval, whatever the urgency band said.
        if trend == Trend::Declined {
            in_days = in_days.min((preferred / 2).max(1));
        }

        let recent = self.recent_focus_areas();
        let focus = self
            .profile
            .goals
            .iter()
            .find(|goal| !recent.contains(goal))
            .or_else(|| self.profile.goals.first())
            .copied()
            .unwrap_or(FocusArea::GeneralWellbeing);

        NextSessionRecommendation {
            in_days,
            date: Utc::now() + Duration::days(i64::from(in_days)),
            focus,
        }
    }
}

/// Builds the session greeting from the time of day and baseline state.
///
/// Tone: baseline overall below 4 gets a concern-toned opening, above 7 a
/// momentum-toned one, otherwise neutral. The variant within a tone is drawn
/// from the caller's RNG.
pub(crate) fn compose_greeting(
    hour: u32,
    overall: f64,
    name: &str,
    rng: &mut impl Rng,
) -> String {
    let time_of_day = match hour {
        5..=11 => "morning",
        12..=17 => "afternoon",
        _ => "evening",
    };

    let concern = [
        "it sounds like things might be heavy right now. Let's take this at whatever pace feels manageable.",
        "thank you for showing up today, especially if it took effort. We'll go gently.",
    ];
    let momentum = [
        "you're coming in with some real momentum. Let's build on it.",
        "it's good to see you in a strong place today. Let's make the most of it.",
    ];
    let neutral = [
        "I'm glad you're here. What's been on your mind?",
        "let's check in and see where today takes us.",
    ];

    let variants: &[&str] = if overall < 4.0 {
        &concern
    } else if overall > 7.0 {
        &momentum
    } else {
        &neutral
    };
    let variant = variants[rng.gen_range(0..variants.len())];

    format!("Good {}, {}. {}", time_of_day, name, variant)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
