//! Session domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::catalog::Intervention;
use crate::emotion::{DimensionChange, EmotionalState, Trend};
use crate::intervention::HomeActivity;
use crate::profile::FocusArea;
use crate::safety::{CrisisResource, RiskTier};

/// Phase of the session state machine.
///
/// `Idle -> Starting -> Active -> Ending -> Complete`. `Complete` is
/// terminal until a new session is explicitly started, which begins a fresh
/// record and re-enters `Starting`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "kebab-case")]
pub enum SessionPhase {
    Idle,
    Starting,
    Active,
    Ending,
    Complete,
}

/// Response produced for one turn.
///
/// A discriminated type per response kind, so each variant's required fields
/// are statically enforced instead of living in ad hoc optional fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TurnResponse {
    /// A safety response for a flagged turn.
    Safety {
        tier: RiskTier,
        message: String,
        resources: Vec<CrisisResource>,
        guidance: String,
    },
    /// A therapeutic intervention for a normal turn.
    Intervention {
        title: String,
        content: String,
        #[serde(default)]
        follow_up: Option<String>,
        focus_areas: Vec<FocusArea>,
    },
    /// A generic supportive message, used when the catalog has nothing for
    /// the requested focus areas.
    Informational { message: String },
}

/// One user-input/agent-response exchange within a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    /// What the user submitted
    pub user_text: String,
    /// The engine's response
    pub response: TurnResponse,
    /// Emotional snapshot at the time the turn was recorded. For safety
    /// turns this is the unchanged pre-turn state.
    pub emotional_state: EmotionalState,
    /// Timestamp when the turn was recorded
    pub recorded_at: DateTime<Utc>,
}

/// When and what the next session should focus on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NextSessionRecommendation {
    /// Recommended gap until the next session, in days
    pub in_days: u32,
    /// Recommended date for the next session
    pub date: DateTime<Utc>,
    /// Suggested focus for the next session
    pub focus: FocusArea,
}

/// Derived end-of-session summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Distinct focus areas worked on, in first-use order
    pub main_themes: Vec<String>,
    /// Narrative insights derived from emotional changes and intervention
    /// effects
    pub key_insights: Vec<String>,
    /// Overall emotional journey direction
    pub trend: Trend,
    /// Significant per-dimension changes, in fixed dimension order
    pub changes: Vec<DimensionChange>,
    /// Suggested between-session activity
    pub home_activity: HomeActivity,
    /// Next-session timing and focus
    pub next_session: NextSessionRecommendation,
}

/// Everything a caller needs after starting a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStart {
    pub session_id: String,
    pub greeting: String,
    pub focus_areas: Vec<FocusArea>,
    /// A preview of interventions available for the initial focus areas
    pub suggested_activities: Vec<Intervention>,
}

/// Record of one session from start to completion.
///
/// Created at session start and sealed once ended: after `seal` the record
/// carries its summary and is never written again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Unique session identifier (UUID format)
    pub id: String,
    /// Timestamp when the session started
    pub started_at: DateTime<Utc>,
    /// Timestamp when the session ended, once sealed
    pub ended_at: Option<DateTime<Utc>>,
    /// Ordered turn sequence
    pub turns: Vec<Turn>,
    /// Final summary, once sealed
    pub summary: Option<SessionSummary>,
}

impl SessionRecord {
    /// Creates an open record with no turns.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            started_at: Utc::now(),
            ended_at: None,
            turns: Vec::new(),
            summary: None,
        }
    }

    /// Whether the record has been sealed by `end`.
    pub fn is_sealed(&self) -> bool {
        self.ended_at.is_some()
    }

    /// Seals the record with its final summary.
    pub fn seal(&mut self, summary: SessionSummary) {
        self.ended_at = Some(Utc::now());
        self.summary = Some(summary);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_response_serializes_with_kind_tag() {
        let response = TurnResponse::Informational {
            message: "take care".to_string(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["kind"], "informational");
        assert_eq!(json["message"], "take care");
    }

    #[test]
    fn test_intervention_variant_tag() {
        let response = TurnResponse::Intervention {
            title: "Box Breathing".to_string(),
            content: "Breathe.".to_string(),
            follow_up: None,
            focus_areas: vec![FocusArea::AnxietyManagement],
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["kind"], "intervention");
        assert_eq!(json["focus_areas"][0], "anxiety-management");
    }

    #[test]
    fn test_record_seal_sets_end_time() {
        let mut record = SessionRecord::new("s-1");
        assert!(!record.is_sealed());
        record.seal(SessionSummary {
            main_themes: Vec::new(),
            key_insights: Vec::new(),
            trend: Trend::Neutral,
            changes: Vec::new(),
            home_activity: crate::intervention::HomeActivity {
                activity: "rest".to_string(),
                instructions: "rest".to_string(),
                recommendation: "rest".to_string(),
            },
            next_session: NextSessionRecommendation {
                in_days: 7,
                date: Utc::now(),
                focus: FocusArea::GeneralWellbeing,
            },
        });
        assert!(record.is_sealed());
        assert!(record.summary.is_some());
    }
}
