//! Emotional state snapshot types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Lower bound of every emotional scalar.
pub const SCALE_MIN: f64 = 1.0;
/// Upper bound of every emotional scalar.
pub const SCALE_MAX: f64 = 10.0;

/// One tracked emotional dimension.
///
/// `REPORT_ORDER` fixes the order in which per-dimension results (journey
/// changes, summaries) are emitted.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
    EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Dimension {
    Anxiety,
    Depression,
    Anger,
    Joy,
}

impl Dimension {
    /// Fixed reporting order for per-dimension output.
    pub const REPORT_ORDER: [Dimension; 4] = [
        Dimension::Anxiety,
        Dimension::Depression,
        Dimension::Anger,
        Dimension::Joy,
    ];
}

/// A snapshot of the user's emotional state at one point in a session.
///
/// Invariants, maintained by every constructor:
/// - each scalar lies in [`SCALE_MIN`, `SCALE_MAX`]
/// - `overall` is the arithmetic mean of the four dimensions
///
/// Snapshots are immutable once recorded; the tracker appends new ones
/// instead of editing in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionalState {
    pub overall: f64,
    pub anxiety: f64,
    pub depression: f64,
    pub anger: f64,
    pub joy: f64,
    /// Timestamp when the snapshot was recorded
    pub recorded_at: DateTime<Utc>,
}

impl EmotionalState {
    /// Builds a snapshot from the four dimension values, clamping each to
    /// the scale and deriving `overall` as their mean.
    pub fn from_dimensions(anxiety: f64, depression: f64, anger: f64, joy: f64) -> Self {
        let anxiety = anxiety.clamp(SCALE_MIN, SCALE_MAX);
        let depression = depression.clamp(SCALE_MIN, SCALE_MAX);
        let anger = anger.clamp(SCALE_MIN, SCALE_MAX);
        let joy = joy.clamp(SCALE_MIN, SCALE_MAX);
        Self {
            overall: (anxiety + depression + anger + joy) / 4.0,
            anxiety,
            depression,
            anger,
            joy,
            recorded_at: Utc::now(),
        }
    }

    /// Returns the value of a single dimension.
    pub fn value(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Anxiety => self.anxiety,
            Dimension::Depression => self.depression,
            Dimension::Anger => self.anger,
            Dimension::Joy => self.joy,
        }
    }
}

/// Direction of the emotional journey over a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Trend {
    Improved,
    Declined,
    Neutral,
}

/// Direction of a significant single-dimension change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ChangeDirection {
    Increased,
    Decreased,
}

/// A significant change in one dimension between the first and last
/// snapshots of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionChange {
    pub dimension: Dimension,
    pub direction: ChangeDirection,
    /// Absolute delta between first and last snapshot
    pub magnitude: f64,
}

/// Trend plus significant per-dimension changes for one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JourneySummary {
    pub trend: Trend,
    pub changes: Vec<DimensionChange>,
}
