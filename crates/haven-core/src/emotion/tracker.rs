//! Per-session emotional state tracker.

use rand::Rng;
use std::collections::BTreeMap;

use super::model::{
    ChangeDirection, Dimension, DimensionChange, EmotionalState, JourneySummary, Trend, SCALE_MAX,
    SCALE_MIN,
};
use crate::error::{HavenError, Result};

/// Weight given to a freshly observed dimension value.
const OBSERVED_WEIGHT: f64 = 0.7;
/// Weight given to the previous snapshot's value.
const CARRY_WEIGHT: f64 = 0.3;
/// Overall delta beyond which the journey counts as improved/declined.
const TREND_THRESHOLD: f64 = 1.0;
/// Per-dimension delta beyond which a change is significant.
const SIGNIFICANT_CHANGE: f64 = 1.5;
/// Neutral starting value for dimensions with no intake reading.
const BASELINE_DEFAULT: f64 = 5.0;

/// Tracks the emotional journey of exactly one session.
///
/// The tracker owns an ordered, append-only history of snapshots. The first
/// entry is always the baseline; every `update` appends a new snapshot and
/// never edits recorded ones.
#[derive(Debug, Default)]
pub struct EmotionTracker {
    history: Vec<EmotionalState>,
}

impl EmotionTracker {
    /// Creates a tracker with an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Produces the starting snapshot for a session.
    ///
    /// Dimensions default to a neutral 5.0, overridden by any intake
    /// readings the caller collected. A single jitter offset in [-1, 1] is
    /// drawn from `rng` and added to all four dimensions, shifting `overall`
    /// by at most one point while keeping it the exact mean of the
    /// dimensions. Everything is clamped to [1, 10].
    ///
    /// # Errors
    ///
    /// Returns a `Validation` error if an intake reading is outside [0, 10].
    pub fn assess_baseline(
        &mut self,
        intake: &BTreeMap<Dimension, f64>,
        rng: &mut impl Rng,
    ) -> Result<EmotionalState> {
        validate_observed(intake)?;

        let jitter: f64 = rng.gen_range(-1.0..=1.0);
        let read = |dimension: Dimension| -> f64 {
            let base = intake.get(&dimension).copied().unwrap_or(BASELINE_DEFAULT);
            (base + jitter).clamp(SCALE_MIN, SCALE_MAX)
        };

        let baseline = EmotionalState::from_dimensions(
            read(Dimension::Anxiety),
            read(Dimension::Depression),
            read(Dimension::Anger),
            read(Dimension::Joy),
        );
        self.history.clear();
        self.history.push(baseline.clone());
        Ok(baseline)
    }

    /// Applies observed dimension readings to the current state and appends
    /// the result to history.
    ///
    /// Each observed dimension is blended as `0.7 * observed + 0.3 * previous`;
    /// absent dimensions carry over unchanged. `overall` is recomputed as the
    /// mean of the four dimensions and every value is clamped to [1, 10].
    /// Deterministic: no randomness beyond the baseline assessment.
    ///
    /// An empty `observed` map still appends a carried-over snapshot, so
    /// history length tracks the number of processed turns.
    ///
    /// # Errors
    ///
    /// Returns a `Validation` error if an observed value is outside [0, 10],
    /// or an `Internal` error if called before `assess_baseline`.
    pub fn update(&mut self, observed: &BTreeMap<Dimension, f64>) -> Result<EmotionalState> {
        validate_observed(observed)?;

        let previous = self
            .history
            .last()
            .ok_or_else(|| HavenError::internal("emotion update before baseline assessment"))?;

        let blend = |dimension: Dimension| -> f64 {
            match observed.get(&dimension) {
                Some(value) => OBSERVED_WEIGHT * value + CARRY_WEIGHT * previous.value(dimension),
                None => previous.value(dimension),
            }
        };

        let next = EmotionalState::from_dimensions(
            blend(Dimension::Anxiety),
            blend(Dimension::Depression),
            blend(Dimension::Anger),
            blend(Dimension::Joy),
        );
        self.history.push(next.clone());
        Ok(next)
    }

    /// Returns the latest snapshot (the baseline if no update occurred yet),
    /// or `None` before baseline assessment.
    pub fn current_state(&self) -> Option<&EmotionalState> {
        self.history.last()
    }

    /// Returns the full append-only history.
    pub fn history(&self) -> &[EmotionalState] {
        &self.history
    }

    /// Compares the first and last snapshots of the session.
    ///
    /// With fewer than two entries the journey is `neutral` with no changes.
    /// Otherwise the overall delta drives the trend (> +1 improved, < -1
    /// declined) and each dimension with |delta| > 1.5 yields a change
    /// record, in the fixed order anxiety, depression, anger, joy.
    pub fn summarize_journey(&self) -> JourneySummary {
        let (Some(first), Some(last)) = (self.history.first(), self.history.last()) else {
            return JourneySummary {
                trend: Trend::Neutral,
                changes: Vec::new(),
            };
        };
        if self.history.len() < 2 {
            return JourneySummary {
                trend: Trend::Neutral,
                changes: Vec::new(),
            };
        }

        let overall_delta = last.overall - first.overall;
        let trend = if overall_delta > TREND_THRESHOLD {
            Trend::Improved
        } else if overall_delta < -TREND_THRESHOLD {
            Trend::Declined
        } else {
            Trend::Neutral
        };

        let changes = Dimension::REPORT_ORDER
            .iter()
            .filter_map(|&dimension| {
                let delta = last.value(dimension) - first.value(dimension);
                if delta.abs() > SIGNIFICANT_CHANGE {
                    Some(DimensionChange {
                        dimension,
                        direction: if delta > 0.0 {
                            ChangeDirection::Increased
                        } else {
                            ChangeDirection::Decreased
                        },
                        magnitude: delta.abs(),
                    })
                } else {
                    None
                }
            })
            .collect();

        JourneySummary { trend, changes }
    }
}

fn validate_observed(observed: &BTreeMap<Dimension, f64>) -> Result<()> {
    for (dimension, value) in observed {
        if !(0.0..=10.0).contains(value) {
            return Err(HavenError::validation(
                dimension.to_string(),
                format!("observed value {} is outside [0, 10]", value),
            ));
        }
    }
    Ok(())
}
