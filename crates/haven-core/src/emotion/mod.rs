//! Emotional state tracking domain module.
//!
//! # Module Structure
//!
//! - `model`: Emotional state snapshot types (`EmotionalState`, `Dimension`)
//!   and journey summary types (`Trend`, `DimensionChange`)
//! - `tracker`: Per-session tracker (`EmotionTracker`) owning the
//!   append-only history

mod model;
mod tracker;

// Re-export public API
pub use model::{
    ChangeDirection, Dimension, DimensionChange, EmotionalState, JourneySummary, Trend, SCALE_MAX,
    SCALE_MIN,
};
pub use tracker::EmotionTracker;
