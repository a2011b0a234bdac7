//! Session domain module.
//!
//! This module contains the session state machine, turn records, and the
//! orchestrator that sequences screening, emotion tracking, and intervention
//! selection for one session.
//!
//! # Module Structure
//!
//! - `model`: Session domain models (`SessionRecord`, `Turn`, `TurnResponse`,
//!   `SessionPhase`, `SessionSummary`)
//! - `analysis`: Deterministic lexical utterance analysis
//! - `orchestrator`: Session lifecycle owner (`SessionOrchestrator`)

mod analysis;
mod model;
mod orchestrator;

// Re-export public API
pub use analysis::{analyze_utterance, UtteranceAnalysis};
pub use model::{
    NextSessionRecommendation, SessionPhase, SessionRecord, SessionStart, SessionSummary, Turn,
    TurnResponse,
};
pub use orchestrator::SessionOrchestrator;
