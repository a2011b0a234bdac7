//! User profile domain module.
//!
//! # Module Structure
//!
//! - `model`: Profile domain model (`UserProfile`) and tag enums
//!   (`FocusArea`, `ActivityKind`)
//! - `patch`: Validated partial update (`ProfilePatch`)

mod model;
mod patch;

// Re-export public API
pub use model::{ActivityKind, FocusArea, UserProfile};
pub use patch::ProfilePatch;
