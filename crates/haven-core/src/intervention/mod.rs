//! Intervention selection domain module.
//!
//! # Module Structure
//!
//! - `selector`: Focus-area rules, cool-down aware weighted selection, and
//!   home-activity suggestion (`InterventionSelector`, `HomeActivity`)

mod selector;

// Re-export public API
pub use selector::{HomeActivity, InterventionSelector};
