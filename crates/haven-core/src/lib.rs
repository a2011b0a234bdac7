pub mod catalog;
pub mod config;
pub mod emotion;
pub mod error;
pub mod intervention;
pub mod profile;
pub mod safety;
pub mod session;

// Re-export common error type
pub use error::{HavenError, Result};
