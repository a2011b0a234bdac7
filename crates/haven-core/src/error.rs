//! Error types for the Haven engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the Haven session engine.
///
/// This provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait. None of these variants is
/// retried automatically by the engine; retry policy belongs to the caller.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum HavenError {
    /// Operation attempted while the session state machine is in the wrong
    /// phase (e.g., submitting a turn to a completed session).
    #[error("Invalid transition: cannot {operation} while session is {phase}")]
    InvalidTransition {
        operation: &'static str,
        phase: String,
    },

    /// Malformed profile update or out-of-range preference value.
    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    /// No intervention exists in the catalog for any of the requested focus
    /// areas. Recoverable: the orchestrator degrades to a generic supportive
    /// response instead of surfacing this to the end user.
    #[error("Catalog exhausted for focus areas: {}", .focus_areas.join(", "))]
    CatalogExhausted { focus_areas: Vec<String> },

    /// Operation referenced a session ID that does not exist.
    #[error("Unknown session: '{id}'")]
    UnknownSession { id: String },

    /// IO error (reading lexicon or catalog files)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl HavenError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates an InvalidTransition error
    pub fn invalid_transition(operation: &'static str, phase: impl Into<String>) -> Self {
        Self::InvalidTransition {
            operation,
            phase: phase.into(),
        }
    }

    /// Creates a Validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates an UnknownSession error
    pub fn unknown_session(id: impl Into<String>) -> Self {
        Self::UnknownSession { id: id.into() }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is an InvalidTransition error
    pub fn is_invalid_transition(&self) -> bool {
        matches!(self, Self::InvalidTransition { .. })
    }

    /// Check if this is a Validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Check if this is a CatalogExhausted error
    pub fn is_catalog_exhausted(&self) -> bool {
        matches!(self, Self::CatalogExhausted { .. })
    }

    /// Check if this is an UnknownSession error
    pub fn is_unknown_session(&self) -> bool {
        matches!(self, Self::UnknownSession { .. })
    }

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for HavenError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for HavenError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for HavenError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, HavenError>`.
pub type Result<T> = std::result::Result<T, HavenError>;
