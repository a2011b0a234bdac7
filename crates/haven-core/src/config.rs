//! Engine tuning parameters.
//!
//! All values have compiled-in defaults and can be overridden from a TOML
//! document, so deployments can retune the engine without code changes.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Tuning parameters for intervention selection and session pacing.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Minimum number of turns before an intervention may repeat.
    #[serde(default = "default_cooldown_turns")]
    pub cooldown_turns: usize,
    /// How many recent agent-assigned focus areas are considered when
    /// avoiding back-to-back repetition.
    #[serde(default = "default_focus_history_window")]
    pub focus_history_window: usize,
    /// Effectiveness weight assumed for interventions the profile has no
    /// recorded score for.
    #[serde(default = "default_effectiveness")]
    pub default_effectiveness: f64,
}

fn default_cooldown_turns() -> usize {
    3
}

fn default_focus_history_window() -> usize {
    3
}

fn default_effectiveness() -> f64 {
    0.5
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cooldown_turns: default_cooldown_turns(),
            focus_history_window: default_focus_history_window(),
            default_effectiveness: default_effectiveness(),
        }
    }
}

impl EngineConfig {
    /// Parses a config from a TOML document. Missing keys fall back to the
    /// compiled-in defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.cooldown_turns, 3);
        assert_eq!(config.focus_history_window, 3);
        assert_eq!(config.default_effectiveness, 0.5);
    }

    #[test]
    fn test_partial_toml_override() {
        let config = EngineConfig::from_toml_str("cooldown_turns = 5").unwrap();
        assert_eq!(config.cooldown_turns, 5);
        assert_eq!(config.focus_history_window, 3);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(EngineConfig::from_toml_str("cooldown_turns = \"many\"").is_err());
    }
}
