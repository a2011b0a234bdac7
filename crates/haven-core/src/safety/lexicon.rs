//! Safety phrase lists.
//!
//! The lexicon is configuration data: deployments extend the phrase lists
//! from a TOML document without touching engine code.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;

/// Phrase lists used by the screener, in priority order: suicidal-ideation
/// phrases are checked before self-harm phrases.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct SafetyLexicon {
    /// Phrases indicating suicidal ideation (tier: emergency)
    #[serde(default)]
    pub suicidal_ideation: Vec<String>,
    /// Phrases indicating self-harm (tier: warning)
    #[serde(default)]
    pub self_harm: Vec<String>,
}

impl Default for SafetyLexicon {
    fn default() -> Self {
        Self {
            suicidal_ideation: [
                "end my life",
                "kill myself",
                "want to die",
                "suicide",
                "suicidal",
                "better off dead",
                "no reason to live",
                "end it all",
                "take my own life",
                "don't want to be here anymore",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            self_harm: [
                "hurt myself",
                "harm myself",
                "cut myself",
                "cutting myself",
                "self harm",
                "self-harm",
                "punish myself",
                "burn myself",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

impl SafetyLexicon {
    /// Parses a lexicon from a TOML document.
    ///
    /// Phrases are stored lowercased so matching stays case-insensitive
    /// regardless of how the file was written.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut lexicon: SafetyLexicon = toml::from_str(content)?;
        lexicon.normalize();
        Ok(lexicon)
    }

    /// Loads a lexicon from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an `Io` error if the file cannot be read, or a
    /// `Serialization` error if the document is malformed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Merges additional phrases into the built-in defaults.
    pub fn extended(extra: SafetyLexicon) -> Self {
        let mut lexicon = Self::default();
        lexicon.suicidal_ideation.extend(extra.suicidal_ideation);
        lexicon.self_harm.extend(extra.self_harm);
        lexicon.normalize();
        lexicon
    }

    fn normalize(&mut self) {
        for phrase in self
            .suicidal_ideation
            .iter_mut()
            .chain(self.self_harm.iter_mut())
        {
            *phrase = phrase.to_lowercase();
        }
        self.suicidal_ideation.retain(|p| !p.trim().is_empty());
        self.self_harm.retain(|p| !p.trim().is_empty());
    }
}
