//! Per-tier safety responses.
//!
//! Response construction is separated from classification: each builder is a
//! pure function of the tier. The session is never terminated automatically
//! on a safety turn; the orchestrator surfaces the response and leaves the
//! state machine where it is, deferring the continue/stop decision to the
//! human.

use serde::{Deserialize, Serialize};

use super::screener::RiskTier;

/// A 24/7 crisis support resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrisisResource {
    pub name: String,
    pub contact: String,
    pub availability: String,
}

/// The fixed crisis resource list included with every non-`None` response.
pub fn crisis_resources() -> Vec<CrisisResource> {
    vec![
        CrisisResource {
            name: "988 Suicide & Crisis Lifeline".to_string(),
            contact: "Call or text 988".to_string(),
            availability: "24/7".to_string(),
        },
        CrisisResource {
            name: "Crisis Text Line".to_string(),
            contact: "Text HOME to 741741".to_string(),
            availability: "24/7".to_string(),
        },
        CrisisResource {
            name: "International Association for Suicide Prevention".to_string(),
            contact: "https://www.iasp.info/resources/Crisis_Centres/".to_string(),
            availability: "24/7 directory".to_string(),
        },
    ]
}

/// A fully built safety response for a flagged turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetyResponse {
    pub tier: RiskTier,
    pub message: String,
    pub resources: Vec<CrisisResource>,
    /// Emergency: instruction to contact a resource immediately.
    /// Warning: prompt asking whether to continue or shift to coping work.
    pub guidance: String,
}

impl SafetyResponse {
    /// Builds the emergency-tier response: urgent tone, full resource list,
    /// explicit instruction to reach out right now.
    pub fn emergency() -> Self {
        Self {
            tier: RiskTier::Emergency,
            message: "What you just shared matters, and I'm taking it seriously. \
                      You don't have to face this alone, and you deserve support \
                      from someone who can truly help right now."
                .to_string(),
            resources: crisis_resources(),
            guidance: "Please contact one of these resources immediately. They are \
                       free, confidential, and available around the clock. If you \
                       are in immediate danger, call your local emergency number."
                .to_string(),
        }
    }

    /// Builds the warning-tier response: supportive tone, same resource
    /// list, and a prompt to choose how to continue.
    pub fn warning() -> Self {
        Self {
            tier: RiskTier::Warning,
            message: "Thank you for trusting me with something this difficult. \
                      Those feelings are heavy, and it's important you're not \
                      carrying them by yourself."
                .to_string(),
            resources: crisis_resources(),
            guidance: "Would you like to keep talking about what's going on, or \
                       shift focus to some coping strategies that may help right \
                       now? These resources are also here whenever you need them."
                .to_string(),
        }
    }

    /// Builds the response for `tier`, or `None` for unflagged turns.
    pub fn for_tier(tier: RiskTier) -> Option<Self> {
        match tier {
            RiskTier::Emergency => Some(Self::emergency()),
            RiskTier::Warning => Some(Self::warning()),
            RiskTier::None => None,
        }
    }
}
