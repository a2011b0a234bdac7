//! Intervention catalog.
//!
//! The catalog is immutable reference data loaded once at process start and
//! injected where needed (`Arc<InterventionCatalog>`); there is no global
//! mutable state, so tests can run in parallel against substituted catalogs.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::Result;
use crate::profile::{ActivityKind, FocusArea};

/// A concrete therapeutic activity or technique offered to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intervention {
    /// Stable identifier, also the key for profile effectiveness scores
    pub id: String,
    /// Focus area this intervention targets
    pub focus_area: FocusArea,
    /// Kind of activity the intervention asks for
    pub category: ActivityKind,
    /// Display title
    pub title: String,
    /// Estimated duration in minutes
    pub duration_minutes: u32,
    /// Narrative instructions shown to the user
    pub content: String,
    /// Optional follow-up prompt for the next exchange
    #[serde(default)]
    pub follow_up: Option<String>,
}

/// TOML document shape for catalog files.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
struct CatalogRoot {
    #[serde(rename = "intervention", default)]
    interventions: Vec<Intervention>,
}

/// Immutable catalog of interventions keyed by focus area.
///
/// Entries keep their declaration order within each focus area; selection
/// tie-breaking relies on it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterventionCatalog {
    entries: BTreeMap<FocusArea, Vec<Intervention>>,
}

impl InterventionCatalog {
    /// Builds a catalog from a flat intervention list, grouping by focus
    /// area and preserving order.
    pub fn from_interventions(interventions: Vec<Intervention>) -> Self {
        let mut entries: BTreeMap<FocusArea, Vec<Intervention>> = BTreeMap::new();
        for intervention in interventions {
            entries
                .entry(intervention.focus_area)
                .or_default()
                .push(intervention);
        }
        Self { entries }
    }

    /// Parses a catalog from a TOML document of `[[intervention]]` tables.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let root: CatalogRoot = toml::from_str(content)?;
        Ok(Self::from_interventions(root.interventions))
    }

    /// Loads a catalog from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an `Io` error if the file cannot be read, or a
    /// `Serialization` error if the document is malformed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Candidate interventions for one focus area, in catalog order.
    pub fn candidates(&self, focus_area: FocusArea) -> &[Intervention] {
        self.entries
            .get(&focus_area)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All interventions across all focus areas, in catalog order.
    pub fn all(&self) -> impl Iterator<Item = &Intervention> {
        self.entries.values().flatten()
    }

    /// Whether any of the given focus areas has at least one entry.
    pub fn has_any(&self, focus_areas: &[FocusArea]) -> bool {
        focus_areas
            .iter()
            .any(|area| !self.candidates(*area).is_empty())
    }

    /// The built-in catalog shipped with the engine.
    pub fn builtin() -> Self {
        let entry = |id: &str,
                     focus_area: FocusArea,
                     category: ActivityKind,
                     title: &str,
                     duration_minutes: u32,
                     content: &str,
                     follow_up: Option<&str>| {
            Intervention {
                id: id.to_string(),
                focus_area,
                category,
                title: title.to_string(),
                duration_minutes,
                content: content.to_string(),
                follow_up: follow_up.map(|s| s.to_string()),
            }
        };

        Self::from_interventions(vec![
            // anxiety-management
            entry(
                "box-breathing",
                FocusArea::AnxietyManagement,
                ActivityKind::Breathing,
                "Box Breathing",
                5,
                "Breathe in for four counts, hold for four, out for four, hold for four. \
                 Repeat the square for five minutes, letting your shoulders drop a little \
                 on each exhale.",
                Some("How does your body feel after a few rounds?"),
            ),
            entry(
                "grounding-54321",
                FocusArea::AnxietyManagement,
                ActivityKind::Grounding,
                "5-4-3-2-1 Grounding",
                5,
                "Name five things you can see, four you can touch, three you can hear, \
                 two you can smell, and one you can taste. Take your time with each one.",
                Some("Which of the five senses pulled you back the most?"),
            ),
            entry(
                "worry-window",
                FocusArea::AnxietyManagement,
                ActivityKind::Cognitive,
                "Scheduled Worry Window",
                10,
                "Pick a fifteen-minute window later today and write down every worry that \
                 shows up before then, telling yourself it has an appointment. When the \
                 window opens, review the list and sort what is in your control.",
                None,
            ),
            // mood-improvement
            entry(
                "gratitude-list",
                FocusArea::MoodImprovement,
                ActivityKind::Journaling,
                "Three Good Things",
                10,
                "Write down three things that went well today, however small, and one \
                 sentence about why each happened. Specific beats profound.",
                Some("Was any of the three a surprise to you?"),
            ),
            entry(
                "behavioral-activation",
                FocusArea::MoodImprovement,
                ActivityKind::Movement,
                "One Small Activation",
                15,
                "Choose one small activity you used to enjoy and do it for fifteen \
                 minutes without judging the result. Motivation tends to follow action, \
                 not the other way round.",
                Some("What did you pick, and how did the first five minutes feel?"),
            ),
            entry(
                "thought-reframe",
                FocusArea::MoodImprovement,
                ActivityKind::Cognitive,
                "Catch and Reframe",
                10,
                "Catch one harsh thought about yourself today. Write it down, then write \
                 what you would say to a friend who voiced the same thought about \
                 themselves.",
                None,
            ),
            // stress-reduction
            entry(
                "body-scan",
                FocusArea::StressReduction,
                ActivityKind::Meditation,
                "Short Body Scan",
                10,
                "Sitting or lying down, move your attention slowly from your toes to the \
                 top of your head, noticing tension without trying to fix it.",
                Some("Where in your body was the stress hiding?"),
            ),
            entry(
                "brain-dump",
                FocusArea::StressReduction,
                ActivityKind::Journaling,
                "Brain Dump",
                10,
                "Set a timer for ten minutes and write everything on your mind without \
                 editing. When the timer rings, circle the one item that actually needs \
                 you today.",
                None,
            ),
            entry(
                "walk-reset",
                FocusArea::StressReduction,
                ActivityKind::Movement,
                "Ten-Minute Reset Walk",
                10,
                "Step outside and walk for ten minutes at whatever pace feels natural, \
                 phone away, paying attention to what you pass rather than what you carry.",
                Some("Did anything you noticed on the walk stay with you?"),
            ),
            // sleep-improvement
            entry(
                "wind-down-ritual",
                FocusArea::SleepImprovement,
                ActivityKind::Grounding,
                "Wind-Down Ritual",
                20,
                "Pick a consistent thirty-minute pre-bed ritual: dim lights, screens away, \
                 one calm activity. Tonight, sketch what yours will look like and try the \
                 first version.",
                None,
            ),
            entry(
                "racing-mind-notepad",
                FocusArea::SleepImprovement,
                ActivityKind::Journaling,
                "Bedside Notepad",
                5,
                "Keep a notepad by your bed. When a thought loops, write one line and tell \
                 yourself it is saved for tomorrow. The page remembers so you don't have to.",
                Some("How many loops did the notepad catch last night?"),
            ),
            entry(
                "sleep-breathing",
                FocusArea::SleepImprovement,
                ActivityKind::Breathing,
                "4-7-8 Breathing",
                5,
                "In bed, breathe in for four counts, hold for seven, and exhale slowly for \
                 eight. Repeat four times, letting the long exhale do the work.",
                None,
            ),
            // self-esteem
            entry(
                "strengths-inventory",
                FocusArea::SelfEsteem,
                ActivityKind::Journaling,
                "Strengths Inventory",
                15,
                "List five moments this year when you handled something hard. For each, \
                 name the strength it took. Facts only; the evidence is already yours.",
                Some("Which strength on the list do you use most without noticing?"),
            ),
            entry(
                "self-compassion-pause",
                FocusArea::SelfEsteem,
                ActivityKind::Meditation,
                "Self-Compassion Pause",
                5,
                "Place a hand where you feel the criticism land, and say: this is a hard \
                 moment, hard moments are part of being human, may I be kind to myself in \
                 this one.",
                None,
            ),
            // mindfulness
            entry(
                "mindful-minute",
                FocusArea::Mindfulness,
                ActivityKind::Meditation,
                "Mindful Minute",
                2,
                "For one minute, follow your breath and count each exhale up to ten, then \
                 start again. When your mind wanders, that noticing is the practice.",
                Some("How far did you count before the first wander?"),
            ),
            entry(
                "single-task-tea",
                FocusArea::Mindfulness,
                ActivityKind::Grounding,
                "One Thing at a Time",
                10,
                "Make a warm drink and drink it doing absolutely nothing else. Notice the \
                 heat, the taste, the urge to reach for your phone, and let the urge pass.",
                None,
            ),
            // general-wellbeing
            entry(
                "daily-check-in",
                FocusArea::GeneralWellbeing,
                ActivityKind::Journaling,
                "Two-Line Check-In",
                5,
                "Write two lines: one about how today actually felt, one about what \
                 tomorrow needs from you. No more than two lines; brevity keeps it honest.",
                Some("What did tomorrow ask of you?"),
            ),
            entry(
                "connection-reach-out",
                FocusArea::GeneralWellbeing,
                ActivityKind::Cognitive,
                "Reach Out",
                10,
                "Send one message to someone you've been meaning to contact. Connection is \
                 a wellbeing practice, not an interruption to it.",
                None,
            ),
            entry(
                "stretch-break",
                FocusArea::GeneralWellbeing,
                ActivityKind::Movement,
                "Stretch Break",
                5,
                "Stand up, reach overhead, roll your shoulders, and stretch whatever feels \
                 stiff for five minutes. Your body keeps score of the sitting.",
                None,
            ),
        ])
    }
}
