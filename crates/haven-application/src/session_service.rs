//! Multi-session service implementation.
//!
//! This module provides the `SessionService` which owns the profile store
//! and the registry of live `SessionOrchestrator` instances, exposing the
//! four external operations: start a session, submit a turn, end a session,
//! and update a profile.

use crate::registry::SessionRegistry;
use haven_core::catalog::InterventionCatalog;
use haven_core::config::EngineConfig;
use haven_core::emotion::Dimension;
use haven_core::error::{HavenError, Result};
use haven_core::profile::{ProfilePatch, UserProfile};
use haven_core::safety::SafetyLexicon;
use haven_core::session::{
    SessionOrchestrator, SessionRecord, SessionStart, SessionSummary, TurnResponse,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{Mutex, RwLock};

/// Service coordinating sessions for many users.
///
/// Each started session gets its own `SessionOrchestrator` seeded from the
/// service's base seed, registered in a [`SessionRegistry`] under the
/// session id. Turns for one session are serialized through that session's
/// mutex; different sessions never contend.
///
/// Completed sessions stay registered so their sealed records remain
/// readable until the caller removes them.
///
/// # Thread Safety
///
/// Internal state uses `Arc` with `RwLock`/`Mutex` for concurrent access;
/// all methods take `&self`.
pub struct SessionService {
    /// Registered user profiles by user id
    profiles: RwLock<HashMap<String, UserProfile>>,
    /// Live orchestrators by session id
    registry: SessionRegistry,
    /// Immutable intervention catalog shared by all sessions
    catalog: Arc<InterventionCatalog>,
    /// Safety phrase lexicon handed to each orchestrator
    lexicon: SafetyLexicon,
    /// Engine tuning shared by all sessions
    config: EngineConfig,
    /// Base seed from which per-session seeds are derived
    base_seed: u64,
    /// Monotonic counter distinguishing per-session seeds
    session_counter: AtomicU64,
}

impl SessionService {
    /// Creates a service with a random base seed.
    pub fn new(
        catalog: Arc<InterventionCatalog>,
        lexicon: SafetyLexicon,
        config: EngineConfig,
    ) -> Self {
        Self::with_seed(catalog, lexicon, config, rand::random())
    }

    /// Creates a service with an explicit base seed.
    ///
    /// Per-session seeds are derived deterministically from the base seed
    /// and a start counter, so two services built with the same seed replay
    /// the same session-level randomness for the same call sequence.
    pub fn with_seed(
        catalog: Arc<InterventionCatalog>,
        lexicon: SafetyLexicon,
        config: EngineConfig,
        base_seed: u64,
    ) -> Self {
        Self {
            profiles: RwLock::new(HashMap::new()),
            registry: SessionRegistry::new(),
            catalog,
            lexicon,
            config,
            base_seed,
            session_counter: AtomicU64::new(0),
        }
    }

    /// Registers a profile, replacing any existing profile with the same id.
    ///
    /// A replaced profile affects future sessions only; orchestrators hold
    /// the profile they were started with.
    pub async fn register_profile(&self, profile: UserProfile) {
        tracing::info!("[SessionService] Registered profile {}", profile.id);
        let mut profiles = self.profiles.write().await;
        profiles.insert(profile.id.clone(), profile);
    }

    /// Returns the stored profile for a user.
    ///
    /// # Errors
    ///
    /// `Validation` if no profile is registered under `user_id`.
    pub async fn profile(&self, user_id: &str) -> Result<UserProfile> {
        let profiles = self.profiles.read().await;
        profiles
            .get(user_id)
            .cloned()
            .ok_or_else(|| HavenError::validation("user_id", "no profile registered"))
    }

    /// Applies a validated partial update to a stored profile.
    ///
    /// The patch is validated against the current profile before anything is
    /// written; a rejected patch leaves the stored profile untouched.
    ///
    /// # Errors
    ///
    /// - `Validation` if no profile is registered under `user_id`
    /// - `Validation` if any patch field fails validation
    pub async fn update_profile(&self, user_id: &str, patch: &ProfilePatch) -> Result<UserProfile> {
        let mut profiles = self.profiles.write().await;
        let current = profiles
            .get(user_id)
            .ok_or_else(|| HavenError::validation("user_id", "no profile registered"))?;
        let merged = patch.apply(current)?;
        profiles.insert(user_id.to_string(), merged.clone());
        tracing::info!("[SessionService] Updated profile {}", user_id);
        Ok(merged)
    }

    /// Starts a session for a registered user.
    ///
    /// Builds a fresh orchestrator around the user's current profile,
    /// starts it with the optional intake readings, and registers it under
    /// the new session id.
    ///
    /// # Errors
    ///
    /// - `Validation` if no profile is registered under `user_id`, or an
    ///   intake reading is out of range
    pub async fn start_session(
        &self,
        user_id: &str,
        intake: &BTreeMap<Dimension, f64>,
    ) -> Result<SessionStart> {
        let profile = self.profile(user_id).await?;

        let mut orchestrator = SessionOrchestrator::new(
            profile,
            Arc::clone(&self.catalog),
            self.lexicon.clone(),
            self.config.clone(),
            self.next_seed(),
        );
        let start = orchestrator.start(intake)?;

        tracing::info!(
            "[SessionService] Started session {} for user {}",
            start.session_id,
            user_id
        );
        self.registry
            .insert(start.session_id.clone(), Arc::new(Mutex::new(orchestrator)))
            .await;
        Ok(start)
    }

    /// Submits one user turn to a session.
    ///
    /// Turns for the same session are processed in arrival order.
    ///
    /// # Errors
    ///
    /// - `UnknownSession` if no session is registered under `session_id`
    /// - `InvalidTransition` if the session is not active
    pub async fn submit_turn(&self, session_id: &str, text: &str) -> Result<TurnResponse> {
        let orchestrator = self
            .registry
            .get(session_id)
            .await
            .ok_or_else(|| HavenError::unknown_session(session_id))?;
        let mut orchestrator = orchestrator.lock().await;
        orchestrator.submit(text)
    }

    /// Ends a session, sealing its record.
    ///
    /// The session stays registered so [`session_record`](Self::session_record)
    /// can still read the sealed record afterwards.
    ///
    /// # Errors
    ///
    /// - `UnknownSession` if no session is registered under `session_id`
    /// - `InvalidTransition` if the session is not active
    pub async fn end_session(&self, session_id: &str) -> Result<SessionSummary> {
        let orchestrator = self
            .registry
            .get(session_id)
            .await
            .ok_or_else(|| HavenError::unknown_session(session_id))?;
        let mut orchestrator = orchestrator.lock().await;
        let summary = orchestrator.end()?;
        tracing::info!("[SessionService] Ended session {}", session_id);
        Ok(summary)
    }

    /// Returns a copy of a session's record, sealed or not.
    ///
    /// # Errors
    ///
    /// `UnknownSession` if no session is registered under `session_id`.
    pub async fn session_record(&self, session_id: &str) -> Result<SessionRecord> {
        let orchestrator = self
            .registry
            .get(session_id)
            .await
            .ok_or_else(|| HavenError::unknown_session(session_id))?;
        let orchestrator = orchestrator.lock().await;
        orchestrator
            .record()
            .cloned()
            .ok_or_else(|| HavenError::unknown_session(session_id))
    }

    /// Drops a session from the registry, discarding its in-memory record.
    pub async fn discard_session(&self, session_id: &str) {
        self.registry.remove(session_id).await;
        tracing::info!("[SessionService] Discarded session {}", session_id);
    }

    /// Number of registered sessions, live and completed.
    pub async fn session_count(&self) -> usize {
        self.registry.len().await
    }

    fn next_seed(&self) -> u64 {
        let n = self.session_counter.fetch_add(1, Ordering::SeqCst);
        // SplitMix64-style spread so consecutive counters give unrelated seeds.
        self.base_seed ^ n.wrapping_mul(0x9E37_79B9_7F4A_7C15)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use haven_core::profile::FocusArea;

    fn service(seed: u64) -> SessionService {
        SessionService::with_seed(
            Arc::new(InterventionCatalog::builtin()),
            SafetyLexicon::default(),
            EngineConfig::default(),
            seed,
        )
    }

    fn profile(id: &str, name: &str) -> UserProfile {
        let mut profile = UserProfile::new(id, name);
        profile.goals = vec![FocusArea::StressReduction];
        profile
    }

    #[tokio::test]
    async fn test_full_session_flow() {
        let service = service(1);
        service.register_profile(profile("user-1", "Alex")).await;

        let start = service
            .start_session("user-1", &BTreeMap::new())
            .await
            .unwrap();
        assert!(!start.session_id.is_empty());

        let response = service
            .submit_turn(&start.session_id, "work has been stressful")
            .await
            .unwrap();
        assert!(matches!(response, TurnResponse::Intervention { .. }));

        let summary = service.end_session(&start.session_id).await.unwrap();
        assert!(!summary.main_themes.is_empty());

        let record = service.session_record(&start.session_id).await.unwrap();
        assert!(record.is_sealed());
        assert_eq!(record.turns.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_session_id_is_reported() {
        let service = service(1);
        let err = service.submit_turn("no-such-id", "hello").await.unwrap_err();
        assert!(err.is_unknown_session());

        let err = service.end_session("no-such-id").await.unwrap_err();
        assert!(err.is_unknown_session());
    }

    #[tokio::test]
    async fn test_unregistered_user_cannot_start() {
        let service = service(1);
        let err = service
            .start_session("ghost", &BTreeMap::new())
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let service = service(2);
        service.register_profile(profile("user-1", "Alex")).await;
        service.register_profile(profile("user-2", "Sam")).await;

        let first = service
            .start_session("user-1", &BTreeMap::new())
            .await
            .unwrap();
        let second = service
            .start_session("user-2", &BTreeMap::new())
            .await
            .unwrap();
        assert_ne!(first.session_id, second.session_id);
        assert_eq!(service.session_count().await, 2);

        service
            .submit_turn(&first.session_id, "feeling anxious about work")
            .await
            .unwrap();
        service.end_session(&first.session_id).await.unwrap();

        // Ending the first session leaves the second one active.
        let record = service.session_record(&second.session_id).await.unwrap();
        assert!(!record.is_sealed());
        service
            .submit_turn(&second.session_id, "sleep has been rough")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_ended_session_rejects_further_turns() {
        let service = service(3);
        service.register_profile(profile("user-1", "Alex")).await;
        let start = service
            .start_session("user-1", &BTreeMap::new())
            .await
            .unwrap();
        service.end_session(&start.session_id).await.unwrap();

        let err = service
            .submit_turn(&start.session_id, "one more thing")
            .await
            .unwrap_err();
        assert!(err.is_invalid_transition());
    }

    #[tokio::test]
    async fn test_update_profile_applies_patch() {
        let service = service(4);
        service.register_profile(profile("user-1", "Alex")).await;

        let patch = ProfilePatch {
            session_frequency_days: Some(3),
            ..Default::default()
        };
        let merged = service.update_profile("user-1", &patch).await.unwrap();
        assert_eq!(merged.session_frequency_days, 3);
        assert_eq!(
            service.profile("user-1").await.unwrap().session_frequency_days,
            3
        );
    }

    #[tokio::test]
    async fn test_rejected_patch_leaves_profile_untouched() {
        let service = service(4);
        service.register_profile(profile("user-1", "Alex")).await;

        let patch = ProfilePatch {
            session_frequency_days: Some(0),
            ..Default::default()
        };
        assert!(service.update_profile("user-1", &patch).await.is_err());
        assert_eq!(
            service.profile("user-1").await.unwrap().session_frequency_days,
            7
        );
    }

    #[tokio::test]
    async fn test_profile_update_does_not_touch_live_session() {
        let service = service(5);
        service.register_profile(profile("user-1", "Alex")).await;
        let start = service
            .start_session("user-1", &BTreeMap::new())
            .await
            .unwrap();

        let patch = ProfilePatch {
            name: Some("Alexandra".to_string()),
            ..Default::default()
        };
        service.update_profile("user-1", &patch).await.unwrap();

        // The live orchestrator keeps the profile it was started with.
        let record = service.session_record(&start.session_id).await.unwrap();
        assert!(!record.is_sealed());
        service
            .submit_turn(&start.session_id, "checking in")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_discard_forgets_the_session() {
        let service = service(6);
        service.register_profile(profile("user-1", "Alex")).await;
        let start = service
            .start_session("user-1", &BTreeMap::new())
            .await
            .unwrap();
        service.end_session(&start.session_id).await.unwrap();

        service.discard_session(&start.session_id).await;
        assert_eq!(service.session_count().await, 0);
        let err = service
            .session_record(&start.session_id)
            .await
            .unwrap_err();
        assert!(err.is_unknown_session());
    }

    #[tokio::test]
    async fn test_same_seed_replays_same_focus_areas() {
        let mut intake = BTreeMap::new();
        intake.insert(Dimension::Anxiety, 8.0);

        let a = service(42);
        a.register_profile(profile("user-1", "Alex")).await;
        let b = service(42);
        b.register_profile(profile("user-1", "Alex")).await;

        let first = a.start_session("user-1", &intake).await.unwrap();
        let second = b.start_session("user-1", &intake).await.unwrap();
        assert_eq!(first.focus_areas, second.focus_areas);
        assert_eq!(first.greeting, second.greeting);
    }
}
