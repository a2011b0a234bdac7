use haven_core::session::SessionOrchestrator;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// In-memory registry of live session orchestrators.
///
/// Each orchestrator sits behind its own `Mutex`, so turns for one session
/// are serialized in arrival order while separate sessions proceed
/// concurrently. The registry itself only maps session ids to orchestrators.
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<String, Arc<Mutex<SessionOrchestrator>>>>>,
}

impl SessionRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Gets a registered orchestrator by session id.
    ///
    /// Returns `Some(orchestrator)` if the session is registered, `None`
    /// otherwise.
    pub async fn get(&self, session_id: &str) -> Option<Arc<Mutex<SessionOrchestrator>>> {
        let sessions = self.sessions.read().await;
        sessions.get(session_id).cloned()
    }

    /// Registers an orchestrator under a session id.
    pub async fn insert(&self, session_id: String, orchestrator: Arc<Mutex<SessionOrchestrator>>) {
        let mut sessions = self.sessions.write().await;
        sessions.insert(session_id, orchestrator);
    }

    /// Removes an orchestrator from the registry.
    pub async fn remove(&self, session_id: &str) {
        let mut sessions = self.sessions.write().await;
        sessions.remove(session_id);
    }

    /// Number of registered sessions.
    pub async fn len(&self) -> usize {
        let sessions = self.sessions.read().await;
        sessions.len()
    }

    /// Whether the registry holds no sessions.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Clears all registered sessions.
    pub async fn clear(&self) {
        let mut sessions = self.sessions.write().await;
        sessions.clear();
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
