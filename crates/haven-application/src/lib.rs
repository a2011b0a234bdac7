//! Application layer for Haven.
//!
//! This crate hosts the multi-session service that coordinates domain
//! orchestrators from `haven-core`: one `SessionOrchestrator` per live
//! session, a profile store, and the registry that keeps them addressable
//! by id.

pub mod registry;
pub mod session_service;

pub use registry::SessionRegistry;
pub use session_service::SessionService;
