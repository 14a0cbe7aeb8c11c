//! `expensa-session` — the single boundary that owns session state.
//!
//! Caches the auth token, the normalized user and the selected company in a
//! key/value storage, and hands out snapshots. Permission checks in
//! `expensa-auth` take those snapshots as explicit arguments.

pub mod config;
pub mod manager;
pub mod storage;
pub mod token;

pub use config::SessionConfig;
pub use manager::{SessionError, SessionManager};
pub use storage::{MemoryStorage, SessionStorage};
pub use token::{SessionToken, TokenValidationError};
