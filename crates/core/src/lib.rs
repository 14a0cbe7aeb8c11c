//! `expensa-core` — shared identifiers and the domain error model.
//!
//! This crate contains **pure domain** primitives (no session or transport concerns).

pub mod error;
pub mod id;

pub use error::DomainError;
pub use id::{CompanyId, UserId};
