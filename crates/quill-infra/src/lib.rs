//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`.
//! This crate contains the object stores, session store and auth services.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `postgres` - PostgreSQL object store via SeaORM
//! - `auth` - JWT + Argon2 authentication

pub mod database;
pub mod session;

#[cfg(feature = "auth")]
pub mod auth;

// Re-exports - In-Memory
pub use database::InMemoryStore;
pub use session::InMemorySessionStore;

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
