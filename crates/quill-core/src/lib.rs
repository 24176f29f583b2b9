//! # Quill Core
//!
//! The domain layer of the Quill blog platform.
//! This crate contains the authorization guards, tag normalization, search
//! filtering and the workflows that compose them over the store ports.
//! It has zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod guard;
pub mod ports;
pub mod principal;
pub mod search;
pub mod service;
pub mod tags;

pub use error::DomainError;
pub use principal::Principal;
