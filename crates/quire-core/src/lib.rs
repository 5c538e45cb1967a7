//! Quire Core — shared types, traits, errors, and utilities.
//!
//! This crate provides the foundational types used across all Quire crates.
//! It has no internal Quire dependencies.
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`types`]: Notes, note ids, roles, and user notices
//! - [`traits`]: The [`ConfigManager`] trait
//! - [`util`]: Path utilities

pub mod error;
pub mod traits;
pub mod types;
pub mod util;

// Re-export key types at crate root for convenience
pub use error::{Error, Result};
pub use traits::ConfigManager;
pub use types::{Note, NoteId, Notice, NoticeLevel, Role};
