//! Utility modules.
//!
//! - [`paths`]: Path helpers (tilde expansion, per-user data directory)

pub mod paths;
