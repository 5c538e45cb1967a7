//! Token handling for Quire.
//!
//! Provides:
//! - [`Token`] — An opaque bearer token with redacted `Debug`
//! - [`Claims`] — The decoded token payload (role, tenant, expiry)
//! - [`TokenStore`] — Trait for persisting a token between runs
//! - [`FileTokenStore`] / [`MemoryTokenStore`] — Store implementations
//! - [`AuthError`] — Auth-specific error types

mod error;
mod store;
mod token;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use error::AuthError;
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use token::{Claims, Token};
