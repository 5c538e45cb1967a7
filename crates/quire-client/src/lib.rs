//! # quire-client
//!
//! Rust client library for the multi-tenant notes API.
//!
//! This crate provides:
//! - [`NotesApi`] — the login / list / create / delete / upgrade calls
//! - [`NotesClient`] — an async HTTP implementation over `reqwest`
//! - [`Session`] — signed-in state (token, role, notes, draft) driven by
//!   those calls, reporting user-facing [`Notice`](quire_core::Notice)s

#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod api;
pub mod client;
pub mod error;
pub mod session;

pub use api::NotesApi;
pub use client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, NotesClient};
pub use error::{Error, Result};
pub use session::Session;
