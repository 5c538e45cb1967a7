//! # quire-cli
//!
//! Command-line client for multi-tenant SaaS notes.
//!
//! This crate provides:
//! - One-shot commands (login, whoami, notes, upgrade)
//! - An interactive shell over a single session
//! - Configuration file management

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod config_handlers;
pub mod error;
pub mod logging;
pub mod prompt;
pub mod shell;

pub use error::{Error, Result};
