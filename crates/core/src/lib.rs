//! StorePulse Core - Shared types library.
//!
//! This crate provides common types used across all StorePulse components:
//! - `server` - The ingestion and sync service
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and credentials, plus the
//!   sync ledger enums shared by the engine and the HTTP surface

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
