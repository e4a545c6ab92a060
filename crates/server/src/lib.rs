//! StorePulse server library.
//!
//! This crate provides the ingestion and sync service as a library,
//! allowing it to be tested and reused.
//!
//! # Architecture
//!
//! - [`shopify`] - Admin REST client, cursor pagination, raw record shapes
//! - [`sync`] - Reconciliation and orchestration (the pipeline core)
//! - [`db`] - Repositories over `PostgreSQL` (the only shared mutable state)
//! - [`routes`] - Axum handlers for sync triggers, webhooks, stores, metrics

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod routes;
pub mod shopify;
pub mod state;
pub mod sync;
