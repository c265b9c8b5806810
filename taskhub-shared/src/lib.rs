//! # TaskHub Shared Library
//!
//! This crate contains the data layer and business logic used by the
//! TaskHub API server.
//!
//! ## Module Organization
//!
//! - `db`: Database context, connection pool and schema synchronization
//! - `models`: Database models and their queries
//! - `validation`: Input normalization and validation helpers
//! - `services`: Task and user services (validation + persistence)
//! - `realtime`: Channel registry and event relay for connected clients

pub mod db;
pub mod models;
pub mod realtime;
pub mod services;
pub mod validation;

/// Current version of the TaskHub shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
