//! Corpsite Core - Shared types library.
//!
//! This crate provides common types used across the corpsite components:
//! - `api` - HTTP API for the public site and the admin console
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no database
//! access, no HTTP. Enable the `postgres` feature to get `sqlx` encoding for
//! IDs, emails and status enums.
//!
//! # Modules
//!
//! - [`types`] - Typed IDs, normalised emails, status enums and pagination

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
