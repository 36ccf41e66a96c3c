//! Corporate site API library.
//!
//! Serves two audiences from one router:
//! - `/api/admin/*`: the back-office console, behind JWT authentication
//! - `/api/*`: public submissions and the active catalogue
//!
//! Everything is exposed as a library so the binary stays thin and the
//! router can be exercised in tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;

pub use app::build_router;
