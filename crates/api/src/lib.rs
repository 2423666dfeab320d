//! Proposal builder API server library.
//!
//! Exposes configuration, state, error handling, routes, and bootstrap
//! seeding so integration tests and the binary entrypoint share them.

pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod state;
