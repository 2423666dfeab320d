//! Domain rules for the proposal backend.
//!
//! This crate has no database or HTTP dependencies so the rules can be unit
//! tested in isolation and shared by the repository and API layers.

pub mod accounts;
pub mod error;
pub mod form_structure;
pub mod service_catalog;
pub mod templates;
pub mod types;
