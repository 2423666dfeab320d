pub mod auth;
pub mod form_structure;
pub mod proposals;
pub mod services;
pub mod templates;
pub mod users;
