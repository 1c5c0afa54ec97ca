//! Typed wrappers over the ordering API, one module per resource.

pub mod auth;
pub mod menu;
pub mod orders;
pub mod tables;
