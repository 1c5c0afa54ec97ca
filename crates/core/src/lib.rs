//! Scan & Dine Core - Shared types library.
//!
//! This crate provides common types used across all Scan & Dine client
//! components:
//! - `client` - Session, cart, and API access services
//! - `cli` - Command-line surface for customer, staff, and admin flows
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no storage
//! access. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, money, emails, roles,
//!   order statuses, and the API response envelope

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
