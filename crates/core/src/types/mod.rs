//! Core types for Scan & Dine.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod envelope;
pub mod id;
pub mod money;
pub mod status;

pub use email::{Email, EmailError};
pub use envelope::ApiEnvelope;
pub use id::*;
pub use money::{Money, Totals, tax_rate};
pub use status::*;
