//! Scan & Dine client core.
//!
//! This crate owns the two stateful services of the table-ordering client -
//! the session manager (token pair, identity, transparent refresh) and the
//! cart aggregator (pending order, table binding, totals) - plus the typed
//! API access and polling utilities the rest of the application composes.
//!
//! # Architecture
//!
//! The composition root (the CLI, or any other surface) builds one
//! [`Storage`], one [`ApiClient`], one [`SessionManager`], and one [`Cart`]
//! per running application and hands them to whatever needs them. There are
//! no hidden singletons; single-instance semantics come from the composition
//! root owning the handles.
//!
//! # Modules
//!
//! - [`config`] - Environment-driven configuration
//! - [`storage`] - Durable client-local key-value storage
//! - [`http`] - The authenticated HTTP client with refresh-once semantics
//! - [`session`] - Login, registration, logout, identity bootstrap
//! - [`cart`] - The pending order with merge-on-add semantics
//! - [`api`] - Typed endpoint wrappers (auth, menu, tables, orders)
//! - [`poll`] - Cancellable repeating tasks bound to view lifetime

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod config;
pub mod error;
pub mod http;
pub mod poll;
pub mod session;
pub mod storage;

pub use cart::{Cart, CartError, CartLine, TableBinding};
pub use config::ClientConfig;
pub use error::{ApiError, Result};
pub use http::ApiClient;
pub use poll::PollHandle;
pub use session::{AuthError, Identity, SessionManager};
pub use storage::Storage;
