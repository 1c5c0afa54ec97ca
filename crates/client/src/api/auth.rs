//! Wire types for the authentication endpoints.
//!
//! The request/response shapes for `/auth/login`, `/auth/register`, and
//! `/auth/refresh`. The operations themselves live on
//! [`SessionManager`](crate::session::SessionManager); the refresh exchange
//! is driven from the HTTP client's retry path.

use serde::{Deserialize, Serialize};

use scan_dine_core::Role;

use crate::session::Identity;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RegisterRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub role: Role,
}

/// Payload of a successful login or registration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AuthPayload {
    pub token: String,
    pub refresh_token: String,
    pub user: Identity,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}

/// Payload of a successful refresh exchange: a complete new pair.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RefreshPayload {
    pub token: String,
    pub refresh_token: String,
}
