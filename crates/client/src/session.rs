//! Session management: login, registration, logout, identity bootstrap.
//!
//! The session manager owns exactly one authenticated identity (or none).
//! Token storage and the transparent refresh live in [`ApiClient`]; this
//! layer adds the identity invariant on top: identity is non-null if and
//! only if an access token was accepted by the server at least once since
//! the last logout.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument, warn};

use scan_dine_core::{Email, EmailError, Role, UserId};

use crate::api::auth::{AuthPayload, LoginRequest, RegisterRequest};
use crate::error::ApiError;
use crate::http::ApiClient;
use crate::storage::StorageError;

/// Errors surfaced by login and registration.
///
/// Expected authentication failures are values, not panics: the server's
/// message is carried verbatim when it sent one, and transport faults
/// collapse into the same result shape.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The email input failed local structural validation.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// The server rejected the attempt and said why.
    #[error("{0}")]
    Rejected(String),

    /// Login failed without a server-provided reason.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Registration failed without a server-provided reason.
    #[error("registration failed")]
    RegistrationFailed,

    /// The token pair could not be persisted.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// The authenticated identity as reported by the server.
///
/// The role is recorded exactly as the server states it and never computed
/// locally; role-gated surfaces compare against this value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Owns the access/refresh token pair and the current identity.
///
/// Cheap to clone; clones share identity state.
#[derive(Debug, Clone)]
pub struct SessionManager {
    client: ApiClient,
    identity: Arc<Mutex<Option<Identity>>>,
}

impl SessionManager {
    /// Create a session manager over an API client.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            identity: Arc::new(Mutex::new(None)),
        }
    }

    /// Log in with email and password.
    ///
    /// On success the token pair and identity are stored atomically and the
    /// identity is returned.
    ///
    /// # Errors
    ///
    /// Returns the server's message verbatim when it provided one, otherwise
    /// a generic invalid-credentials error. Transport faults produce the
    /// same error shape.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let email = Email::parse(email)?;
        let payload: AuthPayload = self
            .client
            .post(
                "/auth/login",
                &LoginRequest {
                    email: email.as_str(),
                    password,
                },
            )
            .await
            .map_err(|err| rejected_or(err, AuthError::InvalidCredentials))?;

        self.establish(payload)
    }

    /// Register a new account.
    ///
    /// Same persistence contract as [`login`](Self::login): a successful
    /// registration is immediately an authenticated session.
    ///
    /// # Errors
    ///
    /// Returns the server's message verbatim when it provided one, otherwise
    /// a generic registration-failed error.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<Identity, AuthError> {
        let email = Email::parse(email)?;
        let payload: AuthPayload = self
            .client
            .post(
                "/auth/register",
                &RegisterRequest {
                    name,
                    email: email.as_str(),
                    password,
                    role,
                },
            )
            .await
            .map_err(|err| rejected_or(err, AuthError::RegistrationFailed))?;

        self.establish(payload)
    }

    /// Clear both tokens and the identity.
    ///
    /// Idempotent and entirely client-local - no network effect.
    pub fn logout(&self) {
        self.client.clear_tokens();
        *self.lock() = None;
        debug!("session cleared");
    }

    /// Restore the identity after a process restart.
    ///
    /// When an access token is stored but no identity is loaded, fetch the
    /// profile. Any failure performs a full [`logout`](Self::logout): a
    /// stored token with a null identity must never persist.
    pub async fn bootstrap(&self) -> Option<Identity> {
        if let Some(current) = self.identity() {
            return Some(current);
        }
        self.client.access_token()?;

        match self.client.get::<Identity>("/auth/profile").await {
            Ok(user) => {
                *self.lock() = Some(user.clone());
                debug!(user = %user.id, "session restored from stored token");
                Some(user)
            }
            Err(err) => {
                warn!(error = %err, "profile fetch failed, discarding stored session");
                self.logout();
                None
            }
        }
    }

    /// The current identity, if authenticated.
    ///
    /// The HTTP layer tears the tokens down on a failed refresh; when that
    /// has happened, the in-memory identity is discarded here so the
    /// session never reports an identity without a token behind it.
    #[must_use]
    pub fn identity(&self) -> Option<Identity> {
        let mut guard = self.lock();
        if guard.is_some() && self.client.access_token().is_none() {
            debug!("stored tokens are gone, discarding identity");
            *guard = None;
        }
        guard.clone()
    }

    /// Whether an identity is currently established.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.identity().is_some()
    }

    /// Whether the current identity holds one of `roles`.
    ///
    /// Anonymous sessions hold no role at all.
    #[must_use]
    pub fn has_role(&self, roles: &[Role]) -> bool {
        self.identity()
            .is_some_and(|user| roles.contains(&user.role))
    }

    /// Store the token pair and identity from a successful auth exchange.
    fn establish(&self, payload: AuthPayload) -> Result<Identity, AuthError> {
        self.client
            .store_tokens(&payload.token, &payload.refresh_token)?;
        *self.lock() = Some(payload.user.clone());
        Ok(payload.user)
    }

    fn lock(&self) -> MutexGuard<'_, Option<Identity>> {
        self.identity.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Map an API failure to an auth error, preferring the server's own words.
fn rejected_or(err: ApiError, fallback: AuthError) -> AuthError {
    match err {
        ApiError::Api {
            message: Some(message),
            ..
        }
        | ApiError::Unauthorized {
            message: Some(message),
        } => AuthError::Rejected(message),
        _ => fallback,
    }
}
