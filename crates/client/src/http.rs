//! The authenticated HTTP client for the ordering API.
//!
//! Wraps `reqwest` with the three cross-cutting behaviors every endpoint
//! shares:
//!
//! - bearer decoration: `Authorization: Bearer <token>` is attached if and
//!   only if an access token is currently stored, so guest flows proceed
//!   unauthenticated instead of failing;
//! - envelope unwrapping: every response is `{ success, data?, message? }`;
//! - transparent refresh: a 401 on an authenticated request triggers exactly
//!   one refresh exchange and one retry, tracked by an explicit `retried`
//!   flag rather than by mutating the request.
//!
//! Concurrent requests that each hit a 401 may each attempt a refresh; the
//! last successful exchange wins, which is an acceptable (idempotent)
//! outcome. Refreshes are intentionally not serialized across requests.

use std::sync::Arc;

use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use scan_dine_core::ApiEnvelope;

use crate::api::auth::{RefreshPayload, RefreshRequest};
use crate::config::ClientConfig;
use crate::error::{ApiError, Result};
use crate::storage::{Storage, StorageError, keys};

/// Client for the Scan & Dine ordering API.
///
/// Cheap to clone; clones share the connection pool and token state.
#[derive(Debug, Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

#[derive(Debug)]
struct ApiClientInner {
    http: reqwest::Client,
    base_url: Url,
    storage: Storage,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &ClientConfig, storage: Storage) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http,
                base_url: config.api_url.clone(),
                storage,
            }),
        })
    }

    // =========================================================================
    // Token state
    // =========================================================================

    /// The currently stored access token, if any.
    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.inner.storage.get(keys::ACCESS_TOKEN)
    }

    /// Persist a new token pair in a single storage flush.
    pub(crate) fn store_tokens(
        &self,
        access: &str,
        refresh: &str,
    ) -> std::result::Result<(), StorageError> {
        self.inner.storage.set_many(vec![
            (
                keys::ACCESS_TOKEN.to_owned(),
                serde_json::Value::String(access.to_owned()),
            ),
            (
                keys::REFRESH_TOKEN.to_owned(),
                serde_json::Value::String(refresh.to_owned()),
            ),
        ])
    }

    /// Drop both tokens. Clearing an already-clear store is a no-op.
    pub(crate) fn clear_tokens(&self) {
        if let Err(err) = self
            .inner
            .storage
            .remove_many(&[keys::ACCESS_TOKEN, keys::REFRESH_TOKEN])
        {
            warn!(error = %err, "failed to clear stored tokens");
        }
    }

    // =========================================================================
    // Request methods
    // =========================================================================

    /// `GET` a payload.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request::<(), T>(Method::GET, path, &[], None).await
    }

    /// `GET` a payload with query parameters.
    pub async fn get_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        self.request::<(), T>(Method::GET, path, query, None).await
    }

    /// `POST` a JSON body and decode the payload.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(Method::POST, path, &[], Some(body)).await
    }

    /// `PUT` a JSON body and decode the payload.
    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(Method::PUT, path, &[], Some(body)).await
    }

    /// `PATCH` a JSON body and decode the payload.
    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(Method::PATCH, path, &[], Some(body)).await
    }

    /// `DELETE` a resource, ignoring any payload in the response.
    pub async fn delete(&self, path: &str) -> Result<()> {
        self.exchange::<(), serde_json::Value>(Method::DELETE, path, &[], None)
            .await
            .map(|_| ())
    }

    // =========================================================================
    // Core send path
    // =========================================================================

    async fn request<B, T>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let envelope = self.exchange(method, path, query, body).await?;
        envelope.data.ok_or_else(|| ApiError::Api {
            status: 200,
            message: Some("response carried no data".to_string()),
        })
    }

    /// Send the request, unwrapping the envelope and applying the
    /// refresh-once policy.
    async fn exchange<B, T>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<ApiEnvelope<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        // The retried flag enforces the at-most-one-retry invariant
        // structurally; 401s after the retry fall through unconditionally.
        let mut retried = false;
        loop {
            // Re-read per attempt so the retry picks up the refreshed token.
            let token = self.access_token();
            let authenticated = token.is_some();

            let mut builder = self
                .inner
                .http
                .request(method.clone(), self.endpoint(path));
            if !query.is_empty() {
                builder = builder.query(query);
            }
            if let Some(token) = token {
                builder = builder.bearer_auth(token);
            }
            if let Some(body) = body {
                builder = builder.json(body);
            }

            let response = builder.send().await?;
            let status = response.status();
            let text = response.text().await?;

            if status == StatusCode::UNAUTHORIZED {
                if authenticated && !retried {
                    self.refresh_tokens().await?;
                    retried = true;
                    debug!(path, "access token refreshed, retrying request once");
                    continue;
                }
                // Guest requests and already-retried requests pass the
                // failure through unchanged - never a redirect signal.
                return Err(ApiError::Unauthorized {
                    message: extract_message(&text),
                });
            }

            if !status.is_success() {
                warn!(status = status.as_u16(), path, "api request failed");
                return Err(ApiError::Api {
                    status: status.as_u16(),
                    message: extract_message(&text),
                });
            }

            let envelope: ApiEnvelope<T> = serde_json::from_str(&text)?;
            if !envelope.success {
                return Err(ApiError::Api {
                    status: status.as_u16(),
                    message: envelope.message,
                });
            }
            return Ok(envelope);
        }
    }

    /// Exchange the refresh token for a new pair.
    ///
    /// Any failure here tears the session down: both tokens are cleared and
    /// the caller receives `SessionExpired`. This only ever runs for
    /// requests that carried a token, so guests are never torn down.
    async fn refresh_tokens(&self) -> Result<()> {
        let Some(refresh_token) = self.inner.storage.get::<String>(keys::REFRESH_TOKEN) else {
            warn!("401 with no refresh token on hand, clearing session");
            self.clear_tokens();
            return Err(ApiError::SessionExpired);
        };

        match self.exchange_refresh(&refresh_token).await {
            Ok(pair) => {
                self.store_tokens(&pair.token, &pair.refresh_token)?;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "token refresh failed, clearing session");
                self.clear_tokens();
                Err(ApiError::SessionExpired)
            }
        }
    }

    /// The raw refresh call: no bearer header, no envelope-level retry.
    async fn exchange_refresh(&self, refresh_token: &str) -> Result<RefreshPayload> {
        let response = self
            .inner
            .http
            .post(self.endpoint("/auth/refresh"))
            .json(&RefreshRequest { refresh_token })
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: extract_message(&text),
            });
        }

        let envelope: ApiEnvelope<RefreshPayload> = serde_json::from_str(&text)?;
        if !envelope.success {
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: envelope.message,
            });
        }
        envelope.data.ok_or_else(|| ApiError::Api {
            status: status.as_u16(),
            message: Some("refresh response carried no data".to_string()),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}{path}",
            self.inner.base_url.as_str().trim_end_matches('/')
        )
    }
}

/// Best-effort extraction of the envelope message from an error body.
fn extract_message(body: &str) -> Option<String> {
    serde_json::from_str::<ApiEnvelope<serde_json::Value>>(body)
        .ok()
        .and_then(|envelope| envelope.message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_message_reads_envelope() {
        assert_eq!(
            extract_message(r#"{"success":false,"message":"Invalid credentials"}"#).as_deref(),
            Some("Invalid credentials")
        );
        assert_eq!(extract_message(r#"{"success":false}"#), None);
        assert_eq!(extract_message("<html>gateway error</html>"), None);
    }

    #[test]
    fn test_endpoint_joins_without_duplicate_slash() {
        let config = ClientConfig::new(
            Url::parse("http://localhost:5000/api/").expect("valid url"),
            "unused.json",
        );
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = Storage::open(dir.path().join("state.json"));
        let client = ApiClient::new(&config, storage).expect("client");
        assert_eq!(
            client.endpoint("/auth/login"),
            "http://localhost:5000/api/auth/login"
        );
    }
}
