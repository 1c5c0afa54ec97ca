//! Integration tests for the Scan & Dine client.
//!
//! Every test runs against a `wiremock` mock of the ordering API plus a
//! temporary storage file, so the full stack under test is the real one:
//! storage, the HTTP client with its refresh-once policy, the session
//! manager, and the cart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p scan-dine-integration-tests
//! ```

use std::path::PathBuf;

use url::Url;
use wiremock::MockServer;

use scan_dine_client::{ApiClient, Cart, ClientConfig, SessionManager, Storage};

/// A mock API server plus a fresh storage file.
///
/// The temp directory is owned by the env; storage contents survive across
/// [`reopen`](Self::reopen) calls to simulate an application restart.
pub struct TestEnv {
    pub server: MockServer,
    dir: tempfile::TempDir,
}

impl TestEnv {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    fn storage_path(&self) -> PathBuf {
        self.dir.path().join("scan-dine.json")
    }

    fn config(&self) -> ClientConfig {
        ClientConfig::new(
            Url::parse(&self.server.uri()).expect("mock server uri"),
            self.storage_path(),
        )
    }

    /// Open the storage file backing this env.
    pub fn storage(&self) -> Storage {
        Storage::open(self.storage_path())
    }

    /// Build a client over the mock server and the env's storage.
    pub fn client(&self) -> ApiClient {
        ApiClient::new(&self.config(), self.storage()).expect("build client")
    }

    /// A session manager with no restored identity.
    pub fn session(&self) -> SessionManager {
        SessionManager::new(self.client())
    }

    /// A cart loaded from the env's storage.
    pub fn cart(&self) -> Cart {
        Cart::load(self.storage())
    }
}

/// A successful envelope body around `data`.
#[must_use]
pub fn ok_body(data: serde_json::Value) -> serde_json::Value {
    serde_json::json!({ "success": true, "data": data })
}

/// A failed envelope body with a message.
#[must_use]
pub fn fail_body(message: &str) -> serde_json::Value {
    serde_json::json!({ "success": false, "message": message })
}

/// A login/refresh payload with the given token pair.
#[must_use]
pub fn token_pair(access: &str, refresh: &str) -> serde_json::Value {
    serde_json::json!({
        "token": access,
        "refreshToken": refresh,
        "user": {
            "_id": "u1",
            "name": "Asha",
            "email": "asha@example.com",
            "role": "customer"
        }
    })
}
