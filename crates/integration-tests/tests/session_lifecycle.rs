//! Login, logout, and restart restoration through real storage.

use wiremock::matchers::{bearer_token, body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use scan_dine_client::AuthError;
use scan_dine_integration_tests::{TestEnv, fail_body, ok_body, token_pair};

#[tokio::test]
async fn login_persists_token_pair_and_identity() {
    let env = TestEnv::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(serde_json::json!({
            "email": "asha@example.com",
            "password": "hunter22"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(token_pair(
            "acc-1", "ref-1",
        ))))
        .expect(1)
        .mount(&env.server)
        .await;

    let session = env.session();
    let identity = session
        .login("asha@example.com", "hunter22")
        .await
        .expect("login succeeds");

    assert_eq!(identity.name, "Asha");
    assert!(session.is_authenticated());

    // Both halves of the pair are durable under the exact keys.
    let storage = env.storage();
    assert_eq!(storage.get::<String>("token").as_deref(), Some("acc-1"));
    assert_eq!(storage.get::<String>("refreshToken").as_deref(), Some("ref-1"));
}

#[tokio::test]
async fn bootstrap_restores_identity_after_restart() {
    let env = TestEnv::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(token_pair(
            "acc-1", "ref-1",
        ))))
        .mount(&env.server)
        .await;

    Mock::given(method("GET"))
        .and(path("/auth/profile"))
        .and(bearer_token("acc-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(serde_json::json!({
            "_id": "u1",
            "name": "Asha",
            "email": "asha@example.com",
            "role": "customer"
        }))))
        .expect(1)
        .mount(&env.server)
        .await;

    env.session()
        .login("asha@example.com", "hunter22")
        .await
        .expect("login succeeds");

    // A brand-new session over the same storage simulates a restart.
    let restarted = env.session();
    assert!(!restarted.is_authenticated());
    let identity = restarted.bootstrap().await.expect("identity restored");
    assert_eq!(identity.email, "asha@example.com");
    assert!(restarted.is_authenticated());
}

#[tokio::test]
async fn rejected_login_carries_server_message_and_stores_nothing() {
    let env = TestEnv::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(fail_body("Invalid credentials")))
        .expect(1)
        .mount(&env.server)
        .await;

    let session = env.session();
    let err = session
        .login("asha@example.com", "wrong")
        .await
        .expect_err("login fails");

    assert!(matches!(err, AuthError::Rejected(message) if message == "Invalid credentials"));
    assert!(!session.is_authenticated());
    assert_eq!(env.storage().get::<String>("token"), None);
}

#[tokio::test]
async fn failed_profile_fetch_discards_the_stored_token() {
    let env = TestEnv::start().await;

    // A token survived a restart, but the server no longer honors it.
    let storage = env.storage();
    storage.set("token", "acc-stale").expect("seed access token");
    storage
        .set("refreshToken", "ref-stale")
        .expect("seed refresh token");

    Mock::given(method("GET"))
        .and(path("/auth/profile"))
        .respond_with(ResponseTemplate::new(500).set_body_json(fail_body("Server error")))
        .expect(1)
        .mount(&env.server)
        .await;

    let session = env.session();
    assert!(session.bootstrap().await.is_none());

    // A stored token with a null identity never persists.
    assert!(!session.is_authenticated());
    assert_eq!(env.storage().get::<String>("token"), None);
    assert_eq!(env.storage().get::<String>("refreshToken"), None);
}

#[tokio::test]
async fn logout_clears_tokens_and_identity() {
    let env = TestEnv::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(token_pair(
            "acc-1", "ref-1",
        ))))
        .mount(&env.server)
        .await;

    let session = env.session();
    session
        .login("asha@example.com", "hunter22")
        .await
        .expect("login succeeds");

    session.logout();
    assert!(!session.is_authenticated());
    assert_eq!(env.storage().get::<String>("token"), None);
    assert_eq!(env.storage().get::<String>("refreshToken"), None);

    // Logging out twice is harmless.
    session.logout();
}
