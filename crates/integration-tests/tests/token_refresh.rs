//! The refresh-once policy, exercised over the wire.

use wiremock::matchers::{bearer_token, body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use scan_dine_client::api::orders::{Order, OrdersApi};
use scan_dine_client::{ApiError, SessionManager};
use scan_dine_integration_tests::{TestEnv, fail_body, ok_body, token_pair};

fn seed_tokens(env: &TestEnv, access: &str, refresh: &str) {
    let storage = env.storage();
    storage.set("token", &access).expect("seed access token");
    storage.set("refreshToken", &refresh).expect("seed refresh token");
}

#[tokio::test]
async fn guest_unauthorized_passes_through_without_refresh() {
    let env = TestEnv::start().await;

    Mock::given(method("GET"))
        .and(path("/orders/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(fail_body("Not authorized")))
        .expect(1)
        .mount(&env.server)
        .await;

    // A refresh attempt here would be a bug: there is no session to renew.
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&env.server)
        .await;

    let orders = OrdersApi::new(env.client());
    let err = orders.mine().await.expect_err("unauthenticated");

    assert!(matches!(
        err,
        ApiError::Unauthorized { message: Some(message) } if message == "Not authorized"
    ));
}

#[tokio::test]
async fn expired_token_triggers_one_refresh_and_one_retry() {
    let env = TestEnv::start().await;
    seed_tokens(&env, "stale", "ref-1");

    Mock::given(method("GET"))
        .and(path("/orders/me"))
        .and(bearer_token("stale"))
        .respond_with(ResponseTemplate::new(401).set_body_json(fail_body("jwt expired")))
        .expect(1)
        .mount(&env.server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .and(body_json(serde_json::json!({ "refreshToken": "ref-1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(serde_json::json!({
            "token": "fresh",
            "refreshToken": "ref-2"
        }))))
        .expect(1)
        .mount(&env.server)
        .await;

    Mock::given(method("GET"))
        .and(path("/orders/me"))
        .and(bearer_token("fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(serde_json::json!([]))))
        .expect(1)
        .mount(&env.server)
        .await;

    let orders = OrdersApi::new(env.client());
    let mine: Vec<Order> = orders.mine().await.expect("retry succeeds");
    assert!(mine.is_empty());

    // The rotated pair replaced the stale one.
    let storage = env.storage();
    assert_eq!(storage.get::<String>("token").as_deref(), Some("fresh"));
    assert_eq!(storage.get::<String>("refreshToken").as_deref(), Some("ref-2"));
}

#[tokio::test]
async fn failed_refresh_tears_down_the_session() {
    let env = TestEnv::start().await;
    seed_tokens(&env, "stale", "ref-dead");

    Mock::given(method("GET"))
        .and(path("/orders/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(fail_body("jwt expired")))
        .expect(1)
        .mount(&env.server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(401).set_body_json(fail_body("refresh expired")))
        .expect(1)
        .mount(&env.server)
        .await;

    let orders = OrdersApi::new(env.client());
    let err = orders.mine().await.expect_err("session is gone");

    assert!(matches!(err, ApiError::SessionExpired));
    let storage = env.storage();
    assert_eq!(storage.get::<String>("token"), None);
    assert_eq!(storage.get::<String>("refreshToken"), None);
}

#[tokio::test]
async fn failed_refresh_also_discards_the_identity() {
    let env = TestEnv::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(token_pair(
            "acc-1", "ref-dead",
        ))))
        .mount(&env.server)
        .await;

    Mock::given(method("GET"))
        .and(path("/orders/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(fail_body("jwt expired")))
        .mount(&env.server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(401).set_body_json(fail_body("refresh expired")))
        .mount(&env.server)
        .await;

    // One client shared between the session and the API wrapper, as the
    // composition root wires it.
    let client = env.client();
    let session = SessionManager::new(client.clone());
    session
        .login("asha@example.com", "hunter22")
        .await
        .expect("login succeeds");
    assert!(session.is_authenticated());

    let orders = OrdersApi::new(client);
    let err = orders.mine().await.expect_err("session is gone");
    assert!(matches!(err, ApiError::SessionExpired));

    // The teardown reaches the identity too, not just the stored tokens.
    assert!(!session.is_authenticated());
    assert!(session.identity().is_none());
}

#[tokio::test]
async fn second_unauthorized_after_retry_is_not_retried_again() {
    let env = TestEnv::start().await;
    seed_tokens(&env, "stale", "ref-1");

    Mock::given(method("GET"))
        .and(path("/orders/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(fail_body("still no")))
        .expect(2)
        .mount(&env.server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(serde_json::json!({
            "token": "fresh",
            "refreshToken": "ref-2"
        }))))
        .expect(1)
        .mount(&env.server)
        .await;

    let orders = OrdersApi::new(env.client());
    let err = orders.mine().await.expect_err("second 401 surfaces");

    assert!(matches!(err, ApiError::Unauthorized { .. }));
}
