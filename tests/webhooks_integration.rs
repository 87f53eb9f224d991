mod common;

use common::{spawn_app, TEST_POLKA_KEY};
use serde_json::{json, Value};

async fn post_webhook(
    app: &common::TestApp,
    authorization: Option<String>,
    payload: Value,
) -> reqwest::Response {
    let mut request = app.client.post(app.url("/api/polka/webhooks")).json(&payload);
    if let Some(value) = authorization {
        request = request.header("Authorization", value);
    }
    request.send().await.expect("Failed to execute request.")
}

async fn login_body(app: &common::TestApp, email: &str) -> Value {
    app.post_login(email, "correctPW!").await.json().await.unwrap()
}

#[tokio::test]
async fn upgrade_webhook_marks_user_red() {
    let app = spawn_app().await;
    let session = app.signed_up("lydia@example.com", "correctPW!").await;

    let response = post_webhook(
        &app,
        Some(format!("ApiKey {}", TEST_POLKA_KEY)),
        json!({ "event": "user.upgraded", "data": { "user_id": session.user_id } }),
    )
    .await;
    assert_eq!(204, response.status().as_u16());

    assert_eq!(login_body(&app, "lydia@example.com").await["is_chirpy_red"], true);
}

#[tokio::test]
async fn webhook_rejects_bad_api_key() {
    let app = spawn_app().await;
    let session = app.signed_up("todd@example.com", "correctPW!").await;
    let payload = json!({ "event": "user.upgraded", "data": { "user_id": session.user_id } });

    let cases = vec![
        (None, "missing header"),
        (Some("ApiKey wrong".to_string()), "wrong key"),
        (Some(format!("Bearer {}", TEST_POLKA_KEY)), "wrong scheme"),
    ];

    for (authorization, description) in cases {
        let response = post_webhook(&app, authorization, payload.clone()).await;
        assert_eq!(401, response.status().as_u16(), "Accepted {}", description);
    }

    assert_eq!(login_body(&app, "todd@example.com").await["is_chirpy_red"], false);
}

#[tokio::test]
async fn webhook_ignores_other_events() {
    let app = spawn_app().await;
    let session = app.signed_up("badger@example.com", "correctPW!").await;

    let response = post_webhook(
        &app,
        Some(format!("ApiKey {}", TEST_POLKA_KEY)),
        json!({ "event": "user.payment_failed", "data": { "user_id": session.user_id } }),
    )
    .await;
    assert_eq!(204, response.status().as_u16());

    assert_eq!(login_body(&app, "badger@example.com").await["is_chirpy_red"], false);
}

#[tokio::test]
async fn webhook_for_unknown_user_returns_404() {
    let app = spawn_app().await;

    let response = post_webhook(
        &app,
        Some(format!("ApiKey {}", TEST_POLKA_KEY)),
        json!({ "event": "user.upgraded", "data": { "user_id": uuid::Uuid::new_v4() } }),
    )
    .await;
    assert_eq!(404, response.status().as_u16());
}
