mod common;

use common::{spawn_app, spawn_app_on_platform};
use serde_json::Value;

#[tokio::test]
async fn static_hits_are_counted_and_reset() {
    let app = spawn_app().await;

    for _ in 0..3 {
        let response = app.client.get(app.url("/app/")).send().await.unwrap();
        assert_eq!(200, response.status().as_u16());
    }
    // API traffic does not count
    app.client.get(app.url("/api/healthz")).send().await.unwrap();

    let metrics: Value = app
        .client
        .get(app.url("/admin/metrics"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(metrics["hits"], 3);

    let response = app.client.post(app.url("/admin/reset")).send().await.unwrap();
    assert_eq!(200, response.status().as_u16());

    let metrics: Value = app
        .client
        .get(app.url("/admin/metrics"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(metrics["hits"], 0);
}

#[tokio::test]
async fn reset_removes_users() {
    let app = spawn_app().await;
    app.signed_up("gone@example.com", "correctPW!").await;

    let response = app.client.post(app.url("/admin/reset")).send().await.unwrap();
    assert_eq!(200, response.status().as_u16());

    assert_eq!(401, app.post_login("gone@example.com", "correctPW!").await.status().as_u16());
    assert_eq!(201, app.post_user("gone@example.com", "correctPW!").await.status().as_u16());
}

#[tokio::test]
async fn reset_is_forbidden_outside_dev() {
    let app = spawn_app_on_platform("prod").await;
    app.signed_up("kept@example.com", "correctPW!").await;

    let response = app.client.post(app.url("/admin/reset")).send().await.unwrap();
    assert_eq!(403, response.status().as_u16());

    assert_eq!(200, app.post_login("kept@example.com", "correctPW!").await.status().as_u16());
}
