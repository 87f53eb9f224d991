#![allow(dead_code)]

//! Shared harness: every test gets its own server on a random port, backed
//! by the in-memory store.

use serde_json::{json, Value};
use std::net::TcpListener;

use chirpy::configuration::{ApplicationSettings, AuthSettings};
use chirpy::startup::run;
use chirpy::store::Repositories;

pub const TEST_JWT_SECRET: &str = "integration-test-secret";
pub const TEST_POLKA_KEY: &str = "f271c81ff7084ee5b99a5091b42d486e";

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
}

pub struct Session {
    pub user_id: String,
    pub token: String,
    pub refresh_token: String,
}

pub async fn spawn_app() -> TestApp {
    spawn_app_on_platform("dev").await
}

pub async fn spawn_app_on_platform(platform: &str) -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let application = ApplicationSettings {
        host: "127.0.0.1".to_string(),
        port,
        platform: platform.to_string(),
    };
    let auth = AuthSettings {
        jwt_secret: TEST_JWT_SECRET.to_string(),
        polka_key: TEST_POLKA_KEY.to_string(),
        access_token_expiry: 3600,
        refresh_token_expiry: 60 * 24 * 60 * 60,
        bcrypt_cost: 4,
    };

    let server = run(listener, Repositories::in_memory(), application, auth)
        .expect("Failed to bind address");
    let _ = tokio::spawn(server);

    TestApp {
        address,
        client: reqwest::Client::new(),
    }
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn post_user(&self, email: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/users"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_login(&self, email: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Register then log in, returning the session
    pub async fn signed_up(&self, email: &str, password: &str) -> Session {
        let response = self.post_user(email, password).await;
        assert_eq!(201, response.status().as_u16());

        let response = self.post_login(email, password).await;
        assert_eq!(200, response.status().as_u16());

        let body: Value = response.json().await.expect("Failed to parse response");
        Session {
            user_id: body["id"].as_str().unwrap().to_string(),
            token: body["token"].as_str().unwrap().to_string(),
            refresh_token: body["refresh_token"].as_str().unwrap().to_string(),
        }
    }

    pub async fn post_with_bearer(&self, path: &str, token: &str) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_chirp(&self, token: &str, body: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/chirps"))
            .header("Authorization", format!("Bearer {}", token))
            .json(&json!({ "body": body }))
            .send()
            .await
            .expect("Failed to execute request.")
    }
}
