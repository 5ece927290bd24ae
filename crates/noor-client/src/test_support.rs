use chrono::{Duration, Utc};
use serde_json::{Value, json};
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::{ClientConfig, NoorClient, Principal};

pub(crate) const TOKEN: &str = "test-token";

pub(crate) async fn mock_login(server: &MockServer, user_id: Uuid) {
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user_id": user_id,
            "username": "amina",
            "display_name": "Amina",
            "token": TOKEN,
        })))
        .mount(server)
        .await;
}

/// Login for one named account, answered with its own token.
pub(crate) async fn mock_account(server: &MockServer, username: &str, user_id: Uuid, token: &str) {
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_partial_json(json!({ "username": username })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user_id": user_id,
            "username": username,
            "display_name": username,
            "token": token,
        })))
        .mount(server)
        .await;
}

/// `GET /api/duas` for the holder of `token`.
pub(crate) async fn mock_owner_list(server: &MockServer, token: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/api/duas"))
        .and(header("authorization", format!("Bearer {}", token).as_str()))
        .respond_with(response)
        .mount(server)
        .await;
}

/// A client pointed at `server` whose session already holds a principal.
pub(crate) async fn signed_in(server: &MockServer) -> (NoorClient, Principal) {
    mock_login(server, Uuid::new_v4()).await;
    let client = NoorClient::new(&ClientConfig::new(server.uri()));
    let principal = client.sign_in("amina", "password123").await.unwrap();
    (client, principal)
}

pub(crate) fn dua_json(id: Uuid, user_id: Uuid, content: &str) -> Value {
    json!({
        "id": id,
        "userId": user_id,
        "content": content,
        "createdAt": Utc::now(),
    })
}

/// `count` stored duas, newest first.
pub(crate) fn dua_list(user_id: Uuid, count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| {
            json!({
                "id": Uuid::new_v4(),
                "userId": user_id,
                "content": format!("dua {}", i),
                "createdAt": Utc::now() - Duration::minutes(i as i64),
            })
        })
        .collect()
}
