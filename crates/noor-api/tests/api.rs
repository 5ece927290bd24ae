//! End-to-end tests: the router is served on an ephemeral port, the
//! completion API is faked with wiremock.

use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use reqwest::StatusCode;
use serde_json::{Value, json};
use uuid::Uuid;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

use noor_api::auth::{AppStateInner, TOKEN_LIFETIME_DAYS};
use noor_api::proxy::{MISSING_FEELING, NO_DUA_FOUND, SERVER_ERROR};
use noor_completion::{CompletionClient, CompletionConfig};
use noor_db::Database;
use noor_types::api::{Claims, DuaMessage, SessionResponse};
use noor_types::models::SavedDua;

const ANXIOUS_DUA: &str = "Arabic text: اللَّهُمَّ إِنِّي أَعُوذُ بِكَ مِنَ الْهَمِّ وَالْحَزَنِ\n\
Bangla transliteration: আল্লাহুম্মা ইন্নি আউযুবিকা মিনাল হাম্মি ওয়াল হাযান\n\
English translation: O Allah, I seek refuge in You from anxiety and sorrow.\n\
Reference: Sahih al-Bukhari 6369";

async fn spawn_app(completion_endpoint: String) -> String {
    let mut config = CompletionConfig::new("test-key");
    config.endpoint = completion_endpoint;

    let state = Arc::new(AppStateInner {
        db: Database::open_in_memory().unwrap(),
        jwt_secret: "test-secret".into(),
        completion: CompletionClient::new(config).unwrap(),
    });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, noor_api::router(state)).await.unwrap();
    });

    format!("http://{}", addr)
}

async fn spawn_with_upstream(upstream: &MockServer) -> String {
    spawn_app(format!("{}/v1/chat/completions", upstream.uri())).await
}

async fn ask(base: &str, body: Value) -> (StatusCode, DuaMessage) {
    let res = reqwest::Client::new()
        .post(format!("{}/api/getDua", base))
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = res.status();
    (status, res.json().await.unwrap())
}

async fn register(base: &str, username: &str) -> SessionResponse {
    let res = reqwest::Client::new()
        .post(format!("{}/auth/register", base))
        .json(&json!({
            "username": username,
            "display_name": format!("{} display", username),
            "password": "correct horse battery",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    res.json().await.unwrap()
}

async fn save(base: &str, token: &str, content: &str) -> SavedDua {
    let res = reqwest::Client::new()
        .post(format!("{}/api/duas", base))
        .bearer_auth(token)
        .json(&json!({ "content": content }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    res.json().await.unwrap()
}

async fn list(base: &str, token: &str) -> Vec<SavedDua> {
    let res = reqwest::Client::new()
        .get(format!("{}/api/duas", base))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    res.json().await.unwrap()
}

// -- Completion proxy --

#[tokio::test]
async fn anxious_feeling_returns_all_four_sections() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": ANXIOUS_DUA}}]
        })))
        .expect(1)
        .mount(&upstream)
        .await;
    let base = spawn_with_upstream(&upstream).await;

    let (status, body) = ask(&base, json!({ "feeling": "Anxious" })).await;

    assert_eq!(status, StatusCode::OK);
    for section in noor_completion::prompt::DUA_SECTIONS {
        assert!(body.message.contains(section), "missing section {section}");
    }
}

#[tokio::test]
async fn upstream_error_status_becomes_fixed_500() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": {"message": "No auth"}})))
        .expect(1)
        .mount(&upstream)
        .await;
    let base = spawn_with_upstream(&upstream).await;

    let (status, body) = ask(&base, json!({ "feeling": "Tired" })).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body.message, SERVER_ERROR);
}

#[tokio::test]
async fn malformed_upstream_body_becomes_fixed_500() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&upstream)
        .await;
    let base = spawn_with_upstream(&upstream).await;

    let (status, body) = ask(&base, json!({ "feeling": "Lost" })).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body.message, SERVER_ERROR);
}

#[tokio::test]
async fn unreachable_upstream_becomes_fixed_500() {
    let base = spawn_app("http://127.0.0.1:1/v1/chat/completions".into()).await;

    let (status, body) = ask(&base, json!({ "feeling": "Scared" })).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body.message, SERVER_ERROR);
}

#[tokio::test]
async fn empty_completion_uses_fallback_message() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&upstream)
        .await;
    let base = spawn_with_upstream(&upstream).await;

    let (status, body) = ask(&base, json!({ "feeling": "Happy" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.message, NO_DUA_FOUND);
}

#[tokio::test]
async fn missing_feeling_is_rejected_without_upstream_call() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&upstream)
        .await;
    let base = spawn_with_upstream(&upstream).await;

    for body in [json!({}), json!({ "feeling": "   " }), json!({ "feeling": 42 })] {
        let (status, reply) = ask(&base, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(reply.message, MISSING_FEELING);
    }
}

// -- Auth --

#[tokio::test]
async fn register_login_and_me() {
    let base = spawn_app("http://127.0.0.1:1".into()).await;
    let client = reqwest::Client::new();

    let registered = register(&base, "fatima").await;
    assert_eq!(registered.display_name, "fatima display");

    let res = client
        .post(format!("{}/auth/login", base))
        .json(&json!({ "username": "fatima", "password": "correct horse battery" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let session: SessionResponse = res.json().await.unwrap();
    assert_eq!(session.user_id, registered.user_id);

    let me: Value = client
        .get(format!("{}/auth/me", base))
        .bearer_auth(&session.token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(me["display_name"], "fatima display");
    assert_eq!(me["id"], json!(registered.user_id));
    assert!(me["created_at"].is_string());
    assert!(me.get("password").is_none());
}

#[tokio::test]
async fn bad_credentials_and_duplicates_are_rejected() {
    let base = spawn_app("http://127.0.0.1:1".into()).await;
    let client = reqwest::Client::new();
    register(&base, "fatima").await;

    let res = client
        .post(format!("{}/auth/login", base))
        .json(&json!({ "username": "fatima", "password": "wrong password" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .post(format!("{}/auth/register", base))
        .json(&json!({ "username": "fatima", "display_name": "Again", "password": "another password" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = client
        .post(format!("{}/auth/register", base))
        .json(&json!({ "username": "zainab", "display_name": "Zainab", "password": "short" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

async fn try_register(base: &str, username: &str, display_name: &str) -> StatusCode {
    reqwest::Client::new()
        .post(format!("{}/auth/register", base))
        .json(&json!({
            "username": username,
            "display_name": display_name,
            "password": "correct horse battery",
        }))
        .send()
        .await
        .unwrap()
        .status()
}

async fn me_status(base: &str, authorization: &str) -> StatusCode {
    reqwest::Client::new()
        .get(format!("{}/auth/me", base))
        .header("authorization", authorization)
        .send()
        .await
        .unwrap()
        .status()
}

#[tokio::test]
async fn registration_field_limits() {
    let base = spawn_app("http://127.0.0.1:1".into()).await;

    assert_eq!(try_register(&base, "ab", "Ab").await, StatusCode::BAD_REQUEST);
    assert_eq!(try_register(&base, &"a".repeat(33), "Long").await, StatusCode::BAD_REQUEST);
    assert_eq!(try_register(&base, "idris", "").await, StatusCode::BAD_REQUEST);
    assert_eq!(try_register(&base, "idris", "   ").await, StatusCode::BAD_REQUEST);
    assert_eq!(try_register(&base, "idris", &"n".repeat(65)).await, StatusCode::BAD_REQUEST);

    assert_eq!(try_register(&base, "abc", "Abc").await, StatusCode::CREATED);
    assert_eq!(try_register(&base, &"b".repeat(32), &"n".repeat(64)).await, StatusCode::CREATED);
}

#[tokio::test]
async fn concurrent_duplicate_registration_yields_one_account() {
    let base = spawn_app("http://127.0.0.1:1".into()).await;

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let base = base.clone();
            tokio::spawn(async move { try_register(&base, "ibrahim", "Ibrahim").await })
        })
        .collect();

    let mut statuses = Vec::new();
    for handle in handles {
        statuses.push(handle.await.unwrap());
    }

    let created = statuses.iter().filter(|s| **s == StatusCode::CREATED).count();
    let conflicts = statuses.iter().filter(|s| **s == StatusCode::CONFLICT).count();
    assert_eq!((created, conflicts), (1, 7), "statuses: {:?}", statuses);
}

#[tokio::test]
async fn issued_token_lasts_thirty_days() {
    let base = spawn_app("http://127.0.0.1:1".into()).await;
    let session = register(&base, "hamza").await;

    let claims = decode::<Claims>(
        &session.token,
        &DecodingKey::from_secret(b"test-secret"),
        &Validation::default(),
    )
    .unwrap()
    .claims;

    let expected = (Utc::now() + Duration::days(TOKEN_LIFETIME_DAYS)).timestamp();
    assert!((claims.exp as i64 - expected).abs() < 60);
    assert_eq!(claims.sub, session.user_id);
}

#[tokio::test]
async fn me_rejects_bad_tokens() {
    let base = spawn_app("http://127.0.0.1:1".into()).await;
    let session = register(&base, "hamza").await;

    let expired = encode(
        &Header::default(),
        &Claims {
            sub: session.user_id,
            username: "hamza".into(),
            display_name: "hamza display".into(),
            exp: (Utc::now() - Duration::hours(1)).timestamp() as usize,
        },
        &EncodingKey::from_secret(b"test-secret"),
    )
    .unwrap();
    let forged = encode(
        &Header::default(),
        &Claims {
            sub: session.user_id,
            username: "hamza".into(),
            display_name: "hamza display".into(),
            exp: (Utc::now() + Duration::days(1)).timestamp() as usize,
        },
        &EncodingKey::from_secret(b"someone-else"),
    )
    .unwrap();

    assert_eq!(me_status(&base, "Bearer not.a.jwt").await, StatusCode::UNAUTHORIZED);
    assert_eq!(me_status(&base, &format!("Token {}", session.token)).await, StatusCode::UNAUTHORIZED);
    assert_eq!(me_status(&base, &format!("Bearer {}", expired)).await, StatusCode::UNAUTHORIZED);
    assert_eq!(me_status(&base, &format!("Bearer {}", forged)).await, StatusCode::UNAUTHORIZED);
    assert_eq!(me_status(&base, &format!("Bearer {}", session.token)).await, StatusCode::OK);
}

#[tokio::test]
async fn me_requires_an_existing_account() {
    let base = spawn_app("http://127.0.0.1:1".into()).await;

    let orphan = encode(
        &Header::default(),
        &Claims {
            sub: Uuid::new_v4(),
            username: "ghost".into(),
            display_name: "Ghost".into(),
            exp: (Utc::now() + Duration::days(1)).timestamp() as usize,
        },
        &EncodingKey::from_secret(b"test-secret"),
    )
    .unwrap();

    assert_eq!(me_status(&base, &format!("Bearer {}", orphan)).await, StatusCode::UNAUTHORIZED);
}

// -- Saved duas --

#[tokio::test]
async fn owner_reads_a_single_dua() {
    let base = spawn_app("http://127.0.0.1:1".into()).await;
    let session = register(&base, "yusuf").await;
    let saved = save(&base, &session.token, "Rabbana atina fid-dunya hasanah").await;

    let res = reqwest::Client::new()
        .get(format!("{}/api/duas/{}", base, saved.id))
        .bearer_auth(&session.token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let fetched: SavedDua = res.json().await.unwrap();
    assert_eq!(fetched, saved);
}

#[tokio::test]
async fn store_routes_require_a_token() {
    let base = spawn_app("http://127.0.0.1:1".into()).await;
    let client = reqwest::Client::new();

    let res = client.get(format!("{}/api/duas", base)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .post(format!("{}/api/duas", base))
        .bearer_auth("not-a-jwt")
        .json(&json!({ "content": "x" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn sequential_saves_are_distinct_and_newest_first() {
    let base = spawn_app("http://127.0.0.1:1".into()).await;
    let session = register(&base, "yusuf").await;

    let first = save(&base, &session.token, "first dua").await;
    let second = save(&base, &session.token, "second dua").await;
    assert_ne!(first.id, second.id);
    assert_eq!(first.user_id, session.user_id);

    let ids: Vec<_> = list(&base, &session.token).await.iter().map(|d| d.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);
}

#[tokio::test]
async fn deleted_dua_is_gone_from_reload() {
    let base = spawn_app("http://127.0.0.1:1".into()).await;
    let client = reqwest::Client::new();
    let session = register(&base, "yusuf").await;

    let kept = save(&base, &session.token, "keep").await;
    let dropped = save(&base, &session.token, "drop").await;

    let res = client
        .delete(format!("{}/api/duas/{}", base, dropped.id))
        .bearer_auth(&session.token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client
        .get(format!("{}/api/duas/{}", base, dropped.id))
        .bearer_auth(&session.token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let remaining = list(&base, &session.token).await;
    assert_eq!(remaining, vec![kept]);
}

#[tokio::test]
async fn principals_cannot_see_each_others_duas() {
    let base = spawn_app("http://127.0.0.1:1".into()).await;
    let client = reqwest::Client::new();
    let owner = register(&base, "maryam").await;
    let other = register(&base, "harun").await;

    let dua = save(&base, &owner.token, "private").await;

    assert!(list(&base, &other.token).await.is_empty());

    let res = client
        .get(format!("{}/api/duas/{}", base, dua.id))
        .bearer_auth(&other.token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .delete(format!("{}/api/duas/{}", base, dua.id))
        .bearer_auth(&other.token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    assert_eq!(list(&base, &owner.token).await.len(), 1);
}
