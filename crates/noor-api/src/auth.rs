use std::sync::Arc;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::{SaltString, rand_core::OsRng}};
use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::{DateTime, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use tracing::{error, info, warn};
use uuid::Uuid;

use noor_completion::CompletionClient;
use noor_db::Database;
use noor_types::api::{Claims, LoginRequest, RegisterRequest, SessionResponse};
use noor_types::models::User;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub jwt_secret: String,
    pub completion: CompletionClient,
}

/// Run a blocking DB call off the async runtime, logging and collapsing
/// every failure to a 500.
pub(crate) async fn with_db<F, T>(state: &AppState, f: F) -> Result<T, StatusCode>
where
    F: FnOnce(&Database) -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || f(&state.db))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .map_err(|e| {
            error!("DB error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    // Validate input
    if req.username.len() < 3 || req.username.len() > 32 {
        return Err(StatusCode::BAD_REQUEST);
    }
    if req.password.len() < 8 {
        return Err(StatusCode::BAD_REQUEST);
    }
    let display_name = req.display_name.trim().to_string();
    if display_name.is_empty() || display_name.chars().count() > 64 {
        return Err(StatusCode::BAD_REQUEST);
    }

    // Check if username is taken
    let username = req.username.clone();
    if with_db(&state, move |db| db.get_user_by_username(&username))
        .await?
        .is_some()
    {
        return Err(StatusCode::CONFLICT);
    }

    // Hash password with Argon2id
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(req.password.as_bytes(), &salt)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .to_string();

    let user_id = Uuid::new_v4();

    // The lookup above can race another registration; the UNIQUE index decides.
    let (uid, username, name) = (user_id.to_string(), req.username.clone(), display_name.clone());
    if !with_db(&state, move |db| db.create_user(&uid, &username, &name, &password_hash)).await? {
        return Err(StatusCode::CONFLICT);
    }

    let token = create_token(&state.jwt_secret, user_id, &req.username, &display_name)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    info!("Registered user {}", req.username);

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            user_id,
            username: req.username,
            display_name,
            token,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let username = req.username.clone();
    let user = with_db(&state, move |db| db.get_user_by_username(&username))
        .await?
        .ok_or(StatusCode::UNAUTHORIZED)?;

    // Verify password
    let parsed_hash =
        PasswordHash::new(&user.password).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    let user_id: Uuid = user.id.parse().map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let token = create_token(&state.jwt_secret, user_id, &user.username, &user.display_name)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(SessionResponse {
        user_id,
        username: user.username,
        display_name: user.display_name,
        token,
    }))
}

/// GET /auth/me: the account behind the bearer token. A token whose account
/// no longer exists is treated as unauthenticated.
pub async fn me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<User>, StatusCode> {
    let user_id = claims.sub.to_string();
    let row = with_db(&state, move |db| db.get_user_by_id(&user_id))
        .await?
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let created_at = row.created_at.parse::<DateTime<Utc>>().unwrap_or_else(|e| {
        warn!("Corrupt created_at '{}' on user '{}': {}", row.created_at, row.id, e);
        DateTime::default()
    });

    Ok(Json(User {
        id: claims.sub,
        username: row.username,
        display_name: row.display_name,
        created_at,
    }))
}

pub const TOKEN_LIFETIME_DAYS: i64 = 30;

fn create_token(
    secret: &str,
    user_id: Uuid,
    username: &str,
    display_name: &str,
) -> anyhow::Result<String> {
    let claims = Claims {
        sub: user_id,
        username: username.to_string(),
        display_name: display_name.to_string(),
        exp: (Utc::now() + chrono::Duration::days(TOKEN_LIFETIME_DAYS)).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}
