use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use noor_db::models::DuaRow;
use noor_types::api::{Claims, SaveDuaRequest};
use noor_types::models::SavedDua;

use crate::auth::{AppState, with_db};

/// POST /api/duas — persist a generated dua for the caller.
pub async fn save_dua(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<SaveDuaRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    if req.content.trim().is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let id = Uuid::new_v4().to_string();
    let owner = claims.sub.to_string();
    let row = with_db(&state, move |db| db.insert_dua(&id, &owner, &req.content)).await?;

    info!("Saved dua {} for {}", row.id, claims.username);

    Ok((StatusCode::CREATED, Json(saved_dua_from_row(row))))
}

/// GET /api/duas — the caller's duas, newest first.
pub async fn list_duas(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, StatusCode> {
    let owner = claims.sub.to_string();
    let rows = with_db(&state, move |db| db.list_duas_by_owner(&owner)).await?;

    let duas: Vec<SavedDua> = rows.into_iter().map(saved_dua_from_row).collect();
    Ok(Json(duas))
}

/// GET /api/duas/{id} — one dua, if the caller owns it.
pub async fn get_dua(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, StatusCode> {
    let (id, owner) = (id.to_string(), claims.sub.to_string());
    let row = with_db(&state, move |db| db.get_dua(&id, &owner))
        .await?
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(saved_dua_from_row(row)))
}

/// DELETE /api/duas/{id}
pub async fn delete_dua(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, StatusCode> {
    let (did, owner) = (id.to_string(), claims.sub.to_string());
    let deleted = with_db(&state, move |db| db.delete_dua(&did, &owner)).await?;

    if !deleted {
        return Err(StatusCode::NOT_FOUND);
    }

    info!("Deleted dua {} for {}", id, claims.username);
    Ok(StatusCode::NO_CONTENT)
}

fn saved_dua_from_row(row: DuaRow) -> SavedDua {
    SavedDua {
        id: row.id.parse().unwrap_or_else(|e| {
            warn!("Corrupt dua id '{}': {}", row.id, e);
            Uuid::default()
        }),
        user_id: row.user_id.parse().unwrap_or_else(|e| {
            warn!("Corrupt user_id '{}' on dua '{}': {}", row.user_id, row.id, e);
            Uuid::default()
        }),
        created_at: row.created_at.parse::<DateTime<Utc>>().unwrap_or_else(|e| {
            warn!("Corrupt created_at '{}' on dua '{}': {}", row.created_at, row.id, e);
            DateTime::default()
        }),
        content: row.content,
    }
}
