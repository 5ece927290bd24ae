use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use tracing::{error, warn};

use noor_types::api::{DuaMessage, GetDuaRequest};

use crate::auth::AppState;

pub const MISSING_FEELING: &str = "Please select or describe your feeling.";
pub const NO_DUA_FOUND: &str = "Sorry, no dua found.";
pub const SERVER_ERROR: &str = "Server error. Please try again.";

/// POST /api/getDua — forward the caller's feeling to the completion API and
/// relay the first answer. Every upstream fault becomes the same 500 reply.
pub async fn get_dua(
    State(state): State<AppState>,
    payload: Result<Json<GetDuaRequest>, JsonRejection>,
) -> (StatusCode, Json<DuaMessage>) {
    let feeling = match payload {
        Ok(Json(GetDuaRequest { feeling: Some(feeling) })) if !feeling.trim().is_empty() => feeling,
        Ok(_) => {
            warn!("getDua called without a feeling");
            return reply(StatusCode::BAD_REQUEST, MISSING_FEELING);
        }
        Err(rejection) => {
            warn!("Rejected getDua body: {}", rejection);
            return reply(StatusCode::BAD_REQUEST, MISSING_FEELING);
        }
    };

    match state.completion.suggest_dua(&feeling).await {
        Ok(Some(text)) => reply(StatusCode::OK, text),
        Ok(None) => {
            warn!("Completion API returned no content for {:?}", feeling);
            reply(StatusCode::OK, NO_DUA_FOUND)
        }
        Err(e) => {
            error!("Completion API error: {}", e);
            reply(StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR)
        }
    }
}

fn reply(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<DuaMessage>) {
    (
        status,
        Json(DuaMessage {
            message: message.into(),
        }),
    )
}
