use serde::{Deserialize, Serialize};
use uuid::Uuid;

// -- JWT Claims --

/// Bearer token claims. Issued by the auth routes and decoded by the
/// request middleware; clients never need to inspect them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub display_name: String,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub username: String,
    pub display_name: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Returned by both register and login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub user_id: Uuid,
    pub username: String,
    pub display_name: String,
    pub token: String,
}

// -- Completion proxy --

/// Body of `POST /api/getDua`. The field is optional so that a missing
/// feeling is answered by the route itself rather than by the extractor.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct GetDuaRequest {
    #[serde(default)]
    pub feeling: Option<String>,
}

/// The only response shape of `POST /api/getDua`, success or failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuaMessage {
    pub message: String,
}

// -- Saved duas --

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SaveDuaRequest {
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_feeling_deserializes_as_none() {
        let req: GetDuaRequest = serde_json::from_str("{}").unwrap();
        assert!(req.feeling.is_none());

        let req: GetDuaRequest = serde_json::from_str(r#"{"feeling":"Sad"}"#).unwrap();
        assert_eq!(req.feeling.as_deref(), Some("Sad"));
    }

    #[test]
    fn save_request_rejects_unknown_fields() {
        let result = serde_json::from_str::<SaveDuaRequest>(r#"{"content":"x","userId":"y"}"#);
        assert!(result.is_err());
    }
}
