use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Header carrying the caller's identity-provider uid. Credential checking
/// happens upstream (the provider's SDK in front of this API); the server
/// only needs the resolved uid.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Extractor for the authenticated caller.
///
/// Missing header → 401; a uid that is not a safe path segment → 400.
#[derive(Debug, Clone)]
pub struct UserId(pub String);

impl<S> FromRequestParts<S> for UserId
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
        else {
            let body = serde_json::json!({ "error": "unauthorized: missing x-user-id header" });
            return Err((StatusCode::UNAUTHORIZED, axum::Json(body)).into_response());
        };

        if kikaku_core::paths::validate_user_id(value).is_err() {
            let body = serde_json::json!({ "error": format!("invalid user id: {value}") });
            return Err((StatusCode::BAD_REQUEST, axum::Json(body)).into_response());
        }

        Ok(UserId(value.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
