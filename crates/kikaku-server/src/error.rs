use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use gpt_assist::AssistError;
use kikaku_core::error::KikakuError;

// ---------------------------------------------------------------------------
// Internal sentinel for explicit 400 Bad Request errors
// ---------------------------------------------------------------------------

/// Private sentinel error type used to carry an explicit HTTP 400 through
/// the `anyhow::Error` chain without touching the `KikakuError` enum.
#[derive(Debug)]
struct BadRequestError(String);

impl std::fmt::Display for BadRequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for BadRequestError {}

/// Private sentinel error type used to carry an explicit HTTP 503 through
/// the `anyhow::Error` chain, for routes whose backing service is absent.
#[derive(Debug)]
struct UnavailableError(String);

impl std::fmt::Display for UnavailableError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for UnavailableError {}

// ---------------------------------------------------------------------------
// AppError — unified error type for HTTP responses
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    /// Construct a 400 Bad Request error with the given message.
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(BadRequestError(msg.into()).into())
    }

    /// Construct a 503 Service Unavailable error.
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self(UnavailableError(msg.into()).into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Some(b) = self.0.downcast_ref::<BadRequestError>() {
            let body = serde_json::json!({ "error": b.0.clone() });
            return (StatusCode::BAD_REQUEST, axum::Json(body)).into_response();
        }
        if let Some(u) = self.0.downcast_ref::<UnavailableError>() {
            let body = serde_json::json!({ "error": u.0.clone() });
            return (StatusCode::SERVICE_UNAVAILABLE, axum::Json(body)).into_response();
        }

        let status = if let Some(e) = self.0.downcast_ref::<KikakuError>() {
            match e {
                KikakuError::ProjectNotFound(_) | KikakuError::UserNotFound(_) => {
                    StatusCode::NOT_FOUND
                }
                KikakuError::ProjectExists(_) | KikakuError::AlreadyShared(_) => {
                    StatusCode::CONFLICT
                }
                KikakuError::InvalidProjectId(_)
                | KikakuError::InvalidUserId(_)
                | KikakuError::UnknownStep(_)
                | KikakuError::EmptyProjectName
                | KikakuError::ShareWithOwner => StatusCode::BAD_REQUEST,
                KikakuError::AccessDenied { .. } => StatusCode::FORBIDDEN,
                KikakuError::Io(_) | KikakuError::Yaml(_) | KikakuError::Json(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            }
        } else if let Some(e) = self.0.downcast_ref::<AssistError>() {
            match e {
                // The text service is down or misbehaving, not us.
                AssistError::Http(_)
                | AssistError::Api { .. }
                | AssistError::EmptyCompletion
                | AssistError::MalformedConcepts(_) => StatusCode::BAD_GATEWAY,
                AssistError::MissingApiKey(_) => StatusCode::SERVICE_UNAVAILABLE,
            }
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        if status.is_server_error() {
            tracing::warn!(error = %self.0, "request failed");
        }

        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
