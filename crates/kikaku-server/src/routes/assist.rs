use axum::extract::State;
use axum::Json;

use crate::auth::UserId;
use crate::error::AppError;
use crate::state::AppState;

fn no_assist() -> AppError {
    AppError::unavailable("assist client not configured")
}

#[derive(serde::Deserialize)]
pub struct AssociateBody {
    pub word: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub used: Vec<String>,
}

/// POST /api/assist/word — one associated word for the mind-map step.
pub async fn associate_word(
    State(app): State<AppState>,
    UserId(_uid): UserId,
    Json(body): Json<AssociateBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    if body.word.is_empty() {
        return Err(AppError::bad_request("a word is required"));
    }
    let client = app.assist.as_ref().ok_or_else(no_assist)?;
    let word = client
        .associate_word(&body.word, &body.genre, &body.used)
        .await?;
    Ok(Json(serde_json::json!({ "word": word })))
}

#[derive(serde::Deserialize)]
pub struct ConceptsBody {
    pub keywords: Vec<String>,
}

/// POST /api/assist/concepts — exactly three concept candidates for the
/// concept step.
pub async fn generate_concepts(
    State(app): State<AppState>,
    UserId(_uid): UserId,
    Json(body): Json<ConceptsBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    if body.keywords.is_empty() {
        return Err(AppError::bad_request("at least one keyword is required"));
    }
    let client = app.assist.as_ref().ok_or_else(no_assist)?;
    let concepts = client.generate_concepts(&body.keywords).await?;
    Ok(Json(serde_json::json!({ "concepts": concepts })))
}
