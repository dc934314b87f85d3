use axum::extract::{Path, Query, State};
use axum::Json;

use crate::auth::UserId;
use crate::error::AppError;
use crate::state::AppState;
use kikaku_core::user::{search_users, UserRecord};

#[derive(serde::Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// GET /api/users/search?q= — email-prefix search for the share dialog.
pub async fn search(
    State(app): State<AppState>,
    UserId(_uid): UserId,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<UserRecord>>, AppError> {
    let root = app.root.clone();
    let users = tokio::task::spawn_blocking(move || search_users(&root, &query.q))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(users))
}

/// GET /api/users/:uid — directory entry for one user.
pub async fn get_user(
    State(app): State<AppState>,
    UserId(_uid): UserId,
    Path(uid): Path<String>,
) -> Result<Json<UserRecord>, AppError> {
    let root = app.root.clone();
    let user = tokio::task::spawn_blocking(move || UserRecord::load(&root, &uid))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(user))
}

#[derive(serde::Deserialize)]
pub struct RegisterBody {
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// PUT /api/users/me — upsert the caller's own directory entry. Called after
/// sign-in so sharing can find the user by email.
pub async fn register(
    State(app): State<AppState>,
    UserId(uid): UserId,
    Json(body): Json<RegisterBody>,
) -> Result<Json<UserRecord>, AppError> {
    let root = app.root.clone();
    let user = tokio::task::spawn_blocking(move || {
        let user = UserRecord::new(uid, body.email, body.display_name);
        user.save(&root)?;
        Ok::<_, kikaku_core::KikakuError>(user)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(user))
}
