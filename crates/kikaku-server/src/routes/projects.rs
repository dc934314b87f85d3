use axum::extract::{Path, State};
use axum::Json;

use crate::auth::UserId;
use crate::error::AppError;
use crate::state::AppState;
use kikaku_core::project::Project;

/// GET /api/projects — list projects visible to the caller.
pub async fn list_projects(
    State(app): State<AppState>,
    UserId(uid): UserId,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let projects = Project::list_for_user(&root, &uid)?;
        let list: Vec<serde_json::Value> = projects
            .iter()
            .map(|p| {
                serde_json::json!({
                    "id": p.id,
                    "name": p.name,
                    "owner": p.user_id,
                    "shared_with": p.shared_with,
                    "current_step": p.status.current_step,
                    "progress_percent": p.status.progress_percent(),
                    "created_at": p.created_at,
                    "updated_at": p.updated_at,
                })
            })
            .collect();
        Ok::<_, kikaku_core::KikakuError>(serde_json::json!(list))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

#[derive(serde::Deserialize)]
pub struct CreateProjectBody {
    pub name: String,
}

/// POST /api/projects — create an empty project owned by the caller.
pub async fn create_project(
    State(app): State<AppState>,
    UserId(uid): UserId,
    Json(body): Json<CreateProjectBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let p = Project::create(&root, &uid, body.name)?;
        Ok::<_, kikaku_core::KikakuError>(serde_json::json!({
            "id": p.id,
            "name": p.name,
            "owner": p.user_id,
            "created_at": p.created_at,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    app.notify();
    Ok(Json(result))
}

/// GET /api/projects/:id — full project detail.
pub async fn get_project(
    State(app): State<AppState>,
    UserId(uid): UserId,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let p = Project::load(&root, &id)?;
        p.ensure_member(&uid)?;
        Ok::<_, kikaku_core::KikakuError>(serde_json::json!({
            "id": p.id,
            "name": p.name,
            "owner": p.user_id,
            "shared_with": p.shared_with,
            "deleted_at": p.deleted_at,
            "state": p.state,
            "status": p.status,
            "progress_percent": p.status.progress_percent(),
            "created_at": p.created_at,
            "updated_at": p.updated_at,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

#[derive(serde::Deserialize)]
pub struct RenameBody {
    pub name: String,
}

/// PUT /api/projects/:id/name — rename a project.
pub async fn rename_project(
    State(app): State<AppState>,
    UserId(uid): UserId,
    Path(id): Path<String>,
    Json(body): Json<RenameBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let mut p = Project::load(&root, &id)?;
        p.ensure_member(&uid)?;
        p.rename(body.name)?;
        p.save(&root)?;
        Ok::<_, kikaku_core::KikakuError>(serde_json::json!({
            "id": p.id,
            "name": p.name,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    app.notify();
    Ok(Json(result))
}

/// DELETE /api/projects/:id — soft delete; owner only. The document stays on
/// disk and drops out of listings.
pub async fn delete_project(
    State(app): State<AppState>,
    UserId(uid): UserId,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let mut p = Project::load(&root, &id)?;
        p.ensure_owner(&uid)?;
        p.soft_delete();
        p.save(&root)?;
        Ok::<_, kikaku_core::KikakuError>(serde_json::json!({
            "id": p.id,
            "deleted_at": p.deleted_at,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    app.notify();
    Ok(Json(result))
}

#[derive(serde::Deserialize)]
pub struct ShareBody {
    pub user_id: String,
}

/// POST /api/projects/:id/share — grant another user access.
pub async fn share_project(
    State(app): State<AppState>,
    UserId(uid): UserId,
    Path(id): Path<String>,
    Json(body): Json<ShareBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let mut p = Project::load(&root, &id)?;
        p.ensure_member(&uid)?;
        p.share(&body.user_id)?;
        p.save(&root)?;
        Ok::<_, kikaku_core::KikakuError>(serde_json::json!({
            "id": p.id,
            "shared_with": p.shared_with,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    app.notify();
    Ok(Json(result))
}

/// POST /api/projects/:id/unshare — revoke access; idempotent.
pub async fn unshare_project(
    State(app): State<AppState>,
    UserId(uid): UserId,
    Path(id): Path<String>,
    Json(body): Json<ShareBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let mut p = Project::load(&root, &id)?;
        p.ensure_member(&uid)?;
        p.unshare(&body.user_id);
        p.save(&root)?;
        Ok::<_, kikaku_core::KikakuError>(serde_json::json!({
            "id": p.id,
            "shared_with": p.shared_with,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    app.notify();
    Ok(Json(result))
}
