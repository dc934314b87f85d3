use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;

use crate::auth::UserId;
use crate::error::AppError;
use crate::state::AppState;
use kikaku_core::project::Project;
use kikaku_core::state::{ProjectState, StateDelta};
use kikaku_core::summary;
use kikaku_core::types::Step;

/// GET /api/projects/:id/state — the accumulated wizard answers.
pub async fn get_state(
    State(app): State<AppState>,
    UserId(uid): UserId,
    Path(id): Path<String>,
) -> Result<Json<ProjectState>, AppError> {
    let root = app.root.clone();
    let state = tokio::task::spawn_blocking(move || {
        let p = Project::load(&root, &id)?;
        p.ensure_member(&uid)?;
        Ok::<_, kikaku_core::KikakuError>(p.state)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(state))
}

/// PUT /api/projects/:id/state — whole-state overwrite (last write wins).
pub async fn put_state(
    State(app): State<AppState>,
    UserId(uid): UserId,
    Path(id): Path<String>,
    Json(body): Json<ProjectState>,
) -> Result<Json<ProjectState>, AppError> {
    let root = app.root.clone();
    let state = tokio::task::spawn_blocking(move || {
        let mut p = Project::load(&root, &id)?;
        p.ensure_member(&uid)?;
        p.set_state(body);
        p.save(&root)?;
        Ok::<_, kikaku_core::KikakuError>(p.state)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    app.notify();
    Ok(Json(state))
}

/// PATCH /api/projects/:id/state — merge a step's partial answers; absent
/// fields stay untouched.
pub async fn patch_state(
    State(app): State<AppState>,
    UserId(uid): UserId,
    Path(id): Path<String>,
    Json(body): Json<StateDelta>,
) -> Result<Json<ProjectState>, AppError> {
    let root = app.root.clone();
    let state = tokio::task::spawn_blocking(move || {
        let mut p = Project::load(&root, &id)?;
        p.ensure_member(&uid)?;
        p.apply_delta(body);
        p.save(&root)?;
        Ok::<_, kikaku_core::KikakuError>(p.state)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    app.notify();
    Ok(Json(state))
}

#[derive(serde::Deserialize)]
pub struct MarkStepBody {
    pub step: String,
}

/// POST /api/projects/:id/step — record that the caller reached a step.
///
/// An unrecognized step name is logged and ignored rather than rejected:
/// progress tracking must never block navigation. The response carries the
/// (possibly unchanged) status either way.
pub async fn mark_step(
    State(app): State<AppState>,
    UserId(uid): UserId,
    Path(id): Path<String>,
    Json(body): Json<MarkStepBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let (updated, result) = tokio::task::spawn_blocking(move || {
        let mut p = Project::load(&root, &id)?;
        p.ensure_member(&uid)?;

        let updated = match body.step.parse::<Step>() {
            Ok(step) => {
                p.mark_step_reached(step);
                p.save(&root)?;
                true
            }
            Err(_) => {
                tracing::warn!(step = %body.step, project = %p.id, "unknown step, ignoring");
                false
            }
        };

        Ok::<_, kikaku_core::KikakuError>((
            updated,
            serde_json::json!({
                "updated": updated,
                "status": p.status,
                "progress_percent": p.status.progress_percent(),
            }),
        ))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    if updated {
        app.notify();
    }
    Ok(Json(result))
}

/// GET /api/projects/:id/resume — the step to continue from, derived from
/// which fields are filled.
pub async fn resume(
    State(app): State<AppState>,
    UserId(uid): UserId,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let p = Project::load(&root, &id)?;
        p.ensure_member(&uid)?;
        Ok::<_, kikaku_core::KikakuError>(serde_json::json!({
            "step": p.state.resume_step(),
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// GET /api/projects/:id/progress — progress indicator data.
pub async fn progress(
    State(app): State<AppState>,
    UserId(uid): UserId,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let p = Project::load(&root, &id)?;
        p.ensure_member(&uid)?;
        Ok::<_, kikaku_core::KikakuError>(serde_json::json!({
            "percent": p.status.progress_percent(),
            "current_step": p.status.current_step,
            "completed_steps": p.status.completed_steps,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// GET /api/projects/:id/summary — the plan as a Markdown document.
pub async fn get_summary(
    State(app): State<AppState>,
    UserId(uid): UserId,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let root = app.root.clone();
    let markdown = tokio::task::spawn_blocking(move || {
        let p = Project::load(&root, &id)?;
        p.ensure_member(&uid)?;
        Ok::<_, kikaku_core::KikakuError>(summary::render_markdown(&p.state))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok((
        [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
        markdown,
    ))
}
