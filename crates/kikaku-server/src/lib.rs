pub mod auth;
pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{delete, get, patch, post, put};
use axum::Router;
use gpt_assist::AssistClient;
use std::path::PathBuf;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the axum Router with all API routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(root: PathBuf, assist: Option<AssistClient>) -> Router {
    let app_state = state::AppState::new(root, assist);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Events (SSE)
        .route("/api/events", get(routes::events::sse_events))
        // Projects
        .route("/api/projects", get(routes::projects::list_projects))
        .route("/api/projects", post(routes::projects::create_project))
        .route("/api/projects/{id}", get(routes::projects::get_project))
        .route(
            "/api/projects/{id}",
            delete(routes::projects::delete_project),
        )
        .route(
            "/api/projects/{id}/name",
            put(routes::projects::rename_project),
        )
        .route(
            "/api/projects/{id}/share",
            post(routes::projects::share_project),
        )
        .route(
            "/api/projects/{id}/unshare",
            post(routes::projects::unshare_project),
        )
        // Wizard state
        .route("/api/projects/{id}/state", get(routes::planning::get_state))
        .route("/api/projects/{id}/state", put(routes::planning::put_state))
        .route(
            "/api/projects/{id}/state",
            patch(routes::planning::patch_state),
        )
        // Progress tracking
        .route("/api/projects/{id}/step", post(routes::planning::mark_step))
        .route("/api/projects/{id}/resume", get(routes::planning::resume))
        .route(
            "/api/projects/{id}/progress",
            get(routes::planning::progress),
        )
        .route(
            "/api/projects/{id}/summary",
            get(routes::planning::get_summary),
        )
        // Users
        .route("/api/users/search", get(routes::users::search))
        .route("/api/users/me", put(routes::users::register))
        .route("/api/users/{uid}", get(routes::users::get_user))
        // Assists
        .route("/api/assist/word", post(routes::assist::associate_word))
        .route(
            "/api/assist/concepts",
            post(routes::assist::generate_concepts),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// Start the kikaku API server.
pub async fn serve(root: PathBuf, port: u16, assist: Option<AssistClient>) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    serve_on(root, listener, assist).await
}

/// Start the kikaku API server on a pre-bound listener.
///
/// Unlike `serve`, this accepts a `TcpListener` that was already bound so the
/// caller can read the actual port before starting (useful when `port = 0`
/// and the OS picks a free port).
pub async fn serve_on(
    root: PathBuf,
    listener: tokio::net::TcpListener,
    assist: Option<AssistClient>,
) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let app = build_router(root, assist);

    tracing::info!("kikaku API listening on http://localhost:{actual_port}");

    axum::serve(listener, app).await?;
    Ok(())
}
