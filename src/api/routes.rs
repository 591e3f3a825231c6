//! Portal route configuration.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use super::handlers;
use super::state::AppState;

/// Create the portal router.
///
/// - `/`, `/features`, `/git-history`: fixed page shells from `web/`
/// - `/docs`, `/docs/{*path}`: generated index and rendered Markdown
/// - `/api/*`: JSON board/metrics/project API (permissive CORS)
/// - `/web/data/{*file}`: raw JSON data files (permissive CORS)
/// - anything else: static file relative to the process root
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/kanban", get(handlers::get_board))
        .route("/kanban/task", post(handlers::add_task))
        .route("/kanban/move", post(handlers::move_task))
        .route("/kanban/update", post(handlers::update_task))
        .route("/metrics", get(handlers::get_metrics))
        .route(
            "/projects",
            get(handlers::list_projects).post(handlers::create_project),
        )
        .route("/projects/select", post(handlers::select_project))
        .fallback(handlers::api_not_found)
        .layer(CorsLayer::permissive());

    let data_routes = Router::new()
        .route("/web/data/{*file}", get(handlers::data_file))
        .layer(CorsLayer::permissive());

    let page_routes = Router::new()
        .route("/", get(handlers::dashboard))
        .route("/features", get(handlers::features))
        .route("/git-history", get(handlers::git_history))
        .route("/docs", get(handlers::docs_index))
        .route("/docs/{*path}", get(handlers::doc_page));

    let static_files = ServeDir::new(&state.config().root);

    page_routes
        .merge(data_routes)
        .nest("/api", api_routes)
        .fallback_service(static_files)
        .with_state(state)
}
