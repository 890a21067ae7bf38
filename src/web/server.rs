use axum::{routing::get, routing::post, routing::put, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;

use super::api::panel as panel_handlers;
use super::api_doc::ApiDoc;
use super::state::AppState;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/panel/data", post(panel_handlers::data))
        .route("/api/panel/hover", post(panel_handlers::hover))
        .route("/api/panel/hover/clear", post(panel_handlers::hover_clear))
        .route("/api/panel/box-select", post(panel_handlers::box_select))
        .route("/api/panel/view", get(panel_handlers::view))
        .route("/api/panel/status", get(panel_handlers::status))
        .route("/api/panel/time-range", get(panel_handlers::time_range))
        .route("/api/panel/options", put(panel_handlers::options))
        // OpenAPI / Swagger
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server(config: Config) -> std::io::Result<()> {
    let bind_addr = config.web.bind.clone();
    let state = AppState::new(&config);
    let app = router(state.clone());

    log::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.panel.lock().await.teardown().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
