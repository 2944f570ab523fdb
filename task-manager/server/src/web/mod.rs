use axum::Router;
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::task::{TaskState, create_task_web_router};

pub mod api;

#[tracing::instrument(skip(config))]
pub async fn start_web_server(config: Config) -> anyhow::Result<()> {
    let server_address = format!("0.0.0.0:{}", &config.port);
    let listener = tokio::net::TcpListener::bind(&server_address).await?;
    tracing::info!("Web server running on http://{}", server_address);

    let db = Database::connect(&config.db_url).await?;
    migration::Migrator::up(&db, None).await?;
    tracing::info!("Database migrations applied successfully");

    let app = create_app(db);
    axum::serve(listener, app).await?;
    Ok(())
}

/// Builds the full application router: task pages, JSON API, API docs and health check.
pub fn create_app(db: DatabaseConnection) -> Router {
    let task_state = Arc::new(TaskState { db: Arc::new(db) });

    Router::new()
        .merge(create_task_web_router(task_state.clone()))
        .merge(api::create_api_router(task_state))
        .route("/health", axum::routing::get(health_check_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

#[tracing::instrument]
pub async fn health_check_handler() -> &'static str {
    "OK"
}
