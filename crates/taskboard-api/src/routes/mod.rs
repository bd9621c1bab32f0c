use axum::{
    routing::{get, patch},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{handlers, state::ApiState};

pub fn create_router(state: ApiState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health::health_check))

        // Task endpoints
        .route("/tasks", get(handlers::task::list_tasks))
        .route("/tasks/:task_id", patch(handlers::task::assign_task))

        // Add state
        .with_state(state)

        // Request logging
        .layer(TraceLayer::new_for_http())

        // Add CORS
        .layer(CorsLayer::permissive())
}
