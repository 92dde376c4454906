use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::dashboard::handlers as dashboard;
use crate::numbers::handlers as numbers;
use crate::shared::AppState;

/// All HTTP routes of the dashboard backend.
pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "eggdash" }))
        .route("/players/:key/snapshots", post(dashboard::record_snapshot))
        .route("/players/:key/title", get(dashboard::title_progress))
        .route("/players/:key/projection", get(dashboard::projection))
        .route("/players/:key/growth", get(dashboard::growth))
        .route("/players/:key/neighbors", get(dashboard::neighbors))
        .route("/rankings/:metric", get(dashboard::ranking))
        .route("/numbers/decode/:text", get(numbers::decode_number))
        .route("/numbers/difference", get(numbers::number_difference))
        .layer(TraceLayer::new_for_http())
        // Dashboard UI is served from another origin
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
