use crate::model::BinaryClassifier;
use crate::preprocessing::scaling::FeatureScaler;
use crate::server::{handlers, types::AppState};
use axum::{
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

pub fn create_router(
    classifier: Arc<dyn BinaryClassifier>,
    scaler: FeatureScaler,
    metrics_handle: PrometheusHandle,
) -> Router {
    let state = Arc::new(AppState {
        classifier,
        scaler,
        metrics: metrics_handle,
    });

    // Any origin may call the API.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics))
        .route("/api/predict", post(handlers::predict))
        .layer(cors)
        .with_state(state)
}
