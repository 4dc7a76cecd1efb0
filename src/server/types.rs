use crate::model::BinaryClassifier;
use crate::postprocessing::Probability;
use crate::preprocessing::scaling::FeatureScaler;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use std::sync::Arc;

/// Shared Application State
#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<dyn BinaryClassifier>,
    pub scaler: FeatureScaler,
    pub metrics: PrometheusHandle,
}

// --- DTOs (Data Transfer Objects) ---

// The request body is decoded by hand (see `preprocessing::features`) so that
// malformed input takes the same 500 path as model failures.

#[derive(Serialize, Debug)]
pub struct PredictResponse {
    pub success: bool,
    pub prediction: u8,
    pub probability: Probability,
    /// ISO-8601 local time at which the response was produced.
    pub timestamp: String,
}
