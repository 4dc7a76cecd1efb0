use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap},
    Json,
};
use chrono::{Local, SecondsFormat};
use metrics::{counter, histogram};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

use crate::error::InferenceError;
use crate::postprocessing::Outcome;
use crate::preprocessing::features::FeatureVector;
use crate::server::types::*;

pub async fn health_check() -> &'static str {
    "OK"
}

pub async fn metrics(State(state): State<Arc<AppState>>) -> String {
    state.metrics.render()
}

pub async fn predict(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<PredictResponse>, InferenceError> {
    match run_prediction(&state, &headers, &body).await {
        Ok(response) => {
            let outcome = if response.prediction == 1 { "positive" } else { "negative" };
            counter!("predictions_total", "outcome" => outcome).increment(1);
            Ok(Json(response))
        }
        Err(e) => {
            error!(kind = e.kind(), client_error = e.is_client_error(), "Prediction error: {}", e);
            counter!("prediction_errors_total", "kind" => e.kind()).increment(1);
            Err(e)
        }
    }
}

async fn run_prediction(
    state: &AppState,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<PredictResponse, InferenceError> {
    // 1. Decode
    if !is_json_content_type(headers) {
        let content_type = headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("<none>");
        return Err(InferenceError::InvalidPayload(format!(
            "expected a JSON content type, got {}",
            content_type
        )));
    }
    let payload: serde_json::Value = serde_json::from_slice(body)
        .map_err(|e| InferenceError::InvalidPayload(e.to_string()))?;
    info!("Received prediction request: {}", payload);

    // 2. Preprocess
    let features = FeatureVector::from_json(&payload)?;
    let input_tensor = state.scaler.to_tensor(&features)?;

    // 3. Inference
    let start = Instant::now();
    let classifier = Arc::clone(&state.classifier);
    let probability = tokio::task::spawn_blocking(move || classifier.predict_proba(input_tensor))
        .await
        .map_err(|e| InferenceError::TaskFailed(e.to_string()))??;
    histogram!("inference_duration_seconds").record(start.elapsed().as_secs_f64());

    // 4. Post-process
    let outcome = Outcome::from_probability(probability);

    Ok(PredictResponse {
        success: true,
        prediction: outcome.label,
        probability: outcome.probability,
        timestamp: Local::now().to_rfc3339_opts(SecondsFormat::Micros, false),
    })
}

/// `application/json` or any `application/*+json` media type, parameters ignored.
fn is_json_content_type(headers: &HeaderMap) -> bool {
    let Some(value) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    else {
        return false;
    };
    let mime = value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}
