use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ndarray::ShapeError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InferenceError {
    #[error("Model not found at path: {0}")]
    ModelNotFound(String),

    #[error("ONNX Runtime error: {0}")]
    OrtError(#[from] ort::Error),

    #[error("Input shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    #[error("Shape error: {0}")]
    ShapeError(#[from] ShapeError),

    #[error("Invalid request payload: {0}")]
    InvalidPayload(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Field '{field}' is not an integer: {value}")]
    InvalidField { field: &'static str, value: String },

    #[error("Model produced no output value")]
    EmptyOutput,

    #[error("Inference task failed: {0}")]
    TaskFailed(String),
}

impl InferenceError {
    /// Whether the fault lies with the request rather than the model or runtime.
    ///
    /// Only used for logs and metrics: clients see the same 500 either way.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            InferenceError::InvalidPayload(_)
                | InferenceError::MissingField(_)
                | InferenceError::InvalidField { .. }
        )
    }

    pub fn kind(&self) -> &'static str {
        match self {
            InferenceError::ModelNotFound(_) => "model_not_found",
            InferenceError::OrtError(_) => "runtime",
            InferenceError::ShapeMismatch { .. } | InferenceError::ShapeError(_) => "shape",
            InferenceError::InvalidPayload(_) => "invalid_payload",
            InferenceError::MissingField(_) => "missing_field",
            InferenceError::InvalidField { .. } => "invalid_field",
            InferenceError::EmptyOutput => "empty_output",
            InferenceError::TaskFailed(_) => "task_failed",
        }
    }
}

impl IntoResponse for InferenceError {
    fn into_response(self) -> Response {
        // Input and model faults are reported identically; detail stays in the log.
        let body = Json(json!({
            "success": false,
            "error": "Internal server error"
        }));

        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
