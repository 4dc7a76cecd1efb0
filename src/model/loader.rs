use crate::error::InferenceError;
use crate::model::classifier::{BinaryClassifier, OnnxClassifier};
use crate::preprocessing::scaling::INPUT_SHAPE;
use ndarray::Array3;
use ort::session::{builder::GraphOptimizationLevel, Session};
use rand::Rng;
use std::path::Path;
use tracing::{debug, info};

// Initialize the global environment for ORT (only needed once)
pub fn init_ort() -> Result<(), InferenceError> {
    ort::init().with_name("heartnx").commit()?;
    Ok(())
}

/// Loads an ONNX model from disk and creates an inference session.
///
/// # Arguments
/// * `model_path` - Path to the .onnx file
/// * `intra_threads` - Parallelism within an op
pub fn load_model(
    model_path: impl AsRef<Path>,
    intra_threads: usize,
) -> Result<Session, InferenceError> {
    let path = model_path.as_ref();
    if !path.exists() {
        return Err(InferenceError::ModelNotFound(path.display().to_string()));
    }

    let session = Session::builder()?
        .with_optimization_level(GraphOptimizationLevel::Level3)?
        .with_intra_threads(intra_threads)?
        .commit_from_file(path)?;

    info!(path = %path.display(), "loaded model");
    for (i, input) in session.inputs.iter().enumerate() {
        debug!(index = i, name = %input.name, input_type = ?input.input_type, "model input");
    }

    Ok(session)
}

/// Runs one forward pass on random data to prove the model accepts (1, 13, 1) inputs.
pub fn warm_up(classifier: &dyn BinaryClassifier) -> Result<f32, InferenceError> {
    let mut rng = rand::thread_rng();
    let dummy = Array3::from_shape_fn((INPUT_SHAPE[0], INPUT_SHAPE[1], INPUT_SHAPE[2]), |_| {
        rng.gen::<f32>()
    });
    let probability = classifier.predict_proba(dummy)?;
    debug!(probability, "warm-up inference succeeded");
    Ok(probability)
}

/// Loads the model at `model_path` and warms it up; any failure is fatal to startup.
pub fn load_classifier(
    model_path: impl AsRef<Path>,
    intra_threads: usize,
) -> Result<OnnxClassifier, InferenceError> {
    let session = load_model(model_path, intra_threads)?;
    let classifier = OnnxClassifier::new(session)?;
    warm_up(&classifier)?;
    info!(input = classifier.input_name(), "model warm-up complete");
    Ok(classifier)
}
