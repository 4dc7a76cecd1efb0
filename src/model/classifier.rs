use crate::error::InferenceError;
use crate::preprocessing::scaling::INPUT_SHAPE;
use ndarray::Array3;
use ort::session::Session;
use ort::value::Tensor;
use std::sync::Mutex;

/// A loaded binary classifier returning the positive-class probability.
pub trait BinaryClassifier: Send + Sync {
    /// Runs one forward pass over a (1, 13, 1) input.
    fn predict_proba(&self, input: Array3<f32>) -> Result<f32, InferenceError>;
}

/// ONNX Runtime session wrapped for shared, read-only use across requests.
pub struct OnnxClassifier {
    // `Session::run` takes `&mut self`; calls are serialized here.
    session: Mutex<Session>,
    input_name: String,
}

impl OnnxClassifier {
    pub fn new(session: Session) -> Result<Self, InferenceError> {
        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .ok_or_else(|| InferenceError::ShapeMismatch {
                expected: INPUT_SHAPE.to_vec(),
                got: Vec::new(),
            })?;

        Ok(Self {
            session: Mutex::new(session),
            input_name,
        })
    }

    pub fn input_name(&self) -> &str {
        &self.input_name
    }
}

impl BinaryClassifier for OnnxClassifier {
    fn predict_proba(&self, input: Array3<f32>) -> Result<f32, InferenceError> {
        let shape = input.shape().to_vec();
        if shape != INPUT_SHAPE {
            return Err(InferenceError::ShapeMismatch {
                expected: INPUT_SHAPE.to_vec(),
                got: shape,
            });
        }

        let (data, _offset) = input.as_standard_layout().to_owned().into_raw_vec_and_offset();
        let input_value = Tensor::from_array((shape, data.into_boxed_slice()))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| InferenceError::TaskFailed("model session lock poisoned".to_string()))?;
        let outputs = session.run(ort::inputs![self.input_name.as_str() => input_value])?;

        // Sigmoid head: output is (1, 1), the first element is P(disease).
        let (_shape, data) = outputs[0].try_extract_tensor::<f32>()?;
        data.first().copied().ok_or(InferenceError::EmptyOutput)
    }
}
