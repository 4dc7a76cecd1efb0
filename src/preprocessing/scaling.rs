use crate::config::{ScalingConfig, ScalingMode};
use crate::error::InferenceError;
use crate::preprocessing::features::{FeatureVector, NUM_FEATURES};
use ndarray::Array3;

pub const NUM_SCALED: usize = 5;

/// Positions of age, trestbps, chol, thalach and oldpeak.
pub const SCALED_COLUMNS: [usize; NUM_SCALED] = [0, 3, 4, 7, 9];

/// Input tensor shape: (batch, features, channel).
pub const INPUT_SHAPE: [usize; 3] = [1, NUM_FEATURES, 1];

/// Standardization applied to `SCALED_COLUMNS` before inference.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureScaler {
    /// Mean and population deviation taken across the five scaled values of
    /// the request itself.
    PerRequest,
    /// Training-time mean and standard deviation for each scaled column.
    Fixed {
        mean: [f64; NUM_SCALED],
        std: [f64; NUM_SCALED],
    },
}

impl FeatureScaler {
    /// Builds the scaler from an already validated config.
    pub fn from_config(config: &ScalingConfig) -> Result<Self, InferenceError> {
        match config.mode {
            ScalingMode::PerRequest => Ok(FeatureScaler::PerRequest),
            ScalingMode::Fixed => {
                let mean = fixed_stats(config.mean.as_deref())?;
                let std = fixed_stats(config.std.as_deref())?;
                Ok(FeatureScaler::Fixed { mean, std })
            }
        }
    }

    /// Scales the designated columns and returns the model-ready row.
    pub fn transform(&self, features: &FeatureVector) -> [f32; NUM_FEATURES] {
        let raw = features.values();
        let mut row = features.0.map(|v| v as f32);

        match self {
            FeatureScaler::PerRequest => {
                let sample = SCALED_COLUMNS.map(|col| raw[col] as f64);
                let (mean, scale) = population_stats(&sample);
                for (&col, &x) in SCALED_COLUMNS.iter().zip(sample.iter()) {
                    row[col] = ((x - mean) / scale) as f32;
                }
            }
            FeatureScaler::Fixed { mean, std } => {
                for (i, &col) in SCALED_COLUMNS.iter().enumerate() {
                    row[col] = ((raw[col] as f64 - mean[i]) / std[i]) as f32;
                }
            }
        }
        row
    }

    /// Scales and reshapes into the (1, 13, 1) input tensor.
    pub fn to_tensor(&self, features: &FeatureVector) -> Result<Array3<f32>, InferenceError> {
        let row = self.transform(features);
        let tensor = Array3::from_shape_vec(
            (INPUT_SHAPE[0], INPUT_SHAPE[1], INPUT_SHAPE[2]),
            row.to_vec(),
        )?;
        Ok(tensor)
    }
}

fn fixed_stats(values: Option<&[f64]>) -> Result<[f64; NUM_SCALED], InferenceError> {
    let values = values.unwrap_or_default();
    values
        .try_into()
        .map_err(|_| InferenceError::ShapeMismatch {
            expected: vec![NUM_SCALED],
            got: vec![values.len()],
        })
}

/// Mean and population standard deviation; a zero deviation scales by 1.
fn population_stats(sample: &[f64]) -> (f64, f64) {
    let n = sample.len() as f64;
    let mean = sample.iter().sum::<f64>() / n;
    let variance = sample.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    let std = variance.sqrt();
    let scale = if std == 0.0 { 1.0 } else { std };
    (mean, scale)
}
