use serde::Serialize;

const DECIMALS: i32 = 4;

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct Probability {
    pub negative: f64,
    pub positive: f64,
}

/// Label and probability pair derived from the model's positive-class score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outcome {
    pub label: u8,
    pub probability: Probability,
}

impl Outcome {
    pub fn from_probability(raw: f32) -> Self {
        let probability = reconcile(f64::from(raw));
        let label = u8::from(probability.positive >= 0.5);
        Self { label, probability }
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Rounds both sides to 4 decimals, then forces them to sum to exactly 1.
fn reconcile(p: f64) -> Probability {
    let mut positive = round_to(p, DECIMALS);
    let mut negative = round_to(1.0 - p, DECIMALS);

    if positive + negative != 1.0 {
        positive = round_to(positive, DECIMALS);
        negative = 1.0 - positive;
    }

    Probability { negative, positive }
}
