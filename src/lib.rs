pub mod config;
pub mod error;
pub mod model;
pub mod postprocessing;
pub mod preprocessing;
pub mod server;
pub mod telemetry;

// Re-export common types
pub use error::InferenceError;
