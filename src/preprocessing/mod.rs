pub mod features;
pub mod scaling;
