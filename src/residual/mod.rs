//! Residual sequence learning: the nonlinear half of the hybrid forecaster.

pub mod align;
pub mod learner;
pub mod network;
pub mod scaler;
pub mod window;

pub use align::{AlignedData, FeatureAligner};
pub use learner::{LearnerConfig, ResidualSequenceLearner};
pub use scaler::ScalingParameters;
