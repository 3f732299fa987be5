//! Residual sequence learner: a recurrent corrector for linear-model errors.

use crate::core::{FeatureMatrix, TimeSeries};
use crate::error::{ForecastError, Result};
use crate::residual::align::FeatureAligner;
use crate::residual::network::ElmanNetwork;
use crate::residual::scaler::ScalingParameters;
use crate::residual::window::prepare_windows;
use ndarray::Array1;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::debug;

/// Hyperparameters for the residual learner.
///
/// Validated once at construction; a constructed config is always usable.
#[derive(Debug, Clone)]
pub struct LearnerConfig {
    /// Number of past steps each training window covers.
    pub window_length: usize,
    /// Hidden state width of the recurrent network.
    pub hidden_size: usize,
    /// Training epochs.
    pub epochs: usize,
    /// SGD learning rate.
    pub learning_rate: f64,
    /// Minibatch size.
    pub batch_size: usize,
    /// Global gradient norm ceiling.
    pub gradient_clip: f64,
    /// RNG seed for weight init and shuffling.
    pub seed: u64,
}

impl Default for LearnerConfig {
    fn default() -> Self {
        Self {
            window_length: 30,
            hidden_size: 32,
            epochs: 50,
            learning_rate: 0.01,
            batch_size: 32,
            gradient_clip: 5.0,
            seed: 42,
        }
    }
}

impl LearnerConfig {
    /// Validate hyperparameter ranges.
    pub fn validate(&self) -> Result<()> {
        if self.window_length == 0 {
            return Err(ForecastError::InvalidParameter(
                "window length must be positive".to_string(),
            ));
        }
        if self.hidden_size == 0 {
            return Err(ForecastError::InvalidParameter(
                "hidden size must be positive".to_string(),
            ));
        }
        if self.epochs == 0 {
            return Err(ForecastError::InvalidParameter(
                "epochs must be positive".to_string(),
            ));
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(ForecastError::InvalidParameter(format!(
                "learning rate must be positive, got {}",
                self.learning_rate
            )));
        }
        if self.batch_size == 0 {
            return Err(ForecastError::InvalidParameter(
                "batch size must be positive".to_string(),
            ));
        }
        if !self.gradient_clip.is_finite() || self.gradient_clip <= 0.0 {
            return Err(ForecastError::InvalidParameter(format!(
                "gradient clip must be positive, got {}",
                self.gradient_clip
            )));
        }
        Ok(())
    }
}

/// A trained residual corrector.
///
/// Produced by one [`fit`] call; prediction never mutates the learner, so a
/// trained instance can be rolled out any number of times with identical
/// results.
///
/// [`fit`]: ResidualSequenceLearner::fit
#[derive(Debug, Clone)]
pub struct ResidualSequenceLearner {
    network: ElmanNetwork,
    scaling: ScalingParameters,
    window_length: usize,
    /// Scaled input rows covering the last `window_length` training steps.
    seed_window: Vec<Array1<f64>>,
    /// Last observed (unscaled) feature row, reused when future features
    /// are not supplied.
    last_features: Vec<f64>,
    final_loss: f64,
}

impl ResidualSequenceLearner {
    /// Train a residual corrector on the linear model's in-sample errors.
    ///
    /// Features are optional; when given they are joined to the residuals by
    /// timestamp before scaling. Training is fully deterministic under
    /// `config.seed`. A non-finite epoch loss aborts with
    /// [`ForecastError::TrainingDiverged`].
    pub fn fit(
        residuals: &TimeSeries,
        features: Option<&FeatureMatrix>,
        config: &LearnerConfig,
    ) -> Result<Self> {
        config.validate()?;

        let aligned = FeatureAligner::align(residuals, features)?;
        if aligned.len() <= config.window_length {
            return Err(ForecastError::InsufficientData {
                needed: config.window_length + 1,
                got: aligned.len(),
            });
        }

        let scaling = ScalingParameters::fit(&aligned);
        let mut inputs = Vec::with_capacity(aligned.len());
        let mut targets = Vec::with_capacity(aligned.len());
        for (value, row) in aligned.residuals.iter().zip(aligned.features.iter()) {
            inputs.push(Array1::from_vec(scaling.input_row(*value, row)?));
            targets.push(scaling.scale_residual(*value));
        }

        let set = prepare_windows(&inputs, &targets, config.window_length)?;

        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut network =
            ElmanNetwork::new(1 + scaling.num_features(), config.hidden_size, &mut rng);

        let mut order: Vec<usize> = (0..set.len()).collect();
        let mut final_loss = f64::INFINITY;
        for epoch in 0..config.epochs {
            order.shuffle(&mut rng);
            let loss = network.train_epoch(
                &set.windows,
                &set.targets,
                &order,
                config.learning_rate,
                config.batch_size,
                config.gradient_clip,
            );
            if !loss.is_finite() {
                return Err(ForecastError::TrainingDiverged { epoch });
            }
            debug!(epoch, loss, "residual training epoch");
            final_loss = loss;
        }

        let seed_window = inputs[inputs.len() - config.window_length..].to_vec();
        let last_features = aligned
            .features
            .last()
            .cloned()
            .unwrap_or_default();

        Ok(Self {
            network,
            scaling,
            window_length: config.window_length,
            seed_window,
            last_features,
            final_loss,
        })
    }

    /// Window length the learner was trained with.
    pub fn window_length(&self) -> usize {
        self.window_length
    }

    /// Mean squared error of the final training epoch (scaled units).
    pub fn final_loss(&self) -> f64 {
        self.final_loss
    }

    /// Number of feature channels the learner expects.
    pub fn num_features(&self) -> usize {
        self.scaling.num_features()
    }

    /// One rollout step: predict the next residual and slide the window.
    ///
    /// Pure in the learner: repeated calls with the same window and features
    /// return the same value and successor window.
    pub fn rollout_step(
        &self,
        window: &[Array1<f64>],
        features: &[f64],
    ) -> Result<(f64, Vec<Array1<f64>>)> {
        let scaled = self.network.forward(window);
        let value = self.scaling.unscale_residual(scaled);

        let mut next_row = Vec::with_capacity(self.network.input_size());
        next_row.push(scaled);
        next_row.extend(self.scaling.scale_features(features)?);

        let mut next_window = window[1..].to_vec();
        next_window.push(Array1::from_vec(next_row));
        Ok((value, next_window))
    }

    /// Predict the next `horizon` residuals by iterative rollout.
    ///
    /// Each predicted (scaled) residual feeds the next step's window. When
    /// the learner was trained with features, `future_features` must cover
    /// the horizon exactly; omitting it falls back to repeating the last
    /// observed feature row.
    pub fn predict(
        &self,
        horizon: usize,
        future_features: Option<&FeatureMatrix>,
    ) -> Result<Vec<f64>> {
        if let Some(matrix) = future_features {
            if self.num_features() > 0 && matrix.len() != horizon {
                return Err(ForecastError::InputShape {
                    expected: horizon,
                    got: matrix.len(),
                });
            }
        }

        let mut window = self.seed_window.clone();
        let mut predictions = Vec::with_capacity(horizon);
        for step in 0..horizon {
            let features: Vec<f64> = match future_features {
                Some(matrix) if self.num_features() > 0 => matrix.row(step)?.to_vec(),
                _ => self.last_features.clone(),
            };
            let (value, next_window) = self.rollout_step(&window, &features)?;
            predictions.push(value);
            window = next_window;
        }
        Ok(predictions)
    }
}
