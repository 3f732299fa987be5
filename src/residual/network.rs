//! Recurrent network underlying the residual learner.
//!
//! An Elman network with a tanh hidden state and a linear scalar readout,
//! trained with backpropagation through time and global-norm gradient
//! clipping. Small enough to train on CPU in-process; no external runtime.

use ndarray::{Array1, Array2};
use rand::distributions::Uniform;
use rand::rngs::StdRng;
use rand::Rng;

/// Elman recurrent network mapping an input sequence to one scalar.
#[derive(Debug, Clone)]
pub struct ElmanNetwork {
    w_xh: Array2<f64>,
    w_hh: Array2<f64>,
    b_h: Array1<f64>,
    w_hy: Array1<f64>,
    b_y: f64,
    input_size: usize,
    hidden_size: usize,
}

/// Accumulated parameter gradients for one batch.
struct Gradients {
    w_xh: Array2<f64>,
    w_hh: Array2<f64>,
    b_h: Array1<f64>,
    w_hy: Array1<f64>,
    b_y: f64,
}

impl Gradients {
    fn zeros(input_size: usize, hidden_size: usize) -> Self {
        Self {
            w_xh: Array2::zeros((hidden_size, input_size)),
            w_hh: Array2::zeros((hidden_size, hidden_size)),
            b_h: Array1::zeros(hidden_size),
            w_hy: Array1::zeros(hidden_size),
            b_y: 0.0,
        }
    }

    fn global_norm(&self) -> f64 {
        let mut sum = self.b_y * self.b_y;
        sum += self.w_xh.iter().map(|g| g * g).sum::<f64>();
        sum += self.w_hh.iter().map(|g| g * g).sum::<f64>();
        sum += self.b_h.iter().map(|g| g * g).sum::<f64>();
        sum += self.w_hy.iter().map(|g| g * g).sum::<f64>();
        sum.sqrt()
    }

    fn scale(&mut self, factor: f64) {
        self.w_xh *= factor;
        self.w_hh *= factor;
        self.b_h *= factor;
        self.w_hy *= factor;
        self.b_y *= factor;
    }
}

fn outer(a: &Array1<f64>, b: &Array1<f64>) -> Array2<f64> {
    Array2::from_shape_fn((a.len(), b.len()), |(i, j)| a[i] * b[j])
}

impl ElmanNetwork {
    /// Initialize with uniform weights in ±1/√fan_in, drawn from `rng`.
    ///
    /// The caller owns the RNG, so an identical seed reproduces identical
    /// initial weights.
    pub fn new(input_size: usize, hidden_size: usize, rng: &mut StdRng) -> Self {
        let input_bound = 1.0 / (input_size as f64).sqrt();
        let hidden_bound = 1.0 / (hidden_size as f64).sqrt();
        let input_dist = Uniform::new(-input_bound, input_bound);
        let hidden_dist = Uniform::new(-hidden_bound, hidden_bound);

        Self {
            w_xh: Array2::from_shape_fn((hidden_size, input_size), |_| rng.sample(input_dist)),
            w_hh: Array2::from_shape_fn((hidden_size, hidden_size), |_| rng.sample(hidden_dist)),
            b_h: Array1::zeros(hidden_size),
            w_hy: Array1::from_shape_fn(hidden_size, |_| rng.sample(hidden_dist)),
            b_y: 0.0,
            input_size,
            hidden_size,
        }
    }

    /// Dimensionality of each input step.
    pub fn input_size(&self) -> usize {
        self.input_size
    }

    /// Run the sequence through the network.
    ///
    /// Returns the scalar prediction and every hidden state, which the
    /// backward pass needs.
    fn forward_states(&self, sequence: &[Array1<f64>]) -> (f64, Vec<Array1<f64>>) {
        let mut hidden = Array1::zeros(self.hidden_size);
        let mut states = Vec::with_capacity(sequence.len());
        for x in sequence {
            let pre = self.w_xh.dot(x) + self.w_hh.dot(&hidden) + &self.b_h;
            hidden = pre.mapv(f64::tanh);
            states.push(hidden.clone());
        }
        let y = self.w_hy.dot(&hidden) + self.b_y;
        (y, states)
    }

    /// Predict the scalar output for one input sequence.
    pub fn forward(&self, sequence: &[Array1<f64>]) -> f64 {
        self.forward_states(sequence).0
    }

    /// Backpropagate one example's squared error into `grads`.
    ///
    /// Returns the squared error so the caller can track the batch loss.
    fn backward(
        &self,
        sequence: &[Array1<f64>],
        target: f64,
        grads: &mut Gradients,
    ) -> f64 {
        let (y, states) = self.forward_states(sequence);
        let error = y - target;

        let last = states.len() - 1;
        grads.w_hy += &(2.0 * error * &states[last]);
        grads.b_y += 2.0 * error;

        // dL/dh at the final step, carried backwards through time.
        let mut dh = self.w_hy.mapv(|w| 2.0 * error * w);
        for t in (0..states.len()).rev() {
            let dz = &dh * &states[t].mapv(|h| 1.0 - h * h);
            grads.b_h += &dz;
            grads.w_xh += &outer(&dz, &sequence[t]);
            if t > 0 {
                grads.w_hh += &outer(&dz, &states[t - 1]);
            }
            dh = self.w_hh.t().dot(&dz);
        }

        error * error
    }

    /// Run one epoch of minibatch SGD over the given windows.
    ///
    /// `order` indexes into `windows`/`targets` and carries the caller's
    /// shuffle. Returns the mean squared error over the epoch.
    pub fn train_epoch(
        &mut self,
        windows: &[Vec<Array1<f64>>],
        targets: &[f64],
        order: &[usize],
        learning_rate: f64,
        batch_size: usize,
        gradient_clip: f64,
    ) -> f64 {
        let mut total_loss = 0.0;

        for batch in order.chunks(batch_size.max(1)) {
            let mut grads = Gradients::zeros(self.input_size, self.hidden_size);
            for &i in batch {
                total_loss += self.backward(&windows[i], targets[i], &mut grads);
            }
            grads.scale(1.0 / batch.len() as f64);

            let norm = grads.global_norm();
            if norm > gradient_clip {
                grads.scale(gradient_clip / norm);
            }

            self.w_xh -= &(learning_rate * &grads.w_xh);
            self.w_hh -= &(learning_rate * &grads.w_hh);
            self.b_h -= &(learning_rate * &grads.b_h);
            self.w_hy -= &(learning_rate * &grads.w_hy);
            self.b_y -= learning_rate * grads.b_y;
        }

        total_loss / order.len().max(1) as f64
    }
}
