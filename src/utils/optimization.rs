//! Derivative-free minimization for coefficient estimation.

/// Result of a simplex minimization run.
#[derive(Debug, Clone)]
pub struct SimplexResult {
    /// The best point found.
    pub point: Vec<f64>,
    /// Objective value at the best point.
    pub value: f64,
    /// Iterations performed.
    pub iterations: usize,
    /// Whether the tolerance was reached before the iteration cap.
    pub converged: bool,
}

/// Configuration for Nelder-Mead simplex minimization.
///
/// Uses the standard reflection/expansion/contraction/shrink coefficients
/// (1, 2, 0.5, 0.5); only the iteration cap, tolerance and initial step are
/// worth tuning for coefficient estimation.
#[derive(Debug, Clone)]
pub struct SimplexConfig {
    /// Maximum number of iterations.
    pub max_iter: usize,
    /// Convergence tolerance on the objective spread across the simplex.
    pub tolerance: f64,
    /// Relative step used to build the initial simplex.
    pub initial_step: f64,
}

impl Default for SimplexConfig {
    fn default() -> Self {
        Self {
            max_iter: 1000,
            tolerance: 1e-8,
            initial_step: 0.05,
        }
    }
}

const ALPHA: f64 = 1.0; // reflection
const GAMMA: f64 = 2.0; // expansion
const RHO: f64 = 0.5; // contraction
const SIGMA: f64 = 0.5; // shrink

/// Minimize `objective` with the Nelder-Mead simplex method.
///
/// `bounds`, when given, clamps every candidate point per dimension.
///
/// # Example
/// ```
/// use hybrid_forecast::utils::{nelder_mead, SimplexConfig};
///
/// // Minimize (x-2)^2 + (y-3)^2
/// let result = nelder_mead(
///     |x| (x[0] - 2.0).powi(2) + (x[1] - 3.0).powi(2),
///     &[0.0, 0.0],
///     None,
///     SimplexConfig::default(),
/// );
/// assert!(result.converged);
/// assert!((result.point[0] - 2.0).abs() < 0.01);
/// assert!((result.point[1] - 3.0).abs() < 0.01);
/// ```
pub fn nelder_mead<F>(
    objective: F,
    initial: &[f64],
    bounds: Option<&[(f64, f64)]>,
    config: SimplexConfig,
) -> SimplexResult
where
    F: Fn(&[f64]) -> f64,
{
    let n = initial.len();
    if n == 0 {
        return SimplexResult {
            point: vec![],
            value: f64::NAN,
            iterations: 0,
            converged: false,
        };
    }

    let clamp = |point: Vec<f64>| -> Vec<f64> {
        match bounds {
            Some(b) => point
                .into_iter()
                .zip(b.iter())
                .map(|(x, &(lo, hi))| x.clamp(lo, hi))
                .collect(),
            None => point,
        }
    };

    // Initial simplex: the start point plus one perturbed vertex per dimension.
    let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(n + 1);
    simplex.push(clamp(initial.to_vec()));
    for i in 0..n {
        let mut vertex = initial.to_vec();
        let step = if initial[i].abs() > 1e-10 {
            config.initial_step * initial[i].abs()
        } else {
            config.initial_step
        };
        vertex[i] += step;
        simplex.push(clamp(vertex));
    }

    let mut values: Vec<f64> = simplex.iter().map(|v| objective(v)).collect();

    let mut iterations = 0;
    let mut converged = false;

    while iterations < config.max_iter {
        iterations += 1;

        let mut order: Vec<usize> = (0..=n).collect();
        order.sort_by(|&a, &b| {
            values[a]
                .partial_cmp(&values[b])
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let best = order[0];
        let second_worst = order[n - 1];
        let worst = order[n];

        if values[worst] - values[best] < config.tolerance {
            converged = true;
            break;
        }

        // Centroid of all vertices except the worst.
        let mut centroid = vec![0.0; n];
        for (i, vertex) in simplex.iter().enumerate() {
            if i != worst {
                for (c, &x) in centroid.iter_mut().zip(vertex.iter()) {
                    *c += x;
                }
            }
        }
        for c in &mut centroid {
            *c /= n as f64;
        }

        let along = |from: &[f64], towards: &[f64], coeff: f64| -> Vec<f64> {
            from.iter()
                .zip(towards.iter())
                .map(|(f, t)| f + coeff * (t - f))
                .collect()
        };

        let reflected = clamp(
            centroid
                .iter()
                .zip(simplex[worst].iter())
                .map(|(c, w)| c + ALPHA * (c - w))
                .collect(),
        );
        let reflected_value = objective(&reflected);

        if reflected_value < values[best] {
            let expanded = clamp(along(&centroid, &reflected, GAMMA));
            let expanded_value = objective(&expanded);
            if expanded_value < reflected_value {
                simplex[worst] = expanded;
                values[worst] = expanded_value;
            } else {
                simplex[worst] = reflected;
                values[worst] = reflected_value;
            }
            continue;
        }

        if reflected_value < values[second_worst] {
            simplex[worst] = reflected;
            values[worst] = reflected_value;
            continue;
        }

        // Contract towards the better of {reflected, worst}.
        let anchor = if reflected_value < values[worst] {
            &reflected
        } else {
            &simplex[worst]
        };
        let contracted = clamp(along(&centroid, anchor, RHO));
        let contracted_value = objective(&contracted);
        if contracted_value < values[worst].min(reflected_value) {
            simplex[worst] = contracted;
            values[worst] = contracted_value;
            continue;
        }

        // Shrink every vertex towards the best.
        let best_vertex = simplex[best].clone();
        for i in 0..=n {
            if i != best {
                simplex[i] = clamp(along(&best_vertex, &simplex[i], SIGMA));
                values[i] = objective(&simplex[i]);
            }
        }
    }

    let best = values
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| i)
        .unwrap_or(0);

    SimplexResult {
        point: simplex[best].clone(),
        value: values[best],
        iterations,
        converged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimizes_quadratic_bowl() {
        let result = nelder_mead(
            |x| (x[0] - 1.0).powi(2) + (x[1] + 2.0).powi(2),
            &[0.0, 0.0],
            None,
            SimplexConfig::default(),
        );
        assert!(result.converged);
        assert!((result.point[0] - 1.0).abs() < 1e-3);
        assert!((result.point[1] + 2.0).abs() < 1e-3);
    }

    #[test]
    fn respects_bounds() {
        let bounds = [(-0.5, 0.5)];
        let result = nelder_mead(
            |x| (x[0] - 2.0).powi(2),
            &[0.0],
            Some(&bounds),
            SimplexConfig::default(),
        );
        assert!(result.point[0] <= 0.5 + 1e-12);
        assert!((result.point[0] - 0.5).abs() < 1e-3);
    }

    #[test]
    fn empty_input_returns_nan() {
        let result = nelder_mead(|_| 0.0, &[], None, SimplexConfig::default());
        assert!(result.value.is_nan());
        assert!(!result.converged);
    }

    #[test]
    fn iteration_cap_is_honored() {
        let config = SimplexConfig {
            max_iter: 3,
            ..Default::default()
        };
        let result = nelder_mead(|x| x[0].powi(2), &[100.0], None, config);
        assert!(result.iterations <= 3);
    }
}
