//! Closed-form ridge regression.
//!
//! Solves `(Xc'Xc + alpha*I) w = Xc'yc` on centered data via Gaussian
//! elimination; the feature count is small (around a dozen columns) so
//! the dense solve is cheap.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ridge {
    pub weights: Vec<f64>,
    pub intercept: f64,
}

impl Ridge {
    /// Fit with L2 penalty `alpha` (the intercept is not penalized).
    pub fn fit(x: &[Vec<f64>], y: &[f64], alpha: f64) -> Self {
        let n = x.len();
        let d = x.first().map_or(0, Vec::len);
        if n == 0 || d == 0 {
            return Self {
                weights: vec![0.0; d],
                intercept: 0.0,
            };
        }

        let mut x_means = vec![0.0; d];
        for row in x {
            for (m, v) in x_means.iter_mut().zip(row.iter()) {
                *m += v;
            }
        }
        for m in &mut x_means {
            *m /= n as f64;
        }
        let y_mean = y.iter().sum::<f64>() / n as f64;

        // Gram matrix and moment vector on centered data
        let mut gram = vec![vec![0.0; d]; d];
        let mut moment = vec![0.0; d];
        for (row, &target) in x.iter().zip(y.iter()) {
            let yc = target - y_mean;
            for j in 0..d {
                let xj = row[j] - x_means[j];
                moment[j] += xj * yc;
                for k in j..d {
                    gram[j][k] += xj * (row[k] - x_means[k]);
                }
            }
        }
        for j in 0..d {
            for k in 0..j {
                gram[j][k] = gram[k][j];
            }
            gram[j][j] += alpha;
        }

        let weights = solve(gram, moment).unwrap_or_else(|| vec![0.0; d]);
        let intercept = y_mean
            - weights
                .iter()
                .zip(x_means.iter())
                .map(|(w, m)| w * m)
                .sum::<f64>();

        Self { weights, intercept }
    }

    #[must_use]
    pub fn predict(&self, row: &[f64]) -> f64 {
        self.intercept
            + self
                .weights
                .iter()
                .zip(row.iter())
                .map(|(w, x)| w * x)
                .sum::<f64>()
    }
}

/// Solve `a * x = b` by Gaussian elimination with partial pivoting.
fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Option<Vec<f64>> {
    let n = b.len();
    for col in 0..n {
        let pivot = (col..n).max_by(|&i, &j| {
            a[i][col]
                .abs()
                .partial_cmp(&a[j][col].abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })?;
        if a[pivot][col].abs() < 1e-12 {
            return None;
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in (col + 1)..n {
            let factor = a[row][col] / a[col][col];
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for col in (0..n).rev() {
        let mut sum = b[col];
        for k in (col + 1)..n {
            sum -= a[col][k] * x[k];
        }
        x[col] = sum / a[col][col];
    }
    Some(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recovers_linear_relation() {
        // y = 2x + 1
        let x: Vec<Vec<f64>> = (0..20).map(|i| vec![f64::from(i)]).collect();
        let y: Vec<f64> = (0..20).map(|i| 2.0 * f64::from(i) + 1.0).collect();
        let model = Ridge::fit(&x, &y, 1e-6);
        assert!((model.weights[0] - 2.0).abs() < 1e-3);
        assert!((model.intercept - 1.0).abs() < 1e-2);
        assert!((model.predict(&[10.0]) - 21.0).abs() < 0.05);
    }

    #[test]
    fn test_two_features() {
        // y = 3a - b + 5
        let mut x = Vec::new();
        let mut y = Vec::new();
        for a in 0..10 {
            for b in 0..10 {
                x.push(vec![f64::from(a), f64::from(b)]);
                y.push(3.0 * f64::from(a) - f64::from(b) + 5.0);
            }
        }
        let model = Ridge::fit(&x, &y, 1e-6);
        assert!((model.weights[0] - 3.0).abs() < 1e-3);
        assert!((model.weights[1] + 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_regularization_shrinks_weights() {
        let x: Vec<Vec<f64>> = (0..20).map(|i| vec![f64::from(i)]).collect();
        let y: Vec<f64> = (0..20).map(|i| 2.0 * f64::from(i)).collect();
        let loose = Ridge::fit(&x, &y, 1e-6);
        let tight = Ridge::fit(&x, &y, 1000.0);
        assert!(tight.weights[0].abs() < loose.weights[0].abs());
    }

    #[test]
    fn test_empty_input() {
        let model = Ridge::fit(&[], &[], 1.0);
        assert!(model.weights.is_empty());
        assert_eq!(model.intercept, 0.0);
    }
}
