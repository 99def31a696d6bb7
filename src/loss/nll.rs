use crate::error::GradError;
use crate::math::matrix::Matrix;

/// Mean negative log-likelihood over a batch of per-class log-probabilities,
/// as produced by a LogSoftmax output layer.
pub struct NllLoss;

impl NllLoss {
    /// Scalar loss:
    ///   L = -(1/N) Σ_i log_probs[i][labels[i]]
    ///
    /// `log_probs` — one row of class log-probabilities per example
    /// `labels`    — true class index per example
    ///
    /// Fails if the label count does not match the batch rows or any label
    /// falls outside the class range.
    pub fn loss(log_probs: &Matrix, labels: &[usize]) -> Result<f64, GradError> {
        Self::validate(log_probs, labels)?;
        let total: f64 = labels.iter()
            .enumerate()
            .map(|(i, &label)| -log_probs.data[i][label])
            .sum();
        Ok(total / log_probs.rows as f64)
    }

    /// Gradient of the scalar loss w.r.t. the log-probability matrix, scaled
    /// by the upstream gradient `upstream` (1.0 when the loss is the root):
    /// `-upstream/N` at each example's true-class position, 0 elsewhere.
    ///
    /// The 1/N factor is where the batch-mean reduction enters every
    /// per-example gradient path.
    pub fn input_gradient(rows: usize, cols: usize, labels: &[usize], upstream: f64) -> Matrix {
        let mut grad = Matrix::zeros(rows, cols);
        let scale = -upstream / rows as f64;
        for (i, &label) in labels.iter().enumerate() {
            grad.data[i][label] = scale;
        }
        grad
    }

    fn validate(log_probs: &Matrix, labels: &[usize]) -> Result<(), GradError> {
        if labels.len() != log_probs.rows {
            return Err(GradError::LabelCountMismatch {
                rows: log_probs.rows,
                labels: labels.len(),
            });
        }
        for &label in labels {
            if label >= log_probs.cols {
                return Err(GradError::LabelOutOfRange {
                    label,
                    classes: log_probs.cols,
                });
            }
        }
        Ok(())
    }
}
