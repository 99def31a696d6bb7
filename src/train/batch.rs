use crate::error::GradError;
use crate::math::matrix::Matrix;

/// A fixed group of training examples: one input row per example plus the
/// true class index for each row.
///
/// Batch construction (normalization, shuffling, splitting) is the data
/// pipeline's job; the training loop consumes prepared batches in the order
/// given.
#[derive(Debug, Clone)]
pub struct Batch {
    pub inputs: Matrix,
    pub labels: Vec<usize>,
}

impl Batch {
    /// Pairs an input matrix with its labels. Fails if the label count does
    /// not match the number of rows.
    pub fn new(inputs: Matrix, labels: Vec<usize>) -> Result<Batch, GradError> {
        if inputs.rows != labels.len() {
            return Err(GradError::LabelCountMismatch {
                rows: inputs.rows,
                labels: labels.len(),
            });
        }
        Ok(Batch { inputs, labels })
    }

    /// Number of examples in the batch.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
