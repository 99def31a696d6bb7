use serde::{Serialize, Deserialize};

use crate::math::matrix::Matrix;

/// A trainable tensor (weight matrix or bias row) together with its
/// accumulated gradient.
///
/// The gradient is the same shape as the value and is only ever cleared by
/// an explicit `zero_grad` call. Backward passes *add* into it, so running
/// two backward passes without clearing yields the sum of both
/// contributions. The training loop is responsible for clearing at the
/// start of every step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    pub value: Matrix,
    pub grad: Matrix,
}

impl Parameter {
    pub fn new(value: Matrix) -> Parameter {
        let grad = Matrix::zeros(value.rows, value.cols);
        Parameter { value, grad }
    }

    /// Resets the accumulated gradient to zero.
    pub fn zero_grad(&mut self) {
        self.grad = Matrix::zeros(self.value.rows, self.value.cols);
    }

    /// Adds a backward-pass contribution into the accumulated gradient.
    pub fn accumulate(&mut self, contribution: &Matrix) {
        self.grad.add_assign(contribution);
    }

    /// In-place SGD update: `value ← value - lr · grad`.
    pub fn apply_step(&mut self, lr: f64) {
        let scaled = self.grad.map(|g| g * lr);
        self.value = self.value.clone() - scaled;
    }
}
