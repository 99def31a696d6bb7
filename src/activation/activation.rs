use serde::{Serialize, Deserialize};

/// The closed set of activations a layer can apply after its affine
/// transform. Kept as a plain enum so the operation graph can dispatch on a
/// tag instead of trait objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    Identity,
    Relu,
    Sigmoid,
    /// LogSoftmax is a vector-valued activation; it is applied row-wise at
    /// the graph level (see `Tape::log_softmax`), not element-wise. The
    /// element-wise `function()` and `derivative()` methods are therefore
    /// not used for this variant.
    LogSoftmax,
}

impl Activation {
    /// Element-wise activation. For `LogSoftmax`, use `log_softmax_row`,
    /// which operates on the whole row; this path must not be reached.
    pub fn function(&self, x: f64) -> f64 {
        match self {
            Activation::Identity => x,
            Activation::Relu => if x > 0.0 { x } else { 0.0 },
            Activation::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            Activation::LogSoftmax => {
                panic!("Activation::LogSoftmax::function() must not be called directly; \
                        use Activation::log_softmax_row() which normalizes the full row.")
            }
        }
    }

    /// Element-wise local derivative at input `x`.
    ///
    /// ReLU's derivative at exactly 0 is defined as 0. Sigmoid recomputes
    /// f(x) here; the gradient engine instead uses the already-produced
    /// forward output (`Tape::backward`) to avoid the redundant work.
    pub fn derivative(&self, x: f64) -> f64 {
        match self {
            Activation::Identity => 1.0,
            Activation::Relu => if x > 0.0 { 1.0 } else { 0.0 },
            Activation::Sigmoid => {
                let fx = self.function(x);
                fx * (1.0 - fx)
            }
            Activation::LogSoftmax => {
                panic!("Activation::LogSoftmax::derivative() must not be called directly; \
                        the gradient engine applies the row-wise Jacobian.")
            }
        }
    }

    /// Numerically stable row-wise log-softmax:
    ///   log_softmax(x)_i = x_i - max(x) - log(Σ_j e^{x_j - max(x)})
    ///
    /// Subtracting the row maximum before exponentiating keeps every
    /// exponent ≤ 0, so no input magnitude can overflow.
    pub fn log_softmax_row(row: &[f64]) -> Vec<f64> {
        let max = row.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let log_sum: f64 = row.iter().map(|&x| (x - max).exp()).sum::<f64>().ln();
        row.iter().map(|&x| x - max - log_sum).collect()
    }
}
