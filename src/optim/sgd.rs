use crate::model::model::Model;

/// Stochastic gradient descent with a fixed learning rate.
pub struct Sgd {
    pub learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Sgd {
        Sgd { learning_rate }
    }

    /// Applies one update to every parameter in place:
    /// `p ← p - lr · grad(p)`.
    ///
    /// Uses whatever is in the accumulated gradient storage. The optimizer
    /// never clears gradients itself; call `zero_grad` before the backward
    /// pass that feeds this step, or updates will include stale
    /// contributions from earlier steps.
    pub fn step(&self, model: &mut Model) {
        for param in model.params_mut() {
            param.apply_step(self.learning_rate);
        }
    }

    /// The explicit clear operation: zeroes every accumulated gradient.
    pub fn zero_grad(&self, model: &mut Model) {
        model.zero_grad();
    }
}
