use serde::{Serialize, Deserialize};

use crate::activation::activation::Activation;
use crate::error::GradError;
use crate::graph::node::NodeId;
use crate::graph::tape::Tape;
use crate::layers::param::Parameter;
use crate::math::matrix::Matrix;

/// A fully-connected layer: `output = activation(input · W + b)`.
///
/// Weights are `input_size × size` so a batch (one example per row)
/// multiplies from the left; biases are a single broadcast row. Both are
/// `Parameter`s and carry their own accumulated gradients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Linear {
    pub size: usize,
    pub input_size: usize,
    pub weights: Parameter,
    pub biases: Parameter,
    pub activation: Activation,
}

impl Linear {
    /// Creates a layer with randomized weights: He initialization before
    /// ReLU, Xavier otherwise. Biases start at zero.
    pub fn new(size: usize, input_size: usize, activation: Activation) -> Linear {
        let weights = match activation {
            Activation::Relu => Matrix::he(input_size, size),
            _ => Matrix::xavier(input_size, size),
        };
        Linear {
            size,
            input_size,
            weights: Parameter::new(weights),
            biases: Parameter::new(Matrix::zeros(1, size)),
            activation,
        }
    }

    /// Creates a layer from explicit weight and bias matrices. Used for
    /// deterministic construction (golden tests, loaded models).
    pub fn from_parts(
        weights: Matrix,
        biases: Matrix,
        activation: Activation,
    ) -> Result<Linear, GradError> {
        if biases.rows != 1 || biases.cols != weights.cols {
            return Err(GradError::ShapeMismatch {
                op: "linear_from_parts",
                left_rows: weights.rows,
                left_cols: weights.cols,
                right_rows: biases.rows,
                right_cols: biases.cols,
            });
        }
        Ok(Linear {
            size: weights.cols,
            input_size: weights.rows,
            weights: Parameter::new(weights),
            biases: Parameter::new(biases),
            activation,
        })
    }

    /// Records this layer's forward computation on the tape.
    ///
    /// `param_base` is the flat index of this layer's weight parameter in
    /// the model's parameter list; the bias is `param_base + 1`. Fails if
    /// the incoming batch width does not match `input_size`.
    pub fn forward(
        &self,
        tape: &mut Tape,
        input: NodeId,
        param_base: usize,
    ) -> Result<NodeId, GradError> {
        if tape.value(input).cols != self.input_size {
            return Err(GradError::InputWidthMismatch {
                expected: self.input_size,
                actual: tape.value(input).cols,
            });
        }

        let w = tape.param(param_base, &self.weights);
        let b = tape.param(param_base + 1, &self.biases);
        let z = tape.matmul(input, w)?;
        let z = tape.add_bias(z, b)?;

        Ok(match self.activation {
            Activation::Identity => z,
            Activation::Relu => tape.relu(z),
            Activation::Sigmoid => tape.sigmoid(z),
            Activation::LogSoftmax => tape.log_softmax(z),
        })
    }

    /// Clears the accumulated gradients of both parameters.
    pub fn zero_grad(&mut self) {
        self.weights.zero_grad();
        self.biases.zero_grad();
    }
}
