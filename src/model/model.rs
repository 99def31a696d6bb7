use serde::{Serialize, Deserialize};

use crate::error::GradError;
use crate::graph::node::NodeId;
use crate::graph::tape::Tape;
use crate::layers::linear::Linear;
use crate::layers::param::Parameter;
use crate::math::matrix::Matrix;

/// An ordered stack of `Linear` layers forming a feed-forward network.
///
/// The model owns every trainable `Parameter`. Layer shapes are validated
/// at construction: a composition whose widths do not chain is rejected
/// before any forward pass can run.
#[derive(Serialize, Deserialize)]
pub struct Model {
    pub layers: Vec<Linear>,
}

impl Model {
    pub fn new(layers: Vec<Linear>) -> Result<Model, GradError> {
        if layers.is_empty() {
            return Err(GradError::EmptyModel);
        }
        for i in 1..layers.len() {
            if layers[i].input_size != layers[i - 1].size {
                return Err(GradError::LayerChainMismatch {
                    layer: i,
                    expected: layers[i - 1].size,
                    actual: layers[i].input_size,
                });
            }
        }
        Ok(Model { layers })
    }

    /// Number of input features the first layer expects.
    pub fn input_size(&self) -> usize {
        self.layers[0].input_size
    }

    /// Number of classes the last layer produces.
    pub fn output_size(&self) -> usize {
        self.layers[self.layers.len() - 1].size
    }

    /// Records the whole network's forward pass on `tape`, threading the
    /// output of each layer into the next. Layer *i*'s parameters occupy
    /// flat indices `2i` (weights) and `2i + 1` (biases), matching the
    /// order of `params_mut`.
    pub fn forward(&self, tape: &mut Tape, input: NodeId) -> Result<NodeId, GradError> {
        let mut current = input;
        for (i, layer) in self.layers.iter().enumerate() {
            current = layer.forward(tape, current, 2 * i)?;
        }
        Ok(current)
    }

    /// The flat parameter list referenced by `Op::Param` indices: weights
    /// then biases, layer by layer.
    pub fn params_mut(&mut self) -> Vec<&mut Parameter> {
        let mut params = Vec::with_capacity(self.layers.len() * 2);
        for layer in &mut self.layers {
            params.push(&mut layer.weights);
            params.push(&mut layer.biases);
        }
        params
    }

    /// Clears every accumulated parameter gradient.
    pub fn zero_grad(&mut self) {
        for layer in &mut self.layers {
            layer.zero_grad();
        }
    }

    /// Inference-only forward pass: runs the batch through a throwaway tape
    /// and returns the per-row class log-probabilities. Exponentiate to get
    /// probabilities.
    pub fn log_probs(&self, inputs: &Matrix) -> Result<Matrix, GradError> {
        let mut tape = Tape::new();
        let x = tape.input(inputs.clone());
        let out = self.forward(&mut tape, x)?;
        Ok(tape.value(out).clone())
    }

    /// Predicted class (argmax of the output row) for every example.
    pub fn predict(&self, inputs: &Matrix) -> Result<Vec<usize>, GradError> {
        let log_probs = self.log_probs(inputs)?;
        Ok(log_probs.data.iter().map(|row| argmax(row)).collect())
    }

    /// Serializes the model (architecture and weights) to a pretty-printed
    /// JSON file.
    pub fn save_json(&self, path: &str) -> Result<(), GradError> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a model from a JSON file previously written by
    /// `save_json`, re-validating the layer chain.
    pub fn load_json(path: &str) -> Result<Model, GradError> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let model: Model = serde_json::from_reader(reader)?;
        Model::new(model.layers)
    }
}

/// Index of the maximum element in a slice.
pub(crate) fn argmax(v: &[f64]) -> usize {
    v.iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| i)
        .unwrap_or(0)
}
