use serde::{Serialize, Deserialize};

use crate::activation::activation::Activation;
use crate::error::GradError;
use crate::layers::linear::Linear;
use crate::model::model::Model;

/// Describes one layer in a model specification.
///
/// Fields:
/// - `size`       — number of output features of this layer
/// - `input_size` — number of features feeding into this layer (i.e. the
///                  output size of the previous layer, or the raw input
///                  dimension for the first layer)
/// - `activation` — activation applied after the affine transform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerSpec {
    pub size: usize,
    pub input_size: usize,
    pub activation: Activation,
}

/// A fully serializable description of a model architecture.
///
/// A `ModelSpec` can be saved to / loaded from JSON independently of any
/// trained weights, so architecture configurations can be stored before
/// training starts. `build` instantiates it with fresh random weights.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSpec {
    /// Human-readable name used as the model file stem.
    pub name: String,
    /// Ordered list of layer descriptions (input → output).
    pub layers: Vec<LayerSpec>,
}

impl ModelSpec {
    /// Instantiates the described architecture with randomly initialized
    /// weights. Fails if the layer widths do not chain.
    pub fn build(&self) -> Result<Model, GradError> {
        let layers = self.layers.iter()
            .map(|spec| Linear::new(spec.size, spec.input_size, spec.activation))
            .collect();
        Model::new(layers)
    }

    /// Serializes the spec to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<(), GradError> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a `ModelSpec` from a JSON file.
    pub fn load_json(path: &str) -> Result<ModelSpec, GradError> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}
