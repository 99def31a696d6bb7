use thiserror::Error;

/// Errors surfaced by graph construction, model composition, and training.
///
/// Every fallible public API in this crate returns `Result<_, GradError>`.
/// All variants are fatal to the current training step; nothing is retried
/// or recovered internally.
#[derive(Debug, Error)]
pub enum GradError {
    /// An operation was recorded with operands whose shapes do not compose.
    #[error("shape mismatch in {op}: left is {left_rows}x{left_cols}, right is {right_rows}x{right_cols}")]
    ShapeMismatch {
        op: &'static str,
        left_rows: usize,
        left_cols: usize,
        right_rows: usize,
        right_cols: usize,
    },

    /// A layer's expected input width does not match what it was fed.
    #[error("layer expected input of width {expected}, got {actual}")]
    InputWidthMismatch { expected: usize, actual: usize },

    /// Two adjacent layers in a model do not chain: layer `layer` consumes
    /// `actual` features but the previous layer produces `expected`.
    #[error("layer {layer} consumes {actual} features but the previous layer produces {expected}")]
    LayerChainMismatch {
        layer: usize,
        expected: usize,
        actual: usize,
    },

    /// A model must contain at least one layer.
    #[error("model has no layers")]
    EmptyModel,

    /// A class label lies outside the valid class range.
    #[error("label {label} out of range for {classes} classes")]
    LabelOutOfRange { label: usize, classes: usize },

    /// The number of labels does not match the number of batch rows.
    #[error("batch has {rows} rows but {labels} labels")]
    LabelCountMismatch { rows: usize, labels: usize },

    /// `backward` was invoked on a non-scalar root node.
    #[error("backward root must be a 1x1 scalar, got {rows}x{cols}")]
    NonScalarRoot { rows: usize, cols: usize },

    /// A `Param` node referenced an index outside the model's parameter list.
    #[error("parameter index {index} out of range ({count} parameters)")]
    ParamIndexOutOfRange { index: usize, count: usize },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
