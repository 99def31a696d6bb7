use crate::math::matrix::Matrix;

/// Arena index of a node on the tape. Handles are only meaningful for the
/// tape that issued them and only until that tape is dropped.
pub type NodeId = usize;

/// One differentiable operation recorded during a forward pass.
///
/// The set of operations is closed: a feed-forward classifier needs exactly
/// an affine transform, the three activations, and the loss reduction.
/// Inputs are referenced by `NodeId`, so the variants double as the edges
/// of the graph.
#[derive(Debug, Clone)]
pub enum Op {
    /// A raw batch fed into the graph. Receives no persistent gradient.
    Input,
    /// A snapshot of a trainable parameter. `index` addresses the model's
    /// flat parameter list; backward accumulates into that parameter's
    /// gradient storage.
    Param { index: usize },
    /// `value = lhs · rhs` (matrix product).
    MatMul { lhs: NodeId, rhs: NodeId },
    /// `value = input + bias`, with the 1-row bias broadcast over rows.
    AddBias { input: NodeId, bias: NodeId },
    /// Element-wise `max(0, x)`.
    Relu { input: NodeId },
    /// Element-wise `1 / (1 + e^-x)`.
    Sigmoid { input: NodeId },
    /// Row-wise numerically stable `log(softmax(x))`.
    LogSoftmax { input: NodeId },
    /// Scalar mean negative log-likelihood of the true classes.
    NllLoss { log_probs: NodeId, labels: Vec<usize> },
}

/// A recorded operation together with its forward value and the gradient
/// accumulated for it during the backward scan.
#[derive(Debug, Clone)]
pub struct Node {
    pub op: Op,
    pub value: Matrix,
    /// ∂loss/∂value, same shape as `value`. Zeroed at the start of each
    /// backward pass; fan-out contributions sum into it.
    pub grad: Matrix,
}

impl Node {
    pub fn new(op: Op, value: Matrix) -> Node {
        let grad = Matrix::zeros(value.rows, value.cols);
        Node { op, value, grad }
    }
}
