use crate::activation::activation::Activation;
use crate::error::GradError;
use crate::graph::node::{Node, NodeId, Op};
use crate::layers::param::Parameter;
use crate::loss::nll::NllLoss;
use crate::math::matrix::Matrix;

/// Records one forward pass as a flat arena of operation nodes, then
/// replays it in reverse to compute gradients.
///
/// Nodes are appended in the order they are produced, so every node's
/// inputs have smaller ids than the node itself. Reverse-topological order
/// is therefore just a reverse index scan; no explicit sort is needed.
///
/// A tape is ephemeral: build one per training step, run `backward` once,
/// drop it. Parameter gradients outlive the tape because they are
/// accumulated into the `Parameter` storage passed to `backward`, not kept
/// on the nodes.
#[derive(Debug, Default)]
pub struct Tape {
    nodes: Vec<Node>,
}

impl Tape {
    pub fn new() -> Tape {
        Tape { nodes: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Forward value of a recorded node.
    pub fn value(&self, id: NodeId) -> &Matrix {
        &self.nodes[id].value
    }

    /// Gradient accumulated for a node by the last `backward` call.
    /// Useful for inspecting non-parameter intermediates in tests.
    pub fn grad(&self, id: NodeId) -> &Matrix {
        &self.nodes[id].grad
    }

    fn push(&mut self, op: Op, value: Matrix) -> NodeId {
        self.nodes.push(Node::new(op, value));
        self.nodes.len() - 1
    }

    /// Records a raw input batch (one example per row). Inputs are not
    /// trainable; backward propagates through them but stores nothing.
    pub fn input(&mut self, value: Matrix) -> NodeId {
        self.push(Op::Input, value)
    }

    /// Records a snapshot of a trainable parameter. `index` must address
    /// the same slot in the parameter slice later given to `backward`.
    pub fn param(&mut self, index: usize, param: &Parameter) -> NodeId {
        self.push(Op::Param { index }, param.value.clone())
    }

    /// Records `lhs · rhs`. Fails if the inner dimensions do not agree.
    pub fn matmul(&mut self, lhs: NodeId, rhs: NodeId) -> Result<NodeId, GradError> {
        let (l, r) = (&self.nodes[lhs].value, &self.nodes[rhs].value);
        if l.cols != r.rows {
            return Err(GradError::ShapeMismatch {
                op: "matmul",
                left_rows: l.rows,
                left_cols: l.cols,
                right_rows: r.rows,
                right_cols: r.cols,
            });
        }
        let value = l.clone() * r.clone();
        Ok(self.push(Op::MatMul { lhs, rhs }, value))
    }

    /// Records `input + bias` with the 1-row bias broadcast over every row
    /// of `input`. Fails unless `bias` is `1×m` and `input` is `N×m`.
    pub fn add_bias(&mut self, input: NodeId, bias: NodeId) -> Result<NodeId, GradError> {
        let (x, b) = (&self.nodes[input].value, &self.nodes[bias].value);
        if b.rows != 1 || x.cols != b.cols {
            return Err(GradError::ShapeMismatch {
                op: "add_bias",
                left_rows: x.rows,
                left_cols: x.cols,
                right_rows: b.rows,
                right_cols: b.cols,
            });
        }
        let mut value = x.clone();
        for row in &mut value.data {
            for (j, v) in row.iter_mut().enumerate() {
                *v += b.data[0][j];
            }
        }
        Ok(self.push(Op::AddBias { input, bias }, value))
    }

    /// Records element-wise `max(0, x)`.
    pub fn relu(&mut self, input: NodeId) -> NodeId {
        let value = self.nodes[input].value.map(|x| Activation::Relu.function(x));
        self.push(Op::Relu { input }, value)
    }

    /// Records element-wise `1 / (1 + e^-x)`.
    pub fn sigmoid(&mut self, input: NodeId) -> NodeId {
        let value = self.nodes[input].value.map(|x| Activation::Sigmoid.function(x));
        self.push(Op::Sigmoid { input }, value)
    }

    /// Records row-wise stable log-softmax.
    pub fn log_softmax(&mut self, input: NodeId) -> NodeId {
        let data = self.nodes[input].value.data.iter()
            .map(|row| Activation::log_softmax_row(row))
            .collect();
        self.push(Op::LogSoftmax { input }, Matrix::from_data(data))
    }

    /// Records the scalar mean negative log-likelihood of `labels` under the
    /// log-probabilities at `log_probs`. Fails on label-count mismatch or an
    /// out-of-range label.
    pub fn nll_loss(&mut self, log_probs: NodeId, labels: &[usize]) -> Result<NodeId, GradError> {
        let loss = NllLoss::loss(&self.nodes[log_probs].value, labels)?;
        let value = Matrix::from_data(vec![vec![loss]]);
        Ok(self.push(
            Op::NllLoss { log_probs, labels: labels.to_vec() },
            value,
        ))
    }

    /// Reverse-mode differentiation from the scalar node `root`.
    ///
    /// Seeds `∂root/∂root = 1`, scans the arena in reverse, and for each
    /// node multiplies the incoming gradient by the op's local Jacobian
    /// (in its efficient matrix form) and adds the result onto each input's
    /// gradient. Fan-out sums naturally because every edge *adds*.
    ///
    /// `Param` leaves accumulate into `params[index].grad` — again adding,
    /// never overwriting, so calling `backward` twice without clearing
    /// doubles the stored gradients. `Input` leaves store nothing.
    pub fn backward(
        &mut self,
        root: NodeId,
        params: &mut [&mut Parameter],
    ) -> Result<(), GradError> {
        let root_value = &self.nodes[root].value;
        if root_value.rows != 1 || root_value.cols != 1 {
            return Err(GradError::NonScalarRoot {
                rows: root_value.rows,
                cols: root_value.cols,
            });
        }

        // Fresh node gradients for this pass; the tape itself never carries
        // gradients across backward calls.
        for node in &mut self.nodes {
            node.grad = Matrix::zeros(node.value.rows, node.value.cols);
        }
        self.nodes[root].grad.data[0][0] = 1.0;

        for id in (0..=root).rev() {
            let op = self.nodes[id].op.clone();
            let grad = self.nodes[id].grad.clone();

            match op {
                Op::Input => {}
                Op::Param { index } => {
                    let count = params.len();
                    let param = params.get_mut(index)
                        .ok_or(GradError::ParamIndexOutOfRange { index, count })?;
                    param.accumulate(&grad);
                }
                Op::MatMul { lhs, rhs } => {
                    // y = a·b  ⇒  ∂L/∂a = g·bᵀ,  ∂L/∂b = aᵀ·g
                    let ga = grad.clone() * self.nodes[rhs].value.transpose();
                    let gb = self.nodes[lhs].value.transpose() * grad;
                    self.nodes[lhs].grad.add_assign(&ga);
                    self.nodes[rhs].grad.add_assign(&gb);
                }
                Op::AddBias { input, bias } => {
                    // The broadcast bias collects every row's contribution.
                    let gb = grad.column_sums();
                    self.nodes[input].grad.add_assign(&grad);
                    self.nodes[bias].grad.add_assign(&gb);
                }
                Op::Relu { input } => {
                    let mask = self.nodes[input].value
                        .map(|x| Activation::Relu.derivative(x));
                    let gx = grad.hadamard(&mask);
                    self.nodes[input].grad.add_assign(&gx);
                }
                Op::Sigmoid { input } => {
                    // σ'(x) = σ(x)·(1-σ(x)), computed from the forward
                    // output already on this node.
                    let deriv = self.nodes[id].value.map(|y| y * (1.0 - y));
                    let gx = grad.hadamard(&deriv);
                    self.nodes[input].grad.add_assign(&gx);
                }
                Op::LogSoftmax { input } => {
                    // Row-wise: ∂L/∂x_j = g_j - e^{y_j} · Σ_k g_k
                    let y = &self.nodes[id].value;
                    let data = grad.data.iter().zip(y.data.iter())
                        .map(|(g_row, y_row)| {
                            let g_sum: f64 = g_row.iter().sum();
                            g_row.iter().zip(y_row.iter())
                                .map(|(&g, &y)| g - y.exp() * g_sum)
                                .collect()
                        })
                        .collect();
                    let gx = Matrix::from_data(data);
                    self.nodes[input].grad.add_assign(&gx);
                }
                Op::NllLoss { log_probs, labels } => {
                    let target = &self.nodes[log_probs].value;
                    let gx = NllLoss::input_gradient(
                        target.rows,
                        target.cols,
                        &labels,
                        grad.data[0][0],
                    );
                    self.nodes[log_probs].grad.add_assign(&gx);
                }
            }
        }

        Ok(())
    }
}
