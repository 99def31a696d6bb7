//! Forward-pass exactness, numerical stability, and error-path tests for
//! the operation graph and model composition.

use magnetite_grad::{
    Activation, Batch, GradError, Linear, Matrix, Model, ModelSpec, LayerSpec, Tape,
};

const TOLERANCE: f64 = 1e-9;

fn floats_close(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() < tolerance
}

#[test]
fn test_linear_forward_is_affine_transform() {
    let weights = Matrix::from_data(vec![
        vec![1.0, -2.0],
        vec![0.5, 3.0],
        vec![-1.5, 0.25],
    ]);
    let biases = Matrix::from_data(vec![vec![0.1, -0.2]]);
    let layer = Linear::from_parts(weights, biases, Activation::Identity)
        .expect("shapes cohere");
    let model = Model::new(vec![layer]).expect("single layer chains");

    let inputs = Matrix::from_data(vec![
        vec![1.0, 2.0, 3.0],
        vec![-1.0, 0.0, 4.0],
    ]);
    let out = model.log_probs(&inputs).expect("forward succeeds");

    // Row 0: [1*1 + 2*0.5 + 3*(-1.5) + 0.1, 1*(-2) + 2*3 + 3*0.25 - 0.2]
    assert!(floats_close(out.data[0][0], -2.4, TOLERANCE));
    assert!(floats_close(out.data[0][1], 4.55, TOLERANCE));
    // Row 1: [-1*1 + 4*(-1.5) + 0.1, -1*(-2) + 4*0.25 - 0.2]
    assert!(floats_close(out.data[1][0], -6.9, TOLERANCE));
    assert!(floats_close(out.data[1][1], 2.8, TOLERANCE));
}

#[test]
fn test_relu_and_sigmoid_values() {
    let mut tape = Tape::new();
    let x = tape.input(Matrix::from_data(vec![vec![-2.0, 0.0, 3.0]]));

    let r = tape.relu(x);
    assert_eq!(tape.value(r).data[0], vec![0.0, 0.0, 3.0]);

    let s = tape.sigmoid(x);
    assert!(floats_close(tape.value(s).data[0][0], 1.0 / (1.0 + 2.0f64.exp()), TOLERANCE));
    assert!(floats_close(tape.value(s).data[0][1], 0.5, TOLERANCE));
    assert!(floats_close(tape.value(s).data[0][2], 1.0 / (1.0 + (-3.0f64).exp()), TOLERANCE));
}

#[test]
fn test_log_softmax_rows_normalize_even_for_extreme_inputs() {
    let mut tape = Tape::new();
    let x = tape.input(Matrix::from_data(vec![
        vec![0.0, 0.0, 0.0],
        vec![1e4, -1e4, 0.0],
        vec![-1e4, -1e4, -1e4],
        vec![500.0, 499.0, 498.0],
    ]));
    let y = tape.log_softmax(x);

    for row in &tape.value(y).data {
        assert!(row.iter().all(|v| v.is_finite()), "non-finite log-prob in {row:?}");
        let prob_sum: f64 = row.iter().map(|v| v.exp()).sum();
        assert!(
            floats_close(prob_sum, 1.0, TOLERANCE),
            "probabilities sum to {prob_sum}, not 1"
        );
    }

    // Uniform row: each log-prob is exactly -ln(3).
    let ln3 = 3.0f64.ln();
    for &v in &tape.value(y).data[0] {
        assert!(floats_close(v, -ln3, TOLERANCE));
    }
}

#[test]
fn test_mismatched_layer_chain_fails_before_forward() {
    let result = Model::new(vec![
        Linear::new(3, 4, Activation::Relu),
        Linear::new(2, 5, Activation::LogSoftmax),
    ]);
    assert!(matches!(
        result,
        Err(GradError::LayerChainMismatch { layer: 1, expected: 3, actual: 5 })
    ));
}

#[test]
fn test_empty_model_is_rejected() {
    assert!(matches!(Model::new(vec![]), Err(GradError::EmptyModel)));
}

#[test]
fn test_wrong_input_width_fails_at_forward() {
    let model = Model::new(vec![Linear::new(2, 4, Activation::Identity)])
        .expect("single layer chains");
    let inputs = Matrix::from_data(vec![vec![1.0, 2.0, 3.0]]);
    assert!(matches!(
        model.log_probs(&inputs),
        Err(GradError::InputWidthMismatch { expected: 4, actual: 3 })
    ));
}

#[test]
fn test_label_out_of_range_fails_at_loss() {
    let mut tape = Tape::new();
    let x = tape.input(Matrix::from_data(vec![vec![0.0, 0.0]]));
    let y = tape.log_softmax(x);
    assert!(matches!(
        tape.nll_loss(y, &[2]),
        Err(GradError::LabelOutOfRange { label: 2, classes: 2 })
    ));
}

#[test]
fn test_label_count_mismatch_fails_at_loss() {
    let mut tape = Tape::new();
    let x = tape.input(Matrix::from_data(vec![vec![0.0, 0.0], vec![0.0, 0.0]]));
    let y = tape.log_softmax(x);
    assert!(matches!(
        tape.nll_loss(y, &[0]),
        Err(GradError::LabelCountMismatch { rows: 2, labels: 1 })
    ));
}

#[test]
fn test_backward_requires_scalar_root() {
    let mut tape = Tape::new();
    let x = tape.input(Matrix::from_data(vec![vec![1.0, 2.0]]));
    let y = tape.relu(x);
    assert!(matches!(
        tape.backward(y, &mut []),
        Err(GradError::NonScalarRoot { rows: 1, cols: 2 })
    ));
}

#[test]
fn test_batch_rejects_mismatched_labels() {
    let inputs = Matrix::from_data(vec![vec![1.0], vec![2.0]]);
    assert!(matches!(
        Batch::new(inputs, vec![0]),
        Err(GradError::LabelCountMismatch { rows: 2, labels: 1 })
    ));
}

#[test]
fn test_model_spec_builds_chained_architecture() {
    let spec = ModelSpec {
        name: "classifier".to_string(),
        layers: vec![
            LayerSpec { size: 5, input_size: 4, activation: Activation::Relu },
            LayerSpec { size: 3, input_size: 5, activation: Activation::LogSoftmax },
        ],
    };
    let model = spec.build().expect("spec chains");
    assert_eq!(model.input_size(), 4);
    assert_eq!(model.output_size(), 3);
}

#[test]
fn test_model_spec_with_broken_chain_fails_to_build() {
    let spec = ModelSpec {
        name: "broken".to_string(),
        layers: vec![
            LayerSpec { size: 5, input_size: 4, activation: Activation::Relu },
            LayerSpec { size: 3, input_size: 6, activation: Activation::LogSoftmax },
        ],
    };
    assert!(matches!(
        spec.build(),
        Err(GradError::LayerChainMismatch { .. })
    ));
}

#[test]
fn test_model_json_roundtrip() {
    let weights = Matrix::from_data(vec![vec![0.5, -0.5], vec![1.0, 2.0]]);
    let biases = Matrix::from_data(vec![vec![0.25, -0.75]]);
    let layer = Linear::from_parts(weights, biases, Activation::LogSoftmax)
        .expect("shapes cohere");
    let model = Model::new(vec![layer]).expect("single layer chains");

    let path = std::env::temp_dir().join("magnetite_grad_roundtrip_test.json");
    let path = path.to_str().expect("utf-8 temp path");

    model.save_json(path).expect("save succeeds");
    let restored = Model::load_json(path).expect("load succeeds");
    let _ = std::fs::remove_file(path);

    assert_eq!(restored.layers.len(), 1);
    assert_eq!(restored.layers[0].weights.value, model.layers[0].weights.value);
    assert_eq!(restored.layers[0].biases.value, model.layers[0].biases.value);
    assert_eq!(restored.layers[0].activation, Activation::LogSoftmax);
}
