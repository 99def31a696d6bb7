use std::sync::atomic::Ordering;
use std::time::Instant;

use crate::error::GradError;
use crate::graph::tape::Tape;
use crate::model::model::{argmax, Model};
use crate::optim::sgd::Sgd;
use crate::train::batch::Batch;
use crate::train::epoch_stats::EpochStats;
use crate::train::train_config::TrainConfig;

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Trains `model` for `config.epochs` epochs over `batches` and returns the
/// mean training loss of the **last completed epoch**.
///
/// Every training step runs the same fixed sequence:
/// clear gradients → forward pass → loss → backward pass → optimizer step.
/// The explicit `zero_grad` at the top is what keeps each step's update
/// free of the previous step's accumulated gradients.
///
/// Batches are processed strictly in the order given, one at a time. Any
/// shape or label error raised while recording or differentiating a step
/// aborts the run and propagates to the caller; nothing is retried.
///
/// # Early termination
/// The loop breaks early if:
/// - the `progress_tx` receiver has been dropped, **or**
/// - `config.stop_flag` is set to `true`.
///
/// # Panics
/// Panics if `batches` is empty or any batch has no examples.
pub fn train_loop(
    model: &mut Model,
    batches: &[Batch],
    optimizer: &Sgd,
    config: &TrainConfig,
) -> Result<f64, GradError> {
    assert!(!batches.is_empty(), "batches must not be empty");
    assert!(
        batches.iter().all(|b| !b.is_empty()),
        "every batch must contain at least one example"
    );

    let mut last_train_loss = 0.0;

    for epoch in 1..=config.epochs {
        // Check stop flag at the top of each epoch.
        if let Some(ref flag) = config.stop_flag {
            if flag.load(Ordering::Relaxed) {
                break;
            }
        }

        let t_start = Instant::now();

        let train_loss = run_one_epoch(model, batches, optimizer)?;
        last_train_loss = train_loss;

        let elapsed_ms = t_start.elapsed().as_millis() as u64;
        let train_accuracy = compute_accuracy(model, batches)?;

        log::info!(
            "epoch {}/{}: loss = {:.6}, accuracy = {:.4}",
            epoch,
            config.epochs,
            train_loss,
            train_accuracy
        );

        let stats = EpochStats {
            epoch,
            total_epochs: config.epochs,
            train_loss,
            train_accuracy,
            elapsed_ms,
        };

        if let Some(ref tx) = config.progress_tx {
            // If the receiver has been dropped, stop training.
            if tx.send(stats).is_err() {
                break;
            }
        }
    }

    Ok(last_train_loss)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// One full pass over the batches. Returns the mean loss per example.
fn run_one_epoch(
    model: &mut Model,
    batches: &[Batch],
    optimizer: &Sgd,
) -> Result<f64, GradError> {
    let mut total_loss = 0.0;
    let mut total_examples = 0usize;

    for batch in batches {
        optimizer.zero_grad(model);

        // Each step records a fresh graph; the tape is dropped at the end
        // of the iteration.
        let mut tape = Tape::new();
        let input = tape.input(batch.inputs.clone());
        let log_probs = model.forward(&mut tape, input)?;
        let loss = tape.nll_loss(log_probs, &batch.labels)?;

        total_loss += tape.value(loss).data[0][0] * batch.len() as f64;
        total_examples += batch.len();

        tape.backward(loss, &mut model.params_mut())?;
        optimizer.step(model);
    }

    Ok(total_loss / total_examples as f64)
}

/// Fraction of examples classified correctly (argmax match) across all
/// batches, using inference-only forward passes.
fn compute_accuracy(model: &Model, batches: &[Batch]) -> Result<f64, GradError> {
    let mut correct = 0usize;
    let mut total = 0usize;

    for batch in batches {
        let log_probs = model.log_probs(&batch.inputs)?;
        correct += log_probs.data.iter()
            .zip(batch.labels.iter())
            .filter(|(row, &label)| argmax(row) == label)
            .count();
        total += batch.len();
    }

    Ok(correct as f64 / total as f64)
}
