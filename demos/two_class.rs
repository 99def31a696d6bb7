use std::sync::mpsc;

use magnetite_grad::{
    Activation, Batch, Linear, Matrix, Model, Sgd, TrainConfig, train_loop,
};

/// Trains a single-layer classifier on a linearly separable two-feature
/// problem (class 0 when the first feature dominates) and streams per-epoch
/// progress over a channel.
fn main() {
    env_logger::init();

    let mut model = Model::new(vec![
        Linear::new(2, 2, Activation::LogSoftmax),
    ])
    .expect("layer sizes chain");

    let inputs = Matrix::from_data(vec![
        vec![1.0, 0.1],
        vec![0.9, 0.3],
        vec![0.8, 0.0],
        vec![1.2, 0.4],
        vec![0.1, 1.0],
        vec![0.3, 0.9],
        vec![0.0, 0.8],
        vec![0.4, 1.2],
    ]);
    let labels = vec![0, 0, 0, 0, 1, 1, 1, 1];

    let batch = Batch::new(inputs.clone(), labels).expect("labels match rows");
    let optimizer = Sgd::new(0.5);

    let (tx, rx) = mpsc::channel();
    let config = TrainConfig {
        epochs: 300,
        progress_tx: Some(tx),
        stop_flag: None,
    };

    let final_loss = train_loop(&mut model, &[batch], &optimizer, &config)
        .expect("training succeeds");

    for stats in rx.try_iter() {
        if stats.epoch % 50 == 0 {
            println!(
                "epoch {:>3}/{}: loss = {:.6}, accuracy = {:.2}",
                stats.epoch, stats.total_epochs, stats.train_loss, stats.train_accuracy
            );
        }
    }
    println!("Final loss: {final_loss:.6}");

    let predictions = model.predict(&inputs).expect("forward succeeds");
    for (input, class) in inputs.data.iter().zip(predictions.iter()) {
        println!("Input: {:?} -> class {}", input, class);
    }
}
