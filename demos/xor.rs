use magnetite_grad::{
    Activation, Batch, Linear, Matrix, Model, Sgd, TrainConfig, train_loop,
};

fn main() {
    env_logger::init();

    let mut model = Model::new(vec![
        Linear::new(8, 2, Activation::Relu),
        Linear::new(2, 8, Activation::LogSoftmax),
    ])
    .expect("layer sizes chain");

    let inputs = Matrix::from_data(vec![
        vec![0.0, 0.0],
        vec![0.0, 1.0],
        vec![1.0, 0.0],
        vec![1.0, 1.0],
    ]);
    // Class 1 = "the inputs differ".
    let labels = vec![0, 1, 1, 0];

    let batch = Batch::new(inputs.clone(), labels.clone()).expect("labels match rows");
    let optimizer = Sgd::new(0.5);
    let config = TrainConfig::new(3000);

    let final_loss = train_loop(&mut model, &[batch], &optimizer, &config)
        .expect("training succeeds");
    println!("Final loss: {final_loss:.6}");

    let log_probs = model.log_probs(&inputs).expect("forward succeeds");
    for (row, (input, label)) in log_probs.data.iter()
        .zip(inputs.data.iter().zip(labels.iter()))
    {
        let p1 = row[1].exp();
        println!("Input: {:?} -> P(class 1) = {:.4} (expected {})", input, p1, label);
    }
}
