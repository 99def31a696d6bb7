pub mod math;
pub mod error;
pub mod activation;
pub mod graph;
pub mod layers;
pub mod loss;
pub mod model;
pub mod optim;
pub mod train;

// Convenience re-exports
pub use math::matrix::Matrix;
pub use error::GradError;
pub use activation::activation::Activation;
pub use graph::node::{NodeId, Op};
pub use graph::tape::Tape;
pub use layers::linear::Linear;
pub use layers::param::Parameter;
pub use loss::nll::NllLoss;
pub use model::model::Model;
pub use model::spec::{LayerSpec, ModelSpec};
pub use optim::sgd::Sgd;
pub use train::batch::Batch;
pub use train::epoch_stats::EpochStats;
pub use train::loop_fn::train_loop;
pub use train::train_config::TrainConfig;
