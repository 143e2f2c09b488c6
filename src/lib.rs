pub mod math;
pub mod activation;
pub mod layers;
pub mod network;
pub mod loss;
pub mod optim;
pub mod train;
pub mod error;

// Convenience re-exports
pub use math::matrix::Matrix;
pub use layers::dense::Layer;
pub use network::network::Network;
pub use network::options::NetworkOptions;
pub use loss::mse::MseLoss;
pub use optim::sgd::Sgd;
pub use train::{EpochStats, TrainConfig, TrainEvent, TrainingSummary};
pub use error::{NetError, Result};
