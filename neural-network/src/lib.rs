// Modules
mod activations;
pub mod loss;
mod network;

pub use activations::{Activation, RELU};
pub use matrix::Matrix;
pub use network::Network;
