use fashion_mnist::DatasetError;
use thiserror::Error;

/// Errors that can occur while configuring or running a training run
#[derive(Debug, Error)]
pub enum TrainingError {
    /// A configuration value that would make the run undefined
    #[error("Invalid configuration: {0}")]
    Config(String),
    /// The training or test collection has no samples
    #[error("Cannot run on an empty {0} set")]
    EmptyDataset(&'static str),
    /// Wrapper for dataset and batch loader errors
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    /// A forward or backward pass failed
    #[error("Model error: {0}")]
    Model(String),
    /// Loss curve rendering failed
    #[error("Plot error: {0}")]
    Plot(String),
    /// Wrapper for standard I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
