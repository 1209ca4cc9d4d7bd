//! Training and evaluation loops for the Fashion-MNIST classifier.
//!
//! The [`Trainer`] owns the network and drives the run: one full shuffled
//! pass of SGD updates per epoch, followed by a forward-only pass over the
//! test set, with both average losses recorded for the final plot.

use crate::error::TrainingError;
use crate::training_config::TrainingConfig;
use crate::training_history::TrainingHistory;
use fashion_mnist::{BatchLoader, FashionMnist, IMAGE_PIXELS, NUM_CLASSES};
use indicatif::{ProgressBar, ProgressStyle};
use neural_network::loss;
use neural_network::{Network, RELU};

/// Metrics from one evaluation pass over the test set.
#[derive(Debug, Clone, Copy)]
pub struct EvalMetrics {
    /// Sum of per-batch losses divided by batch count
    pub avg_loss: f64,
    /// Fraction of samples whose predicted class matches the label, in [0, 1]
    pub accuracy: f64,
}

/// Trainer manages the classifier training process.
///
/// The trainer handles:
/// - Network initialization from the configuration
/// - The per-epoch training loop (forward, loss, gradients, SGD step)
/// - The forward-only evaluation loop
/// - Metrics collection across epochs
pub struct Trainer {
    network: Network,
    config: TrainingConfig,
    history: TrainingHistory,
}

impl Trainer {
    /// Creates a new trainer with the specified configuration.
    ///
    /// The network is built as 784 inputs, the configured hidden layers with
    /// ReLU between them, and 10 output classes.
    ///
    /// # Errors
    /// Returns `TrainingError::Config` if the configuration fails validation.
    pub fn new(config: TrainingConfig) -> Result<Self, TrainingError> {
        config.validate()?;

        let mut layer_sizes = vec![IMAGE_PIXELS];
        layer_sizes.extend(&config.hidden_layers);
        layer_sizes.push(NUM_CLASSES);

        let network = Network::new(layer_sizes, RELU);
        let history = TrainingHistory::new();

        Ok(Self {
            network,
            config,
            history,
        })
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Returns the metrics recorded so far
    pub fn history(&self) -> &TrainingHistory {
        &self.history
    }

    /// Runs one training epoch: a single full pass over the loader.
    ///
    /// Each batch goes through forward pass, loss, gradient computation and
    /// one SGD parameter update. Returns the average loss, weighting every
    /// batch equally regardless of a short final batch.
    pub fn train_epoch(&mut self, loader: &BatchLoader) -> Result<f64, TrainingError> {
        let progress = ProgressBar::new(loader.num_batches() as u64);
        progress.set_style(create_progress_style(
            "{spinner:.yellow} [{elapsed_precise}] {bar:40.yellow/blue} {pos:>7}/{len:7} Batch {msg}",
        ));

        let mut total_loss = 0.0;
        let mut num_batches = 0usize;
        for batch in loader.iter() {
            let batch_loss = self
                .network
                .train_batch(batch.images(), batch.labels(), self.config.learning_rate)
                .map_err(|e| TrainingError::Model(e.to_string()))?;
            total_loss += batch_loss;
            num_batches += 1;
            progress.inc(1);
        }
        progress.finish_and_clear();

        if num_batches == 0 {
            return Err(TrainingError::EmptyDataset("training"));
        }
        Ok(total_loss / num_batches as f64)
    }

    /// Runs one evaluation pass: forward only, no gradients, no updates.
    ///
    /// Accumulates the per-batch loss and the per-sample correct-prediction
    /// count. The network is not touched; parameters are identical before
    /// and after this call.
    pub fn evaluate(&self, loader: &BatchLoader) -> Result<EvalMetrics, TrainingError> {
        let mut total_loss = 0.0;
        let mut num_batches = 0usize;
        let mut correct = 0usize;
        let mut total = 0usize;

        for batch in loader.iter() {
            let logits = self
                .network
                .forward(batch.images())
                .map_err(|e| TrainingError::Model(e.to_string()))?;
            total_loss += loss::cross_entropy(&logits, batch.labels())
                .map_err(|e| TrainingError::Model(e.to_string()))?;

            correct += loss::predictions(&logits)
                .iter()
                .zip(batch.labels())
                .filter(|(&predicted, &label)| predicted == label as usize)
                .count();
            total += batch.len();
            num_batches += 1;
        }

        if num_batches == 0 {
            return Err(TrainingError::EmptyDataset("test"));
        }
        Ok(EvalMetrics {
            avg_loss: total_loss / num_batches as f64,
            accuracy: correct as f64 / total as f64,
        })
    }

    /// Runs the full training process: `epochs` rounds of one training
    /// epoch followed by one evaluation pass, recording both average losses
    /// and the accuracy each round.
    ///
    /// The training loader shuffles on every pass; the test loader does not.
    /// A failure mid-run propagates out with nothing recovered.
    ///
    /// # Errors
    /// Returns `TrainingError::EmptyDataset` if either collection is empty,
    /// before any loop begins.
    pub fn run(
        &mut self,
        train_data: &FashionMnist,
        test_data: &FashionMnist,
    ) -> Result<&TrainingHistory, TrainingError> {
        if train_data.is_empty() {
            return Err(TrainingError::EmptyDataset("training"));
        }
        if test_data.is_empty() {
            return Err(TrainingError::EmptyDataset("test"));
        }

        let train_loader = BatchLoader::new(train_data, self.config.batch_size, true)?;
        let test_loader = BatchLoader::new(test_data, self.config.batch_size, false)?;

        for epoch in 1..=self.config.epochs {
            println!("Epoch {}\n-----------------------", epoch);

            let train_loss = self.train_epoch(&train_loader)?;
            let metrics = self.evaluate(&test_loader)?;

            println!(
                "Test Error: \n Accuracy: {:.1}%, Avg Loss: {:>8.6} \n",
                metrics.accuracy * 100.0,
                metrics.avg_loss
            );

            self.history
                .record_epoch(epoch, train_loss, metrics.avg_loss, metrics.accuracy);
        }

        Ok(&self.history)
    }
}

/// Creates a progress bar style with the specified template.
fn create_progress_style(template: &str) -> ProgressStyle {
    ProgressStyle::with_template(template)
        .unwrap()
        .progress_chars("##-")
}
