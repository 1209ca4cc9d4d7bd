use serde::{Deserialize, Serialize};

/// Metrics recorded across a training run, one entry per epoch.
///
/// The two loss series are consumed once at the end of the run for the
/// loss-curve plot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainingHistory {
    /// Average training loss for each epoch
    pub train_losses: Vec<f64>,
    /// Average test loss for each epoch
    pub test_losses: Vec<f64>,
    /// Test accuracy for each epoch, as a fraction in [0, 1]
    pub accuracies: Vec<f64>,
    /// Best test accuracy achieved during the run
    pub best_accuracy: f64,
    /// Epoch where the best accuracy was achieved
    pub best_epoch: u32,
}

impl TrainingHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of epochs recorded so far.
    pub fn len(&self) -> usize {
        self.train_losses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.train_losses.is_empty()
    }

    pub fn record_epoch(&mut self, epoch: u32, train_loss: f64, test_loss: f64, accuracy: f64) {
        self.train_losses.push(train_loss);
        self.test_losses.push(test_loss);
        self.accuracies.push(accuracy);

        if accuracy > self.best_accuracy {
            self.best_accuracy = accuracy;
            self.best_epoch = epoch;
        }
    }

    /// Prints a summary of the training history
    pub fn print_summary(&self) {
        println!("\nTraining History Summary:");
        println!("------------------------");
        println!(
            "Best accuracy: {:.2}% (epoch {})",
            self.best_accuracy * 100.0,
            self.best_epoch
        );
        println!(
            "Final accuracy: {:.2}%",
            self.accuracies.last().unwrap_or(&0.0) * 100.0
        );
        println!(
            "Final test loss: {:.4}",
            self.test_losses.last().unwrap_or(&0.0)
        );

        // Print loss progression at 25% intervals
        let len = self.train_losses.len();
        if len >= 4 {
            println!("\nLoss progression:");
            for i in 0..=3 {
                let idx = i * (len - 1) / 3;
                println!(
                    "Epoch {}: train {:.4}, test {:.4}",
                    idx + 1,
                    self.train_losses[idx],
                    self.test_losses[idx]
                );
            }
        }
    }
}
