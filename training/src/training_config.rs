use crate::error::TrainingError;
use serde::{Deserialize, Serialize};

/// Configuration parameters for a training run.
///
/// All values are fixed for the whole run: there is no schedule, no early
/// stopping and no convergence check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Learning rate for stochastic gradient descent
    pub learning_rate: f64,
    /// Number of samples per batch
    pub batch_size: usize,
    /// Number of training epochs
    pub epochs: u32,
    /// Number of nodes in each hidden layer
    pub hidden_layers: Vec<usize>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            learning_rate: 1e-2,
            batch_size: 64,
            epochs: 10,
            hidden_layers: vec![512, 512],
        }
    }
}

impl TrainingConfig {
    /// Rejects configurations that would make the per-epoch averaging
    /// undefined, before any loop begins.
    pub fn validate(&self) -> Result<(), TrainingError> {
        if self.batch_size == 0 {
            return Err(TrainingError::Config(
                "batch size must be positive".to_string(),
            ));
        }
        if self.epochs == 0 {
            return Err(TrainingError::Config(
                "epoch count must be positive".to_string(),
            ));
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(TrainingError::Config(format!(
                "learning rate must be a positive finite number, got {}",
                self.learning_rate
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_training_config_default() {
        let config = TrainingConfig::default();
        assert_eq!(config.learning_rate, 1e-2);
        assert_eq!(config.batch_size, 64);
        assert_eq!(config.epochs, 10);
        assert_eq!(config.hidden_layers, vec![512, 512]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let config = TrainingConfig {
            batch_size: 0,
            ..TrainingConfig::default()
        };
        assert!(matches!(config.validate(), Err(TrainingError::Config(_))));
    }

    #[test]
    fn test_zero_epochs_rejected() {
        let config = TrainingConfig {
            epochs: 0,
            ..TrainingConfig::default()
        };
        assert!(matches!(config.validate(), Err(TrainingError::Config(_))));
    }

    #[test]
    fn test_bad_learning_rate_rejected() {
        for learning_rate in [0.0, -0.1, f64::NAN, f64::INFINITY] {
            let config = TrainingConfig {
                learning_rate,
                ..TrainingConfig::default()
            };
            assert!(
                matches!(config.validate(), Err(TrainingError::Config(_))),
                "learning rate {} should be rejected",
                learning_rate
            );
        }
    }
}
