mod error;
pub mod plot;
mod training;
mod training_config;
mod training_history;

pub use error::TrainingError;
pub use training::{EvalMetrics, Trainer};
pub use training_config::TrainingConfig;
pub use training_history::TrainingHistory;

pub mod prelude {
    pub use crate::EvalMetrics;
    pub use crate::Trainer;
    pub use crate::TrainingConfig;
    pub use crate::TrainingError;
    pub use crate::TrainingHistory;
}
