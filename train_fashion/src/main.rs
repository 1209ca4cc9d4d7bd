mod preview;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use training::plot::plot_loss_curves;
use training::{Trainer, TrainingConfig};

#[derive(clap::Parser)]
#[command(
    name = "train_fashion",
    about = "Train a feed-forward classifier on Fashion-MNIST",
    long_about = None
)]
struct Args {
    /// Directory holding the four Fashion-MNIST IDX files
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Number of training epochs
    #[arg(long, default_value_t = TrainingConfig::default().epochs)]
    epochs: u32,

    /// Samples per batch
    #[arg(long, default_value_t = TrainingConfig::default().batch_size)]
    batch_size: usize,

    /// SGD learning rate
    #[arg(long, default_value_t = TrainingConfig::default().learning_rate)]
    learning_rate: f64,

    /// Output path for the loss-curve SVG
    #[arg(long, default_value = "graphs/loss_curves.svg")]
    plot: PathBuf,

    /// Output path for the sample preview PNG
    #[arg(long, default_value = "graphs/samples.png")]
    preview: PathBuf,

    /// Optional path for a JSON dump of the recorded metrics
    #[arg(long)]
    history: Option<PathBuf>,

    /// Skip rendering the sample preview
    #[arg(long)]
    no_preview: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // The compute backend is fixed once for the whole process.
    let threads = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    println!("Using cpu device ({} threads)", threads);

    println!("Loading Fashion-MNIST dataset...");
    let training_data = fashion_mnist::load_training_data(&args.data_dir)
        .context("Failed to load training data")?;
    let testing_data =
        fashion_mnist::load_test_data(&args.data_dir).context("Failed to load test data")?;
    println!(
        "\nLoaded {} training and {} test examples",
        training_data.len(),
        testing_data.len()
    );

    if !args.no_preview {
        preview::save_sample_grid(&training_data, &args.preview)
            .context("Failed to render sample preview")?;
        println!("Sample preview saved to {}", args.preview.display());
    }

    let config = TrainingConfig {
        learning_rate: args.learning_rate,
        batch_size: args.batch_size,
        epochs: args.epochs,
        ..TrainingConfig::default()
    };
    let mut trainer = Trainer::new(config).context("Failed to initialize trainer")?;
    println!("\n{}\n", trainer.network());

    let history = trainer
        .run(&training_data, &testing_data)
        .context("Training run failed")?;
    history.print_summary();

    plot_loss_curves(history, &args.plot).context("Failed to plot loss curves")?;
    println!("\nLoss curves saved to {}", args.plot.display());

    if let Some(history_path) = &args.history {
        let json =
            serde_json::to_string_pretty(history).context("Failed to serialize history")?;
        if let Some(parent) = history_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).context("Failed to create history directory")?;
            }
        }
        std::fs::write(history_path, json).context("Failed to write history file")?;
        println!("Metrics saved to {}", history_path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fashion_mnist::{FashionMnist, IMAGE_PIXELS};

    #[test]
    fn test_end_to_end_on_tiny_dataset() -> Result<()> {
        // Two classes, four samples, one epoch: the whole pipeline short of
        // file loading and rendering.
        let mut pixels = Vec::new();
        for i in 0..4 {
            let value = if i % 2 == 0 { 0u8 } else { 255u8 };
            pixels.extend(std::iter::repeat_n(value, IMAGE_PIXELS));
        }
        let data = FashionMnist::new(pixels, vec![0, 1, 0, 1])?;

        let config = TrainingConfig {
            learning_rate: 0.1,
            batch_size: 2,
            epochs: 1,
            hidden_layers: vec![4],
        };
        let mut trainer = Trainer::new(config)?;
        let history = trainer.run(&data, &data)?;

        assert_eq!(history.train_losses.len(), 1);
        assert_eq!(history.test_losses.len(), 1);
        Ok(())
    }
}
