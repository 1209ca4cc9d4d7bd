//! Loss-curve rendering.
//!
//! Consumes the two loss series collected across the run and draws them as
//! an SVG line chart: training loss in red, test loss in green.

use crate::error::TrainingError;
use crate::training_history::TrainingHistory;
use plotters::prelude::*;
use std::path::Path;

/// Renders the training and test loss series to an SVG file.
///
/// # Arguments
/// * `history` - Metrics recorded across the run; must hold at least one epoch
/// * `output_path` - Where to write the SVG; parent directories are created
///
/// # Errors
/// Returns `TrainingError::Plot` if the history is empty or drawing fails.
pub fn plot_loss_curves(
    history: &TrainingHistory,
    output_path: &Path,
) -> Result<(), TrainingError> {
    if history.is_empty() {
        return Err(TrainingError::Plot(
            "no epochs recorded, nothing to plot".to_string(),
        ));
    }
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let root = SVGBackend::new(output_path, (1024, 576)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| TrainingError::Plot(e.to_string()))?;

    let epochs = history.len();
    let loss_max = history
        .train_losses
        .iter()
        .chain(&history.test_losses)
        .fold(0.0, |a: f64, &b| a.max(b));

    let mut chart = ChartBuilder::on(&root)
        .caption("Training and Test Loss", ("sans-serif", 30).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(1f64..(epochs.max(2)) as f64, 0f64..loss_max * 1.05)
        .map_err(|e| TrainingError::Plot(e.to_string()))?;

    chart
        .configure_mesh()
        .x_labels(10)
        .y_labels(10)
        .disable_mesh()
        .x_label_formatter(&|x: &f64| format!("{}", (*x).round()))
        .x_desc("Epoch")
        .y_desc("Loss")
        .draw()
        .map_err(|e| TrainingError::Plot(e.to_string()))?;

    let train_points: Vec<(f64, f64)> = history
        .train_losses
        .iter()
        .enumerate()
        .map(|(i, &loss)| ((i + 1) as f64, loss))
        .collect();
    let test_points: Vec<(f64, f64)> = history
        .test_losses
        .iter()
        .enumerate()
        .map(|(i, &loss)| ((i + 1) as f64, loss))
        .collect();

    chart
        .draw_series(LineSeries::new(train_points, &RED))
        .map_err(|e| TrainingError::Plot(e.to_string()))?
        .label("Train Loss")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));

    chart
        .draw_series(LineSeries::new(test_points, &GREEN))
        .map_err(|e| TrainingError::Plot(e.to_string()))?
        .label("Test Loss")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], GREEN));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .margin(10)
        .draw()
        .map_err(|e| TrainingError::Plot(e.to_string()))?;

    root.present()
        .map_err(|e| TrainingError::Plot(e.to_string()))?;

    Ok(())
}
