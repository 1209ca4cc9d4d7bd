//! Sample preview rendering.
//!
//! Before training starts, a small grid of random training samples is
//! written out as one grayscale PNG so the data can be eyeballed, with the
//! label name of every tile printed to the console.

use anyhow::{Context, Result};
use fashion_mnist::{FashionMnist, IMAGE_SIDE, label_name};
use image::{GrayImage, Luma};
use rand::Rng;
use std::path::Path;

const GRID_ROWS: u32 = 3;
const GRID_COLS: u32 = 3;
const PADDING: u32 = 2;

/// Renders a 3x3 grid of random samples from `data` to a PNG at `path`.
///
/// # Errors
/// Returns an error if the dataset is empty or the file cannot be written.
pub fn save_sample_grid(data: &FashionMnist, path: &Path) -> Result<()> {
    if data.is_empty() {
        anyhow::bail!("Cannot preview an empty dataset");
    }

    let tile = IMAGE_SIDE as u32;
    let width = GRID_COLS * (tile + PADDING) + PADDING;
    let height = GRID_ROWS * (tile + PADDING) + PADDING;
    let mut canvas = GrayImage::from_pixel(width, height, Luma([0u8]));

    let mut rng = rand::rng();
    for row in 0..GRID_ROWS {
        for col in 0..GRID_COLS {
            let sample_idx = rng.random_range(0..data.len());
            let pixels = data.image_bytes(sample_idx);
            let x0 = PADDING + col * (tile + PADDING);
            let y0 = PADDING + row * (tile + PADDING);
            for y in 0..tile {
                for x in 0..tile {
                    let value = pixels[(y * tile + x) as usize];
                    canvas.put_pixel(x0 + x, y0 + y, Luma([value]));
                }
            }
            println!(
                "Sample {}: {}",
                sample_idx,
                label_name(data.label(sample_idx))
            );
        }
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).context("Failed to create preview directory")?;
        }
    }
    canvas.save(path).context("Failed to save sample grid")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fashion_mnist::IMAGE_PIXELS;

    #[test]
    fn test_save_sample_grid() -> Result<()> {
        let pixels = vec![128u8; IMAGE_PIXELS * 4];
        let labels = vec![0u8, 3, 5, 9];
        let data = FashionMnist::new(pixels, labels).unwrap();

        let dir = tempfile::tempdir()?;
        let path = dir.path().join("samples.png");
        save_sample_grid(&data, &path)?;

        assert!(path.exists());
        Ok(())
    }

    #[test]
    fn test_empty_dataset_rejected() {
        let data = FashionMnist::new(vec![], vec![]).unwrap();
        let result = save_sample_grid(&data, Path::new("unused.png"));
        assert!(result.is_err());
    }
}
