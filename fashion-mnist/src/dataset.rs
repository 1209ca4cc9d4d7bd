//! Fashion-MNIST dataset loader.
//!
//! Reads the images and labels from the IDX file format the dataset ships in.
//! Raw pixel bytes are kept as loaded; normalization to `f64` happens at
//! access time when a batch is assembled.

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const IMAGE_MAGIC_NUMBER: u32 = 2051;
pub const LABEL_MAGIC_NUMBER: u32 = 2049;
pub const IMAGE_SIDE: usize = 28;
pub const IMAGE_PIXELS: usize = IMAGE_SIDE * IMAGE_SIDE;
pub const NUM_CLASSES: usize = 10;

/// Human-readable class names, indexed by label value.
pub const LABEL_NAMES: [&str; NUM_CLASSES] = [
    "T-Shirt",
    "Trouser",
    "Pullover",
    "Dress",
    "Coat",
    "Sandal",
    "Shirt",
    "Sneaker",
    "Bag",
    "Ankle Boot",
];

/// Returns the class name for a label value.
///
/// # Panics
/// Panics if `label` is not in `0..10`; labels are validated at load time.
#[must_use]
pub fn label_name(label: u8) -> &'static str {
    LABEL_NAMES[label as usize]
}

/// Errors that can occur while handling Fashion-MNIST data
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Wrapper for standard I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Error for invalid magic numbers in IDX files
    #[error("Invalid magic number for {kind} file: expected {expected}, got {actual}")]
    InvalidMagicNumber {
        kind: &'static str,
        expected: u32,
        actual: u32,
    },
    /// Error for mismatches between images and labels
    #[error("Data mismatch: {0}")]
    DataMismatch(String),
    /// Error for invalid image dimensions
    #[error(
        "Invalid image dimensions: expected {expected} pixels, got {actual} pixels ({rows}x{cols})"
    )]
    InvalidDimensions {
        expected: usize,
        actual: usize,
        rows: usize,
        cols: usize,
    },
    /// Error for label values outside the class range
    #[error("Invalid label {label} at index {index}: labels must be in 0..10")]
    InvalidLabel { index: usize, label: u8 },
    /// Error for a zero batch size
    #[error("Batch size must be positive")]
    InvalidBatchSize,
}

/// Container for Fashion-MNIST samples (images and their labels).
///
/// Pixels are stored as the raw bytes from the IDX file, one contiguous run
/// of 784 bytes per image. `image()` applies the [0, 1] normalization lazily.
#[derive(Debug)]
pub struct FashionMnist {
    pixels: Vec<u8>,
    labels: Vec<u8>,
}

impl FashionMnist {
    /// Creates a new dataset from raw pixel bytes and label values.
    ///
    /// # Arguments
    /// * `pixels` - Flat pixel bytes, 784 per image, images back to back
    /// * `labels` - One label value per image, each in 0..10
    ///
    /// # Returns
    /// * `Ok(FashionMnist)` if pixels and labels line up
    /// * `Err(DatasetError::DataMismatch)` if the pixel count does not cover the labels
    /// * `Err(DatasetError::InvalidLabel)` if any label is out of range
    pub fn new(pixels: Vec<u8>, labels: Vec<u8>) -> Result<Self, DatasetError> {
        if pixels.len() != labels.len() * IMAGE_PIXELS {
            return Err(DatasetError::DataMismatch(format!(
                "Pixel count ({}) does not match {} labels x {} pixels",
                pixels.len(),
                labels.len(),
                IMAGE_PIXELS
            )));
        }
        if let Some((index, &label)) = labels
            .iter()
            .enumerate()
            .find(|(_, &label)| label as usize >= NUM_CLASSES)
        {
            return Err(DatasetError::InvalidLabel { index, label });
        }
        Ok(Self { pixels, labels })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Raw pixel bytes of one image.
    pub fn image_bytes(&self, index: usize) -> &[u8] {
        &self.pixels[index * IMAGE_PIXELS..(index + 1) * IMAGE_PIXELS]
    }

    /// One image normalized to [0, 1].
    pub fn image(&self, index: usize) -> Vec<f64> {
        self.image_bytes(index)
            .iter()
            .map(|&pixel| f64::from(pixel) / 255.0)
            .collect()
    }

    pub fn label(&self, index: usize) -> u8 {
        self.labels[index]
    }

    pub fn labels(&self) -> &[u8] {
        &self.labels
    }
}

/// Creates a progress bar with a consistent style
pub(crate) fn create_progress_style(template: &str) -> ProgressStyle {
    ProgressStyle::default_bar()
        .template(template)
        .unwrap()
        .progress_chars("##-")
}

/// Reads a 32-bit unsigned integer in big-endian format from a file
fn read_u32(file: &mut File) -> std::io::Result<u32> {
    let mut buffer = [0; 4];
    file.read_exact(&mut buffer)?;
    Ok(u32::from_be_bytes(buffer))
}

/// Reads Fashion-MNIST image data from an IDX file.
///
/// # Arguments
/// * `path` - Path to the image file
/// * `progress` - Progress bar for tracking loading progress
///
/// # Returns
/// * `Ok(Vec<u8>)` containing raw pixel bytes, 784 per image
/// * `Err(DatasetError)` if file reading fails or the format is invalid
///
/// # Format
/// The IDX image file consists of:
/// * 32-bit magic number (2051)
/// * 32-bit number of images
/// * 32-bit number of rows
/// * 32-bit number of columns
/// * Pixels in row-major order (1 byte per pixel)
pub fn read_idx_images(
    path: impl AsRef<Path>,
    progress: &ProgressBar,
) -> Result<Vec<u8>, DatasetError> {
    let mut file = File::open(path)?;

    let magic_number = read_u32(&mut file)?;
    if magic_number != IMAGE_MAGIC_NUMBER {
        return Err(DatasetError::InvalidMagicNumber {
            kind: "images",
            expected: IMAGE_MAGIC_NUMBER,
            actual: magic_number,
        });
    }

    let num_images = read_u32(&mut file)? as usize;
    let num_rows = read_u32(&mut file)? as usize;
    let num_cols = read_u32(&mut file)? as usize;
    let pixels_per_image = num_rows * num_cols;

    if pixels_per_image != IMAGE_PIXELS {
        return Err(DatasetError::InvalidDimensions {
            expected: IMAGE_PIXELS,
            actual: pixels_per_image,
            rows: num_rows,
            cols: num_cols,
        });
    }

    progress.set_length(num_images as u64);
    progress.set_message("Loading images...");

    let mut pixels = vec![0u8; num_images * pixels_per_image];
    for image in pixels.chunks_exact_mut(pixels_per_image) {
        file.read_exact(image)?;
        progress.inc(1);
    }

    progress.finish_with_message("Images loaded successfully");
    Ok(pixels)
}

/// Reads Fashion-MNIST label data from an IDX file.
///
/// # Arguments
/// * `path` - Path to the label file
/// * `progress` - Progress bar for tracking loading progress
///
/// # Returns
/// * `Ok(Vec<u8>)` containing one label value per image
/// * `Err(DatasetError)` if file reading fails or the format is invalid
///
/// # Format
/// The IDX label file consists of:
/// * 32-bit magic number (2049)
/// * 32-bit number of labels
/// * Labels (1 byte per label)
pub fn read_idx_labels(
    path: impl AsRef<Path>,
    progress: &ProgressBar,
) -> Result<Vec<u8>, DatasetError> {
    let mut file = File::open(path)?;

    let magic_number = read_u32(&mut file)?;
    if magic_number != LABEL_MAGIC_NUMBER {
        return Err(DatasetError::InvalidMagicNumber {
            kind: "labels",
            expected: LABEL_MAGIC_NUMBER,
            actual: magic_number,
        });
    }

    let num_labels = read_u32(&mut file)? as usize;
    progress.set_length(num_labels as u64);
    progress.set_message("Loading labels...");

    let mut labels = vec![0u8; num_labels];
    file.read_exact(&mut labels)?;
    progress.inc(num_labels as u64);

    progress.finish_with_message("Labels loaded successfully");
    Ok(labels)
}

/// Loads the Fashion-MNIST training split from `data_dir`.
pub fn load_training_data(data_dir: impl AsRef<Path>) -> Result<FashionMnist, DatasetError> {
    let data_dir = data_dir.as_ref();
    load_idx_pair(
        data_dir.join("train-images-idx3-ubyte"),
        data_dir.join("train-labels-idx1-ubyte"),
    )
}

/// Loads the Fashion-MNIST test split from `data_dir`.
pub fn load_test_data(data_dir: impl AsRef<Path>) -> Result<FashionMnist, DatasetError> {
    let data_dir = data_dir.as_ref();
    load_idx_pair(
        data_dir.join("t10k-images-idx3-ubyte"),
        data_dir.join("t10k-labels-idx1-ubyte"),
    )
}

/// Loads an image/label file pair into a dataset.
///
/// # Arguments
/// * `images_path` - Path to the images file
/// * `labels_path` - Path to the labels file
///
/// # Returns
/// * `Ok(FashionMnist)` containing paired images and labels
/// * `Err(DatasetError)` if loading fails
pub fn load_idx_pair(
    images_path: PathBuf,
    labels_path: PathBuf,
) -> Result<FashionMnist, DatasetError> {
    let multi_progress = MultiProgress::new();
    let style = create_progress_style(
        "{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}",
    );

    let images_progress = multi_progress.add(ProgressBar::new(0));
    let labels_progress = multi_progress.add(ProgressBar::new(0));
    images_progress.set_style(style.clone());
    labels_progress.set_style(style);

    let pixels = read_idx_images(images_path, &images_progress)?;
    let labels = read_idx_labels(labels_path, &labels_progress)?;

    FashionMnist::new(pixels, labels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;
    use std::io::Write;

    fn create_test_idx_file(
        path: &Path,
        magic_number: u32,
        count: u32,
        data: &[u8],
    ) -> std::io::Result<()> {
        let mut file = File::create(path)?;

        file.write_all(&magic_number.to_be_bytes())?;
        file.write_all(&count.to_be_bytes())?;

        if magic_number == IMAGE_MAGIC_NUMBER {
            // Image files carry the 28x28 dimensions after the count
            file.write_all(&28u32.to_be_bytes())?;
            file.write_all(&28u32.to_be_bytes())?;
        }

        file.write_all(data)?;
        Ok(())
    }

    #[test]
    fn test_dataset_new_valid() {
        let pixels = vec![0u8; IMAGE_PIXELS * 2];
        let labels = vec![3u8, 7u8];

        let data = FashionMnist::new(pixels, labels).unwrap();
        assert_eq!(data.len(), 2);
        assert!(!data.is_empty());
        assert_eq!(data.label(0), 3);
        assert_eq!(data.label(1), 7);
    }

    #[test]
    fn test_dataset_new_mismatch() {
        let pixels = vec![0u8; IMAGE_PIXELS];
        let labels = vec![0u8, 1u8];

        let result = FashionMnist::new(pixels, labels);
        match result {
            Err(DatasetError::DataMismatch(msg)) => {
                assert!(msg.contains("does not match"));
            }
            _ => panic!("Expected DataMismatch error"),
        }
    }

    #[test]
    fn test_dataset_rejects_out_of_range_label() {
        let pixels = vec![0u8; IMAGE_PIXELS * 2];
        let labels = vec![4u8, 10u8];

        let result = FashionMnist::new(pixels, labels);
        match result {
            Err(DatasetError::InvalidLabel { index, label }) => {
                assert_eq!(index, 1);
                assert_eq!(label, 10);
            }
            _ => panic!("Expected InvalidLabel error"),
        }
    }

    #[test]
    fn test_image_normalization_is_lazy() {
        let mut pixels = vec![0u8; IMAGE_PIXELS];
        pixels[0] = 255;
        pixels[1] = 51;
        let data = FashionMnist::new(pixels, vec![0u8]).unwrap();

        // Raw bytes are untouched until an image is requested.
        assert_eq!(data.image_bytes(0)[0], 255);

        let image = data.image(0);
        assert_eq!(image.len(), IMAGE_PIXELS);
        assert!((image[0] - 1.0).abs() < 1e-12);
        assert!((image[1] - 0.2).abs() < 1e-12);
        assert_eq!(image[2], 0.0);
    }

    #[test]
    fn test_label_names() {
        assert_eq!(label_name(0), "T-Shirt");
        assert_eq!(label_name(9), "Ankle Boot");
        assert_eq!(LABEL_NAMES.len(), NUM_CLASSES);
    }

    #[test]
    fn test_read_idx_images_valid() -> Result<(), Box<dyn std::error::Error>> {
        let temp = assert_fs::TempDir::new()?;
        let file_path = temp.child("test-images");

        let image_data = vec![0u8; IMAGE_PIXELS * 2];
        create_test_idx_file(file_path.path(), IMAGE_MAGIC_NUMBER, 2, &image_data)?;

        let progress = ProgressBar::new(2);
        let pixels = read_idx_images(file_path.path(), &progress)?;
        assert_eq!(pixels.len(), IMAGE_PIXELS * 2);

        Ok(())
    }

    #[test]
    fn test_read_idx_images_invalid_magic() -> Result<(), Box<dyn std::error::Error>> {
        let temp = assert_fs::TempDir::new()?;
        let file_path = temp.child("test-images");

        create_test_idx_file(file_path.path(), 0x12345678, 1, &vec![0u8; IMAGE_PIXELS])?;

        let progress = ProgressBar::new(1);
        let result = read_idx_images(file_path.path(), &progress);

        match result {
            Err(DatasetError::InvalidMagicNumber {
                kind,
                expected,
                actual,
            }) => {
                assert_eq!(kind, "images");
                assert_eq!(expected, IMAGE_MAGIC_NUMBER);
                assert_eq!(actual, 0x12345678);
            }
            _ => panic!("Expected InvalidMagicNumber error"),
        }

        Ok(())
    }

    #[test]
    fn test_read_idx_labels_valid() -> Result<(), Box<dyn std::error::Error>> {
        let temp = assert_fs::TempDir::new()?;
        let file_path = temp.child("test-labels");

        create_test_idx_file(file_path.path(), LABEL_MAGIC_NUMBER, 3, &[0u8, 9u8, 5u8])?;

        let progress = ProgressBar::new(3);
        let labels = read_idx_labels(file_path.path(), &progress)?;
        assert_eq!(labels, vec![0, 9, 5]);

        Ok(())
    }

    #[test]
    fn test_load_idx_pair() -> Result<(), Box<dyn std::error::Error>> {
        let temp = assert_fs::TempDir::new()?;
        let images_path = temp.child("images");
        let labels_path = temp.child("labels");

        create_test_idx_file(
            images_path.path(),
            IMAGE_MAGIC_NUMBER,
            2,
            &vec![128u8; IMAGE_PIXELS * 2],
        )?;
        create_test_idx_file(labels_path.path(), LABEL_MAGIC_NUMBER, 2, &[1u8, 8u8])?;

        let data = load_idx_pair(
            images_path.path().to_path_buf(),
            labels_path.path().to_path_buf(),
        )?;
        assert_eq!(data.len(), 2);
        assert_eq!(data.label(1), 8);

        Ok(())
    }
}
