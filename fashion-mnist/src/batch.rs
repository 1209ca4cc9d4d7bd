//! Mini-batch iteration over a [`FashionMnist`] dataset.
//!
//! A [`BatchLoader`] wraps a dataset and hands out a restartable, lazy
//! sequence of fixed-size batches. Each pass re-shuffles the sample order
//! when shuffling is enabled; the final batch of a pass may be short.

use crate::dataset::{DatasetError, FashionMnist, IMAGE_PIXELS};
use matrix::Matrix;
use rand::seq::SliceRandom;

/// One batch of samples: a row-per-sample image matrix and the matching
/// label values. The two are always the same length.
#[derive(Debug)]
pub struct Batch {
    images: Matrix,
    labels: Vec<u8>,
}

impl Batch {
    /// Normalized images, one 784-wide row per sample.
    pub fn images(&self) -> &Matrix {
        &self.images
    }

    pub fn labels(&self) -> &[u8] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Produces batches from a dataset.
///
/// # Example
/// ```
/// use fashion_mnist::{BatchLoader, FashionMnist, IMAGE_PIXELS};
///
/// let data = FashionMnist::new(vec![0u8; IMAGE_PIXELS * 4], vec![0, 1, 2, 3]).unwrap();
/// let loader = BatchLoader::new(&data, 2, false).unwrap();
/// assert_eq!(loader.num_batches(), 2);
/// for batch in loader.iter() {
///     assert_eq!(batch.images().rows(), batch.labels().len());
/// }
/// ```
#[derive(Debug)]
pub struct BatchLoader<'a> {
    data: &'a FashionMnist,
    batch_size: usize,
    shuffle: bool,
}

impl<'a> BatchLoader<'a> {
    /// Creates a loader over `data`.
    ///
    /// # Arguments
    /// * `data` - The dataset to batch
    /// * `batch_size` - Samples per batch; must be positive
    /// * `shuffle` - Re-shuffle the sample order on every pass
    ///
    /// # Returns
    /// * `Err(DatasetError::InvalidBatchSize)` if `batch_size` is zero
    pub fn new(
        data: &'a FashionMnist,
        batch_size: usize,
        shuffle: bool,
    ) -> Result<Self, DatasetError> {
        if batch_size == 0 {
            return Err(DatasetError::InvalidBatchSize);
        }
        Ok(Self {
            data,
            batch_size,
            shuffle,
        })
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Number of batches per pass, counting a short final batch.
    pub fn num_batches(&self) -> usize {
        self.data.len().div_ceil(self.batch_size)
    }

    /// Starts a fresh pass over the dataset.
    ///
    /// Every call draws a new sample order when shuffling is enabled, so two
    /// passes see the data in different orders.
    pub fn iter(&self) -> Batches<'a> {
        let mut indices: Vec<usize> = (0..self.data.len()).collect();
        if self.shuffle {
            indices.shuffle(&mut rand::rng());
        }
        Batches {
            data: self.data,
            indices,
            batch_size: self.batch_size,
            cursor: 0,
        }
    }
}

/// Lazy iterator over the batches of one pass.
///
/// Images are normalized from raw bytes as each batch is assembled, not when
/// the pass starts.
pub struct Batches<'a> {
    data: &'a FashionMnist,
    indices: Vec<usize>,
    batch_size: usize,
    cursor: usize,
}

impl Iterator for Batches<'_> {
    type Item = Batch;

    fn next(&mut self) -> Option<Batch> {
        if self.cursor >= self.indices.len() {
            return None;
        }

        let end = (self.cursor + self.batch_size).min(self.indices.len());
        let batch_indices = &self.indices[self.cursor..end];
        self.cursor = end;

        let mut pixels = Vec::with_capacity(batch_indices.len() * IMAGE_PIXELS);
        let mut labels = Vec::with_capacity(batch_indices.len());
        for &idx in batch_indices {
            pixels.extend(self.data.image(idx));
            labels.push(self.data.label(idx));
        }

        Some(Batch {
            images: Matrix::new(labels.len(), IMAGE_PIXELS, pixels),
            labels,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset_of(len: usize) -> FashionMnist {
        let mut pixels = vec![0u8; len * IMAGE_PIXELS];
        // Tag each image's first pixel with its index so order is observable.
        for (i, image) in pixels.chunks_exact_mut(IMAGE_PIXELS).enumerate() {
            image[0] = i as u8;
        }
        let labels: Vec<u8> = (0..len).map(|i| (i % 10) as u8).collect();
        FashionMnist::new(pixels, labels).unwrap()
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let data = dataset_of(4);
        let result = BatchLoader::new(&data, 0, false);
        assert!(matches!(result, Err(DatasetError::InvalidBatchSize)));
    }

    #[test]
    fn test_batch_count_rounds_up() {
        let data = dataset_of(10);
        let loader = BatchLoader::new(&data, 4, false).unwrap();

        assert_eq!(loader.num_batches(), 3);
        assert_eq!(loader.iter().count(), 3);
    }

    #[test]
    fn test_final_batch_is_short() {
        let data = dataset_of(10);
        let loader = BatchLoader::new(&data, 4, false).unwrap();

        let sizes: Vec<usize> = loader.iter().map(|batch| batch.len()).collect();
        assert_eq!(sizes, vec![4, 4, 2]);
    }

    #[test]
    fn test_images_and_labels_stay_aligned() {
        let data = dataset_of(7);
        let loader = BatchLoader::new(&data, 3, true).unwrap();

        for batch in loader.iter() {
            assert_eq!(batch.images().rows(), batch.labels().len());
            assert_eq!(batch.images().cols(), IMAGE_PIXELS);
            // First pixel was tagged with the sample index; its label must match.
            for row in 0..batch.len() {
                let sample_idx = (batch.images().get(row, 0) * 255.0).round() as usize;
                assert_eq!(batch.labels()[row], (sample_idx % 10) as u8);
            }
        }
    }

    #[test]
    fn test_unshuffled_order_is_sequential() {
        let data = dataset_of(6);
        let loader = BatchLoader::new(&data, 2, false).unwrap();

        let labels: Vec<u8> = loader
            .iter()
            .flat_map(|batch| batch.labels().to_vec())
            .collect();
        assert_eq!(labels, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_shuffled_pass_covers_every_sample() {
        let data = dataset_of(20);
        let loader = BatchLoader::new(&data, 6, true).unwrap();

        let mut seen: Vec<usize> = loader
            .iter()
            .flat_map(|batch| {
                let images = batch.images();
                (0..batch.len())
                    .map(|row| (images.get(row, 0) * 255.0).round() as usize)
                    .collect::<Vec<_>>()
            })
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn test_iter_is_restartable() {
        let data = dataset_of(5);
        let loader = BatchLoader::new(&data, 2, false).unwrap();

        assert_eq!(loader.iter().count(), 3);
        assert_eq!(loader.iter().count(), 3);
    }
}
