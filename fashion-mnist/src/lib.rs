pub mod batch;
pub mod dataset;

pub use crate::batch::{Batch, BatchLoader};
pub use crate::dataset::{
    DatasetError, FashionMnist, IMAGE_PIXELS, IMAGE_SIDE, LABEL_NAMES, NUM_CLASSES, label_name,
    load_test_data, load_training_data,
};
