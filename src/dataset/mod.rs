//! Dataset abstractions for training and evaluation.
//!
//! A [`Dataset`] is a source of `(X, y)` pairs where `X` is a feature matrix of
//! shape `(n_samples, n_features)` and `y` a target vector of shape
//! `(n_samples,)`. [`DatasetBatchIter`] walks it in fixed-size chunks.
//!
//! # Example
//!
//! ```rust
//! use medcost_rs::dataset::{Dataset, InMemoryDataset};
//!
//! let x = vec![vec![1.0], vec![2.0]];
//! let y = vec![0.0, 1.0];
//! let dataset = InMemoryDataset::new(x, y).unwrap();
//!
//! for batch in dataset.batches(1) {
//!     let (x_batch, y_batch) = batch.unwrap();
//!     assert_eq!(x_batch.nrows(), y_batch.len());
//! }
//! ```

use ndarray::{Array1, Array2};
use std::{fmt::Debug, ops::Range};

pub mod insurance;
pub mod memory;
pub use self::insurance::{
    into_dataset, load_insurance_csv, read_insurance_csv, InsuranceRecord, COLUMNS,
};
pub use self::memory::InMemoryDataset;

/// Abstract interface for a tabular regression dataset.
pub trait Dataset {
    /// Error type returned when accessing data.
    type Error: Debug + 'static;

    /// Total number of samples, if known.
    fn len(&self) -> Option<usize>;

    /// Default implementation checks if `len() == Some(0)`.
    fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }

    /// Width of the feature matrix.
    fn n_features(&self) -> usize;

    /// Creates an iterator over fixed-size batches. The last batch may be smaller.
    fn batches(&self, batch_size: usize) -> DatasetBatchIter<'_, Self>
    where
        Self: Sized,
    {
        DatasetBatchIter {
            dataset: self,
            batch_size: batch_size.max(1),
            current: 0,
        }
    }

    /// Loads the samples in `range` (`[start, end)`).
    fn get_batch(&self, range: Range<usize>) -> Result<(Array2<f64>, Array1<f64>), Self::Error>;

    /// Loads every sample at once.
    fn to_arrays(&self) -> Result<(Array2<f64>, Array1<f64>), Self::Error> {
        self.get_batch(0..self.len().unwrap_or(0))
    }
}

/// Iterator over dataset batches, created by [`Dataset::batches`].
pub struct DatasetBatchIter<'a, D: ?Sized> {
    dataset: &'a D,
    batch_size: usize,
    /// Index of the next sample to yield.
    current: usize,
}

impl<'a, D: Dataset> Iterator for DatasetBatchIter<'a, D> {
    type Item = Result<(Array2<f64>, Array1<f64>), D::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let total = self.dataset.len()?;
        if self.current >= total {
            return None;
        }

        let end = (self.current + self.batch_size).min(total);
        let range = self.current..end;
        self.current = end;

        Some(self.dataset.get_batch(range))
    }
}
