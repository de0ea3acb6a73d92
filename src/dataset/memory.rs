use crate::dataset::Dataset;
use crate::error::DataError;
use ndarray::{Array1, Array2};
use std::ops::Range;

/// Row-major dataset held entirely in memory.
#[derive(Clone, Debug)]
pub struct InMemoryDataset {
    x: Vec<Vec<f64>>,
    y: Vec<f64>,
    n_features: usize,
}

impl InMemoryDataset {
    pub fn new(x: Vec<Vec<f64>>, y: Vec<f64>) -> Result<Self, DataError> {
        if x.len() != y.len() {
            return Err(DataError::Shape(format!(
                "x has {} rows but y has {} values",
                x.len(),
                y.len()
            )));
        }
        if x.is_empty() {
            return Err(DataError::Empty);
        }
        let n_features = x[0].len();
        if !x.iter().all(|row| row.len() == n_features) {
            return Err(DataError::Shape(
                "all rows must have the same number of features".into(),
            ));
        }
        Ok(Self { x, y, n_features })
    }
}

impl Dataset for InMemoryDataset {
    type Error = DataError;

    fn len(&self) -> Option<usize> {
        Some(self.x.len())
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn get_batch(&self, range: Range<usize>) -> Result<(Array2<f64>, Array1<f64>), Self::Error> {
        if range.start > range.end || range.end > self.x.len() {
            return Err(DataError::Shape(format!(
                "batch range {:?} out of bounds for {} samples",
                range,
                self.x.len()
            )));
        }
        let batch_x = &self.x[range.clone()];
        let batch_y = &self.y[range];

        let data: Vec<f64> = batch_x.iter().flat_map(|row| row.iter()).copied().collect();
        let x = Array2::from_shape_vec((batch_x.len(), self.n_features), data)
            .map_err(|e| DataError::Shape(e.to_string()))?;
        let y = Array1::from_vec(batch_y.to_vec());

        Ok((x, y))
    }
}
