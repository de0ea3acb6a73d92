//! Regression models with compile-time training state.
//!
//! Models follow a two-phase type-state design:
//! - `Model<Unfitted>` holds hyperparameters and exposes `fit`.
//! - `Model<Fitted>` holds only what inference needs and implements
//!   [`InferenceModel`].

pub mod forest;
pub mod state;
pub mod tree;

pub use forest::{ForestConfig, ForestParams, MaxFeatures, RandomForest, RandomForestRegressor};
pub use state::{Fitted, Unfitted};
pub use tree::{Node, RegressionTree, TreeConfig};

use crate::error::ModelError;
use ndarray::{Array1, Array2};
use serde::{de::DeserializeOwned, Serialize};

/// Inference interface of a fitted regressor.
///
/// Implementations are immutable: predicting the same input twice returns the
/// same value.
pub trait InferenceModel {
    /// Plain-data parameter representation written to artifacts.
    type ParamsRepr: Serialize + DeserializeOwned;

    /// Width of the input vector.
    fn n_features(&self) -> usize;

    /// Predict one sample.
    fn predict(&self, input: &[f64]) -> Result<f64, ModelError>;

    /// Predict every row of `input`.
    fn predict_batch(&self, input: &Array2<f64>) -> Result<Array1<f64>, ModelError> {
        if input.ncols() != self.n_features() {
            return Err(ModelError::FeatureMismatch {
                expected: self.n_features(),
                got: input.ncols(),
            });
        }
        input
            .rows()
            .into_iter()
            .map(|row| match row.as_slice() {
                Some(slice) => self.predict(slice),
                None => self.predict(&row.to_vec()),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Array1::from_vec)
    }

    fn extract_params(&self) -> Self::ParamsRepr;

    /// Rebuild from parameters, validating their structure.
    fn from_params(params: Self::ParamsRepr) -> Result<Self, ModelError>
    where
        Self: Sized;
}

/// Shape and finiteness check shared by model implementations.
pub(crate) fn check_input(input: &[f64], n_features: usize) -> Result<(), ModelError> {
    if input.len() != n_features {
        return Err(ModelError::FeatureMismatch {
            expected: n_features,
            got: input.len(),
        });
    }
    match input.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(ModelError::NonFiniteInput { index }),
        None => Ok(()),
    }
}
