//! Random forest regressor.
//!
//! Bagged CART trees whose predictions are averaged. Each tree gets its own
//! seed drawn from a master RNG seeded with [`ForestConfig::seed`], so a fit
//! is reproducible regardless of how rayon schedules the trees.
//!
//! ```rust
//! use medcost_rs::model::{InferenceModel, RandomForestRegressor};
//! use ndarray::{Array1, Array2};
//!
//! let x = Array2::from_shape_vec((6, 1), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
//! let y = Array1::from_vec(vec![1.0, 1.0, 1.0, 5.0, 5.0, 5.0]);
//!
//! let forest = RandomForestRegressor::new()
//!     .with_n_estimators(10)
//!     .with_min_samples_split(2)
//!     .with_min_samples_leaf(1)
//!     .fit(&x, &y)
//!     .unwrap();
//! let pred = forest.predict(&[5.5]).unwrap();
//! assert!(pred > 3.0);
//! ```

use crate::error::ModelError;
use crate::model::tree::{RegressionTree, TreeConfig};
use crate::model::{check_input, Fitted, InferenceModel, Unfitted};
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// How many features each split may examine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaxFeatures {
    #[default]
    All,
    Sqrt,
    Log2,
    /// Fraction of the features, in `(0, 1]`.
    Fraction(f64),
}

impl MaxFeatures {
    /// Number of features to draw out of `n_features` (at least one).
    pub fn resolve(self, n_features: usize) -> usize {
        let k = match self {
            MaxFeatures::All => n_features,
            MaxFeatures::Sqrt => (n_features as f64).sqrt() as usize,
            MaxFeatures::Log2 => (n_features as f64).log2() as usize,
            MaxFeatures::Fraction(f) => (f * n_features as f64) as usize,
        };
        k.clamp(1, n_features.max(1))
    }
}

/// Forest hyperparameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestConfig {
    pub n_estimators: usize,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub max_features: MaxFeatures,
    /// Draw each tree's samples with replacement.
    pub bootstrap: bool,
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: Some(20),
            min_samples_split: 5,
            min_samples_leaf: 2,
            max_features: MaxFeatures::All,
            bootstrap: true,
            seed: 42,
        }
    }
}

impl ForestConfig {
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.n_estimators == 0 {
            return Err(ModelError::InvalidParameter(
                "n_estimators must be at least 1".to_string(),
            ));
        }
        if self.min_samples_split < 2 {
            return Err(ModelError::InvalidParameter(format!(
                "min_samples_split must be >= 2, got {}",
                self.min_samples_split
            )));
        }
        if self.min_samples_leaf < 1 {
            return Err(ModelError::InvalidParameter(
                "min_samples_leaf must be >= 1".to_string(),
            ));
        }
        if let MaxFeatures::Fraction(f) = self.max_features {
            if !(f > 0.0 && f <= 1.0) {
                return Err(ModelError::InvalidParameter(format!(
                    "max_features fraction must be in (0, 1], got {f}"
                )));
            }
        }
        Ok(())
    }

    fn tree_config(&self, n_features: usize) -> TreeConfig {
        TreeConfig {
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            min_samples_leaf: self.min_samples_leaf,
            max_features: Some(self.max_features.resolve(n_features)),
        }
    }
}

/// Serializable representation of a fitted forest.
///
/// `config` records how the forest was trained; inference only reads `trees`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ForestParams {
    pub config: ForestConfig,
    pub n_features: usize,
    pub trees: Vec<RegressionTree>,
}

/// A random forest with its training state encoded in the type.
///
/// - `RandomForest<Unfitted>` ([`RandomForestRegressor`]): hyperparameters + `fit`.
/// - `RandomForest<Fitted>`: trees + [`InferenceModel`].
#[derive(Clone, Debug)]
pub struct RandomForest<S> {
    config: ForestConfig,
    trees: Vec<RegressionTree>,
    n_features: usize,
    _state: PhantomData<S>,
}

/// Alias for an **unfitted** forest.
pub type RandomForestRegressor = RandomForest<Unfitted>;

impl RandomForest<Unfitted> {
    /// Creates an unfitted forest with the default hyperparameters.
    pub fn new() -> Self {
        Self::with_config(ForestConfig::default())
    }

    pub fn with_config(config: ForestConfig) -> Self {
        Self {
            config,
            trees: Vec::new(),
            n_features: 0,
            _state: PhantomData,
        }
    }

    pub fn with_n_estimators(mut self, n: usize) -> Self {
        self.config.n_estimators = n;
        self
    }

    pub fn with_max_depth(mut self, depth: Option<usize>) -> Self {
        self.config.max_depth = depth;
        self
    }

    pub fn with_min_samples_split(mut self, n: usize) -> Self {
        self.config.min_samples_split = n;
        self
    }

    pub fn with_min_samples_leaf(mut self, n: usize) -> Self {
        self.config.min_samples_leaf = n;
        self
    }

    pub fn with_max_features(mut self, max_features: MaxFeatures) -> Self {
        self.config.max_features = max_features;
        self
    }

    pub fn with_bootstrap(mut self, bootstrap: bool) -> Self {
        self.config.bootstrap = bootstrap;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn config(&self) -> &ForestConfig {
        &self.config
    }

    /// Fit on feature matrix `x` `(n_samples, n_features)` and targets `y`.
    ///
    /// # Errors
    /// Returns [`ModelError`] if the hyperparameters are invalid, the data is
    /// empty, shapes disagree, or any value is non-finite.
    pub fn fit(self, x: &Array2<f64>, y: &Array1<f64>) -> Result<RandomForest<Fitted>, ModelError> {
        self.config.validate()?;
        let (n_samples, n_features) = x.dim();
        if n_samples == 0 || n_features == 0 {
            return Err(ModelError::EmptyData(format!(
                "cannot fit a forest on a {n_samples}x{n_features} matrix"
            )));
        }
        if y.len() != n_samples {
            return Err(ModelError::InvalidParameter(format!(
                "x has {n_samples} rows but y has {} values",
                y.len()
            )));
        }
        if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
            return Err(ModelError::InvalidParameter(
                "training data contains non-finite values".to_string(),
            ));
        }

        let tree_config = self.config.tree_config(n_features);
        let mut master = StdRng::seed_from_u64(self.config.seed);
        let seeds: Vec<u64> = (0..self.config.n_estimators)
            .map(|_| master.random())
            .collect();
        let bootstrap = self.config.bootstrap;

        log::info!(
            "fitting {} trees on {} samples x {} features",
            seeds.len(),
            n_samples,
            n_features
        );

        let trees = seeds
            .par_iter()
            .enumerate()
            .map(|(i, &seed)| {
                let mut rng = StdRng::seed_from_u64(seed);
                let samples: Vec<usize> = if bootstrap {
                    (0..n_samples)
                        .map(|_| rng.random_range(0..n_samples))
                        .collect()
                } else {
                    (0..n_samples).collect()
                };
                let tree = RegressionTree::fit(x, y, &samples, &tree_config, &mut rng)?;
                log::debug!(
                    "tree {i}: {} nodes, depth {}",
                    tree.nodes().len(),
                    tree.depth()
                );
                Ok(tree)
            })
            .collect::<Result<Vec<_>, ModelError>>()?;

        Ok(RandomForest {
            config: self.config,
            trees,
            n_features,
            _state: PhantomData,
        })
    }
}

impl Default for RandomForest<Unfitted> {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomForest<Fitted> {
    pub fn trees(&self) -> &[RegressionTree] {
        &self.trees
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Hyperparameters the forest was trained with.
    pub fn config(&self) -> &ForestConfig {
        &self.config
    }
}

impl InferenceModel for RandomForest<Fitted> {
    type ParamsRepr = ForestParams;

    fn n_features(&self) -> usize {
        self.n_features
    }

    /// Mean of the trees' predictions.
    fn predict(&self, input: &[f64]) -> Result<f64, ModelError> {
        check_input(input, self.n_features)?;
        let total: f64 = self.trees.iter().map(|t| t.predict_row(input)).sum();
        let prediction = total / self.trees.len() as f64;
        if !prediction.is_finite() {
            return Err(ModelError::NonFiniteOutput);
        }
        Ok(prediction)
    }

    fn extract_params(&self) -> Self::ParamsRepr {
        ForestParams {
            config: self.config.clone(),
            n_features: self.n_features,
            trees: self.trees.clone(),
        }
    }

    fn from_params(params: Self::ParamsRepr) -> Result<Self, ModelError> {
        if params.trees.is_empty() {
            return Err(ModelError::CorruptParams("forest has no trees".to_string()));
        }
        for (i, tree) in params.trees.iter().enumerate() {
            if tree.n_features() != params.n_features {
                return Err(ModelError::CorruptParams(format!(
                    "tree {i} expects {} features, forest expects {}",
                    tree.n_features(),
                    params.n_features
                )));
            }
            tree.validate()?;
        }
        Ok(RandomForest {
            config: params.config,
            trees: params.trees,
            n_features: params.n_features,
            _state: PhantomData,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear_data(n: usize) -> (Array2<f64>, Array1<f64>) {
        // y = 3 * x0 + 10 * x1, x1 in {0, 1}
        let mut data = Vec::with_capacity(n * 2);
        let mut y = Vec::with_capacity(n);
        for i in 0..n {
            let x0 = i as f64;
            let x1 = (i % 2) as f64;
            data.push(x0);
            data.push(x1);
            y.push(3.0 * x0 + 10.0 * x1);
        }
        (
            Array2::from_shape_vec((n, 2), data).unwrap(),
            Array1::from_vec(y),
        )
    }

    fn small_forest() -> RandomForestRegressor {
        RandomForestRegressor::new().with_n_estimators(8)
    }

    #[test]
    fn test_default_config() {
        let config = ForestConfig::default();
        assert_eq!(config.n_estimators, 100);
        assert_eq!(config.max_depth, Some(20));
        assert_eq!(config.min_samples_split, 5);
        assert_eq!(config.min_samples_leaf, 2);
        assert_eq!(config.max_features, MaxFeatures::All);
        assert!(config.bootstrap);
        assert_eq!(config.seed, 42);
    }

    #[test]
    fn test_builder_chaining() {
        let forest = RandomForestRegressor::new()
            .with_n_estimators(5)
            .with_max_depth(None)
            .with_seed(7)
            .with_bootstrap(false);
        assert_eq!(forest.config().n_estimators, 5);
        assert_eq!(forest.config().max_depth, None);
        assert_eq!(forest.config().seed, 7);
        assert!(!forest.config().bootstrap);
    }

    #[test]
    fn test_fit_predicts_reasonably() {
        let (x, y) = linear_data(60);
        let forest = small_forest().fit(&x, &y).unwrap();
        assert_eq!(forest.n_trees(), 8);

        let pred = forest.predict(&[30.0, 0.0]).unwrap();
        assert!((pred - 90.0).abs() < 15.0, "pred = {pred}");
    }

    #[test]
    fn test_fit_is_deterministic() {
        let (x, y) = linear_data(40);
        let a = small_forest().fit(&x, &y).unwrap();
        let b = small_forest().fit(&x, &y).unwrap();
        assert_eq!(a.extract_params(), b.extract_params());
    }

    #[test]
    fn test_seed_changes_forest() {
        let (x, y) = linear_data(40);
        let a = small_forest().with_seed(1).fit(&x, &y).unwrap();
        let b = small_forest().with_seed(2).fit(&x, &y).unwrap();
        assert_ne!(a.extract_params().trees, b.extract_params().trees);
    }

    #[test]
    fn test_predict_is_idempotent() {
        let (x, y) = linear_data(40);
        let forest = small_forest().fit(&x, &y).unwrap();
        let p1 = forest.predict(&[12.0, 1.0]).unwrap();
        let p2 = forest.predict(&[12.0, 1.0]).unwrap();
        assert_eq!(p1.to_bits(), p2.to_bits());
    }

    #[test]
    fn test_without_bootstrap_all_trees_equal() {
        let (x, y) = linear_data(20);
        let forest = small_forest().with_bootstrap(false).fit(&x, &y).unwrap();
        let first = &forest.trees()[0];
        assert!(forest.trees().iter().all(|t| t == first));
    }

    #[test]
    fn test_predict_batch_matches_single() {
        let (x, y) = linear_data(30);
        let forest = small_forest().fit(&x, &y).unwrap();
        let batch = forest.predict_batch(&x).unwrap();
        for (i, row) in x.rows().into_iter().enumerate() {
            assert_eq!(batch[i], forest.predict(&row.to_vec()).unwrap());
        }
    }

    #[test]
    fn test_predict_feature_mismatch() {
        let (x, y) = linear_data(20);
        let forest = small_forest().fit(&x, &y).unwrap();
        assert!(matches!(
            forest.predict(&[1.0]),
            Err(ModelError::FeatureMismatch {
                expected: 2,
                got: 1
            })
        ));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let (x, y) = linear_data(10);
        assert!(small_forest().with_n_estimators(0).fit(&x, &y).is_err());
        assert!(small_forest().with_min_samples_split(1).fit(&x, &y).is_err());
        assert!(small_forest().with_min_samples_leaf(0).fit(&x, &y).is_err());
        assert!(small_forest()
            .with_max_features(MaxFeatures::Fraction(1.5))
            .fit(&x, &y)
            .is_err());
    }

    #[test]
    fn test_fit_rejects_non_finite() {
        let (x, mut y) = linear_data(10);
        y[3] = f64::NAN;
        assert!(matches!(
            small_forest().fit(&x, &y),
            Err(ModelError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_fit_rejects_length_mismatch() {
        let (x, _) = linear_data(10);
        let y = Array1::zeros(9);
        assert!(small_forest().fit(&x, &y).is_err());
    }

    #[test]
    fn test_max_features_resolve() {
        assert_eq!(MaxFeatures::All.resolve(6), 6);
        assert_eq!(MaxFeatures::Sqrt.resolve(6), 2);
        assert_eq!(MaxFeatures::Log2.resolve(6), 2);
        assert_eq!(MaxFeatures::Fraction(0.5).resolve(6), 3);
        assert_eq!(MaxFeatures::Fraction(0.01).resolve(6), 1);
    }

    #[test]
    fn test_feature_subsampling_fits() {
        let (x, y) = linear_data(40);
        let forest = small_forest()
            .with_max_features(MaxFeatures::Sqrt)
            .fit(&x, &y)
            .unwrap();
        assert!(forest.predict(&[10.0, 0.0]).unwrap().is_finite());
    }

    #[test]
    fn test_params_round_trip() {
        let (x, y) = linear_data(30);
        let forest = small_forest().fit(&x, &y).unwrap();
        let rebuilt = RandomForest::<Fitted>::from_params(forest.extract_params()).unwrap();
        assert_eq!(rebuilt.n_features(), 2);
        assert_eq!(
            rebuilt.predict(&[7.0, 1.0]).unwrap().to_bits(),
            forest.predict(&[7.0, 1.0]).unwrap().to_bits()
        );
    }

    #[test]
    fn test_from_params_rejects_empty_forest() {
        let params = ForestParams {
            config: ForestConfig::default(),
            n_features: 6,
            trees: Vec::new(),
        };
        assert!(matches!(
            RandomForest::<Fitted>::from_params(params),
            Err(ModelError::CorruptParams(_))
        ));
    }

    #[test]
    fn test_from_params_rejects_feature_disagreement() {
        let (x, y) = linear_data(20);
        let mut params = small_forest().fit(&x, &y).unwrap().extract_params();
        params.n_features = 3;
        assert!(RandomForest::<Fitted>::from_params(params).is_err());
    }
}
