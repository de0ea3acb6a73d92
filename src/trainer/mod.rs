//! Offline training run: load, fit, evaluate, persist.
//!
//! ```no_run
//! use medcost_rs::trainer::Trainer;
//!
//! let report = Trainer::builder()
//!     .dataset_path("insurance.csv")
//!     .artifact_path("rf_tuned.bin")
//!     .build()
//!     .run()
//!     .unwrap();
//! println!("{report}");
//! ```

use crate::artifact::{Artifact, TrainingSummary, DEFAULT_ARTIFACT_PATH};
use crate::config::{AppConfig, DEFAULT_DATASET_PATH};
use crate::dataset::{load_insurance_csv, Dataset};
use crate::error::{DataError, ModelError, TrainError};
use crate::metrics::{Metrics, RegressionMetrics};
use crate::model::{Fitted, ForestConfig, InferenceModel, RandomForest, RandomForestRegressor};
use crate::preprocessing::{Applicant, Region, Sex, Smoker, FEATURE_NAMES, N_FEATURES};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Applicant predicted after every run as a sanity check.
pub const SAMPLE_APPLICANT: Applicant = Applicant {
    age: 30,
    sex: Sex::Male,
    bmi: 25.0,
    children: 0,
    smoker: Smoker::No,
    region: Region::Southeast,
};

/// Outcome of [`Trainer::run`].
#[derive(Clone, Debug, Serialize)]
pub struct TrainingReport {
    pub n_samples: usize,
    pub n_trees: usize,
    /// Measured on the training data itself, so optimistic.
    pub metrics: RegressionMetrics,
    pub artifact_path: PathBuf,
    /// Annual cost predicted for [`SAMPLE_APPLICANT`].
    pub sample_prediction: f64,
}

impl fmt::Display for TrainingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Trained {} trees on {} samples", self.n_trees, self.n_samples)?;
        writeln!(f, "In-sample metrics (training data):")?;
        writeln!(f, "  R2:   {:.4}", self.metrics.r_squared)?;
        writeln!(f, "  RMSE: {:.2}", self.metrics.rmse)?;
        writeln!(f, "  MAE:  {:.2}", self.metrics.mae)?;
        writeln!(f, "Model saved to {}", self.artifact_path.display())?;
        write!(
            f,
            "Sample prediction (30, male, 25.0, 0 children, non-smoker, southeast): {:.2}",
            self.sample_prediction
        )
    }
}

/// A configured training run. Immutable once built.
#[derive(Clone, Debug)]
pub struct Trainer {
    pub(crate) dataset_path: PathBuf,
    pub(crate) artifact_path: PathBuf,
    pub(crate) forest: ForestConfig,
    pub(crate) eval_batch_size: usize,
}

pub struct TrainerBuilder {
    dataset_path: PathBuf,
    artifact_path: PathBuf,
    forest: ForestConfig,
    eval_batch_size: usize,
}

impl TrainerBuilder {
    pub fn new() -> Self {
        Self {
            dataset_path: PathBuf::from(DEFAULT_DATASET_PATH),
            artifact_path: PathBuf::from(DEFAULT_ARTIFACT_PATH),
            forest: ForestConfig::default(),
            eval_batch_size: 256,
        }
    }

    pub fn dataset_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.dataset_path = path.into();
        self
    }

    pub fn artifact_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.artifact_path = path.into();
        self
    }

    pub fn forest_config(mut self, config: ForestConfig) -> Self {
        self.forest = config;
        self
    }

    /// Rows per prediction batch during evaluation.
    pub fn eval_batch_size(mut self, size: usize) -> Self {
        self.eval_batch_size = size;
        self
    }

    pub fn build(self) -> Trainer {
        Trainer {
            dataset_path: self.dataset_path,
            artifact_path: self.artifact_path,
            forest: self.forest,
            eval_batch_size: self.eval_batch_size,
        }
    }
}

impl Default for TrainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Trainer {
    pub fn builder() -> TrainerBuilder {
        TrainerBuilder::new()
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::builder()
            .dataset_path(&config.dataset)
            .artifact_path(&config.artifact)
            .forest_config(config.forest.clone())
            .build()
    }

    pub fn dataset_path(&self) -> &Path {
        &self.dataset_path
    }

    pub fn artifact_path(&self) -> &Path {
        &self.artifact_path
    }

    /// Fit a forest on every row of `dataset`.
    pub fn fit<D>(&self, dataset: &D) -> Result<RandomForest<Fitted>, TrainError>
    where
        D: Dataset<Error = DataError>,
    {
        if dataset.is_empty() {
            return Err(DataError::Empty.into());
        }
        let (x, y) = dataset.to_arrays()?;
        let forest = RandomForestRegressor::with_config(self.forest.clone()).fit(&x, &y)?;
        Ok(forest)
    }

    /// Score `model` against `dataset`, batch by batch.
    pub fn evaluate<M, D>(&self, model: &M, dataset: &D) -> Result<RegressionMetrics, TrainError>
    where
        M: InferenceModel,
        D: Dataset<Error = DataError>,
    {
        let capacity = dataset.len().unwrap_or(0);
        let mut y_true = Vec::with_capacity(capacity);
        let mut y_pred = Vec::with_capacity(capacity);
        for batch in dataset.batches(self.eval_batch_size) {
            let (x, y) = batch?;
            let preds = model.predict_batch(&x)?;
            log::debug!("evaluated batch of {} rows", y.len());
            y_true.extend(y.iter().copied());
            y_pred.extend(preds.iter().copied());
        }
        Ok(Metrics::calculate_all(&y_true, &y_pred))
    }

    /// Full run: load the CSV, fit, evaluate, save the artifact.
    ///
    /// Any [`DataError`] aborts before the artifact is touched.
    pub fn run(&self) -> Result<TrainingReport, TrainError> {
        log::info!("loading dataset from {}", self.dataset_path.display());
        let dataset = load_insurance_csv(&self.dataset_path)?;
        self.run_on(&dataset)
    }

    /// Like [`Trainer::run`] with an already loaded dataset.
    pub fn run_on<D>(&self, dataset: &D) -> Result<TrainingReport, TrainError>
    where
        D: Dataset<Error = DataError>,
    {
        // The predictor encodes applicants into exactly these columns.
        if dataset.n_features() != N_FEATURES {
            return Err(ModelError::FeatureMismatch {
                expected: N_FEATURES,
                got: dataset.n_features(),
            }
            .into());
        }
        log::info!("features: {}", FEATURE_NAMES.join(", "));

        let forest = self.fit(dataset)?;
        let n_samples = dataset.len().unwrap_or(0);
        let metrics = self.evaluate(&forest, dataset)?;
        log::info!(
            "in-sample R2 = {:.4}, RMSE = {:.2}, MAE = {:.2}",
            metrics.r_squared,
            metrics.rmse,
            metrics.mae
        );

        let summary = TrainingSummary {
            n_samples,
            r_squared: metrics.r_squared,
            rmse: metrics.rmse,
            mae: metrics.mae,
        };
        let artifact = Artifact::new(forest, Some(summary));
        artifact.save(&self.artifact_path)?;

        let sample_prediction = artifact.model.predict(SAMPLE_APPLICANT.features().as_slice())?;
        log::info!("sample prediction: {sample_prediction:.2}");

        Ok(TrainingReport {
            n_samples,
            n_trees: artifact.model.n_trees(),
            metrics,
            artifact_path: self.artifact_path.clone(),
            sample_prediction,
        })
    }
}
