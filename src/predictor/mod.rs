//! Inference side: artifact handle, predictor and session.
//!
//! The model is loaded at most once per [`ModelHandle`] and shared through an
//! `Arc`. Nothing is global; callers pass the handle to whoever predicts.

pub mod quote;
pub mod session;

pub use quote::{format_usd, CostBreakdown};
pub use session::{Session, SessionState};

use crate::artifact::{Artifact, TrainingSummary};
use crate::error::{ArtifactError, ModelError, PredictError};
use crate::model::InferenceModel;
use crate::preprocessing::Applicant;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

/// Lazily loaded, read-only model artifact.
pub struct ModelHandle<M> {
    path: PathBuf,
    cell: OnceLock<Arc<Artifact<M>>>,
}

impl<M: InferenceModel> ModelHandle<M> {
    /// Handle for the artifact at `path`. Nothing is read until first use.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cell: OnceLock::new(),
        }
    }

    /// Handle around an already built model.
    pub fn from_model(model: M) -> Self {
        Self::from_artifact(Artifact::new(model, None))
    }

    pub fn from_artifact(artifact: Artifact<M>) -> Self {
        let cell = OnceLock::new();
        let _ = cell.set(Arc::new(artifact));
        Self {
            path: PathBuf::from("<memory>"),
            cell,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }

    /// The artifact, loading it on the first call.
    ///
    /// A failed load is not cached; the next call tries again.
    pub fn get(&self) -> Result<Arc<Artifact<M>>, ArtifactError> {
        if let Some(artifact) = self.cell.get() {
            return Ok(Arc::clone(artifact));
        }
        let loaded = Arc::new(Artifact::load(&self.path)?);
        Ok(Arc::clone(self.cell.get_or_init(|| loaded)))
    }
}

/// Turns applicants into cost estimates with a loaded model.
pub struct Predictor<M> {
    artifact: Arc<Artifact<M>>,
}

impl<M> Clone for Predictor<M> {
    fn clone(&self) -> Self {
        Self {
            artifact: Arc::clone(&self.artifact),
        }
    }
}

impl<M: InferenceModel> Predictor<M> {
    /// Resolve the handle's artifact.
    ///
    /// # Errors
    /// [`PredictError::ArtifactMissing`] if the file does not exist,
    /// [`PredictError::Artifact`] if it cannot be used.
    pub fn from_handle(handle: &ModelHandle<M>) -> Result<Self, PredictError> {
        let artifact = handle.get()?;
        Ok(Self { artifact })
    }

    pub fn summary(&self) -> Option<TrainingSummary> {
        self.artifact.summary
    }

    /// Annual cost for `applicant`.
    ///
    /// Values are encoded as given; range checks belong to the caller.
    pub fn estimate(&self, applicant: &Applicant) -> Result<f64, PredictError> {
        let features = applicant.features();
        let annual = self.artifact.model.predict(features.as_slice())?;
        if !annual.is_finite() {
            return Err(ModelError::NonFiniteOutput.into());
        }
        if annual < 0.0 {
            log::warn!("model returned a negative cost for {applicant:?}");
            return Err(PredictError::NegativeResult { value: annual });
        }
        log::debug!("estimate {annual:.2} for {applicant:?}");
        Ok(annual)
    }

    pub fn quote(&self, applicant: &Applicant) -> Result<CostBreakdown, PredictError> {
        self.estimate(applicant).map(CostBreakdown::from_annual)
    }
}
