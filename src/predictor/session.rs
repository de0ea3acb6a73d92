//! Prediction session state machine.
//!
//! ```text
//! Idle ──submit──► InputsCollected ──predict──► Predicted
//!   │                     │                         │
//!   │                     └──────predict──► Error ◄─┘ submit restarts
//!   ▼
//! Error (halted)   artifact could not be loaded
//! ```

use crate::artifact::TrainingSummary;
use crate::error::PredictError;
use crate::model::InferenceModel;
use crate::predictor::{CostBreakdown, ModelHandle, Predictor};
use crate::preprocessing::Applicant;

#[derive(Debug)]
pub enum SessionState {
    Idle,
    InputsCollected(Applicant),
    Predicted {
        applicant: Applicant,
        quote: CostBreakdown,
    },
    /// A halted session never leaves this state.
    Error { error: PredictError, halted: bool },
}

/// One user's interaction with a loaded model.
pub struct Session<M> {
    predictor: Option<Predictor<M>>,
    state: SessionState,
}

impl<M: InferenceModel> Session<M> {
    /// Load the handle's artifact. On failure the session starts halted.
    pub fn open(handle: &ModelHandle<M>) -> Self {
        match Predictor::from_handle(handle) {
            Ok(predictor) => Self {
                predictor: Some(predictor),
                state: SessionState::Idle,
            },
            Err(error) => {
                log::error!("model {} unavailable: {error}", handle.path().display());
                Self {
                    predictor: None,
                    state: SessionState::Error {
                        error,
                        halted: true,
                    },
                }
            }
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_halted(&self) -> bool {
        matches!(self.state, SessionState::Error { halted: true, .. })
    }

    /// Training figures of the loaded model, if it carries any.
    pub fn summary(&self) -> Option<TrainingSummary> {
        self.predictor.as_ref().and_then(Predictor::summary)
    }

    /// Record a new set of inputs.
    pub fn submit(&mut self, applicant: Applicant) -> Result<(), PredictError> {
        if self.is_halted() {
            return Err(PredictError::Halted);
        }
        self.state = SessionState::InputsCollected(applicant);
        Ok(())
    }

    /// Predict for the collected inputs.
    ///
    /// Without collected inputs the session moves to a recoverable
    /// [`PredictError::NotReady`]. A halted session is left untouched.
    pub fn predict(&mut self) -> &SessionState {
        if self.is_halted() {
            return &self.state;
        }
        let next = match (&self.state, &self.predictor) {
            (SessionState::InputsCollected(applicant), Some(predictor)) => {
                match predictor.quote(applicant) {
                    Ok(quote) => SessionState::Predicted {
                        applicant: *applicant,
                        quote,
                    },
                    Err(error) => SessionState::Error {
                        error,
                        halted: false,
                    },
                }
            }
            (_, None) => SessionState::Error {
                error: PredictError::Halted,
                halted: true,
            },
            _ => SessionState::Error {
                error: PredictError::NotReady,
                halted: false,
            },
        };
        self.state = next;
        &self.state
    }

    /// Submit and predict in one step.
    pub fn trigger(&mut self, applicant: Applicant) -> &SessionState {
        if self.submit(applicant).is_err() {
            return &self.state;
        }
        self.predict()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::Artifact;
    use crate::predictor::tests::Constant;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("medcost-session-{}-{name}", std::process::id()))
    }

    #[test]
    fn test_happy_path() {
        let mut session = Session::open(&ModelHandle::from_model(Constant(1200.0)));
        assert!(matches!(session.state(), SessionState::Idle));

        session.submit(Applicant::default()).unwrap();
        assert!(matches!(session.state(), SessionState::InputsCollected(_)));

        match session.predict() {
            SessionState::Predicted { quote, .. } => {
                assert_eq!(quote.annual, 1200.0);
                assert_eq!(quote.monthly, 100.0);
            }
            other => panic!("unexpected state {other:?}"),
        }
    }

    #[test]
    fn test_missing_artifact_halts() {
        let handle = ModelHandle::<Constant>::new(temp_path("absent.bin"));
        let mut session = Session::open(&handle);
        assert!(session.is_halted());
        assert!(matches!(
            session.state(),
            SessionState::Error {
                error: PredictError::ArtifactMissing { .. },
                halted: true
            }
        ));

        assert!(matches!(
            session.submit(Applicant::default()),
            Err(PredictError::Halted)
        ));
        // The load error stays visible.
        assert!(matches!(
            session.trigger(Applicant::default()),
            SessionState::Error {
                error: PredictError::ArtifactMissing { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_negative_result_is_recoverable() {
        let mut session = Session::open(&ModelHandle::from_model(Constant(-5.0)));
        let state = session.trigger(Applicant::default());
        assert!(matches!(
            state,
            SessionState::Error {
                error: PredictError::NegativeResult { .. },
                halted: false
            }
        ));
        assert!(session.submit(Applicant::default()).is_ok());
        assert!(matches!(session.state(), SessionState::InputsCollected(_)));
    }

    #[test]
    fn test_predict_without_inputs() {
        let mut session = Session::open(&ModelHandle::from_model(Constant(1.0)));
        assert!(matches!(
            session.predict(),
            SessionState::Error {
                error: PredictError::NotReady,
                halted: false
            }
        ));
    }

    #[test]
    fn test_resubmit_after_prediction() {
        let mut session = Session::open(&ModelHandle::from_model(Constant(520.0)));
        session.trigger(Applicant::default());
        let older = Applicant {
            age: 64,
            ..Applicant::default()
        };
        match session.trigger(older) {
            SessionState::Predicted { applicant, quote } => {
                assert_eq!(applicant.age, 64);
                assert_eq!(quote.weekly, 10.0);
            }
            other => panic!("unexpected state {other:?}"),
        }
    }

    #[test]
    fn test_summary_from_artifact() {
        let path = temp_path("summary.bin");
        let summary = TrainingSummary {
            n_samples: 1338,
            r_squared: 0.97,
            rmse: 2000.0,
            mae: 1100.0,
        };
        Artifact::new(Constant(1.0), Some(summary)).save(&path).unwrap();

        let session = Session::open(&ModelHandle::<Constant>::new(&path));
        assert_eq!(session.summary(), Some(summary));
        std::fs::remove_file(&path).unwrap();
    }
}
