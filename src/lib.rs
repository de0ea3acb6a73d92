//! # medcost-rs
//!
//! Annual medical insurance cost estimation from six applicant attributes
//! (age, sex, BMI, children, smoker, region).
//!
//! The crate has two halves:
//!
//! - **Training** ([`trainer`]): load the insurance CSV, fit a
//!   [`RandomForestRegressor`](model::RandomForestRegressor), report in-sample
//!   metrics and write an [`Artifact`](artifact::Artifact).
//! - **Prediction** ([`predictor`], [`ui`]): load the artifact once through a
//!   [`ModelHandle`](predictor::ModelHandle), encode form inputs with the same
//!   fixed tables and show the annual, monthly, weekly and daily cost.
//!
//! ```no_run
//! use medcost_rs::model::{Fitted, RandomForest};
//! use medcost_rs::predictor::{ModelHandle, Predictor};
//! use medcost_rs::preprocessing::Applicant;
//!
//! let handle = ModelHandle::<RandomForest<Fitted>>::new("rf_tuned.bin");
//! let predictor = Predictor::from_handle(&handle).unwrap();
//! let quote = predictor.quote(&Applicant::default()).unwrap();
//! println!("{quote}");
//! ```

pub mod artifact;
pub mod config;
pub mod dataset;
pub mod error;
pub mod metrics;
pub mod model;
pub mod predictor;
pub mod preprocessing;
pub mod serialization;
pub mod trainer;
pub mod ui;

pub use error::{ArtifactError, ConfigError, DataError, ModelError, PredictError, TrainError};
pub use model::{Fitted, InferenceModel, RandomForest, RandomForestRegressor, Unfitted};

/// The model type the binaries train and serve.
pub type CostModel = RandomForest<Fitted>;
