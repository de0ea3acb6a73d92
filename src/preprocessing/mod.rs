//! Turning applicant records into model inputs.
//!
//! - [`encoding`]: fixed category → integer tables shared by trainer and predictor
//! - [`features`]: the [`Applicant`] record and its [`FeatureVector`]

pub mod encoding;
pub mod features;

pub use encoding::{Category, EncodingTable, Region, Sex, Smoker, UnknownCategory, ENCODING_VERSION};
pub use features::{
    Applicant, FeatureVector, AGE_RANGE, BMI_RANGE, CHILDREN_RANGE, FEATURE_NAMES, N_FEATURES,
};
