//! Applicant attributes and their fixed-order feature vector.

use crate::preprocessing::encoding::{Category, Region, Sex, Smoker};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Number of model inputs.
pub const N_FEATURES: usize = 6;

/// Column order of the feature vector.
pub const FEATURE_NAMES: [&str; N_FEATURES] = ["age", "sex", "bmi", "children", "smoker", "region"];

/// Accepted age range, years.
pub const AGE_RANGE: RangeInclusive<u32> = 18..=100;
/// Accepted BMI range.
pub const BMI_RANGE: RangeInclusive<f64> = 10.0..=60.0;
/// Accepted number of dependent children.
pub const CHILDREN_RANGE: RangeInclusive<u32> = 0..=10;

/// One applicant, as entered in the form or read from the dataset.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Applicant {
    pub age: u32,
    pub sex: Sex,
    pub bmi: f64,
    pub children: u32,
    pub smoker: Smoker,
    pub region: Region,
}

impl Applicant {
    /// Encode into the model's feature order.
    pub fn features(&self) -> FeatureVector {
        FeatureVector([
            self.age as f64,
            self.sex.code() as f64,
            self.bmi,
            self.children as f64,
            self.smoker.code() as f64,
            self.region.code() as f64,
        ])
    }

    /// Whether every numeric attribute lies in its accepted range.
    pub fn in_bounds(&self) -> bool {
        AGE_RANGE.contains(&self.age)
            && BMI_RANGE.contains(&self.bmi)
            && CHILDREN_RANGE.contains(&self.children)
    }

    /// Copy with every numeric attribute clamped into range.
    pub fn clamped(&self) -> Self {
        Self {
            age: self.age.clamp(*AGE_RANGE.start(), *AGE_RANGE.end()),
            bmi: self.bmi.clamp(*BMI_RANGE.start(), *BMI_RANGE.end()),
            children: self
                .children
                .clamp(*CHILDREN_RANGE.start(), *CHILDREN_RANGE.end()),
            ..*self
        }
    }
}

impl Default for Applicant {
    fn default() -> Self {
        Self {
            age: 30,
            sex: Sex::Male,
            bmi: 25.0,
            children: 0,
            smoker: Smoker::No,
            region: Region::Southwest,
        }
    }
}

/// Encoded model input: `(age, sex, bmi, children, smoker, region)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FeatureVector(pub [f64; N_FEATURES]);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn to_array(&self) -> Array1<f64> {
        Array1::from_vec(self.0.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_applicant() -> Applicant {
        Applicant {
            age: 30,
            sex: Sex::Male,
            bmi: 25.0,
            children: 0,
            smoker: Smoker::No,
            region: Region::Southeast,
        }
    }

    #[test]
    fn test_reference_applicant_encoding() {
        let fv = reference_applicant().features();
        assert_eq!(fv.0, [30.0, 1.0, 25.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_encoding_is_pure() {
        let a = reference_applicant();
        assert_eq!(a.features(), a.features());
    }

    #[test]
    fn test_feature_names_follow_dataset_columns() {
        assert_eq!(FEATURE_NAMES[..], crate::dataset::insurance::COLUMNS[..N_FEATURES]);
    }

    #[test]
    fn test_to_array_keeps_order() {
        let arr = reference_applicant().features().to_array();
        assert_eq!(arr.len(), N_FEATURES);
        assert_eq!(arr[2], 25.0);
        assert_eq!(arr[5], 1.0);
    }

    #[test]
    fn test_boundaries_accepted() {
        for (age, bmi, children) in [(18, 10.0, 0), (100, 60.0, 10)] {
            let a = Applicant {
                age,
                bmi,
                children,
                ..Applicant::default()
            };
            assert!(a.in_bounds());
            assert_eq!(a.clamped(), a);
        }
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        let a = Applicant {
            age: 12,
            bmi: 75.3,
            children: 14,
            ..Applicant::default()
        };
        assert!(!a.in_bounds());
        let c = a.clamped();
        assert_eq!(c.age, 18);
        assert_eq!(c.bmi, 60.0);
        assert_eq!(c.children, 10);
        assert!(c.in_bounds());
    }

    #[test]
    fn test_default_matches_form_defaults() {
        let d = Applicant::default();
        assert_eq!(d.age, 30);
        assert_eq!(d.sex, Sex::Male);
        assert_eq!(d.region, Region::Southwest);
    }
}
