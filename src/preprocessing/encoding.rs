//! Fixed categorical encoding shared by training and inference.
//!
//! Unlike a label encoder fitted per run, these tables are constants. A
//! retrained artifact always sees the same category → integer mapping, and
//! every artifact records the table it was trained with (see
//! [`EncodingTable`]) so a predictor built from different code refuses it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Bumped whenever any table below changes.
pub const ENCODING_VERSION: u32 = 1;

/// A categorical column with a fixed integer code per category.
pub trait Category: Copy + Sized + 'static {
    /// Dataset column name.
    const COLUMN: &'static str;
    /// All categories, in code order.
    const ALL: &'static [Self];

    /// Integer code fed to the model.
    fn code(self) -> u8;

    /// Lower-case label as it appears in the dataset.
    fn label(self) -> &'static str;

    /// Inverse of [`Category::code`].
    fn from_code(code: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.code() == code)
    }

    /// Case-insensitive lookup by label; surrounding whitespace is ignored.
    fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.label().eq_ignore_ascii_case(label))
    }

    /// `(label, code)` pairs in code order.
    fn table() -> Vec<(String, u8)> {
        Self::ALL
            .iter()
            .map(|c| (c.label().to_string(), c.code()))
            .collect()
    }
}

/// Error returned when parsing an unknown category label.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {column} {value:?}")]
pub struct UnknownCategory {
    pub column: &'static str,
    pub value: String,
}

macro_rules! category {
    (
        $(#[$meta:meta])*
        $name:ident, $column:literal {
            $($variant:ident = $code:literal => $label:literal, $display:literal;)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($variant,)+
        }

        impl Category for $name {
            const COLUMN: &'static str = $column;
            const ALL: &'static [Self] = &[$($name::$variant,)+];

            fn code(self) -> u8 {
                match self {
                    $($name::$variant => $code,)+
                }
            }

            fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let display = match self {
                    $($name::$variant => $display,)+
                };
                f.write_str(display)
            }
        }

        impl FromStr for $name {
            type Err = UnknownCategory;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <$name as Category>::from_label(s).ok_or_else(|| UnknownCategory {
                    column: $column,
                    value: s.to_string(),
                })
            }
        }
    };
}

category! {
    /// Applicant sex.
    Sex, "sex" {
        Female = 0 => "female", "Female";
        Male = 1 => "male", "Male";
    }
}

category! {
    /// Smoker status.
    Smoker, "smoker" {
        No = 0 => "no", "No";
        Yes = 1 => "yes", "Yes";
    }
}

category! {
    /// US region of residence.
    Region, "region" {
        Southwest = 0 => "southwest", "Southwest";
        Southeast = 1 => "southeast", "Southeast";
        Northwest = 2 => "northwest", "Northwest";
        Northeast = 3 => "northeast", "Northeast";
    }
}

/// Serializable snapshot of every categorical table.
///
/// Stored in the artifact header and compared on load.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EncodingTable {
    pub version: u32,
    /// `(column, [(label, code)])`, one entry per categorical column.
    pub columns: Vec<(String, Vec<(String, u8)>)>,
}

impl EncodingTable {
    /// The table compiled into this build.
    pub fn current() -> Self {
        Self {
            version: ENCODING_VERSION,
            columns: vec![
                (Sex::COLUMN.to_string(), Sex::table()),
                (Smoker::COLUMN.to_string(), Smoker::table()),
                (Region::COLUMN.to_string(), Region::table()),
            ],
        }
    }

    /// Whether a stored table is identical to this build's.
    pub fn is_current(&self) -> bool {
        *self == Self::current()
    }
}
