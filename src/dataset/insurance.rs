//! Loader for the insurance charges CSV.
//!
//! Expected header (any column order):
//! `age, sex, bmi, children, smoker, region, charges`.
//! Categorical columns are encoded with the fixed tables from
//! [`crate::preprocessing::encoding`]; nothing is learned from the file.

use crate::dataset::InMemoryDataset;
use crate::error::DataError;
use crate::preprocessing::{Applicant, Category, Region, Sex, Smoker};
use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::str::FromStr;

/// Required dataset columns, inputs first, target last.
pub const COLUMNS: [&str; 7] = ["age", "sex", "bmi", "children", "smoker", "region", "charges"];

/// One training row: applicant plus observed annual charges.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InsuranceRecord {
    pub applicant: Applicant,
    pub charges: f64,
}

/// Positions of the required columns in the header.
struct ColumnIndex([usize; 7]);

impl ColumnIndex {
    fn resolve(headers: &StringRecord) -> Result<Self, DataError> {
        let mut idx = [0usize; 7];
        for (slot, column) in idx.iter_mut().zip(COLUMNS) {
            let mut matches = headers
                .iter()
                .enumerate()
                .filter(|(_, h)| h.trim().eq_ignore_ascii_case(column))
                .map(|(i, _)| i);
            *slot = matches.next().ok_or_else(|| DataError::MissingColumn {
                column: column.to_string(),
            })?;
            if matches.next().is_some() {
                return Err(DataError::DuplicateColumn {
                    column: column.to_string(),
                });
            }
        }
        Ok(Self(idx))
    }

    fn field<'r>(&self, record: &'r StringRecord, col: usize) -> &'r str {
        record.get(self.0[col]).unwrap_or("").trim()
    }
}

fn parse_number<T: FromStr>(
    record: &StringRecord,
    columns: &ColumnIndex,
    col: usize,
    row: usize,
) -> Result<T, DataError> {
    let raw = columns.field(record, col);
    raw.parse::<T>().map_err(|_| DataError::Malformed {
        row,
        column: COLUMNS[col].to_string(),
        value: raw.to_string(),
    })
}

fn parse_category<C: Category>(
    record: &StringRecord,
    columns: &ColumnIndex,
    col: usize,
    row: usize,
) -> Result<C, DataError> {
    let raw = columns.field(record, col);
    C::from_label(raw).ok_or_else(|| DataError::UnknownCategory {
        row,
        column: C::COLUMN.to_string(),
        value: raw.to_string(),
    })
}

fn parse_finite(
    record: &StringRecord,
    columns: &ColumnIndex,
    col: usize,
    row: usize,
) -> Result<f64, DataError> {
    let value: f64 = parse_number(record, columns, col, row)?;
    if !value.is_finite() {
        return Err(DataError::Malformed {
            row,
            column: COLUMNS[col].to_string(),
            value: columns.field(record, col).to_string(),
        });
    }
    Ok(value)
}

/// Parse insurance records from any CSV reader.
///
/// Row numbers in errors are 1-based data rows (the header is row 0).
pub fn read_insurance_csv<R: Read>(reader: R) -> Result<Vec<InsuranceRecord>, DataError> {
    let mut rdr = ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let columns = ColumnIndex::resolve(rdr.headers()?)?;

    let mut records = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        let row = i + 1;

        let applicant = Applicant {
            age: parse_number(&record, &columns, 0, row)?,
            sex: parse_category::<Sex>(&record, &columns, 1, row)?,
            bmi: parse_finite(&record, &columns, 2, row)?,
            children: parse_number(&record, &columns, 3, row)?,
            smoker: parse_category::<Smoker>(&record, &columns, 4, row)?,
            region: parse_category::<Region>(&record, &columns, 5, row)?,
        };
        let charges = parse_finite(&record, &columns, 6, row)?;

        records.push(InsuranceRecord { applicant, charges });
    }

    if records.is_empty() {
        return Err(DataError::Empty);
    }
    Ok(records)
}

/// Load and encode the dataset at `path`.
pub fn load_insurance_csv<P: AsRef<Path>>(path: P) -> Result<InMemoryDataset, DataError> {
    let file = File::open(path.as_ref())?;
    let records = read_insurance_csv(BufReader::new(file))?;
    log::info!(
        "loaded {} records from {}",
        records.len(),
        path.as_ref().display()
    );
    into_dataset(&records)
}

/// Encode records into a feature matrix and target vector.
pub fn into_dataset(records: &[InsuranceRecord]) -> Result<InMemoryDataset, DataError> {
    let x = records
        .iter()
        .map(|r| r.applicant.features().0.to_vec())
        .collect();
    let y = records.iter().map(|r| r.charges).collect();
    InMemoryDataset::new(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;

    const SAMPLE: &str = "\
age,sex,bmi,children,smoker,region,charges
19,female,27.9,0,yes,southwest,16884.924
18,male,33.77,1,no,southeast,1725.5523
28,male,33,3,no,southeast,4449.462
33,male,22.705,0,no,northwest,21984.47061
";

    #[test]
    fn test_read_sample() {
        let records = read_insurance_csv(SAMPLE.as_bytes()).unwrap();
        assert_eq!(records.len(), 4);
        assert_eq!(records[0].applicant.sex, Sex::Female);
        assert_eq!(records[0].applicant.smoker, Smoker::Yes);
        assert_eq!(records[3].applicant.region, Region::Northwest);
        assert!((records[1].charges - 1725.5523).abs() < 1e-9);
    }

    #[test]
    fn test_encoded_matrix() {
        let records = read_insurance_csv(SAMPLE.as_bytes()).unwrap();
        let ds = into_dataset(&records).unwrap();
        let (x, y) = ds.to_arrays().unwrap();
        assert_eq!(x.dim(), (4, 6));
        assert_eq!(x.row(1).to_vec(), vec![18.0, 1.0, 33.77, 1.0, 0.0, 1.0]);
        assert_eq!(y.len(), 4);
    }

    #[test]
    fn test_column_order_is_free() {
        let csv = "charges,region,smoker,children,bmi,sex,age\n100.0,northeast,no,2,30.1,female,40\n";
        let records = read_insurance_csv(csv.as_bytes()).unwrap();
        assert_eq!(records[0].applicant.age, 40);
        assert_eq!(records[0].applicant.region, Region::Northeast);
        assert_eq!(records[0].charges, 100.0);
    }

    #[test]
    fn test_missing_smoker_column() {
        let csv = "age,sex,bmi,children,region,charges\n19,female,27.9,0,southwest,16884.9\n";
        let err = read_insurance_csv(csv.as_bytes()).unwrap_err();
        match err {
            DataError::MissingColumn { column } => assert_eq!(column, "smoker"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicate_smoker_column() {
        let csv = "age,sex,bmi,children,smoker,region,charges,smoker\n30,male,25,0,no,southeast,100,yes\n";
        let err = read_insurance_csv(csv.as_bytes()).unwrap_err();
        match err {
            DataError::DuplicateColumn { column } => assert_eq!(column, "smoker"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicate_header_differs_only_in_case() {
        let csv = "age,sex,bmi,children,smoker,region,charges,Age\n30,male,25,0,no,southeast,100,31\n";
        let err = read_insurance_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::DuplicateColumn { column } if column == "age"));
    }

    #[test]
    fn test_malformed_number() {
        let csv = "age,sex,bmi,children,smoker,region,charges\nold,female,27.9,0,yes,southwest,1.0\n";
        let err = read_insurance_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::Malformed { row: 1, .. }));
    }

    #[test]
    fn test_non_finite_charges() {
        let csv = "age,sex,bmi,children,smoker,region,charges\n20,female,27.9,0,yes,southwest,NaN\n";
        let err = read_insurance_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::Malformed { .. }));
    }

    #[test]
    fn test_unknown_region() {
        let csv = "age,sex,bmi,children,smoker,region,charges\n20,female,27.9,0,yes,midwest,1.0\n";
        let err = read_insurance_csv(csv.as_bytes()).unwrap_err();
        match err {
            DataError::UnknownCategory { column, value, .. } => {
                assert_eq!(column, "region");
                assert_eq!(value, "midwest");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_header_only_is_empty() {
        let csv = "age,sex,bmi,children,smoker,region,charges\n";
        let err = read_insurance_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::Empty));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("medcost_no_such_dataset.csv");
        let err = load_insurance_csv(&path).unwrap_err();
        assert!(matches!(err, DataError::Io(_)));
    }
}
