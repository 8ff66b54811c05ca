// 📇 Record Store - immutable acquisition records + derived vocabularies
// Shape is validated on load; a constructed store is always coherent.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

/// Columns every input table must carry, in canonical order.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "year",
    "gender",
    "age",
    "birth_year",
    "region",
    "certificate_type",
    "acquired_at",
];

/// Datetime formats accepted for `acquired_at`, tried in order.
/// A bare `%Y-%m-%d` date is also accepted and lands on midnight.
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

// ============================================================================
// RECORD
// ============================================================================

/// One certificate acquisition.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AcquisitionRecord {
    pub year: i32,
    pub gender: String,
    pub age: u32,
    /// Informational only; never aggregated.
    pub birth_year: i32,
    pub region: String,
    pub certificate_type: String,
    pub acquired_at: NaiveDateTime,
}

/// Row as it arrives from the CSV reader, before coercion.
/// Every field stays a raw string so failures can name the exact cell.
#[derive(Debug, Deserialize)]
struct RawRecord {
    year: String,
    gender: String,
    age: String,
    birth_year: String,
    region: String,
    certificate_type: String,
    acquired_at: String,
}

impl RawRecord {
    /// Coerce the raw row into a typed record.
    /// `row` is the 1-based data row index, not counting the header.
    fn coerce(&self, row: usize) -> Result<AcquisitionRecord, DataFormatError> {
        Ok(AcquisitionRecord {
            year: parse_cell(&self.year, row, "year", "an integer year")?,
            gender: non_empty(&self.gender, row, "gender")?,
            age: parse_cell(&self.age, row, "age", "a non-negative integer age")?,
            birth_year: parse_cell(&self.birth_year, row, "birth_year", "an integer year")?,
            region: non_empty(&self.region, row, "region")?,
            certificate_type: non_empty(&self.certificate_type, row, "certificate_type")?,
            acquired_at: parse_acquired_at(&self.acquired_at).ok_or_else(|| {
                DataFormatError::InvalidValue {
                    row,
                    column: "acquired_at",
                    message: format!("unrecognized date format '{}'", self.acquired_at.trim()),
                }
            })?,
        })
    }
}

fn parse_cell<T: std::str::FromStr>(
    raw: &str,
    row: usize,
    column: &'static str,
    expected: &str,
) -> Result<T, DataFormatError> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| DataFormatError::InvalidValue {
            row,
            column,
            message: format!("expected {}, got '{}'", expected, raw.trim()),
        })
}

fn non_empty(raw: &str, row: usize, column: &'static str) -> Result<String, DataFormatError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(DataFormatError::InvalidValue {
            row,
            column,
            message: "categorical value is empty".to_string(),
        });
    }
    Ok(value.to_string())
}

fn parse_acquired_at(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();

    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(parsed);
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

// ============================================================================
// ERRORS
// ============================================================================

/// Raised when the input table does not have the shape the store requires.
/// The store never guesses around malformed input.
#[derive(Debug)]
pub enum DataFormatError {
    /// A required column is absent from the header row.
    MissingColumn { column: &'static str },
    /// A cell could not be coerced to its typed field.
    InvalidValue {
        row: usize,
        column: &'static str,
        message: String,
    },
    /// The underlying CSV reader failed.
    Csv(csv::Error),
}

impl std::fmt::Display for DataFormatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataFormatError::MissingColumn { column } => {
                write!(f, "required column '{}' is missing from the input", column)
            }
            DataFormatError::InvalidValue {
                row,
                column,
                message,
            } => {
                write!(f, "row {}, column '{}': {}", row, column, message)
            }
            DataFormatError::Csv(err) => write!(f, "failed to read CSV input: {}", err),
        }
    }
}

impl std::error::Error for DataFormatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DataFormatError::Csv(err) => Some(err),
            _ => None,
        }
    }
}

impl From<csv::Error> for DataFormatError {
    fn from(err: csv::Error) -> Self {
        DataFormatError::Csv(err)
    }
}

// ============================================================================
// VOCABULARY
// ============================================================================

/// Distinct values observed in the loaded records, built once per load.
///
/// The free-text parser and the selection UI read these sets instead of
/// rescanning the record columns on every keystroke.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vocabulary {
    years: BTreeSet<i32>,
    genders: BTreeSet<String>,
    regions: BTreeSet<String>,
    certificate_types: BTreeSet<String>,
}

impl Vocabulary {
    fn from_records(records: &[AcquisitionRecord]) -> Self {
        let mut vocabulary = Vocabulary::default();

        for record in records {
            vocabulary.years.insert(record.year);
            vocabulary.genders.insert(record.gender.clone());
            vocabulary.regions.insert(record.region.clone());
            vocabulary
                .certificate_types
                .insert(record.certificate_type.clone());
        }

        vocabulary
    }

    pub fn contains_year(&self, year: i32) -> bool {
        self.years.contains(&year)
    }

    pub fn contains_gender(&self, value: &str) -> bool {
        self.genders.contains(value)
    }

    pub fn contains_region(&self, value: &str) -> bool {
        self.regions.contains(value)
    }

    pub fn contains_certificate_type(&self, value: &str) -> bool {
        self.certificate_types.contains(value)
    }

    /// Observed years, ascending.
    pub fn years(&self) -> Vec<i32> {
        self.years.iter().copied().collect()
    }

    /// Observed genders, lexicographically sorted.
    pub fn genders(&self) -> Vec<String> {
        self.genders.iter().cloned().collect()
    }

    /// Observed regions, lexicographically sorted.
    pub fn regions(&self) -> Vec<String> {
        self.regions.iter().cloned().collect()
    }

    /// Observed certificate types, lexicographically sorted.
    pub fn certificate_types(&self) -> Vec<String> {
        self.certificate_types.iter().cloned().collect()
    }
}

// ============================================================================
// RECORD STORE
// ============================================================================

/// The loaded dataset: an ordered record sequence plus its vocabulary.
///
/// There are no mutation methods. Reloading data means constructing a new
/// store and handing it to the session wholesale, which keeps the vocabulary
/// and the records impossible to desynchronize.
#[derive(Debug, Clone)]
pub struct RecordStore {
    records: Vec<AcquisitionRecord>,
    vocabulary: Vocabulary,
}

impl RecordStore {
    /// Build a store from already-typed records.
    pub fn from_records(records: Vec<AcquisitionRecord>) -> Self {
        let vocabulary = Vocabulary::from_records(&records);
        RecordStore {
            records,
            vocabulary,
        }
    }

    /// Load a store from a CSV file on disk.
    pub fn from_csv_path(path: &Path) -> Result<Self, DataFormatError> {
        let reader = csv::Reader::from_path(path)?;
        Self::from_csv(reader)
    }

    /// Load a store from any CSV byte stream.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, DataFormatError> {
        Self::from_csv(csv::Reader::from_reader(reader))
    }

    fn from_csv<R: Read>(mut reader: csv::Reader<R>) -> Result<Self, DataFormatError> {
        // Check the header up front so a missing column fails once,
        // descriptively, instead of once per row.
        let headers = reader.headers()?.clone();
        for &column in REQUIRED_COLUMNS {
            if !headers.iter().any(|header| header.trim() == column) {
                return Err(DataFormatError::MissingColumn { column });
            }
        }

        let mut records = Vec::new();
        for (index, raw) in reader.deserialize::<RawRecord>().enumerate() {
            let raw = raw?;
            records.push(raw.coerce(index + 1)?);
        }

        Ok(Self::from_records(records))
    }

    /// The full record sequence.
    pub fn all(&self) -> &[AcquisitionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn distinct_years(&self) -> Vec<i32> {
        self.vocabulary.years()
    }

    pub fn distinct_genders(&self) -> Vec<String> {
        self.vocabulary.genders()
    }

    pub fn distinct_regions(&self) -> Vec<String> {
        self.vocabulary.regions()
    }

    pub fn distinct_certificate_types(&self) -> Vec<String> {
        self.vocabulary.certificate_types()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn create_test_record(
        year: i32,
        gender: &str,
        age: u32,
        region: &str,
        certificate: &str,
    ) -> AcquisitionRecord {
        AcquisitionRecord {
            year,
            gender: gender.to_string(),
            age,
            birth_year: year - age as i32,
            region: region.to_string(),
            certificate_type: certificate.to_string(),
            acquired_at: NaiveDate::from_ymd_opt(year, 3, 15)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap(),
        }
    }

    const VALID_CSV: &str = "\
year,gender,age,birth_year,region,certificate_type,acquired_at
2020,여성,27,1993,서울,정보처리기사,2020-05-14T10:00:00
2021,남성,34,1987,부산,전기기사,2021-08-02 15:30:00
2020,남성,45,1975,서울,정보처리기사,2020-11-23
";

    #[test]
    fn test_from_records_builds_vocabulary() {
        let store = RecordStore::from_records(vec![
            create_test_record(2021, "남성", 34, "부산", "전기기사"),
            create_test_record(2020, "여성", 27, "서울", "정보처리기사"),
            create_test_record(2020, "남성", 45, "서울", "정보처리기사"),
        ]);

        assert_eq!(store.len(), 3);
        assert_eq!(store.distinct_years(), vec![2020, 2021]);
        assert_eq!(store.distinct_genders(), vec!["남성", "여성"]);
        assert_eq!(store.distinct_regions(), vec!["부산", "서울"]);
        assert_eq!(
            store.distinct_certificate_types(),
            vec!["전기기사", "정보처리기사"]
        );
    }

    #[test]
    fn test_from_csv_reader_parses_typed_rows() {
        let store = RecordStore::from_csv_reader(VALID_CSV.as_bytes()).unwrap();

        assert_eq!(store.len(), 3);

        let first = &store.all()[0];
        assert_eq!(first.year, 2020);
        assert_eq!(first.gender, "여성");
        assert_eq!(first.age, 27);
        assert_eq!(first.birth_year, 1993);
        assert_eq!(first.region, "서울");
        assert_eq!(first.certificate_type, "정보처리기사");
        assert_eq!(
            first.acquired_at,
            NaiveDate::from_ymd_opt(2020, 5, 14)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn test_all_three_date_formats_accepted() {
        let store = RecordStore::from_csv_reader(VALID_CSV.as_bytes()).unwrap();

        // Space-separated datetime.
        assert_eq!(
            store.all()[1].acquired_at,
            NaiveDate::from_ymd_opt(2021, 8, 2)
                .unwrap()
                .and_hms_opt(15, 30, 0)
                .unwrap()
        );
        // Bare date lands on midnight.
        assert_eq!(
            store.all()[2].acquired_at,
            NaiveDate::from_ymd_opt(2020, 11, 23)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn test_missing_column_fails_fast() {
        let csv = "\
year,gender,age,birth_year,certificate_type,acquired_at
2020,여성,27,1993,정보처리기사,2020-05-14T10:00:00
";
        let err = RecordStore::from_csv_reader(csv.as_bytes()).unwrap_err();

        match err {
            DataFormatError::MissingColumn { column } => assert_eq!(column, "region"),
            other => panic!("expected MissingColumn, got {:?}", other),
        }
    }

    #[test]
    fn test_non_numeric_year_is_invalid_value() {
        let csv = "\
year,gender,age,birth_year,region,certificate_type,acquired_at
abc,여성,27,1993,서울,정보처리기사,2020-05-14T10:00:00
";
        let err = RecordStore::from_csv_reader(csv.as_bytes()).unwrap_err();

        match err {
            DataFormatError::InvalidValue { row, column, .. } => {
                assert_eq!(row, 1);
                assert_eq!(column, "year");
            }
            other => panic!("expected InvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn test_unparseable_date_is_invalid_value() {
        let csv = "\
year,gender,age,birth_year,region,certificate_type,acquired_at
2020,여성,27,1993,서울,정보처리기사,2020-05-14T10:00:00
2021,남성,34,1987,부산,전기기사,14/05/2021
";
        let err = RecordStore::from_csv_reader(csv.as_bytes()).unwrap_err();

        match err {
            DataFormatError::InvalidValue { row, column, .. } => {
                assert_eq!(row, 2);
                assert_eq!(column, "acquired_at");
            }
            other => panic!("expected InvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_categorical_value_rejected() {
        let csv = "\
year,gender,age,birth_year,region,certificate_type,acquired_at
2020,,27,1993,서울,정보처리기사,2020-05-14T10:00:00
";
        let err = RecordStore::from_csv_reader(csv.as_bytes()).unwrap_err();

        match err {
            DataFormatError::InvalidValue { column, .. } => assert_eq!(column, "gender"),
            other => panic!("expected InvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn test_extra_columns_tolerated_and_order_irrelevant() {
        let csv = "\
acquired_at,certificate_type,region,birth_year,age,gender,year,memo
2020-05-14T10:00:00,정보처리기사,서울,1993,27,여성,2020,비고
";
        let store = RecordStore::from_csv_reader(csv.as_bytes()).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.all()[0].region, "서울");
    }

    #[test]
    fn test_from_csv_path_round_trip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(VALID_CSV.as_bytes()).unwrap();
        file.flush().unwrap();

        let store = RecordStore::from_csv_path(file.path()).unwrap();

        assert_eq!(store.len(), 3);
        assert_eq!(store.distinct_regions(), vec!["부산", "서울"]);
    }

    #[test]
    fn test_empty_input_yields_empty_store() {
        let csv = "year,gender,age,birth_year,region,certificate_type,acquired_at\n";
        let store = RecordStore::from_csv_reader(csv.as_bytes()).unwrap();

        assert!(store.is_empty());
        assert!(store.distinct_years().is_empty());
        assert!(store.distinct_genders().is_empty());
    }
}
