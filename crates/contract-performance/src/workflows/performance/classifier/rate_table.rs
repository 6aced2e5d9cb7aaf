use super::super::domain::{InsuranceLine, InsurerCategory};
use super::TermBucket;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::io::Read;
use std::path::Path;
use tracing::warn;

/// Exact-match key of the external conversion table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RateKey {
    /// Flagship carrier name or the 기타생보/기타손보 bucket.
    pub insurer: String,
    pub line: InsuranceLine,
    pub term: TermBucket,
}

impl RateKey {
    pub fn new(insurer: impl Into<String>, line: InsuranceLine, term: TermBucket) -> Self {
        Self {
            insurer: insurer.into(),
            line,
            term,
        }
    }

    pub fn for_category(category: &InsurerCategory, term: TermBucket) -> Self {
        Self::new(category.label(), category.line(), term)
    }
}

impl fmt::Display for RateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.insurer,
            self.line.label(),
            self.term.label()
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatePair {
    pub convention: u32,
    pub summer: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum RateTableError {
    #[error("failed to read rate table: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid rate table CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("rate table row {row}: unknown insurance type '{value}' (expected 생명보험 or 손해보험)")]
    UnknownInsuranceType { row: usize, value: String },
    #[error("rate table row {row}: unknown term condition '{value}' (expected 10년 이상 or 10년 미만)")]
    UnknownTermCondition { row: usize, value: String },
}

#[derive(Debug, Deserialize)]
struct RateRow {
    #[serde(rename = "보험사")]
    insurer: String,
    #[serde(rename = "유형")]
    line: String,
    #[serde(rename = "납입기간조건")]
    term: String,
    #[serde(rename = "컨벤션율")]
    convention: u32,
    #[serde(rename = "썸머율")]
    summer: u32,
}

/// Conversion table consulted by the lookup-table policy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RateTable {
    rows: HashMap<RateKey, RatePair>,
}

impl RateTable {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, RateTableError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, RateTableError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut table = Self::default();

        for (index, record) in csv_reader.deserialize::<RateRow>().enumerate() {
            let row = record?;
            let position = index + 1;
            let line = InsuranceLine::from_label(&row.line).ok_or_else(|| {
                RateTableError::UnknownInsuranceType {
                    row: position,
                    value: row.line.clone(),
                }
            })?;
            let term = TermBucket::from_label(&row.term).ok_or_else(|| {
                RateTableError::UnknownTermCondition {
                    row: position,
                    value: row.term.clone(),
                }
            })?;

            let key = RateKey::new(row.insurer.trim(), line, term);
            let pair = RatePair {
                convention: row.convention,
                summer: row.summer,
            };
            if !table.insert(key.clone(), pair) {
                warn!(row = position, %key, "duplicate rate table row ignored");
            }
        }

        Ok(table)
    }

    /// Adds a row; an existing row for the same key is kept and `false` returned.
    pub fn insert(&mut self, key: RateKey, pair: RatePair) -> bool {
        if self.rows.contains_key(&key) {
            return false;
        }
        self.rows.insert(key, pair);
        true
    }

    pub fn get(&self, key: &RateKey) -> Option<RatePair> {
        self.rows.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const TABLE: &str = "보험사,유형,납입기간조건,컨벤션율,썸머율\n\
한화생명,생명보험,10년 이상,150,150\n\
한화생명,생명보험,10년 미만,150,100\n\
기타손보,손해보험,10년 미만,200,50\n";

    #[test]
    fn loads_rows_keyed_by_insurer_type_and_term() {
        let table = RateTable::from_reader(Cursor::new(TABLE)).expect("table loads");
        assert_eq!(table.len(), 3);
        assert_eq!(
            table.get(&RateKey::new(
                "한화생명",
                InsuranceLine::Life,
                TermBucket::UnderTen
            )),
            Some(RatePair {
                convention: 150,
                summer: 100
            })
        );
        assert_eq!(
            table.get(&RateKey::new(
                "기타손보",
                InsuranceLine::NonLife,
                TermBucket::TenOrMore
            )),
            None
        );
    }

    #[test]
    fn first_duplicate_row_wins() {
        let csv = "보험사,유형,납입기간조건,컨벤션율,썸머율\n\
삼성화재,손해보험,10년 이상,250,200\n\
삼성화재,손해보험,10년 이상,1,1\n";
        let table = RateTable::from_reader(Cursor::new(csv)).expect("table loads");
        assert_eq!(table.len(), 1);
        assert_eq!(
            table
                .get(&RateKey::new(
                    "삼성화재",
                    InsuranceLine::NonLife,
                    TermBucket::TenOrMore
                ))
                .map(|pair| pair.convention),
            Some(250)
        );
    }

    #[test]
    fn rejects_unknown_insurance_type() {
        let csv = "보험사,유형,납입기간조건,컨벤션율,썸머율\n한화생명,연금,10년 이상,150,150\n";
        match RateTable::from_reader(Cursor::new(csv)) {
            Err(RateTableError::UnknownInsuranceType { row, value }) => {
                assert_eq!(row, 1);
                assert_eq!(value, "연금");
            }
            other => panic!("expected insurance type error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_term_condition() {
        let csv = "보험사,유형,납입기간조건,컨벤션율,썸머율\n한화생명,생명보험,20년,150,150\n";
        assert!(matches!(
            RateTable::from_reader(Cursor::new(csv)),
            Err(RateTableError::UnknownTermCondition { row: 1, .. })
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            RateTable::from_path("./does-not-exist-rates.csv"),
            Err(RateTableError::Io(_))
        ));
    }
}
