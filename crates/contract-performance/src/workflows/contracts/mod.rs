//! Contract sheet import: maps uploaded CSV columns onto [`Contract`] fields.

mod mapping;
mod normalizer;
mod parser;

use crate::workflows::performance::Contract;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug)]
pub enum ContractImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    NoRecognizedColumns,
}

impl std::fmt::Display for ContractImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContractImportError::Io(err) => write!(f, "failed to read contract sheet: {}", err),
            ContractImportError::Csv(err) => write!(f, "invalid contract CSV data: {}", err),
            ContractImportError::NoRecognizedColumns => {
                write!(f, "contract sheet has no recognized column headers")
            }
        }
    }
}

impl std::error::Error for ContractImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ContractImportError::Io(err) => Some(err),
            ContractImportError::Csv(err) => Some(err),
            ContractImportError::NoRecognizedColumns => None,
        }
    }
}

impl From<std::io::Error> for ContractImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ContractImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub struct ContractImporter;

impl ContractImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Contract>, ContractImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Reads every non-blank row. Cells are kept as text; coercion happens
    /// when the batch is scored.
    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Contract>, ContractImportError> {
        let sheet = parser::parse_contracts(reader)?;
        if sheet.columns.is_empty() {
            return Err(ContractImportError::NoRecognizedColumns);
        }

        for header in &sheet.ignored_headers {
            debug!(%header, "ignoring unrecognized contract column");
        }
        info!(
            rows = sheet.contracts.len(),
            columns = sheet.columns.len(),
            "contract sheet imported"
        );

        Ok(sheet.contracts)
    }
}
