//! CSV import of proposal exports handed over by the quoting collaborator.

mod parser;

use crate::ranking::Proposal;
use std::io::Read;
use std::path::Path;

#[derive(Debug)]
pub enum ProposalImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidField {
        line: u64,
        field: &'static str,
        value: String,
    },
}

impl std::fmt::Display for ProposalImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProposalImportError::Io(err) => write!(f, "failed to read proposal export: {}", err),
            ProposalImportError::Csv(err) => write!(f, "invalid proposal CSV data: {}", err),
            ProposalImportError::InvalidField { line, field, value } => write!(
                f,
                "line {}: unrecognized value '{}' for column {}",
                line, value, field
            ),
        }
    }
}

impl std::error::Error for ProposalImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProposalImportError::Io(err) => Some(err),
            ProposalImportError::Csv(err) => Some(err),
            ProposalImportError::InvalidField { .. } => None,
        }
    }
}

impl From<std::io::Error> for ProposalImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ProposalImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Reads proposals from CSV exports whose headers are the camelCase wire names.
///
/// Numeric sanity is left to the ranking engine so bad rows surface as flagged entries.
pub struct ProposalCsvImporter;

impl ProposalCsvImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Proposal>, ProposalImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Proposal>, ProposalImportError> {
        parser::parse_proposals(reader)
    }
}
