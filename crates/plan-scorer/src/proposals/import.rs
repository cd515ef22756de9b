use super::value::parse_numeric_text;
use super::{IndicatorValue, Proposal, SOURCE_CSV_IMPORT};
use std::io::Read;
use std::path::Path;

const NAME_COLUMNS: [&str; 3] = ["proposal", "name", "proposal_name"];

#[derive(Debug)]
pub enum ProposalImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    MissingNameColumn,
}

impl std::fmt::Display for ProposalImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProposalImportError::Io(err) => write!(f, "failed to read proposal file: {}", err),
            ProposalImportError::Csv(err) => write!(f, "invalid proposal CSV data: {}", err),
            ProposalImportError::MissingNameColumn => write!(
                f,
                "proposal CSV needs a 'Proposal' or 'Name' column identifying each row"
            ),
        }
    }
}

impl std::error::Error for ProposalImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProposalImportError::Io(err) => Some(err),
            ProposalImportError::Csv(err) => Some(err),
            ProposalImportError::MissingNameColumn => None,
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

/// Builds processed proposals from a CSV sheet: one row per proposal, one column per
/// indicator. Headers are normalized into indicator ids; blank or non-numeric cells are
/// treated as missing values.
pub struct ProposalCsvImporter;

impl ProposalCsvImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Proposal>, ProposalImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Proposal>, ProposalImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()?
            .iter()
            .map(normalize_header)
            .collect();
        let name_column = headers
            .iter()
            .position(|header| NAME_COLUMNS.contains(&header.as_str()))
            .ok_or(ProposalImportError::MissingNameColumn)?;

        let mut proposals = Vec::new();
        for (row, record) in csv_reader.records().enumerate() {
            let record = record?;
            let name = record.get(name_column).unwrap_or_default().trim();
            if name.is_empty() {
                tracing::debug!(row = row + 1, "skipping proposal row without a name");
                continue;
            }

            let data = headers
                .iter()
                .enumerate()
                .filter(|(column, header)| *column != name_column && !header.is_empty())
                .filter_map(|(column, header)| {
                    let cell = record.get(column)?;
                    let value = parse_numeric_text(cell)?;
                    Some((header.clone(), IndicatorValue::new(value, SOURCE_CSV_IMPORT)))
                });

            let proposal = Proposal::processed(name, data);
            if proposal.data.is_empty() {
                tracing::warn!(proposal = %name, "imported proposal has no numeric values");
            }
            proposals.push(proposal);
        }

        tracing::info!(count = proposals.len(), "proposals imported from CSV");
        Ok(proposals)
    }
}

pub(crate) fn normalize_header(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    cleaned
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_ascii_lowercase()
}
