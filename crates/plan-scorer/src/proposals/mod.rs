//! Design proposals and the boundary where raw indicator values enter the system.

mod import;
mod value;

pub use import::{ProposalCsvImporter, ProposalImportError};
pub use value::{extract_numeric_value, extract_source};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

pub const SOURCE_MANUAL_ENTRY: &str = "manual entry";
pub const SOURCE_MANUAL_EDIT: &str = "manually edited";
pub const SOURCE_CSV_IMPORT: &str = "CSV import";

/// Identifier wrapper for proposals.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProposalId(pub String);

impl std::fmt::Display for ProposalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

static PROPOSAL_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// Time-based id, made unique within the process by a trailing sequence number.
pub fn next_proposal_id() -> ProposalId {
    let sequence = PROPOSAL_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ProposalId(format!(
        "proposal-{}-{sequence:04}",
        Utc::now().timestamp_millis()
    ))
}

/// Extraction lifecycle of a proposal. Only `Processed` proposals are scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    Prepared,
    Processing,
    Processed,
    Error,
}

impl ProposalStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Prepared => "prepared",
            Self::Processing => "processing",
            Self::Processed => "processed",
            Self::Error => "error",
        }
    }

    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Prepared, Self::Processing)
                | (Self::Processing, Self::Processed)
                | (Self::Processing, Self::Error)
                | (Self::Error, Self::Processing)
                | (Self::Processed, Self::Processing)
        )
    }
}

/// A numeric indicator value plus where it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorValue {
    pub value: f64,
    pub source: String,
}

impl IndicatorValue {
    pub fn new(value: f64, source: impl Into<String>) -> Self {
        Self {
            value,
            source: source.into(),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ProposalError {
    #[error("cannot move proposal from {from} to {to}")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },
    #[error("value for '{indicator}' is not a finite number")]
    InvalidValue { indicator: String },
    #[error("proposal name must not be empty")]
    EmptyName,
}

/// One submitted design entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: ProposalId,
    pub name: String,
    pub status: ProposalStatus,
    #[serde(default)]
    pub data: BTreeMap<String, IndicatorValue>,
    pub created_at: DateTime<Utc>,
}

impl Proposal {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: next_proposal_id(),
            name: name.into(),
            status: ProposalStatus::Prepared,
            data: BTreeMap::new(),
            created_at: Utc::now(),
        }
    }

    /// Processed proposal carrying the given values, mostly useful for fixtures and imports.
    pub fn processed(
        name: impl Into<String>,
        data: impl IntoIterator<Item = (String, IndicatorValue)>,
    ) -> Self {
        Self {
            status: ProposalStatus::Processed,
            data: data.into_iter().collect(),
            ..Self::new(name)
        }
    }

    /// Whether the proposal takes part in scoring and ranking.
    pub fn is_scorable(&self) -> bool {
        self.status == ProposalStatus::Processed && !self.data.is_empty()
    }

    pub fn value_of(&self, indicator: &str) -> Option<f64> {
        self.data.get(indicator).map(|entry| entry.value)
    }

    pub fn transition(&mut self, next: ProposalStatus) -> Result<(), ProposalError> {
        if self.status == next {
            return Ok(());
        }
        if !self.status.can_transition_to(next) {
            return Err(ProposalError::InvalidTransition {
                from: self.status.label(),
                to: next.label(),
            });
        }
        tracing::debug!(
            proposal = %self.id,
            from = self.status.label(),
            to = next.label(),
            "proposal status changed"
        );
        self.status = next;
        Ok(())
    }

    pub fn rename(&mut self, name: &str) -> Result<(), ProposalError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ProposalError::EmptyName);
        }
        self.name = trimmed.to_string();
        Ok(())
    }

    /// Records a hand-edited value, tagging its provenance accordingly.
    pub fn set_value(&mut self, indicator: &str, value: f64) -> Result<(), ProposalError> {
        if !value.is_finite() {
            return Err(ProposalError::InvalidValue {
                indicator: indicator.to_string(),
            });
        }
        self.data.insert(
            indicator.to_string(),
            IndicatorValue::new(value, SOURCE_MANUAL_EDIT),
        );
        Ok(())
    }

    pub fn clear_value(&mut self, indicator: &str) -> Option<IndicatorValue> {
        self.data.remove(indicator)
    }
}

/// Loosely typed proposal payload as it arrives from clients or extraction.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProposalInput {
    pub name: String,
    #[serde(default)]
    pub status: Option<ProposalStatus>,
    #[serde(default)]
    pub data: BTreeMap<String, Value>,
}

impl ProposalInput {
    /// Runs every raw value through [`extract_numeric_value`]; unusable entries are dropped.
    /// Proposals with data default to `Processed`, empty ones to `Prepared`.
    pub fn into_proposal(self) -> Result<Proposal, ProposalError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(ProposalError::EmptyName);
        }

        let mut proposal = Proposal::new(name);
        for (indicator, raw) in self.data {
            match extract_numeric_value(&raw) {
                Some(value) => {
                    let source =
                        extract_source(&raw).unwrap_or_else(|| SOURCE_MANUAL_ENTRY.to_string());
                    proposal
                        .data
                        .insert(indicator, IndicatorValue::new(value, source));
                }
                None => {
                    tracing::debug!(%indicator, raw = %raw, "dropping non-numeric indicator value");
                }
            }
        }

        proposal.status = self.status.unwrap_or(if proposal.data.is_empty() {
            ProposalStatus::Prepared
        } else {
            ProposalStatus::Processed
        });

        Ok(proposal)
    }
}
