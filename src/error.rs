use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Errors raised by the coverage engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("duplicate region name: {0:?}")]
    DuplicateRegion(String),

    #[error("projection failed: {0}")]
    Projection(String),
}

/// Why a record was dropped while loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    MissingLabel,
    MissingCoordinate,
}

/// Non-fatal load problem, reported as a count of dropped records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataIntegrityWarning {
    pub source: String,
    pub reason: DropReason,
    pub count: usize,
}

impl DataIntegrityWarning {
    pub fn new(source: impl Into<String>, reason: DropReason, count: usize) -> Self {
        Self { source: source.into(), reason, count }
    }
}

impl fmt::Display for DataIntegrityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.reason {
            DropReason::MissingLabel => "features without a label",
            DropReason::MissingCoordinate => "rows without a valid coordinate",
        };
        write!(f, "{}: dropped {} {}", self.source, self.count, what)
    }
}
