//! Per-record failure kinds and the collector that accumulates them
use serde::Serialize;
use std::fmt;

/// Why a single receptor record could not be analyzed. These never abort
/// the batch: each failing record is routed to the [`ErrorCollector`] and
/// the rest keeps processing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum RecordError {
    /// Gene name (after default-allele insertion) absent from the reference
    UnknownGene { name: String },
    /// The V prefix match and J suffix match would overlap inside the CDR3
    AmbiguousStructure {
        v_len: usize,
        j_len: usize,
        cdr3_len: usize,
    },
    /// Computed region spans overlap (defensive, should not happen)
    RegionOverlap { detail: String },
    /// Blank CDR3 or gene field
    EmptySequence { field: &'static str },
    /// Field holding bytes outside the amino-acid alphabet
    InvalidSequence { field: &'static str },
}

impl RecordError {
    /// Short stable tag used in tabular error reports
    pub fn kind(&self) -> &'static str {
        match self {
            RecordError::UnknownGene { .. } => "unknown_gene",
            RecordError::AmbiguousStructure { .. } => "ambiguous_structure",
            RecordError::RegionOverlap { .. } => "region_overlap",
            RecordError::EmptySequence { .. } => "empty_sequence",
            RecordError::InvalidSequence { .. } => "invalid_sequence",
        }
    }
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RecordError::UnknownGene { name } => {
                write!(f, "gene {name} not found in the germline reference")
            }
            RecordError::AmbiguousStructure {
                v_len,
                j_len,
                cdr3_len,
            } => write!(
                f,
                "V match ({v_len}) and J match ({j_len}) overlap in a CDR3 of length {cdr3_len}"
            ),
            RecordError::RegionOverlap { detail } => {
                write!(f, "overlapping region labels: {detail}")
            }
            RecordError::EmptySequence { field } => write!(f, "empty {field} field"),
            RecordError::InvalidSequence { field } => {
                write!(f, "non-ASCII characters in the {field} field")
            }
        }
    }
}

impl std::error::Error for RecordError {}

/// A failed input row, with enough context to audit it afterwards
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RecordFailure {
    pub row: usize,
    pub v_name: String,
    pub cdr3: String,
    pub j_name: String,
    pub error: RecordError,
}

#[derive(Default, Debug)]
pub struct ErrorCollector {
    failures: Vec<RecordFailure>,
}

impl ErrorCollector {
    pub fn new() -> ErrorCollector {
        ErrorCollector::default()
    }

    pub fn push(&mut self, failure: RecordFailure) {
        self.failures.push(failure);
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// Fraction of failing records among `total` analyzed rows
    pub fn failure_rate(&self, total: usize) -> f64 {
        if total == 0 {
            0.
        } else {
            self.failures.len() as f64 / total as f64
        }
    }

    pub fn into_failures(self) -> Vec<RecordFailure> {
        self.failures
    }
}
