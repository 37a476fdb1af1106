//! Per-position region labels over a CDR3 and the cuts they allow
use crate::align::DMatch;
use crate::errors::RecordError;
use itertools::Itertools;
use serde::Serialize;
use std::fmt;

/// Origin of one CDR3 residue: germline V/D/J template or non-templated
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum RegionLabel {
    V,
    D,
    J,
    N,
}

impl RegionLabel {
    pub fn as_char(self) -> char {
        match self {
            RegionLabel::V => 'V',
            RegionLabel::D => 'D',
            RegionLabel::J => 'J',
            RegionLabel::N => 'N',
        }
    }
}

impl fmt::Display for RegionLabel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A CDR3 with one region label per residue. Labels always read
/// `V* (N|D)* J*` with at most one contiguous D run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LabeledCdr3 {
    pub cdr3: String,
    pub labels: Vec<RegionLabel>,
}

impl LabeledCdr3 {
    /// Stamp the labels from the V/J match lengths and the optional D span.
    /// The span checks are defensive: the matcher and assigner contracts
    /// already rule out overlaps.
    pub fn new(
        cdr3: &str,
        v_len: usize,
        j_len: usize,
        d: Option<&DMatch>,
    ) -> Result<LabeledCdr3, RecordError> {
        let n = cdr3.len();
        if v_len + j_len > n {
            return Err(RecordError::RegionOverlap {
                detail: format!("V run 0..{v_len} and J run {}..{n} overlap", n - j_len),
            });
        }
        let mut labels = vec![RegionLabel::N; n];
        labels[..v_len].fill(RegionLabel::V);
        labels[n - j_len..].fill(RegionLabel::J);
        if let Some(d) = d {
            if d.start < v_len || d.end > n - j_len {
                return Err(RecordError::RegionOverlap {
                    detail: format!(
                        "D span {}..{} crosses the V run 0..{v_len} or the J run {}..{n}",
                        d.start,
                        d.end,
                        n - j_len
                    ),
                });
            }
            labels[d.start..d.end].fill(RegionLabel::D);
        }
        Ok(LabeledCdr3 {
            cdr3: cdr3.to_string(),
            labels,
        })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Labels as a string, e.g. `VVVVNNDDNJJJJJ`
    pub fn label_string(&self) -> String {
        self.labels.iter().map(|l| l.as_char()).collect()
    }

    /// Length of the leading V run
    pub fn v_len(&self) -> usize {
        self.labels
            .iter()
            .take_while(|&&l| l == RegionLabel::V)
            .count()
    }

    /// Length of the trailing J run
    pub fn j_len(&self) -> usize {
        self.labels
            .iter()
            .rev()
            .take_while(|&&l| l == RegionLabel::J)
            .count()
    }

    /// The D run span within the CDR3, if any
    pub fn d_span(&self) -> Option<(usize, usize)> {
        let start = self.labels.iter().position(|&l| l == RegionLabel::D)?;
        let end = self
            .labels
            .iter()
            .rposition(|&l| l == RegionLabel::D)
            .unwrap_or(start)
            + 1;
        Some((start, end))
    }

    /// Indices where the sequence may be split without severing a
    /// germline-templated run: every label-transition boundary, plus the
    /// sequence start and end.
    pub fn cut_points(&self) -> Vec<usize> {
        let mut cuts = vec![0];
        cuts.extend(
            self.labels
                .iter()
                .tuple_windows()
                .positions(|(a, b)| a != b)
                .map(|i| i + 1),
        );
        cuts.push(self.len());
        cuts.dedup();
        cuts
    }

    /// Canonical left-fragment end: end of the V run, extended through the
    /// D run when one exists (the intervening N travels with the left
    /// fragment).
    pub fn left_end(&self) -> usize {
        match self.d_span() {
            Some((_, end)) => end,
            None => self.v_len(),
        }
    }

    /// Canonical right-fragment start: start of the J run
    pub fn j_start(&self) -> usize {
        self.len() - self.j_len()
    }
}
