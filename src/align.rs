//! Exact-match decomposition of a CDR3 against V/J/D germline segments
use crate::errors::RecordError;
use crate::gene::Gene;
use serde::Serialize;

/// Length of the longest common prefix between the CDR3 and the germline
/// V sequence (exact residue match, no gaps).
pub fn match_v_prefix(cdr3: &str, germline_v: &str) -> usize {
    cdr3.bytes()
        .zip(germline_v.bytes())
        .take_while(|(a, b)| a == b)
        .count()
}

/// Length of the longest common suffix between the CDR3 and the germline
/// J sequence.
pub fn match_j_suffix(cdr3: &str, germline_j: &str) -> usize {
    cdr3.bytes()
        .rev()
        .zip(germline_j.bytes().rev())
        .take_while(|(a, b)| a == b)
        .count()
}

/// The matches are never truncated to fit: a V/J overlap means the record
/// structure is ambiguous and the record is routed to the error collector.
pub fn check_vj_structure(cdr3_len: usize, v_len: usize, j_len: usize) -> Result<(), RecordError> {
    if v_len + j_len > cdr3_len {
        return Err(RecordError::AmbiguousStructure {
            v_len,
            j_len,
            cdr3_len,
        });
    }
    Ok(())
}

/// Best exact D-segment substring found inside a CDR3. `start..end` is the
/// span within the CDR3 (not within the D germline sequence).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DMatch {
    pub gene: String,
    pub start: usize,
    pub end: usize,
}

impl DMatch {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Scan the residual middle of the CDR3 (`window`, half-open) for the best
/// exact D germline substring of length >= `min_len`.
///
/// Best = longest match across all D alleles; ties go to the match starting
/// closest to the V boundary, then to the alphabetically first gene name.
/// No match of at least `min_len` is not an error, the middle simply stays
/// non-templated.
pub fn assign_d(
    cdr3: &str,
    window: (usize, usize),
    d_genes: &[&Gene],
    min_len: usize,
) -> Option<DMatch> {
    let (win_start, win_end) = window;
    if win_start >= win_end || win_end > cdr3.len() || min_len == 0 {
        return None;
    }
    let core = &cdr3[win_start..win_end];

    let mut best: Option<DMatch> = None;
    for gene in d_genes {
        let d_seq = &gene.seq;
        if d_seq.len() < min_len {
            continue;
        }
        // longest substring first; within one length keep the leftmost hit
        for len in (min_len..=d_seq.len()).rev() {
            let mut leftmost: Option<usize> = None;
            for s in 0..=d_seq.len() - len {
                if let Some(pos) = core.find(&d_seq[s..s + len]) {
                    leftmost = Some(leftmost.map_or(pos, |p| p.min(pos)));
                }
            }
            if let Some(pos) = leftmost {
                let candidate = DMatch {
                    gene: gene.name.clone(),
                    start: win_start + pos,
                    end: win_start + pos + len,
                };
                let improves = match &best {
                    None => true,
                    Some(b) => {
                        candidate.len() > b.len()
                            || (candidate.len() == b.len() && candidate.start < b.start)
                    }
                };
                if improves {
                    best = Some(candidate);
                }
                // shorter substrings of this allele cannot beat this hit
                break;
            }
        }
    }
    best
}
