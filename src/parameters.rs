//! The structs used for specifying the parameters of the shuffle
use crate::gene::Chain;
use anyhow::{anyhow, Result};

/// All the knobs of one `shuffle` invocation.
#[derive(Clone, Debug)]
pub struct ShuffleParameters {
    pub chain: Chain,
    pub organism: String,
    // column roles of the input table
    pub v_col: String,
    pub cdr3_col: String,
    pub j_col: String,
    // residues always kept with the V (resp. J) flank; they bound the
    // window scanned for D matches
    pub min_cut_v: usize,
    pub min_cut_j: usize,
    // minimum exact D substring length (shorter hits are spurious)
    pub min_d_match: usize,
    // number of draws per pool entry
    pub depth: usize,
    pub random_seed: u64,
    // emit the analyzed pool instead of shuffling
    pub return_presuffled: bool,
    // emit the per-record failures; wins over `return_presuffled`
    pub return_errors: bool,
}

impl Default for ShuffleParameters {
    fn default() -> ShuffleParameters {
        ShuffleParameters {
            chain: Chain::B,
            organism: "human".to_string(),
            v_col: "vb".to_string(),
            cdr3_col: "cdr3b".to_string(),
            j_col: "jb".to_string(),
            min_cut_v: 4,
            min_cut_j: 3,
            min_d_match: 3,
            depth: 2,
            random_seed: 1,
            return_presuffled: false,
            return_errors: false,
        }
    }
}

impl ShuffleParameters {
    /// Batch-level contract checks, run before any record is processed
    pub fn validate(&self) -> Result<()> {
        if self.depth == 0 {
            return Err(anyhow!("depth must be a positive integer"));
        }
        if self.min_d_match == 0 {
            return Err(anyhow!("min_d_match must be a positive integer"));
        }
        Ok(())
    }
}
