//! Per-record germline analysis and the seeded recombination shuffle
use crate::align::{assign_d, check_vj_structure, match_j_suffix, match_v_prefix, DMatch};
use crate::errors::{ErrorCollector, RecordError, RecordFailure};
use crate::gene::SegmentType;
use crate::labels::LabeledCdr3;
use crate::parameters::ShuffleParameters;
use crate::reference::GermlineReference;
use anyhow::Result;
use log::info;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

/// One raw input row. The row index is carried through the whole pipeline
/// so every output can be traced back to its source.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct InputRecord {
    pub row: usize,
    pub v_name: String,
    pub cdr3: String,
    pub j_name: String,
}

/// A successfully analyzed record: labeled CDR3 plus the canonical cuts
/// splitting it into exchangeable fragments.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CutRecord {
    pub row: usize,
    pub v_name: String,
    pub j_name: String,
    pub germline_v: String,
    pub germline_j: String,
    pub labeled: LabeledCdr3,
    pub d_gene: Option<String>,
    /// left fragment end: V run, extended through any D run
    pub cut_left: usize,
    /// start of the J run
    pub cut_right: usize,
}

impl CutRecord {
    /// The V-side fragment, exchanged as a whole unit
    pub fn left_fragment(&self) -> &str {
        &self.labeled.cdr3[..self.cut_left]
    }

    /// The J-side fragment (preceding non-templated middle included)
    pub fn right_fragment(&self) -> &str {
        &self.labeled.cdr3[self.cut_left..]
    }

    /// Cut positions usable on this record
    pub fn cut_points(&self) -> Vec<usize> {
        self.labeled.cut_points()
    }

    /// Human-readable cut display, `CASS--shagg--TEAFF` style: the middle
    /// between the two canonical cuts lowercased and fenced with `--`
    pub fn annotated(&self) -> String {
        let cdr3 = &self.labeled.cdr3;
        format!(
            "{}--{}--{}",
            &cdr3[..self.cut_left],
            cdr3[self.cut_left..self.cut_right].to_lowercase(),
            &cdr3[self.cut_right..]
        )
    }
}

/// A freshly recombined CDR3 with provenance to both source rows
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ShuffledRecord {
    pub v_name: String,
    pub cdr3: String,
    pub j_name: String,
    pub left_fragment: String,
    pub right_fragment: String,
    pub left_row: usize,
    pub right_row: usize,
    pub length: usize,
}

/// The three terminal output modes of [`shuffle`]
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum ShuffleOutput {
    Shuffled(Vec<ShuffledRecord>),
    Preshuffled(Vec<CutRecord>),
    Errors(Vec<RecordFailure>),
}

/// Decompose one record into germline and non-templated regions and derive
/// its cuts. Every failure is a typed per-record error.
pub fn analyze_record(
    reference: &GermlineReference,
    params: &ShuffleParameters,
    record: &InputRecord,
) -> Result<CutRecord, RecordError> {
    if record.cdr3.trim().is_empty() {
        return Err(RecordError::EmptySequence { field: "cdr3" });
    }
    if record.v_name.trim().is_empty() {
        return Err(RecordError::EmptySequence { field: "v_gene" });
    }
    if record.j_name.trim().is_empty() {
        return Err(RecordError::EmptySequence { field: "j_gene" });
    }
    let cdr3 = record.cdr3.trim();
    // region spans are byte offsets, so anything outside the ASCII
    // amino-acid alphabet must be rejected before slicing
    if !cdr3.is_ascii() {
        return Err(RecordError::InvalidSequence { field: "cdr3" });
    }

    let v_gene = reference.lookup(
        &params.organism,
        params.chain,
        SegmentType::V,
        &record.v_name,
    )?;
    let j_gene = reference.lookup(
        &params.organism,
        params.chain,
        SegmentType::J,
        &record.j_name,
    )?;

    let v_len = match_v_prefix(cdr3, &v_gene.seq);
    let j_len = match_j_suffix(cdr3, &j_gene.seq);
    check_vj_structure(cdr3.len(), v_len, j_len)?;

    let d_match: Option<DMatch> = if params.chain.has_d_genes() {
        let win_start = v_len.max(params.min_cut_v);
        let win_end = cdr3.len().saturating_sub(j_len.max(params.min_cut_j));
        let d_genes = reference.d_genes(&params.organism, params.chain);
        assign_d(cdr3, (win_start, win_end), &d_genes, params.min_d_match)
    } else {
        None
    };

    let labeled = LabeledCdr3::new(cdr3, v_len, j_len, d_match.as_ref())?;
    let cut_left = labeled.left_end();
    let cut_right = labeled.j_start();

    Ok(CutRecord {
        row: record.row,
        v_name: v_gene.name.clone(),
        j_name: j_gene.name.clone(),
        germline_v: v_gene.seq.clone(),
        germline_j: j_gene.seq.clone(),
        labeled,
        d_gene: d_match.map(|d| d.gene),
        cut_left,
        cut_right,
    })
}

/// Analyze a whole table of records, collecting the per-record failures
/// instead of aborting on them.
pub fn analyze_pool(
    reference: &GermlineReference,
    params: &ShuffleParameters,
    records: &[InputRecord],
) -> (Vec<CutRecord>, Vec<RecordFailure>) {
    let mut pool = Vec::with_capacity(records.len());
    let mut collector = ErrorCollector::new();
    for record in records {
        match analyze_record(reference, params, record) {
            Ok(cut) => pool.push(cut),
            Err(error) => collector.push(RecordFailure {
                row: record.row,
                v_name: record.v_name.clone(),
                cdr3: record.cdr3.clone(),
                j_name: record.j_name.clone(),
                error,
            }),
        }
    }
    info!(
        "analyzed {} records, failure rate {:.3}",
        records.len(),
        collector.failure_rate(records.len())
    );
    (pool, collector.into_failures())
}

/// Analyze all records, then either report (errors / preshuffled pool) or
/// recombine. In SHUFFLED mode `depth * pool_size` draws are made with a
/// generator seeded from `random_seed`, so identical input and seed give
/// identical output.
pub fn shuffle(
    reference: &GermlineReference,
    params: &ShuffleParameters,
    records: &[InputRecord],
) -> Result<ShuffleOutput> {
    params.validate()?;
    let (pool, failures) = analyze_pool(reference, params, records);

    // `return_errors` wins when both report flags are set
    if params.return_errors {
        return Ok(ShuffleOutput::Errors(failures));
    }
    if params.return_presuffled {
        return Ok(ShuffleOutput::Preshuffled(pool));
    }

    if pool.is_empty() {
        return Ok(ShuffleOutput::Shuffled(Vec::new()));
    }

    let mut rng = SmallRng::seed_from_u64(params.random_seed);
    let n_draws = params.depth * pool.len();
    let mut shuffled = Vec::with_capacity(n_draws);
    for _ in 0..n_draws {
        // left and right fragments are drawn independently, uniformly,
        // with replacement; the source pool is never mutated
        let left = &pool[rng.gen_range(0..pool.len())];
        let right = &pool[rng.gen_range(0..pool.len())];
        let cdr3 = format!("{}{}", left.left_fragment(), right.right_fragment());
        shuffled.push(ShuffledRecord {
            v_name: left.v_name.clone(),
            j_name: right.j_name.clone(),
            length: cdr3.len(),
            left_fragment: left.left_fragment().to_string(),
            right_fragment: right.right_fragment().to_string(),
            left_row: left.row,
            right_row: right.row,
            cdr3,
        });
    }
    Ok(ShuffleOutput::Shuffled(shuffled))
}
