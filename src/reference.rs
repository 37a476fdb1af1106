//! Immutable germline amino-acid reference, loaded once per process
use crate::errors::RecordError;
use crate::gene::{imgt_segment_type, with_default_allele, Chain, Gene, SegmentType};
use anyhow::{anyhow, Context, Result};
use csv::ReaderBuilder;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Curated snapshot of the IMGT V/D/J amino-acid table
/// (combo-XCR column layout: id, organism, chain, region, cdrs,
/// aligned_protseq).
const GERMLINE_AA_TSV: &str = include_str!("../data/germline_aa.tsv");

static BUILTIN: Lazy<GermlineReference> = Lazy::new(|| {
    GermlineReference::from_tsv(GERMLINE_AA_TSV.as_bytes())
        .expect("embedded germline table is malformed")
});

/// One row of the germline table. For V and J genes the CDR3-adjacent
/// part is the last `;`-separated element of `cdrs`; D genes carry their
/// sequence in `aligned_protseq`.
#[derive(Debug, Deserialize)]
struct GermlineRow {
    id: String,
    organism: String,
    chain: String,
    region: String,
    cdrs: String,
    aligned_protseq: String,
}

/// Read-only mapping from (organism, chain, segment type, gene name +
/// allele) to the germline gene. Built once, then shared by all analyses.
#[derive(Default, Clone, Debug)]
pub struct GermlineReference {
    genes: HashMap<(String, Chain, SegmentType), HashMap<String, Gene>>,
}

impl GermlineReference {
    pub fn new() -> GermlineReference {
        GermlineReference::default()
    }

    /// The reference shipped with the crate, parsed on first use
    pub fn builtin() -> &'static GermlineReference {
        &BUILTIN
    }

    pub fn from_file(path: &Path) -> Result<GermlineReference> {
        let file = File::open(path)
            .with_context(|| format!("Unable to open germline table {}", path.display()))?;
        GermlineReference::from_tsv(file)
    }

    /// Parse a tab-separated germline table (combo-XCR layout)
    pub fn from_tsv<R: Read>(reader: R) -> Result<GermlineReference> {
        let mut rdr = ReaderBuilder::new().delimiter(b'\t').from_reader(reader);
        let mut reference = GermlineReference::new();
        for (line, result) in rdr.deserialize().enumerate() {
            let row: GermlineRow =
                result.with_context(|| format!("Error reading germline table row {line}"))?;
            let chain = Chain::parse(&row.chain)
                .with_context(|| format!("Invalid chain in germline table row {line}"))?;
            let segment = SegmentType::parse(&row.region)
                .with_context(|| format!("Invalid region in germline table row {line}"))?;
            if imgt_segment_type(&row.id)? != segment {
                return Err(anyhow!(
                    "Gene {} is listed under region {} in the germline table",
                    row.id,
                    segment
                ));
            }
            let seq = match segment {
                SegmentType::D => row.aligned_protseq.trim().to_string(),
                // last element of the `;`-joined CDR list is the CDR3 part
                _ => row
                    .cdrs
                    .split(';')
                    .last()
                    .unwrap_or("")
                    .trim()
                    .to_string(),
            };
            if seq.is_empty() {
                return Err(anyhow!("Gene {} has no sequence in the germline table", row.id));
            }
            reference.add_gene(&row.organism, chain, segment, Gene::new(row.id, seq));
        }
        Ok(reference)
    }

    /// Insert one gene. Only used while building the reference; after
    /// construction the store is read-only.
    pub fn add_gene(&mut self, organism: &str, chain: Chain, segment: SegmentType, gene: Gene) {
        self.genes
            .entry((organism.to_string(), chain, segment))
            .or_default()
            .insert(gene.name.clone(), gene);
    }

    /// Find a gene by name, defaulting the allele to `*01` when absent
    pub fn lookup(
        &self,
        organism: &str,
        chain: Chain,
        segment: SegmentType,
        name: &str,
    ) -> Result<&Gene, RecordError> {
        let full_name = with_default_allele(name);
        self.genes
            .get(&(organism.to_string(), chain, segment))
            .and_then(|m| m.get(&full_name))
            .ok_or_else(|| RecordError::UnknownGene { name: full_name })
    }

    /// All D alleles for one organism/chain, sorted by name so downstream
    /// scans are deterministic. Empty for chains without D genes.
    pub fn d_genes(&self, organism: &str, chain: Chain) -> Vec<&Gene> {
        let mut genes: Vec<&Gene> = self
            .genes
            .get(&(organism.to_string(), chain, SegmentType::D))
            .map(|m| m.values().collect())
            .unwrap_or_default();
        genes.sort_by(|a, b| a.name.cmp(&b.name));
        genes
    }

    pub fn organisms(&self) -> Vec<&str> {
        let mut orgs: Vec<&str> = self.genes.keys().map(|(o, _, _)| o.as_str()).collect();
        orgs.sort_unstable();
        orgs.dedup();
        orgs
    }
}
