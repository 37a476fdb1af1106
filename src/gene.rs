//! Deal with V/D/J gene names and germline gene representations
use anyhow::{anyhow, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// TCR chain. Alpha chains have no D genes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Chain {
    A,
    B,
}

impl Chain {
    pub fn parse(s: &str) -> Result<Chain> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(Chain::A),
            "B" => Ok(Chain::B),
            _ => Err(anyhow!(
                "Invalid chain {:?} (only \"A\" and \"B\" are allowed)",
                s
            )),
        }
    }

    pub fn has_d_genes(self) -> bool {
        matches!(self, Chain::B)
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Chain::A => write!(f, "A"),
            Chain::B => write!(f, "B"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SegmentType {
    V,
    D,
    J,
}

impl SegmentType {
    pub fn parse(s: &str) -> Result<SegmentType> {
        match s.trim() {
            "V" => Ok(SegmentType::V),
            "D" => Ok(SegmentType::D),
            "J" => Ok(SegmentType::J),
            _ => Err(anyhow!(
                "Invalid gene segment type {:?} (only V,D,J are allowed)",
                s
            )),
        }
    }
}

impl fmt::Display for SegmentType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SegmentType::V => write!(f, "V"),
            SegmentType::D => write!(f, "D"),
            SegmentType::J => write!(f, "J"),
        }
    }
}

/// A germline gene segment: full IMGT name (with allele) plus the
/// amino-acid sequence it contributes around the CDR3.
#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gene {
    pub name: String,
    pub seq: String,
}

impl Gene {
    pub fn new(name: impl Into<String>, seq: impl Into<String>) -> Gene {
        Gene {
            name: name.into(),
            seq: seq.into(),
        }
    }
}

static IMGT_NAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(TCRB|TCRA|TRB|TRA)(V|D|J)([\w/\-\.]+)?(?:\*(\d+))?$").unwrap()
});

/// Segment type encoded in an IMGT-like gene name (e.g. `TRBV19*01` -> V).
pub fn imgt_segment_type(name: &str) -> Result<SegmentType> {
    let g = IMGT_NAME_REGEX.captures(name).ok_or_else(|| {
        anyhow!(
            "Gene names must follow IMGT conventions, e.g. TRBV19*01 (error coming from the name {})",
            name
        )
    })?;
    SegmentType::parse(g.get(2).map_or("", |m| m.as_str()))
}

/// Append the default allele when the name carries none
/// (`TRBV19` -> `TRBV19*01`).
pub fn with_default_allele(name: &str) -> String {
    if name.contains('*') {
        name.to_string()
    } else {
        format!("{name}*01")
    }
}
