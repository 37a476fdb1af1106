use tcrshuffle::{Chain, Gene, GermlineReference, InputRecord, SegmentType, ShuffleParameters};

/// Small hand-built reference, enough to exercise every code path
/// without touching the embedded germline table.
#[allow(dead_code)]
pub fn toy_reference() -> GermlineReference {
    let mut reference = GermlineReference::new();
    for (name, seq) in [("TRBV1*01", "CASS"), ("TRBV2*01", "CASR")] {
        reference.add_gene("human", Chain::B, SegmentType::V, Gene::new(name, seq));
    }
    for (name, seq) in [("TRBJ1*01", "TEAFF"), ("TRBJ2*01", "QYF"), ("TRBJ3*01", "SSQYF")] {
        reference.add_gene("human", Chain::B, SegmentType::J, Gene::new(name, seq));
    }
    for (name, seq) in [("TRBD1*01", "HAGG"), ("TRBD2*01", "GTSG")] {
        reference.add_gene("human", Chain::B, SegmentType::D, Gene::new(name, seq));
    }
    reference.add_gene("human", Chain::A, SegmentType::V, Gene::new("TRAV1*01", "CAV"));
    reference.add_gene("human", Chain::A, SegmentType::J, Gene::new("TRAJ1*01", "QLIW"));
    reference
}

#[allow(dead_code)]
pub fn record(row: usize, v: &str, cdr3: &str, j: &str) -> InputRecord {
    InputRecord {
        row,
        v_name: v.to_string(),
        cdr3: cdr3.to_string(),
        j_name: j.to_string(),
    }
}

#[allow(dead_code)]
pub fn beta_params() -> ShuffleParameters {
    ShuffleParameters::default()
}

#[allow(dead_code)]
pub fn alpha_params() -> ShuffleParameters {
    ShuffleParameters {
        chain: Chain::A,
        ..ShuffleParameters::default()
    }
}
