mod common;

use anyhow::Result;
use tcrshuffle::{
    analyze_record, assign_d, match_j_suffix, match_v_prefix, Gene, LabeledCdr3, RecordError,
    RegionLabel,
};

#[test]
fn v_prefix_and_j_suffix_match_lengths() {
    assert_eq!(match_v_prefix("CASSSHAGGNTEAFF", "CASS"), 4);
    assert_eq!(match_v_prefix("CASSSHAGGNTEAFF", "CASR"), 3);
    assert_eq!(match_v_prefix("XYZ", "CASS"), 0);
    assert_eq!(match_j_suffix("CASSSHAGGNTEAFF", "TEAFF"), 5);
    assert_eq!(match_j_suffix("CASSSHAGGNTEAFF", "QYF"), 1);
    assert_eq!(match_j_suffix("CASSW", "TEAFF"), 0);
}

#[test]
fn germline_flanks_and_d_label_the_cdr3() -> Result<()> {
    // germline V ends in CASS, J starts matching TEAFF, D allele HAGG
    // matches inside the middle
    let reference = common::toy_reference();
    let params = common::beta_params();
    let cut = analyze_record(
        &reference,
        &params,
        &common::record(0, "TRBV1", "CASSSHAGGNTEAFF", "TRBJ1"),
    )?;

    assert_eq!(cut.labeled.label_string(), "VVVVNDDDDNJJJJJ");
    assert_eq!(cut.labeled.v_len(), 4);
    assert_eq!(cut.labeled.j_len(), 5);
    assert_eq!(cut.labeled.d_span(), Some((5, 9)));
    assert_eq!(cut.d_gene.as_deref(), Some("TRBD1*01"));
    // left fragment runs through the D run, right fragment is the
    // remaining middle plus the J run
    assert_eq!(cut.cut_left, 9);
    assert_eq!(cut.cut_right, 10);
    assert_eq!(cut.left_fragment(), "CASSSHAGG");
    assert_eq!(cut.right_fragment(), "NTEAFF");
    assert_eq!(cut.annotated(), "CASSSHAGG--n--TEAFF");
    Ok(())
}

#[test]
fn label_runs_partition_the_cdr3() -> Result<()> {
    let reference = common::toy_reference();
    let params = common::beta_params();
    for cdr3 in ["CASSSHAGGNTEAFF", "CASSPGTSGAAQYF", "CASRLLLTEAFF", "CASSQYF"] {
        let cut = analyze_record(&reference, &params, &common::record(0, "TRBV1", cdr3, "TRBJ1"))?;
        let labeled = &cut.labeled;
        assert_eq!(labeled.len(), cdr3.len());

        let v = labeled.v_len();
        let j = labeled.j_len();
        let d = labeled.d_span().map_or(0, |(s, e)| e - s);
        let n = labeled
            .labels
            .iter()
            .filter(|&&l| l == RegionLabel::N)
            .count();
        assert_eq!(v + j + d + n, cdr3.len());

        // run order is V*, (N|D)* with a single D run, J*
        let s = labeled.label_string();
        let middle: &str = &s[v..s.len() - j];
        assert!(!middle.contains('V') && !middle.contains('J'));
        let d_runs = middle
            .split('N')
            .filter(|part| !part.is_empty())
            .count();
        assert!(d_runs <= 1);
    }
    Ok(())
}

#[test]
fn overlapping_v_and_j_is_ambiguous() {
    let reference = common::toy_reference();
    let params = common::beta_params();
    // V match (CASS, 4) and J match (SSQYF, 5) share residues of a
    // 7-residue CDR3
    let err = analyze_record(&reference, &params, &common::record(0, "TRBV1", "CASSQYF", "TRBJ3"))
        .unwrap_err();
    assert!(matches!(err, RecordError::AmbiguousStructure { .. }));
}

#[test]
fn d_assignment_prefers_longest_then_leftmost_then_name() {
    let long = Gene::new("TRBD1*01", "HAGG");
    let short = Gene::new("TRBD2*01", "GTS");
    let genes = [&long, &short];
    // HAGG (4) fully inside the window beats the 3-mer
    let best = assign_d("CASSHAGGGTSTEAFF", (4, 13), &genes, 3).unwrap();
    assert_eq!(best.gene, "TRBD1*01");
    assert_eq!((best.start, best.end), (4, 8));

    // equal length: the hit closest to the V boundary wins
    let d1 = Gene::new("TRBD1*01", "TTT");
    let d2 = Gene::new("TRBD2*01", "AAA");
    let genes = [&d1, &d2];
    let best = assign_d("CCCCAAATTTX", (4, 11), &genes, 3).unwrap();
    assert_eq!(best.gene, "TRBD2*01");
    assert_eq!((best.start, best.end), (4, 7));

    // full tie: alphabetically first gene name wins
    let d2 = Gene::new("TRBD2*01", "AAA");
    let d9 = Gene::new("TRBD9*01", "AAA");
    let genes = [&d2, &d9];
    let best = assign_d("CCCCAAAX", (4, 8), &genes, 3).unwrap();
    assert_eq!(best.gene, "TRBD2*01");
}

#[test]
fn d_matches_below_threshold_are_ignored() {
    let d1 = Gene::new("TRBD1*01", "HA");
    let genes = [&d1];
    assert_eq!(assign_d("CASSHAGGTEAFF", (4, 10), &genes, 3), None);

    // degenerate windows never match
    let d1 = Gene::new("TRBD1*01", "HAGG");
    let genes = [&d1];
    assert_eq!(assign_d("CASSHAGG", (6, 4), &genes, 3), None);
}

#[test]
fn d_scan_window_is_bounded_by_the_flank_guards() -> Result<()> {
    let reference = common::toy_reference();
    let params = common::beta_params();

    // V matches only CA (2 < min_cut_v = 4), yet HAGG overlapping the
    // guarded first four residues must not be assigned
    let cut = analyze_record(
        &reference,
        &params,
        &common::record(0, "TRBV2", "CAHAGGWNTEAFF", "TRBJ1"),
    )?;
    assert_eq!(cut.labeled.v_len(), 2);
    assert_eq!(cut.d_gene, None);
    assert!(!cut.labeled.label_string().contains('D'));
    // the same allele is found once the window opens at the V-match end
    let d1 = Gene::new("TRBD1*01", "HAGG");
    let genes = [&d1];
    let best = assign_d("CAHAGGWNTEAFF", (2, 8), &genes, 3).unwrap();
    assert_eq!((best.start, best.end), (2, 6));

    // J matches only F (1 < min_cut_j = 3): GTSG reaching into the
    // guarded last three residues is ignored as well
    let cut = analyze_record(
        &reference,
        &params,
        &common::record(1, "TRBV1", "CASSWGTSGF", "TRBJ2"),
    )?;
    assert_eq!(cut.labeled.j_len(), 1);
    assert_eq!(cut.d_gene, None);
    assert!(!cut.labeled.label_string().contains('D'));
    Ok(())
}

#[test]
fn cut_points_are_label_transitions_plus_ends() -> Result<()> {
    let reference = common::toy_reference();
    let params = common::beta_params();
    let cut = analyze_record(
        &reference,
        &params,
        &common::record(0, "TRBV1", "CASSSHAGGNTEAFF", "TRBJ1"),
    )?;
    assert_eq!(cut.cut_points(), vec![0, 4, 5, 9, 10, 15]);
    Ok(())
}

#[test]
fn labeler_rejects_overlapping_spans() {
    let d = tcrshuffle::DMatch {
        gene: "TRBD1*01".to_string(),
        start: 2,
        end: 6,
    };
    // D span crossing into the V run
    let err = LabeledCdr3::new("CASSSHAGG", 4, 2, Some(&d)).unwrap_err();
    assert!(matches!(err, RecordError::RegionOverlap { .. }));
}
