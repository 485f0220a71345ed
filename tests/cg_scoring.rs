//! Scoring of Complete Genomics gapped reads.
//!
//! The read is built from a template with the most common gap layout:
//! a 2 base overlap after the first 5 bases, no small gap, and a 6 base gap
//! before the last arm, covering 39 template bases.

use allpaths::{
    encode, AllPathsScorer, Base, CgGapDistributions, CgLayout, ErrorRates, GapHistograms, InvertedGapEnvironment,
    LogPossibility, MachineType, MappedRead, ReadEnvironment, RealignParams, RealignParamsBuilder,
    SimplePossibility, TransitionProbabilities,
};

const TEMPLATE: &[u8] = b"GCTAAAGACAATTACATAACATACACGTCAGCACGAAACTTGTTGGCCCAGTGTGAATCG";
const START: usize = 10;
const SPAN: usize = 39;

const PROBS: TransitionProbabilities = TransitionProbabilities {
    matching: 0.99,
    mismatch: 0.01,
    delete_open: 1e-3,
    delete_extend: 0.3,
    insert_open: 1e-3,
    insert_extend: 0.3,
};

fn template() -> Vec<Base> {
    encode(TEMPLATE).unwrap()
}

fn gapped_read() -> Vec<Base> {
    let t = template();
    let s = START;
    [&t[s..s + 5], &t[s + 3..s + 13], &t[s + 13..s + 23], &t[s + 29..s + 39]].concat()
}

fn cg_params() -> RealignParams {
    RealignParams::new(MachineType::CompleteGenomics, PROBS).unwrap()
}

fn illumina_params() -> RealignParams {
    RealignParams::new(MachineType::Illumina, PROBS).unwrap()
}

fn score(params: &RealignParams, read: &[Base], template: &[Base], start: isize, max_shift: usize) -> f64 {
    let env = ReadEnvironment::new(read, vec![0.01; read.len()], template, start, max_shift).unwrap();
    let mut scorer = AllPathsScorer::new(LogPossibility, params);
    scorer.set_environment(&env).unwrap();
    scorer.total_score_ln()
}

#[test]
fn test_layout_span() {
    let read = gapped_read();
    assert_eq!(read.len(), 35);
    let span = CgLayout::canonical().expected_span(read.len(), &CgGapDistributions::defaults());
    assert_eq!(span, SPAN);
}

#[test]
fn test_gapped_recurrence_explains_machine_gaps() {
    let read = gapped_read();
    let t = template();
    for max_shift in [0, 1, 3] {
        let cg = score(&cg_params(), &read, &t, START as isize, max_shift);
        let standard = score(&illumina_params(), &read, &t, START as isize, max_shift);
        assert!(cg > -2.0, "max_shift {}: {}", max_shift, cg);
        assert!(cg > standard + 30.0, "max_shift {}: {} vs {}", max_shift, cg, standard);
    }
}

#[test]
fn test_narrow_band_costs_exactly_the_modal_gap_probabilities() {
    // With a single band column only the modal gap lengths are reachable, so
    // the gapped score is the ungapped score of the contiguous read times the
    // probability of each modal length.
    let read = gapped_read();
    let cg = score(&cg_params(), &read, &template(), START as isize, 0);
    let contiguous = score(&illumina_params(), &read, &read, 0, 0);
    let expected = 0.84f64.ln() + 0.9f64.ln() + 0.64f64.ln();
    assert!((cg - contiguous - expected).abs() < 1e-9, "{}", cg - contiguous);
}

#[test]
fn test_inverted_read_scores_like_canonical() {
    let read = gapped_read();
    let t = template();
    let canonical = score(&cg_params(), &read, &t, START as isize, 2);

    // The same molecule seen in mirror orientation, gaps on the right.
    let mirrored_template: Vec<Base> = t.iter().rev().copied().collect();
    let mirrored_read: Vec<Base> = read.iter().rev().copied().collect();
    let mirrored_start = (t.len() - START - SPAN) as isize;
    let env = ReadEnvironment::new(&mirrored_read, vec![0.01; 35], &mirrored_template, mirrored_start, 2).unwrap();

    let mut scorer = AllPathsScorer::new(LogPossibility, &cg_params());
    scorer.set_environment(&InvertedGapEnvironment::new(&env, SPAN)).unwrap();
    assert!((scorer.total_score_ln() - canonical).abs() < 1e-12);

    // Without inversion the gaps land in the wrong place.
    scorer.set_environment(&env).unwrap();
    assert!(scorer.total_score_ln() < canonical - 10.0);
}

#[test]
fn test_arithmetics_agree_on_gapped_reads() {
    let read = gapped_read();
    let t = template();
    let env = ReadEnvironment::new(&read, vec![0.01; 35], &t, START as isize, 3).unwrap();
    let mut log = AllPathsScorer::new(LogPossibility, &cg_params());
    let mut simple = AllPathsScorer::new(SimplePossibility, &cg_params());
    log.set_environment(&env).unwrap();
    simple.set_environment(&env).unwrap();
    assert!((log.total_score_ln() - simple.total_score_ln()).abs() < 1e-9);
    assert_eq!(log.metrics().gap_rows, 3);
}

#[test]
fn test_calibrated_and_default_distributions_are_separately_selectable() {
    let histograms = GapHistograms {
        total_reads: 100,
        overlap: vec![0, 0, 20, 80],
        small_gap: vec![50, 50],
        gap: vec![0, 0, 90, 10],
    };
    let build = |force: bool| {
        RealignParamsBuilder::new(MachineType::CompleteGenomics)
            .error_rates(ErrorRates::default())
            .gap_histograms(histograms.clone())
            .force_default_gaps(force)
            .build()
            .unwrap()
    };
    let calibrated = build(false);
    let defaults = build(true);

    let read = gapped_read();
    let t = template();
    let a = score(&calibrated, &read, &t, START as isize, 2);
    let b = score(&defaults, &read, &t, START as isize, 2);
    // Calibration puts most overlap mass on 3 bases, away from this read's 2.
    assert!(b > a + 1.0, "{} vs {}", b, a);
}

#[test]
fn test_evidence_inverts_reverse_strand_reads() {
    use allpaths::{ArithmeticKind, EvidenceScorer, Region, ScorerPool};

    let t = template();
    let mirrored_template: Vec<Base> = t.iter().rev().copied().collect();
    let mirrored_read: Vec<Base> = gapped_read().iter().rev().copied().collect();
    let mirrored_start = t.len() - START - SPAN;
    let read = MappedRead::new("cg", mirrored_read, vec![20; 35], mirrored_start, true).unwrap();

    let region = Region {
        reference: &mirrored_template,
        replace_start: 0,
        replace_end: 0,
    };
    let hypotheses = vec![Vec::new()];
    let scorer = EvidenceScorer::new(ScorerPool::new(ArithmeticKind::Log, cg_params()), 2);
    let evidence = scorer.score_read(&read, &region, &hypotheses).unwrap();
    assert!(evidence.scores[0] > -3.0, "{:?}", evidence.scores);
}
