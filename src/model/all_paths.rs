//! # All-Paths Alignment Scorer
//!
//! Banded pair-HMM forward pass that sums the probability of every alignment
//! path between a read and a template, instead of keeping only the best one.
//!
//! ## Layout
//! Three matrices (`Match`, `Insert`, `Delete`) of `read_length + 1` rows by
//! `2 * max_shift + 1` band columns. Column `j` of row `i` sits on template
//! coordinate `start + row_offset(i) + j`, where
//!
//! ```text
//! row_offset(i) = i - max_shift - 1 + (expected shifts of machine gaps passed)
//! ```
//!
//! so consecutive rows slide one template base to the right and column
//! `max_shift` of row `i` is the naive diagonal for read base `i - 1`.
//!
//! ## Transitions
//! - `Match[i][j]` consumes read base `i - 1` and the template base of the
//!   cell, entering from row `i - 1` at the same column.
//! - `Insert[i][j]` consumes a read base only; it enters from column `j + 1`
//!   of the previous row, which holds the same template coordinate.
//! - `Delete[i][j]` consumes a template base only; it enters from column
//!   `j - 1` of the same row.
//!
//! For gapped reads the `Match` cells of the first row after a machine gap sum
//! over every gap length, weighted by the gap distribution.

use std::fmt;

use crate::error::{AllPathsError, Result};
use crate::model::arithmetic::PossibilityArithmetic;
use crate::model::cg::{CgGapDistributions, CgLayout};
use crate::model::environment::Environment;
use crate::model::parameters::RealignParams;
use crate::utils::telemetry::ScoreMetrics;
use crate::utils::workspace::ScoreWorkspace;

/// Transition and emission constants encoded in the engine's arithmetic.
#[derive(Clone, Copy, Debug)]
struct Possibilities {
    /// Linear match rate, used to build per-quality emissions.
    matching: f64,
    /// Linear mismatch rate.
    mismatch: f64,
    match_to_match: f64,
    insert_to_match: f64,
    delete_to_match: f64,
    insert_open: f64,
    insert_extend: f64,
    delete_open: f64,
    delete_extend: f64,
    match_start: f64,
    delete_start: f64,
    unknown_emission: f64,
}

impl Possibilities {
    fn new<A: PossibilityArithmetic>(arith: A, params: &RealignParams) -> Self {
        let delete_open = params.delete_open_ln().exp();
        let insert_open = params.insert_open_ln().exp();
        Self {
            matching: params.match_ln().exp(),
            mismatch: params.mismatch_ln().exp(),
            match_to_match: arith.prob_to_poss(1.0 - delete_open - insert_open),
            insert_to_match: arith.prob_to_poss(1.0 - params.insert_extend_ln().exp()),
            delete_to_match: arith.prob_to_poss(1.0 - params.delete_extend_ln().exp()),
            insert_open: arith.ln_to_poss(params.insert_open_ln()),
            insert_extend: arith.ln_to_poss(params.insert_extend_ln()),
            delete_open: arith.ln_to_poss(params.delete_open_ln()),
            delete_extend: arith.ln_to_poss(params.delete_extend_ln()),
            match_start: arith.prob_to_poss(1.0 - delete_open),
            delete_start: arith.ln_to_poss(params.delete_open_ln()),
            unknown_emission: arith.prob_to_poss(0.25),
        }
    }

    /// `(equal, different)` emission possibilities for a base call with error
    /// probability `q`.
    #[inline]
    fn emissions<A: PossibilityArithmetic>(&self, arith: A, q: f64) -> (f64, f64) {
        let third = q / 3.0;
        let equal = self.matching * (1.0 - q) + self.mismatch * third;
        let different = self.matching * third + self.mismatch * ((1.0 - third) / 3.0);
        (arith.prob_to_poss(equal), arith.prob_to_poss(different))
    }
}

/// One machine gap, with its length distribution pre-encoded.
#[derive(Clone, Debug)]
struct GapStep {
    /// The gap sits immediately before this read base.
    read_index: usize,
    /// Shift applied to the row offsets of every later row.
    expected_shift: isize,
    /// `(template shift, possibility)` for each possible gap length.
    shifts: Vec<(isize, f64)>,
}

/// Recurrence variant, fixed at construction from the machine type.
#[derive(Clone, Debug)]
enum Recurrence {
    Standard,
    Gapped(Vec<GapStep>),
}

impl Recurrence {
    fn gapped<A: PossibilityArithmetic>(arith: A, gaps: &CgGapDistributions, layout: &CgLayout) -> Self {
        let steps = layout
            .sites()
            .iter()
            .map(|site| {
                let dist = gaps.get(site.kind);
                GapStep {
                    read_index: site.read_index,
                    expected_shift: dist.expected_shift(),
                    shifts: dist.shifts().map(|(s, p)| (s, arith.prob_to_poss(p))).collect(),
                }
            })
            .collect();
        Recurrence::Gapped(steps)
    }

    /// Gap whose first row after the gap is `row`, for a read of `read_length`.
    #[inline]
    fn gap_before_row(&self, row: usize, read_length: usize) -> Option<&GapStep> {
        match self {
            Recurrence::Standard => None,
            Recurrence::Gapped(steps) => steps
                .iter()
                .find(|s| s.read_index > 0 && s.read_index < read_length && s.read_index + 1 == row),
        }
    }
}

/// Banded all-paths scorer, generic over the possibility arithmetic.
///
/// An instance is not shareable between threads while scoring; give each
/// worker its own. Matrices grow to the largest read seen and are reused.
#[derive(Clone, Debug)]
pub struct AllPathsScorer<A: PossibilityArithmetic> {
    arith: A,
    probs: Possibilities,
    recurrence: Recurrence,
    ws: ScoreWorkspace,
    read_length: usize,
    max_shift: usize,
    start: isize,
    /// Change in reported template coordinate per band column.
    position_step: isize,
    metrics: ScoreMetrics,
}

impl<A: PossibilityArithmetic> AllPathsScorer<A> {
    /// Bind the arithmetic and read-group parameters. Gapped machine types get
    /// the gap-aware recurrence.
    pub fn new(arith: A, params: &RealignParams) -> Self {
        let recurrence = if params.machine_type().is_gapped() {
            let gaps = params
                .cg_gaps()
                .cloned()
                .unwrap_or_else(CgGapDistributions::defaults);
            Recurrence::gapped(arith, &gaps, &CgLayout::canonical())
        } else {
            Recurrence::Standard
        };
        Self {
            arith,
            probs: Possibilities::new(arith, params),
            recurrence,
            ws: ScoreWorkspace::default(),
            read_length: 0,
            max_shift: 0,
            start: 0,
            position_step: 1,
            metrics: ScoreMetrics::default(),
        }
    }

    pub fn arithmetic(&self) -> A {
        self.arith
    }

    pub fn is_gapped(&self) -> bool {
        matches!(self.recurrence, Recurrence::Gapped(_))
    }

    /// Score `env`, replacing the result of any previous environment.
    ///
    /// Fails only with [`AllPathsError::InvalidPossibility`], which indicates a
    /// fault in the recurrence rather than bad input.
    pub fn set_environment<E: Environment + ?Sized>(&mut self, env: &E) -> Result<()> {
        let read_length = env.read_length();
        let max_shift = env.max_shift();
        let width = 2 * max_shift + 1;
        let rows = read_length + 1;

        if self.ws.resize(rows, width) {
            self.metrics.resizes += 1;
            let (max_rows, max_cols) = self.ws.matches.capacity();
            tracing::debug!(rows = max_rows, width = max_cols, "grew all-paths matrices");
        }
        self.read_length = read_length;
        self.max_shift = max_shift;
        self.start = env.start();
        self.position_step = env.absolute_template_position(1) - env.absolute_template_position(0);

        let Self {
            arith,
            probs,
            recurrence,
            ws,
            metrics,
            ..
        } = &mut *self;
        let arith = *arith;

        let mut shift = 0isize;
        for i in 0..rows {
            if let Some(step) = recurrence.gap_before_row(i, read_length) {
                shift += step.expected_shift;
            }
            ws.row_offsets[i] = i as isize - max_shift as isize - 1 + shift;
            ws.row_positions[i] = env.absolute_template_position(ws.row_offsets[i]);
        }

        for j in 0..width {
            ws.matches[(0, j)] = probs.match_start;
            ws.inserts[(0, j)] = arith.zero();
            ws.deletes[(0, j)] = probs.delete_start;
        }

        let mut gap_rows = 0;
        for i in 1..rows {
            let gap = recurrence.gap_before_row(i, read_length);
            if gap.is_some() {
                gap_rows += 1;
            }
            fill_row(arith, probs, ws, env, i, gap);
        }

        metrics.environments += 1;
        metrics.rows += read_length as u64;
        metrics.cells += (read_length * width) as u64;
        metrics.gap_rows += gap_rows;

        self.accumulate_end_scores()?;
        #[cfg(debug_assertions)]
        self.validate()?;
        tracing::trace!(
            read_length,
            max_shift,
            score = self.total_score_ln(),
            "scored environment"
        );
        Ok(())
    }

    fn accumulate_end_scores(&mut self) -> Result<()> {
        let row = self.read_length;
        let mut acc = self.arith.zero();
        for j in 0..self.width() {
            let cell = self.final_cell(j);
            if !self.arith.is_valid_poss(cell) {
                return Err(AllPathsError::InvalidPossibility {
                    row,
                    column: j,
                    value: cell,
                });
            }
            acc = self.arith.add(acc, cell);
            self.ws.end_scores[j] = acc;
        }
        Ok(())
    }

    /// Summed possibility of every banded path.
    pub fn total_score(&self) -> f64 {
        self.ws.end_scores.last().copied().unwrap_or(self.arith.zero())
    }

    /// Natural log of the summed probability of every banded path.
    pub fn total_score_ln(&self) -> f64 {
        self.arith.poss_to_ln(self.total_score())
    }

    /// Cumulative final-row possibility through band column `column`.
    /// `None` outside the band or before any environment was scored.
    pub fn end_score(&self, column: usize) -> Option<f64> {
        self.ws.end_scores.get(column).copied()
    }

    /// `Match + Insert + Delete` of the final row at band column `column`.
    /// `None` outside the band or before any environment was scored.
    pub fn final_row_possibility(&self, column: usize) -> Option<f64> {
        let row = self.read_length;
        let a = self.arith;
        let m = self.ws.matches.get(row, column)?;
        let i = self.ws.inserts.get(row, column)?;
        let d = self.ws.deletes.get(row, column)?;
        Some(a.add(a.add(m, i), d))
    }

    fn final_cell(&self, column: usize) -> f64 {
        let row = self.read_length;
        let a = self.arith;
        a.add(
            a.add(self.ws.matches[(row, column)], self.ws.inserts[(row, column)]),
            self.ws.deletes[(row, column)],
        )
    }

    /// Band width of the last environment.
    pub fn width(&self) -> usize {
        self.ws.width()
    }

    pub fn read_length(&self) -> usize {
        self.read_length
    }

    pub fn max_shift(&self) -> usize {
        self.max_shift
    }

    /// Template offset, relative to the environment start, of band column 0
    /// in `row`.
    pub fn row_offset(&self, row: usize) -> Option<isize> {
        self.ws.row_offsets.get(row).copied()
    }

    /// Template coordinate of a cell, as the environment reports it. For
    /// inverted views this is the coordinate in the underlying template.
    pub fn template_position(&self, row: usize, column: usize) -> Option<isize> {
        if column >= self.width() {
            return None;
        }
        let first = *self.ws.row_positions.get(row)?;
        Some(self.cell_position(first, column))
    }

    #[inline]
    fn cell_position(&self, first: isize, column: usize) -> isize {
        first + column as isize * self.position_step
    }

    /// Check every cell of the current environment.
    pub fn validate(&self) -> Result<()> {
        for i in 0..=self.read_length {
            for matrix in [&self.ws.matches, &self.ws.inserts, &self.ws.deletes] {
                if let Some((j, &value)) = matrix
                    .row(i)
                    .iter()
                    .enumerate()
                    .find(|(_, v)| !self.arith.is_valid_poss(**v))
                {
                    return Err(AllPathsError::InvalidPossibility {
                        row: i,
                        column: j,
                        value,
                    });
                }
            }
        }
        Ok(())
    }

    pub fn metrics(&self) -> &ScoreMetrics {
        &self.metrics
    }

    /// Return the accumulated metrics and reset them.
    pub fn take_metrics(&mut self) -> ScoreMetrics {
        std::mem::take(&mut self.metrics)
    }
}

/// Predecessor mass flowing into a match cell from `column` of `row`.
#[inline]
fn into_match<A: PossibilityArithmetic>(
    arith: A,
    probs: &Possibilities,
    ws: &ScoreWorkspace,
    row: usize,
    column: isize,
) -> f64 {
    if column < 0 || column as usize >= ws.width() {
        return arith.zero();
    }
    let c = column as usize;
    let m = arith.multiply(ws.matches[(row, c)], probs.match_to_match);
    let i = arith.multiply(ws.inserts[(row, c)], probs.insert_to_match);
    let d = arith.multiply(ws.deletes[(row, c)], probs.delete_to_match);
    arith.add(arith.add(m, i), d)
}

fn fill_row<A: PossibilityArithmetic, E: Environment + ?Sized>(
    arith: A,
    probs: &Possibilities,
    ws: &mut ScoreWorkspace,
    env: &E,
    i: usize,
    gap: Option<&GapStep>,
) {
    let width = ws.width();
    let read_base = env.read(i - 1);
    let (equal, different) = probs.emissions(arith, env.quality(i - 1));
    let first = env.start() + ws.row_offsets[i];

    for j in 0..width {
        let template_base = env.template(first + j as isize);
        let emission = if read_base.is_unknown() || template_base.is_unknown() {
            probs.unknown_emission
        } else if read_base == template_base {
            equal
        } else {
            different
        };

        let (mass, insert) = match gap {
            None => {
                let mass = into_match(arith, probs, ws, i - 1, j as isize);
                let insert = if j + 1 < width {
                    arith.add(
                        arith.multiply(ws.matches[(i - 1, j + 1)], probs.insert_open),
                        arith.multiply(ws.inserts[(i - 1, j + 1)], probs.insert_extend),
                    )
                } else {
                    arith.zero()
                };
                (mass, insert)
            }
            Some(step) => {
                // The previous row holds template coordinate `c - 1 - s` at
                // column `j + expected_shift - s`.
                let mass = arith.sum(step.shifts.iter().map(|&(s, p)| {
                    let column = j as isize + step.expected_shift - s;
                    arith.multiply(p, into_match(arith, probs, ws, i - 1, column))
                }));
                (mass, arith.zero())
            }
        };

        let delete = if j > 0 {
            arith.add(
                arith.multiply(ws.matches[(i, j - 1)], probs.delete_open),
                arith.multiply(ws.deletes[(i, j - 1)], probs.delete_extend),
            )
        } else {
            arith.zero()
        };

        ws.matches[(i, j)] = arith.multiply(emission, mass);
        ws.inserts[(i, j)] = insert;
        ws.deletes[(i, j)] = delete;
    }
}

impl<A: PossibilityArithmetic> fmt::Display for AllPathsScorer<A> {
    /// Matrix dump in natural-log units, one line per row, with the absolute
    /// template coordinate of each column.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "all-paths {:?}: read_length={} max_shift={} start={} score_ln={:.6}",
            A::KIND,
            self.read_length,
            self.max_shift,
            self.start,
            self.total_score_ln()
        )?;
        if self.ws.rows() == 0 {
            return Ok(());
        }
        for i in 0..=self.read_length {
            write!(f, "{:>4}", i)?;
            for j in 0..self.width() {
                write!(
                    f,
                    " | {:>5} M={:>9.3} I={:>9.3} D={:>9.3}",
                    self.cell_position(self.ws.row_positions[i], j),
                    self.arith.poss_to_ln(self.ws.matches[(i, j)]),
                    self.arith.poss_to_ln(self.ws.inserts[(i, j)]),
                    self.arith.poss_to_ln(self.ws.deletes[(i, j)]),
                )?;
            }
            writeln!(f)?;
        }
        write!(f, " end")?;
        for j in 0..self.width() {
            write!(f, " | {:>9.3}", self.arith.poss_to_ln(self.ws.end_scores[j]))?;
        }
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{encode, Base, MachineType};
    use crate::model::arithmetic::{LogPossibility, SimplePossibility};
    use crate::model::environment::ReadEnvironment;
    use crate::model::parameters::TransitionProbabilities;

    fn params(machine: MachineType) -> RealignParams {
        RealignParams::new(
            machine,
            TransitionProbabilities {
                matching: 0.99,
                mismatch: 0.01,
                delete_open: 1e-4,
                delete_extend: 0.1,
                insert_open: 1e-4,
                insert_extend: 0.1,
            },
        )
        .unwrap()
    }

    fn score<A: PossibilityArithmetic>(arith: A, read: &str, template: &str, start: isize, max_shift: usize) -> f64 {
        let read = encode(read.as_bytes()).unwrap();
        let template = encode(template.as_bytes()).unwrap();
        let env = ReadEnvironment::new(&read, vec![0.01; read.len()], &template, start, max_shift).unwrap();
        let mut scorer = AllPathsScorer::new(arith, &params(MachineType::Illumina));
        scorer.set_environment(&env).unwrap();
        scorer.total_score_ln()
    }

    #[test]
    fn test_exact_match_scores_near_emission_product() {
        let expected = 4.0 * (0.99f64 * 0.99).ln();
        let got = score(LogPossibility, "ACGT", "ACGT", 0, 0);
        assert!((got - expected).abs() < 2e-3, "{} vs {}", got, expected);
        assert!(got < expected);
    }

    #[test]
    fn test_single_mismatch_costs_emission_ratio() {
        let q: f64 = 0.01;
        let equal = 0.99 * (1.0 - q) + 0.01 * q / 3.0;
        let different = 0.99 * q / 3.0 + 0.01 * ((1.0 - q / 3.0) / 3.0);
        let exact = score(LogPossibility, "ACGT", "ACGT", 0, 0);
        let mismatch = score(LogPossibility, "ACCT", "ACGT", 0, 0);
        assert!((mismatch - exact - (different / equal).ln()).abs() < 1e-9);
    }

    #[test]
    fn test_end_scores_are_cumulative() {
        let read = encode(b"ACGTTGCA").unwrap();
        let template = encode(b"GGACGTTGCAGG").unwrap();
        let env = ReadEnvironment::new(&read, vec![0.02; 8], &template, 2, 3).unwrap();
        let mut scorer = AllPathsScorer::new(SimplePossibility, &params(MachineType::Illumina));
        scorer.set_environment(&env).unwrap();

        assert_eq!(scorer.width(), 7);
        let mut running = 0.0;
        for j in 0..scorer.width() {
            running += scorer.final_row_possibility(j).unwrap();
            assert!((scorer.end_score(j).unwrap() - running).abs() <= 1e-15 * running.max(1.0));
        }
        assert_eq!(scorer.end_score(scorer.width() - 1), Some(scorer.total_score()));
        assert_eq!(scorer.end_score(scorer.width()), None);
        assert_eq!(scorer.final_row_possibility(scorer.width()), None);
        // Best alignment is the diagonal column.
        let best = (0..7)
            .max_by(|&a, &b| {
                scorer
                    .final_row_possibility(a)
                    .unwrap()
                    .total_cmp(&scorer.final_row_possibility(b).unwrap())
            })
            .unwrap();
        assert_eq!(best, 3);
    }

    #[test]
    fn test_row_offsets_and_positions() {
        let read = encode(b"ACGT").unwrap();
        let template = encode(b"ACGT").unwrap();
        let env = ReadEnvironment::new(&read, vec![0.01; 4], &template, 10, 2).unwrap();
        let mut scorer = AllPathsScorer::new(LogPossibility, &params(MachineType::Illumina));
        scorer.set_environment(&env).unwrap();
        assert_eq!(scorer.row_offset(1), Some(-2));
        // Diagonal column of row i holds read base i - 1.
        assert_eq!(scorer.template_position(1, 2), Some(10));
        assert_eq!(scorer.template_position(4, 2), Some(13));
        assert_eq!(scorer.template_position(5, 0), None);
        assert_eq!(scorer.template_position(1, 5), None);
    }

    #[test]
    fn test_inverted_positions_map_to_underlying_template() {
        use crate::model::inverted::InvertedGapEnvironment;

        let read = encode(b"ACGT").unwrap();
        let template = encode(b"TTTACGTTT").unwrap();
        let env = ReadEnvironment::new(&read, vec![0.01; 4], &template, 3, 1).unwrap();
        let mut scorer = AllPathsScorer::new(LogPossibility, &params(MachineType::Illumina));
        scorer.set_environment(&InvertedGapEnvironment::new(&env, 4)).unwrap();

        // Inverted row 1 holds the last read base, which sits at coordinate 6.
        assert_eq!(scorer.template_position(1, 1), Some(6));
        assert_eq!(scorer.template_position(4, 1), Some(3));
        // Columns step leftwards through the underlying template.
        assert_eq!(scorer.template_position(1, 0), Some(7));
        assert_eq!(scorer.template_position(1, 2), Some(5));
        let dump = scorer.to_string();
        assert!(dump.lines().nth(1).unwrap().contains("|     6 M="));
    }

    #[test]
    fn test_fresh_scorer_has_no_cells() {
        let scorer = AllPathsScorer::new(LogPossibility, &params(MachineType::Illumina));
        assert_eq!(scorer.end_score(0), None);
        assert_eq!(scorer.final_row_possibility(0), None);
        assert_eq!(scorer.template_position(0, 0), None);
        assert_eq!(scorer.row_offset(0), None);
        assert_eq!(scorer.total_score(), LogPossibility.zero());
    }

    struct BrokenQuality<'a> {
        inner: ReadEnvironment<'a>,
    }

    impl Environment for BrokenQuality<'_> {
        fn read_length(&self) -> usize {
            self.inner.read_length()
        }

        fn read(&self, index: usize) -> Base {
            self.inner.read(index)
        }

        fn quality(&self, index: usize) -> f64 {
            if index == 1 {
                f64::NAN
            } else {
                self.inner.quality(index)
            }
        }

        fn template(&self, position: isize) -> Base {
            self.inner.template(position)
        }

        fn max_shift(&self) -> usize {
            self.inner.max_shift()
        }

        fn start(&self) -> isize {
            self.inner.start()
        }
    }

    fn score_broken<A: PossibilityArithmetic>(arith: A) -> Result<()> {
        let read = encode(b"ACGT").unwrap();
        let template = encode(b"ACGT").unwrap();
        let env = BrokenQuality {
            inner: ReadEnvironment::new(&read, vec![0.01; 4], &template, 0, 1).unwrap(),
        };
        let mut scorer = AllPathsScorer::new(arith, &params(MachineType::Illumina));
        scorer.set_environment(&env)
    }

    #[test]
    fn test_invalid_cell_is_internal_fault() {
        for result in [score_broken(LogPossibility), score_broken(SimplePossibility)] {
            let err = result.unwrap_err();
            assert!(err.is_internal_fault(), "{}", err);
        }
    }

    #[test]
    fn test_empty_read() {
        let template = encode(b"ACGT").unwrap();
        let env = ReadEnvironment::new(&[], vec![], &template, 0, 1).unwrap();
        let mut scorer = AllPathsScorer::new(LogPossibility, &params(MachineType::Illumina));
        scorer.set_environment(&env).unwrap();
        assert!((scorer.total_score() - 3f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_bases_emit_quarter() {
        let a = score(LogPossibility, "ANGT", "ACGT", 0, 0);
        let b = score(LogPossibility, "ACGT", "ANGT", 0, 0);
        assert!((a - b).abs() < 1e-12);
        let exact = score(LogPossibility, "ACGT", "ACGT", 0, 0);
        let equal: f64 = 0.99 * 0.99 + 0.01 * 0.01 / 3.0;
        assert!((a - exact - (0.25 / equal).ln()).abs() < 1e-9);
    }

    #[test]
    fn test_gapped_recurrence_selected_from_machine() {
        let illumina = AllPathsScorer::new(LogPossibility, &params(MachineType::Illumina));
        let cg = AllPathsScorer::new(LogPossibility, &params(MachineType::CompleteGenomics));
        assert!(!illumina.is_gapped());
        assert!(cg.is_gapped());
    }

    #[test]
    fn test_gap_rows_and_offsets() {
        let read = encode(&[b'A'; 35]).unwrap();
        let template = encode(&[b'A'; 60]).unwrap();
        let env = ReadEnvironment::new(&read, vec![0.01; 35], &template, 10, 1).unwrap();
        let mut scorer = AllPathsScorer::new(LogPossibility, &params(MachineType::CompleteGenomics));
        scorer.set_environment(&env).unwrap();

        assert_eq!(scorer.metrics().gap_rows, 3);
        assert_eq!(scorer.row_offset(5), Some(3));
        // Overlap of 2 before read base 5.
        assert_eq!(scorer.row_offset(6), Some(2));
        assert_eq!(scorer.row_offset(16), Some(12));
        // Gap of 6 before read base 25.
        assert_eq!(scorer.row_offset(26), Some(28));
        assert_eq!(scorer.row_offset(35), Some(37));
    }

    #[test]
    fn test_metrics_and_growth() {
        let mut scorer = AllPathsScorer::new(LogPossibility, &params(MachineType::Illumina));
        let template = encode(b"ACGTACGTACGT").unwrap();
        let long = encode(b"ACGTACGT").unwrap();
        let short = encode(b"ACGT").unwrap();

        let env = ReadEnvironment::new(&long, vec![0.01; 8], &template, 0, 2).unwrap();
        scorer.set_environment(&env).unwrap();
        let env = ReadEnvironment::new(&short, vec![0.01; 4], &template, 0, 2).unwrap();
        scorer.set_environment(&env).unwrap();

        let m = scorer.take_metrics();
        assert_eq!(m.environments, 2);
        assert_eq!(m.rows, 12);
        assert_eq!(m.cells, 60);
        assert_eq!(m.resizes, 1);
        assert!(scorer.metrics().is_empty());
    }

    #[test]
    fn test_display_lists_every_row() {
        let read = encode(b"ACG").unwrap();
        let template = encode(b"ACG").unwrap();
        let env = ReadEnvironment::new(&read, vec![0.01; 3], &template, 0, 1).unwrap();
        let mut scorer = AllPathsScorer::new(LogPossibility, &params(MachineType::Illumina));
        scorer.set_environment(&env).unwrap();
        let dump = scorer.to_string();
        assert!(dump.starts_with("all-paths Log"));
        assert_eq!(dump.lines().count(), 1 + 4 + 1);
        assert!(scorer.validate().is_ok());
    }
}
