//! # Complete Genomics Gap Model
//!
//! Complete Genomics reads are assembled from arms separated by machine gaps
//! whose length varies from read to read, plus one short overlap where the
//! template is read twice. In canonical (left-gap) orientation a 35 base read
//! looks like:
//!
//! ```text
//!   read index   0....4   5......14   15.....24   25.....34
//!                [ 5bp ]^ [ 10bp  ]^  [ 10bp  ]^  [ 10bp  ]
//!                       |          |           |
//!                 overlap 0-4   small gap 0-3  gap 4-8
//! ```
//!
//! Reads whose gaps sit in the right arm are mirrored into this orientation by
//! [`crate::model::inverted::InvertedGapEnvironment`].

use crate::error::{AllPathsError, Result};

/// Length of a canonical Complete Genomics read.
pub const CG_READ_LENGTH: usize = 35;

/// Tolerance on distribution sums.
pub const DISTRIBUTION_TOLERANCE: f64 = 1e-9;

const DEFAULT_OVERLAP: [f64; 5] = [0.0, 0.08, 0.84, 0.08, 0.0];
const DEFAULT_SMALL_GAP: [f64; 4] = [0.9, 0.07, 0.02, 0.01];
const DEFAULT_GAP: [f64; 5] = [0.0, 0.27, 0.64, 0.09, 0.0];

/// The three machine-gap types of a CG read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GapKind {
    /// Template re-read: the next arm starts 0-4 bases before the previous ended.
    Overlap,
    /// Template skipped by 0-3 bases.
    SmallGap,
    /// Template skipped by 4-8 bases.
    Gap,
}

impl GapKind {
    pub fn min_length(self) -> usize {
        match self {
            GapKind::Overlap | GapKind::SmallGap => 0,
            GapKind::Gap => 4,
        }
    }

    pub fn max_length(self) -> usize {
        match self {
            GapKind::Overlap => 4,
            GapKind::SmallGap => 3,
            GapKind::Gap => 8,
        }
    }

    /// Number of distinct lengths this gap can take.
    pub fn range_len(self) -> usize {
        self.max_length() - self.min_length() + 1
    }

    /// Template advance caused by a gap of `length` bases (negative for overlaps).
    pub fn template_shift(self, length: usize) -> isize {
        match self {
            GapKind::Overlap => -(length as isize),
            GapKind::SmallGap | GapKind::Gap => length as isize,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            GapKind::Overlap => "overlap",
            GapKind::SmallGap => "small gap",
            GapKind::Gap => "gap",
        }
    }
}

/// Probability of each length of one gap type.
#[derive(Clone, Debug, PartialEq)]
pub struct GapDistribution {
    kind: GapKind,
    /// `probs[i]` is the probability of length `kind.min_length() + i`.
    probs: Vec<f64>,
}

impl GapDistribution {
    /// Validate an explicit distribution. Shorter inputs are padded with zeros;
    /// entries must be finite, non-negative and sum to one.
    pub fn new(kind: GapKind, probs: &[f64]) -> Result<Self> {
        if probs.len() > kind.range_len() {
            return Err(AllPathsError::config(format!(
                "{} distribution has {} entries but only {} lengths are possible",
                kind.name(),
                probs.len(),
                kind.range_len()
            )));
        }
        if let Some(bad) = probs.iter().find(|p| !p.is_finite() || **p < 0.0) {
            return Err(AllPathsError::config(format!(
                "{} distribution has invalid entry {}",
                kind.name(),
                bad
            )));
        }
        let sum: f64 = probs.iter().sum();
        if (sum - 1.0).abs() > DISTRIBUTION_TOLERANCE {
            return Err(AllPathsError::config(format!(
                "{} distribution sums to {} instead of 1",
                kind.name(),
                sum
            )));
        }
        let mut padded = probs.to_vec();
        padded.resize(kind.range_len(), 0.0);
        Ok(Self {
            kind,
            probs: padded,
        })
    }

    /// Normalize a calibration histogram. Returns `None` when it holds no counts.
    pub fn from_counts(kind: GapKind, counts: &[u64]) -> Result<Option<Self>> {
        if counts.len() > kind.range_len() {
            return Err(AllPathsError::config(format!(
                "{} histogram has {} entries but only {} lengths are possible",
                kind.name(),
                counts.len(),
                kind.range_len()
            )));
        }
        let total = checked_total(kind, counts)?;
        if total == 0 {
            return Ok(None);
        }
        let probs: Vec<f64> = counts.iter().map(|&c| c as f64 / total as f64).collect();
        Self::new(kind, &probs).map(Some)
    }

    /// Fixed distribution used when no calibration exists for this gap type.
    pub fn default_for(kind: GapKind) -> Self {
        let probs: &[f64] = match kind {
            GapKind::Overlap => &DEFAULT_OVERLAP,
            GapKind::SmallGap => &DEFAULT_SMALL_GAP,
            GapKind::Gap => &DEFAULT_GAP,
        };
        Self {
            kind,
            probs: probs.to_vec(),
        }
    }

    pub fn kind(&self) -> GapKind {
        self.kind
    }

    /// Probability of a gap of exactly `length` bases.
    pub fn probability(&self, length: usize) -> f64 {
        length
            .checked_sub(self.kind.min_length())
            .and_then(|i| self.probs.get(i))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn probabilities(&self) -> &[f64] {
        &self.probs
    }

    pub fn sum(&self) -> f64 {
        self.probs.iter().sum()
    }

    /// Most likely length; ties go to the shorter gap.
    pub fn mode(&self) -> usize {
        let mut best = 0;
        for (i, &p) in self.probs.iter().enumerate() {
            if p > self.probs[best] {
                best = i;
            }
        }
        self.kind.min_length() + best
    }

    /// Template shift of the most likely length.
    pub fn expected_shift(&self) -> isize {
        self.kind.template_shift(self.mode())
    }

    /// `(template shift, probability)` for every length with non-zero probability.
    pub fn shifts(&self) -> impl Iterator<Item = (isize, f64)> + '_ {
        let kind = self.kind;
        self.probs
            .iter()
            .enumerate()
            .filter(|&(_, &p)| p > 0.0)
            .map(move |(i, &p)| (kind.template_shift(kind.min_length() + i), p))
    }
}

/// Sum of histogram counts, rejecting totals that do not fit in a `u64`.
pub(crate) fn checked_total(kind: GapKind, counts: &[u64]) -> Result<u64> {
    counts
        .iter()
        .try_fold(0u64, |acc, &c| acc.checked_add(c))
        .ok_or_else(|| AllPathsError::config(format!("{} histogram counts overflow", kind.name())))
}

/// The three gap distributions of one CG read group.
#[derive(Clone, Debug, PartialEq)]
pub struct CgGapDistributions {
    pub overlap: GapDistribution,
    pub small_gap: GapDistribution,
    pub gap: GapDistribution,
}

impl CgGapDistributions {
    pub fn defaults() -> Self {
        Self {
            overlap: GapDistribution::default_for(GapKind::Overlap),
            small_gap: GapDistribution::default_for(GapKind::SmallGap),
            gap: GapDistribution::default_for(GapKind::Gap),
        }
    }

    pub fn get(&self, kind: GapKind) -> &GapDistribution {
        match kind {
            GapKind::Overlap => &self.overlap,
            GapKind::SmallGap => &self.small_gap,
            GapKind::Gap => &self.gap,
        }
    }
}

/// Position of one machine gap: it sits immediately before `read_index`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GapSite {
    pub read_index: usize,
    pub kind: GapKind,
}

/// Gap positions of a read in canonical orientation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CgLayout {
    sites: Vec<GapSite>,
}

impl CgLayout {
    /// 5 | overlap | 10 | small gap | 10 | gap | 10
    pub fn canonical() -> Self {
        Self {
            sites: vec![
                GapSite {
                    read_index: 5,
                    kind: GapKind::Overlap,
                },
                GapSite {
                    read_index: 15,
                    kind: GapKind::SmallGap,
                },
                GapSite {
                    read_index: 25,
                    kind: GapKind::Gap,
                },
            ],
        }
    }

    pub fn sites(&self) -> &[GapSite] {
        &self.sites
    }

    /// Template bases covered by a read of `read_length` when every gap takes
    /// its most likely length.
    pub fn expected_span(&self, read_length: usize, gaps: &CgGapDistributions) -> usize {
        let shift: isize = self
            .sites
            .iter()
            .filter(|s| s.read_index > 0 && s.read_index < read_length)
            .map(|s| gaps.get(s.kind).expected_shift())
            .sum();
        (read_length as isize + shift).max(0) as usize
    }
}

impl Default for CgLayout {
    fn default() -> Self {
        Self::canonical()
    }
}
