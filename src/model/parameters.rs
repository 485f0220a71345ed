//! # Realignment Parameters
//!
//! Per-read-group transition probabilities driving the all-paths recurrence,
//! derived once from calibrated machine error rates. Gapped machine types also
//! carry the Complete Genomics gap/overlap length distributions.
//!
//! ## Derivation from error rates
//! ```text
//! match         = 1 - mismatch_rate
//! mismatch      = mismatch_rate
//! insert_open   = insert_event_rate
//! insert_extend = 1 - insert_event_rate / insert_base_rate   (geometric length)
//! delete_*      = same as insert_* with the delete rates
//! ```
//!
//! All rates are stored as natural logs; the engine converts them once into
//! its own possibility representation.

use serde::{Deserialize, Serialize};

use crate::config::ScoringConfig;
use crate::data::MachineType;
use crate::error::{AllPathsError, Result};
use crate::model::cg::{checked_total, CgGapDistributions, GapDistribution, GapKind};

/// Transition and emission probabilities in linear form.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionProbabilities {
    pub matching: f64,
    pub mismatch: f64,
    pub delete_open: f64,
    pub delete_extend: f64,
    pub insert_open: f64,
    pub insert_extend: f64,
}

impl TransitionProbabilities {
    fn validate(&self) -> Result<()> {
        let named = [
            ("match", self.matching),
            ("mismatch", self.mismatch),
            ("delete open", self.delete_open),
            ("delete extend", self.delete_extend),
            ("insert open", self.insert_open),
            ("insert extend", self.insert_extend),
        ];
        for (name, p) in named {
            if !p.is_finite() || !(0.0..=1.0).contains(&p) {
                return Err(AllPathsError::config(format!(
                    "{} rate {} is not a probability",
                    name, p
                )));
            }
        }
        if self.matching + self.mismatch <= 0.0 {
            return Err(AllPathsError::config("match and mismatch rates are both zero"));
        }
        if self.delete_open + self.insert_open >= 1.0 {
            return Err(AllPathsError::config(format!(
                "gap open rates sum to {} (delete {} + insert {})",
                self.delete_open + self.insert_open,
                self.delete_open,
                self.insert_open
            )));
        }
        if self.delete_extend >= 1.0 || self.insert_extend >= 1.0 {
            return Err(AllPathsError::config("gap extend rates must be below 1"));
        }
        Ok(())
    }
}

/// Calibrated per-base machine error rates for a read group.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ErrorRates {
    /// Substitution errors per base.
    pub mismatch_rate: f64,
    /// Insertion events per base.
    pub insert_event_rate: f64,
    /// Inserted bases per base.
    pub insert_base_rate: f64,
    /// Deletion events per base.
    pub delete_event_rate: f64,
    /// Deleted bases per base.
    pub delete_base_rate: f64,
}

impl ErrorRates {
    pub fn to_transitions(&self) -> Result<TransitionProbabilities> {
        let insert_extend = extend_probability("insert", self.insert_event_rate, self.insert_base_rate)?;
        let delete_extend = extend_probability("delete", self.delete_event_rate, self.delete_base_rate)?;
        let probs = TransitionProbabilities {
            matching: 1.0 - self.mismatch_rate,
            mismatch: self.mismatch_rate,
            delete_open: self.delete_event_rate,
            delete_extend,
            insert_open: self.insert_event_rate,
            insert_extend,
        };
        probs.validate()?;
        Ok(probs)
    }
}

impl Default for ErrorRates {
    fn default() -> Self {
        Self {
            mismatch_rate: 0.01,
            insert_event_rate: 2e-4,
            insert_base_rate: 3e-4,
            delete_event_rate: 2e-4,
            delete_base_rate: 3e-4,
        }
    }
}

fn extend_probability(name: &str, event_rate: f64, base_rate: f64) -> Result<f64> {
    if !event_rate.is_finite() || !base_rate.is_finite() || event_rate < 0.0 || base_rate < 0.0 {
        return Err(AllPathsError::config(format!(
            "{} rates must be finite and non-negative (events {}, bases {})",
            name, event_rate, base_rate
        )));
    }
    if event_rate == 0.0 {
        return Ok(0.0);
    }
    if base_rate < event_rate {
        return Err(AllPathsError::config(format!(
            "{} base rate {} is below its event rate {}",
            name, base_rate, event_rate
        )));
    }
    Ok(1.0 - event_rate / base_rate)
}

/// Calibration histograms of CG gap lengths. Index 0 of each histogram is the
/// shortest length of that gap type.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapHistograms {
    /// Reads that contributed to the histograms.
    pub total_reads: u64,
    pub overlap: Vec<u64>,
    pub small_gap: Vec<u64>,
    pub gap: Vec<u64>,
}

impl GapHistograms {
    fn counts(&self, kind: GapKind) -> &[u64] {
        match kind {
            GapKind::Overlap => &self.overlap,
            GapKind::SmallGap => &self.small_gap,
            GapKind::Gap => &self.gap,
        }
    }

    /// Check lengths and totals against the fixed CG gap ranges.
    pub fn validate(&self) -> Result<()> {
        for kind in [GapKind::Overlap, GapKind::SmallGap, GapKind::Gap] {
            let counts = self.counts(kind);
            if counts.len() > kind.range_len() {
                return Err(AllPathsError::config(format!(
                    "{} histogram has {} entries but only {} lengths are possible",
                    kind.name(),
                    counts.len(),
                    kind.range_len()
                )));
            }
            let reads = checked_total(kind, counts)?;
            if reads > self.total_reads {
                let label = match kind {
                    GapKind::SmallGap => "short-gap",
                    GapKind::Gap => "gap",
                    GapKind::Overlap => "overlap",
                };
                return Err(AllPathsError::config(format!(
                    "more {} reads ({}) than total reads ({})",
                    label, reads, self.total_reads
                )));
            }
        }
        Ok(())
    }

    /// Distributions from calibration, each falling back to its default when
    /// the histogram for that gap type holds no counts.
    pub fn to_distributions(&self) -> Result<CgGapDistributions> {
        self.validate()?;
        let pick = |kind: GapKind| -> Result<GapDistribution> {
            match GapDistribution::from_counts(kind, self.counts(kind))? {
                Some(d) => Ok(d),
                None => {
                    tracing::debug!(gap = kind.name(), "no calibration counts, using default distribution");
                    Ok(GapDistribution::default_for(kind))
                }
            }
        };
        Ok(CgGapDistributions {
            overlap: pick(GapKind::Overlap)?,
            small_gap: pick(GapKind::SmallGap)?,
            gap: pick(GapKind::Gap)?,
        })
    }
}

/// Transition parameters for one read group, in natural-log form.
#[derive(Clone, Debug, PartialEq)]
pub struct RealignParams {
    machine: MachineType,
    match_ln: f64,
    mismatch_ln: f64,
    delete_open_ln: f64,
    delete_extend_ln: f64,
    insert_open_ln: f64,
    insert_extend_ln: f64,
    cg_gaps: Option<CgGapDistributions>,
}

impl RealignParams {
    /// Build from linear probabilities. Gapped machine types get the default
    /// gap distributions; use [`RealignParams::with_cg_gaps`] to replace them.
    pub fn new(machine: MachineType, probs: TransitionProbabilities) -> Result<Self> {
        probs.validate()?;
        Ok(Self {
            machine,
            match_ln: probs.matching.ln(),
            mismatch_ln: probs.mismatch.ln(),
            delete_open_ln: probs.delete_open.ln(),
            delete_extend_ln: probs.delete_extend.ln(),
            insert_open_ln: probs.insert_open.ln(),
            insert_extend_ln: probs.insert_extend.ln(),
            cg_gaps: machine.is_gapped().then(CgGapDistributions::defaults),
        })
    }

    pub fn from_error_rates(machine: MachineType, rates: &ErrorRates) -> Result<Self> {
        Self::new(machine, rates.to_transitions()?)
    }

    pub fn with_cg_gaps(mut self, gaps: CgGapDistributions) -> Result<Self> {
        if !self.machine.is_gapped() {
            return Err(AllPathsError::config(format!(
                "machine type {} has no machine gaps",
                self.machine.as_str()
            )));
        }
        self.cg_gaps = Some(gaps);
        Ok(self)
    }

    pub fn machine_type(&self) -> MachineType {
        self.machine
    }

    pub fn match_ln(&self) -> f64 {
        self.match_ln
    }

    pub fn mismatch_ln(&self) -> f64 {
        self.mismatch_ln
    }

    pub fn delete_open_ln(&self) -> f64 {
        self.delete_open_ln
    }

    pub fn delete_extend_ln(&self) -> f64 {
        self.delete_extend_ln
    }

    pub fn insert_open_ln(&self) -> f64 {
        self.insert_open_ln
    }

    pub fn insert_extend_ln(&self) -> f64 {
        self.insert_extend_ln
    }

    pub fn cg_gaps(&self) -> Option<&CgGapDistributions> {
        self.cg_gaps.as_ref()
    }

    pub fn overlap_distribution(&self) -> Option<&GapDistribution> {
        self.cg_gaps.as_ref().map(|g| &g.overlap)
    }

    pub fn small_gap_distribution(&self) -> Option<&GapDistribution> {
        self.cg_gaps.as_ref().map(|g| &g.small_gap)
    }

    pub fn gap_distribution(&self) -> Option<&GapDistribution> {
        self.cg_gaps.as_ref().map(|g| &g.gap)
    }
}

/// Builds [`RealignParams`] from calibration outputs.
#[derive(Clone, Debug, Default)]
pub struct RealignParamsBuilder {
    machine: MachineType,
    rates: Option<ErrorRates>,
    histograms: Option<GapHistograms>,
    force_default_gaps: bool,
}

impl RealignParamsBuilder {
    pub fn new(machine: MachineType) -> Self {
        Self {
            machine,
            ..Self::default()
        }
    }

    /// Machine type, calibration and default-gap policy from the scoring
    /// configuration.
    pub fn from_config(config: &ScoringConfig) -> Self {
        Self {
            machine: config.machine,
            rates: Some(config.error_rates),
            histograms: config.gap_histograms.clone(),
            force_default_gaps: config.force_default_cg_gaps,
        }
    }

    pub fn error_rates(mut self, rates: ErrorRates) -> Self {
        self.rates = Some(rates);
        self
    }

    pub fn gap_histograms(mut self, histograms: GapHistograms) -> Self {
        self.histograms = Some(histograms);
        self
    }

    /// Use the fixed default gap distributions even when calibration
    /// histograms are available. Histograms are still validated.
    pub fn force_default_gaps(mut self, force: bool) -> Self {
        self.force_default_gaps = force;
        self
    }

    pub fn build(self) -> Result<RealignParams> {
        let rates = self
            .rates
            .ok_or_else(|| AllPathsError::config("no calibrated error rates supplied"))?;
        let params = RealignParams::from_error_rates(self.machine, &rates)?;

        if !self.machine.is_gapped() {
            if self.histograms.is_some() {
                tracing::debug!(machine = self.machine.as_str(), "ignoring gap histograms for ungapped machine");
            }
            return Ok(params);
        }

        let calibrated = self
            .histograms
            .as_ref()
            .map(GapHistograms::to_distributions)
            .transpose()?;
        let gaps = match calibrated {
            Some(_) if self.force_default_gaps => {
                tracing::debug!("default CG gap distributions forced over calibration");
                CgGapDistributions::defaults()
            }
            Some(gaps) => gaps,
            None => {
                tracing::debug!("no CG gap calibration, using default distributions");
                CgGapDistributions::defaults()
            }
        };
        params.with_cg_gaps(gaps)
    }
}
