//! # Hypothesis Evidence
//!
//! Scores mapped reads against every candidate allele of one reference
//! region. Each (read, hypothesis) pair yields `ln P(read | hypothesis)`;
//! turning those into genotype posteriors is left to the caller.
//!
//! Complete Genomics reads mapped to the reverse strand have their machine
//! gaps at the right end in reference orientation and are mirrored into the
//! canonical layout before scoring.

use rayon::prelude::*;
use tracing::info_span;

use crate::config::ScoringConfig;
use crate::data::{Base, MappedRead};
use crate::error::Result;
use crate::model::cg::{CgGapDistributions, CgLayout};
use crate::model::combined::{CombinedEnvironment, HypothesisTemplate};
use crate::model::environment::ReadEnvironment;
use crate::model::inverted::InvertedGapEnvironment;
use crate::utils::threading::ScorerPool;
use crate::utils::telemetry::ScoreMetrics;

/// A reference window and the region within it that hypotheses replace.
#[derive(Clone, Copy, Debug)]
pub struct Region<'a> {
    pub reference: &'a [Base],
    pub replace_start: usize,
    pub replace_end: usize,
}

/// Per-read scores against each hypothesis, in hypothesis order.
#[derive(Clone, Debug, PartialEq)]
pub struct ReadEvidence {
    pub read_name: String,
    pub scores: Vec<f64>,
}

impl ReadEvidence {
    /// Index of the best-supported hypothesis; ties go to the first.
    pub fn best(&self) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (i, &s) in self.scores.iter().enumerate() {
            match best {
                Some(b) if self.scores[b] >= s => {}
                _ => best = Some(i),
            }
        }
        best
    }
}

pub struct EvidenceScorer {
    pool: ScorerPool,
    max_shift: usize,
    gaps: Option<CgGapDistributions>,
    layout: CgLayout,
}

impl EvidenceScorer {
    pub fn new(pool: ScorerPool, max_shift: usize) -> Self {
        let gaps = pool.params().cg_gaps().cloned();
        Self {
            pool,
            max_shift,
            gaps,
            layout: CgLayout::canonical(),
        }
    }

    pub fn from_config(config: &ScoringConfig) -> Result<Self> {
        Ok(Self::new(ScorerPool::from_config(config)?, config.max_shift))
    }

    /// Score one read against every hypothesis.
    pub fn score_read(&self, read: &MappedRead, region: &Region<'_>, hypotheses: &[Vec<Base>]) -> Result<ReadEvidence> {
        let scores = hypotheses
            .iter()
            .map(|hypothesis| {
                let read_env = ReadEnvironment::from_mapped_read(read, region.reference, self.max_shift)?;
                let template =
                    HypothesisTemplate::new(region.reference, region.replace_start, region.replace_end, hypothesis)?;
                let combined = CombinedEnvironment::new(read_env, template);
                match (&self.gaps, read.reverse) {
                    (Some(gaps), true) => {
                        let span = self.layout.expected_span(read.len(), gaps);
                        self.pool.score(&InvertedGapEnvironment::new(combined, span))
                    }
                    _ => self.pool.score(&combined),
                }
            })
            .collect::<Result<Vec<f64>>>()?;
        tracing::trace!(read = %read.name, ?scores, "scored read against hypotheses");
        Ok(ReadEvidence {
            read_name: read.name.clone(),
            scores,
        })
    }

    /// Score reads in parallel on the current rayon pool, in input order.
    pub fn score_reads(
        &self,
        reads: &[MappedRead],
        region: &Region<'_>,
        hypotheses: &[Vec<Base>],
    ) -> Result<Vec<ReadEvidence>> {
        let _span = info_span!(
            "score_reads",
            reads = reads.len(),
            hypotheses = hypotheses.len(),
            replace_start = region.replace_start,
            replace_end = region.replace_end
        )
        .entered();
        reads
            .par_iter()
            .map(|read| self.score_read(read, region, hypotheses))
            .collect()
    }

    pub fn metrics(&self) -> ScoreMetrics {
        self.pool.metrics()
    }
}
