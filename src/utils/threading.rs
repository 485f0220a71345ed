//! # Threading
//!
//! Parallel scoring with one engine per worker thread.
//!
//! Engines own large matrices and are mutated by every scoring call, so they
//! are never shared. [`ScorerPool`] hands each rayon worker its own engine
//! through `thread_local::ThreadLocal`, created lazily on first use and then
//! reused for every environment that thread scores.

use std::cell::RefCell;
use std::sync::Arc;

use rayon::prelude::*;
use thread_local::ThreadLocal;
use tracing::info_span;

use crate::config::ScoringConfig;
use crate::error::{AllPathsError, Result};
use crate::model::all_paths::AllPathsScorer;
use crate::model::arithmetic::{ArithmeticKind, LogPossibility, SimplePossibility};
use crate::model::environment::Environment;
use crate::model::parameters::RealignParams;
use crate::utils::telemetry::{MetricsBlackboard, ScoreMetrics};

/// Create a configured thread pool.
pub fn build_thread_pool(n_threads: usize) -> Result<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(n_threads)
        .thread_name(|i| format!("allpaths-worker-{}", i))
        .build()
        .map_err(|e| AllPathsError::config(format!("Failed to create thread pool: {}", e)))
}

/// An engine whose arithmetic is chosen at runtime.
#[derive(Clone, Debug)]
pub enum DynScorer {
    Simple(AllPathsScorer<SimplePossibility>),
    Log(AllPathsScorer<LogPossibility>),
}

impl DynScorer {
    pub fn new(kind: ArithmeticKind, params: &RealignParams) -> Self {
        match kind {
            ArithmeticKind::Simple => DynScorer::Simple(AllPathsScorer::new(SimplePossibility, params)),
            ArithmeticKind::Log => DynScorer::Log(AllPathsScorer::new(LogPossibility, params)),
        }
    }

    pub fn kind(&self) -> ArithmeticKind {
        match self {
            DynScorer::Simple(_) => ArithmeticKind::Simple,
            DynScorer::Log(_) => ArithmeticKind::Log,
        }
    }

    /// Score `env` and return the natural-log all-paths score.
    pub fn score<E: Environment + ?Sized>(&mut self, env: &E) -> Result<f64> {
        match self {
            DynScorer::Simple(s) => {
                s.set_environment(env)?;
                Ok(s.total_score_ln())
            }
            DynScorer::Log(s) => {
                s.set_environment(env)?;
                Ok(s.total_score_ln())
            }
        }
    }

    pub fn take_metrics(&mut self) -> ScoreMetrics {
        match self {
            DynScorer::Simple(s) => s.take_metrics(),
            DynScorer::Log(s) => s.take_metrics(),
        }
    }
}

/// Per-thread engines for one read group and arithmetic.
pub struct ScorerPool {
    kind: ArithmeticKind,
    params: RealignParams,
    scorers: ThreadLocal<RefCell<DynScorer>>,
    blackboard: Arc<MetricsBlackboard>,
}

impl ScorerPool {
    pub fn new(kind: ArithmeticKind, params: RealignParams) -> Self {
        Self {
            kind,
            params,
            scorers: ThreadLocal::new(),
            blackboard: MetricsBlackboard::new(),
        }
    }

    pub fn from_config(config: &ScoringConfig) -> Result<Self> {
        Ok(Self::new(config.arithmetic, config.realign_params()?))
    }

    pub fn kind(&self) -> ArithmeticKind {
        self.kind
    }

    pub fn params(&self) -> &RealignParams {
        &self.params
    }

    /// Score on the calling thread's engine.
    pub fn score<E: Environment + ?Sized>(&self, env: &E) -> Result<f64> {
        let cell = self
            .scorers
            .get_or(|| RefCell::new(DynScorer::new(self.kind, &self.params)));
        let mut scorer = cell.borrow_mut();
        let result = scorer.score(env);
        self.blackboard.absorb(&scorer.take_metrics());
        result
    }

    /// Score every environment in parallel on the current rayon pool. Scores
    /// come back in input order; the first internal fault aborts the batch.
    pub fn score_batch<E: Environment + Sync>(&self, envs: &[E]) -> Result<Vec<f64>> {
        let _span = info_span!("score_batch", environments = envs.len(), arithmetic = ?self.kind).entered();
        let scores = envs.par_iter().map(|env| self.score(env)).collect::<Result<Vec<_>>>()?;
        tracing::debug!(
            elapsed_secs = self.blackboard.elapsed_secs(),
            cells_per_sec = self.blackboard.cell_rate(),
            "scored batch"
        );
        Ok(scores)
    }

    /// Totals across every thread's engine.
    pub fn metrics(&self) -> ScoreMetrics {
        self.blackboard.snapshot()
    }
}
