//! # Scoring Metrics
//!
//! Work counters for the all-paths engine. Each engine owns a plain
//! [`ScoreMetrics`] and bumps it without synchronization; pools fold those
//! into a shared [`MetricsBlackboard`] whose atomic counters are cheap to
//! update from rayon workers.

use std::fmt;
use std::ops::AddAssign;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Counters accumulated by one engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScoreMetrics {
    /// Environments scored.
    pub environments: u64,
    /// DP rows computed, excluding the seed row.
    pub rows: u64,
    /// Band cells computed.
    pub cells: u64,
    /// Rows computed with the machine-gap recurrence.
    pub gap_rows: u64,
    /// Times the matrices had to grow.
    pub resizes: u64,
}

impl ScoreMetrics {
    pub fn merge(&mut self, other: &ScoreMetrics) {
        self.environments += other.environments;
        self.rows += other.rows;
        self.cells += other.cells;
        self.gap_rows += other.gap_rows;
        self.resizes += other.resizes;
    }

    pub fn is_empty(&self) -> bool {
        *self == ScoreMetrics::default()
    }
}

impl AddAssign for ScoreMetrics {
    fn add_assign(&mut self, rhs: ScoreMetrics) {
        self.merge(&rhs);
    }
}

impl fmt::Display for ScoreMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "environments={} rows={} cells={} gap_rows={} resizes={}",
            self.environments, self.rows, self.cells, self.gap_rows, self.resizes
        )
    }
}

/// Shared counters for a pool of engines.
///
/// All fields use relaxed ordering; readers only need eventual totals.
pub struct MetricsBlackboard {
    environments: AtomicU64,
    rows: AtomicU64,
    cells: AtomicU64,
    gap_rows: AtomicU64,
    resizes: AtomicU64,
    start_time: Instant,
}

impl MetricsBlackboard {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Add one engine's counters.
    #[inline]
    pub fn absorb(&self, metrics: &ScoreMetrics) {
        self.environments.fetch_add(metrics.environments, Ordering::Relaxed);
        self.rows.fetch_add(metrics.rows, Ordering::Relaxed);
        self.cells.fetch_add(metrics.cells, Ordering::Relaxed);
        self.gap_rows.fetch_add(metrics.gap_rows, Ordering::Relaxed);
        self.resizes.fetch_add(metrics.resizes, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ScoreMetrics {
        ScoreMetrics {
            environments: self.environments.load(Ordering::Relaxed),
            rows: self.rows.load(Ordering::Relaxed),
            cells: self.cells.load(Ordering::Relaxed),
            gap_rows: self.gap_rows.load(Ordering::Relaxed),
            resizes: self.resizes.load(Ordering::Relaxed),
        }
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }

    /// Cells per second since the blackboard was created.
    pub fn cell_rate(&self) -> f64 {
        let secs = self.elapsed_secs();
        if secs > 0.0 {
            self.cells.load(Ordering::Relaxed) as f64 / secs
        } else {
            0.0
        }
    }
}

impl Default for MetricsBlackboard {
    fn default() -> Self {
        Self {
            environments: AtomicU64::new(0),
            rows: AtomicU64::new(0),
            cells: AtomicU64::new(0),
            gap_rows: AtomicU64::new(0),
            resizes: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }
}

impl fmt::Debug for MetricsBlackboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetricsBlackboard")
            .field("metrics", &self.snapshot())
            .finish()
    }
}
