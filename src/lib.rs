//! # Allpaths Library Root
//!
//! ## Role
//! Banded all-paths pairwise alignment scoring: the probability that a
//! sequenced read was generated from a candidate template, summed over every
//! alignment inside a band around the mapped position.
//!
//! ## Module Structure
//! ```text
//! allpaths
//! ├── config      # JSON scoring configuration
//! ├── data        # Bases, mapped reads, machine types
//! ├── model       # Arithmetic, environments, parameters, DP engine
//! ├── pipelines   # Hypothesis evidence over many reads
//! └── utils       # Thread pools, metrics, reusable matrices
//! ```
//!
//! ## Example
//! ```rust
//! use allpaths::{encode, AllPathsScorer, ErrorRates, LogPossibility, MachineType, ReadEnvironment, RealignParams};
//!
//! let params = RealignParams::from_error_rates(MachineType::Illumina, &ErrorRates::default())?;
//! let read = encode(b"ACGTACGT")?;
//! let template = encode(b"TTACGTACGTTT")?;
//! let env = ReadEnvironment::new(&read, vec![0.01; read.len()], &template, 2, 3)?;
//!
//! let mut scorer = AllPathsScorer::new(LogPossibility, &params);
//! scorer.set_environment(&env)?;
//! assert!(scorer.total_score_ln() < 0.0);
//! # Ok::<(), allpaths::AllPathsError>(())
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod model;
pub mod pipelines;
pub mod utils;

pub use config::ScoringConfig;
pub use data::{decode, encode, Base, MachineType, MappedRead};
pub use error::{AllPathsError, Result};
pub use model::all_paths::AllPathsScorer;
pub use model::arithmetic::{ArithmeticKind, LogPossibility, PossibilityArithmetic, SimplePossibility};
pub use model::cg::{CgGapDistributions, CgLayout, GapDistribution, GapKind};
pub use model::combined::{CombinedEnvironment, HypothesisTemplate};
pub use model::environment::{Environment, ReadEnvironment};
pub use model::inverted::InvertedGapEnvironment;
pub use model::parameters::{ErrorRates, GapHistograms, RealignParams, RealignParamsBuilder, TransitionProbabilities};
pub use pipelines::evidence::{EvidenceScorer, ReadEvidence, Region};
pub use utils::telemetry::{MetricsBlackboard, ScoreMetrics};
pub use utils::threading::{build_thread_pool, DynScorer, ScorerPool};
