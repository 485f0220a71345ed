//! # Scoring Configuration
//!
//! Settings for a scoring run, loaded from JSON. Every field has a default,
//! so an empty document `{}` is a valid configuration.
//!
//! ```json
//! {
//!   "arithmetic": "log",
//!   "machine": "complete_genomics",
//!   "max_shift": 7,
//!   "force_default_cg_gaps": false,
//!   "threads": 8,
//!   "error_rates": {
//!     "mismatch_rate": 0.01,
//!     "insert_event_rate": 0.0002,
//!     "insert_base_rate": 0.0003,
//!     "delete_event_rate": 0.0002,
//!     "delete_base_rate": 0.0003
//!   },
//!   "gap_histograms": { "total_reads": 1000, "overlap": [], "small_gap": [], "gap": [] }
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::MachineType;
use crate::error::{AllPathsError, Result};
use crate::model::arithmetic::ArithmeticKind;
use crate::model::parameters::{ErrorRates, GapHistograms, RealignParams, RealignParamsBuilder};

/// Default band radius.
pub const DEFAULT_MAX_SHIFT: usize = 7;

/// Largest band radius accepted from configuration.
pub const MAX_SHIFT_LIMIT: usize = 1024;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringConfig {
    pub arithmetic: ArithmeticKind,
    pub machine: MachineType,
    /// Band radius for reads scored against the reference.
    pub max_shift: usize,
    /// Use the fixed CG gap distributions even when calibration exists.
    pub force_default_cg_gaps: bool,
    /// Worker threads; all cores when unset.
    pub threads: Option<usize>,
    pub error_rates: ErrorRates,
    pub gap_histograms: Option<GapHistograms>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            arithmetic: ArithmeticKind::default(),
            machine: MachineType::default(),
            max_shift: DEFAULT_MAX_SHIFT,
            force_default_cg_gaps: false,
            threads: None,
            error_rates: ErrorRates::default(),
            gap_histograms: None,
        }
    }
}

impl ScoringConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(AllPathsError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&text)?;
        tracing::debug!(path = %path.display(), ?config, "loaded scoring configuration");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_shift > MAX_SHIFT_LIMIT {
            return Err(AllPathsError::config(format!(
                "max_shift {} exceeds the limit of {}",
                self.max_shift, MAX_SHIFT_LIMIT
            )));
        }
        if self.threads == Some(0) {
            return Err(AllPathsError::config("threads must be at least 1"));
        }
        Ok(())
    }

    /// Worker thread count.
    pub fn nthreads(&self) -> usize {
        self.threads.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }

    /// Realignment parameters for the configured read group.
    pub fn realign_params(&self) -> Result<RealignParams> {
        RealignParamsBuilder::from_config(self).build()
    }
}
