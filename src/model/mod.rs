//! # Model Module
//!
//! The all-paths alignment model and everything it is parameterized by.
//!
//! ## Core Pieces
//! - `arithmetic`: linear and log encodings of probabilities
//! - `environment`: read/template access for one scoring call
//! - `parameters`: read-group transition rates and calibration builder
//! - `cg`: Complete Genomics gap distributions and read layout
//! - `all_paths`: the banded forward recurrence
//! - `combined` / `inverted`: environments composed from other environments
//!
//! ## Why Sum Over Paths
//!
//! Scoring a read against competing hypotheses with only its best alignment
//! overstates confidence whenever several alignments are nearly as good, as
//! happens around homopolymers and short tandem repeats. Summing every banded
//! path gives the likelihood `P(read | hypothesis)` that downstream genotype
//! posteriors need.

pub mod all_paths;
pub mod arithmetic;
pub mod cg;
pub mod combined;
pub mod environment;
pub mod inverted;
pub mod parameters;
