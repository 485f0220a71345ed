//! # Pipelines Module
//!
//! ## Role
//! Orchestration on top of the model: building environments from mapped
//! reads and hypotheses and scoring them in parallel.
//!
//! ## Sub-modules
//! - `evidence`: per-read likelihoods for each candidate allele of a region

pub mod evidence;
