//! # Utilities Module
//!
//! ## Role
//! Cross-cutting helpers that don't belong in the model.
//!
//! ## Sub-modules
//! - `threading`: Rayon thread pools and per-thread scorer pools
//! - `telemetry`: Work counters for engines and pools
//! - `workspace`: Pre-allocated DP matrices reused across reads

pub mod telemetry;
pub mod threading;
pub mod workspace;
