//! Benchmark support crate for QuickShift.
//!
//! Provides the synthetic datasets and parameter labels used by the Criterion
//! benchmarks comparing exact and sampled clustering.

pub mod error;
pub mod params;
pub mod source;
