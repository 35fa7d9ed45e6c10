//! Shared test utilities used across the QuickShift crates.

pub mod ci;
pub mod tracing;
