//! Benchmark setup error type.
//!
//! Lets setup functions propagate failures with `?` instead of `.expect()`.

use quickshift_core::{DatasetError, QuickShiftError};
use quickshift_providers_dense::DenseIngestError;

/// Errors that may occur during benchmark setup.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// Blob generation failed.
    #[error("blob generation failed: {0}")]
    Blobs(#[from] DenseIngestError),
    /// A generated dataset failed validation.
    #[error("dataset construction failed: {0}")]
    Dataset(#[from] DatasetError),
    /// Configuring or running QuickShift failed.
    #[error("clustering failed: {0}")]
    Clustering(#[from] QuickShiftError),
    /// A zero value was passed where a non-zero integer was required.
    #[error("expected a non-zero value for {context}")]
    ZeroValue {
        /// The parameter that was unexpectedly zero.
        context: &'static str,
    },
}
