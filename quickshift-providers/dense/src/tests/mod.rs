//! Tests covering dense ingestion and generation.

mod support;
