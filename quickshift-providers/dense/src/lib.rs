//! Dense `f32` point loaders and generators producing
//! [`quickshift_core::Dataset`] values.

mod blobs;
mod errors;
mod ingest;
mod parquet_matrix;
mod text;

pub use blobs::{GaussianBlobs, LabelledDataset};
pub use errors::DenseIngestError;
pub use parquet_matrix::{
    dataset_from_fixed_size_list, dataset_from_record_batches, load_parquet_path,
    load_parquet_reader,
};
pub use text::{load_text_matrix, load_text_path};

#[cfg(test)]
mod tests;
