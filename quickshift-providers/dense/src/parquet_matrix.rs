//! Parquet and Arrow ingestion of `FixedSizeList<Float32, D>` columns.
use std::{fs::File, path::Path, sync::Arc};

use arrow_array::{Array, FixedSizeListArray, RecordBatch, RecordBatchReader};
use arrow_schema::SchemaRef;
use parquet::{
    arrow::{ProjectionMask, arrow_reader::ParquetRecordBatchReaderBuilder},
    file::reader::ChunkReader,
};
use quickshift_core::Dataset;

use crate::{
    errors::DenseIngestError,
    ingest::{MatrixBuffer, list_dimension},
};

/// Loads a dataset from an in-memory Arrow [`FixedSizeListArray`].
///
/// # Errors
/// Returns [`DenseIngestError`] when the array holds nulls or non-`Float32`
/// values, or when the resulting points fail dataset validation.
pub fn dataset_from_fixed_size_list(
    name: impl Into<Arc<str>>,
    array: &FixedSizeListArray,
) -> Result<Dataset, DenseIngestError> {
    let mut buffer = MatrixBuffer::default();
    buffer.append(array)?;
    buffer.into_dataset(name)
}

/// Loads a dataset from `column` of consecutive record batches.
///
/// # Errors
/// Returns [`DenseIngestError::ColumnNotFound`] when a batch lacks the
/// column and [`DenseIngestError::InconsistentBatchDimension`] when batches
/// disagree on the list width.
pub fn dataset_from_record_batches<I>(
    name: impl Into<Arc<str>>,
    column: &str,
    batches: I,
) -> Result<Dataset, DenseIngestError>
where
    I: IntoIterator<Item = RecordBatch>,
{
    let mut buffer = MatrixBuffer::default();
    for batch in batches {
        let index = column_index(&batch.schema(), column)?;
        append_column(&mut buffer, &batch, index, column)?;
    }
    buffer.into_dataset(name)
}

/// Loads a dataset from a Parquet file on disk.
///
/// # Errors
/// Returns [`DenseIngestError::Io`] when the file cannot be opened, plus the
/// errors of [`load_parquet_reader`].
pub fn load_parquet_path(
    name: impl Into<Arc<str>>,
    path: impl AsRef<Path>,
    column: &str,
) -> Result<Dataset, DenseIngestError> {
    let file = File::open(path)?;
    load_parquet_reader(name, file, column)
}

/// Loads a dataset from any Parquet [`ChunkReader`], projecting only
/// `column`.
///
/// # Errors
/// Returns [`DenseIngestError`] when the column is missing, is not a
/// non-nullable `FixedSizeList<Float32, D>`, or contains nulls.
pub fn load_parquet_reader<R>(
    name: impl Into<Arc<str>>,
    reader: R,
    column: &str,
) -> Result<Dataset, DenseIngestError>
where
    R: ChunkReader + 'static,
{
    let builder = ParquetRecordBatchReaderBuilder::try_new(reader)?;
    let mask = ProjectionMask::columns(builder.parquet_schema(), [column]);
    let batches = builder.with_projection(mask).build()?;
    let schema = batches.schema();
    let index = column_index(&schema, column)?;
    list_dimension(schema.field(index), column)?;

    let mut buffer = MatrixBuffer::default();
    for batch in batches {
        append_column(&mut buffer, &batch?, index, column)?;
    }
    buffer.into_dataset(name)
}

fn column_index(schema: &SchemaRef, column: &str) -> Result<usize, DenseIngestError> {
    schema
        .index_of(column)
        .map_err(|_| DenseIngestError::ColumnNotFound {
            column: column.to_owned(),
        })
}

fn append_column(
    buffer: &mut MatrixBuffer,
    batch: &RecordBatch,
    index: usize,
    column: &str,
) -> Result<(), DenseIngestError> {
    list_dimension(batch.schema().field(index), column)?;
    let array = batch.column(index);
    let list = array
        .as_any()
        .downcast_ref::<FixedSizeListArray>()
        .ok_or_else(|| DenseIngestError::InvalidColumnType {
            column: column.to_owned(),
            actual: array.data_type().clone(),
        })?;
    buffer.append(list)
}
