use arrow_schema::{ArrowError, DataType};
use quickshift_core::DatasetError;
use thiserror::Error;

/// Errors raised while loading or generating dense points.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DenseIngestError {
    #[error("column `{column}` not found in Parquet schema")]
    ColumnNotFound { column: String },
    #[error("column `{column}` must be a FixedSizeList<Float32, _> but found {actual:?}")]
    InvalidColumnType { column: String, actual: DataType },
    #[error("FixedSizeList child type must be Float32 but found {actual:?}")]
    InvalidListValueType { actual: DataType },
    #[error("invalid FixedSizeList dimension {actual}")]
    InvalidDimension { actual: i32 },
    #[error("column `{column}` is nullable (child nullable: {nullable_child})")]
    NullableField { column: String, nullable_child: bool },
    #[error("row {row} is null")]
    NullRow { row: usize },
    #[error("row {row} contains null value at position {value_index}")]
    NullValue { row: usize, value_index: usize },
    #[error("inconsistent dimensions across batches: expected {expected}, got {actual}")]
    InconsistentBatchDimension { expected: usize, actual: usize },
    #[error("matrix with {rows} rows and dimension {dimension} exceeds capacity limits")]
    CapacityOverflow { rows: usize, dimension: usize },
    /// A text token was not a number.
    #[error("line {line}: `{token}` is not a number")]
    InvalidNumber { line: usize, token: String },
    /// A text line held a different number of coordinates than the first.
    #[error("line {line} has {actual} values but expected {expected}")]
    RaggedLine {
        line: usize,
        expected: usize,
        actual: usize,
    },
    /// Blob spread must be finite and non-negative.
    #[error("blob standard deviation {std_dev} must be finite and non-negative")]
    InvalidStdDev { std_dev: f32 },
    #[error("invalid dataset: {0}")]
    Dataset(#[from] DatasetError),
    #[error("arrow error: {0}")]
    Arrow(#[from] ArrowError),
    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
