//! Accumulates Arrow fixed-size list batches into one row-major buffer.
use std::sync::Arc;

use arrow_array::{Array, FixedSizeListArray, Float32Array};
use arrow_schema::{DataType, Field};
use quickshift_core::Dataset;

use crate::errors::DenseIngestError;

/// Checks that a schema field is a non-nullable `FixedSizeList<Float32, D>`
/// and returns `D`.
pub(crate) fn list_dimension(field: &Field, column: &str) -> Result<usize, DenseIngestError> {
    let DataType::FixedSizeList(child, width) = field.data_type() else {
        return Err(DenseIngestError::InvalidColumnType {
            column: column.to_owned(),
            actual: field.data_type().clone(),
        });
    };
    if field.is_nullable() || child.is_nullable() {
        return Err(DenseIngestError::NullableField {
            column: column.to_owned(),
            nullable_child: child.is_nullable(),
        });
    }
    if child.data_type() != &DataType::Float32 {
        return Err(DenseIngestError::InvalidListValueType {
            actual: child.data_type().clone(),
        });
    }
    usize::try_from(*width).map_err(|_| DenseIngestError::InvalidDimension { actual: *width })
}

/// Row-major values gathered from successive list arrays.
#[derive(Debug, Default)]
pub(crate) struct MatrixBuffer {
    rows: usize,
    dimension: Option<usize>,
    values: Vec<f32>,
}

impl MatrixBuffer {
    /// Appends every row of `array`, rejecting nulls and dimension changes.
    pub(crate) fn append(&mut self, array: &FixedSizeListArray) -> Result<(), DenseIngestError> {
        let value_type = array.value_type();
        if value_type != DataType::Float32 {
            return Err(DenseIngestError::InvalidListValueType { actual: value_type });
        }
        let width = array.value_length();
        let dimension =
            usize::try_from(width).map_err(|_| DenseIngestError::InvalidDimension { actual: width })?;
        match self.dimension {
            Some(expected) if expected != dimension => {
                return Err(DenseIngestError::InconsistentBatchDimension {
                    expected,
                    actual: dimension,
                });
            }
            Some(_) => {}
            None => self.dimension = Some(dimension),
        }

        let rows = array.len();
        let additional = rows
            .checked_mul(dimension)
            .ok_or(DenseIngestError::CapacityOverflow { rows, dimension })?;
        self.values.reserve(additional);
        for offset in 0..rows {
            let row = self.rows + offset;
            if array.is_null(offset) {
                return Err(DenseIngestError::NullRow { row });
            }
            let list = array.value(offset);
            let floats = list.as_any().downcast_ref::<Float32Array>().ok_or_else(|| {
                DenseIngestError::InvalidListValueType {
                    actual: list.data_type().clone(),
                }
            })?;
            if let Some(value_index) = (0..floats.len()).find(|&index| floats.is_null(index)) {
                return Err(DenseIngestError::NullValue { row, value_index });
            }
            self.values.extend_from_slice(floats.values());
        }
        self.rows += rows;
        Ok(())
    }

    /// Validates the collected values as a [`Dataset`].
    pub(crate) fn into_dataset(self, name: impl Into<Arc<str>>) -> Result<Dataset, DenseIngestError> {
        let dimension = self.dimension.unwrap_or_default();
        Ok(Dataset::from_flat(name, self.rows, dimension, self.values)?)
    }
}
