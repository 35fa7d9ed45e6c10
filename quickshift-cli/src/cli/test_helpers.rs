//! Temporary inputs shared by the CLI tests.

use std::fmt::Write as _;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use arrow_array::{ArrayRef, FixedSizeListArray, Float32Array, RecordBatch};
use arrow_schema::{DataType, Field, Schema};
use parquet::arrow::arrow_writer::ArrowWriter;
use tempfile::TempDir;

use super::{CliError, RunCommand, commands::run_command};

pub(super) type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Two 3x3 unit grids centred on `(0, 0)` and `(100, 100)`; within four
/// neighbours each grid has its centre as the only density mode.
pub(super) fn two_grids() -> Vec<[f32; 2]> {
    [(0.0, 0.0), (100.0, 100.0)]
        .into_iter()
        .flat_map(|(cx, cy)| {
            [-1.0_f32, 0.0, 1.0]
                .into_iter()
                .flat_map(move |dy| [-1.0_f32, 0.0, 1.0].map(|dx| [cx + dx, cy + dy]))
        })
        .collect()
}

pub(super) fn temp_dir() -> TempDir {
    match TempDir::new() {
        Ok(dir) => dir,
        Err(err) => panic!("failed to create temp dir: {err}"),
    }
}

pub(super) fn write_text_matrix(dir: &TempDir, name: &str, points: &[[f32; 2]]) -> PathBuf {
    let text = points.iter().fold(String::new(), |mut text, [x, y]| {
        let _ = writeln!(text, "{x} {y}");
        text
    });
    write_file(dir, name, &text)
}

pub(super) fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).expect("write fixture");
    path
}

/// Writes `points` to a Parquet file as a `features: FixedSizeList<Float32, 2>`
/// column.
pub(super) fn write_parquet(
    dir: &TempDir,
    name: &str,
    points: &[[f32; 2]],
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let item = Arc::new(Field::new("item", DataType::Float32, false));
    let schema = Arc::new(Schema::new(vec![Field::new(
        "features",
        DataType::FixedSizeList(item.clone(), 2),
        false,
    )]));
    let values = Float32Array::from_iter_values(points.iter().flatten().copied());
    let list = FixedSizeListArray::new(item, 2, Arc::new(values) as ArrayRef, None);
    let batch = RecordBatch::try_new(schema.clone(), vec![Arc::new(list) as ArrayRef])?;

    let path = dir.path().join(name);
    let mut writer = ArrowWriter::try_new(File::create(&path)?, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(path)
}

pub(super) fn run_command_expecting_error(command: RunCommand, panic_msg: &str) -> CliError {
    match run_command(command) {
        Ok(_) => panic!("{panic_msg}"),
        Err(err) => err,
    }
}
