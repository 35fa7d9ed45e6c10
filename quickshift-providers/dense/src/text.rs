//! Whitespace-separated text matrices: one point per line.
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
    sync::Arc,
};

use quickshift_core::Dataset;

use crate::errors::DenseIngestError;

/// Parses a text matrix from `reader`.
///
/// Each non-blank line holds one point as whitespace-separated numbers.
/// Lines starting with `#` are comments.
///
/// # Errors
/// Returns [`DenseIngestError::InvalidNumber`] for unparsable tokens,
/// [`DenseIngestError::RaggedLine`] when a line's width differs from the
/// first point's, and [`DenseIngestError::Dataset`] when no points were read
/// or a coordinate is not finite.
///
/// # Examples
/// ```
/// use quickshift_providers_dense::load_text_matrix;
///
/// let text = "# x y\n0 1\n2.5 -3\n\n";
/// let dataset = load_text_matrix("inline", text.as_bytes())?;
/// assert_eq!(dataset.len(), 2);
/// assert_eq!(dataset.row(1)?, &[2.5, -3.0]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn load_text_matrix<R: BufRead>(
    name: impl Into<Arc<str>>,
    reader: R,
) -> Result<Dataset, DenseIngestError> {
    let mut values = Vec::new();
    let mut rows = 0_usize;
    let mut dimension = None;

    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        let content = line.trim();
        if content.is_empty() || content.starts_with('#') {
            continue;
        }
        let before = values.len();
        for token in content.split_whitespace() {
            let value = token
                .parse::<f32>()
                .map_err(|_| DenseIngestError::InvalidNumber {
                    line: number + 1,
                    token: token.to_owned(),
                })?;
            values.push(value);
        }
        let width = values.len() - before;
        match dimension {
            None => dimension = Some(width),
            Some(expected) if expected != width => {
                return Err(DenseIngestError::RaggedLine {
                    line: number + 1,
                    expected,
                    actual: width,
                });
            }
            Some(_) => {}
        }
        rows += 1;
    }

    Ok(Dataset::from_flat(
        name,
        rows,
        dimension.unwrap_or_default(),
        values,
    )?)
}

/// Reads a text matrix from a file.
///
/// # Errors
/// Returns [`DenseIngestError::Io`] when the file cannot be read, plus the
/// errors of [`load_text_matrix`].
pub fn load_text_path(
    name: impl Into<Arc<str>>,
    path: impl AsRef<Path>,
) -> Result<Dataset, DenseIngestError> {
    let file = File::open(path)?;
    load_text_matrix(name, BufReader::new(file))
}
