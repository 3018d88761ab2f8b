//! CSV parsing and serialization for batch files.

use thiserror::Error;

use crate::batch::{OutputRow, ProductRow};

/// Errors reading or writing a batch CSV.
#[derive(Debug, Error)]
pub enum BatchCsvError {
    #[error("CSV parse failed: {0}")]
    Parse(#[from] csv::Error),

    #[error("CSV write failed: {0}")]
    Write(String),
}

/// Parse a full batch file into rows.
///
/// Expects a header row with the input columns. Column presence and per-row
/// well-formedness are enforced upstream by the upload gate; a malformed
/// file reaching this point is a pipeline-scoped failure.
pub fn parse_batch(bytes: &[u8]) -> Result<Vec<ProductRow>, BatchCsvError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for result in reader.deserialize::<ProductRow>() {
        rows.push(result?);
    }
    Ok(rows)
}

/// Serialize the augmented row set, header row included.
pub fn write_batch(rows: &[OutputRow]) -> Result<Vec<u8>, BatchCsvError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| BatchCsvError::Write(e.to_string()))
}
