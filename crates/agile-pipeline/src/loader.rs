//! Raw dataset loader.
//!
//! Parses an uploaded CSV byte stream (or a file path) into a DataFrame.
//! Business invariants — column presence, types, value ranges — are *not*
//! validated here; they surface downstream in the feature engineer and the
//! transform adapters, which own those contracts. No file handle or buffer
//! is retained after loading.

use crate::error::{EstimatorError, Result};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// How many rows the CSV reader inspects to infer column types.
const INFER_SCHEMA_ROWS: usize = 100;

/// Parse a CSV byte stream with a header row into a DataFrame.
///
/// # Errors
///
/// Returns [`EstimatorError::DatasetLoad`] if the bytes are not parseable
/// as delimited tabular text.
pub fn load_csv_bytes(bytes: &[u8]) -> Result<DataFrame> {
    let cursor = Cursor::new(bytes);

    let df = CsvReadOptions::default()
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .with_has_header(true)
        .into_reader_with_file_handle(cursor)
        .finish()
        .map_err(|e| EstimatorError::DatasetLoad(e.to_string()))?;

    debug!("Loaded dataset from bytes: {:?}", df.shape());
    Ok(df)
}

/// Read and parse a CSV file with a header row into a DataFrame.
///
/// # Errors
///
/// Returns [`EstimatorError::DatasetLoad`] if the file does not exist or
/// cannot be parsed as delimited tabular text.
pub fn load_csv_path(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(EstimatorError::DatasetLoad(format!(
            "input file not found: {}",
            path.display()
        )));
    }

    let df = CsvReadOptions::default()
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .and_then(|reader| reader.finish())
        .map_err(|e| EstimatorError::DatasetLoad(e.to_string()))?;

    debug!("Loaded dataset from {}: {:?}", path.display(), df.shape());
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_csv_bytes() {
        let csv = "sprint_id,qtd_membros,produtividade_estimada\n\
                   Sprint_01,5,40.0\n\
                   Sprint_02,4,35.5\n";

        let df = load_csv_bytes(csv.as_bytes()).unwrap();
        assert_eq!(df.shape(), (2, 3));
        assert!(df.column("sprint_id").is_ok());
        assert!(df.column("qtd_membros").is_ok());
    }

    #[test]
    fn test_load_csv_bytes_infers_numeric_types() {
        let csv = "a,b\n1,2.5\n3,4.5\n";
        let df = load_csv_bytes(csv.as_bytes()).unwrap();

        assert!(df.column("a").unwrap().dtype().is_integer());
        assert!(df.column("b").unwrap().dtype().is_float());
    }

    #[test]
    fn test_load_csv_bytes_unparseable() {
        // Inconsistent field counts cannot be read as a table.
        let bad = b"a,b,c\n1,2\n1,2,3,4,5\n\x00\xff";
        let result = load_csv_bytes(bad);
        assert!(matches!(
            result.unwrap_err(),
            EstimatorError::DatasetLoad(_)
        ));
    }

    #[test]
    fn test_load_csv_path_missing_file() {
        let result = load_csv_path("/nonexistent/sprints.csv");
        assert!(matches!(
            result.unwrap_err(),
            EstimatorError::DatasetLoad(_)
        ));
    }
}
