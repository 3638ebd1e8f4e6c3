//! Numeric scaler adapter.

use crate::error::{EstimatorError, Result};
use agile_artifacts::StandardScaler;
use polars::prelude::*;

/// Applies [`StandardScaler`] parameters to a set of numeric columns.
pub struct StandardScalerAdapter;

impl StandardScalerAdapter {
    /// Replace each value `v` in each named column with `(v - mean) / scale`
    /// using that column's registered parameters, returning a new frame.
    ///
    /// Columns are processed exactly as requested and in the order
    /// requested; the order is semantically significant because the model
    /// downstream consumes a fixed-width, fixed-order numeric vector.
    ///
    /// # Errors
    ///
    /// - [`EstimatorError::MissingColumn`] if a requested column is absent
    ///   from the frame.
    /// - [`EstimatorError::UnknownScalerColumn`] if a requested column has
    ///   no registered parameters.
    pub fn scale(df: &DataFrame, scaler: &StandardScaler, columns: &[&str]) -> Result<DataFrame> {
        let mut out = df.clone();

        for &column in columns {
            if out.column(column).is_err() {
                return Err(EstimatorError::MissingColumn(column.to_string()));
            }
            let (mean, scale) = scaler
                .params_for(column)
                .ok_or_else(|| EstimatorError::UnknownScalerColumn(column.to_string()))?;

            let series = out
                .column(column)?
                .as_materialized_series()
                .cast(&DataType::Float64)?;
            let values = series.f64()?;

            let scaled: Float64Chunked = values
                .into_iter()
                .map(|v| v.map(|v| (v - mean) / scale))
                .collect();
            let mut scaled = scaled.into_series();
            scaled.rename(column.into());

            out.replace(column, scaled)?;
        }

        Ok(out)
    }
}
