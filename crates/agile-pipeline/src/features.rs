//! Feature engineer: derives sprint metrics from raw columns.
//!
//! Three derived columns are appended, each a pure function of the raw row:
//!
//! - `qtd_bugs = percentual_bugs * cartoes_previstos`
//! - `qtd_retrabalho = percentual_retrabalho * cartoes_previstos`
//! - `carga_cartoes_por_membro = cartoes_previstos / qtd_membros`
//!
//! A zero team size is rejected *before* the division executes, so an
//! infinite or NaN load value can never surface downstream. The input frame
//! is never mutated; derivation returns a new frame and is idempotent.

use crate::error::{EstimatorError, Result};
use crate::schema;
use polars::prelude::*;

/// Derives the sprint feature columns.
pub struct FeatureEngineer;

impl FeatureEngineer {
    /// Append the three derived columns to a copy of `df`.
    ///
    /// # Errors
    ///
    /// - [`EstimatorError::MissingColumn`] naming the first absent raw
    ///   column out of `percentual_bugs`, `percentual_retrabalho`,
    ///   `cartoes_previstos`, `qtd_membros`.
    /// - [`EstimatorError::DivisionByZero`] if any row has
    ///   `qtd_membros == 0`.
    pub fn derive(df: &DataFrame) -> Result<DataFrame> {
        let names: Vec<&str> = df
            .get_column_names()
            .iter()
            .map(|s| s.as_str())
            .collect();
        for required in schema::FEATURE_INPUT_COLUMNS {
            if !names.contains(&required) {
                return Err(EstimatorError::MissingColumn(required.to_string()));
            }
        }

        Self::reject_zero_members(df)?;

        let derived = df
            .clone()
            .lazy()
            .with_columns([
                (col(schema::PERCENTUAL_BUGS) * col(schema::CARTOES_PREVISTOS))
                    .alias(schema::QTD_BUGS),
                (col(schema::PERCENTUAL_RETRABALHO) * col(schema::CARTOES_PREVISTOS))
                    .alias(schema::QTD_RETRABALHO),
                (col(schema::CARTOES_PREVISTOS).cast(DataType::Float64)
                    / col(schema::QTD_MEMBROS).cast(DataType::Float64))
                .alias(schema::CARGA_CARTOES_POR_MEMBRO),
            ])
            .collect()?;

        Ok(derived)
    }

    /// Fail on the first row whose team size is zero.
    fn reject_zero_members(df: &DataFrame) -> Result<()> {
        let members = df
            .column(schema::QTD_MEMBROS)?
            .as_materialized_series()
            .cast(&DataType::Float64)?;
        let members = members.f64()?;

        for (row, value) in members.into_iter().enumerate() {
            if value == Some(0.0) {
                return Err(EstimatorError::DivisionByZero {
                    column: schema::QTD_MEMBROS.to_string(),
                    row,
                });
            }
        }
        Ok(())
    }
}
