//! Categorical encoder adapter.

use crate::error::{EstimatorError, Result};
use agile_artifacts::LabelEncoding;
use polars::prelude::*;

/// Applies a [`LabelEncoding`] vocabulary to one categorical column.
pub struct CategoryEncoder;

impl CategoryEncoder {
    /// Replace every value in `column` with its integer code, returning a
    /// new frame.
    ///
    /// The whole batch aborts on the first value outside the vocabulary
    /// (nulls included) — no default mapping is ever substituted, and the
    /// input frame is left untouched.
    ///
    /// # Errors
    ///
    /// - [`EstimatorError::MissingColumn`] if `column` is absent.
    /// - [`EstimatorError::UnknownCategory`] naming the offending value.
    pub fn encode(df: &DataFrame, encoding: &LabelEncoding, column: &str) -> Result<DataFrame> {
        if df.column(column).is_err() {
            return Err(EstimatorError::MissingColumn(column.to_string()));
        }

        let series = df.column(column)?.as_materialized_series().clone();
        let values = series.str()?;

        let mut codes: Vec<u32> = Vec::with_capacity(values.len());
        for value in values.into_iter() {
            match value {
                Some(v) => match encoding.code_of(v) {
                    Some(code) => codes.push(code),
                    None => {
                        return Err(EstimatorError::UnknownCategory {
                            column: column.to_string(),
                            value: v.to_string(),
                        });
                    }
                },
                None => {
                    return Err(EstimatorError::UnknownCategory {
                        column: column.to_string(),
                        value: "<null>".to_string(),
                    });
                }
            }
        }

        let encoded = UInt32Chunked::from_vec(column.into(), codes).into_series();
        let mut out = df.clone();
        out.replace(column, encoded)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn encoding() -> LabelEncoding {
        LabelEncoding::from_classes(
            "test",
            "tipo_dominio",
            vec![
                "API".to_string(),
                "Dados".to_string(),
                "Mobile".to_string(),
                "Web".to_string(),
            ],
        )
        .unwrap()
    }

    fn frame(domains: &[&str]) -> DataFrame {
        DataFrame::new(vec![
            Series::new("tipo_dominio".into(), domains).into(),
            Series::new("qtd_membros".into(), &vec![5i64; domains.len()]).into(),
        ])
        .unwrap()
    }

    #[test]
    fn test_encode_replaces_values_with_codes() {
        let df = frame(&["Web", "API", "Mobile"]);
        let encoded = CategoryEncoder::encode(&df, &encoding(), "tipo_dominio").unwrap();

        let codes: Vec<u32> = encoded
            .column("tipo_dominio")
            .unwrap()
            .as_materialized_series()
            .u32()
            .unwrap()
            .into_iter()
            .map(|v| v.unwrap())
            .collect();
        assert_eq!(codes, vec![3, 0, 2]);
    }

    #[test]
    fn test_unknown_category_aborts_whole_batch() {
        let df = frame(&["Web", "Desktop", "API"]);
        let err = CategoryEncoder::encode(&df, &encoding(), "tipo_dominio").unwrap_err();

        match err {
            EstimatorError::UnknownCategory { column, value } => {
                assert_eq!(column, "tipo_dominio");
                assert_eq!(value, "Desktop");
            }
            other => panic!("expected UnknownCategory, got {:?}", other),
        }
    }

    #[test]
    fn test_input_frame_untouched_on_failure() {
        let df = frame(&["Web", "Desktop"]);
        let _ = CategoryEncoder::encode(&df, &encoding(), "tipo_dominio");

        // Original still holds strings.
        let original: Vec<&str> = df
            .column("tipo_dominio")
            .unwrap()
            .as_materialized_series()
            .str()
            .unwrap()
            .into_iter()
            .map(|v| v.unwrap())
            .collect();
        assert_eq!(original, vec!["Web", "Desktop"]);
    }

    #[test]
    fn test_null_value_is_unknown() {
        let df = DataFrame::new(vec![
            Series::new("tipo_dominio".into(), &[Some("Web"), None]).into(),
        ])
        .unwrap();

        let err = CategoryEncoder::encode(&df, &encoding(), "tipo_dominio").unwrap_err();
        assert!(matches!(err, EstimatorError::UnknownCategory { .. }));
    }

    #[test]
    fn test_missing_column() {
        let df = DataFrame::new(vec![Series::new("other".into(), &["x"]).into()]).unwrap();
        let err = CategoryEncoder::encode(&df, &encoding(), "tipo_dominio").unwrap_err();
        assert!(matches!(err, EstimatorError::MissingColumn(_)));
    }
}
