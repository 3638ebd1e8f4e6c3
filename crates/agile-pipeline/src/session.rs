//! Per-session table ownership.
//!
//! Each user session owns exactly one working table, seeded from the
//! uploaded dataset. The original upload is captured once and stays
//! immutable; successful estimation runs *replace* the working table with
//! the pipeline's output rather than mutating it in place. This makes the
//! all-or-nothing failure semantics structural: a failed run simply never
//! performs the replacement, so no partial state can survive, and the
//! session remains usable for the next attempt.

use crate::error::Result;
use crate::pipeline::{Pipeline, RunSummary};
use crate::schema;
use polars::prelude::*;

/// One user session's tables.
#[derive(Debug, Clone)]
pub struct Session {
    original: DataFrame,
    working: DataFrame,
    last_summary: Option<RunSummary>,
}

impl Session {
    /// Start a session from an uploaded dataset.
    pub fn new(upload: DataFrame) -> Self {
        Self {
            working: upload.clone(),
            original: upload,
            last_summary: None,
        }
    }

    /// The upload exactly as it was captured.
    pub fn original(&self) -> &DataFrame {
        &self.original
    }

    /// The current working table (holds predictions after a successful run).
    pub fn working(&self) -> &DataFrame {
        &self.working
    }

    /// Summary of the most recent successful run, if any.
    pub fn last_summary(&self) -> Option<&RunSummary> {
        self.last_summary.as_ref()
    }

    /// Whether the working table carries predictions.
    pub fn has_predictions(&self) -> bool {
        self.working.column(schema::PRODUTIVIDADE_PREVISTA).is_ok()
    }

    /// Run the estimation pipeline over the working table.
    ///
    /// On success the working table is replaced with the predicted output
    /// and the run summary is returned. On failure the working table is
    /// left exactly as it was and the session stays usable.
    pub fn estimate(&mut self, pipeline: &Pipeline) -> Result<&RunSummary> {
        let (output, summary) = pipeline.run(&self.working)?;
        self.working = output;
        Ok(self.last_summary.insert(summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agile_artifacts::{ArtifactBundle, LabelEncoding, LinearEstimator, StandardScaler};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn pipeline() -> Pipeline {
        let model = LinearEstimator::from_params(
            "test",
            schema::COMPACT_FEATURE_SET
                .iter()
                .map(|s| s.to_string())
                .collect(),
            1.0,
            vec![1.0, 1.0, 1.0, 1.0, 1.0, 1.0],
        )
        .unwrap();
        let scaler = StandardScaler::from_params(
            "test",
            vec![
                (schema::PRODUTIVIDADE_ESTIMADA.to_string(), 0.0, 1.0),
                (schema::STORY_POINTS_PREVISTOS.to_string(), 0.0, 1.0),
            ],
        )
        .unwrap();
        let encoder = LabelEncoding::from_classes(
            "test",
            schema::TIPO_DOMINIO,
            vec!["Web".to_string(), "Mobile".to_string()],
        )
        .unwrap();
        let bundle = ArtifactBundle::from_parts(Box::new(model), scaler, encoder);
        Pipeline::builder()
            .artifacts(Arc::new(bundle))
            .build()
            .unwrap()
    }

    fn upload(domain: &str) -> DataFrame {
        DataFrame::new(vec![
            Series::new(schema::SPRINT_ID.into(), &["Sprint_01"]).into(),
            Series::new(schema::QTD_MEMBROS.into(), &[5i64]).into(),
            Series::new(schema::CARTOES_PREVISTOS.into(), &[20i64]).into(),
            Series::new(schema::PERCENTUAL_BUGS.into(), &[0.1f64]).into(),
            Series::new(schema::PERCENTUAL_RETRABALHO.into(), &[0.05f64]).into(),
            Series::new(schema::TIPO_DOMINIO.into(), &[domain]).into(),
            Series::new(schema::COMPLEXIDADE_MEDIA.into(), &[3.0f64]).into(),
            Series::new(schema::PRODUTIVIDADE_ESTIMADA.into(), &[40.0f64]).into(),
            Series::new(schema::STORY_POINTS_PREVISTOS.into(), &[100i64]).into(),
        ])
        .unwrap()
    }

    #[test]
    fn test_successful_run_replaces_working_table() {
        let mut session = Session::new(upload("Web"));
        assert!(!session.has_predictions());

        session.estimate(&pipeline()).unwrap();

        assert!(session.has_predictions());
        assert!(session.last_summary().is_some());
        // The captured original is untouched.
        assert!(
            session
                .original()
                .column(schema::PRODUTIVIDADE_PREVISTA)
                .is_err()
        );
    }

    #[test]
    fn test_failed_run_leaves_working_table_unchanged() {
        let mut session = Session::new(upload("Desktop"));
        let width_before = session.working().width();

        let result = session.estimate(&pipeline());

        assert!(result.is_err());
        assert_eq!(session.working().width(), width_before);
        assert!(!session.has_predictions());
        assert!(session.last_summary().is_none());
    }

    #[test]
    fn test_session_usable_after_failure() {
        let mut session = Session::new(upload("Web"));

        // Poisoning attempt: a failing run on a different session must not
        // affect this one, and a failing pipeline must not lock the session.
        {
            let mut bad = Session::new(upload("Desktop"));
            assert!(bad.estimate(&pipeline()).is_err());
        }

        session.estimate(&pipeline()).unwrap();
        assert!(session.has_predictions());
    }

    #[test]
    fn test_re_estimation_is_allowed() {
        let mut session = Session::new(upload("Web"));

        session.estimate(&pipeline()).unwrap();
        let first_width = session.working().width();

        // Re-running recomputes the prediction column in place of the old
        // one; the width stays stable.
        session.estimate(&pipeline()).unwrap();
        assert_eq!(session.working().width(), first_width);
    }
}
