//! Column names and named column sets for the sprint table.
//!
//! One sprint row is one reporting period for a team. Names are kept
//! exactly as they appear in the upstream CSV exports; they are the data
//! contract with both the uploads and the trained artifacts.

/// Sprint identifier, unique within a table; insertion order is chronological.
pub const SPRINT_ID: &str = "sprint_id";
/// Team size (positive integer).
pub const QTD_MEMBROS: &str = "qtd_membros";
/// Cards planned for the sprint.
pub const CARTOES_PREVISTOS: &str = "cartoes_previstos";
/// Cards delivered in the sprint.
pub const CARTOES_ENTREGUES: &str = "cartoes_entregues";
/// Story points planned.
pub const STORY_POINTS_PREVISTOS: &str = "story_points_previstos";
/// Story points delivered.
pub const STORY_POINTS_ENTREGUES: &str = "story_points_entregues";
/// Work domain category (closed vocabulary, e.g. Web, Mobile, API, Dados).
pub const TIPO_DOMINIO: &str = "tipo_dominio";
/// Mean complexity, typically 1.0 - 5.0.
pub const COMPLEXIDADE_MEDIA: &str = "complexidade_media";
/// Bug fraction in [0, 1].
pub const PERCENTUAL_BUGS: &str = "percentual_bugs";
/// Rework fraction in [0, 1].
pub const PERCENTUAL_RETRABALHO: &str = "percentual_retrabalho";
/// Historical velocity.
pub const VELOCIDADE_PASSADA: &str = "velocidade_passada";
/// Historical/input productivity metric.
pub const PRODUTIVIDADE_ESTIMADA: &str = "produtividade_estimada";

// Derived columns, computed by the feature engineer and never user-supplied.

/// `percentual_bugs * cartoes_previstos`.
pub const QTD_BUGS: &str = "qtd_bugs";
/// `percentual_retrabalho * cartoes_previstos`.
pub const QTD_RETRABALHO: &str = "qtd_retrabalho";
/// `cartoes_previstos / qtd_membros`.
pub const CARGA_CARTOES_POR_MEMBRO: &str = "carga_cartoes_por_membro";

/// Model output, written only after inference runs.
pub const PRODUTIVIDADE_PREVISTA: &str = "produtividade_prevista";

/// Helper column attached to chart samples: the ordinal extracted from
/// `sprint_id`, used for chronological chart ordering.
pub const SPRINT_NUM: &str = "sprint_num";

/// Raw columns the feature engineer requires.
pub const FEATURE_INPUT_COLUMNS: [&str; 4] = [
    PERCENTUAL_BUGS,
    PERCENTUAL_RETRABALHO,
    CARTOES_PREVISTOS,
    QTD_MEMBROS,
];

/// The exact column pair the scaler is applied to, in this order.
///
/// Only these two of the many numeric columns are scaled; the model was
/// trained on this specific mixed representation.
pub const SCALED_COLUMNS: [&str; 2] = [PRODUTIVIDADE_ESTIMADA, STORY_POINTS_PREVISTOS];

/// The deployed six-column feature contract, in model order.
///
/// This is the default the shipped artifacts declare; the pipeline itself
/// follows whatever `feature_names` the loaded model artifact carries.
pub const COMPACT_FEATURE_SET: [&str; 6] = [
    PRODUTIVIDADE_ESTIMADA,
    TIPO_DOMINIO,
    COMPLEXIDADE_MEDIA,
    QTD_BUGS,
    QTD_RETRABALHO,
    CARGA_CARTOES_POR_MEMBRO,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaled_columns_order() {
        // The scaler consumes this exact pair in this exact order.
        assert_eq!(
            SCALED_COLUMNS,
            ["produtividade_estimada", "story_points_previstos"]
        );
    }

    #[test]
    fn test_compact_feature_set_width() {
        assert_eq!(COMPACT_FEATURE_SET.len(), 6);
    }

    #[test]
    fn test_derived_columns_not_in_feature_inputs() {
        for derived in [QTD_BUGS, QTD_RETRABALHO, CARGA_CARTOES_POR_MEMBRO] {
            assert!(!FEATURE_INPUT_COLUMNS.contains(&derived));
        }
    }
}
