//! Synthetic sprint dataset generator for demos and fixtures.
//!
//! Produces realistic-looking sprint histories: sequential date windows,
//! story points correlated with duration and team size, and bug/rework
//! fractions that drift upward with complexity. Generation is seeded, so a
//! given `(count, seed)` pair always yields the same dataset.

use crate::error::Result;
use crate::schema;
use chrono::{Duration, NaiveDate};
use polars::io::csv::write::CsvWriter;
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::path::Path;
use tracing::info;

/// Domains a synthetic sprint can belong to.
const DOMAINS: [&str; 4] = ["Web", "Mobile", "API", "Dados"];

/// Sprint duration bounds in days.
const DURATION_DAYS: std::ops::RangeInclusive<i64> = 10..=21;

/// First sprint start date.
const START_DATE: (i32, u32, u32) = (2025, 1, 1);

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Generate `count` synthetic sprints as a DataFrame.
///
/// Columns match the upstream sprint export layout, dates rendered as
/// ISO-8601 strings. Fractions are clamped to `[0, 1]` so every generated
/// row satisfies the pipeline's input invariants.
pub fn generate_sprints(count: usize, seed: u64) -> Result<DataFrame> {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut sprint_ids = Vec::with_capacity(count);
    let mut starts = Vec::with_capacity(count);
    let mut ends = Vec::with_capacity(count);
    let mut members = Vec::with_capacity(count);
    let mut durations = Vec::with_capacity(count);
    let mut cards_planned = Vec::with_capacity(count);
    let mut cards_delivered = Vec::with_capacity(count);
    let mut points_planned = Vec::with_capacity(count);
    let mut points_delivered = Vec::with_capacity(count);
    let mut domains = Vec::with_capacity(count);
    let mut complexities = Vec::with_capacity(count);
    let mut bug_fractions = Vec::with_capacity(count);
    let mut rework_fractions = Vec::with_capacity(count);
    let mut velocities = Vec::with_capacity(count);
    let mut productivities = Vec::with_capacity(count);

    let (year, month, day) = START_DATE;
    let mut cursor = NaiveDate::from_ymd_opt(year, month, day)
        .unwrap_or(NaiveDate::MIN);

    for sprint in 1..=count {
        let duration = rng.gen_range(DURATION_DAYS);
        let start = cursor;
        let end = start + Duration::days(duration);

        let team_size = rng.gen_range(3..=7i64);

        // Story points correlated with duration and team size.
        let base_points = rng.gen_range(5..=10i64);
        let planned_points = base_points * duration * team_size;
        let delivered_points = (planned_points as f64 * rng.gen_range(0.7..=1.0)) as i64;

        let planned_cards = rng.gen_range(20..=50i64);
        let delivered_cards = (planned_cards as f64 * rng.gen_range(0.7..=1.0)) as i64;

        let complexity = round1(rng.gen_range(1.5..=4.5));

        // Bugs and rework rise slightly with complexity.
        let bugs = round2(rng.gen_range(0.05..=0.25) + 0.02 * (complexity - 2.5));
        let rework = round2(rng.gen_range(0.05..=0.2) + 0.02 * (complexity - 2.5));

        sprint_ids.push(format!("Sprint_{:02}", sprint));
        starts.push(start.to_string());
        ends.push(end.to_string());
        members.push(team_size);
        durations.push(duration);
        cards_planned.push(planned_cards);
        cards_delivered.push(delivered_cards);
        points_planned.push(planned_points);
        points_delivered.push(delivered_points);
        domains.push(
            (*DOMAINS.choose(&mut rng).unwrap_or(&DOMAINS[0])).to_string(),
        );
        complexities.push(complexity);
        bug_fractions.push(bugs.clamp(0.0, 1.0));
        rework_fractions.push(rework.clamp(0.0, 1.0));
        velocities.push(round2(rng.gen_range(30.0..=70.0)));
        productivities.push(round2(planned_points as f64 / team_size as f64));

        cursor = end + Duration::days(1);
    }

    let df = DataFrame::new(vec![
        Series::new(schema::SPRINT_ID.into(), sprint_ids).into(),
        Series::new("data_inicio".into(), starts).into(),
        Series::new("data_fim".into(), ends).into(),
        Series::new(schema::QTD_MEMBROS.into(), members).into(),
        Series::new("duracao_dias".into(), durations).into(),
        Series::new(schema::CARTOES_PREVISTOS.into(), cards_planned).into(),
        Series::new(schema::CARTOES_ENTREGUES.into(), cards_delivered).into(),
        Series::new(schema::STORY_POINTS_PREVISTOS.into(), points_planned).into(),
        Series::new(schema::STORY_POINTS_ENTREGUES.into(), points_delivered).into(),
        Series::new(schema::TIPO_DOMINIO.into(), domains).into(),
        Series::new(schema::COMPLEXIDADE_MEDIA.into(), complexities).into(),
        Series::new(schema::PERCENTUAL_BUGS.into(), bug_fractions).into(),
        Series::new(schema::PERCENTUAL_RETRABALHO.into(), rework_fractions).into(),
        Series::new(schema::VELOCIDADE_PASSADA.into(), velocities).into(),
        Series::new(schema::PRODUTIVIDADE_ESTIMADA.into(), productivities).into(),
    ])?;

    Ok(df)
}

/// Write a dataset as a headed CSV file.
pub fn write_csv(df: &mut DataFrame, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut file = std::fs::File::create(path)?;
    CsvWriter::new(&mut file).include_header(true).finish(df)?;
    info!("Wrote {} rows to {}", df.height(), path.display());
    Ok(())
}
