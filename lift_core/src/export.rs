//! CSV export of exercise statistics.

use crate::units::UnitSystem;
use crate::{BestMetric, ExerciseStats, Result};
use std::fs::OpenOptions;
use std::path::Path;

/// A row in the CSV output, in display units
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    exercise: String,
    category: String,
    muscle_group: String,
    sessions: usize,
    total_sets: usize,
    last_performed: Option<String>,
    max_weight: Option<f64>,
    reps_at_max: Option<u32>,
    max_weight_date: Option<String>,
    max_reps: Option<u32>,
    max_reps_date: Option<String>,
    max_duration_secs: Option<u32>,
    max_distance: Option<f64>,
    best_pace: Option<f64>,
    best_pace_date: Option<String>,
    weight_unit: &'static str,
    distance_unit: &'static str,
}

impl CsvRow {
    fn new(stats: &ExerciseStats, units: UnitSystem) -> Self {
        let mut row = CsvRow {
            exercise: stats.name.clone(),
            category: stats.category.to_string(),
            muscle_group: stats.muscle_group.label().to_string(),
            sessions: stats.session_count,
            total_sets: stats.total_sets,
            last_performed: stats.last_performed.map(|d| d.to_string()),
            max_weight: None,
            reps_at_max: None,
            max_weight_date: None,
            max_reps: None,
            max_reps_date: None,
            max_duration_secs: None,
            max_distance: None,
            best_pace: None,
            best_pace_date: None,
            weight_unit: units.weight_label(),
            distance_unit: units.distance_label(),
        };

        match &stats.best {
            BestMetric::Strength {
                max_weight,
                reps_at_max,
            } => {
                row.max_weight = max_weight.map(|a| round2(units.weight_to_display(a.value)));
                row.max_weight_date = max_weight.map(|a| a.date.to_string());
                row.reps_at_max = *reps_at_max;
            }
            BestMetric::Calisthenics { max_reps } => {
                row.max_reps = max_reps.map(|a| a.value);
                row.max_reps_date = max_reps.map(|a| a.date.to_string());
            }
            BestMetric::Cardio {
                max_duration,
                max_distance,
                best_pace,
            } => {
                row.max_duration_secs = max_duration.map(|a| a.value);
                row.max_distance =
                    max_distance.map(|a| round2(units.distance_to_display(a.value)));
                row.best_pace = best_pace.map(|a| round2(units.pace_to_display(a.value)));
                row.best_pace_date = best_pace.map(|a| a.date.to_string());
            }
        }

        row
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Write statistics to a CSV file, replacing any previous export
///
/// The file is flushed and synced before returning. Returns the number of rows
/// written.
pub fn export_statistics_csv(
    stats: &[ExerciseStats],
    path: &Path,
    units: UnitSystem,
) -> Result<usize> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(file);

    for s in stats {
        writer.serialize(CsvRow::new(s, units))?;
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    file.sync_all()?;

    tracing::info!("Exported {} exercises to {:?}", stats.len(), path);
    Ok(stats.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::compute_exercise_statistics;
    use crate::{ExercisePerformance, LoggedSet, WorkoutSession};
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn history() -> Vec<WorkoutSession> {
        let perf = |name: &str, weight: f64, reps: u32| ExercisePerformance {
            name: name.into(),
            muscle_group: None,
            sets: vec![LoggedSet {
                weight,
                reps,
                pace: None,
            }],
        };
        vec![WorkoutSession {
            id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
            name: "Mixed".into(),
            completed: true,
            exercises: vec![
                perf("Bench Press", 100.0, 3),
                perf("Pull-up", 0.0, 15),
                perf("Running", 5.0, 1500),
            ],
        }]
    }

    #[test]
    fn test_export_writes_one_row_per_exercise() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("out/stats.csv");

        let stats = compute_exercise_statistics(&history());
        let count = export_statistics_csv(&stats, &path, UnitSystem::Metric).unwrap();
        assert_eq!(count, 3);

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(&headers[0], "exercise");

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[0][0], "Bench Press");
        assert_eq!(&rows[0][6], "100.0");
        assert_eq!(&rows[2][0], "Running");
        assert_eq!(&rows[2][13], "5.0");
    }

    #[test]
    fn test_export_converts_units() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("stats.csv");

        let stats = compute_exercise_statistics(&history());
        export_statistics_csv(&stats, &path, UnitSystem::Imperial).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("220.46"));
        assert!(contents.contains(",lb,mi"));
    }

    #[test]
    fn test_export_replaces_previous_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("stats.csv");

        let stats = compute_exercise_statistics(&history());
        export_statistics_csv(&stats, &path, UnitSystem::Metric).unwrap();
        export_statistics_csv(&stats[..1], &path, UnitSystem::Metric).unwrap();

        let reader = csv::Reader::from_path(&path).unwrap();
        assert_eq!(reader.into_records().count(), 1);
    }
}
