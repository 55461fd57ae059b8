//! Cross-session aggregation into one statistics record per exercise.

use crate::classify::classify;
use crate::scan::scan_performance;
use crate::types::{
    Achieved, BestMetric, ExerciseCategory, ExerciseStats, MuscleGroup, SessionMetric,
    WorkoutSession,
};
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Lowercased, trimmed exercise name used for grouping
pub fn exercise_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Fold every session into per-exercise statistics, keyed by lowercased name.
///
/// Sessions are visited oldest first so that ties on a best value keep the
/// earlier date. Each exercise is classified once, from its first appearance.
pub fn reduce(sessions: &[WorkoutSession]) -> BTreeMap<String, ExerciseStats> {
    let mut ordered: Vec<&WorkoutSession> = sessions.iter().collect();
    ordered.sort_by_key(|s| s.date);

    let mut stats: BTreeMap<String, ExerciseStats> = BTreeMap::new();

    for session in ordered {
        let mut seen_in_session: Vec<String> = Vec::new();

        for performance in &session.exercises {
            let key = exercise_key(&performance.name);
            if seen_in_session.contains(&key) {
                continue;
            }
            seen_in_session.push(key.clone());

            let entry = stats.entry(key).or_insert_with(|| {
                let classification =
                    classify(&performance.name, performance.muscle_group_tag());
                ExerciseStats::empty(&performance.name, classification)
            });

            let Some(scan) = scan_performance(session, &performance.name, entry.category) else {
                continue;
            };

            entry.session_count += 1;
            entry.total_sets += scan.sets.len();
            entry.last_performed = Some(match entry.last_performed {
                Some(last) => last.max(session.date),
                None => session.date,
            });

            if let Some(metric) = &scan.metric {
                fold_metric(&mut entry.best, metric, session.date);
            }
        }
    }

    tracing::debug!(
        "Reduced {} sessions into {} exercises",
        sessions.len(),
        stats.len()
    );

    stats
}

/// Merge one session's metric into the running bests
fn fold_metric(best: &mut BestMetric, metric: &SessionMetric, date: NaiveDate) {
    match (best, metric) {
        (
            BestMetric::Strength {
                max_weight,
                reps_at_max,
            },
            SessionMetric::Strength {
                max_weight_kg,
                reps_at_max: reps,
            },
        ) => {
            if raise(max_weight, *max_weight_kg, date, |a, b| a > b) {
                *reps_at_max = Some(*reps);
            }
        }
        (BestMetric::Calisthenics { max_reps }, SessionMetric::Calisthenics { max_reps: reps }) => {
            raise(max_reps, *reps, date, |a, b| a > b);
        }
        (
            BestMetric::Cardio {
                max_duration,
                max_distance,
                best_pace,
            },
            SessionMetric::Cardio {
                max_duration_secs,
                max_distance_km,
                pace,
            },
        ) => {
            raise(max_duration, *max_duration_secs, date, |a, b| a > b);
            raise(max_distance, *max_distance_km, date, |a, b| a > b);
            if let Some(pace) = pace {
                raise(best_pace, *pace, date, |a, b| a < b);
            }
        }
        (best, metric) => {
            tracing::warn!(
                "Ignoring metric {:?} that does not fit {:?}",
                metric,
                best
            );
        }
    }
}

/// Replace `slot` when `value` is strictly better; returns whether it did
fn raise<T: Copy>(
    slot: &mut Option<Achieved<T>>,
    value: T,
    date: NaiveDate,
    better: impl Fn(T, T) -> bool,
) -> bool {
    let replace = match slot {
        Some(current) => better(value, current.value),
        None => true,
    };
    if replace {
        *slot = Some(Achieved { value, date });
    }
    replace
}

/// Statistics for every exercise, in display order
pub fn compute_exercise_statistics(sessions: &[WorkoutSession]) -> Vec<ExerciseStats> {
    let mut all: Vec<ExerciseStats> = reduce(sessions).into_values().collect();
    sort_for_display(&mut all);
    all
}

/// Statistics for one exercise; an exercise with no history yields an empty record
pub fn exercise_statistics(sessions: &[WorkoutSession], name: &str) -> ExerciseStats {
    reduce(sessions)
        .remove(&exercise_key(name))
        .unwrap_or_else(|| ExerciseStats::empty(name, classify(name, None)))
}

/// Sort by muscle-group display order, then best-first within each group.
///
/// Cardio sorts by pace ascending; everything else by weight or reps
/// descending. Exercises with no best value go last in their group.
pub fn sort_for_display(stats: &mut [ExerciseStats]) {
    stats.sort_by(|a, b| {
        a.muscle_group
            .display_rank()
            .cmp(&b.muscle_group.display_rank())
            .then_with(|| compare_best(a, b))
            .then_with(|| exercise_key(&a.name).cmp(&exercise_key(&b.name)))
    });
}

fn compare_best(a: &ExerciseStats, b: &ExerciseStats) -> Ordering {
    match (a.primary_value(), b.primary_value()) {
        (Some(x), Some(y)) => {
            let ord = x.partial_cmp(&y).unwrap_or(Ordering::Equal);
            if a.category == ExerciseCategory::Cardio {
                ord
            } else {
                ord.reverse()
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Split display-ordered statistics into muscle-group sections
pub fn group_by_muscle(stats: &[ExerciseStats]) -> Vec<(MuscleGroup, Vec<&ExerciseStats>)> {
    MuscleGroup::DISPLAY_ORDER
        .iter()
        .filter_map(|group| {
            let section: Vec<&ExerciseStats> =
                stats.iter().filter(|s| s.muscle_group == *group).collect();
            if section.is_empty() {
                None
            } else {
                Some((*group, section))
            }
        })
        .collect()
}
