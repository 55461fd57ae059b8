//! Per-session reduction of raw sets into one metric per exercise.

use crate::types::{ExerciseCategory, SessionMetric, SetEntry, WorkoutSession};

/// Everything one session contributes for one exercise
#[derive(Clone, Debug, PartialEq)]
pub struct SessionScan {
    /// None when the sets carry no usable value (e.g. strength with no loaded set)
    pub metric: Option<SessionMetric>,
    pub sets: Vec<SetEntry>,
}

/// Best metric for `exercise_name` in `session`, or None if it was not
/// performed or has no usable value.
pub fn scan_session(
    session: &WorkoutSession,
    exercise_name: &str,
    category: ExerciseCategory,
) -> Option<SessionMetric> {
    scan_performance(session, exercise_name, category).and_then(|scan| scan.metric)
}

/// Collect and reduce every set logged under `exercise_name` in `session`.
///
/// Returns None only when the exercise does not appear in the session.
/// Repeated entries of the same exercise are merged into one scan.
pub fn scan_performance(
    session: &WorkoutSession,
    exercise_name: &str,
    category: ExerciseCategory,
) -> Option<SessionScan> {
    let mut found = false;
    let mut sets = Vec::new();

    for performance in session.exercises.iter().filter(|p| p.is_named(exercise_name)) {
        found = true;
        sets.extend(performance.sets.iter().map(|s| s.interpret(category)));
    }

    if !found {
        return None;
    }

    Some(SessionScan {
        metric: metric_from_sets(&sets, category),
        sets,
    })
}

/// Reduce typed sets to the session's best metric
pub fn metric_from_sets(sets: &[SetEntry], category: ExerciseCategory) -> Option<SessionMetric> {
    match category {
        ExerciseCategory::Strength => strength_metric(sets),
        ExerciseCategory::Calisthenics => calisthenics_metric(sets),
        ExerciseCategory::Cardio => cardio_metric(sets),
    }
}

fn strength_metric(sets: &[SetEntry]) -> Option<SessionMetric> {
    let mut best: Option<(f64, u32)> = None;

    for set in sets {
        if let SetEntry::Strength { weight_kg, reps } = *set {
            if weight_kg <= 0.0 || !weight_kg.is_finite() {
                continue;
            }
            // Strictly greater keeps the first set at the max weight
            if best.map_or(true, |(max, _)| weight_kg > max) {
                best = Some((weight_kg, reps));
            }
        }
    }

    best.map(|(max_weight_kg, reps_at_max)| SessionMetric::Strength {
        max_weight_kg,
        reps_at_max,
    })
}

fn calisthenics_metric(sets: &[SetEntry]) -> Option<SessionMetric> {
    sets.iter()
        .filter_map(|set| match set {
            SetEntry::Calisthenics { reps } => Some(*reps),
            _ => None,
        })
        .max()
        .map(|max_reps| SessionMetric::Calisthenics { max_reps })
}

fn cardio_metric(sets: &[SetEntry]) -> Option<SessionMetric> {
    let mut seen = false;
    let mut max_duration_secs = 0u32;
    let mut max_distance_km = 0.0f64;

    for set in sets {
        if let SetEntry::Cardio {
            duration_secs,
            distance_km,
            ..
        } = *set
        {
            seen = true;
            max_duration_secs = max_duration_secs.max(duration_secs);
            if distance_km.is_finite() {
                max_distance_km = max_distance_km.max(distance_km);
            }
        }
    }

    if !seen {
        return None;
    }

    Some(SessionMetric::Cardio {
        max_duration_secs,
        max_distance_km,
        pace: pace_min_per_km(max_duration_secs, max_distance_km),
    })
}

/// Minutes per kilometre; None unless both duration and distance are positive
pub fn pace_min_per_km(duration_secs: u32, distance_km: f64) -> Option<f64> {
    if duration_secs == 0 || distance_km <= 0.0 || !distance_km.is_finite() {
        return None;
    }
    Some((f64::from(duration_secs) / 60.0) / distance_km)
}
