//! Memoized statistics and history, keyed by a content hash of the sessions.

use crate::progress::{compute_exercise_history, ExerciseHistory};
use crate::stats::{compute_exercise_statistics, exercise_key};
use crate::types::{ExerciseCategory, ExerciseStats, WorkoutSession};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

/// Content hash of a session list; any edit to any field changes it
pub fn session_version(sessions: &[WorkoutSession]) -> u64 {
    let mut hasher = DefaultHasher::new();
    sessions.len().hash(&mut hasher);
    for session in sessions {
        session.id.hash(&mut hasher);
        session.date.hash(&mut hasher);
        session.name.hash(&mut hasher);
        session.completed.hash(&mut hasher);
        session.exercises.len().hash(&mut hasher);
        for exercise in &session.exercises {
            exercise.name.hash(&mut hasher);
            exercise.muscle_group.hash(&mut hasher);
            exercise.sets.len().hash(&mut hasher);
            for set in &exercise.sets {
                set.weight.to_bits().hash(&mut hasher);
                set.reps.hash(&mut hasher);
                set.pace.map(f64::to_bits).hash(&mut hasher);
            }
        }
    }
    hasher.finish()
}

/// Cache of derived views over one session list
#[derive(Debug, Default)]
pub struct StatsCache {
    version: Option<u64>,
    statistics: Option<Vec<ExerciseStats>>,
    histories: HashMap<(String, ExerciseCategory), ExerciseHistory>,
    computations: usize,
}

impl StatsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Statistics for every exercise, recomputed only when the sessions change
    pub fn statistics(&mut self, sessions: &[WorkoutSession]) -> &[ExerciseStats] {
        self.sync(sessions);
        if self.statistics.is_none() {
            self.computations += 1;
            self.statistics = Some(compute_exercise_statistics(sessions));
        }
        self.statistics.as_deref().unwrap_or_default()
    }

    /// History for one exercise, recomputed only when the sessions change
    pub fn history(
        &mut self,
        sessions: &[WorkoutSession],
        exercise_name: &str,
        category: ExerciseCategory,
    ) -> &ExerciseHistory {
        self.sync(sessions);
        let computations = &mut self.computations;
        self.histories
            .entry((exercise_key(exercise_name), category))
            .or_insert_with(|| {
                *computations += 1;
                compute_exercise_history(sessions, exercise_name, category)
            })
    }

    /// Drop everything cached
    pub fn invalidate(&mut self) {
        self.version = None;
        self.statistics = None;
        self.histories.clear();
    }

    /// Number of full computations performed so far
    pub fn computations(&self) -> usize {
        self.computations
    }

    fn sync(&mut self, sessions: &[WorkoutSession]) {
        let version = session_version(sessions);
        if self.version != Some(version) {
            if self.version.is_some() {
                tracing::debug!("Session list changed, dropping cached statistics");
            }
            self.invalidate();
            self.version = Some(version);
        }
    }
}
