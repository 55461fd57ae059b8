//! Per-exercise progress history with personal-record flags.

use crate::scan::scan_performance;
use crate::types::{ExerciseCategory, HistoryEntry, ProgressSummary, SortOrder, WorkoutSession};

/// History of one exercise, one entry per session that contains it
#[derive(Clone, Debug, PartialEq)]
pub struct ExerciseHistory {
    pub exercise: String,
    pub category: ExerciseCategory,
    /// Oldest first; display order is applied on read
    entries: Vec<HistoryEntry>,
    /// None when the exercise has no history
    pub summary: Option<ProgressSummary>,
}

impl ExerciseHistory {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entries oldest first
    pub fn chronological(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Entries in the requested display order
    pub fn entries(&self, order: SortOrder) -> Vec<&HistoryEntry> {
        match order {
            SortOrder::OldestFirst => self.entries.iter().collect(),
            SortOrder::NewestFirst => self.entries.iter().rev().collect(),
        }
    }

    pub fn personal_records(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().filter(|e| e.is_personal_record)
    }
}

/// Build the history report for one exercise
pub fn compute_exercise_history(
    sessions: &[WorkoutSession],
    exercise_name: &str,
    category: ExerciseCategory,
) -> ExerciseHistory {
    let mut entries: Vec<HistoryEntry> = sessions
        .iter()
        .filter_map(|session| {
            scan_performance(session, exercise_name, category).map(|scan| HistoryEntry {
                session_id: session.id,
                date: session.date,
                session_name: session.name.clone(),
                metric: scan.metric,
                is_personal_record: false,
                sets: scan.sets,
            })
        })
        .collect();
    entries.sort_by_key(|e| e.date);

    let best = best_value(&entries, category);
    if let Some(best) = best {
        for entry in entries.iter_mut() {
            entry.is_personal_record = entry.value() == Some(best);
        }
    }

    let summary = summarize(&entries, best);

    tracing::debug!(
        "History for '{}': {} sessions, best {:?}",
        exercise_name,
        entries.len(),
        best
    );

    ExerciseHistory {
        exercise: exercise_name.trim().to_string(),
        category,
        entries,
        summary,
    }
}

/// Best value across all entries: max weight or reps, min pace
fn best_value(entries: &[HistoryEntry], category: ExerciseCategory) -> Option<f64> {
    entries
        .iter()
        .filter_map(HistoryEntry::value)
        .fold(None, |best, value| match best {
            Some(current) if !category.is_improvement(value, current) => Some(current),
            _ => Some(value),
        })
}

/// Summary over chronologically ordered entries
fn summarize(entries: &[HistoryEntry], best: Option<f64>) -> Option<ProgressSummary> {
    if entries.is_empty() {
        return None;
    }

    let values: Vec<f64> = entries.iter().filter_map(HistoryEntry::value).collect();

    let average_performance = if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    };

    let progress_percentage = match (values.first(), values.last()) {
        (Some(first), Some(last)) => {
            let base = if *first == 0.0 { 1.0 } else { *first };
            (last - first) / base * 100.0
        }
        _ => 0.0,
    };

    Some(ProgressSummary {
        total_sessions: entries.len(),
        best_performance: best,
        average_performance,
        progress_percentage,
    })
}
