//! Core domain types for the workout analytics engine.
//!
//! This module defines:
//! - The workout session wire format supplied by the workout store
//! - Exercise categories and muscle groups
//! - Typed set entries and per-session metrics
//! - Derived statistics and history views
//! - Persisted personal records

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Classification Types
// ============================================================================

/// Structural category of an exercise; decides how its sets are read.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseCategory {
    Strength,
    Calisthenics,
    Cardio,
}

impl ExerciseCategory {
    /// True when `candidate` beats `current` for this category.
    ///
    /// Cardio compares pace, where lower is faster.
    pub fn is_improvement(self, candidate: f64, current: f64) -> bool {
        match self {
            ExerciseCategory::Cardio => candidate < current,
            ExerciseCategory::Strength | ExerciseCategory::Calisthenics => candidate > current,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "strength" => Some(ExerciseCategory::Strength),
            "calisthenics" | "bodyweight" => Some(ExerciseCategory::Calisthenics),
            "cardio" => Some(ExerciseCategory::Cardio),
            _ => None,
        }
    }
}

impl fmt::Display for ExerciseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ExerciseCategory::Strength => "strength",
            ExerciseCategory::Calisthenics => "calisthenics",
            ExerciseCategory::Cardio => "cardio",
        };
        f.write_str(label)
    }
}

/// Muscle group an exercise is filed under
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum MuscleGroup {
    Chest,
    Back,
    Shoulders,
    Arms,
    Legs,
    Core,
    Calisthenics,
    Cardio,
}

impl MuscleGroup {
    /// Section order used by the statistics view
    pub const DISPLAY_ORDER: [MuscleGroup; 8] = [
        MuscleGroup::Chest,
        MuscleGroup::Back,
        MuscleGroup::Shoulders,
        MuscleGroup::Arms,
        MuscleGroup::Legs,
        MuscleGroup::Core,
        MuscleGroup::Calisthenics,
        MuscleGroup::Cardio,
    ];

    /// Position of this group in [`MuscleGroup::DISPLAY_ORDER`]
    pub fn display_rank(self) -> usize {
        Self::DISPLAY_ORDER
            .iter()
            .position(|g| *g == self)
            .unwrap_or(Self::DISPLAY_ORDER.len())
    }

    /// Parse a muscle-group tag as stored by the workout store.
    ///
    /// Unknown tags return None and are treated as untagged.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_lowercase().as_str() {
            "chest" => Some(MuscleGroup::Chest),
            "back" => Some(MuscleGroup::Back),
            "shoulders" | "shoulder" => Some(MuscleGroup::Shoulders),
            "arms" | "arm" => Some(MuscleGroup::Arms),
            "legs" | "leg" => Some(MuscleGroup::Legs),
            "core" | "abs" => Some(MuscleGroup::Core),
            "calisthenics" => Some(MuscleGroup::Calisthenics),
            "cardio" => Some(MuscleGroup::Cardio),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MuscleGroup::Chest => "Chest",
            MuscleGroup::Back => "Back",
            MuscleGroup::Shoulders => "Shoulders",
            MuscleGroup::Arms => "Arms",
            MuscleGroup::Legs => "Legs",
            MuscleGroup::Core => "Core",
            MuscleGroup::Calisthenics => "Calisthenics",
            MuscleGroup::Cardio => "Cardio",
        }
    }
}

impl fmt::Display for MuscleGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of classifying an exercise name
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Classification {
    pub category: ExerciseCategory,
    pub muscle_group: MuscleGroup,
}

// ============================================================================
// Workout Session Wire Format
// ============================================================================

/// One logged workout, as supplied by the workout store
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutSession {
    pub id: Uuid,
    pub date: NaiveDate,
    pub name: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub exercises: Vec<ExercisePerformance>,
}

/// An exercise performed within a session
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExercisePerformance {
    pub name: String,
    /// Muscle-group tag from the store; unknown tags are ignored
    #[serde(default, rename = "muscleGroup", alias = "muscle_group")]
    pub muscle_group: Option<String>,
    #[serde(default)]
    pub sets: Vec<LoggedSet>,
}

impl ExercisePerformance {
    /// Case-insensitive name match
    pub fn is_named(&self, name: &str) -> bool {
        self.name.trim().to_lowercase() == name.trim().to_lowercase()
    }

    pub fn muscle_group_tag(&self) -> Option<MuscleGroup> {
        self.muscle_group.as_deref().and_then(MuscleGroup::from_tag)
    }
}

/// A set in the store's shared shape.
///
/// Cardio reuses `reps` for duration in seconds and `weight` for distance in
/// kilometres. Read it only through [`LoggedSet::interpret`].
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct LoggedSet {
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub reps: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pace: Option<f64>,
}

impl LoggedSet {
    /// Read this set under the owning exercise's category
    pub fn interpret(&self, category: ExerciseCategory) -> SetEntry {
        match category {
            ExerciseCategory::Strength => SetEntry::Strength {
                weight_kg: self.weight,
                reps: self.reps,
            },
            ExerciseCategory::Calisthenics => SetEntry::Calisthenics { reps: self.reps },
            ExerciseCategory::Cardio => SetEntry::Cardio {
                duration_secs: self.reps,
                distance_km: self.weight,
                pace: self.pace,
            },
        }
    }
}

/// A set with its category-specific meaning made explicit
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SetEntry {
    Strength { weight_kg: f64, reps: u32 },
    Calisthenics { reps: u32 },
    Cardio {
        duration_secs: u32,
        distance_km: f64,
        /// Precomputed pace from the store, minutes per kilometre
        pace: Option<f64>,
    },
}

// ============================================================================
// Derived Metrics
// ============================================================================

/// Best values from one session for one exercise
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionMetric {
    Strength { max_weight_kg: f64, reps_at_max: u32 },
    Calisthenics { max_reps: u32 },
    Cardio {
        max_duration_secs: u32,
        max_distance_km: f64,
        /// Minutes per kilometre, absent when duration or distance is zero
        pace: Option<f64>,
    },
}

impl SessionMetric {
    /// The value records are ranked by: weight, reps, or pace
    pub fn primary_value(&self) -> Option<f64> {
        match self {
            SessionMetric::Strength { max_weight_kg, .. } => Some(*max_weight_kg),
            SessionMetric::Calisthenics { max_reps } => Some(f64::from(*max_reps)),
            SessionMetric::Cardio { pace, .. } => *pace,
        }
    }
}

/// A best value and the date it was first reached
#[derive(Clone, Copy, Debug, Serialize, PartialEq)]
pub struct Achieved<T> {
    pub value: T,
    pub date: NaiveDate,
}

/// Category-specific bests across a whole history
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BestMetric {
    Strength {
        max_weight: Option<Achieved<f64>>,
        reps_at_max: Option<u32>,
    },
    Calisthenics {
        max_reps: Option<Achieved<u32>>,
    },
    Cardio {
        max_duration: Option<Achieved<u32>>,
        max_distance: Option<Achieved<f64>>,
        best_pace: Option<Achieved<f64>>,
    },
}

impl BestMetric {
    pub fn empty(category: ExerciseCategory) -> Self {
        match category {
            ExerciseCategory::Strength => BestMetric::Strength {
                max_weight: None,
                reps_at_max: None,
            },
            ExerciseCategory::Calisthenics => BestMetric::Calisthenics { max_reps: None },
            ExerciseCategory::Cardio => BestMetric::Cardio {
                max_duration: None,
                max_distance: None,
                best_pace: None,
            },
        }
    }
}

/// Aggregate statistics for one exercise across all sessions
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ExerciseStats {
    /// Name as first seen in the history
    pub name: String,
    pub category: ExerciseCategory,
    pub muscle_group: MuscleGroup,
    pub best: BestMetric,
    pub total_sets: usize,
    pub session_count: usize,
    pub last_performed: Option<NaiveDate>,
}

impl ExerciseStats {
    /// Statistics for an exercise with no logged history
    pub fn empty(name: &str, classification: Classification) -> Self {
        Self {
            name: name.trim().to_string(),
            category: classification.category,
            muscle_group: classification.muscle_group,
            best: BestMetric::empty(classification.category),
            total_sets: 0,
            session_count: 0,
            last_performed: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.session_count == 0
    }

    /// Value the statistics view sorts by: weight, reps, or pace
    pub fn primary_value(&self) -> Option<f64> {
        match &self.best {
            BestMetric::Strength { max_weight, .. } => max_weight.map(|a| a.value),
            BestMetric::Calisthenics { max_reps } => max_reps.map(|a| f64::from(a.value)),
            BestMetric::Cardio { best_pace, .. } => best_pace.map(|a| a.value),
        }
    }
}

// ============================================================================
// History Types
// ============================================================================

/// Display order for a history view
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    NewestFirst,
    OldestFirst,
}

/// One session's worth of history for a single exercise
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct HistoryEntry {
    pub session_id: Uuid,
    pub date: NaiveDate,
    pub session_name: String,
    pub metric: Option<SessionMetric>,
    pub is_personal_record: bool,
    pub sets: Vec<SetEntry>,
}

impl HistoryEntry {
    pub fn value(&self) -> Option<f64> {
        self.metric.as_ref().and_then(SessionMetric::primary_value)
    }
}

/// Summary line for an exercise history
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ProgressSummary {
    pub total_sessions: usize,
    pub best_performance: Option<f64>,
    pub average_performance: Option<f64>,
    pub progress_percentage: f64,
}

// ============================================================================
// Personal Records
// ============================================================================

/// A user-curated personal record holding an estimated 1RM
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PersonalRecord {
    pub id: Uuid,
    pub owner: String,
    #[serde(rename = "exerciseName", alias = "exercise_name")]
    pub exercise_name: String,
    /// Estimated one-rep max in kilograms
    #[serde(rename = "weight")]
    pub weight_kg: f64,
    pub date: NaiveDate,
}

impl PersonalRecord {
    pub fn is_for(&self, owner: &str, exercise: &str) -> bool {
        self.owner == owner
            && self.exercise_name.trim().to_lowercase() == exercise.trim().to_lowercase()
    }
}
