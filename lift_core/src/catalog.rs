//! Reference exercise catalogue and classification tables.
//!
//! The tables here are ordered; classification walks them front to back so
//! the same name always resolves the same way.

use crate::types::MuscleGroup;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// A known exercise and the group it belongs to
#[derive(Clone, Debug)]
pub struct CatalogEntry {
    pub name: &'static str,
    pub muscle_group: MuscleGroup,
}

/// Ordered reference catalogue with an exact-name index
#[derive(Clone, Debug)]
pub struct ExerciseCatalog {
    entries: Vec<CatalogEntry>,
    by_name: HashMap<String, usize>,
}

impl ExerciseCatalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        let mut by_name = HashMap::new();
        for (idx, entry) in entries.iter().enumerate() {
            // First entry wins on duplicate names
            by_name.entry(entry.name.to_lowercase()).or_insert(idx);
        }
        Self { entries, by_name }
    }

    /// Exact, case-insensitive lookup
    pub fn exact(&self, name: &str) -> Option<&CatalogEntry> {
        self.by_name
            .get(&name.trim().to_lowercase())
            .map(|idx| &self.entries[*idx])
    }

    /// First entry (in catalogue order) whose name contains `name` or is
    /// contained in it, case-insensitively.
    pub fn fuzzy(&self, name: &str) -> Option<&CatalogEntry> {
        let needle = name.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        self.entries.iter().find(|entry| {
            let candidate = entry.name.to_lowercase();
            candidate.contains(&needle) || needle.contains(&candidate)
        })
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Cached default catalogue
static DEFAULT_CATALOG: Lazy<ExerciseCatalog> = Lazy::new(build_default_catalog);

/// Get a reference to the cached default catalogue
pub fn get_default_catalog() -> &'static ExerciseCatalog {
    &DEFAULT_CATALOG
}

/// Keyword fallback, checked group by group in this order.
///
/// Keywords are compared against whole words of the exercise name after a
/// trailing plural "s" is dropped from the word.
pub const KEYWORD_TABLE: [(MuscleGroup, &[&str]); 7] = [
    (
        MuscleGroup::Chest,
        &["bench", "chest", "pec", "fly", "flye", "incline", "decline"],
    ),
    (
        MuscleGroup::Back,
        &["row", "pulldown", "lat", "deadlift", "back", "shrug", "pullover"],
    ),
    (
        MuscleGroup::Shoulders,
        &["shoulder", "overhead", "lateral", "military", "delt", "raise"],
    ),
    (
        MuscleGroup::Arms,
        &["curl", "bicep", "tricep", "skullcrusher", "arm", "pushdown", "forearm"],
    ),
    (
        MuscleGroup::Legs,
        &["squat", "leg", "lunge", "calf", "calve", "glute", "hamstring", "quad", "hip", "thrust"],
    ),
    (
        MuscleGroup::Core,
        &["ab", "core", "plank", "crunch", "situp", "oblique", "twist"],
    ),
    (
        MuscleGroup::Cardio,
        &["run", "jog", "cycle", "bike", "swim", "cardio", "treadmill"],
    ),
];

/// Group used when nothing else matches
pub const DEFAULT_MUSCLE_GROUP: MuscleGroup = MuscleGroup::Chest;

/// Words that mark an exercise name as cardio on their own
pub const CARDIO_VOCABULARY: &[&str] = &[
    "running",
    "run",
    "jogging",
    "jog",
    "cycling",
    "bike",
    "biking",
    "spinning",
    "swimming",
    "swim",
    "rowing",
    "elliptical",
    "treadmill",
    "sprint",
    "hiking",
    "stairmaster",
    "cardio",
];

fn entry(name: &'static str, muscle_group: MuscleGroup) -> CatalogEntry {
    CatalogEntry { name, muscle_group }
}

/// Builds the default reference catalogue
pub fn build_default_catalog() -> ExerciseCatalog {
    use MuscleGroup::*;

    ExerciseCatalog::new(vec![
        // Chest
        entry("Bench Press", Chest),
        entry("Incline Bench Press", Chest),
        entry("Decline Bench Press", Chest),
        entry("Dumbbell Fly", Chest),
        entry("Chest Press", Chest),
        entry("Cable Crossover", Chest),
        entry("Pec Deck", Chest),
        // Back
        entry("Deadlift", Back),
        entry("Barbell Row", Back),
        entry("Lat Pulldown", Back),
        entry("Seated Cable Row", Back),
        entry("T-Bar Row", Back),
        entry("Shrug", Back),
        // Shoulders
        entry("Overhead Press", Shoulders),
        entry("Military Press", Shoulders),
        entry("Arnold Press", Shoulders),
        entry("Lateral Raise", Shoulders),
        entry("Front Raise", Shoulders),
        entry("Face Pull", Shoulders),
        // Arms
        entry("Bicep Curl", Arms),
        entry("Hammer Curl", Arms),
        entry("Preacher Curl", Arms),
        entry("Tricep Pushdown", Arms),
        entry("Tricep Extension", Arms),
        entry("Skull Crusher", Arms),
        // Legs
        entry("Squat", Legs),
        entry("Front Squat", Legs),
        entry("Romanian Deadlift", Legs),
        entry("Leg Press", Legs),
        entry("Leg Curl", Legs),
        entry("Leg Extension", Legs),
        entry("Lunge", Legs),
        entry("Calf Raise", Legs),
        entry("Hip Thrust", Legs),
        // Core
        entry("Plank", Core),
        entry("Crunch", Core),
        entry("Russian Twist", Core),
        entry("Ab Wheel Rollout", Core),
        entry("Cable Crunch", Core),
        // Calisthenics
        entry("Pull-up", Calisthenics),
        entry("Chin-up", Calisthenics),
        entry("Push-up", Calisthenics),
        entry("Dips", Calisthenics),
        entry("Muscle-up", Calisthenics),
        entry("Pistol Squat", Calisthenics),
        entry("Handstand Push-up", Calisthenics),
        entry("Burpee", Calisthenics),
        // Cardio
        entry("Running", Cardio),
        entry("Cycling", Cardio),
        entry("Swimming", Cardio),
        entry("Rowing Machine", Cardio),
        entry("Jump Rope", Cardio),
        entry("Elliptical", Cardio),
    ])
}
