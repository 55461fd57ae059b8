//! Exercise classification.
//!
//! Resolution order for an untagged name:
//! 1. Cardio vocabulary
//! 2. Exact catalogue match
//! 3. Substring catalogue match
//! 4. Keyword table, in group precedence order
//! 5. [`DEFAULT_MUSCLE_GROUP`]

use crate::catalog::{
    get_default_catalog, ExerciseCatalog, CARDIO_VOCABULARY, DEFAULT_MUSCLE_GROUP, KEYWORD_TABLE,
};
use crate::types::{Classification, ExerciseCategory, MuscleGroup};

/// Classify an exercise against the default catalogue
pub fn classify(name: &str, explicit: Option<MuscleGroup>) -> Classification {
    classify_with(get_default_catalog(), name, explicit)
}

/// Classify an exercise against a specific catalogue
///
/// An explicit muscle-group tag from the workout store is trusted as-is.
pub fn classify_with(
    catalog: &ExerciseCatalog,
    name: &str,
    explicit: Option<MuscleGroup>,
) -> Classification {
    let muscle_group = match explicit {
        Some(group) => group,
        None if is_cardio_name(name) => MuscleGroup::Cardio,
        None => resolve_muscle_group(catalog, name),
    };

    Classification {
        category: category_for_group(muscle_group),
        muscle_group,
    }
}

/// Category implied by a resolved muscle group
pub fn category_for_group(group: MuscleGroup) -> ExerciseCategory {
    match group {
        MuscleGroup::Cardio => ExerciseCategory::Cardio,
        MuscleGroup::Calisthenics => ExerciseCategory::Calisthenics,
        _ => ExerciseCategory::Strength,
    }
}

/// True if any word of the name is in the cardio vocabulary
pub fn is_cardio_name(name: &str) -> bool {
    words(name)
        .iter()
        .any(|word| CARDIO_VOCABULARY.contains(&word.as_str()))
}

/// Resolve the muscle group for an untagged, non-cardio name
pub fn resolve_muscle_group(catalog: &ExerciseCatalog, name: &str) -> MuscleGroup {
    if let Some(entry) = catalog.exact(name) {
        return entry.muscle_group;
    }

    if let Some(entry) = catalog.fuzzy(name) {
        tracing::trace!("'{}' matched catalogue entry '{}'", name, entry.name);
        return entry.muscle_group;
    }

    let words = words(name);
    for (group, keywords) in KEYWORD_TABLE.iter() {
        if words.iter().any(|w| keywords.contains(&w.as_str())) {
            tracing::trace!("'{}' matched {} keyword", name, group);
            return *group;
        }
    }

    tracing::debug!(
        "No classification for '{}', defaulting to {}",
        name,
        DEFAULT_MUSCLE_GROUP
    );
    DEFAULT_MUSCLE_GROUP
}

/// Lowercase words of a name with a trailing plural "s" dropped
fn words(name: &str) -> Vec<String> {
    name.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| {
            let w = w.to_lowercase();
            if w.len() > 2 && w.ends_with('s') && !w.ends_with("ss") {
                w[..w.len() - 1].to_string()
            } else {
                w
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::build_default_catalog;

    fn group_of(name: &str) -> MuscleGroup {
        classify(name, None).muscle_group
    }

    #[test]
    fn test_catalogue_exact_match() {
        let c = classify("Bench Press", None);
        assert_eq!(c.category, ExerciseCategory::Strength);
        assert_eq!(c.muscle_group, MuscleGroup::Chest);
        assert_eq!(group_of("squat"), MuscleGroup::Legs);
    }

    #[test]
    fn test_cardio_vocabulary() {
        for name in ["Running", "Morning Run", "Indoor Cycling", "Swimming", "Hill Sprints"] {
            let c = classify(name, None);
            assert_eq!(c.category, ExerciseCategory::Cardio, "{}", name);
            assert_eq!(c.muscle_group, MuscleGroup::Cardio, "{}", name);
        }
    }

    #[test]
    fn test_cardio_vocabulary_needs_whole_words() {
        // "crunch" contains "run"; "row" is not cardio on its own
        assert_eq!(classify("Crunch", None).category, ExerciseCategory::Strength);
        assert_eq!(group_of("Upright Row"), MuscleGroup::Back);
    }

    #[test]
    fn test_calisthenics_from_catalogue() {
        let c = classify("Pull-up", None);
        assert_eq!(c.category, ExerciseCategory::Calisthenics);
        assert_eq!(c.muscle_group, MuscleGroup::Calisthenics);

        // Substring match onto a calisthenics entry
        assert_eq!(
            classify("Weighted Pull-up", None).category,
            ExerciseCategory::Calisthenics
        );
    }

    #[test]
    fn test_explicit_tag_wins() {
        let c = classify("Bench Press", Some(MuscleGroup::Calisthenics));
        assert_eq!(c.category, ExerciseCategory::Calisthenics);

        let c = classify("Sled Push", Some(MuscleGroup::Cardio));
        assert_eq!(c.category, ExerciseCategory::Cardio);

        let c = classify("Running", Some(MuscleGroup::Legs));
        assert_eq!(c.category, ExerciseCategory::Strength);
        assert_eq!(c.muscle_group, MuscleGroup::Legs);
    }

    #[test]
    fn test_substring_match() {
        assert_eq!(group_of("Cable Lateral Raise"), MuscleGroup::Shoulders);
        assert_eq!(group_of("Paused Bench Press"), MuscleGroup::Chest);
    }

    #[test]
    fn test_keyword_fallback() {
        assert_eq!(group_of("Incline Dumbbell Press"), MuscleGroup::Chest);
        assert_eq!(group_of("Zottman Curls"), MuscleGroup::Arms);
        assert_eq!(group_of("Nordic Hamstring Drop"), MuscleGroup::Legs);
        assert_eq!(group_of("Hanging Obliques"), MuscleGroup::Core);
    }

    #[test]
    fn test_keyword_precedence_is_table_order() {
        // Both "chest" and "shoulder" keywords: chest comes first
        assert_eq!(group_of("Chest And Shoulder Thing"), MuscleGroup::Chest);
        // Both "lat" (back) and "leg" (legs): back comes first
        assert_eq!(group_of("Trap Bar Leg Drive Lat"), MuscleGroup::Back);
    }

    #[test]
    fn test_default_group() {
        let c = classify("Mystery Movement", None);
        assert_eq!(c.muscle_group, MuscleGroup::Chest);
        assert_eq!(c.category, ExerciseCategory::Strength);
        assert_eq!(group_of(""), MuscleGroup::Chest);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let catalog = build_default_catalog();
        let names = ["Paused Bench Press", "Zottman Curls", "Mystery Movement", "Pull-up"];
        for name in names {
            let first = classify_with(&catalog, name, None);
            for _ in 0..20 {
                assert_eq!(classify_with(&build_default_catalog(), name, None), first);
            }
        }
    }

    #[test]
    fn test_words_strip_plurals() {
        assert_eq!(words("Tricep Pushdowns"), vec!["tricep", "pushdown"]);
        assert_eq!(words("Leg Press"), vec!["leg", "press"]);
        assert_eq!(words("Abs"), vec!["ab"]);
    }
}
