//! Exercise suggestions from the recorded counters

use crate::counters::RegionCounters;
use crate::region::Category;

/// Counters strictly above this value trigger suggestions
pub const SUGGESTION_THRESHOLD: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exercise {
    pub name: &'static str,
    pub targets: Category,
}

const NECK_EXERCISES: &[&str] = &["Neck rotation", "Chin tuck", "Side stretch"];
const BACK_EXERCISES: &[&str] = &["Cat-cow stretch", "Child pose"];
const EYE_EXERCISES: &[&str] = &["20-20-20 rule", "Eye blinking"];

fn exercises_for(category: Category) -> &'static [&'static str] {
    match category {
        Category::Neck => NECK_EXERCISES,
        Category::Back => BACK_EXERCISES,
        Category::EyeStrain => EYE_EXERCISES,
    }
}

/// Exercises for every category whose counter is above the threshold,
/// in neck, back, eye order
pub fn recommended_exercises(counters: &RegionCounters) -> Vec<Exercise> {
    counters
        .iter()
        .filter(|&(_, value)| value > SUGGESTION_THRESHOLD)
        .flat_map(|(category, _)| {
            exercises_for(category)
                .iter()
                .map(move |&name| Exercise { name, targets: category })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(exercises: &[Exercise]) -> Vec<&'static str> {
        exercises.iter().map(|e| e.name).collect()
    }

    #[test]
    fn test_nothing_at_or_below_threshold() {
        let mut counters = RegionCounters::default();
        for category in Category::ALL {
            counters.set(category, 5);
        }
        assert!(recommended_exercises(&counters).is_empty());
    }

    #[test]
    fn test_single_category() {
        let mut counters = RegionCounters::default();
        counters.set(Category::EyeStrain, 6);
        let exercises = recommended_exercises(&counters);
        assert_eq!(names(&exercises), vec!["20-20-20 rule", "Eye blinking"]);
        assert!(exercises.iter().all(|e| e.targets == Category::EyeStrain));
    }

    #[test]
    fn test_all_categories_in_order() {
        let mut counters = RegionCounters::default();
        for category in Category::ALL {
            counters.set(category, 10);
        }
        assert_eq!(
            names(&recommended_exercises(&counters)),
            vec![
                "Neck rotation",
                "Chin tuck",
                "Side stretch",
                "Cat-cow stretch",
                "Child pose",
                "20-20-20 rule",
                "Eye blinking",
            ]
        );
    }
}
