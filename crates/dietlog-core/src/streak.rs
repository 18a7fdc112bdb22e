//! Streak analysis — diet-adherence statistics over an ordered meal list.
//!
//! The summary is computed in a single pass over the meals exactly as the
//! repository returned them. Order matters: the longest on-diet run is a
//! property of the recorded sequence, so this module never sorts or
//! deduplicates its input.

use serde::Serialize;

use crate::model::Meal;

/// Diet-adherence summary for one session's meals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealSummary {
    pub total_meals: usize,
    pub meals_on_diet: usize,
    pub meals_not_on_diet: usize,
    pub best_sequence_on_diet: usize,
}

/// Reduce an ordered meal list to its adherence summary.
///
/// Runs in O(n) time and O(1) extra space: a running counter grows on
/// each on-diet meal and resets on each off-diet meal, while a maximum
/// tracks the best run seen. An empty input yields the all-zero summary.
pub fn summarize(meals: &[Meal]) -> MealSummary {
    let mut summary = MealSummary {
        total_meals: meals.len(),
        ..Default::default()
    };

    let mut current = 0usize;
    for meal in meals {
        if meal.is_on_diet {
            summary.meals_on_diet += 1;
            current += 1;
            summary.best_sequence_on_diet = summary.best_sequence_on_diet.max(current);
        } else {
            summary.meals_not_on_diet += 1;
            current = 0;
        }
    }

    summary
}
