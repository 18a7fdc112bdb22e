mod meal;
mod user;

#[cfg(test)]
mod tests;

pub use meal::{
    parse_date_time, validate_meal_name, Meal, MealUpdate, NewMeal,
};
pub use user::{validate_username, User, USERNAME_MAX_LENGTH, USERNAME_MIN_LENGTH};
