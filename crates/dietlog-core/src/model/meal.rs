use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DietlogError, Result};

/// A recorded meal, owned by exactly one session.
///
/// Wire field names follow the public API: `dateTime` and `isOnDiet`
/// are camelCase, the system-managed columns stay snake_case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    pub id: Uuid,
    pub session_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "dateTime")]
    pub date_time: DateTime<Utc>,
    #[serde(rename = "isOnDiet")]
    pub is_on_diet: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Meal {
    pub fn new(session_id: Uuid, input: NewMeal) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            session_id,
            name: input.name,
            description: input.description,
            date_time: input.date_time,
            is_on_diet: input.is_on_diet,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Validated fields for creating a meal.
#[derive(Debug, Clone)]
pub struct NewMeal {
    pub name: String,
    pub description: Option<String>,
    pub date_time: DateTime<Utc>,
    pub is_on_diet: bool,
}

/// Partial update for a meal. The outer `Option` marks field presence;
/// for `description` the inner `Option` distinguishes setting a value
/// from clearing it to null.
#[derive(Debug, Clone, Default)]
pub struct MealUpdate {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub date_time: Option<DateTime<Utc>>,
    pub is_on_diet: Option<bool>,
}

impl MealUpdate {
    /// An update must touch at least one field.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.date_time.is_none()
            && self.is_on_diet.is_none()
    }
}

/// Validate a meal name: required, non-empty text.
pub fn validate_meal_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(DietlogError::InvalidInput(
            "name cannot be empty".into(),
        ));
    }
    Ok(())
}

/// Parse an ISO-8601 date-time string into UTC.
pub fn parse_date_time(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| DietlogError::InvalidInput("Invalid date format. Use ISO 8601.".into()))
}
