use chrono::{TimeZone, Utc};
use uuid::Uuid;

use crate::error::DietlogError;
use crate::model::*;

#[test]
fn test_meal_creation() {
    let session_id = Uuid::new_v4();
    let meal = Meal::new(
        session_id,
        NewMeal {
            name: "Lunch".to_string(),
            description: Some("Rice and beans".to_string()),
            date_time: Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
            is_on_diet: true,
        },
    );

    assert_eq!(meal.session_id, session_id);
    assert_eq!(meal.name, "Lunch");
    assert_eq!(meal.description.as_deref(), Some("Rice and beans"));
    assert!(meal.is_on_diet);
    assert_eq!(meal.created_at, meal.updated_at);
}

#[test]
fn test_meal_wire_field_names() {
    let meal = Meal::new(
        Uuid::new_v4(),
        NewMeal {
            name: "Dinner".to_string(),
            description: None,
            date_time: Utc::now(),
            is_on_diet: false,
        },
    );

    let json = serde_json::to_value(&meal).unwrap();
    assert!(json.get("dateTime").is_some());
    assert!(json.get("isOnDiet").is_some());
    assert!(json.get("session_id").is_some());
    assert!(json.get("date_time").is_none());
}

#[test]
fn test_username_length_bounds() {
    assert!(validate_username("al").is_err());
    assert!(validate_username("alice").is_ok());
    assert!(validate_username(&"a".repeat(USERNAME_MAX_LENGTH)).is_ok());
    assert!(validate_username(&"a".repeat(USERNAME_MAX_LENGTH + 1)).is_err());
}

#[test]
fn test_meal_name_cannot_be_empty() {
    assert!(validate_meal_name("Lunch").is_ok());
    assert!(matches!(
        validate_meal_name("   "),
        Err(DietlogError::InvalidInput(_))
    ));
}

#[test]
fn test_parse_date_time_accepts_iso8601() {
    let dt = parse_date_time("2024-01-01T12:00:00Z").unwrap();
    assert_eq!(dt, Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap());

    // Offset forms normalize to UTC.
    let dt = parse_date_time("2024-01-01T09:00:00-03:00").unwrap();
    assert_eq!(dt, Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap());
}

#[test]
fn test_parse_date_time_rejects_garbage() {
    let err = parse_date_time("not-a-date").unwrap_err();
    assert!(matches!(err, DietlogError::InvalidInput(_)));
    assert!(err.to_string().contains("ISO 8601"));
}

#[test]
fn test_meal_update_emptiness() {
    assert!(MealUpdate::default().is_empty());

    let update = MealUpdate {
        description: Some(None),
        ..Default::default()
    };
    assert!(!update.is_empty());
}
