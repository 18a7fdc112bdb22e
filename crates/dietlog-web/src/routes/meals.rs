use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::routing::get;
use axum::Router;
use axum_extra::extract::cookie::CookieJar;
use dietlog_core::model::{parse_date_time, Meal, MealUpdate, NewMeal};
use dietlog_core::streak::MealSummary;
use serde::{Deserialize, Deserializer};
use uuid::Uuid;

use crate::error::{ApiError, ApiJson};
use crate::routes::session_token;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/meals", get(list_meals).post(create_meal))
        .route("/meals/summary", get(summary))
        .route(
            "/meals/{id}",
            get(get_meal).put(update_meal).delete(delete_meal),
        )
}

// -- Request types --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CreateMealRequest {
    name: String,
    description: Option<String>,
    #[serde(rename = "dateTime")]
    date_time: String,
    #[serde(rename = "isOnDiet")]
    is_on_diet: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct UpdateMealRequest {
    name: Option<String>,
    // Presence vs. explicit null: a missing field leaves the description
    // alone, `"description": null` clears it.
    #[serde(default, deserialize_with = "double_option")]
    description: Option<Option<String>>,
    #[serde(rename = "dateTime")]
    date_time: Option<String>,
    #[serde(rename = "isOnDiet")]
    is_on_diet: Option<bool>,
}

fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

fn parse_body<T: serde::de::DeserializeOwned>(body: serde_json::Value) -> Result<T, ApiError> {
    serde_json::from_value(body).map_err(|e| {
        ApiError::bad_request("Invalid input").with_errors(serde_json::json!([e.to_string()]))
    })
}

// -- Response types --

#[derive(Debug, serde::Serialize)]
struct MealListResponse {
    meals: Vec<Meal>,
}

// -- Handlers --

async fn list_meals(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Json<MealListResponse>, ApiError> {
    let meals = state.service.list_meals(session_token(&jar)).await?;
    Ok(Json(MealListResponse { meals }))
}

async fn create_meal(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    ApiJson(body): ApiJson<serde_json::Value>,
) -> Result<impl IntoResponse, ApiError> {
    // Identity first: an unauthorized caller learns nothing about how
    // the payload would have been judged.
    let token = session_token(&jar);
    state.service.authorize(token).await?;

    let input: CreateMealRequest = parse_body(body)?;
    let date_time = parse_date_time(&input.date_time)?;

    state
        .service
        .create_meal(
            token,
            NewMeal {
                name: input.name,
                description: input.description,
                date_time,
                is_on_diet: input.is_on_diet,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "message": "Meal created successfully." })),
    ))
}

async fn get_meal(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Path(id): Path<Uuid>,
) -> Result<Json<Meal>, ApiError> {
    let meal = state.service.get_meal(session_token(&jar), id).await?;
    Ok(Json(meal))
}

async fn update_meal(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Path(id): Path<Uuid>,
    ApiJson(body): ApiJson<serde_json::Value>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let token = session_token(&jar);
    state.service.authorize(token).await?;

    let input: UpdateMealRequest = parse_body(body)?;

    let update = MealUpdate {
        name: input.name,
        description: input.description,
        date_time: input.date_time.as_deref().map(parse_date_time).transpose()?,
        is_on_diet: input.is_on_diet,
    };

    state.service.update_meal(token, id, update).await?;

    Ok(Json(serde_json::json!({ "message": "Meal updated successfully." })))
}

async fn delete_meal(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.service.delete_meal(session_token(&jar), id).await?;
    Ok(Json(serde_json::json!({ "message": "Meal deleted successfully." })))
}

async fn summary(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Json<MealSummary>, ApiError> {
    let summary = state.service.summary(session_token(&jar)).await?;
    Ok(Json(summary))
}
