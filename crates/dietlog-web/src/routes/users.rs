use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::routing::post;
use axum::Router;
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Deserialize;

use crate::error::{ApiError, ApiJson};
use crate::routes::{session_token, SESSION_COOKIE};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/users", post(create_user))
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CreateUserRequest {
    username: String,
}

async fn create_user(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    ApiJson(body): ApiJson<serde_json::Value>,
) -> Result<impl IntoResponse, ApiError> {
    let input: CreateUserRequest = serde_json::from_value(body).map_err(|e| {
        ApiError::bad_request("Invalid input").with_errors(serde_json::json!([e.to_string()]))
    })?;

    let issued = state
        .service
        .register(session_token(&jar), &input.username)
        .await?;

    // A fresh token rides back on the cookie for all future requests.
    let jar = if issued.is_new {
        let max_age = time::Duration::try_from(dietlog_core::session::SESSION_TTL)
            .unwrap_or(time::Duration::days(7));
        jar.add(
            Cookie::build((SESSION_COOKIE, issued.token.to_string()))
                .path("/")
                .max_age(max_age)
                .build(),
        )
    } else {
        jar
    };

    Ok((
        StatusCode::CREATED,
        jar,
        Json(serde_json::json!({ "message": "User created successfully." })),
    ))
}
