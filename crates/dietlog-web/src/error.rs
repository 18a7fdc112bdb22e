use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use dietlog_core::DietlogError;

/// JSON API error: `{ "message": ..., "errors": [...] }`, the `errors`
/// array only when field-level detail exists.
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub errors: Option<serde_json::Value>,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            errors: None,
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, msg)
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, msg)
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, msg)
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, msg)
    }

    pub fn with_errors(mut self, errors: serde_json::Value) -> Self {
        self.errors = Some(errors);
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = serde_json::json!({ "message": self.message });
        if let Some(errors) = self.errors {
            body["errors"] = errors;
        }
        (self.status, Json(body)).into_response()
    }
}

/// `Json` extractor whose rejection keeps the `{ message, errors }`
/// shape instead of axum's plain-text default, so a body that is not
/// valid JSON gets the same 400 envelope as every other bad payload.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(ApiError::bad_request("Invalid input")
                .with_errors(serde_json::json!([rejection.body_text()]))),
        }
    }
}

impl From<DietlogError> for ApiError {
    fn from(err: DietlogError) -> Self {
        match &err {
            DietlogError::NotFound(msg) => Self::not_found(msg.clone()),
            DietlogError::InvalidInput(msg) => Self::bad_request(msg.clone()),
            DietlogError::Unauthorized(msg) => Self::unauthorized(msg.clone()),
            DietlogError::Conflict(msg) => Self::conflict(msg.clone()),
            _ => {
                // Unexpected storage or system failure. Log it, report
                // generically, no retry.
                tracing::error!("api error: {err}");
                Self::internal("Internal server error.")
            }
        }
    }
}
