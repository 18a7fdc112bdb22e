mod meals;
mod users;

use std::sync::Arc;

use axum::Router;
use axum_extra::extract::cookie::CookieJar;
use uuid::Uuid;

use crate::AppState;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "sessionId";

pub fn router() -> Router<Arc<AppState>> {
    Router::new().merge(users::routes()).merge(meals::routes())
}

/// Read the session token from the cookie jar, if one is carried and
/// well-formed. Garbage cookie values count as no token at all.
pub(crate) fn session_token(jar: &CookieJar) -> Option<Uuid> {
    jar.get(SESSION_COOKIE).and_then(|c| c.value().parse().ok())
}
