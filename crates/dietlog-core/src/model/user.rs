use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DietlogError, Result};

pub const USERNAME_MIN_LENGTH: usize = 3;
pub const USERNAME_MAX_LENGTH: usize = 30;

/// A registered session: one username bound to one opaque session token.
///
/// The token is the sole capability required to access the session's
/// meals; there is no password and no separate access-control list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub session_id: Uuid,
    pub username: String,
}

impl User {
    pub fn new(session_id: Uuid, username: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            session_id,
            username,
        }
    }
}

/// Validate a username for registration.
pub fn validate_username(username: &str) -> Result<()> {
    let len = username.chars().count();
    if len < USERNAME_MIN_LENGTH || len > USERNAME_MAX_LENGTH {
        return Err(DietlogError::InvalidInput(format!(
            "username must be between {USERNAME_MIN_LENGTH} and {USERNAME_MAX_LENGTH} characters"
        )));
    }
    Ok(())
}
