//! Session identity resolution — the sole gate in front of every meal
//! operation.
//!
//! A session is nothing more than possession of an opaque token; the
//! resolver checks the token against the registered users and refuses
//! everything else. Registration is exempt and instead issues (or, trust
//! on first use, reuses) a token for the caller to carry from then on.

use std::time::Duration;

use uuid::Uuid;

use crate::error::{DietlogError, Result};
use crate::storage::StorageBackend;

/// How long the boundary layer should keep the session cookie alive.
pub const SESSION_TTL: Duration = Duration::from_secs(60 * 60 * 24 * 7);

/// A session token that has been checked against storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionId(pub Uuid);

/// Token to hand back to a registering caller.
#[derive(Debug, Clone, Copy)]
pub struct IssuedToken {
    pub token: Uuid,
    /// Whether the token was freshly minted, in which case the boundary
    /// must propagate it back to the caller with [`SESSION_TTL`].
    pub is_new: bool,
}

/// Reuse a presented token for registration, or mint a fresh one.
pub fn issue_or_reuse(presented: Option<Uuid>) -> IssuedToken {
    match presented {
        Some(token) => IssuedToken {
            token,
            is_new: false,
        },
        None => IssuedToken {
            token: Uuid::new_v4(),
            is_new: true,
        },
    }
}

/// Resolve the caller's presented token to a session identity.
///
/// Absent tokens and tokens no registered user carries both fail with
/// `Unauthorized`; the message deliberately does not distinguish the two.
pub async fn resolve<S: StorageBackend>(
    storage: &S,
    presented: Option<Uuid>,
) -> Result<SessionId> {
    let token = presented
        .ok_or_else(|| DietlogError::Unauthorized("Unauthorized.".into()))?;

    if !storage.session_exists(token).await? {
        return Err(DietlogError::Unauthorized("Unauthorized.".into()));
    }

    Ok(SessionId(token))
}
