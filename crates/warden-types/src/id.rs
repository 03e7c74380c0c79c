//! Identifier types for warden.
//!
//! All identifiers are UUID-based so they are safe to transmit across
//! processes and to log without leaking ordering information.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier for a [`Principal`](crate::Principal) of the `User` kind.
///
/// # Why No Default?
///
/// `Default` is intentionally NOT implemented. A random identity is
/// never a sensible fallback for an actor: silently minting one would
/// turn a missing-identity bug into a phantom user. Construct
/// explicitly with [`PrincipalId::new`] or [`PrincipalId::from_uuid`].
///
/// # Example
///
/// ```
/// use warden_types::PrincipalId;
///
/// let id = PrincipalId::new();
/// assert!(format!("{id}").starts_with("principal:"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrincipalId(pub Uuid);

impl PrincipalId {
    /// Creates a new random principal identifier (UUID v4).
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID, e.g. one loaded from an identity store.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "principal:{}", self.0)
    }
}

/// Identifier for a session handle.
///
/// The session store itself is an external collaborator; warden only
/// carries the identifier so contexts and audit logs can reference it.
///
/// # Example
///
/// ```
/// use warden_types::SessionId;
///
/// let id = SessionId::new();
/// assert!(format!("{id}").starts_with("session:"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Creates a new random session identifier (UUID v4).
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID, e.g. one issued by the session store.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "session:{}", self.0)
    }
}
