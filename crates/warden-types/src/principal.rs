//! Principal (actor identity) types.
//!
//! A [`Principal`] represents the actor on whose behalf an intercepted
//! call runs, separating "who is acting" from "what they are allowed
//! to do". Permission checking lives in `warden-auth`; this module is
//! pure identity so it can sit at the bottom of the dependency graph.

use crate::PrincipalId;
use serde::{Deserialize, Serialize};

/// The actor on whose behalf a call executes.
///
/// # Variants
///
/// | Variant | Description | Typical Use |
/// |---------|-------------|-------------|
/// | `User` | Authenticated human user | Interactive requests |
/// | `Service` | Named machine caller | Service-to-service calls |
/// | `System` | Internal operations | Lifecycle, maintenance |
///
/// # Example
///
/// ```
/// use warden_types::{Principal, PrincipalId};
///
/// let user = Principal::User(PrincipalId::new());
/// assert!(user.is_user());
///
/// let batch = Principal::Service("billing-batch".to_string());
/// assert!(batch.is_service());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Principal {
    /// Human user identified by [`PrincipalId`].
    User(PrincipalId),
    /// Machine caller identified by a stable service name.
    Service(String),
    /// System internal operations not attributable to a user or service.
    System,
}

impl Principal {
    /// Returns `true` if this is a [`Principal::User`].
    #[must_use]
    pub fn is_user(&self) -> bool {
        matches!(self, Self::User(_))
    }

    /// Returns `true` if this is a [`Principal::Service`].
    #[must_use]
    pub fn is_service(&self) -> bool {
        matches!(self, Self::Service(_))
    }

    /// Returns `true` if this is [`Principal::System`].
    #[must_use]
    pub fn is_system(&self) -> bool {
        matches!(self, Self::System)
    }

    /// Returns the [`PrincipalId`] if this is a User, otherwise `None`.
    #[must_use]
    pub fn user_id(&self) -> Option<&PrincipalId> {
        match self {
            Self::User(id) => Some(id),
            _ => None,
        }
    }
}

impl std::fmt::Display for Principal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User(id) => write!(f, "user:{}", id.uuid()),
            Self::Service(name) => write!(f, "service:{name}"),
            Self::System => write!(f, "system"),
        }
    }
}

/// An ordered collection of principals attached to one caller.
///
/// Most callers carry exactly one principal, but federated identities
/// may carry several (e.g. a user id plus a directory account). The
/// first entry is the primary principal.
///
/// An empty set is a legitimate state: it represents an anonymous
/// (guest) caller. There is deliberately no `Default` that conjures a
/// principal out of thin air; [`PrincipalSet::empty`] is explicit.
///
/// # Example
///
/// ```
/// use warden_types::{Principal, PrincipalId, PrincipalSet};
///
/// let guest = PrincipalSet::empty();
/// assert!(guest.is_empty());
/// assert!(guest.primary().is_none());
///
/// let user = Principal::User(PrincipalId::new());
/// let set = PrincipalSet::single(user.clone());
/// assert_eq!(set.primary(), Some(&user));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrincipalSet {
    principals: Vec<Principal>,
}

impl PrincipalSet {
    /// Creates an empty (anonymous) principal set.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            principals: Vec::new(),
        }
    }

    /// Creates a set holding a single principal.
    #[must_use]
    pub fn single(principal: Principal) -> Self {
        Self {
            principals: vec![principal],
        }
    }

    /// Creates a set from an ordered list of principals.
    #[must_use]
    pub fn from_vec(principals: Vec<Principal>) -> Self {
        Self { principals }
    }

    /// Returns the primary (first) principal, or `None` when anonymous.
    #[must_use]
    pub fn primary(&self) -> Option<&Principal> {
        self.principals.first()
    }

    /// Returns `true` if no principal is attached (anonymous caller).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.principals.is_empty()
    }

    /// Returns the number of attached principals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.principals.len()
    }

    /// Iterates over all principals in order.
    pub fn iter(&self) -> impl Iterator<Item = &Principal> {
        self.principals.iter()
    }
}

impl std::fmt::Display for PrincipalSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.primary() {
            Some(primary) if self.len() == 1 => write!(f, "{primary}"),
            Some(primary) => write!(f, "{primary} (+{})", self.len() - 1),
            None => write!(f, "anonymous"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn principal_user() {
        let id = PrincipalId::new();
        let principal = Principal::User(id);

        assert!(principal.is_user());
        assert!(!principal.is_service());
        assert!(!principal.is_system());
        assert!(principal.user_id().is_some());
    }

    #[test]
    fn principal_service() {
        let principal = Principal::Service("billing".to_string());

        assert!(principal.is_service());
        assert!(!principal.is_user());
        assert!(principal.user_id().is_none());
    }

    #[test]
    fn principal_display() {
        let user = Principal::User(PrincipalId::new());
        assert!(format!("{user}").starts_with("user:"));

        let service = Principal::Service("billing".to_string());
        assert_eq!(format!("{service}"), "service:billing");

        assert_eq!(format!("{}", Principal::System), "system");
    }

    #[test]
    fn empty_set_is_anonymous() {
        let set = PrincipalSet::empty();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
        assert!(set.primary().is_none());
        assert_eq!(format!("{set}"), "anonymous");
    }

    #[test]
    fn single_set_primary() {
        let user = Principal::User(PrincipalId::new());
        let set = PrincipalSet::single(user.clone());
        assert_eq!(set.primary(), Some(&user));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn multi_set_preserves_order() {
        let first = Principal::User(PrincipalId::new());
        let second = Principal::Service("ldap".to_string());
        let set = PrincipalSet::from_vec(vec![first.clone(), second.clone()]);

        assert_eq!(set.primary(), Some(&first));
        let collected: Vec<_> = set.iter().cloned().collect();
        assert_eq!(collected, vec![first, second]);
    }

    #[test]
    fn multi_set_display_shows_extra_count() {
        let set = PrincipalSet::from_vec(vec![
            Principal::Service("a".to_string()),
            Principal::Service("b".to_string()),
        ]);
        assert_eq!(format!("{set}"), "service:a (+1)");
    }

    #[test]
    fn set_serde_roundtrip() {
        let set = PrincipalSet::single(Principal::User(PrincipalId::new()));
        let json = serde_json::to_string(&set).expect("serialize");
        let parsed: PrincipalSet = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, set);
    }
}
