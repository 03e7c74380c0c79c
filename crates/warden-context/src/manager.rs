//! The security-manager and session boundaries.
//!
//! The actual permission store and the session backend live outside
//! this crate; [`SecurityManager`] and [`Session`] pin down the only
//! surface the context layer needs from them.

use std::sync::Arc;
use warden_types::{PrincipalSet, SessionId};

/// The authority that answers permission and role questions for a
/// principal set, and mints sessions.
///
/// One manager instance serves many contexts; it is shared as
/// `Arc<dyn SecurityManager>` and must be safe to query concurrently.
/// How it matches permission expressions (wildcards, hierarchies) is
/// entirely its own business.
pub trait SecurityManager: Send + Sync {
    /// Returns `true` if `principals` holds the given permission.
    fn is_permitted(&self, principals: &PrincipalSet, permission: &str) -> bool;

    /// Returns `true` if `principals` holds the given role.
    fn has_role(&self, principals: &PrincipalSet, role: &str) -> bool;

    /// Starts a new session, optionally bound to an originating host.
    fn start_session(&self, host: Option<&str>) -> Arc<dyn Session>;
}

/// A stateful conversation attached to one caller.
///
/// The context layer only reads identity and origin; session attribute
/// storage, timeouts, and persistence are the backend's concern.
pub trait Session: Send + Sync {
    /// The session's unique identifier.
    fn id(&self) -> SessionId;

    /// The host the session was started from, when the transport
    /// exposed one.
    fn host(&self) -> Option<String>;
}

/// Test doubles for the manager and session boundaries.
#[cfg(any(test, feature = "test-utils"))]
pub mod testing {
    use super::*;

    /// A manager answering from fixed grant lists, independent of the
    /// principal set it is asked about.
    pub struct StaticManager {
        permissions: Vec<String>,
        roles: Vec<String>,
    }

    impl StaticManager {
        /// A manager granting nothing.
        #[must_use]
        pub fn deny_all() -> Self {
            Self {
                permissions: Vec::new(),
                roles: Vec::new(),
            }
        }

        /// A manager granting exactly the given permissions.
        #[must_use]
        pub fn granting<I, S>(permissions: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            Self {
                permissions: permissions.into_iter().map(Into::into).collect(),
                roles: Vec::new(),
            }
        }

        /// Adds granted roles.
        #[must_use]
        pub fn with_roles<I, S>(mut self, roles: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            self.roles = roles.into_iter().map(Into::into).collect();
            self
        }
    }

    impl SecurityManager for StaticManager {
        fn is_permitted(&self, _principals: &PrincipalSet, permission: &str) -> bool {
            self.permissions.iter().any(|p| p == permission)
        }

        fn has_role(&self, _principals: &PrincipalSet, role: &str) -> bool {
            self.roles.iter().any(|r| r == role)
        }

        fn start_session(&self, host: Option<&str>) -> Arc<dyn Session> {
            Arc::new(FixedSession {
                id: SessionId::new(),
                host: host.map(ToString::to_string),
            })
        }
    }

    /// An in-memory session with a fixed id and host.
    pub struct FixedSession {
        id: SessionId,
        host: Option<String>,
    }

    impl FixedSession {
        /// A session with a fresh id and the given host.
        #[must_use]
        pub fn new(host: Option<&str>) -> Self {
            Self {
                id: SessionId::new(),
                host: host.map(ToString::to_string),
            }
        }
    }

    impl Session for FixedSession {
        fn id(&self) -> SessionId {
            self.id
        }

        fn host(&self) -> Option<String> {
            self.host.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{FixedSession, StaticManager};
    use super::*;
    use warden_types::PrincipalSet;

    #[test]
    fn static_manager_answers_from_grant_lists() {
        let manager = StaticManager::granting(["doc:read"]).with_roles(["editor"]);
        let anon = PrincipalSet::empty();

        assert!(manager.is_permitted(&anon, "doc:read"));
        assert!(!manager.is_permitted(&anon, "doc:edit"));
        assert!(manager.has_role(&anon, "editor"));
        assert!(!manager.has_role(&anon, "admin"));
    }

    #[test]
    fn started_session_carries_host() {
        let manager = StaticManager::deny_all();
        let session = manager.start_session(Some("10.0.0.7"));
        assert_eq!(session.host().as_deref(), Some("10.0.0.7"));
    }

    #[test]
    fn fixed_sessions_have_distinct_ids() {
        let a = FixedSession::new(None);
        let b = FixedSession::new(None);
        assert_ne!(a.id(), b.id());
        assert!(a.host().is_none());
    }
}
