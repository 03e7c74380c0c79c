//! Caller identity — the policy layer's view of the current caller.
//!
//! The identity is an **explicit parameter** threaded through every
//! check. Handlers never reach into thread-local or global state to
//! find "the current caller"; whoever drives the pipeline supplies it.
//! This keeps the enforcement path trivially testable.

use crate::AuthzDenied;

/// Permission and role probes for one caller.
///
/// The underlying matching algorithm (wildcard/hierarchical permission
/// implication) is an external collaborator; implementations delegate
/// to it. This trait only fixes the probe/raise contract the policy
/// handlers depend on:
///
/// - `is_permitted` / `has_role` — non-throwing probes
/// - `check_*` — raise [`AuthzDenied`] on the first unsatisfied entry
///
/// # Default Methods
///
/// The raising checks have default implementations in terms of the
/// probes, so an implementation only has to answer yes/no questions.
/// Override them when the backing store can produce richer denials.
///
/// # Example
///
/// ```
/// use warden_auth::CallerIdentity;
///
/// struct Root;
///
/// impl CallerIdentity for Root {
///     fn is_permitted(&self, _permission: &str) -> bool { true }
///     fn has_role(&self, _role: &str) -> bool { true }
///     fn is_authenticated(&self) -> bool { true }
///     fn has_principal(&self) -> bool { true }
/// }
///
/// assert!(Root.check_permission("anything:at:all").is_ok());
/// ```
pub trait CallerIdentity: Send + Sync {
    /// Returns `true` if the caller holds the given permission.
    fn is_permitted(&self, permission: &str) -> bool;

    /// Returns `true` if the caller holds the given role.
    fn has_role(&self, role: &str) -> bool;

    /// Returns `true` if the caller proved its identity during this
    /// interaction (not merely remembered from an earlier one).
    fn is_authenticated(&self) -> bool;

    /// Returns `true` if the caller has any known identity at all —
    /// authenticated or remembered. Guests return `false`.
    fn has_principal(&self) -> bool;

    /// Asserts that the caller holds the given permission.
    ///
    /// # Errors
    ///
    /// Returns [`AuthzDenied::PermissionDenied`] citing `permission`.
    fn check_permission(&self, permission: &str) -> Result<(), AuthzDenied> {
        if self.is_permitted(permission) {
            Ok(())
        } else {
            Err(AuthzDenied::PermissionDenied {
                permission: permission.to_string(),
                required: vec![permission.to_string()],
            })
        }
    }

    /// Asserts that the caller holds **every** listed permission.
    ///
    /// Fails on the first unsatisfied entry; the denial's diagnostic
    /// set is the full batch.
    ///
    /// # Errors
    ///
    /// Returns [`AuthzDenied::PermissionDenied`] citing the first
    /// unsatisfied permission.
    fn check_permissions(&self, permissions: &[String]) -> Result<(), AuthzDenied> {
        for permission in permissions {
            self.check_permission(permission)
                .map_err(|denied| denied.with_required(permissions.to_vec()))?;
        }
        Ok(())
    }

    /// Asserts that the caller holds the given role.
    ///
    /// # Errors
    ///
    /// Returns [`AuthzDenied::RoleDenied`] citing `role`.
    fn check_role(&self, role: &str) -> Result<(), AuthzDenied> {
        if self.has_role(role) {
            Ok(())
        } else {
            Err(AuthzDenied::RoleDenied {
                role: role.to_string(),
                required: vec![role.to_string()],
            })
        }
    }

    /// Asserts that the caller holds **every** listed role.
    ///
    /// # Errors
    ///
    /// Returns [`AuthzDenied::RoleDenied`] citing the first
    /// unsatisfied role.
    fn check_roles(&self, roles: &[String]) -> Result<(), AuthzDenied> {
        for role in roles {
            self.check_role(role)
                .map_err(|denied| denied.with_required(roles.to_vec()))?;
        }
        Ok(())
    }
}

/// Test utilities for the policy layer.
#[cfg(any(test, feature = "test-utils"))]
pub mod testing {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// A mock caller for testing handlers and pipelines.
    ///
    /// Answers probes from fixed grant lists and records every
    /// `is_permitted` / `has_role` probe in order, so tests can assert
    /// both outcomes and evaluation order.
    pub struct MockIdentity {
        granted: Vec<String>,
        roles: Vec<String>,
        authenticated: bool,
        known: bool,
        /// Probe log: `perm:<expr>` and `role:<name>` entries in call order.
        pub probes: Arc<Mutex<Vec<String>>>,
    }

    impl MockIdentity {
        /// An anonymous caller with no grants.
        #[must_use]
        pub fn guest() -> Self {
            Self {
                granted: Vec::new(),
                roles: Vec::new(),
                authenticated: false,
                known: false,
                probes: Arc::new(Mutex::new(Vec::new())),
            }
        }

        /// An authenticated caller holding the given permissions.
        #[must_use]
        pub fn granted<I, S>(permissions: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            Self {
                granted: permissions.into_iter().map(Into::into).collect(),
                roles: Vec::new(),
                authenticated: true,
                known: true,
                probes: Arc::new(Mutex::new(Vec::new())),
            }
        }

        /// Adds roles to the caller.
        #[must_use]
        pub fn with_roles<I, S>(mut self, roles: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            self.roles = roles.into_iter().map(Into::into).collect();
            self
        }

        /// Marks the caller as remembered: known identity, but not
        /// authenticated in this interaction.
        #[must_use]
        pub fn remembered(mut self) -> Self {
            self.authenticated = false;
            self.known = true;
            self
        }

        /// Returns the probe log in call order.
        #[must_use]
        pub fn probe_log(&self) -> Vec<String> {
            self.probes.lock().expect("probe log lock").clone()
        }

        fn record(&self, entry: String) {
            self.probes.lock().expect("probe log lock").push(entry);
        }
    }

    impl CallerIdentity for MockIdentity {
        fn is_permitted(&self, permission: &str) -> bool {
            self.record(format!("perm:{permission}"));
            self.granted.iter().any(|g| g == permission)
        }

        fn has_role(&self, role: &str) -> bool {
            self.record(format!("role:{role}"));
            self.roles.iter().any(|r| r == role)
        }

        fn is_authenticated(&self) -> bool {
            self.authenticated
        }

        fn has_principal(&self) -> bool {
            self.known
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::MockIdentity;
    use super::*;

    #[test]
    fn check_permission_ok_when_granted() {
        let caller = MockIdentity::granted(["doc:read"]);
        assert!(caller.check_permission("doc:read").is_ok());
    }

    #[test]
    fn check_permission_denies_citing_expression() {
        let caller = MockIdentity::granted(["doc:read"]);
        let denied = caller
            .check_permission("doc:edit")
            .expect_err("should deny");
        assert_eq!(denied.denied_expression(), Some("doc:edit"));
    }

    #[test]
    fn check_permissions_fails_on_first_missing() {
        let caller = MockIdentity::granted(["a", "c"]);
        let batch = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let denied = caller.check_permissions(&batch).expect_err("should deny");

        assert_eq!(denied.denied_expression(), Some("b"));
        // Diagnostic set is the full batch
        assert_eq!(denied.required_set(), batch.as_slice());
        // "c" was never probed: the batch fails fast
        assert_eq!(caller.probe_log(), vec!["perm:a", "perm:b"]);
    }

    #[test]
    fn check_roles_fails_on_first_missing() {
        let caller = MockIdentity::granted(["x"]).with_roles(["admin"]);
        let batch = vec!["admin".to_string(), "auditor".to_string()];
        let denied = caller.check_roles(&batch).expect_err("should deny");

        assert_eq!(denied.denied_expression(), Some("auditor"));
        assert_eq!(denied.required_set(), batch.as_slice());
    }

    #[test]
    fn guest_has_no_principal() {
        let caller = MockIdentity::guest();
        assert!(!caller.has_principal());
        assert!(!caller.is_authenticated());
    }

    #[test]
    fn remembered_is_known_but_not_authenticated() {
        let caller = MockIdentity::granted(["p"]).remembered();
        assert!(caller.has_principal());
        assert!(!caller.is_authenticated());
    }

    #[test]
    fn trait_object_works() {
        let caller: Box<dyn CallerIdentity> = Box::new(MockIdentity::granted(["p"]));
        assert!(caller.is_permitted("p"));
        assert!(!caller.is_permitted("q"));
    }
}
