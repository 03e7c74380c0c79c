//! Policy handlers — one small capability per metadata kind.
//!
//! Each handler declares the [`MetadataKind`] it understands and
//! exposes a single assertion. Handlers are independent types composed
//! into interception stages by the pipeline; there is no handler
//! inheritance hierarchy.
//!
//! ```text
//! PolicyHandler trait
//!     ├── PermissionHandler     (requires-permissions, AND/OR)
//!     ├── RoleHandler           (requires-roles, AND/OR)
//!     ├── AuthenticatedHandler  (requires-authentication)
//!     └── GuestHandler          (requires-guest)
//! ```

use crate::{
    AuthzDenied, CallerIdentity, Logical, MetadataKind, SecurityMetadata,
};

/// Interprets one kind of security metadata against a caller.
///
/// `assert_authorized` returns normally when the policy is satisfied
/// and raises [`AuthzDenied`] otherwise. The denial is its only side
/// effect: handlers mutate no shared state.
///
/// Handed metadata of a kind it does not understand, a handler returns
/// `Ok(())` — metadata dispatch is the resolver's job, and a foreign
/// instance means there is nothing for this handler to enforce.
///
/// # Thread Safety
///
/// Handlers are registered once at startup and shared across
/// concurrent invocations, so they must be `Send + Sync`.
pub trait PolicyHandler: Send + Sync {
    /// The metadata kind this handler enforces.
    fn metadata_kind(&self) -> MetadataKind;

    /// Asserts that `metadata`'s policy holds for `caller`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthzDenied`] identifying the unsatisfied requirement.
    fn assert_authorized(
        &self,
        caller: &dyn CallerIdentity,
        metadata: &SecurityMetadata,
    ) -> Result<(), AuthzDenied>;
}

/// Enforces `requires-permissions` metadata.
///
/// # Combination Semantics
///
/// - **Single expression**: checked directly, no batch machinery.
/// - **AND**: batch check; fails on the first unsatisfied permission.
/// - **OR**: every expression is probed without raising, in declared
///   order, so a later grant is not short-circuited by an earlier
///   failure. If none passed, the denial is reported via the *first*
///   expression — a compatibility-bound reporting rule; the full set
///   travels in the denial's diagnostic payload.
///
/// # Example
///
/// ```
/// use warden_auth::{
///     CallerIdentity, PermissionHandler, PolicyHandler, RequiredPermissions,
///     SecurityMetadata,
/// };
///
/// struct Reader;
///
/// impl CallerIdentity for Reader {
///     fn is_permitted(&self, permission: &str) -> bool { permission == "doc:read" }
///     fn has_role(&self, _role: &str) -> bool { false }
///     fn is_authenticated(&self) -> bool { true }
///     fn has_principal(&self) -> bool { true }
/// }
///
/// let md = SecurityMetadata::Permissions(RequiredPermissions::any_of([
///     "doc:edit",
///     "doc:read",
/// ]));
/// assert!(PermissionHandler.assert_authorized(&Reader, &md).is_ok());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PermissionHandler;

impl PolicyHandler for PermissionHandler {
    fn metadata_kind(&self) -> MetadataKind {
        MetadataKind::RequiresPermissions
    }

    fn assert_authorized(
        &self,
        caller: &dyn CallerIdentity,
        metadata: &SecurityMetadata,
    ) -> Result<(), AuthzDenied> {
        let SecurityMetadata::Permissions(required) = metadata else {
            return Ok(());
        };
        let perms = required.expressions();

        // Defensive: an empty requirement should be unreachable, and
        // is denied rather than waved through in both modes.
        if perms.is_empty() {
            tracing::warn!("requires-permissions metadata with no expressions, denying");
            return Err(AuthzDenied::EmptyPolicy { what: "permission" });
        }

        if let [single] = perms {
            return caller.check_permission(single);
        }

        match required.logical() {
            Logical::And => caller.check_permissions(perms),
            Logical::Or => {
                // Probe every expression without raising so a later
                // grant is not lost to an earlier failure.
                let mut satisfied = false;
                for permission in perms {
                    if caller.is_permitted(permission) {
                        satisfied = true;
                    }
                }
                if satisfied {
                    return Ok(());
                }
                // None passed: report via the first expression. The
                // message is imprecise by design; the full set rides
                // along for diagnostics.
                caller
                    .check_permission(&perms[0])
                    .map_err(|denied| denied.with_required(perms.to_vec()))
            }
        }
    }
}

/// Enforces `requires-roles` metadata.
///
/// Combination semantics mirror [`PermissionHandler`], over roles.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoleHandler;

impl PolicyHandler for RoleHandler {
    fn metadata_kind(&self) -> MetadataKind {
        MetadataKind::RequiresRoles
    }

    fn assert_authorized(
        &self,
        caller: &dyn CallerIdentity,
        metadata: &SecurityMetadata,
    ) -> Result<(), AuthzDenied> {
        let SecurityMetadata::Roles(required) = metadata else {
            return Ok(());
        };
        let roles = required.roles();

        if roles.is_empty() {
            tracing::warn!("requires-roles metadata with no roles, denying");
            return Err(AuthzDenied::EmptyPolicy { what: "role" });
        }

        if let [single] = roles {
            return caller.check_role(single);
        }

        match required.logical() {
            Logical::And => caller.check_roles(roles),
            Logical::Or => {
                let mut satisfied = false;
                for role in roles {
                    if caller.has_role(role) {
                        satisfied = true;
                    }
                }
                if satisfied {
                    return Ok(());
                }
                caller
                    .check_role(&roles[0])
                    .map_err(|denied| denied.with_required(roles.to_vec()))
            }
        }
    }
}

/// Enforces `requires-authentication` metadata: the caller must have
/// proved its identity during this interaction. A merely remembered
/// identity does not qualify.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthenticatedHandler;

impl PolicyHandler for AuthenticatedHandler {
    fn metadata_kind(&self) -> MetadataKind {
        MetadataKind::RequiresAuthentication
    }

    fn assert_authorized(
        &self,
        caller: &dyn CallerIdentity,
        metadata: &SecurityMetadata,
    ) -> Result<(), AuthzDenied> {
        if !matches!(metadata, SecurityMetadata::Authenticated) {
            return Ok(());
        }
        if caller.is_authenticated() {
            Ok(())
        } else {
            Err(AuthzDenied::NotAuthenticated)
        }
    }
}

/// Enforces `requires-guest` metadata: the call site is reserved for
/// callers with no known identity (e.g. sign-up endpoints). Both
/// authenticated and remembered callers are turned away.
#[derive(Debug, Clone, Copy, Default)]
pub struct GuestHandler;

impl PolicyHandler for GuestHandler {
    fn metadata_kind(&self) -> MetadataKind {
        MetadataKind::RequiresGuest
    }

    fn assert_authorized(
        &self,
        caller: &dyn CallerIdentity,
        metadata: &SecurityMetadata,
    ) -> Result<(), AuthzDenied> {
        if !matches!(metadata, SecurityMetadata::Guest) {
            return Ok(());
        }
        if caller.has_principal() {
            Err(AuthzDenied::NotGuest)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockIdentity;
    use crate::{RequiredPermissions, RequiredRoles};

    fn perms_md(req: RequiredPermissions) -> SecurityMetadata {
        SecurityMetadata::Permissions(req)
    }

    // ── Single permission ────────────────────────────────────

    #[test]
    fn single_permission_granted() {
        let handler = PermissionHandler;
        let caller = MockIdentity::granted(["doc:read"]);
        let md = perms_md(RequiredPermissions::all_of(["doc:read"]));

        assert!(handler.assert_authorized(&caller, &md).is_ok());
    }

    #[test]
    fn single_permission_denied_cites_it() {
        let handler = PermissionHandler;
        let caller = MockIdentity::guest();
        let md = perms_md(RequiredPermissions::all_of(["doc:read"]));

        let denied = handler
            .assert_authorized(&caller, &md)
            .expect_err("should deny");
        assert_eq!(denied.denied_expression(), Some("doc:read"));
    }

    #[test]
    fn single_permission_same_in_or_mode() {
        // One element short-circuits before the mode is consulted
        let handler = PermissionHandler;
        let caller = MockIdentity::granted(["doc:read"]);
        let md = perms_md(RequiredPermissions::any_of(["doc:read"]));

        assert!(handler.assert_authorized(&caller, &md).is_ok());
    }

    // ── AND mode ─────────────────────────────────────────────

    #[test]
    fn and_all_held_passes() {
        let handler = PermissionHandler;
        let caller = MockIdentity::granted(["a", "b", "c"]);
        let md = perms_md(RequiredPermissions::all_of(["a", "b", "c"]));

        assert!(handler.assert_authorized(&caller, &md).is_ok());
    }

    #[test]
    fn and_missing_one_denies_citing_it() {
        let handler = PermissionHandler;
        let caller = MockIdentity::granted(["a", "c"]);
        let md = perms_md(RequiredPermissions::all_of(["a", "b", "c"]));

        let denied = handler
            .assert_authorized(&caller, &md)
            .expect_err("should deny");
        assert_eq!(denied.denied_expression(), Some("b"));
        assert_eq!(denied.required_set(), ["a", "b", "c"]);
    }

    // ── OR mode ──────────────────────────────────────────────

    #[test]
    fn or_second_grant_passes_and_probes_all_in_order() {
        let handler = PermissionHandler;
        let caller = MockIdentity::granted(["doc:read"]);
        let md = perms_md(RequiredPermissions::any_of(["doc:edit", "doc:read"]));

        assert!(handler.assert_authorized(&caller, &md).is_ok());
        // Both probed, in declared order, before concluding success
        assert_eq!(caller.probe_log(), vec!["perm:doc:edit", "perm:doc:read"]);
    }

    #[test]
    fn or_none_granted_reports_first_expression() {
        let handler = PermissionHandler;
        let caller = MockIdentity::granted(["unrelated"]);
        let md = perms_md(RequiredPermissions::any_of(["p1", "p2", "p3"]));

        let denied = handler
            .assert_authorized(&caller, &md)
            .expect_err("should deny");
        // Reported via the first expression regardless of which failed
        assert_eq!(denied.denied_expression(), Some("p1"));
        // Full set travels for diagnostics
        assert_eq!(denied.required_set(), ["p1", "p2", "p3"]);
    }

    #[test]
    fn or_probing_does_not_stop_at_first_grant() {
        let handler = PermissionHandler;
        let caller = MockIdentity::granted(["p1"]);
        let md = perms_md(RequiredPermissions::any_of(["p1", "p2"]));

        assert!(handler.assert_authorized(&caller, &md).is_ok());
        assert_eq!(caller.probe_log(), vec!["perm:p1", "perm:p2"]);
    }

    // ── Edge cases ───────────────────────────────────────────

    #[test]
    fn empty_expressions_denied_in_and_mode() {
        let handler = PermissionHandler;
        let caller = MockIdentity::granted(["anything"]);
        let md = perms_md(RequiredPermissions::all_of([] as [&str; 0]));

        let denied = handler
            .assert_authorized(&caller, &md)
            .expect_err("should deny");
        assert_eq!(denied, AuthzDenied::EmptyPolicy { what: "permission" });
    }

    #[test]
    fn empty_expressions_denied_in_or_mode() {
        let handler = PermissionHandler;
        let caller = MockIdentity::granted(["anything"]);
        let md = perms_md(RequiredPermissions::any_of([] as [&str; 0]));

        assert!(handler.assert_authorized(&caller, &md).is_err());
    }

    #[test]
    fn foreign_metadata_is_not_enforced() {
        let handler = PermissionHandler;
        let caller = MockIdentity::guest();

        // A guest requirement handed to the permission handler: no-op
        assert!(handler
            .assert_authorized(&caller, &SecurityMetadata::Guest)
            .is_ok());
        assert!(caller.probe_log().is_empty());
    }

    // ── Roles ────────────────────────────────────────────────

    #[test]
    fn role_single_and_or_parity() {
        let handler = RoleHandler;
        let caller = MockIdentity::granted(["x"]).with_roles(["editor"]);

        let single = SecurityMetadata::Roles(RequiredRoles::all_of(["editor"]));
        assert!(handler.assert_authorized(&caller, &single).is_ok());

        let both = SecurityMetadata::Roles(RequiredRoles::all_of(["editor", "admin"]));
        let denied = handler
            .assert_authorized(&caller, &both)
            .expect_err("should deny");
        assert_eq!(denied.denied_expression(), Some("admin"));

        let either = SecurityMetadata::Roles(RequiredRoles::any_of(["admin", "editor"]));
        assert!(handler.assert_authorized(&caller, &either).is_ok());
    }

    #[test]
    fn role_or_none_reports_first() {
        let handler = RoleHandler;
        let caller = MockIdentity::granted(["x"]);
        let md = SecurityMetadata::Roles(RequiredRoles::any_of(["admin", "auditor"]));

        let denied = handler
            .assert_authorized(&caller, &md)
            .expect_err("should deny");
        assert_eq!(denied.denied_expression(), Some("admin"));
        assert_eq!(denied.required_set(), ["admin", "auditor"]);
    }

    // ── Authenticated / Guest ────────────────────────────────

    #[test]
    fn authenticated_handler_quadrants() {
        let handler = AuthenticatedHandler;
        let md = SecurityMetadata::Authenticated;

        let fresh = MockIdentity::granted(["p"]);
        assert!(handler.assert_authorized(&fresh, &md).is_ok());

        let remembered = MockIdentity::granted(["p"]).remembered();
        assert_eq!(
            handler.assert_authorized(&remembered, &md),
            Err(AuthzDenied::NotAuthenticated)
        );

        let guest = MockIdentity::guest();
        assert_eq!(
            handler.assert_authorized(&guest, &md),
            Err(AuthzDenied::NotAuthenticated)
        );
    }

    #[test]
    fn guest_handler_quadrants() {
        let handler = GuestHandler;
        let md = SecurityMetadata::Guest;

        let guest = MockIdentity::guest();
        assert!(handler.assert_authorized(&guest, &md).is_ok());

        let fresh = MockIdentity::granted(["p"]);
        assert_eq!(
            handler.assert_authorized(&fresh, &md),
            Err(AuthzDenied::NotGuest)
        );

        // Remembered identity still counts as known
        let remembered = MockIdentity::granted(["p"]).remembered();
        assert_eq!(
            handler.assert_authorized(&remembered, &md),
            Err(AuthzDenied::NotGuest)
        );
    }

    #[test]
    fn handlers_declare_their_kinds() {
        assert_eq!(
            PermissionHandler.metadata_kind(),
            MetadataKind::RequiresPermissions
        );
        assert_eq!(RoleHandler.metadata_kind(), MetadataKind::RequiresRoles);
        assert_eq!(
            AuthenticatedHandler.metadata_kind(),
            MetadataKind::RequiresAuthentication
        );
        assert_eq!(GuestHandler.metadata_kind(), MetadataKind::RequiresGuest);
    }
}
