//! Denial and configuration error types.
//!
//! Two distinct failure families cross the enforcement boundary:
//!
//! ```text
//! AuthzDenied  — the caller lacks a required permission/role/state
//! ConfigError  — the deployment is wired wrong; no caller could succeed
//! ```
//!
//! A denial is an expected runtime outcome and is always surfaced to
//! the host; a configuration error indicates a setup defect and is
//! fatal for the current request.

use thiserror::Error;

/// The caller does not satisfy a declared security requirement.
///
/// Carries the offending expression so the host can report which
/// requirement failed. For multi-expression policies the `required`
/// list holds the full declared set for diagnostics; the variant's
/// primary expression is the one the check was reported against.
///
/// # Example
///
/// ```
/// use warden_auth::AuthzDenied;
///
/// let err = AuthzDenied::PermissionDenied {
///     permission: "doc:edit".to_string(),
///     required: vec!["doc:edit".to_string(), "doc:read".to_string()],
/// };
///
/// assert!(err.to_string().contains("doc:edit"));
/// assert_eq!(err.denied_expression(), Some("doc:edit"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthzDenied {
    /// Caller lacks a required permission.
    #[error("permission denied: caller lacks '{permission}'")]
    PermissionDenied {
        /// The permission expression the denial is reported against.
        permission: String,
        /// The full declared set (diagnostics only).
        required: Vec<String>,
    },

    /// Caller lacks a required role.
    #[error("role denied: caller lacks '{role}'")]
    RoleDenied {
        /// The role the denial is reported against.
        role: String,
        /// The full declared set (diagnostics only).
        required: Vec<String>,
    },

    /// The call site requires an authenticated caller.
    #[error("authentication required")]
    NotAuthenticated,

    /// The call site is restricted to guests, but the caller already
    /// has a known identity.
    #[error("guest access only: caller already has an identity")]
    NotGuest,

    /// The attached policy declares no expressions at all.
    ///
    /// A metadata instance with zero expressions should never be
    /// reachable; this is a defensive branch, denied in both AND and
    /// OR mode.
    #[error("empty {what} policy: no expressions declared")]
    EmptyPolicy {
        /// Which expression family was empty ("permission" or "role").
        what: &'static str,
    },
}

impl AuthzDenied {
    /// Returns the expression the denial was reported against, if any.
    #[must_use]
    pub fn denied_expression(&self) -> Option<&str> {
        match self {
            Self::PermissionDenied { permission, .. } => Some(permission),
            Self::RoleDenied { role, .. } => Some(role),
            Self::NotAuthenticated | Self::NotGuest | Self::EmptyPolicy { .. } => None,
        }
    }

    /// Returns the full declared requirement set, if the denial carries one.
    #[must_use]
    pub fn required_set(&self) -> &[String] {
        match self {
            Self::PermissionDenied { required, .. } | Self::RoleDenied { required, .. } => required,
            _ => &[],
        }
    }

    /// Replaces the diagnostic `required` set, keeping the reported
    /// expression unchanged.
    ///
    /// Used by multi-expression policies to enrich a denial raised by
    /// a single-expression check.
    #[must_use]
    pub fn with_required(self, required: Vec<String>) -> Self {
        match self {
            Self::PermissionDenied { permission, .. } => Self::PermissionDenied {
                permission,
                required,
            },
            Self::RoleDenied { role, .. } => Self::RoleDenied { role, required },
            other => other,
        }
    }
}

/// The enforcement core is wired wrong for the current request.
///
/// Configuration errors indicate a deployment/setup defect rather than
/// a caller's access violation. They are fatal for the request and
/// never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// No security manager could be resolved for context construction.
    #[error("no security manager available to resolve the security context")]
    MissingSecurityManager,

    /// The inputs claim an authenticated caller but no principal set
    /// could be resolved.
    #[error("authenticated context has no resolvable principal set")]
    MissingPrincipals,

    /// A policy handler was registered for a metadata kind its
    /// resolver cannot look up.
    #[error("metadata resolver does not support kind '{kind}'")]
    UnsupportedMetadataKind {
        /// The declared kind of the orphaned handler.
        kind: String,
    },

    /// A session was required but creation is disabled for this context.
    #[error("session creation is disabled for this context")]
    SessionCreationDisabled,
}
