//! Security metadata — the declared requirement on a call site.
//!
//! A [`MetadataKind`] names a family of requirements (the annotation
//! *type*, in the original model); a [`SecurityMetadata`] instance is
//! one concrete parameterization attached to one method (the
//! annotation *value*). Both are immutable once built and are declared
//! at configuration time, so they derive serde for config files.

use serde::{Deserialize, Serialize};

/// How multiple expressions in one policy combine.
///
/// Defaults to [`Logical::And`]: every listed expression must hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Logical {
    /// Every expression must be satisfied.
    #[default]
    And,
    /// At least one expression must be satisfied.
    Or,
}

/// The kind of security requirement a handler understands.
///
/// Process-wide and defined at configuration time; used as the lookup
/// key between a call site's attached metadata and the
/// [`PolicyHandler`](crate::PolicyHandler) that interprets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MetadataKind {
    /// The caller must hold declared permissions.
    RequiresPermissions,
    /// The caller must hold declared roles.
    RequiresRoles,
    /// The caller must be authenticated.
    RequiresAuthentication,
    /// The caller must be a guest (no known identity).
    RequiresGuest,
}

impl MetadataKind {
    /// Returns the stable kebab-case name of this kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RequiresPermissions => "requires-permissions",
            Self::RequiresRoles => "requires-roles",
            Self::RequiresAuthentication => "requires-authentication",
            Self::RequiresGuest => "requires-guest",
        }
    }
}

impl std::fmt::Display for MetadataKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A declared permission requirement: one or more permission
/// expressions plus a combination mode.
///
/// # Example
///
/// ```
/// use warden_auth::{Logical, RequiredPermissions};
///
/// // All listed permissions required (default mode)
/// let all = RequiredPermissions::all_of(["doc:read", "doc:edit"]);
/// assert_eq!(all.logical(), Logical::And);
///
/// // Any one of the listed permissions suffices
/// let any = RequiredPermissions::any_of(["doc:edit", "doc:admin"]);
/// assert_eq!(any.logical(), Logical::Or);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredPermissions {
    expressions: Vec<String>,
    #[serde(default)]
    logical: Logical,
}

impl RequiredPermissions {
    /// Creates a requirement with an explicit combination mode.
    #[must_use]
    pub fn new<I, S>(expressions: I, logical: Logical) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            expressions: expressions.into_iter().map(Into::into).collect(),
            logical,
        }
    }

    /// Creates an AND requirement: every expression must hold.
    #[must_use]
    pub fn all_of<I, S>(expressions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(expressions, Logical::And)
    }

    /// Creates an OR requirement: at least one expression must hold.
    #[must_use]
    pub fn any_of<I, S>(expressions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(expressions, Logical::Or)
    }

    /// The declared permission expressions, in order.
    #[must_use]
    pub fn expressions(&self) -> &[String] {
        &self.expressions
    }

    /// The declared combination mode.
    #[must_use]
    pub fn logical(&self) -> Logical {
        self.logical
    }
}

/// A declared role requirement, mirroring [`RequiredPermissions`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredRoles {
    roles: Vec<String>,
    #[serde(default)]
    logical: Logical,
}

impl RequiredRoles {
    /// Creates a requirement with an explicit combination mode.
    #[must_use]
    pub fn new<I, S>(roles: I, logical: Logical) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            roles: roles.into_iter().map(Into::into).collect(),
            logical,
        }
    }

    /// Creates an AND requirement over roles.
    #[must_use]
    pub fn all_of<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(roles, Logical::And)
    }

    /// Creates an OR requirement over roles.
    #[must_use]
    pub fn any_of<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(roles, Logical::Or)
    }

    /// The declared roles, in order.
    #[must_use]
    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    /// The declared combination mode.
    #[must_use]
    pub fn logical(&self) -> Logical {
        self.logical
    }
}

/// One concrete security requirement attached to a call site.
///
/// # Example
///
/// ```
/// use warden_auth::{MetadataKind, RequiredPermissions, SecurityMetadata};
///
/// let md = SecurityMetadata::Permissions(RequiredPermissions::all_of(["doc:read"]));
/// assert_eq!(md.kind(), MetadataKind::RequiresPermissions);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "kind")]
pub enum SecurityMetadata {
    /// Requires the caller to hold permissions.
    Permissions(RequiredPermissions),
    /// Requires the caller to hold roles.
    Roles(RequiredRoles),
    /// Requires an authenticated caller.
    Authenticated,
    /// Requires a guest caller.
    Guest,
}

impl SecurityMetadata {
    /// Returns the kind this instance parameterizes.
    #[must_use]
    pub fn kind(&self) -> MetadataKind {
        match self {
            Self::Permissions(_) => MetadataKind::RequiresPermissions,
            Self::Roles(_) => MetadataKind::RequiresRoles,
            Self::Authenticated => MetadataKind::RequiresAuthentication,
            Self::Guest => MetadataKind::RequiresGuest,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logical_defaults_to_and() {
        assert_eq!(Logical::default(), Logical::And);
    }

    #[test]
    fn all_of_preserves_order() {
        let req = RequiredPermissions::all_of(["b", "a", "c"]);
        assert_eq!(req.expressions(), ["b", "a", "c"]);
        assert_eq!(req.logical(), Logical::And);
    }

    #[test]
    fn any_of_is_or_mode() {
        let req = RequiredPermissions::any_of(["doc:edit", "doc:read"]);
        assert_eq!(req.logical(), Logical::Or);
    }

    #[test]
    fn metadata_kind_mapping() {
        let perms = SecurityMetadata::Permissions(RequiredPermissions::all_of(["p"]));
        assert_eq!(perms.kind(), MetadataKind::RequiresPermissions);

        let roles = SecurityMetadata::Roles(RequiredRoles::all_of(["admin"]));
        assert_eq!(roles.kind(), MetadataKind::RequiresRoles);

        assert_eq!(
            SecurityMetadata::Authenticated.kind(),
            MetadataKind::RequiresAuthentication
        );
        assert_eq!(SecurityMetadata::Guest.kind(), MetadataKind::RequiresGuest);
    }

    #[test]
    fn kind_display_is_kebab_case() {
        assert_eq!(
            MetadataKind::RequiresPermissions.to_string(),
            "requires-permissions"
        );
        assert_eq!(MetadataKind::RequiresGuest.to_string(), "requires-guest");
    }

    #[test]
    fn metadata_serde_roundtrip() {
        let md = SecurityMetadata::Permissions(RequiredPermissions::any_of(["a", "b"]));
        let json = serde_json::to_string(&md).expect("serialize");
        let parsed: SecurityMetadata = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, md);
    }

    #[test]
    fn logical_omitted_in_config_defaults_to_and() {
        let json = r#"{"expressions":["doc:read","doc:edit"]}"#;
        let parsed: RequiredPermissions = serde_json::from_str(json).expect("deserialize");
        assert_eq!(parsed.logical(), Logical::And);
    }
}
