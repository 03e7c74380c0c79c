//! Metadata resolution — locating the security requirement attached
//! to a call site.
//!
//! The original model discovered requirements by runtime annotation
//! introspection. Here discovery is an explicit registration table
//! built at configuration time: [`MetadataRegistry`] maps method
//! descriptors (and, as a fallback, declaring types) to attached
//! [`SecurityMetadata`] instances, and [`RegistryResolver`] is the
//! default [`MetadataResolver`] over it.

use crate::Invocation;
use std::collections::HashMap;
use warden_auth::{MetadataKind, SecurityMetadata};
use warden_types::MethodDescriptor;

/// Locates the metadata instance of a given kind attached to a call
/// site, if any.
///
/// This is a strategy seam: the default [`RegistryResolver`] consults
/// a registration table, but alternate implementations may consult
/// configuration-driven mappings or merge lookups across sources
/// without changing handler logic.
pub trait MetadataResolver: Send + Sync {
    /// Returns the first attached instance of `kind` for this call
    /// site, or `None`.
    fn resolve(&self, invocation: &dyn Invocation, kind: MetadataKind)
        -> Option<SecurityMetadata>;

    /// Returns `true` if this resolver can look up the given kind at
    /// all. Pipelines validate at construction time that every
    /// handler's kind is supported.
    fn supports_kind(&self, _kind: MetadataKind) -> bool {
        true
    }
}

/// Startup-time registration table of security metadata.
///
/// Attachments are either method-level (keyed by full
/// [`MethodDescriptor`]) or type-level (keyed by declaring type name).
/// Lookup checks the method first, then falls back to the declaring
/// type — a method-level attachment shadows a type-level one of the
/// same kind.
///
/// The registry is populated once during configuration and treated as
/// read-only afterwards.
///
/// # Example
///
/// ```
/// use warden_auth::{MetadataKind, RequiredPermissions, SecurityMetadata};
/// use warden_intercept::MetadataRegistry;
/// use warden_types::MethodDescriptor;
///
/// let mut registry = MetadataRegistry::new();
///
/// // Every method of AdminService requires the admin role by default
/// registry.attach_type(
///     "AdminService",
///     SecurityMetadata::Permissions(RequiredPermissions::all_of(["admin:*"])),
/// );
///
/// // One specific method carries its own, stricter requirement
/// let wipe = MethodDescriptor::new("AdminService", "wipe", [] as [&str; 0]);
/// registry.attach(
///     wipe.clone(),
///     SecurityMetadata::Permissions(RequiredPermissions::all_of(["admin:wipe"])),
/// );
///
/// let md = registry
///     .lookup(&wipe, MetadataKind::RequiresPermissions)
///     .expect("attached");
/// ```
#[derive(Debug, Default)]
pub struct MetadataRegistry {
    methods: HashMap<MethodDescriptor, Vec<SecurityMetadata>>,
    types: HashMap<String, Vec<SecurityMetadata>>,
}

impl MetadataRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a metadata instance to one method.
    pub fn attach(&mut self, method: MethodDescriptor, metadata: SecurityMetadata) {
        self.methods.entry(method).or_default().push(metadata);
    }

    /// Attaches a metadata instance to every method of a declaring
    /// type. Method-level attachments of the same kind take precedence.
    pub fn attach_type(&mut self, declaring_type: impl Into<String>, metadata: SecurityMetadata) {
        self.types
            .entry(declaring_type.into())
            .or_default()
            .push(metadata);
    }

    /// Looks up the first attachment of `kind` for `method`, checking
    /// the method itself before its declaring type.
    #[must_use]
    pub fn lookup(&self, method: &MethodDescriptor, kind: MetadataKind) -> Option<&SecurityMetadata> {
        self.methods
            .get(method)
            .and_then(|attached| attached.iter().find(|md| md.kind() == kind))
            .or_else(|| {
                self.types
                    .get(&method.declaring_type)
                    .and_then(|attached| attached.iter().find(|md| md.kind() == kind))
            })
    }

    /// Returns the number of attachments (method- and type-level).
    #[must_use]
    pub fn len(&self) -> usize {
        self.methods.values().map(Vec::len).sum::<usize>()
            + self.types.values().map(Vec::len).sum::<usize>()
    }

    /// Returns `true` if nothing is attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Default resolver: looks the invocation's method descriptor up in a
/// [`MetadataRegistry`].
#[derive(Debug)]
pub struct RegistryResolver {
    registry: MetadataRegistry,
}

impl RegistryResolver {
    /// Wraps a populated registry.
    #[must_use]
    pub fn new(registry: MetadataRegistry) -> Self {
        Self { registry }
    }

    /// Read access to the underlying registry.
    #[must_use]
    pub fn registry(&self) -> &MetadataRegistry {
        &self.registry
    }
}

impl MetadataResolver for RegistryResolver {
    fn resolve(
        &self,
        invocation: &dyn Invocation,
        kind: MetadataKind,
    ) -> Option<SecurityMetadata> {
        self.registry.lookup(invocation.method(), kind).cloned()
    }
}
