//! Context resolution — from an input bag to a [`SecurityContext`].

use crate::{ContextInputs, SecurityContext, SecurityManager, Session};
use std::sync::Arc;
use warden_auth::{CallerIdentity, ConfigError};
use warden_types::PrincipalSet;

/// Resolves [`ContextInputs`] into a ready [`SecurityContext`].
///
/// Three rules, evaluated in order:
///
/// 1. **Reuse.** An existing transport-aware context in the inputs is
///    returned as-is — same instance, nothing rebuilt. It was resolved
///    for this exchange already; re-deriving it could only lose state.
/// 2. **Generic fallback.** When the existing context is not
///    transport-aware, or the inputs carry no transport handles, the
///    context is built on the generic path and carries no transport.
/// 3. **Transport path.** Otherwise each field is resolved through its
///    fallback chain and the result is transport-aware.
///
/// Field fallbacks (first present wins):
///
/// | Field | Chain |
/// |-------|-------|
/// | manager | inputs → existing → resolver default |
/// | principals | inputs → existing → empty (guest) |
/// | authenticated | inputs → existing → `false` |
/// | session | inputs → existing → none (lazy) |
/// | host | inputs → session → request remote host¹ |
///
/// ¹ transport path only.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use warden_auth::CallerIdentity;
/// use warden_context::{ContextInputs, SecurityContextResolver, SecurityManager, Session};
/// use warden_types::PrincipalSet;
///
/// struct DenyAll;
///
/// impl SecurityManager for DenyAll {
///     fn is_permitted(&self, _: &PrincipalSet, _: &str) -> bool { false }
///     fn has_role(&self, _: &PrincipalSet, _: &str) -> bool { false }
///     fn start_session(&self, _: Option<&str>) -> Arc<dyn Session> {
///         unimplemented!("no session backend in this example")
///     }
/// }
///
/// let resolver = SecurityContextResolver::with_default_manager(Arc::new(DenyAll));
/// let ctx = resolver.resolve(&ContextInputs::new())?;
/// assert!(!ctx.has_principal());
/// # Ok::<(), warden_auth::ConfigError>(())
/// ```
pub struct SecurityContextResolver {
    default_manager: Option<Arc<dyn SecurityManager>>,
}

impl SecurityContextResolver {
    /// A resolver with no default manager; every input bag must then
    /// carry one (directly or via an existing context).
    #[must_use]
    pub fn new() -> Self {
        Self {
            default_manager: None,
        }
    }

    /// A resolver that falls back to `manager` when the inputs carry
    /// none.
    #[must_use]
    pub fn with_default_manager(manager: Arc<dyn SecurityManager>) -> Self {
        Self {
            default_manager: Some(manager),
        }
    }

    /// Resolves the input bag into a context.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingSecurityManager`] when no manager can
    ///   be resolved from any source.
    /// - [`ConfigError::MissingPrincipals`] when the resolved state
    ///   claims an authenticated caller but no principal is attached.
    pub fn resolve(&self, inputs: &ContextInputs) -> Result<Arc<SecurityContext>, ConfigError> {
        if let Some(existing) = inputs.existing() {
            if existing.is_transport_aware() {
                tracing::debug!(principals = %existing.principals(), "reusing resolved context");
                return Ok(Arc::clone(existing));
            }
        }

        // An existing context reaching this point is not transport-aware
        // (rule 1 returned otherwise); building transport state from it
        // would produce an inconsistent context, so rule 2 forces the
        // generic path.
        let transport_path = inputs.is_transport_shaped() && inputs.existing().is_none();
        let manager = self.resolve_manager(inputs)?;
        let principals = Self::resolve_principals(inputs);
        let authenticated = Self::resolve_authenticated(inputs);
        if authenticated && principals.is_empty() {
            return Err(ConfigError::MissingPrincipals);
        }
        let session = Self::resolve_session(inputs);
        let host = Self::resolve_host(inputs, session.as_deref(), transport_path);
        let transport = if transport_path {
            inputs.transport().cloned()
        } else {
            None
        };

        tracing::debug!(
            principals = %principals,
            authenticated,
            host = ?host,
            transport_aware = transport_path,
            "context resolved"
        );
        Ok(Arc::new(SecurityContext::build(
            manager,
            principals,
            authenticated,
            host,
            transport,
            session,
            inputs.session_creation_enabled(),
        )))
    }

    fn resolve_manager(
        &self,
        inputs: &ContextInputs,
    ) -> Result<Arc<dyn SecurityManager>, ConfigError> {
        if let Some(manager) = inputs.manager() {
            return Ok(Arc::clone(manager));
        }
        if let Some(existing) = inputs.existing() {
            return Ok(Arc::clone(existing.manager()));
        }
        self.default_manager
            .as_ref()
            .map(Arc::clone)
            .ok_or(ConfigError::MissingSecurityManager)
    }

    fn resolve_principals(inputs: &ContextInputs) -> PrincipalSet {
        if let Some(principals) = inputs.principals() {
            return principals.clone();
        }
        if let Some(existing) = inputs.existing() {
            return existing.principals().clone();
        }
        PrincipalSet::empty()
    }

    fn resolve_authenticated(inputs: &ContextInputs) -> bool {
        inputs
            .authenticated()
            .or_else(|| inputs.existing().map(|e| e.is_authenticated()))
            .unwrap_or(false)
    }

    fn resolve_session(inputs: &ContextInputs) -> Option<Arc<dyn Session>> {
        inputs
            .session()
            .map(Arc::clone)
            .or_else(|| inputs.existing().and_then(|e| e.session()))
    }

    fn resolve_host(
        inputs: &ContextInputs,
        session: Option<&dyn Session>,
        transport_path: bool,
    ) -> Option<String> {
        if let Some(host) = inputs.host() {
            return Some(host.to_string());
        }
        if let Some(host) = session.and_then(Session::host) {
            return Some(host);
        }
        if transport_path {
            return inputs
                .transport()
                .and_then(|pair| pair.request().remote_host())
                .map(ToString::to_string);
        }
        None
    }
}

impl Default for SecurityContextResolver {
    fn default() -> Self {
        Self::new()
    }
}
