//! The input bag a context is resolved from.

use crate::{SecurityContext, SecurityManager, Session, TransportPair};
use std::sync::Arc;
use warden_types::PrincipalSet;

/// Everything a host may know about the caller, all optional.
///
/// Hosts populate whichever fields they have — an existing context
/// from an earlier hop, principals recovered from a token, transport
/// handles, a pre-bound session — and hand the bag to
/// [`SecurityContextResolver::resolve`](crate::SecurityContextResolver::resolve),
/// which fills the gaps by its fallback rules.
///
/// # Example
///
/// ```
/// use warden_context::{ContextInputs, RequestHandle, ResponseHandle, TransportPair};
///
/// let inputs = ContextInputs::new()
///     .with_authenticated(true)
///     .with_transport(TransportPair::new(
///         RequestHandle::from_host("192.0.2.10"),
///         ResponseHandle::new(),
///     ));
///
/// assert!(inputs.is_transport_shaped());
/// ```
#[derive(Default)]
pub struct ContextInputs {
    existing: Option<Arc<SecurityContext>>,
    manager: Option<Arc<dyn SecurityManager>>,
    principals: Option<PrincipalSet>,
    authenticated: Option<bool>,
    session: Option<Arc<dyn Session>>,
    host: Option<String>,
    transport: Option<TransportPair>,
    session_creation_enabled: bool,
}

impl ContextInputs {
    /// An empty bag with session creation enabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            session_creation_enabled: true,
            ..Self::default()
        }
    }

    /// Attaches a context resolved on an earlier hop.
    #[must_use]
    pub fn with_existing(mut self, existing: Arc<SecurityContext>) -> Self {
        self.existing = Some(existing);
        self
    }

    /// Attaches an explicit security manager.
    #[must_use]
    pub fn with_manager(mut self, manager: Arc<dyn SecurityManager>) -> Self {
        self.manager = Some(manager);
        self
    }

    /// Attaches a known principal set.
    #[must_use]
    pub fn with_principals(mut self, principals: PrincipalSet) -> Self {
        self.principals = Some(principals);
        self
    }

    /// Records whether the caller authenticated in this interaction.
    #[must_use]
    pub fn with_authenticated(mut self, authenticated: bool) -> Self {
        self.authenticated = Some(authenticated);
        self
    }

    /// Attaches an already-established session.
    #[must_use]
    pub fn with_session(mut self, session: Arc<dyn Session>) -> Self {
        self.session = Some(session);
        self
    }

    /// Attaches an explicitly known caller host.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Attaches the transport exchange the call arrived on.
    #[must_use]
    pub fn with_transport(mut self, transport: TransportPair) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Forbids lazy session creation on the resolved context.
    #[must_use]
    pub fn without_session_creation(mut self) -> Self {
        self.session_creation_enabled = false;
        self
    }

    /// Returns `true` if the bag carries transport handles, i.e. the
    /// transport-aware resolution path is applicable at all.
    #[must_use]
    pub fn is_transport_shaped(&self) -> bool {
        self.transport.is_some()
    }

    pub(crate) fn existing(&self) -> Option<&Arc<SecurityContext>> {
        self.existing.as_ref()
    }

    pub(crate) fn manager(&self) -> Option<&Arc<dyn SecurityManager>> {
        self.manager.as_ref()
    }

    pub(crate) fn principals(&self) -> Option<&PrincipalSet> {
        self.principals.as_ref()
    }

    pub(crate) fn authenticated(&self) -> Option<bool> {
        self.authenticated
    }

    pub(crate) fn session(&self) -> Option<&Arc<dyn Session>> {
        self.session.as_ref()
    }

    pub(crate) fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub(crate) fn transport(&self) -> Option<&TransportPair> {
        self.transport.as_ref()
    }

    pub(crate) fn session_creation_enabled(&self) -> bool {
        self.session_creation_enabled
    }
}

impl std::fmt::Debug for ContextInputs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextInputs")
            .field("existing", &self.existing.is_some())
            .field("manager", &self.manager.is_some())
            .field("principals", &self.principals)
            .field("authenticated", &self.authenticated)
            .field("session", &self.session.is_some())
            .field("host", &self.host)
            .field("transport", &self.transport)
            .field("session_creation_enabled", &self.session_creation_enabled)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RequestHandle, ResponseHandle};

    #[test]
    fn new_bag_is_empty_with_sessions_enabled() {
        let inputs = ContextInputs::new();
        assert!(inputs.existing().is_none());
        assert!(inputs.manager().is_none());
        assert!(inputs.principals().is_none());
        assert!(inputs.authenticated().is_none());
        assert!(inputs.host().is_none());
        assert!(!inputs.is_transport_shaped());
        assert!(inputs.session_creation_enabled());
    }

    #[test]
    fn transport_shaped_iff_transport_attached() {
        let pair = TransportPair::new(RequestHandle::anonymous(), ResponseHandle::new());
        let inputs = ContextInputs::new().with_transport(pair);
        assert!(inputs.is_transport_shaped());
    }

    #[test]
    fn without_session_creation_flips_flag() {
        let inputs = ContextInputs::new().without_session_creation();
        assert!(!inputs.session_creation_enabled());
    }
}
