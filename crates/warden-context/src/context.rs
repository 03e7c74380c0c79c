//! The resolved security context — one caller, one call.

use crate::{SecurityManager, Session, TransportPair};
use parking_lot::RwLock;
use std::sync::Arc;
use warden_auth::{CallerIdentity, ConfigError};
use warden_types::PrincipalSet;

/// The caller's security state for the duration of one call.
///
/// A context binds together the principal set, the authentication
/// flag, the manager that answers permission questions for it, and
/// (when the call arrived over a transport) the request/response
/// handles. It implements [`CallerIdentity`] by delegating every probe
/// to its manager, so it plugs directly into the interception
/// pipeline.
///
/// # Session Laziness
///
/// No session exists until something asks for one.
/// [`session_or_create`](Self::session_or_create) starts a session on
/// first use and caches it; contexts built with session creation
/// disabled refuse instead. [`session`](Self::session) never creates.
///
/// # Transport Awareness
///
/// A context is transport-aware iff it carries a [`TransportPair`].
/// Transport awareness is what makes a context reusable across
/// in-process hops of the same exchange; see the resolver's rule 1.
pub struct SecurityContext {
    manager: Arc<dyn SecurityManager>,
    principals: PrincipalSet,
    authenticated: bool,
    host: Option<String>,
    transport: Option<TransportPair>,
    session_creation_enabled: bool,
    // Lazy slot, filled at most once by session_or_create.
    session: RwLock<Option<Arc<dyn Session>>>,
}

impl SecurityContext {
    pub(crate) fn build(
        manager: Arc<dyn SecurityManager>,
        principals: PrincipalSet,
        authenticated: bool,
        host: Option<String>,
        transport: Option<TransportPair>,
        session: Option<Arc<dyn Session>>,
        session_creation_enabled: bool,
    ) -> Self {
        Self {
            manager,
            principals,
            authenticated,
            host,
            transport,
            session_creation_enabled,
            session: RwLock::new(session),
        }
    }

    pub(crate) fn manager(&self) -> &Arc<dyn SecurityManager> {
        &self.manager
    }

    /// The caller's principal set; empty for guests.
    #[must_use]
    pub fn principals(&self) -> &PrincipalSet {
        &self.principals
    }

    /// The host the call was attributed to, when one could be resolved.
    #[must_use]
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// The transport exchange this context was resolved for, if any.
    #[must_use]
    pub fn transport(&self) -> Option<&TransportPair> {
        self.transport.as_ref()
    }

    /// Returns `true` if this context carries transport handles.
    #[must_use]
    pub fn is_transport_aware(&self) -> bool {
        self.transport.is_some()
    }

    /// Returns `true` if [`session_or_create`](Self::session_or_create)
    /// may start a new session.
    #[must_use]
    pub fn is_session_creation_enabled(&self) -> bool {
        self.session_creation_enabled
    }

    /// The attached session, if one exists. Never creates.
    #[must_use]
    pub fn session(&self) -> Option<Arc<dyn Session>> {
        self.session.read().clone()
    }

    /// The attached session, starting one on first use.
    ///
    /// The created session is bound to this context's resolved host
    /// and cached for subsequent calls.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::SessionCreationDisabled`] when no
    /// session exists and creation is disabled for this context.
    pub fn session_or_create(&self) -> Result<Arc<dyn Session>, ConfigError> {
        if let Some(session) = self.session.read().clone() {
            return Ok(session);
        }
        if !self.session_creation_enabled {
            return Err(ConfigError::SessionCreationDisabled);
        }

        let mut slot = self.session.write();
        // Re-check under the write lock; another thread may have won.
        if let Some(session) = slot.clone() {
            return Ok(session);
        }
        let session = self.manager.start_session(self.host.as_deref());
        tracing::debug!(session = %session.id(), host = ?self.host, "session started");
        *slot = Some(Arc::clone(&session));
        Ok(session)
    }
}

impl CallerIdentity for SecurityContext {
    fn is_permitted(&self, permission: &str) -> bool {
        self.manager.is_permitted(&self.principals, permission)
    }

    fn has_role(&self, role: &str) -> bool {
        self.manager.has_role(&self.principals, role)
    }

    fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    fn has_principal(&self) -> bool {
        !self.principals.is_empty()
    }
}

impl std::fmt::Debug for SecurityContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityContext")
            .field("principals", &self.principals)
            .field("authenticated", &self.authenticated)
            .field("host", &self.host)
            .field("transport_aware", &self.is_transport_aware())
            .field("session_creation_enabled", &self.session_creation_enabled)
            .finish_non_exhaustive()
    }
}
