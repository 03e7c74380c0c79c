//! Transport handles — opaque request/response references.
//!
//! The context layer never parses protocol traffic. A [`RequestHandle`]
//! is just a token plus the one field resolution cares about (the
//! remote host); the [`ResponseHandle`] is carried purely so a
//! transport-aware context can hand it back to the host unchanged.

use uuid::Uuid;

/// An opaque reference to an inbound transport request.
///
/// Equality is token-based: two handles are the same request iff they
/// carry the same token, regardless of the host snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestHandle {
    token: Uuid,
    remote_host: Option<String>,
}

impl RequestHandle {
    /// Creates a handle for a request whose remote host is known.
    #[must_use]
    pub fn from_host(remote_host: impl Into<String>) -> Self {
        Self {
            token: Uuid::new_v4(),
            remote_host: Some(remote_host.into()),
        }
    }

    /// Creates a handle for a request with no resolvable origin
    /// (e.g. a unix socket or an in-process call).
    #[must_use]
    pub fn anonymous() -> Self {
        Self {
            token: Uuid::new_v4(),
            remote_host: None,
        }
    }

    /// The handle's opaque token.
    #[must_use]
    pub fn token(&self) -> Uuid {
        self.token
    }

    /// The remote host the request arrived from, if the transport
    /// exposed one.
    #[must_use]
    pub fn remote_host(&self) -> Option<&str> {
        self.remote_host.as_deref()
    }
}

/// An opaque reference to the outbound transport response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHandle {
    token: Uuid,
}

impl ResponseHandle {
    /// Creates a fresh response handle.
    #[must_use]
    pub fn new() -> Self {
        Self {
            token: Uuid::new_v4(),
        }
    }

    /// The handle's opaque token.
    #[must_use]
    pub fn token(&self) -> Uuid {
        self.token
    }
}

impl Default for ResponseHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// The request/response pair of one transport exchange.
///
/// Both halves must be present: a request without its response (or
/// vice versa) is not a usable exchange, so the pair is constructed
/// whole or not at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportPair {
    request: RequestHandle,
    response: ResponseHandle,
}

impl TransportPair {
    /// Binds a request to its response.
    #[must_use]
    pub fn new(request: RequestHandle, response: ResponseHandle) -> Self {
        Self { request, response }
    }

    /// The inbound request handle.
    #[must_use]
    pub fn request(&self) -> &RequestHandle {
        &self.request
    }

    /// The outbound response handle.
    #[must_use]
    pub fn response(&self) -> &ResponseHandle {
        &self.response
    }
}
