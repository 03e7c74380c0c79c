//! Security-context resolution for warden.
//!
//! A request arrives as a heterogeneous bag of optionally-present
//! inputs — maybe an existing caller context, maybe a principal set,
//! maybe transport request/response handles. This crate assembles a
//! [`SecurityContext`] from that bag, applying reuse and fallback
//! rules, so the interception pipeline has a
//! [`CallerIdentity`](warden_auth::CallerIdentity) to consult.
//!
//! # Decision Procedure
//!
//! [`SecurityContextResolver::resolve`] evaluates, in order:
//!
//! ```text
//! 1. existing context present AND transport-aware
//!      → reuse it as-is (same instance, no rebuild)
//! 2. existing context NOT transport-aware, OR no transport handles
//!      → generic path: build ignoring transport fields entirely
//! 3. otherwise
//!      → transport path: resolve each field, build transport-aware
//! ```
//!
//! Rule 2 exists because building a transport-aware context from
//! inputs lacking transport handles produces one that fails later
//! (e.g. on session access) with a confusing error; failing over to
//! the generic path is safer than constructing an inconsistent object.
//!
//! # External Collaborators
//!
//! The permission-matching algorithm and the session store live behind
//! the [`SecurityManager`] and [`Session`] traits; this crate only
//! fixes their boundary.
//!
//! # Lifecycle
//!
//! A resolved context is scoped to exactly one call/request. It is
//! built fresh per call (or reused only when already attached to the
//! inbound inputs) and must not be cached across calls.

pub mod context;
pub mod inputs;
pub mod manager;
pub mod resolver;
pub mod transport;

pub use context::SecurityContext;
pub use inputs::ContextInputs;
pub use manager::{SecurityManager, Session};
pub use resolver::SecurityContextResolver;
pub use transport::{RequestHandle, ResponseHandle, TransportPair};

// Re-export testing utilities
#[cfg(any(test, feature = "test-utils"))]
pub mod testing {
    //! Test utilities for context resolution.
    //!
    //! Provides [`StaticManager`] and [`FixedSession`] for use in tests.
    pub use crate::manager::testing::{FixedSession, StaticManager};
}
