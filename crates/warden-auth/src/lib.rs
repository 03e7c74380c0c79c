//! Policy primitives for warden.
//!
//! This crate defines what a security requirement *is* and how it is
//! checked against a caller, without knowing anything about intercepted
//! invocations or transports.
//!
//! # Enforcement Model
//!
//! ```text
//! Decision = SecurityMetadata(WHAT is required)
//!          × CallerIdentity(WHO is calling)
//!          → Ok(()) | AuthzDenied
//! ```
//!
//! | Piece | Type | Role |
//! |-------|------|------|
//! | [`SecurityMetadata`] | Enum | The declared requirement on a call site |
//! | [`CallerIdentity`] | Trait | Permission/role probes for the current caller |
//! | [`PolicyHandler`] | Trait | Interprets one metadata kind against a caller |
//!
//! # Crate Architecture
//!
//! ```text
//! warden-types  (MethodDescriptor, Principal)
//!      ↑
//! warden-auth  ◄── THIS CRATE (metadata, handlers, CallerIdentity)
//!      ↑
//! warden-intercept (pipeline)      warden-context (context resolver)
//! ```
//!
//! # Design Principles
//!
//! - **Explicit identity passing** — the caller is a parameter of every
//!   check; nothing is looked up from ambient/thread-local state.
//! - **Composition over hierarchy** — each [`PolicyHandler`] is a small
//!   capability (one metadata kind, one assertion); variants are
//!   independent types composed into stages by the pipeline.
//! - **Denial is the only side effect** — handlers mutate nothing.

pub mod error;
pub mod handler;
pub mod identity;
pub mod metadata;

pub use error::{AuthzDenied, ConfigError};
pub use handler::{
    AuthenticatedHandler, GuestHandler, PermissionHandler, PolicyHandler, RoleHandler,
};
pub use identity::CallerIdentity;
pub use metadata::{Logical, MetadataKind, RequiredPermissions, RequiredRoles, SecurityMetadata};

// Re-export testing utilities
#[cfg(any(test, feature = "test-utils"))]
pub mod testing {
    //! Test utilities for the policy layer.
    //!
    //! Provides [`MockIdentity`] for use in tests.
    pub use crate::identity::testing::MockIdentity;
}
