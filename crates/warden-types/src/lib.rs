//! Core types for the warden authorization workspace.
//!
//! This crate provides the foundational identity types shared by every
//! other warden crate. It carries no policy logic: a [`Principal`] says
//! *who* is acting, a [`MethodDescriptor`] says *which call site* was
//! intercepted, and permission decisions live upstream.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  warden-types     : MethodDescriptor, Principal  ◄── HERE   │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │  warden-auth      : metadata, handlers, CallerIdentity      │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌──────────────────────────────┬──────────────────────────────┐
//! │  warden-intercept : pipeline │  warden-context : resolver   │
//! └──────────────────────────────┴──────────────────────────────┘
//! ```
//!
//! # Identifier Design
//!
//! Identifiers are UUID-based so they are safe to log, transmit, and
//! compare across processes without coordination. All value types have
//! first-class serde support so security metadata can be declared in
//! configuration files.
//!
//! # Example
//!
//! ```
//! use warden_types::{MethodDescriptor, Principal, PrincipalId, PrincipalSet};
//!
//! // The call site an interceptor guards
//! let method = MethodDescriptor::new("DocumentService", "delete", ["DocumentId"]);
//! assert_eq!(method.fqn(), "DocumentService::delete(DocumentId)");
//!
//! // The actor on whose behalf the call runs
//! let user = Principal::User(PrincipalId::new());
//! let principals = PrincipalSet::single(user);
//! assert!(!principals.is_empty());
//! ```

mod id;
mod method;
mod principal;

pub use id::{PrincipalId, SessionId};
pub use method::MethodDescriptor;
pub use principal::{Principal, PrincipalSet};
