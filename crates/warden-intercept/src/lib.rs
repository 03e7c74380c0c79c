//! Interception pipeline for warden.
//!
//! This crate turns the policy primitives of `warden-auth` into an
//! enforcement pipeline over intercepted calls.
//!
//! # Overview
//!
//! A host interception mechanism (proxy, filter chain, macro — out of
//! scope here) wraps each guarded call in an [`Invocation`] and hands
//! it to a [`Pipeline`] instead of invoking the target directly. Each
//! [`InterceptionStage`] pairs a [`MetadataResolver`] with a
//! [`PolicyHandler`](warden_auth::PolicyHandler):
//!
//! ```text
//! request ──► Pipeline::execute(caller, invocation)
//!               │ for each stage, in configured order:
//!               │   resolve metadata for the stage's kind
//!               │     ├─ none     → stage is a no-op pass-through
//!               │     └─ present  → handler.assert_authorized(caller, md)
//!               │                     ├─ Ok      → next stage
//!               │                     └─ denied  → STOP, proceed() never runs
//!               └─ all stages passed → invocation.proceed()
//! ```
//!
//! # Metadata Discovery
//!
//! Metadata is attached through an explicit [`MetadataRegistry`] built
//! at configuration time — a registration table keyed by
//! [`MethodDescriptor`](warden_types::MethodDescriptor), with a
//! declaring-type-level fallback. [`MetadataResolver`] is the strategy
//! seam: alternate resolvers (configuration mappings, composite
//! lookups) can replace the registry without touching handler logic.
//!
//! # Concurrency
//!
//! A pipeline is configured once at startup and read-only afterwards;
//! share it as `Arc<Pipeline>`. Each invocation is processed on its
//! own logical thread of control with no cross-call state.
//!
//! # Example
//!
//! ```
//! use warden_auth::testing::MockIdentity;
//! use warden_auth::{PermissionHandler, RequiredPermissions, SecurityMetadata};
//! use warden_intercept::{FnInvocation, MetadataRegistry, Pipeline};
//! use warden_types::MethodDescriptor;
//! use serde_json::json;
//!
//! let method = MethodDescriptor::new("DocumentService", "read", ["DocumentId"]);
//!
//! let mut registry = MetadataRegistry::new();
//! registry.attach(
//!     method.clone(),
//!     SecurityMetadata::Permissions(RequiredPermissions::all_of(["doc:read"])),
//! );
//!
//! let pipeline = Pipeline::builder(registry)
//!     .stage(PermissionHandler)
//!     .build()
//!     .expect("resolver supports all registered kinds");
//!
//! let caller = MockIdentity::granted(["doc:read"]);
//! let invocation = FnInvocation::new(method, |_args| Ok(json!("the document")));
//!
//! let result = pipeline.execute(&caller, Box::new(invocation));
//! assert_eq!(result.unwrap(), json!("the document"));
//! ```

pub mod error;
pub mod invocation;
pub mod pipeline;
pub mod resolver;
pub mod stage;

pub use error::PipelineError;
pub use invocation::{FnInvocation, Invocation};
pub use pipeline::{Pipeline, PipelineBuilder};
pub use resolver::{MetadataRegistry, MetadataResolver, RegistryResolver};
pub use stage::InterceptionStage;
