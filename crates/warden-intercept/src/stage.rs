//! One stage of the interception pipeline.

use crate::{Invocation, MetadataResolver};
use std::sync::Arc;
use warden_auth::{AuthzDenied, CallerIdentity, PolicyHandler, SecurityMetadata};

/// A resolver/handler pair guarding one metadata kind.
///
/// The stage probes before it acts: [`supports`](Self::supports) is
/// defined as "metadata of the handler's kind resolves to a present
/// instance", and a stage that does not support an invocation is a
/// no-op pass-through. This lets a pipeline of many stages skip
/// irrelevant ones cheaply, and lets a stage be unit-tested purely by
/// asserting or denying `supports`.
pub struct InterceptionStage {
    handler: Box<dyn PolicyHandler>,
    resolver: Arc<dyn MetadataResolver>,
}

impl InterceptionStage {
    /// Pairs a handler with the resolver that locates its metadata.
    #[must_use]
    pub fn new(handler: Box<dyn PolicyHandler>, resolver: Arc<dyn MetadataResolver>) -> Self {
        Self { handler, resolver }
    }

    /// The handler backing this stage.
    #[must_use]
    pub fn handler(&self) -> &dyn PolicyHandler {
        self.handler.as_ref()
    }

    /// Resolves this stage's metadata for the given invocation.
    #[must_use]
    pub fn metadata(&self, invocation: &dyn Invocation) -> Option<SecurityMetadata> {
        self.resolver
            .resolve(invocation, self.handler.metadata_kind())
    }

    /// Returns `true` if this call site carries metadata of this
    /// stage's kind.
    #[must_use]
    pub fn supports(&self, invocation: &dyn Invocation) -> bool {
        self.metadata(invocation).is_some()
    }

    /// Returns `true` if this stage's resolver can look up its
    /// handler's metadata kind at all.
    #[must_use]
    pub fn resolver_supports_kind(&self) -> bool {
        self.resolver.supports_kind(self.handler.metadata_kind())
    }

    /// Asserts this stage's policy for the invocation.
    ///
    /// Unsupported invocations pass through without consulting the
    /// caller at all.
    ///
    /// # Errors
    ///
    /// Returns [`AuthzDenied`] when metadata is present and the caller
    /// does not satisfy it.
    pub fn check(
        &self,
        caller: &dyn CallerIdentity,
        invocation: &dyn Invocation,
    ) -> Result<(), AuthzDenied> {
        let Some(metadata) = self.metadata(invocation) else {
            return Ok(());
        };

        match self.handler.assert_authorized(caller, &metadata) {
            Ok(()) => {
                tracing::debug!(
                    method = %invocation.method(),
                    kind = %self.handler.metadata_kind(),
                    "authorization satisfied"
                );
                Ok(())
            }
            Err(denied) => {
                tracing::warn!(
                    method = %invocation.method(),
                    kind = %self.handler.metadata_kind(),
                    denial = %denied,
                    "authorization denied"
                );
                Err(denied)
            }
        }
    }
}

impl std::fmt::Debug for InterceptionStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterceptionStage")
            .field("kind", &self.handler.metadata_kind())
            .finish_non_exhaustive()
    }
}
