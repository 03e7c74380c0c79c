//! The pipeline — ordered stages in front of a target.

use crate::{
    InterceptionStage, Invocation, MetadataRegistry, MetadataResolver, PipelineError,
    RegistryResolver,
};
use serde_json::Value;
use std::sync::Arc;
use warden_auth::{CallerIdentity, ConfigError, PolicyHandler};

/// An ordered chain of [`InterceptionStage`]s guarding a target.
///
/// Stages execute strictly in configured order. A stage's assertion
/// fully completes before the next stage is considered; no stage is
/// skipped once its `supports` check holds. On the first denial the
/// chain stops and the target is never invoked.
///
/// Configured once at startup and read-only afterwards; share as
/// `Arc<Pipeline>` across whatever concurrency model the host uses.
pub struct Pipeline {
    stages: Vec<InterceptionStage>,
}

impl Pipeline {
    /// Starts a builder over a metadata registry, wiring every stage
    /// to a shared [`RegistryResolver`].
    #[must_use]
    pub fn builder(registry: MetadataRegistry) -> PipelineBuilder {
        PipelineBuilder::new(Arc::new(RegistryResolver::new(registry)))
    }

    /// Starts a builder over a custom resolver.
    #[must_use]
    pub fn builder_with_resolver(resolver: Arc<dyn MetadataResolver>) -> PipelineBuilder {
        PipelineBuilder::new(resolver)
    }

    /// The configured stages, in execution order.
    #[must_use]
    pub fn stages(&self) -> &[InterceptionStage] {
        &self.stages
    }

    /// Runs the invocation through every stage and, if all pass,
    /// proceeds to the target.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::Denied`] if any stage denies; `proceed` is
    ///   then never called.
    /// - Whatever `proceed` itself raises, unchanged.
    pub fn execute(
        &self,
        caller: &dyn CallerIdentity,
        invocation: Box<dyn Invocation>,
    ) -> Result<Value, PipelineError> {
        for stage in &self.stages {
            stage.check(caller, invocation.as_ref())?;
        }
        invocation.proceed()
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stages)
            .finish()
    }
}

/// Builds a [`Pipeline`], validating handler/resolver compatibility.
pub struct PipelineBuilder {
    resolver: Arc<dyn MetadataResolver>,
    stages: Vec<InterceptionStage>,
}

impl PipelineBuilder {
    fn new(resolver: Arc<dyn MetadataResolver>) -> Self {
        Self {
            resolver,
            stages: Vec::new(),
        }
    }

    /// Appends a stage for `handler`, wired to the builder's resolver.
    #[must_use]
    pub fn stage(mut self, handler: impl PolicyHandler + 'static) -> Self {
        self.stages.push(InterceptionStage::new(
            Box::new(handler),
            Arc::clone(&self.resolver),
        ));
        self
    }

    /// Appends a stage with its own resolver.
    #[must_use]
    pub fn stage_with_resolver(
        mut self,
        handler: impl PolicyHandler + 'static,
        resolver: Arc<dyn MetadataResolver>,
    ) -> Self {
        self.stages
            .push(InterceptionStage::new(Box::new(handler), resolver));
        self
    }

    /// Finalizes the pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnsupportedMetadataKind`] if any stage's
    /// handler declares a kind its resolver cannot look up — a
    /// deployment defect, caught before the first request.
    pub fn build(self) -> Result<Pipeline, ConfigError> {
        for stage in &self.stages {
            if !stage.resolver_supports_kind() {
                return Err(ConfigError::UnsupportedMetadataKind {
                    kind: stage.handler().metadata_kind().to_string(),
                });
            }
        }
        Ok(Pipeline {
            stages: self.stages,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FnInvocation;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use warden_auth::testing::MockIdentity;
    use warden_auth::{
        AuthenticatedHandler, GuestHandler, MetadataKind, PermissionHandler,
        RequiredPermissions, SecurityMetadata,
    };
    use warden_types::MethodDescriptor;

    fn read_method() -> MethodDescriptor {
        MethodDescriptor::new("DocumentService", "read", ["DocumentId"])
    }

    fn registry_with(method: MethodDescriptor, md: SecurityMetadata) -> MetadataRegistry {
        let mut registry = MetadataRegistry::new();
        registry.attach(method, md);
        registry
    }

    fn counting_invocation(
        method: MethodDescriptor,
        counter: Arc<AtomicUsize>,
    ) -> Box<dyn Invocation> {
        Box::new(FnInvocation::new(method, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(json!("proceeded"))
        }))
    }

    #[test]
    fn granted_caller_proceeds_exactly_once() {
        let registry = registry_with(
            read_method(),
            SecurityMetadata::Permissions(RequiredPermissions::all_of(["doc:read"])),
        );
        let pipeline = Pipeline::builder(registry)
            .stage(PermissionHandler)
            .build()
            .expect("valid pipeline");

        let caller = MockIdentity::granted(["doc:read"]);
        let proceeds = Arc::new(AtomicUsize::new(0));
        let inv = counting_invocation(read_method(), Arc::clone(&proceeds));

        let result = pipeline.execute(&caller, inv).expect("allowed");
        assert_eq!(result, json!("proceeded"));
        assert_eq!(proceeds.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn denied_caller_never_proceeds() {
        let registry = registry_with(
            read_method(),
            SecurityMetadata::Permissions(RequiredPermissions::all_of(["a", "b", "c"])),
        );
        let pipeline = Pipeline::builder(registry)
            .stage(PermissionHandler)
            .build()
            .expect("valid pipeline");

        let caller = MockIdentity::granted(["a", "c"]); // lacks "b"
        let proceeds = Arc::new(AtomicUsize::new(0));
        let inv = counting_invocation(read_method(), Arc::clone(&proceeds));

        let err = pipeline.execute(&caller, inv).expect_err("denied");
        assert!(err.is_denied());
        assert_eq!(
            err.as_denied().and_then(|d| d.denied_expression()),
            Some("b")
        );
        assert_eq!(proceeds.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn unguarded_call_is_pass_through_with_no_lookups() {
        let pipeline = Pipeline::builder(MetadataRegistry::new())
            .stage(PermissionHandler)
            .build()
            .expect("valid pipeline");

        let caller = MockIdentity::guest();
        let proceeds = Arc::new(AtomicUsize::new(0));
        let inv = counting_invocation(read_method(), Arc::clone(&proceeds));

        pipeline.execute(&caller, inv).expect("passes through");
        assert_eq!(proceeds.load(Ordering::SeqCst), 1);
        assert!(caller.probe_log().is_empty());
    }

    #[test]
    fn middle_stage_denial_stops_later_stages() {
        let mut registry = MetadataRegistry::new();
        registry.attach(read_method(), SecurityMetadata::Authenticated);
        registry.attach(
            read_method(),
            SecurityMetadata::Permissions(RequiredPermissions::all_of(["doc:read"])),
        );
        let pipeline = Pipeline::builder(registry)
            .stage(AuthenticatedHandler)
            .stage(PermissionHandler)
            .build()
            .expect("valid pipeline");

        // Remembered caller fails the authentication stage first; the
        // permission stage must never probe.
        let caller = MockIdentity::granted(["doc:read"]).remembered();
        let proceeds = Arc::new(AtomicUsize::new(0));
        let inv = counting_invocation(read_method(), Arc::clone(&proceeds));

        let err = pipeline.execute(&caller, inv).expect_err("denied");
        assert!(err.is_denied());
        assert!(caller.probe_log().is_empty());
        assert_eq!(proceeds.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn stages_run_in_configured_order() {
        let mut registry = MetadataRegistry::new();
        registry.attach(read_method(), SecurityMetadata::Guest);
        registry.attach(
            read_method(),
            SecurityMetadata::Permissions(RequiredPermissions::all_of(["doc:read"])),
        );
        let pipeline = Pipeline::builder(registry)
            .stage(PermissionHandler)
            .stage(GuestHandler)
            .build()
            .expect("valid pipeline");

        // An authenticated caller passes permissions, then fails the
        // guest stage — proving the permission probe ran first.
        let caller = MockIdentity::granted(["doc:read"]);
        let proceeds = Arc::new(AtomicUsize::new(0));
        let inv = counting_invocation(read_method(), Arc::clone(&proceeds));

        let err = pipeline.execute(&caller, inv).expect_err("denied");
        assert_eq!(
            err.as_denied(),
            Some(&warden_auth::AuthzDenied::NotGuest)
        );
        assert_eq!(caller.probe_log(), vec!["perm:doc:read"]);
        assert_eq!(proceeds.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn target_failure_propagates_unchanged() {
        let pipeline = Pipeline::builder(MetadataRegistry::new())
            .stage(PermissionHandler)
            .build()
            .expect("valid pipeline");

        let caller = MockIdentity::guest();
        let inv = Box::new(FnInvocation::new(read_method(), |_| {
            Err(PipelineError::target(std::io::Error::other("db down")))
        }));

        let err = pipeline.execute(&caller, inv).expect_err("target fails");
        assert!(!err.is_denied());
        assert_eq!(err.to_string(), "db down");
    }

    #[test]
    fn builder_rejects_unsupported_kind() {
        struct NarrowResolver;
        impl MetadataResolver for NarrowResolver {
            fn resolve(
                &self,
                _invocation: &dyn Invocation,
                _kind: MetadataKind,
            ) -> Option<SecurityMetadata> {
                None
            }
            fn supports_kind(&self, kind: MetadataKind) -> bool {
                kind == MetadataKind::RequiresPermissions
            }
        }

        let err = Pipeline::builder_with_resolver(Arc::new(NarrowResolver))
            .stage(GuestHandler)
            .build()
            .expect_err("guest kind unsupported");
        assert_eq!(
            err,
            ConfigError::UnsupportedMetadataKind {
                kind: "requires-guest".to_string()
            }
        );
    }

    #[test]
    fn empty_pipeline_is_a_plain_call() {
        let pipeline = Pipeline::builder(MetadataRegistry::new())
            .build()
            .expect("valid pipeline");
        assert!(pipeline.stages().is_empty());

        let caller = MockIdentity::guest();
        let inv = Box::new(FnInvocation::new(read_method(), |_| Ok(json!(42))));
        assert_eq!(pipeline.execute(&caller, inv).unwrap(), json!(42));
    }
}
