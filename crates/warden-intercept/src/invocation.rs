//! Framework-independent representation of one intercepted call.
//!
//! The host's interception mechanism (whatever it is — a proxy, a
//! filter chain, a generated wrapper) adapts its own call object to
//! the [`Invocation`] trait. The core consumes it read-only and calls
//! [`proceed`](Invocation::proceed) exactly once, or not at all.

use crate::PipelineError;
use serde_json::Value;
use warden_types::MethodDescriptor;

/// One intercepted call crossing the enforcement boundary.
///
/// # Contract
///
/// - [`method`](Self::method), [`arguments`](Self::arguments), and
///   [`receiver`](Self::receiver) are pure read accessors with no side
///   effects. `arguments` may be empty but is never absent; individual
///   argument values may be [`Value::Null`].
/// - [`proceed`](Self::proceed) continues to the next link in the
///   interception chain, or — if this is the last link — invokes the
///   actual target. It returns the target's result and propagates any
///   failure raised during the continuation unchanged. It consumes the
///   invocation: a call proceeds at most once.
/// - A stage that denies access MUST NOT call `proceed`.
///
/// Arguments and results are [`serde_json::Value`] so the boundary
/// stays independent of the host's argument types.
pub trait Invocation: Send {
    /// The descriptor of the method being invoked. Never absent.
    fn method(&self) -> &MethodDescriptor;

    /// The ordered argument list. May be empty.
    fn arguments(&self) -> &[Value];

    /// The receiver the call is bound to, or `None` for static-like
    /// calls.
    fn receiver(&self) -> Option<&Value> {
        None
    }

    /// Continues the call chain, or invokes the target if this is the
    /// last link.
    ///
    /// # Errors
    ///
    /// Whatever the continuation raises, unchanged.
    fn proceed(self: Box<Self>) -> Result<Value, PipelineError>;
}

/// Closure-backed [`Invocation`] adapter.
///
/// The simplest way for a host to produce an invocation: capture the
/// target call in a closure. Also the workhorse of the test suite.
///
/// # Example
///
/// ```
/// use warden_intercept::{FnInvocation, Invocation};
/// use warden_types::MethodDescriptor;
/// use serde_json::json;
///
/// let method = MethodDescriptor::new("Calc", "add", ["i64", "i64"]);
/// let inv = FnInvocation::new(method, |args| {
///     let sum = args.iter().filter_map(|v| v.as_i64()).sum::<i64>();
///     Ok(json!(sum))
/// })
/// .with_arguments(vec![json!(2), json!(3)]);
///
/// assert_eq!(inv.arguments().len(), 2);
/// assert_eq!(Box::new(inv).proceed().unwrap(), json!(5));
/// ```
pub struct FnInvocation<F> {
    method: MethodDescriptor,
    arguments: Vec<Value>,
    receiver: Option<Value>,
    target: F,
}

impl<F> FnInvocation<F>
where
    F: FnOnce(&[Value]) -> Result<Value, PipelineError> + Send,
{
    /// Creates an invocation of `method` whose continuation is `target`.
    #[must_use]
    pub fn new(method: MethodDescriptor, target: F) -> Self {
        Self {
            method,
            arguments: Vec::new(),
            receiver: None,
            target,
        }
    }

    /// Sets the argument list.
    #[must_use]
    pub fn with_arguments(mut self, arguments: Vec<Value>) -> Self {
        self.arguments = arguments;
        self
    }

    /// Sets the receiver object.
    #[must_use]
    pub fn with_receiver(mut self, receiver: Value) -> Self {
        self.receiver = Some(receiver);
        self
    }
}

impl<F> Invocation for FnInvocation<F>
where
    F: FnOnce(&[Value]) -> Result<Value, PipelineError> + Send,
{
    fn method(&self) -> &MethodDescriptor {
        &self.method
    }

    fn arguments(&self) -> &[Value] {
        &self.arguments
    }

    fn receiver(&self) -> Option<&Value> {
        self.receiver.as_ref()
    }

    fn proceed(self: Box<Self>) -> Result<Value, PipelineError> {
        (self.target)(&self.arguments)
    }
}
