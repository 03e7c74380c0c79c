//! Pipeline error type.

use thiserror::Error;
use warden_auth::{AuthzDenied, ConfigError};

/// Everything that can stop an intercepted call.
///
/// Denials and configuration errors originate in this core; target
/// failures originate downstream of `proceed()` and pass through
/// unchanged — the pipeline never catches, wraps, or reinterprets
/// them beyond carrying them in this enum.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A stage denied the call; the target was never invoked.
    #[error(transparent)]
    Denied(#[from] AuthzDenied),

    /// The pipeline or context is wired wrong; fatal for the request.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The continuation (target or a later link) failed. Propagated
    /// as-is from `proceed()`.
    #[error(transparent)]
    Target(Box<dyn std::error::Error + Send + Sync>),
}

impl PipelineError {
    /// Wraps a downstream target failure.
    #[must_use]
    pub fn target(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Target(Box::new(err))
    }

    /// Returns `true` if this is an authorization denial.
    #[must_use]
    pub fn is_denied(&self) -> bool {
        matches!(self, Self::Denied(_))
    }

    /// Returns the denial, if this is one.
    #[must_use]
    pub fn as_denied(&self) -> Option<&AuthzDenied> {
        match self {
            Self::Denied(denied) => Some(denied),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn denied_helpers() {
        let err = PipelineError::from(AuthzDenied::NotAuthenticated);
        assert!(err.is_denied());
        assert!(err.as_denied().is_some());
    }

    #[test]
    fn config_is_not_denied() {
        let err = PipelineError::from(ConfigError::MissingSecurityManager);
        assert!(!err.is_denied());
        assert!(err.as_denied().is_none());
    }

    #[test]
    fn target_error_message_passes_through() {
        let io = std::io::Error::other("downstream blew up");
        let err = PipelineError::target(io);
        assert_eq!(err.to_string(), "downstream blew up");
    }
}
