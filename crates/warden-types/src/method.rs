//! Method descriptor — the identity of an intercepted call site.

use serde::{Deserialize, Serialize};

/// Framework-independent identity of a method at an enforcement boundary.
///
/// A descriptor names the declaring type, the method, and the ordered
/// parameter types. Two descriptors are equal when all three match, so
/// overloads of the same method name remain distinct registry keys.
///
/// Descriptors are pure identity: they carry no security metadata
/// themselves. Metadata is attached to a descriptor through the
/// registration table in `warden-intercept`.
///
/// # Example
///
/// ```
/// use warden_types::MethodDescriptor;
///
/// let delete = MethodDescriptor::new("DocumentService", "delete", ["DocumentId"]);
/// let delete_all = MethodDescriptor::new("DocumentService", "delete", ["Vec<DocumentId>"]);
///
/// assert_ne!(delete, delete_all); // overloads are distinct
/// assert_eq!(delete.fqn(), "DocumentService::delete(DocumentId)");
/// assert!(delete.declared_by("DocumentService"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodDescriptor {
    /// The type declaring the method.
    pub declaring_type: String,
    /// The method name within the declaring type.
    pub name: String,
    /// Ordered parameter type names. May be empty.
    pub param_types: Vec<String>,
}

impl MethodDescriptor {
    /// Creates a descriptor from a declaring type, method name, and
    /// parameter type names.
    ///
    /// # Example
    ///
    /// ```
    /// use warden_types::MethodDescriptor;
    ///
    /// let ping = MethodDescriptor::new("HealthService", "ping", [] as [&str; 0]);
    /// assert_eq!(ping.fqn(), "HealthService::ping()");
    /// ```
    #[must_use]
    pub fn new<I, S>(declaring_type: impl Into<String>, name: impl Into<String>, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            declaring_type: declaring_type.into(),
            name: name.into(),
            param_types: params.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the fully qualified signature in
    /// `Type::name(Param, Param)` format.
    #[must_use]
    pub fn fqn(&self) -> String {
        format!(
            "{}::{}({})",
            self.declaring_type,
            self.name,
            self.param_types.join(", ")
        )
    }

    /// Returns `true` if the method is declared by the given type.
    #[must_use]
    pub fn declared_by(&self, declaring_type: &str) -> bool {
        self.declaring_type == declaring_type
    }

    /// Returns the number of declared parameters.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.param_types.len()
    }
}

impl std::fmt::Display for MethodDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.fqn())
    }
}
