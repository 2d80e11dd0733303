//! Error types for the management model.

use thiserror::Error;

/// Errors raised while declaring, registering, resolving or operating on
/// management resources.
///
/// [`InvalidDefinition`](Self::InvalidDefinition) and
/// [`DuplicateAttribute`](Self::DuplicateAttribute) are build-time errors: they
/// surface while an extension constructs its registries and abort startup.
/// Every other variant is reported to the caller of a management operation.
/// [`DuplicateAttribute`](Self::DuplicateAttribute) is also reported when one
/// request names the same attribute twice, for example by its current and
/// legacy names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// A malformed attribute declaration.
    #[error("invalid attribute definition '{name}': {reason}")]
    InvalidDefinition {
        /// Name of the offending attribute (may be empty).
        name: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Two definitions share a canonical or XML name, or one request sets an
    /// attribute under two of its names.
    #[error("duplicate attribute: {0}")]
    DuplicateAttribute(String),

    /// A name that resolves to no attribute definition.
    #[error("unknown attribute: {0}")]
    UnknownAttribute(String),

    /// An attribute value could not be resolved: missing, of the wrong type,
    /// or rejected by validation.
    #[error("cannot resolve attribute '{attribute}': {reason}")]
    AttributeResolution {
        /// Canonical name of the attribute.
        attribute: String,
        /// Why resolution failed.
        reason: String,
    },

    /// The operation is not available on the target (for example a write on a
    /// read-only resource).
    #[error("operation '{operation}' is not supported on {target}")]
    UnsupportedOperation {
        /// Operation name.
        operation: String,
        /// Description of the target resource or attribute.
        target: String,
    },

    /// A collaborator (expression resolution, a runtime service) failed.
    #[error("operation failed: {0}")]
    OperationFailed(String),

    /// A resource already exists at the given address.
    #[error("duplicate resource: {0}")]
    DuplicateResource(String),

    /// No resource (or resource registration) exists at the given address.
    #[error("resource not found: {0}")]
    ResourceNotFound(String),
}

impl ModelError {
    /// Creates an [`InvalidDefinition`](Self::InvalidDefinition).
    pub fn invalid_definition(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDefinition {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Creates an [`AttributeResolution`](Self::AttributeResolution).
    pub fn resolution(attribute: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::AttributeResolution {
            attribute: attribute.into(),
            reason: reason.into(),
        }
    }

    /// Creates an [`UnsupportedOperation`](Self::UnsupportedOperation).
    pub fn unsupported(operation: impl Into<String>, target: impl Into<String>) -> Self {
        Self::UnsupportedOperation {
            operation: operation.into(),
            target: target.into(),
        }
    }

    /// Creates an [`OperationFailed`](Self::OperationFailed).
    pub fn operation_failed(msg: impl Into<String>) -> Self {
        Self::OperationFailed(msg.into())
    }

    /// Returns true for errors detected while building registries.
    #[must_use]
    pub fn is_build_time(&self) -> bool {
        matches!(
            self,
            Self::InvalidDefinition { .. } | Self::DuplicateAttribute(_)
        )
    }
}
