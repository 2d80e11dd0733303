//! Operation context passed to handlers.

use mgmt_system::service::{GlobalService, ServiceRef, Services};

use crate::address::PathAddress;
use crate::attribute::AttributeDefinition;
use crate::error::ModelError;
use crate::expression::ExpressionResolver;
use crate::value::{ModelMap, ModelNode};

/// What a handler sees while one management operation runs.
///
/// The context owns a working copy of the target resource's values. The
/// [`ManagementModel`](crate::model::ManagementModel) commits that copy only
/// when every handler step succeeds, so a failed operation leaves the stored
/// values untouched.
pub struct OperationContext<'a> {
    address: PathAddress,
    resolver: &'a dyn ExpressionResolver,
    services: &'a Services,
    model: ModelMap,
}

impl core::fmt::Debug for OperationContext<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("OperationContext")
            .field("address", &self.address)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl<'a> OperationContext<'a> {
    /// Creates a context for the resource at `address` holding `model`.
    pub fn new(
        address: PathAddress,
        resolver: &'a dyn ExpressionResolver,
        services: &'a Services,
        model: ModelMap,
    ) -> Self {
        Self {
            address,
            resolver,
            services,
            model,
        }
    }

    /// Address of the target resource.
    #[must_use]
    pub fn address(&self) -> &PathAddress {
        &self.address
    }

    /// Value of the target address's last element (the resource name).
    #[must_use]
    pub fn resource_name(&self) -> &str {
        self.address.last().map_or("", |element| element.value())
    }

    /// The expression resolver for this operation.
    #[must_use]
    pub fn resolver(&self) -> &'a dyn ExpressionResolver {
        self.resolver
    }

    /// The server's global services.
    #[must_use]
    pub fn services(&self) -> &'a Services {
        self.services
    }

    /// Borrows a global service.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::OperationFailed`] if the service is missing or
    /// currently borrowed for writing.
    pub fn service<S: GlobalService>(&self) -> Result<ServiceRef<'a, S>, ModelError> {
        self.services
            .get::<S>()
            .map_err(|err| ModelError::operation_failed(err.to_string()))
    }

    /// Current values of the target resource.
    #[must_use]
    pub fn model(&self) -> &ModelMap {
        &self.model
    }

    /// Mutable access to the working values.
    pub fn model_mut(&mut self) -> &mut ModelMap {
        &mut self.model
    }

    /// Consumes the context, returning the working values.
    #[must_use]
    pub fn into_model(self) -> ModelMap {
        self.model
    }

    /// Resolves `attribute` from the working values.
    ///
    /// # Errors
    ///
    /// See [`AttributeDefinition::resolve_value`].
    pub fn resolve(&self, attribute: &AttributeDefinition) -> Result<ModelNode, ModelError> {
        attribute.resolve_value(self.resolver, self.model.get(attribute.name()))
    }
}
