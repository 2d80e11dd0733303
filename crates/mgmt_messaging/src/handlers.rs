//! Security role handlers.
//!
//! Mutable roles keep [`SecuritySettings`] in step with the model: every
//! successful add or write reinstalls the transformed role on the enclosing
//! server, under the enclosing security setting's address match. The
//! read-only view reads straight from [`SecuritySettings`].

use std::sync::Arc;

use mgmt_model::attribute::AttributeDefinition;
use mgmt_model::context::OperationContext;
use mgmt_model::error::ModelError;
use mgmt_model::handler::{
    ModelAddHandler, ModelWriteHandler, OperationStepHandler, ReadAttributeHandler,
    WriteAttributeHandler,
};
use mgmt_model::registry::AttributeRegistry;
use mgmt_model::transform::Transformer;
use mgmt_model::value::ModelNode;

use crate::definition::SecurityRoleTransformer;
use crate::extension::HORNETQ_SERVER;
use crate::settings::SecuritySettings;

/// Path key of security settings.
pub const SECURITY_SETTING: &str = "security-setting";
/// Path key of the concrete addresses of the runtime view.
pub const CORE_ADDRESS: &str = "core-address";

fn enclosing<'c>(context: &'c OperationContext<'_>, key: &str) -> Result<&'c str, ModelError> {
    context
        .address()
        .elements()
        .iter()
        .rev()
        .find(|element| element.key() == key)
        .map(|element| element.value())
        .ok_or_else(|| {
            ModelError::operation_failed(format!("{} is not under a {key}", context.address()))
        })
}

fn install(
    context: &OperationContext<'_>,
    transformer: &SecurityRoleTransformer,
) -> Result<(), ModelError> {
    let values = ModelNode::Object(context.model().clone());
    let role = transformer.transform(context.resolver(), context.resource_name(), &values)?;
    let server = enclosing(context, HORNETQ_SERVER)?;
    let address_match = enclosing(context, SECURITY_SETTING)?;
    context
        .service::<SecuritySettings>()?
        .install(server, address_match, role);
    Ok(())
}

/// Stores a new role and installs it.
#[derive(Debug, Clone)]
pub struct SecurityRoleAdd {
    model: ModelAddHandler,
    transformer: SecurityRoleTransformer,
}

impl SecurityRoleAdd {
    /// Creates the handler for roles with the given attributes.
    #[must_use]
    pub fn new(attributes: Arc<AttributeRegistry>, transformer: SecurityRoleTransformer) -> Self {
        Self {
            model: ModelAddHandler::new(attributes),
            transformer,
        }
    }
}

impl OperationStepHandler for SecurityRoleAdd {
    fn execute(
        &self,
        context: &mut OperationContext<'_>,
        operation: &ModelNode,
    ) -> Result<(), ModelError> {
        self.model.populate_model(context, operation)?;
        install(context, &self.transformer)
    }
}

/// Uninstalls a role.
#[derive(Debug, Clone, Copy, Default)]
pub struct SecurityRoleRemove;

impl OperationStepHandler for SecurityRoleRemove {
    fn execute(
        &self,
        context: &mut OperationContext<'_>,
        _operation: &ModelNode,
    ) -> Result<(), ModelError> {
        let server = enclosing(context, HORNETQ_SERVER)?;
        let address_match = enclosing(context, SECURITY_SETTING)?;
        context
            .service::<SecuritySettings>()?
            .uninstall(server, address_match, context.resource_name());
        context.model_mut().clear();
        Ok(())
    }
}

/// Updates one permission and reinstalls the role.
#[derive(Debug, Clone)]
pub struct SecurityRoleWrite {
    transformer: SecurityRoleTransformer,
}

impl SecurityRoleWrite {
    /// Creates the handler.
    #[must_use]
    pub fn new(transformer: SecurityRoleTransformer) -> Self {
        Self { transformer }
    }
}

impl WriteAttributeHandler for SecurityRoleWrite {
    fn write(
        &self,
        context: &mut OperationContext<'_>,
        attribute: &AttributeDefinition,
        value: &ModelNode,
    ) -> Result<(), ModelError> {
        ModelWriteHandler::update_model(context, attribute, value)?;
        install(context, &self.transformer)
    }
}

/// Reads the permissions a role grants on a concrete address.
#[derive(Debug, Clone, Copy, Default)]
pub struct SecurityRoleReadHandler;

impl ReadAttributeHandler for SecurityRoleReadHandler {
    fn read(
        &self,
        context: &OperationContext<'_>,
        attribute: &AttributeDefinition,
    ) -> Result<ModelNode, ModelError> {
        let server = enclosing(context, HORNETQ_SERVER)?;
        let address = enclosing(context, CORE_ADDRESS)?;
        let role = context
            .service::<SecuritySettings>()?
            .roles_for_address(server, address)
            .into_iter()
            .find(|role| role.name() == context.resource_name())
            .ok_or_else(|| ModelError::ResourceNotFound(context.address().to_string()))?;
        role.permission(attribute.name())
            .map(ModelNode::Bool)
            .ok_or_else(|| ModelError::UnknownAttribute(attribute.name().to_string()))
    }
}
