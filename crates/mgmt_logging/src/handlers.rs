//! Handler operation steps.
//!
//! Each step keeps the [`HandlerRegistry`] in step with the model. A step
//! that fails to transform leaves both untouched.

use std::sync::Arc;

use mgmt_model::attribute::AttributeDefinition;
use mgmt_model::context::OperationContext;
use mgmt_model::error::ModelError;
use mgmt_model::handler::{
    ModelAddHandler, ModelWriteHandler, OperationStepHandler, WriteAttributeHandler,
};
use mgmt_model::registry::AttributeRegistry;
use mgmt_model::transform::Transformer;
use mgmt_model::value::ModelNode;

use crate::definition::PeriodicHandlerTransformer;
use crate::registry::HandlerRegistry;

fn install(
    context: &OperationContext<'_>,
    transformer: &PeriodicHandlerTransformer,
) -> Result<u64, ModelError> {
    let values = ModelNode::Object(context.model().clone());
    let config = transformer.transform(context.resolver(), context.resource_name(), &values)?;
    Ok(context.service::<HandlerRegistry>()?.install(config))
}

/// Stores a new handler and constructs it.
#[derive(Debug, Clone)]
pub struct HandlerAdd {
    model: ModelAddHandler,
    transformer: PeriodicHandlerTransformer,
}

impl HandlerAdd {
    /// Creates the handler for the given attributes.
    #[must_use]
    pub fn new(attributes: Arc<AttributeRegistry>, transformer: PeriodicHandlerTransformer) -> Self {
        Self {
            model: ModelAddHandler::new(attributes),
            transformer,
        }
    }
}

impl OperationStepHandler for HandlerAdd {
    fn execute(
        &self,
        context: &mut OperationContext<'_>,
        operation: &ModelNode,
    ) -> Result<(), ModelError> {
        self.model.populate_model(context, operation)?;
        install(context, &self.transformer)?;
        Ok(())
    }
}

/// Closes a handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct HandlerRemove;

impl OperationStepHandler for HandlerRemove {
    fn execute(
        &self,
        context: &mut OperationContext<'_>,
        _operation: &ModelNode,
    ) -> Result<(), ModelError> {
        context
            .service::<HandlerRegistry>()?
            .uninstall(context.resource_name());
        context.model_mut().clear();
        Ok(())
    }
}

/// Updates one attribute and reconfigures the running handler.
///
/// Changing `file` or `append` constructs the handler again.
#[derive(Debug, Clone)]
pub struct HandlerWrite {
    transformer: PeriodicHandlerTransformer,
}

impl HandlerWrite {
    /// Creates the handler.
    #[must_use]
    pub fn new(transformer: PeriodicHandlerTransformer) -> Self {
        Self { transformer }
    }
}

impl WriteAttributeHandler for HandlerWrite {
    fn write(
        &self,
        context: &mut OperationContext<'_>,
        attribute: &AttributeDefinition,
        value: &ModelNode,
    ) -> Result<(), ModelError> {
        ModelWriteHandler::update_model(context, attribute, value)?;
        let generation = install(context, &self.transformer)?;
        tracing::debug!(
            handler = context.resource_name(),
            attribute = attribute.name(),
            generation,
            "handler reconfigured"
        );
        Ok(())
    }
}
