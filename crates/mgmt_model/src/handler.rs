//! Operation and attribute handlers.
//!
//! Handlers are the strategies a resource plugs into the management model.
//! The `Model*` handlers here only touch the stored values; subsystems wrap
//! them to also update their runtime services.

use std::sync::Arc;

use crate::attribute::AttributeDefinition;
use crate::context::OperationContext;
use crate::error::ModelError;
use crate::registry::AttributeRegistry;
use crate::value::{ModelMap, ModelNode};

/// Name of the operation that creates a resource.
pub const ADD: &str = "add";
/// Name of the operation that removes a resource.
pub const REMOVE: &str = "remove";
/// Name of the attribute read operation.
pub const READ_ATTRIBUTE: &str = "read-attribute";
/// Name of the attribute write operation.
pub const WRITE_ATTRIBUTE: &str = "write-attribute";

/// Executes one step of a management operation.
pub trait OperationStepHandler: Send + Sync {
    /// Runs the step against the context's working values.
    ///
    /// # Errors
    ///
    /// Any error aborts the operation and discards the working values.
    fn execute(
        &self,
        context: &mut OperationContext<'_>,
        operation: &ModelNode,
    ) -> Result<(), ModelError>;
}

/// Produces the value of a readable attribute.
pub trait ReadAttributeHandler: Send + Sync {
    /// Reads `attribute` for the context's resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be produced.
    fn read(
        &self,
        context: &OperationContext<'_>,
        attribute: &AttributeDefinition,
    ) -> Result<ModelNode, ModelError>;
}

/// Applies a new value to a writable attribute.
pub trait WriteAttributeHandler: Send + Sync {
    /// Writes `value` to `attribute`. An undefined value clears it.
    ///
    /// # Errors
    ///
    /// Any error aborts the write and leaves the stored values unchanged.
    fn write(
        &self,
        context: &mut OperationContext<'_>,
        attribute: &AttributeDefinition,
        value: &ModelNode,
    ) -> Result<(), ModelError>;
}

/// Populates a new resource's values from the `add` operation parameters.
#[derive(Debug, Clone)]
pub struct ModelAddHandler {
    attributes: Arc<AttributeRegistry>,
}

impl ModelAddHandler {
    /// Creates a handler validating against `attributes`.
    #[must_use]
    pub fn new(attributes: Arc<AttributeRegistry>) -> Self {
        Self { attributes }
    }

    /// Validates every parameter and stores it under its canonical name.
    ///
    /// Parameters may use canonical, XML or legacy names.
    ///
    /// # Errors
    ///
    /// - [`ModelError::UnknownAttribute`] for a parameter no attribute answers to
    /// - [`ModelError::DuplicateAttribute`] if two names set the same attribute
    /// - [`ModelError::AttributeResolution`] for a missing or invalid value
    pub fn populate_model(
        &self,
        context: &mut OperationContext<'_>,
        operation: &ModelNode,
    ) -> Result<(), ModelError> {
        let mut parameters = ModelMap::new();
        if let ModelNode::Object(given) = operation {
            for (name, value) in given {
                let definition = self.attributes.resolve(name)?;
                if parameters.contains_key(definition.name()) {
                    return Err(ModelError::DuplicateAttribute(definition.name().to_string()));
                }
                parameters.insert(definition.name().to_string(), value.clone());
            }
        }

        let parameters = ModelNode::Object(parameters);
        for definition in self.attributes.iter() {
            definition.validate_and_set(&parameters, context.model_mut())?;
        }
        Ok(())
    }
}

impl OperationStepHandler for ModelAddHandler {
    fn execute(
        &self,
        context: &mut OperationContext<'_>,
        operation: &ModelNode,
    ) -> Result<(), ModelError> {
        self.populate_model(context, operation)
    }
}

/// Removes a resource that keeps no runtime state.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelRemoveHandler;

impl OperationStepHandler for ModelRemoveHandler {
    fn execute(
        &self,
        context: &mut OperationContext<'_>,
        _operation: &ModelNode,
    ) -> Result<(), ModelError> {
        context.model_mut().clear();
        Ok(())
    }
}

/// Reads the stored value, falling back to the declared default.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelReadHandler;

impl ReadAttributeHandler for ModelReadHandler {
    fn read(
        &self,
        context: &OperationContext<'_>,
        attribute: &AttributeDefinition,
    ) -> Result<ModelNode, ModelError> {
        Ok(context
            .model()
            .get(attribute.name())
            .or_else(|| attribute.default_value())
            .cloned()
            .unwrap_or(ModelNode::Null))
    }
}

/// Validates and stores a new value without touching runtime services.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelWriteHandler;

impl ModelWriteHandler {
    /// Validates `value` and updates the working values.
    ///
    /// # Errors
    ///
    /// See [`AttributeDefinition::validate`].
    pub fn update_model(
        context: &mut OperationContext<'_>,
        attribute: &AttributeDefinition,
        value: &ModelNode,
    ) -> Result<(), ModelError> {
        attribute.validate(Some(value))?;
        if value.is_null() {
            context.model_mut().remove(attribute.name());
        } else {
            context
                .model_mut()
                .insert(attribute.name().to_string(), value.clone());
        }
        Ok(())
    }
}

impl WriteAttributeHandler for ModelWriteHandler {
    fn write(
        &self,
        context: &mut OperationContext<'_>,
        attribute: &AttributeDefinition,
        value: &ModelNode,
    ) -> Result<(), ModelError> {
        Self::update_model(context, attribute, value)
    }
}

/// Write handler of read-only resources: every write is unsupported.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadOnlyWriteHandler;

impl WriteAttributeHandler for ReadOnlyWriteHandler {
    fn write(
        &self,
        context: &mut OperationContext<'_>,
        attribute: &AttributeDefinition,
        _value: &ModelNode,
    ) -> Result<(), ModelError> {
        Err(ModelError::unsupported(
            WRITE_ATTRIBUTE,
            format!(
                "read-only attribute '{}' of {}",
                attribute.name(),
                context.address()
            ),
        ))
    }
}
