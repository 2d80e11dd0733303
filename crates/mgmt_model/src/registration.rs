//! Resource registrations.
//!
//! [`ManagementResourceRegistration`] is the boundary a
//! [`ResourceDefinition`](crate::resource::ResourceDefinition) registers its
//! attributes and operations through. [`ResourceRegistration`] is the
//! in-memory implementation the [`ManagementModel`](crate::model::ManagementModel)
//! dispatches operations with.

use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::json;

use crate::address::PathElement;
use crate::attribute::AttributeDefinition;
use crate::context::OperationContext;
use crate::error::ModelError;
use crate::handler::{
    ModelReadHandler, OperationStepHandler, READ_ATTRIBUTE, ReadAttributeHandler,
    WRITE_ATTRIBUTE, WriteAttributeHandler,
};
use crate::value::ModelNode;

/// Whether an attribute may be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccessType {
    /// Readable only.
    ReadOnly,
    /// Readable and writable.
    ReadWrite,
}

/// Where an attribute's value lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StorageType {
    /// Persisted configuration.
    Configuration,
    /// Live runtime state.
    Runtime,
}

/// A registered attribute with its access type and handlers.
#[derive(Clone)]
pub struct AttributeAccess {
    definition: AttributeDefinition,
    access: AccessType,
    read_handler: Option<Arc<dyn ReadAttributeHandler>>,
    write_handler: Option<Arc<dyn WriteAttributeHandler>>,
}

impl core::fmt::Debug for AttributeAccess {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AttributeAccess")
            .field("name", &self.definition.name())
            .field("access", &self.access)
            .field("storage", &self.storage_type())
            .field("read_handler", &self.read_handler.is_some())
            .field("write_handler", &self.write_handler.is_some())
            .finish()
    }
}

impl AttributeAccess {
    /// The registered definition.
    #[must_use]
    pub fn definition(&self) -> &AttributeDefinition {
        &self.definition
    }

    /// The access type.
    #[must_use]
    pub fn access_type(&self) -> AccessType {
        self.access
    }

    /// The storage type, derived from the definition's flags.
    #[must_use]
    pub fn storage_type(&self) -> StorageType {
        if self.definition.is_runtime_only() {
            StorageType::Runtime
        } else {
            StorageType::Configuration
        }
    }

    /// The custom read handler, if any.
    #[must_use]
    pub fn read_handler(&self) -> Option<&Arc<dyn ReadAttributeHandler>> {
        self.read_handler.as_ref()
    }

    /// The write handler. Always `None` for read-only attributes.
    #[must_use]
    pub fn write_handler(&self) -> Option<&Arc<dyn WriteAttributeHandler>> {
        self.write_handler.as_ref()
    }
}

/// The registration boundary for a resource's attributes and operations.
pub trait ManagementResourceRegistration {
    /// Registers a readable attribute.
    fn register_read_only_attribute(
        &mut self,
        definition: AttributeDefinition,
        read_handler: Arc<dyn ReadAttributeHandler>,
    );

    /// Registers a readable and writable attribute. Without a read handler
    /// the stored value is read.
    fn register_read_write_attribute(
        &mut self,
        definition: AttributeDefinition,
        read_handler: Option<Arc<dyn ReadAttributeHandler>>,
        write_handler: Arc<dyn WriteAttributeHandler>,
    );

    /// Registers the handler of a named operation.
    fn register_operation_handler(&mut self, name: &str, handler: Arc<dyn OperationStepHandler>);
}

/// In-memory registration of one resource type.
pub struct ResourceRegistration {
    path: PathElement,
    attributes: IndexMap<String, AttributeAccess>,
    operations: IndexMap<String, Arc<dyn OperationStepHandler>>,
}

impl core::fmt::Debug for ResourceRegistration {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ResourceRegistration")
            .field("path", &self.path)
            .field("attributes", &self.attributes.values().collect::<Vec<_>>())
            .field("operations", &self.operation_names().collect::<Vec<_>>())
            .finish()
    }
}

impl ResourceRegistration {
    /// Creates an empty registration for resources at `path`.
    #[must_use]
    pub fn new(path: PathElement) -> Self {
        Self {
            path,
            attributes: IndexMap::new(),
            operations: IndexMap::new(),
        }
    }

    /// The path element of the registered resource type.
    #[must_use]
    pub fn path(&self) -> &PathElement {
        &self.path
    }

    /// Returns the registered attribute with the given canonical name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&AttributeAccess> {
        self.attributes.get(name)
    }

    /// Registered attributes in registration order.
    pub fn attributes(&self) -> impl Iterator<Item = &AttributeAccess> {
        self.attributes.values()
    }

    /// Registered attribute names in registration order.
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    /// Returns the handler of a named operation.
    #[must_use]
    pub fn operation(&self, name: &str) -> Option<&Arc<dyn OperationStepHandler>> {
        self.operations.get(name)
    }

    /// Registered operation names in registration order.
    pub fn operation_names(&self) -> impl Iterator<Item = &str> {
        self.operations.keys().map(String::as_str)
    }

    /// Returns true if nothing has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.operations.is_empty()
    }

    fn registered(&self, name: &str) -> Result<&AttributeAccess, ModelError> {
        self.attributes
            .get(name)
            .ok_or_else(|| ModelError::UnknownAttribute(name.to_string()))
    }

    /// Reads an attribute through its read handler, or from the stored values.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnknownAttribute`] for an unregistered attribute,
    /// or the read handler's error.
    pub fn read_attribute(
        &self,
        context: &OperationContext<'_>,
        name: &str,
    ) -> Result<ModelNode, ModelError> {
        let access = self.registered(name)?;
        match &access.read_handler {
            Some(handler) => handler.read(context, &access.definition),
            None => ModelReadHandler.read(context, &access.definition),
        }
    }

    /// Writes an attribute through its write handler.
    ///
    /// # Errors
    ///
    /// - [`ModelError::UnknownAttribute`] for an unregistered attribute
    /// - [`ModelError::UnsupportedOperation`] for a read-only attribute
    /// - the write handler's error
    pub fn write_attribute(
        &self,
        context: &mut OperationContext<'_>,
        name: &str,
        value: &ModelNode,
    ) -> Result<(), ModelError> {
        let access = self.registered(name)?;
        let Some(handler) = &access.write_handler else {
            tracing::warn!(
                attribute = name,
                address = %context.address(),
                "rejected write to read-only attribute"
            );
            return Err(ModelError::unsupported(
                WRITE_ATTRIBUTE,
                format!("read-only attribute '{name}' of {}", context.address()),
            ));
        };
        handler
            .write(context, &access.definition, value)
            .inspect_err(|err| {
                tracing::warn!(
                    attribute = name,
                    address = %context.address(),
                    error = %err,
                    "write rejected"
                );
            })
    }

    /// Runs a registered operation.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnsupportedOperation`] if no handler is
    /// registered under `operation_name`, or the handler's error.
    pub fn execute(
        &self,
        operation_name: &str,
        context: &mut OperationContext<'_>,
        operation: &ModelNode,
    ) -> Result<(), ModelError> {
        let handler = self.operations.get(operation_name).ok_or_else(|| {
            ModelError::unsupported(operation_name, context.address().to_string())
        })?;
        handler.execute(context, operation)
    }

    /// Describes the registered attributes and operations.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::OperationFailed`] if a definition cannot be
    /// serialized.
    pub fn describe(&self) -> Result<ModelNode, ModelError> {
        let mut attributes = serde_json::Map::new();
        for (name, access) in &self.attributes {
            let definition = serde_json::to_value(&access.definition)
                .map_err(|err| ModelError::operation_failed(err.to_string()))?;
            attributes.insert(
                name.clone(),
                json!({
                    "definition": definition,
                    "access-type": access.access,
                    "storage": access.storage_type(),
                }),
            );
        }

        let mut operations: Vec<&str> = vec![READ_ATTRIBUTE];
        if self.attributes.values().any(|a| a.write_handler.is_some()) {
            operations.push(WRITE_ATTRIBUTE);
        }
        operations.extend(self.operation_names());

        Ok(json!({
            "path": self.path.to_string(),
            "attributes": attributes,
            "operations": operations,
        }))
    }

    fn insert_attribute(&mut self, access: AttributeAccess) {
        let name = access.definition.name().to_string();
        tracing::debug!(
            resource = %self.path,
            attribute = %name,
            access = ?access.access,
            storage = ?access.storage_type(),
            "attribute registered"
        );
        if self.attributes.insert(name.clone(), access).is_some() {
            tracing::debug!(resource = %self.path, attribute = %name, "attribute registration replaced");
        }
    }
}

impl ManagementResourceRegistration for ResourceRegistration {
    fn register_read_only_attribute(
        &mut self,
        definition: AttributeDefinition,
        read_handler: Arc<dyn ReadAttributeHandler>,
    ) {
        self.insert_attribute(AttributeAccess {
            definition,
            access: AccessType::ReadOnly,
            read_handler: Some(read_handler),
            write_handler: None,
        });
    }

    fn register_read_write_attribute(
        &mut self,
        definition: AttributeDefinition,
        read_handler: Option<Arc<dyn ReadAttributeHandler>>,
        write_handler: Arc<dyn WriteAttributeHandler>,
    ) {
        self.insert_attribute(AttributeAccess {
            definition,
            access: AccessType::ReadWrite,
            read_handler,
            write_handler: Some(write_handler),
        });
    }

    fn register_operation_handler(&mut self, name: &str, handler: Arc<dyn OperationStepHandler>) {
        tracing::debug!(resource = %self.path, operation = name, "operation registered");
        self.operations.insert(name.to_string(), handler);
    }
}
