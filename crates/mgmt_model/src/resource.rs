//! Resource definitions and the attribute mode controller.
//!
//! A [`ResourceDefinition`] binds an [`AttributeRegistry`] to a path and a set
//! of handlers. Its [`AttributeMode`] decides how each attribute is exposed:
//!
//! | Mode | Configuration attribute | Runtime-only attribute |
//! |------|-------------------------|------------------------|
//! | `ReadOnly` | read-only, runtime-sourced | read-only, runtime-sourced |
//! | `ReadWrite { register_runtime_only: true }` | read-write | read-write |
//! | `ReadWrite { register_runtime_only: false }` | read-write | not registered |
//!
//! Runtime-only attributes are skipped rather than downgraded to read-only
//! when the server does not register runtime resources.

use std::sync::Arc;

use crate::address::PathElement;
use crate::attribute::AttributeDefinition;
use crate::handler::{
    ADD, ModelReadHandler, ModelWriteHandler, OperationStepHandler, REMOVE, ReadAttributeHandler,
    ReadOnlyWriteHandler, WriteAttributeHandler,
};
use crate::registration::{AccessType, ManagementResourceRegistration};
use crate::registry::AttributeRegistry;

/// How a resource's attributes are exposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeMode {
    /// Every attribute is read-only and runtime-sourced.
    ReadOnly,
    /// Attributes are writable; runtime-only ones are registered only when
    /// `register_runtime_only` is set.
    ReadWrite {
        /// Whether the server registers runtime-only attributes.
        register_runtime_only: bool,
    },
}

impl AttributeMode {
    /// Decides how `definition` is registered. `None` means it is skipped.
    #[must_use]
    pub fn access_for(&self, definition: &AttributeDefinition) -> Option<AccessType> {
        match *self {
            Self::ReadOnly => Some(AccessType::ReadOnly),
            Self::ReadWrite {
                register_runtime_only,
            } => (register_runtime_only || !definition.is_runtime_only())
                .then_some(AccessType::ReadWrite),
        }
    }
}

/// The definition of one resource type.
#[derive(Clone)]
pub struct ResourceDefinition {
    path: PathElement,
    attributes: Arc<AttributeRegistry>,
    mode: AttributeMode,
    add_handler: Option<Arc<dyn OperationStepHandler>>,
    remove_handler: Option<Arc<dyn OperationStepHandler>>,
    read_handler: Option<Arc<dyn ReadAttributeHandler>>,
    write_handler: Arc<dyn WriteAttributeHandler>,
}

impl core::fmt::Debug for ResourceDefinition {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ResourceDefinition")
            .field("path", &self.path)
            .field("attributes", &self.attributes.names().collect::<Vec<_>>())
            .field("mode", &self.mode)
            .field("add_handler", &self.add_handler.is_some())
            .field("remove_handler", &self.remove_handler.is_some())
            .finish_non_exhaustive()
    }
}

impl ResourceDefinition {
    /// Defines a resource that can be added, removed and written.
    ///
    /// Attributes are written with [`ModelWriteHandler`] and read from the
    /// stored values until [`with_write_handler`](Self::with_write_handler) or
    /// [`with_read_handler`](Self::with_read_handler) say otherwise.
    #[must_use]
    pub fn new_mutable(
        path: PathElement,
        attributes: Arc<AttributeRegistry>,
        add_handler: Arc<dyn OperationStepHandler>,
        remove_handler: Arc<dyn OperationStepHandler>,
        register_runtime_only: bool,
    ) -> Self {
        Self {
            path,
            attributes,
            mode: AttributeMode::ReadWrite {
                register_runtime_only,
            },
            add_handler: Some(add_handler),
            remove_handler: Some(remove_handler),
            read_handler: None,
            write_handler: Arc::new(ModelWriteHandler),
        }
    }

    /// Defines a read-only view whose values come from `read_handler`.
    ///
    /// The resource has no add or remove operation and rejects every write
    /// with [`ModelError::UnsupportedOperation`](crate::error::ModelError::UnsupportedOperation).
    #[must_use]
    pub fn new_read_only(
        path: PathElement,
        attributes: Arc<AttributeRegistry>,
        read_handler: Arc<dyn ReadAttributeHandler>,
    ) -> Self {
        Self {
            path,
            attributes,
            mode: AttributeMode::ReadOnly,
            add_handler: None,
            remove_handler: None,
            read_handler: Some(read_handler),
            write_handler: Arc::new(ReadOnlyWriteHandler),
        }
    }

    /// Replaces the write handler of a mutable resource. Ignored for
    /// read-only resources.
    #[must_use]
    pub fn with_write_handler(mut self, handler: Arc<dyn WriteAttributeHandler>) -> Self {
        if !self.is_read_only() {
            self.write_handler = handler;
        }
        self
    }

    /// Replaces the read handler.
    #[must_use]
    pub fn with_read_handler(mut self, handler: Arc<dyn ReadAttributeHandler>) -> Self {
        self.read_handler = Some(handler);
        self
    }

    /// The path element resources of this type are registered under.
    #[must_use]
    pub fn path(&self) -> &PathElement {
        &self.path
    }

    /// The attribute registry.
    #[must_use]
    pub fn attributes(&self) -> &Arc<AttributeRegistry> {
        &self.attributes
    }

    /// The attribute mode.
    #[must_use]
    pub fn mode(&self) -> AttributeMode {
        self.mode
    }

    /// Returns true for a read-only view.
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.mode == AttributeMode::ReadOnly
    }

    /// The `add` handler, if resources can be added.
    #[must_use]
    pub fn add_handler(&self) -> Option<&Arc<dyn OperationStepHandler>> {
        self.add_handler.as_ref()
    }

    /// The `remove` handler, if resources can be removed.
    #[must_use]
    pub fn remove_handler(&self) -> Option<&Arc<dyn OperationStepHandler>> {
        self.remove_handler.as_ref()
    }

    /// The read handler. `None` means stored values are read.
    #[must_use]
    pub fn read_handler(&self) -> Option<&Arc<dyn ReadAttributeHandler>> {
        self.read_handler.as_ref()
    }

    /// The write handler. For read-only views every write fails.
    #[must_use]
    pub fn write_handler(&self) -> &Arc<dyn WriteAttributeHandler> {
        &self.write_handler
    }

    /// Registers every attribute as the [`AttributeMode`] decides.
    ///
    /// Read-only views register runtime-sourced copies of the definitions with
    /// the read handler. Mutable resources register writable attributes with
    /// the write handler and skip runtime-only ones unless the mode registers
    /// them.
    pub fn register_attributes(&self, target: &mut dyn ManagementResourceRegistration) {
        for definition in self.attributes.iter() {
            match self.mode.access_for(definition) {
                Some(AccessType::ReadOnly) => {
                    let read_handler: Arc<dyn ReadAttributeHandler> = match &self.read_handler {
                        Some(handler) => Arc::clone(handler),
                        None => Arc::new(ModelReadHandler),
                    };
                    target.register_read_only_attribute(definition.to_runtime_view(), read_handler);
                }
                Some(AccessType::ReadWrite) => {
                    target.register_read_write_attribute(
                        definition.clone(),
                        self.read_handler.clone(),
                        Arc::clone(&self.write_handler),
                    );
                }
                None => {
                    tracing::debug!(
                        resource = %self.path,
                        attribute = definition.name(),
                        "runtime-only attribute not registered"
                    );
                }
            }
        }
    }

    /// Registers the `add` and `remove` operations, when present.
    pub fn register_operations(&self, target: &mut dyn ManagementResourceRegistration) {
        if let Some(handler) = &self.add_handler {
            target.register_operation_handler(ADD, Arc::clone(handler));
        }
        if let Some(handler) = &self.remove_handler {
            target.register_operation_handler(REMOVE, Arc::clone(handler));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::{AttributeDefinitionBuilder, define};
    use crate::flags::AttributeFlags;
    use crate::handler::{ModelAddHandler, ModelRemoveHandler};
    use crate::registration::ResourceRegistration;
    use crate::value::ValueType;

    fn registry() -> Arc<AttributeRegistry> {
        let send = define("send", "send", ValueType::Boolean, AttributeFlags::RESTART_NONE).unwrap();
        let consumers = AttributeDefinitionBuilder::create("consumer-count", ValueType::Int)
            .set_required(false)
            .set_storage_runtime()
            .build()
            .unwrap();
        Arc::new(AttributeRegistry::build([send, consumers]).unwrap())
    }

    fn mutable(register_runtime_only: bool) -> ResourceDefinition {
        let attributes = registry();
        ResourceDefinition::new_mutable(
            PathElement::wildcard("role"),
            Arc::clone(&attributes),
            Arc::new(ModelAddHandler::new(attributes)),
            Arc::new(ModelRemoveHandler),
            register_runtime_only,
        )
    }

    fn registered(definition: &ResourceDefinition) -> ResourceRegistration {
        let mut registration = ResourceRegistration::new(definition.path().clone());
        definition.register_attributes(&mut registration);
        definition.register_operations(&mut registration);
        registration
    }

    #[test]
    fn mode_controller_decisions() {
        let registry = registry();
        let send = registry.get("send").unwrap();
        let consumers = registry.get("consumer-count").unwrap();

        assert_eq!(AttributeMode::ReadOnly.access_for(consumers), Some(AccessType::ReadOnly));
        let skip = AttributeMode::ReadWrite {
            register_runtime_only: false,
        };
        assert_eq!(skip.access_for(send), Some(AccessType::ReadWrite));
        assert_eq!(skip.access_for(consumers), None);
        let all = AttributeMode::ReadWrite {
            register_runtime_only: true,
        };
        assert_eq!(all.access_for(consumers), Some(AccessType::ReadWrite));
    }

    #[test]
    fn mutable_skips_runtime_only_attributes() {
        let registration = registered(&mutable(false));
        assert_eq!(registration.attribute_names().collect::<Vec<_>>(), ["send"]);

        let registration = registered(&mutable(true));
        assert_eq!(
            registration.attribute_names().collect::<Vec<_>>(),
            ["send", "consumer-count"]
        );
        assert!(registration
            .attributes()
            .all(|access| access.access_type() == AccessType::ReadWrite));
        assert_eq!(registration.operation_names().collect::<Vec<_>>(), [ADD, REMOVE]);
    }

    #[test]
    fn read_only_registers_runtime_views_without_writes() {
        let definition = ResourceDefinition::new_read_only(
            PathElement::wildcard("role"),
            registry(),
            Arc::new(ModelReadHandler),
        );
        let registration = registered(&definition);

        assert_eq!(registration.attribute_names().count(), 2);
        for access in registration.attributes() {
            assert_eq!(access.access_type(), AccessType::ReadOnly);
            assert!(access.definition().is_runtime_only());
            assert!(access.write_handler().is_none());
        }
        assert_eq!(registration.operation_names().count(), 0);
        assert!(definition.add_handler().is_none());
    }

    #[test]
    fn registration_is_repeatable() {
        let definition = mutable(false);
        let first = registered(&definition);
        let second = registered(&definition);
        assert_eq!(
            first.attribute_names().collect::<Vec<_>>(),
            second.attribute_names().collect::<Vec<_>>()
        );
        assert_eq!(
            first.operation_names().collect::<Vec<_>>(),
            second.operation_names().collect::<Vec<_>>()
        );
    }

    #[test]
    fn read_only_ignores_write_handler_override() {
        let definition = ResourceDefinition::new_read_only(
            PathElement::wildcard("role"),
            registry(),
            Arc::new(ModelReadHandler),
        )
        .with_write_handler(Arc::new(ModelWriteHandler));
        assert!(definition.is_read_only());
        assert!(registered(&definition)
            .attributes()
            .all(|access| access.write_handler().is_none()));
    }
}
