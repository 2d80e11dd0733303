//! In-memory management model and its extension.
//!
//! The [`ManagementModel`] holds the registered resource types and the live
//! resource instances, and dispatches management operations to the handlers
//! each [`ResourceDefinition`] registered. The [`ManagementExtension`] manages
//! its lifecycle with the two-phase pattern: the model is a mutable staged
//! service while extensions build, and a frozen global service once the server
//! is ready.
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//!
//! use mgmt_model::prelude::*;
//! use mgmt_system::prelude::*;
//!
//! struct RolesExtension;
//!
//! impl Extension for RolesExtension {
//!     fn build(&self, server: &mut Server) {
//!         let send = define("send", "send", ValueType::Boolean, AttributeFlags::RESTART_NONE)
//!             .expect("valid definition");
//!         let attributes = Arc::new(AttributeRegistry::build([send]).expect("unique names"));
//!         let definition = ResourceDefinition::new_mutable(
//!             PathElement::wildcard("role"),
//!             Arc::clone(&attributes),
//!             Arc::new(ModelAddHandler::new(attributes)),
//!             Arc::new(ModelRemoveHandler),
//!             false,
//!         );
//!         server
//!             .get_service_mut::<ManagementModel>()
//!             .expect("ManagementExtension must be added first")
//!             .register_resource(&PathAddress::root(), definition)
//!             .expect("role registered once");
//!     }
//!
//!     fn dependencies(&self) -> Vec<ExtensionId> {
//!         vec![ExtensionId::of::<ManagementExtension>()]
//!     }
//! }
//!
//! let mut server = Server::new();
//! server
//!     .add_extensions(ManagementExtension::default())
//!     .add_extensions(RolesExtension);
//! server.finish();
//!
//! let model = server.get_global::<ManagementModel>().unwrap();
//! let address: PathAddress = "/role=auditor".parse()?;
//! model.add(server.global_services(), &address, &serde_json::json!({"send": true}))?;
//! assert_eq!(
//!     model.read_attribute(server.global_services(), &address, "send")?,
//!     serde_json::json!(true)
//! );
//! # Ok::<(), ModelError>(())
//! ```

use indexmap::IndexMap;
use mgmt_system::extension::Extension;
use mgmt_system::server::Server;
use mgmt_system::service::{GlobalService, ServiceRef, Services};
use parking_lot::RwLock;

use crate::address::PathAddress;
use crate::context::OperationContext;
use crate::error::ModelError;
use crate::expression::PropertyResolver;
use crate::handler::{ADD, REMOVE};
use crate::registration::ResourceRegistration;
use crate::resource::ResourceDefinition;
use crate::transform::Transformer;
use crate::value::{ModelMap, ModelNode};

struct RegisteredResource {
    definition: ResourceDefinition,
    registration: ResourceRegistration,
}

/// Registered resource types and live resource instances.
///
/// Operations that change instances hold the instance write lock for their
/// whole duration, so writes are serialized. Reads and transformations share
/// the read lock and always see a consistent snapshot.
#[derive(Default)]
pub struct ManagementModel {
    resources: IndexMap<PathAddress, RegisteredResource>,
    instances: RwLock<IndexMap<PathAddress, ModelMap>>,
}

impl core::fmt::Debug for ManagementModel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ManagementModel")
            .field("resources", &self.resources.keys().collect::<Vec<_>>())
            .field("instances", &self.instances.read().len())
            .finish()
    }
}

impl GlobalService for ManagementModel {}

impl ManagementModel {
    /// Creates an empty model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a resource type under the `parent` template and returns its
    /// full template address.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::DuplicateResource`] if the template is taken.
    pub fn register_resource(
        &mut self,
        parent: &PathAddress,
        definition: ResourceDefinition,
    ) -> Result<PathAddress, ModelError> {
        let template = parent.append(definition.path().clone());
        if self.resources.contains_key(&template) {
            return Err(ModelError::DuplicateResource(template.to_string()));
        }

        let mut registration = ResourceRegistration::new(definition.path().clone());
        definition.register_attributes(&mut registration);
        definition.register_operations(&mut registration);

        tracing::info!(
            template = %template,
            read_only = definition.is_read_only(),
            attributes = registration.attribute_names().count(),
            "resource registered"
        );
        self.resources.insert(
            template.clone(),
            RegisteredResource {
                definition,
                registration,
            },
        );
        Ok(template)
    }

    /// Returns the registration of a resource type by template.
    #[must_use]
    pub fn registration(&self, template: &PathAddress) -> Option<&ResourceRegistration> {
        self.resources.get(template).map(|r| &r.registration)
    }

    /// Returns the definition of a resource type by template.
    #[must_use]
    pub fn definition(&self, template: &PathAddress) -> Option<&ResourceDefinition> {
        self.resources.get(template).map(|r| &r.definition)
    }

    /// Registered templates in registration order.
    pub fn templates(&self) -> impl Iterator<Item = &PathAddress> {
        self.resources.keys()
    }

    /// Returns the number of registered resource types.
    #[must_use]
    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    /// Returns true if a resource instance exists at `address`.
    #[must_use]
    pub fn contains(&self, address: &PathAddress) -> bool {
        self.instances.read().contains_key(address)
    }

    /// Addresses of all resource instances, in creation order.
    #[must_use]
    pub fn instance_addresses(&self) -> Vec<PathAddress> {
        self.instances.read().keys().cloned().collect()
    }

    /// A snapshot of the stored values at `address`.
    #[must_use]
    pub fn values(&self, address: &PathAddress) -> Option<ModelMap> {
        self.instances.read().get(address).cloned()
    }

    fn lookup(&self, address: &PathAddress) -> Result<&RegisteredResource, ModelError> {
        self.resources
            .iter()
            .find(|(template, _)| template.matches(address))
            .map(|(_, resource)| resource)
            .ok_or_else(|| ModelError::ResourceNotFound(address.to_string()))
    }

    fn resolver(services: &Services) -> Result<ServiceRef<'_, PropertyResolver>, ModelError> {
        services
            .get::<PropertyResolver>()
            .map_err(|err| ModelError::operation_failed(err.to_string()))
    }

    /// Creates the resource at `address` from the `add` parameters.
    ///
    /// # Errors
    ///
    /// - [`ModelError::ResourceNotFound`] if no type is registered for the
    ///   address, or its registered parent does not exist
    /// - [`ModelError::UnsupportedOperation`] for read-only resource types
    /// - [`ModelError::DuplicateResource`] if the resource exists
    /// - the add handler's error; nothing is stored in that case
    pub fn add(
        &self,
        services: &Services,
        address: &PathAddress,
        operation: &ModelNode,
    ) -> Result<(), ModelError> {
        let resource = self.lookup(address)?;
        let resolver = Self::resolver(services)?;
        let mut instances = self.instances.write();

        if instances.contains_key(address) {
            return Err(ModelError::DuplicateResource(address.to_string()));
        }
        let parent = address.parent();
        let parent_is_stored = self
            .lookup(&parent)
            .is_ok_and(|parent_type| !parent_type.definition.is_read_only());
        if parent_is_stored && !instances.contains_key(&parent) {
            return Err(ModelError::ResourceNotFound(parent.to_string()));
        }

        let mut context = OperationContext::new(address.clone(), &*resolver, services, ModelMap::new());
        resource.registration.execute(ADD, &mut context, operation)?;

        instances.insert(address.clone(), context.into_model());
        tracing::info!(address = %address, "resource added");
        Ok(())
    }

    /// Removes the resource at `address`.
    ///
    /// # Errors
    ///
    /// - [`ModelError::ResourceNotFound`] if the resource does not exist
    /// - [`ModelError::UnsupportedOperation`] for read-only resource types
    /// - [`ModelError::OperationFailed`] if child resources still exist
    /// - the remove handler's error; nothing is removed in that case
    pub fn remove(&self, services: &Services, address: &PathAddress) -> Result<(), ModelError> {
        let resource = self.lookup(address)?;
        let resolver = Self::resolver(services)?;
        let mut instances = self.instances.write();

        let values = instances
            .get(address)
            .cloned()
            .ok_or_else(|| ModelError::ResourceNotFound(address.to_string()))?;
        if instances.keys().any(|other| other.is_descendant_of(address)) {
            return Err(ModelError::operation_failed(format!(
                "cannot remove {address}: child resources exist"
            )));
        }

        let mut context = OperationContext::new(address.clone(), &*resolver, services, values);
        resource
            .registration
            .execute(REMOVE, &mut context, &ModelNode::Null)?;

        instances.shift_remove(address);
        tracing::info!(address = %address, "resource removed");
        Ok(())
    }

    /// Reads one attribute. `name` may be canonical, XML or legacy.
    ///
    /// Read-only resource types are runtime-sourced and need no stored instance.
    ///
    /// # Errors
    ///
    /// - [`ModelError::UnknownAttribute`] if the name resolves to no
    ///   registered attribute
    /// - [`ModelError::ResourceNotFound`] if the resource does not exist
    /// - the read handler's error
    pub fn read_attribute(
        &self,
        services: &Services,
        address: &PathAddress,
        name: &str,
    ) -> Result<ModelNode, ModelError> {
        let resource = self.lookup(address)?;
        let canonical = resource.definition.attributes().resolve(name)?.name();
        let resolver = Self::resolver(services)?;
        let instances = self.instances.read();

        let values = Self::stored_values(resource, &instances, address)?;
        let context = OperationContext::new(address.clone(), &*resolver, services, values);
        resource.registration.read_attribute(&context, canonical)
    }

    /// Writes one attribute. `name` may be canonical, XML or legacy.
    ///
    /// # Errors
    ///
    /// - [`ModelError::UnknownAttribute`] if the name resolves to no
    ///   registered attribute
    /// - [`ModelError::UnsupportedOperation`] for read-only attributes
    /// - [`ModelError::ResourceNotFound`] if the resource does not exist
    /// - the write handler's error; the stored values are unchanged in that case
    pub fn write_attribute(
        &self,
        services: &Services,
        address: &PathAddress,
        name: &str,
        value: &ModelNode,
    ) -> Result<(), ModelError> {
        let resource = self.lookup(address)?;
        let canonical = resource.definition.attributes().resolve(name)?.name();
        let resolver = Self::resolver(services)?;
        let mut instances = self.instances.write();

        let values = Self::stored_values(resource, &instances, address)?;
        let mut context = OperationContext::new(address.clone(), &*resolver, services, values);
        resource
            .registration
            .write_attribute(&mut context, canonical, value)?;

        if let Some(stored) = instances.get_mut(address) {
            *stored = context.into_model();
        }
        tracing::debug!(address = %address, attribute = canonical, "attribute written");
        Ok(())
    }

    /// Reads every registered attribute of a resource.
    ///
    /// # Errors
    ///
    /// As for [`read_attribute`](Self::read_attribute).
    pub fn read_resource(
        &self,
        services: &Services,
        address: &PathAddress,
    ) -> Result<ModelNode, ModelError> {
        let resource = self.lookup(address)?;
        let resolver = Self::resolver(services)?;
        let instances = self.instances.read();

        let values = Self::stored_values(resource, &instances, address)?;
        let context = OperationContext::new(address.clone(), &*resolver, services, values);
        let mut result = ModelMap::new();
        for name in resource.registration.attribute_names() {
            let value = resource.registration.read_attribute(&context, name)?;
            result.insert(name.to_string(), value);
        }
        Ok(ModelNode::Object(result))
    }

    /// Runs `transformer` over a consistent snapshot of the resource's values.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::ResourceNotFound`] if the resource does not
    /// exist, or the transformer's error.
    pub fn transform<T: Transformer>(
        &self,
        services: &Services,
        address: &PathAddress,
        transformer: &T,
    ) -> Result<T::Output, ModelError> {
        let resolver = Self::resolver(services)?;
        let instances = self.instances.read();
        let values = instances
            .get(address)
            .ok_or_else(|| ModelError::ResourceNotFound(address.to_string()))?;
        let name = address.last().map_or("", |element| element.value());
        transformer.transform(&*resolver, name, &ModelNode::Object(values.clone()))
    }

    fn stored_values(
        resource: &RegisteredResource,
        instances: &IndexMap<PathAddress, ModelMap>,
        address: &PathAddress,
    ) -> Result<ModelMap, ModelError> {
        if resource.definition.is_read_only() {
            return Ok(ModelMap::new());
        }
        instances
            .get(address)
            .cloned()
            .ok_or_else(|| ModelError::ResourceNotFound(address.to_string()))
    }
}

/// Extension that provides the [`ManagementModel`] and the
/// [`PropertyResolver`] used for expression resolution.
///
/// Subsystem extensions depend on it and register their resource definitions
/// on the staged model in `build()`.
#[derive(Debug, Clone, Default)]
pub struct ManagementExtension {
    resolver: PropertyResolver,
}

impl ManagementExtension {
    /// Adds a property available to `${...}` expressions.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.resolver = self.resolver.with_property(key, value);
        self
    }

    /// Enables `${env.NAME}` expressions.
    #[must_use]
    pub fn with_environment(mut self, enabled: bool) -> Self {
        self.resolver = self.resolver.with_environment(enabled);
        self
    }
}

impl Extension for ManagementExtension {
    fn build(&self, server: &mut Server) {
        server.insert_service(ManagementModel::new());
        server.insert_global(self.resolver.clone());
    }

    fn ready(&self, server: &mut Server) {
        let model = server
            .remove_service::<ManagementModel>()
            .expect("ManagementModel should exist from build phase");
        tracing::info!(resources = model.resource_count(), "management model ready");
        server.insert_global(model);
    }

    fn name(&self) -> &str {
        "mgmt::management"
    }
}
