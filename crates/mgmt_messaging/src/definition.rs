//! The security role resource definition.
//!
//! A role lives at `.../security-setting=<match>/role=<name>` and carries one
//! boolean attribute per [`Permissions`] flag. The same attributes back a
//! read-only, runtime-sourced view of the roles that apply to a concrete
//! address.

use std::sync::Arc;

use mgmt_model::address::PathElement;
use mgmt_model::attribute::{
    AttributeDefinition, AttributeDefinitionBuilder, ObjectTypeBuilder, define,
};
use mgmt_model::error::ModelError;
use mgmt_model::expression::ExpressionResolver;
use mgmt_model::flags::AttributeFlags;
use mgmt_model::registry::AttributeRegistry;
use mgmt_model::resource::ResourceDefinition;
use mgmt_model::transform::{ResolvedValues, Transformer};
use mgmt_model::value::{ModelMap, ModelNode, ValueType};
use mgmt_system::service::GlobalService;

use crate::handlers::{SecurityRoleAdd, SecurityRoleReadHandler, SecurityRoleRemove, SecurityRoleWrite};
use crate::role::{PERMISSIONS, Permissions, SecurityRole};

/// Path key of role resources.
pub const ROLE: &str = "role";
/// Name of the role-name field of the object-type view.
pub const NAME: &str = "name";

/// XML names used by older configuration files.
pub const LEGACY_XML_NAMES: [(&str, &str); 2] = [
    ("createTempQueue", "create-non-durable-queue"),
    ("deleteTempQueue", "delete-non-durable-queue"),
];

/// The role attributes, their legacy names, and the resource definitions
/// built from them.
#[derive(Debug, Clone)]
pub struct SecurityRoleDefinition {
    attributes: Arc<AttributeRegistry>,
}

impl GlobalService for SecurityRoleDefinition {}

impl SecurityRoleDefinition {
    /// Builds the role attributes.
    ///
    /// # Errors
    ///
    /// Returns a build-time [`ModelError`] if the attribute table is
    /// inconsistent.
    pub fn new() -> Result<Self, ModelError> {
        let definitions = PERMISSIONS
            .iter()
            .map(|&(name, xml_name, _)| {
                define(name, xml_name, ValueType::Boolean, AttributeFlags::RESTART_NONE)
            })
            .collect::<Result<Vec<_>, _>>()?;
        let attributes = AttributeRegistry::build(definitions)?.with_legacy_aliases(LEGACY_XML_NAMES)?;
        Ok(Self {
            attributes: Arc::new(attributes),
        })
    }

    /// The role attributes in declaration order.
    #[must_use]
    pub fn attributes(&self) -> &Arc<AttributeRegistry> {
        &self.attributes
    }

    /// A writable role resource.
    ///
    /// Runtime-only attributes are registered only when
    /// `register_runtime_only` is set; they are never downgraded to
    /// read-only.
    #[must_use]
    pub fn new_mutable(&self, register_runtime_only: bool) -> ResourceDefinition {
        let transformer = self.transformer();
        ResourceDefinition::new_mutable(
            PathElement::wildcard(ROLE),
            Arc::clone(&self.attributes),
            Arc::new(SecurityRoleAdd::new(
                Arc::clone(&self.attributes),
                transformer.clone(),
            )),
            Arc::new(SecurityRoleRemove),
            register_runtime_only,
        )
        .with_write_handler(Arc::new(SecurityRoleWrite::new(transformer)))
    }

    /// A read-only role resource whose values come from the installed
    /// [`SecuritySettings`](crate::settings::SecuritySettings).
    #[must_use]
    pub fn new_read_only(&self) -> ResourceDefinition {
        ResourceDefinition::new_read_only(
            PathElement::wildcard(ROLE),
            Arc::clone(&self.attributes),
            Arc::new(SecurityRoleReadHandler),
        )
    }

    /// The `role` object type: the role name followed by every permission.
    ///
    /// # Errors
    ///
    /// Returns a build-time [`ModelError`] if the fields are inconsistent.
    pub fn object_type(&self) -> Result<AttributeDefinition, ModelError> {
        let name = AttributeDefinitionBuilder::create(NAME, ValueType::String).build()?;
        let fields = std::iter::once(name).chain(self.attributes.iter().cloned());
        ObjectTypeBuilder::of(ROLE, fields).build()
    }

    /// The transformer producing [`SecurityRole`]s.
    #[must_use]
    pub fn transformer(&self) -> SecurityRoleTransformer {
        SecurityRoleTransformer {
            attributes: Arc::clone(&self.attributes),
        }
    }

    /// Maps XML attributes of a `<role>` element onto model values keyed by
    /// canonical name. Legacy XML names are accepted. Values stay raw text.
    ///
    /// # Errors
    ///
    /// - [`ModelError::UnknownAttribute`] for a name that is not an XML or
    ///   legacy name
    /// - [`ModelError::DuplicateAttribute`] if two names set the same attribute
    pub fn model_from_xml_attributes<'x>(
        &self,
        attributes: impl IntoIterator<Item = (&'x str, &'x str)>,
    ) -> Result<ModelMap, ModelError> {
        let mut model = ModelMap::new();
        for (xml_name, text) in attributes {
            let definition = self
                .attributes
                .by_xml_name()
                .find_map(|(name, definition)| (name == xml_name).then_some(definition))
                .ok_or_else(|| ModelError::UnknownAttribute(xml_name.to_string()))?;
            if model.contains_key(definition.name()) {
                return Err(ModelError::DuplicateAttribute(definition.name().to_string()));
            }
            model.insert(
                definition.name().to_string(),
                ModelNode::String(text.to_string()),
            );
        }
        Ok(model)
    }
}

/// Resolves role attributes into a [`SecurityRole`].
#[derive(Debug, Clone)]
pub struct SecurityRoleTransformer {
    attributes: Arc<AttributeRegistry>,
}

impl Transformer for SecurityRoleTransformer {
    type Output = SecurityRole;

    fn transform(
        &self,
        resolver: &dyn ExpressionResolver,
        name: &str,
        values: &ModelNode,
    ) -> Result<SecurityRole, ModelError> {
        let resolved = ResolvedValues::resolve(resolver, values, self.attributes.iter())?;
        let mut permissions = Permissions::empty();
        for &(attribute, _, permission) in &PERMISSIONS {
            permissions.set(permission, resolved.boolean(attribute)?);
        }
        Ok(SecurityRole::new(name, permissions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mgmt_model::expression::PropertyResolver;
    use mgmt_model::registration::{AccessType, ResourceRegistration};
    use serde_json::json;

    fn definition() -> SecurityRoleDefinition {
        SecurityRoleDefinition::new().unwrap()
    }

    #[test]
    fn attributes_in_declaration_order() {
        let definition = definition();
        let names: Vec<_> = definition.attributes().names().collect();
        assert_eq!(names, PERMISSIONS.map(|(name, _, _)| name));
        assert!(definition.attributes().iter().all(|attribute| {
            attribute.is_required()
                && attribute.default_value().is_none()
                && attribute.flags() == AttributeFlags::RESTART_NONE
        }));
    }

    #[test]
    fn legacy_names_resolve_to_non_durable_queue_attributes() {
        let definition = definition();
        let attributes = definition.attributes();
        for (legacy, canonical) in LEGACY_XML_NAMES {
            assert_eq!(attributes.resolve(legacy).unwrap().name(), canonical);
        }
        assert_eq!(attributes.by_xml_name().count(), PERMISSIONS.len() + 2);
    }

    #[test]
    fn object_type_prepends_name() {
        let role = definition().object_type().unwrap();
        assert_eq!(role.name(), ROLE);
        assert_eq!(role.value_type(), ValueType::Object);
        let fields: Vec<_> = role.fields().iter().map(AttributeDefinition::name).collect();
        assert_eq!(fields.len(), 8);
        assert_eq!(fields[0], NAME);
        assert_eq!(fields[1], "send");
        assert_eq!(fields[7], "manage");
    }

    #[test]
    fn xml_attributes_map_to_canonical_names() {
        let model = definition()
            .model_from_xml_attributes([("send", "true"), ("createTempQueue", "false")])
            .unwrap();
        assert_eq!(
            ModelNode::Object(model),
            json!({"send": "true", "create-non-durable-queue": "false"})
        );

        let err = definition()
            .model_from_xml_attributes([("createTempQueue", "true"), ("createNonDurableQueue", "true")])
            .unwrap_err();
        assert_eq!(
            err,
            ModelError::DuplicateAttribute("create-non-durable-queue".to_string())
        );

        let err = definition()
            .model_from_xml_attributes([("create-durable-queue", "true")])
            .unwrap_err();
        assert_eq!(
            err,
            ModelError::UnknownAttribute("create-durable-queue".to_string())
        );
    }

    #[test]
    fn read_only_registers_runtime_views_without_writes() {
        let mut registration = ResourceRegistration::new(PathElement::wildcard(ROLE));
        let resource = definition().new_read_only();
        resource.register_attributes(&mut registration);
        resource.register_operations(&mut registration);

        assert_eq!(registration.attribute_names().count(), PERMISSIONS.len());
        for access in registration.attributes() {
            assert_eq!(access.access_type(), AccessType::ReadOnly);
            assert!(access.definition().is_runtime_only());
            assert!(access.write_handler().is_none());
        }
        assert_eq!(registration.operation_names().count(), 0);
    }

    #[test]
    fn mutable_registers_writes_and_operations() {
        let mut registration = ResourceRegistration::new(PathElement::wildcard(ROLE));
        let resource = definition().new_mutable(false);
        resource.register_attributes(&mut registration);
        resource.register_operations(&mut registration);

        assert!(registration
            .attributes()
            .all(|access| access.access_type() == AccessType::ReadWrite
                && access.write_handler().is_some()));
        let operations: Vec<_> = registration.operation_names().collect();
        assert_eq!(operations, ["add", "remove"]);
    }

    #[test]
    fn transform_names_the_first_missing_permission() {
        let err = definition()
            .transformer()
            .transform(&PropertyResolver::new(), "auditor", &json!({"send": true}))
            .unwrap_err();
        assert_eq!(err, ModelError::resolution("consume", "missing value"));
    }
}
