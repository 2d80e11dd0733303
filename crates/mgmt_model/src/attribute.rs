//! Attribute definitions.
//!
//! An [`AttributeDefinition`] is the immutable schema of one named attribute:
//! its canonical and XML names, [`ValueType`], [`AttributeFlags`] and
//! validation rules. Definitions are created with [`define`] for the common
//! case, with [`AttributeDefinitionBuilder`] for everything else, and with
//! [`ObjectTypeBuilder`] for composite attributes.
//!
//! # Example
//!
//! ```
//! use mgmt_model::attribute::{define, AttributeDefinitionBuilder};
//! use mgmt_model::flags::AttributeFlags;
//! use mgmt_model::value::ValueType;
//!
//! let send = define("send", "send", ValueType::Boolean, AttributeFlags::RESTART_NONE)?;
//! assert_eq!(send.xml_name(), "send");
//!
//! let append = AttributeDefinitionBuilder::create("append", ValueType::Boolean)
//!     .set_default_value(true)
//!     .set_allow_expression(true)
//!     .set_flags(AttributeFlags::RESTART_NONE)
//!     .build()?;
//! assert!(!append.is_required());
//! # Ok::<(), mgmt_model::error::ModelError>(())
//! ```

use serde::Serialize;

use crate::error::ModelError;
use crate::expression::{ExpressionResolver, is_expression};
use crate::flags::AttributeFlags;
use crate::value::{ModelMap, ModelNode, ValueType, kind_of};

/// The immutable schema of one attribute.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeDefinition {
    name: String,
    xml_name: String,
    value_type: ValueType,
    flags: AttributeFlags,
    required: bool,
    allow_expression: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    default_value: Option<ModelNode>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    allowed_values: Vec<ModelNode>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    fields: Vec<AttributeDefinition>,
}

/// Defines a required scalar attribute.
///
/// # Errors
///
/// Returns [`ModelError::InvalidDefinition`] if either name is empty or
/// `value_type` is not a scalar type. Composite attributes are built with
/// [`ObjectTypeBuilder`] or [`AttributeDefinitionBuilder`].
pub fn define(
    name: &str,
    xml_name: &str,
    value_type: ValueType,
    flags: AttributeFlags,
) -> Result<AttributeDefinition, ModelError> {
    if !value_type.is_simple() {
        return Err(ModelError::invalid_definition(
            name,
            format!("{value_type} is not supported for simple attributes"),
        ));
    }
    AttributeDefinitionBuilder::create(name, value_type)
        .set_xml_name(xml_name)
        .set_flags(flags)
        .build()
}

impl AttributeDefinition {
    /// The canonical name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The name used in XML configuration.
    #[must_use]
    pub fn xml_name(&self) -> &str {
        &self.xml_name
    }

    /// The declared value type.
    #[must_use]
    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// The attribute flags.
    #[must_use]
    pub fn flags(&self) -> AttributeFlags {
        self.flags
    }

    /// Returns true when a value (or a default) must be present.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Returns true when `${...}` expressions are accepted.
    #[must_use]
    pub fn allows_expression(&self) -> bool {
        self.allow_expression
    }

    /// The value used when none is set.
    #[must_use]
    pub fn default_value(&self) -> Option<&ModelNode> {
        self.default_value.as_ref()
    }

    /// The permitted values. Empty means unrestricted.
    #[must_use]
    pub fn allowed_values(&self) -> &[ModelNode] {
        &self.allowed_values
    }

    /// Field definitions of an object attribute.
    #[must_use]
    pub fn fields(&self) -> &[AttributeDefinition] {
        &self.fields
    }

    /// Returns true when the value is runtime state.
    #[must_use]
    pub fn is_runtime_only(&self) -> bool {
        self.flags.is_runtime_only()
    }

    /// Returns a copy of this definition marked as runtime-sourced.
    #[must_use]
    pub fn to_runtime_view(&self) -> Self {
        let mut view = self.clone();
        view.flags |= AttributeFlags::STORAGE_RUNTIME;
        view
    }

    /// Validates a raw (unresolved) value for this attribute.
    ///
    /// Expressions are accepted unresolved when the definition allows them.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::AttributeResolution`] when the value is missing
    /// without a default, has the wrong type or is not an allowed value.
    pub fn validate(&self, value: Option<&ModelNode>) -> Result<(), ModelError> {
        let Some(value) = value.filter(|v| !v.is_null()) else {
            return if self.required && self.default_value.is_none() {
                Err(ModelError::resolution(&self.name, "missing value"))
            } else {
                Ok(())
            };
        };

        if self.value_type == ValueType::Object {
            let map = self.expect_object(value)?;
            return self.fields.iter().try_for_each(|field| {
                field
                    .validate(map.get(&field.name))
                    .map_err(|err| self.nested(err))
            });
        }

        if is_expression(value) {
            return self.check_expression_allowed();
        }
        let typed = self
            .value_type
            .coerce(value)
            .map_err(|reason| ModelError::resolution(&self.name, reason))?;
        self.check_allowed(typed).map(drop)
    }

    /// Validates this attribute's value in `operation` and copies it into `model`.
    ///
    /// An absent or undefined value clears the attribute from the model.
    ///
    /// # Errors
    ///
    /// See [`validate`](Self::validate).
    pub fn validate_and_set(
        &self,
        operation: &ModelNode,
        model: &mut ModelMap,
    ) -> Result<(), ModelError> {
        let value = operation.get(&self.name);
        self.validate(value)?;
        match value.filter(|v| !v.is_null()) {
            Some(value) => {
                model.insert(self.name.clone(), value.clone());
            }
            None => {
                model.remove(&self.name);
            }
        }
        Ok(())
    }

    /// Resolves this attribute from the object `model`.
    ///
    /// # Errors
    ///
    /// See [`resolve_value`](Self::resolve_value).
    pub fn resolve_model_attribute(
        &self,
        resolver: &dyn ExpressionResolver,
        model: &ModelNode,
    ) -> Result<ModelNode, ModelError> {
        self.resolve_value(resolver, model.get(&self.name))
    }

    /// Resolves a raw value: applies the default, resolves expressions,
    /// coerces to the declared type and checks the allowed values.
    ///
    /// Returns `null` for an absent optional attribute without a default.
    ///
    /// # Errors
    ///
    /// - [`ModelError::AttributeResolution`] if the value is missing, has the
    ///   wrong type or fails validation
    /// - [`ModelError::OperationFailed`] if the resolver fails
    pub fn resolve_value(
        &self,
        resolver: &dyn ExpressionResolver,
        raw: Option<&ModelNode>,
    ) -> Result<ModelNode, ModelError> {
        let Some(raw) = raw.filter(|v| !v.is_null()) else {
            return match &self.default_value {
                Some(default) => Ok(default.clone()),
                None if self.required => Err(ModelError::resolution(&self.name, "missing value")),
                None => Ok(ModelNode::Null),
            };
        };

        if self.value_type == ValueType::Object {
            return self.resolve_object(resolver, raw);
        }
        if is_expression(raw) {
            self.check_expression_allowed()?;
        }

        let resolved = resolver.resolve(self, raw)?;
        let typed = self
            .value_type
            .coerce(&resolved)
            .map_err(|reason| ModelError::resolution(&self.name, reason))?;
        self.check_allowed(typed)
    }

    fn resolve_object(
        &self,
        resolver: &dyn ExpressionResolver,
        raw: &ModelNode,
    ) -> Result<ModelNode, ModelError> {
        let map = self.expect_object(raw)?;
        let mut resolved = ModelMap::new();
        for field in &self.fields {
            let value = field
                .resolve_value(resolver, map.get(&field.name))
                .map_err(|err| self.nested(err))?;
            if !value.is_null() {
                resolved.insert(field.name.clone(), value);
            }
        }
        Ok(ModelNode::Object(resolved))
    }

    fn expect_object<'v>(&self, value: &'v ModelNode) -> Result<&'v ModelMap, ModelError> {
        let ModelNode::Object(map) = value else {
            return Err(ModelError::resolution(
                &self.name,
                format!("expected OBJECT, found {}", kind_of(value)),
            ));
        };
        if let Some(unknown) = map
            .keys()
            .find(|key| !self.fields.iter().any(|field| &field.name == *key))
        {
            return Err(ModelError::resolution(
                &self.name,
                format!("unknown field '{unknown}'"),
            ));
        }
        Ok(map)
    }

    // Field errors are reported as `object.field`.
    fn nested(&self, err: ModelError) -> ModelError {
        match err {
            ModelError::AttributeResolution { attribute, reason } => {
                ModelError::resolution(format!("{}.{attribute}", self.name), reason)
            }
            other => other,
        }
    }

    fn check_expression_allowed(&self) -> Result<(), ModelError> {
        if self.allow_expression {
            Ok(())
        } else {
            Err(ModelError::resolution(
                &self.name,
                "expressions are not allowed",
            ))
        }
    }

    /// Returns the matching allowed value. Text matches ignore ASCII case and
    /// yield the declared spelling.
    fn check_allowed(&self, typed: ModelNode) -> Result<ModelNode, ModelError> {
        if self.allowed_values.is_empty() {
            return Ok(typed);
        }
        let found = self.allowed_values.iter().find(|allowed| match (allowed, &typed) {
            (ModelNode::String(a), ModelNode::String(v)) => a.eq_ignore_ascii_case(v),
            (a, v) => *a == v,
        });
        match found {
            Some(allowed) => Ok(allowed.clone()),
            None => Err(ModelError::resolution(
                &self.name,
                format!("{typed} is not one of the allowed values"),
            )),
        }
    }
}

/// Builds an [`AttributeDefinition`].
///
/// Attributes are required by default and the XML name defaults to the
/// canonical name.
#[derive(Debug, Clone)]
#[must_use]
pub struct AttributeDefinitionBuilder {
    name: String,
    xml_name: Option<String>,
    value_type: ValueType,
    flags: AttributeFlags,
    required: bool,
    allow_expression: bool,
    default_value: Option<ModelNode>,
    allowed_values: Vec<ModelNode>,
    fields: Vec<AttributeDefinition>,
}

impl From<&AttributeDefinition> for AttributeDefinitionBuilder {
    /// Starts from a copy of an existing definition.
    fn from(definition: &AttributeDefinition) -> Self {
        Self {
            name: definition.name.clone(),
            xml_name: Some(definition.xml_name.clone()),
            value_type: definition.value_type,
            flags: definition.flags,
            required: definition.required,
            allow_expression: definition.allow_expression,
            default_value: definition.default_value.clone(),
            allowed_values: definition.allowed_values.clone(),
            fields: definition.fields.clone(),
        }
    }
}

impl AttributeDefinitionBuilder {
    /// Starts a definition with the given canonical name and type.
    pub fn create(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            xml_name: None,
            value_type,
            flags: AttributeFlags::empty(),
            required: true,
            allow_expression: false,
            default_value: None,
            allowed_values: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// Sets the XML name.
    pub fn set_xml_name(mut self, xml_name: impl Into<String>) -> Self {
        self.xml_name = Some(xml_name.into());
        self
    }

    /// Replaces the flags.
    pub fn set_flags(mut self, flags: AttributeFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Adds flags.
    pub fn add_flag(mut self, flag: AttributeFlags) -> Self {
        self.flags |= flag;
        self
    }

    /// Marks the value as runtime state.
    pub fn set_storage_runtime(self) -> Self {
        self.add_flag(AttributeFlags::STORAGE_RUNTIME)
    }

    /// Sets whether a value must be present.
    pub fn set_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Sets whether `${...}` expressions are accepted.
    pub fn set_allow_expression(mut self, allow: bool) -> Self {
        self.allow_expression = allow;
        self
    }

    /// Sets the default value. An attribute with a default is optional.
    pub fn set_default_value(mut self, value: impl Into<ModelNode>) -> Self {
        self.default_value = Some(value.into());
        self.required = false;
        self
    }

    /// Restricts the attribute to the given values.
    pub fn set_allowed_values<V: Into<ModelNode>>(
        mut self,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.allowed_values = values.into_iter().map(Into::into).collect();
        self
    }

    /// Validates the declaration and builds the definition.
    ///
    /// # Errors
    ///
    /// - [`ModelError::InvalidDefinition`] for empty or blank names, conflicting
    ///   restart flags, an object without fields, or a default or allowed value
    ///   that does not fit the declared type
    /// - [`ModelError::DuplicateAttribute`] if two object fields share a name
    pub fn build(self) -> Result<AttributeDefinition, ModelError> {
        let name = self.name;
        if name.trim().is_empty() {
            return Err(ModelError::invalid_definition(
                name,
                "attribute name must not be empty",
            ));
        }
        if name.chars().any(char::is_whitespace) {
            return Err(ModelError::invalid_definition(
                name,
                "attribute name must not contain whitespace",
            ));
        }
        let xml_name = self.xml_name.unwrap_or_else(|| name.clone());
        if xml_name.trim().is_empty() {
            return Err(ModelError::invalid_definition(
                name,
                "xml name must not be empty",
            ));
        }
        if self.flags.has_conflicting_restart() {
            return Err(ModelError::invalid_definition(
                name,
                format!("conflicting restart flags {:?}", self.flags),
            ));
        }

        match self.value_type {
            ValueType::Object if self.fields.is_empty() => {
                return Err(ModelError::invalid_definition(
                    name,
                    "object attributes need at least one field",
                ));
            }
            ValueType::Object => {
                for (i, field) in self.fields.iter().enumerate() {
                    if self.fields[..i].iter().any(|f| f.name == field.name) {
                        return Err(ModelError::DuplicateAttribute(format!(
                            "{name}.{}",
                            field.name
                        )));
                    }
                }
            }
            _ if !self.fields.is_empty() => {
                return Err(ModelError::invalid_definition(
                    name,
                    format!("{} attributes cannot have fields", self.value_type),
                ));
            }
            _ => {}
        }

        let allowed_values = self
            .allowed_values
            .iter()
            .map(|value| self.value_type.coerce(value))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|reason| {
                ModelError::invalid_definition(&name, format!("allowed value: {reason}"))
            })?;

        let definition = AttributeDefinition {
            name,
            xml_name,
            value_type: self.value_type,
            flags: self.flags,
            required: self.required,
            allow_expression: self.allow_expression,
            default_value: None,
            allowed_values,
            fields: self.fields,
        };

        let default_value = match self.default_value {
            Some(default) if is_expression(&default) => Some(default),
            Some(default) => {
                let typed = definition
                    .value_type
                    .coerce(&default)
                    .and_then(|typed| {
                        definition
                            .check_allowed(typed)
                            .map_err(|err| err.to_string())
                    })
                    .map_err(|reason| {
                        ModelError::invalid_definition(
                            &definition.name,
                            format!("default value: {reason}"),
                        )
                    })?;
                Some(typed)
            }
            None => None,
        };

        Ok(AttributeDefinition {
            default_value,
            ..definition
        })
    }
}

/// Builds a composite [`ValueType::Object`] attribute from field definitions.
///
/// # Example
///
/// ```
/// use mgmt_model::attribute::{AttributeDefinitionBuilder, ObjectTypeBuilder};
/// use mgmt_model::value::ValueType;
///
/// let path = AttributeDefinitionBuilder::create("path", ValueType::String).build()?;
/// let relative_to = AttributeDefinitionBuilder::create("relative-to", ValueType::String)
///     .set_required(false)
///     .build()?;
/// let file = ObjectTypeBuilder::of("file", [relative_to, path]).build()?;
/// assert_eq!(file.fields().len(), 2);
/// # Ok::<(), mgmt_model::error::ModelError>(())
/// ```
#[derive(Debug, Clone)]
#[must_use]
pub struct ObjectTypeBuilder {
    inner: AttributeDefinitionBuilder,
}

impl ObjectTypeBuilder {
    /// Starts an object attribute with the given fields, in order.
    pub fn of(
        name: impl Into<String>,
        fields: impl IntoIterator<Item = AttributeDefinition>,
    ) -> Self {
        let mut inner = AttributeDefinitionBuilder::create(name, ValueType::Object);
        inner.fields = fields.into_iter().collect();
        Self { inner }
    }

    /// Sets the XML name.
    pub fn set_xml_name(self, xml_name: impl Into<String>) -> Self {
        Self {
            inner: self.inner.set_xml_name(xml_name),
        }
    }

    /// Replaces the flags.
    pub fn set_flags(self, flags: AttributeFlags) -> Self {
        Self {
            inner: self.inner.set_flags(flags),
        }
    }

    /// Sets whether a value must be present.
    pub fn set_required(self, required: bool) -> Self {
        Self {
            inner: self.inner.set_required(required),
        }
    }

    /// Sets whether field values may hold expressions.
    pub fn set_allow_expression(self, allow: bool) -> Self {
        Self {
            inner: self.inner.set_allow_expression(allow),
        }
    }

    /// Builds the definition.
    ///
    /// # Errors
    ///
    /// See [`AttributeDefinitionBuilder::build`].
    pub fn build(self) -> Result<AttributeDefinition, ModelError> {
        self.inner.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::PropertyResolver;
    use serde_json::json;

    fn file() -> AttributeDefinition {
        let relative_to = AttributeDefinitionBuilder::create("relative-to", ValueType::String)
            .set_required(false)
            .set_allow_expression(true)
            .build()
            .unwrap();
        let path = AttributeDefinitionBuilder::create("path", ValueType::String)
            .set_allow_expression(true)
            .build()
            .unwrap();
        ObjectTypeBuilder::of("file", [relative_to, path]).build().unwrap()
    }

    #[test]
    fn define_rejects_empty_names() {
        let err = define("", "send", ValueType::Boolean, AttributeFlags::RESTART_NONE).unwrap_err();
        assert!(matches!(err, ModelError::InvalidDefinition { .. }));

        let err = define("send", "", ValueType::Boolean, AttributeFlags::RESTART_NONE).unwrap_err();
        assert!(matches!(err, ModelError::InvalidDefinition { name, .. } if name == "send"));
    }

    #[test]
    fn define_rejects_composite_types() {
        for value_type in [ValueType::Object, ValueType::List] {
            let err = define("role", "role", value_type, AttributeFlags::RESTART_NONE).unwrap_err();
            assert!(matches!(err, ModelError::InvalidDefinition { .. }));
        }
    }

    #[test]
    fn xml_name_defaults_to_name() {
        let def = AttributeDefinitionBuilder::create("autoflush", ValueType::Boolean)
            .build()
            .unwrap();
        assert_eq!(def.xml_name(), "autoflush");
        assert!(def.is_required());
    }

    #[test]
    fn conflicting_restart_flags_are_invalid() {
        let err = AttributeDefinitionBuilder::create("send", ValueType::Boolean)
            .set_flags(AttributeFlags::RESTART_NONE | AttributeFlags::RESTART_JVM)
            .build()
            .unwrap_err();
        assert!(matches!(err, ModelError::InvalidDefinition { .. }));
    }

    #[test]
    fn default_must_fit_type_and_allowed_values() {
        let err = AttributeDefinitionBuilder::create("level", ValueType::String)
            .set_allowed_values(["INFO", "DEBUG"])
            .set_default_value("LOUD")
            .build()
            .unwrap_err();
        assert!(matches!(err, ModelError::InvalidDefinition { .. }));

        let err = AttributeDefinitionBuilder::create("append", ValueType::Boolean)
            .set_default_value("maybe")
            .build()
            .unwrap_err();
        assert!(matches!(err, ModelError::InvalidDefinition { .. }));
    }

    #[test]
    fn from_copies_and_runtime_view_sets_storage() {
        let send = define("send", "send", ValueType::Boolean, AttributeFlags::RESTART_NONE).unwrap();
        let copy = AttributeDefinitionBuilder::from(&send).build().unwrap();
        assert_eq!(copy, send);

        let view = AttributeDefinitionBuilder::from(&send)
            .set_storage_runtime()
            .build()
            .unwrap();
        assert!(view.is_runtime_only());
        assert_eq!(view, send.to_runtime_view());
        assert_eq!(view.xml_name(), send.xml_name());
    }

    #[test]
    fn resolve_applies_default_and_coerces() {
        let resolver = PropertyResolver::new();
        let append = AttributeDefinitionBuilder::create("append", ValueType::Boolean)
            .set_default_value(true)
            .build()
            .unwrap();

        assert_eq!(append.resolve_model_attribute(&resolver, &json!({})).unwrap(), json!(true));
        assert_eq!(
            append.resolve_model_attribute(&resolver, &json!({"append": "false"})).unwrap(),
            json!(false)
        );
    }

    #[test]
    fn resolve_reports_missing_and_wrong_type() {
        let resolver = PropertyResolver::new();
        let manage = define("manage", "manage", ValueType::Boolean, AttributeFlags::RESTART_NONE).unwrap();

        let err = manage.resolve_model_attribute(&resolver, &json!({})).unwrap_err();
        assert_eq!(err, ModelError::resolution("manage", "missing value"));

        let err = manage
            .resolve_model_attribute(&resolver, &json!({"manage": "sometimes"}))
            .unwrap_err();
        assert!(matches!(err, ModelError::AttributeResolution { attribute, .. } if attribute == "manage"));
    }

    #[test]
    fn expressions_need_permission() {
        let resolver = PropertyResolver::new().with_property("flush", "false");
        let strict = define("autoflush", "autoflush", ValueType::Boolean, AttributeFlags::RESTART_NONE).unwrap();
        let lenient = AttributeDefinitionBuilder::from(&strict)
            .set_allow_expression(true)
            .build()
            .unwrap();
        let model = json!({"autoflush": "${flush}"});

        assert!(matches!(
            strict.resolve_model_attribute(&resolver, &model),
            Err(ModelError::AttributeResolution { .. })
        ));
        assert!(strict.validate(model.get("autoflush")).is_err());
        assert_eq!(lenient.resolve_model_attribute(&resolver, &model).unwrap(), json!(false));
        assert!(lenient.validate(model.get("autoflush")).is_ok());
    }

    #[test]
    fn allowed_values_normalize_case() {
        let resolver = PropertyResolver::new();
        let level = AttributeDefinitionBuilder::create("level", ValueType::String)
            .set_allowed_values(["INFO", "DEBUG"])
            .build()
            .unwrap();
        assert_eq!(
            level.resolve_model_attribute(&resolver, &json!({"level": "info"})).unwrap(),
            json!("INFO")
        );
        assert!(level.resolve_model_attribute(&resolver, &json!({"level": "LOUD"})).is_err());
    }

    #[test]
    fn object_fields_resolve_and_report_nested_names() {
        let resolver = PropertyResolver::new().with_property("log.dir", "/var/log");
        let file = file();

        let resolved = file
            .resolve_model_attribute(&resolver, &json!({"file": {"path": "${log.dir}/server.log"}}))
            .unwrap();
        assert_eq!(resolved, json!({"path": "/var/log/server.log"}));

        let err = file
            .resolve_model_attribute(&resolver, &json!({"file": {"relative-to": "x"}}))
            .unwrap_err();
        assert_eq!(err, ModelError::resolution("file.path", "missing value"));

        let err = file
            .resolve_model_attribute(&resolver, &json!({"file": {"path": "a", "size": 1}}))
            .unwrap_err();
        assert!(matches!(err, ModelError::AttributeResolution { attribute, .. } if attribute == "file"));
    }

    #[test]
    fn duplicate_object_fields_are_rejected() {
        let name = define("name", "name", ValueType::String, AttributeFlags::empty()).unwrap();
        let err = ObjectTypeBuilder::of("role", [name.clone(), name]).build().unwrap_err();
        assert_eq!(err, ModelError::DuplicateAttribute("role.name".to_string()));
    }

    #[test]
    fn validate_and_set_copies_value() {
        let send = define("send", "send", ValueType::Boolean, AttributeFlags::RESTART_NONE).unwrap();
        let mut model = ModelMap::new();

        send.validate_and_set(&json!({"send": true}), &mut model).unwrap();
        assert_eq!(model.get("send"), Some(&json!(true)));

        let err = send.validate_and_set(&json!({"send": 3}), &mut model).unwrap_err();
        assert!(matches!(err, ModelError::AttributeResolution { .. }));
        assert_eq!(model.get("send"), Some(&json!(true)));
    }
}
