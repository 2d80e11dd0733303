//! Model-to-domain transformation.
//!
//! A [`Transformer`] turns a resource's stored values into the typed domain
//! object its subsystem runs with. Transformation is all-or-nothing: every
//! attribute is resolved first, in a fixed order, and the domain object is
//! built only when all of them succeed.

use indexmap::IndexMap;

use crate::attribute::AttributeDefinition;
use crate::error::ModelError;
use crate::expression::ExpressionResolver;
use crate::value::{ModelMap, ModelNode, kind_of};

/// Builds a domain object from a resource's values.
///
/// Implementations must be pure: equal inputs yield equal outputs.
pub trait Transformer: Send + Sync {
    /// The domain object.
    type Output;

    /// Resolves `values` and builds the domain object for resource `name`.
    ///
    /// # Errors
    ///
    /// - [`ModelError::AttributeResolution`] naming the first attribute that
    ///   cannot be resolved
    /// - [`ModelError::OperationFailed`] if the resolver fails
    fn transform(
        &self,
        resolver: &dyn ExpressionResolver,
        name: &str,
        values: &ModelNode,
    ) -> Result<Self::Output, ModelError>;
}

/// Attribute values resolved in declaration order.
///
/// # Example
///
/// ```
/// use mgmt_model::attribute::define;
/// use mgmt_model::expression::PropertyResolver;
/// use mgmt_model::flags::AttributeFlags;
/// use mgmt_model::transform::ResolvedValues;
/// use mgmt_model::value::ValueType;
///
/// let send = define("send", "send", ValueType::Boolean, AttributeFlags::RESTART_NONE)?;
/// let values = serde_json::json!({"send": "true"});
/// let resolved = ResolvedValues::resolve(&PropertyResolver::new(), &values, [&send])?;
/// assert!(resolved.boolean("send")?);
/// # Ok::<(), mgmt_model::error::ModelError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedValues {
    values: IndexMap<String, ModelNode>,
}

impl ResolvedValues {
    /// Resolves each definition from `values`, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// See [`AttributeDefinition::resolve_model_attribute`].
    pub fn resolve<'d>(
        resolver: &dyn ExpressionResolver,
        values: &ModelNode,
        definitions: impl IntoIterator<Item = &'d AttributeDefinition>,
    ) -> Result<Self, ModelError> {
        let mut resolved = IndexMap::new();
        for definition in definitions {
            let value = definition.resolve_model_attribute(resolver, values)?;
            resolved.insert(definition.name().to_string(), value);
        }
        Ok(Self { values: resolved })
    }

    /// Returns a resolved value. Absent optional attributes are `null`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ModelNode> {
        self.values.get(name)
    }

    fn value(&self, name: &str) -> Result<&ModelNode, ModelError> {
        self.values
            .get(name)
            .ok_or_else(|| ModelError::UnknownAttribute(name.to_string()))
    }

    fn mismatch(name: &str, expected: &str, value: &ModelNode) -> ModelError {
        ModelError::resolution(name, format!("expected {expected}, found {}", kind_of(value)))
    }

    /// A resolved boolean.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnknownAttribute`] if `name` was not resolved and
    /// [`ModelError::AttributeResolution`] if the value is not a boolean.
    pub fn boolean(&self, name: &str) -> Result<bool, ModelError> {
        let value = self.value(name)?;
        value
            .as_bool()
            .ok_or_else(|| Self::mismatch(name, "BOOLEAN", value))
    }

    /// A resolved integer.
    ///
    /// # Errors
    ///
    /// As for [`boolean`](Self::boolean).
    pub fn long(&self, name: &str) -> Result<i64, ModelError> {
        let value = self.value(name)?;
        value
            .as_i64()
            .ok_or_else(|| Self::mismatch(name, "LONG", value))
    }

    /// A resolved, defined string.
    ///
    /// # Errors
    ///
    /// As for [`boolean`](Self::boolean).
    pub fn string(&self, name: &str) -> Result<&str, ModelError> {
        let value = self.value(name)?;
        value
            .as_str()
            .ok_or_else(|| Self::mismatch(name, "STRING", value))
    }

    /// A resolved string that may be undefined.
    ///
    /// # Errors
    ///
    /// As for [`boolean`](Self::boolean).
    pub fn optional_string(&self, name: &str) -> Result<Option<&str>, ModelError> {
        match self.value(name)? {
            ModelNode::Null => Ok(None),
            ModelNode::String(s) => Ok(Some(s)),
            other => Err(Self::mismatch(name, "STRING", other)),
        }
    }

    /// A resolved object.
    ///
    /// # Errors
    ///
    /// As for [`boolean`](Self::boolean).
    pub fn object(&self, name: &str) -> Result<&ModelMap, ModelError> {
        let value = self.value(name)?;
        value
            .as_object()
            .ok_or_else(|| Self::mismatch(name, "OBJECT", value))
    }

    /// Returns the number of resolved attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if nothing was resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::{AttributeDefinitionBuilder, define};
    use crate::expression::PropertyResolver;
    use crate::flags::AttributeFlags;
    use crate::value::ValueType;
    use serde_json::json;

    struct Failing;

    impl ExpressionResolver for Failing {
        fn resolve(
            &self,
            attribute: &AttributeDefinition,
            _raw: &ModelNode,
        ) -> Result<ModelNode, ModelError> {
            Err(ModelError::operation_failed(format!(
                "vault unavailable for {}",
                attribute.name()
            )))
        }
    }

    fn definitions() -> Vec<AttributeDefinition> {
        vec![
            define("send", "send", ValueType::Boolean, AttributeFlags::RESTART_NONE).unwrap(),
            define("consume", "consume", ValueType::Boolean, AttributeFlags::RESTART_NONE).unwrap(),
            AttributeDefinitionBuilder::create("encoding", ValueType::String)
                .set_required(false)
                .build()
                .unwrap(),
        ]
    }

    #[test]
    fn stops_at_first_failure_in_order() {
        let defs = definitions();
        let err = ResolvedValues::resolve(&PropertyResolver::new(), &json!({}), &defs).unwrap_err();
        assert_eq!(err, ModelError::resolution("send", "missing value"));

        let err = ResolvedValues::resolve(
            &PropertyResolver::new(),
            &json!({"send": true, "consume": "nope"}),
            &defs,
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::AttributeResolution { attribute, .. } if attribute == "consume"));
    }

    #[test]
    fn resolver_failures_propagate() {
        let defs = definitions();
        let err = ResolvedValues::resolve(&Failing, &json!({"send": true, "consume": true}), &defs)
            .unwrap_err();
        assert_eq!(
            err,
            ModelError::OperationFailed("vault unavailable for send".to_string())
        );
    }

    #[test]
    fn typed_accessors() {
        let defs = definitions();
        let resolved = ResolvedValues::resolve(
            &PropertyResolver::new(),
            &json!({"send": true, "consume": "false"}),
            &defs,
        )
        .unwrap();

        assert!(resolved.boolean("send").unwrap());
        assert!(!resolved.boolean("consume").unwrap());
        assert_eq!(resolved.optional_string("encoding").unwrap(), None);
        assert!(resolved.string("send").is_err());
        assert_eq!(
            resolved.boolean("manage").unwrap_err(),
            ModelError::UnknownAttribute("manage".to_string())
        );
    }
}
