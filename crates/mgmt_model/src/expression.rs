//! Expression resolution.
//!
//! Attribute values may carry `${...}` expressions when their definition allows
//! it. An [`ExpressionResolver`] turns such raw values into concrete ones
//! before they are coerced to the attribute's [`ValueType`](crate::value::ValueType).
//!
//! [`PropertyResolver`] understands:
//!
//! - `${key}` - a configured property
//! - `${key:default}` - a property with a fallback
//! - `${a,b:default}` - the first of several properties that is set
//! - `${env.NAME}` - a process environment variable, when enabled
//!
//! Expressions may be embedded in surrounding text (`${jboss.server.log.dir}/server.log`).

use indexmap::IndexMap;
use mgmt_system::service::GlobalService;

use crate::attribute::AttributeDefinition;
use crate::error::ModelError;
use crate::value::ModelNode;

/// Resolves raw attribute values into concrete values.
///
/// Implementations report upstream failures as
/// [`ModelError::OperationFailed`]; the caller propagates them unchanged.
pub trait ExpressionResolver: Send + Sync {
    /// Resolves `raw` for `attribute`. Values without expressions are returned as-is.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::OperationFailed`] when an expression cannot be resolved.
    fn resolve(
        &self,
        attribute: &AttributeDefinition,
        raw: &ModelNode,
    ) -> Result<ModelNode, ModelError>;
}

/// Returns true if `value` is a string containing a `${...}` expression.
#[must_use]
pub fn is_expression(value: &ModelNode) -> bool {
    match value {
        ModelNode::String(s) => s
            .find("${")
            .is_some_and(|start| s[start..].contains('}')),
        _ => false,
    }
}

const ENV_PREFIX: &str = "env.";

/// Resolves expressions against a property map and, optionally, the process
/// environment.
///
/// # Example
///
/// ```
/// use mgmt_model::expression::PropertyResolver;
///
/// let resolver = PropertyResolver::new().with_property("log.dir", "/var/log");
/// assert_eq!(
///     resolver.resolve_text("${log.dir}/server.log").unwrap(),
///     "/var/log/server.log"
/// );
/// assert_eq!(resolver.resolve_text("${missing:fallback}").unwrap(), "fallback");
/// ```
#[derive(Debug, Clone, Default)]
pub struct PropertyResolver {
    properties: IndexMap<String, String>,
    environment: bool,
}

impl GlobalService for PropertyResolver {}

impl PropertyResolver {
    /// Creates a resolver with no properties and environment lookup disabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a property.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Adds several properties.
    #[must_use]
    pub fn with_properties<K, V>(mut self, properties: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.properties
            .extend(properties.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Enables `${env.NAME}` lookups.
    #[must_use]
    pub fn with_environment(mut self, enabled: bool) -> Self {
        self.environment = enabled;
        self
    }

    /// Returns a configured property.
    #[must_use]
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    fn lookup(&self, key: &str) -> Option<String> {
        if let Some(value) = self.properties.get(key) {
            return Some(value.clone());
        }
        match key.strip_prefix(ENV_PREFIX) {
            Some(var) if self.environment => std::env::var(var).ok(),
            _ => None,
        }
    }

    /// Replaces every `${...}` expression in `text`.
    ///
    /// # Errors
    ///
    /// Returns a description of the first expression that is unterminated or
    /// has no value and no default.
    pub fn resolve_text(&self, text: &str) -> Result<String, String> {
        let mut resolved = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(start) = rest.find("${") {
            resolved.push_str(&rest[..start]);
            let body_start = &rest[start + 2..];
            let end = body_start
                .find('}')
                .ok_or_else(|| format!("unterminated expression in '{text}'"))?;
            let body = &body_start[..end];

            let (keys, default) = match body.split_once(':') {
                Some((keys, default)) => (keys, Some(default)),
                None => (body, None),
            };
            let value = keys
                .split(',')
                .map(str::trim)
                .filter(|key| !key.is_empty())
                .find_map(|key| self.lookup(key))
                .or_else(|| default.map(str::to_string))
                .ok_or_else(|| format!("no value for expression '${{{body}}}'"))?;

            resolved.push_str(&value);
            rest = &body_start[end + 1..];
        }

        resolved.push_str(rest);
        Ok(resolved)
    }
}

impl ExpressionResolver for PropertyResolver {
    fn resolve(
        &self,
        attribute: &AttributeDefinition,
        raw: &ModelNode,
    ) -> Result<ModelNode, ModelError> {
        match raw {
            ModelNode::String(text) if is_expression(raw) => self
                .resolve_text(text)
                .map(ModelNode::String)
                .map_err(|reason| {
                    ModelError::operation_failed(format!(
                        "cannot resolve '{}': {reason}",
                        attribute.name()
                    ))
                }),
            _ => Ok(raw.clone()),
        }
    }
}
