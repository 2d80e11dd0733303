//! Model values and their declared types.
//!
//! Attribute values travel through the model as untyped JSON-like trees
//! ([`ModelNode`]). Each attribute declares a [`ValueType`], and values are
//! coerced into that type when they are validated or resolved.

use core::fmt;

use serde::{Deserialize, Serialize};

/// An untyped model value.
pub type ModelNode = serde_json::Value;

/// An object-shaped model value keyed by attribute name.
pub type ModelMap = serde_json::Map<String, ModelNode>;

/// The declared type of an attribute value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueType {
    /// `true` or `false`.
    Boolean,
    /// A 32-bit signed integer.
    Int,
    /// A 64-bit signed integer.
    Long,
    /// Text.
    String,
    /// A structured value with named fields.
    Object,
    /// An ordered sequence of values.
    List,
}

impl ValueType {
    /// Returns true for scalar types.
    #[must_use]
    pub fn is_simple(self) -> bool {
        !matches!(self, Self::Object | Self::List)
    }

    /// Coerces `value` into this type.
    ///
    /// Strings are accepted for the numeric and boolean types when they parse,
    /// and scalars are accepted as strings. `null` is never coerced.
    ///
    /// # Errors
    ///
    /// Returns a description of the mismatch when the value cannot represent
    /// this type.
    pub fn coerce(self, value: &ModelNode) -> Result<ModelNode, String> {
        match (self, value) {
            (Self::Boolean, ModelNode::Bool(_))
            | (Self::String, ModelNode::String(_))
            | (Self::Object, ModelNode::Object(_))
            | (Self::List, ModelNode::Array(_)) => Ok(value.clone()),
            (Self::Boolean, ModelNode::String(s)) => match s.to_ascii_lowercase().as_str() {
                "true" => Ok(ModelNode::Bool(true)),
                "false" => Ok(ModelNode::Bool(false)),
                _ => Err(format!("'{s}' is not a boolean")),
            },
            (Self::Int, _) => {
                let n = integer(value)?;
                i32::try_from(n)
                    .map(ModelNode::from)
                    .map_err(|_| format!("{n} is out of range for INT"))
            }
            (Self::Long, _) => integer(value).map(ModelNode::from),
            (Self::String, ModelNode::Bool(b)) => Ok(ModelNode::String(b.to_string())),
            (Self::String, ModelNode::Number(n)) => Ok(ModelNode::String(n.to_string())),
            _ => Err(format!("expected {self}, found {}", kind_of(value))),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Boolean => "BOOLEAN",
            Self::Int => "INT",
            Self::Long => "LONG",
            Self::String => "STRING",
            Self::Object => "OBJECT",
            Self::List => "LIST",
        };
        f.write_str(name)
    }
}

fn integer(value: &ModelNode) -> Result<i64, String> {
    match value {
        ModelNode::Number(n) => n
            .as_i64()
            .ok_or_else(|| format!("{n} is not an integer")),
        ModelNode::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| format!("'{s}' is not an integer")),
        other => Err(format!("expected an integer, found {}", kind_of(other))),
    }
}

/// Short name of a value's JSON kind, for error messages.
#[must_use]
pub fn kind_of(value: &ModelNode) -> &'static str {
    match value {
        ModelNode::Null => "undefined",
        ModelNode::Bool(_) => "boolean",
        ModelNode::Number(_) => "number",
        ModelNode::String(_) => "string",
        ModelNode::Array(_) => "list",
        ModelNode::Object(_) => "object",
    }
}
