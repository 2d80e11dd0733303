//! Resource addresses.
//!
//! A [`PathAddress`] is a sequence of `key=value` [`PathElement`]s such as
//! `/subsystem=messaging/hornetq-server=default/security-setting=#/role=auditor`.
//! Resource definitions are registered under templates whose values may be
//! the wildcard `*`.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Value matching any element value in an address template.
pub const WILDCARD: &str = "*";

/// One `key=value` step in a [`PathAddress`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PathElement {
    key: String,
    value: String,
}

impl PathElement {
    /// Creates an element.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Creates a wildcard element (`key=*`).
    pub fn wildcard(key: impl Into<String>) -> Self {
        Self::new(key, WILDCARD)
    }

    /// The element key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The element value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns true if the value is the wildcard.
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.value == WILDCARD
    }

    /// Returns true if `other` is matched by this element used as a template.
    #[must_use]
    pub fn matches(&self, other: &Self) -> bool {
        self.key == other.key && (self.is_wildcard() || self.value == other.value)
    }
}

impl fmt::Display for PathElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// An absolute resource address. The empty address is the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PathAddress {
    elements: Vec<PathElement>,
}

impl PathAddress {
    /// The root address.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Creates an address from its elements.
    pub fn from_elements(elements: impl IntoIterator<Item = PathElement>) -> Self {
        Self {
            elements: elements.into_iter().collect(),
        }
    }

    /// Returns a new address with `element` appended.
    #[must_use]
    pub fn append(&self, element: PathElement) -> Self {
        let mut elements = self.elements.clone();
        elements.push(element);
        Self { elements }
    }

    /// The elements of this address.
    #[must_use]
    pub fn elements(&self) -> &[PathElement] {
        &self.elements
    }

    /// The last element, if any.
    #[must_use]
    pub fn last(&self) -> Option<&PathElement> {
        self.elements.last()
    }

    /// The address without its last element. The root is its own parent.
    #[must_use]
    pub fn parent(&self) -> Self {
        let len = self.elements.len().saturating_sub(1);
        Self {
            elements: self.elements[..len].to_vec(),
        }
    }

    /// Returns true for the root address.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns true for the root address.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns true if `address` is matched by this address used as a template.
    #[must_use]
    pub fn matches(&self, address: &Self) -> bool {
        self.elements.len() == address.elements.len()
            && self
                .elements
                .iter()
                .zip(&address.elements)
                .all(|(template, element)| template.matches(element))
    }

    /// Returns true if this address is a strict descendant of `ancestor`.
    #[must_use]
    pub fn is_descendant_of(&self, ancestor: &Self) -> bool {
        self.elements.len() > ancestor.elements.len()
            && self.elements[..ancestor.elements.len()] == ancestor.elements[..]
    }
}

impl fmt::Display for PathAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.elements.is_empty() {
            return f.write_str("/");
        }
        for element in &self.elements {
            write!(f, "/{element}")?;
        }
        Ok(())
    }
}

impl FromStr for PathAddress {
    type Err = ModelError;

    /// Parses `/key=value/key=value`. Both `/` and the empty string are the root.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut elements = Vec::new();
        for segment in s.split('/').filter(|segment| !segment.is_empty()) {
            let (key, value) = segment
                .split_once('=')
                .filter(|(key, value)| !key.is_empty() && !value.is_empty())
                .ok_or_else(|| {
                    ModelError::operation_failed(format!(
                        "malformed address element '{segment}' in '{s}'"
                    ))
                })?;
            elements.push(PathElement::new(key, value));
        }
        Ok(Self { elements })
    }
}

impl From<PathElement> for PathAddress {
    fn from(element: PathElement) -> Self {
        Self {
            elements: vec![element],
        }
    }
}
