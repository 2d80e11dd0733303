//! Attribute registries.
//!
//! An [`AttributeRegistry`] is the ordered, immutable set of attribute
//! definitions a resource exposes, together with the name lookups used by
//! parsers and management clients:
//!
//! 1. canonical names (`create-non-durable-queue`)
//! 2. XML names (`createNonDurableQueue`)
//! 3. legacy aliases kept for old configuration files (`createTempQueue`)
//!
//! Registries are built once while extensions build and are shared read-only
//! afterwards.

use hashbrown::HashMap;
use indexmap::IndexMap;

use crate::attribute::AttributeDefinition;
use crate::error::ModelError;

/// An ordered set of attribute definitions with name resolution.
///
/// # Example
///
/// ```
/// use mgmt_model::attribute::define;
/// use mgmt_model::flags::AttributeFlags;
/// use mgmt_model::registry::AttributeRegistry;
/// use mgmt_model::value::ValueType;
///
/// let registry = AttributeRegistry::build([
///     define("create-non-durable-queue", "createNonDurableQueue", ValueType::Boolean, AttributeFlags::RESTART_NONE)?,
/// ])?
/// .with_legacy_aliases([("createTempQueue", "create-non-durable-queue")])?;
///
/// let by_alias = registry.resolve("createTempQueue")?;
/// assert_eq!(by_alias.name(), "create-non-durable-queue");
/// # Ok::<(), mgmt_model::error::ModelError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct AttributeRegistry {
    definitions: IndexMap<String, AttributeDefinition>,
    xml_names: HashMap<String, usize>,
    aliases: IndexMap<String, usize>,
}

impl AttributeRegistry {
    /// Builds a registry, preserving the order of `definitions`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::DuplicateAttribute`] if two definitions share a
    /// canonical name or an XML name, or if an XML name equals the canonical
    /// name of another definition.
    pub fn build(
        definitions: impl IntoIterator<Item = AttributeDefinition>,
    ) -> Result<Self, ModelError> {
        let mut registry = Self::default();

        for definition in definitions {
            if registry.definitions.contains_key(definition.name()) {
                return Err(ModelError::DuplicateAttribute(definition.name().to_string()));
            }
            if registry.xml_names.contains_key(definition.xml_name())
                || registry.definitions.contains_key(definition.xml_name())
            {
                return Err(ModelError::DuplicateAttribute(definition.xml_name().to_string()));
            }
            // Another definition's XML name would shadow this canonical name.
            if let Some((other_name, _)) = registry
                .xml_names
                .get(definition.name())
                .and_then(|&index| registry.definitions.get_index(index))
            {
                return Err(ModelError::DuplicateAttribute(format!(
                    "{} (xml name of '{other_name}')",
                    definition.name()
                )));
            }

            let index = registry.definitions.len();
            registry
                .xml_names
                .insert(definition.xml_name().to_string(), index);
            registry
                .definitions
                .insert(definition.name().to_string(), definition);
        }

        tracing::debug!(attributes = registry.definitions.len(), "attribute registry built");
        Ok(registry)
    }

    /// Adds legacy names, each resolving to the definition named by its target.
    ///
    /// Targets may be canonical or XML names.
    ///
    /// # Errors
    ///
    /// - [`ModelError::InvalidDefinition`] if an alias equals an existing
    ///   canonical or XML name
    /// - [`ModelError::DuplicateAttribute`] if an alias is given twice
    /// - [`ModelError::UnknownAttribute`] if a target does not exist
    pub fn with_legacy_aliases<A, C>(
        mut self,
        aliases: impl IntoIterator<Item = (A, C)>,
    ) -> Result<Self, ModelError>
    where
        A: Into<String>,
        C: AsRef<str>,
    {
        for (alias, target) in aliases {
            let alias = alias.into();
            let target = target.as_ref();

            if self.definitions.contains_key(&alias) || self.xml_names.contains_key(&alias) {
                return Err(ModelError::invalid_definition(
                    alias,
                    "legacy alias shadows an existing attribute name",
                ));
            }
            if self.aliases.contains_key(&alias) {
                return Err(ModelError::DuplicateAttribute(alias));
            }
            let index = self
                .index_of(target)
                .ok_or_else(|| ModelError::UnknownAttribute(target.to_string()))?;

            tracing::debug!(alias = %alias, resolves_to = target, "legacy alias registered");
            self.aliases.insert(alias, index);
        }
        Ok(self)
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.definitions
            .get_index_of(name)
            .or_else(|| self.xml_names.get(name).copied())
    }

    /// Resolves a canonical name, then an XML name, then a legacy alias.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnknownAttribute`] if nothing matches.
    pub fn resolve(&self, name: &str) -> Result<&AttributeDefinition, ModelError> {
        self.index_of(name)
            .or_else(|| self.aliases.get(name).copied())
            .and_then(|index| self.definitions.get_index(index))
            .map(|(_, definition)| definition)
            .ok_or_else(|| ModelError::UnknownAttribute(name.to_string()))
    }

    /// Returns the definition with the given canonical name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&AttributeDefinition> {
        self.definitions.get(name)
    }

    /// Returns true if `name` resolves to a definition.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.resolve(name).is_ok()
    }

    /// Iterates definitions in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &AttributeDefinition> {
        self.definitions.values()
    }

    /// Canonical names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }

    /// Legacy aliases with the canonical name they resolve to.
    pub fn legacy_aliases(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases.iter().filter_map(|(alias, &index)| {
            self.definitions
                .get_index(index)
                .map(|(name, _)| (alias.as_str(), name.as_str()))
        })
    }

    /// The lookup parsers use: every XML name, then every legacy alias.
    pub fn by_xml_name(&self) -> impl Iterator<Item = (&str, &AttributeDefinition)> {
        let xml = self
            .definitions
            .values()
            .map(|definition| (definition.xml_name(), definition));
        let legacy = self.aliases.iter().filter_map(|(alias, &index)| {
            self.definitions
                .get_index(index)
                .map(|(_, definition)| (alias.as_str(), definition))
        });
        xml.chain(legacy)
    }

    /// Returns the number of definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Returns true if there are no definitions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl<'a> IntoIterator for &'a AttributeRegistry {
    type Item = &'a AttributeDefinition;
    type IntoIter = indexmap::map::Values<'a, String, AttributeDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.definitions.values()
    }
}
