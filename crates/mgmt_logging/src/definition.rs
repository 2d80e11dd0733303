//! The periodic rotating file handler resource definition.
//!
//! Every handler type shares the default writable attributes (`level`,
//! `encoding`, `formatter`, `enabled`); a periodic rotating file handler adds
//! `autoflush`, `append`, `file` and `suffix` after them.

use std::sync::Arc;

use mgmt_model::address::PathElement;
use mgmt_model::attribute::{AttributeDefinition, AttributeDefinitionBuilder, ObjectTypeBuilder};
use mgmt_model::error::ModelError;
use mgmt_model::expression::ExpressionResolver;
use mgmt_model::flags::AttributeFlags;
use mgmt_model::registry::AttributeRegistry;
use mgmt_model::resource::ResourceDefinition;
use mgmt_model::transform::{ResolvedValues, Transformer};
use mgmt_model::value::{ModelNode, ValueType};
use mgmt_system::service::GlobalService;

use crate::config::{FileSpec, PeriodicHandlerConfig};
use crate::handlers::{HandlerAdd, HandlerRemove, HandlerWrite};
use crate::level::{LEVEL_NAMES, Level};
use crate::period::RotationPeriod;

/// Path key of periodic rotating file handlers.
pub const PERIODIC_ROTATING_FILE_HANDLER: &str = "periodic-rotating-file-handler";

/// Canonical attribute names.
pub mod names {
    /// Minimum level published.
    pub const LEVEL: &str = "level";
    /// Character encoding.
    pub const ENCODING: &str = "encoding";
    /// Pattern formatter.
    pub const FORMATTER: &str = "formatter";
    /// Whether the handler publishes.
    pub const ENABLED: &str = "enabled";
    /// Flush after every record.
    pub const AUTOFLUSH: &str = "autoflush";
    /// Append to an existing file.
    pub const APPEND: &str = "append";
    /// The target file object.
    pub const FILE: &str = "file";
    /// Field of `file`: the named base directory.
    pub const RELATIVE_TO: &str = "relative-to";
    /// Field of `file`: the file path.
    pub const PATH: &str = "path";
    /// Date pattern of rotated files.
    pub const SUFFIX: &str = "suffix";
}

use names::{
    APPEND, AUTOFLUSH, ENABLED, ENCODING, FILE, FORMATTER, LEVEL, PATH, RELATIVE_TO, SUFFIX,
};

/// Formatter used when none is configured.
pub const DEFAULT_FORMATTER: &str = "%d{HH:mm:ss,SSS} %-5p [%c] (%t) %s%E%n";

/// The attributes every handler type shares, in declaration order.
///
/// # Errors
///
/// Returns a build-time [`ModelError`] if a definition is inconsistent.
pub fn default_writable_attributes() -> Result<Vec<AttributeDefinition>, ModelError> {
    Ok(vec![
        AttributeDefinitionBuilder::create(LEVEL, ValueType::String)
            .set_default_value("ALL")
            .set_allowed_values(LEVEL_NAMES)
            .set_allow_expression(true)
            .set_flags(AttributeFlags::RESTART_NONE)
            .build()?,
        AttributeDefinitionBuilder::create(ENCODING, ValueType::String)
            .set_required(false)
            .set_allow_expression(true)
            .set_flags(AttributeFlags::RESTART_NONE)
            .build()?,
        AttributeDefinitionBuilder::create(FORMATTER, ValueType::String)
            .set_default_value(DEFAULT_FORMATTER)
            .set_allow_expression(true)
            .set_flags(AttributeFlags::RESTART_NONE)
            .build()?,
        AttributeDefinitionBuilder::create(ENABLED, ValueType::Boolean)
            .set_default_value(true)
            .set_allow_expression(true)
            .set_flags(AttributeFlags::RESTART_NONE)
            .build()?,
    ])
}

/// The shared attributes followed by `specific`.
///
/// # Errors
///
/// As for [`default_writable_attributes`].
pub fn append_default_writable_attributes(
    specific: impl IntoIterator<Item = AttributeDefinition>,
) -> Result<Vec<AttributeDefinition>, ModelError> {
    let mut attributes = default_writable_attributes()?;
    attributes.extend(specific);
    Ok(attributes)
}

fn periodic_attributes() -> Result<Vec<AttributeDefinition>, ModelError> {
    let relative_to = AttributeDefinitionBuilder::create(RELATIVE_TO, ValueType::String)
        .set_required(false)
        .set_allow_expression(true)
        .build()?;
    let path = AttributeDefinitionBuilder::create(PATH, ValueType::String)
        .set_allow_expression(true)
        .build()?;

    append_default_writable_attributes([
        AttributeDefinitionBuilder::create(AUTOFLUSH, ValueType::Boolean)
            .set_default_value(true)
            .set_allow_expression(true)
            .set_flags(AttributeFlags::RESTART_NONE)
            .build()?,
        AttributeDefinitionBuilder::create(APPEND, ValueType::Boolean)
            .set_default_value(true)
            .set_allow_expression(true)
            .set_flags(AttributeFlags::RESTART_NONE)
            .build()?,
        ObjectTypeBuilder::of(FILE, [relative_to, path])
            .set_allow_expression(true)
            .set_flags(AttributeFlags::RESTART_NONE)
            .build()?,
        AttributeDefinitionBuilder::create(SUFFIX, ValueType::String)
            .set_allow_expression(true)
            .set_flags(AttributeFlags::RESTART_NONE)
            .build()?,
    ])
}

/// Attributes and resource definition of periodic rotating file handlers.
#[derive(Debug, Clone)]
pub struct PeriodicHandlerDefinition {
    attributes: Arc<AttributeRegistry>,
}

impl GlobalService for PeriodicHandlerDefinition {}

impl PeriodicHandlerDefinition {
    /// Builds the handler attributes.
    ///
    /// # Errors
    ///
    /// Returns a build-time [`ModelError`] if the attributes are inconsistent.
    pub fn new() -> Result<Self, ModelError> {
        Ok(Self {
            attributes: Arc::new(AttributeRegistry::build(periodic_attributes()?)?),
        })
    }

    /// The handler attributes in declaration order.
    #[must_use]
    pub fn attributes(&self) -> &Arc<AttributeRegistry> {
        &self.attributes
    }

    /// The writable handler resource.
    #[must_use]
    pub fn resource_definition(&self, register_runtime_only: bool) -> ResourceDefinition {
        let transformer = self.transformer();
        ResourceDefinition::new_mutable(
            PathElement::wildcard(PERIODIC_ROTATING_FILE_HANDLER),
            Arc::clone(&self.attributes),
            Arc::new(HandlerAdd::new(
                Arc::clone(&self.attributes),
                transformer.clone(),
            )),
            Arc::new(HandlerRemove),
            register_runtime_only,
        )
        .with_write_handler(Arc::new(HandlerWrite::new(transformer)))
    }

    /// The transformer producing [`PeriodicHandlerConfig`]s.
    #[must_use]
    pub fn transformer(&self) -> PeriodicHandlerTransformer {
        PeriodicHandlerTransformer {
            attributes: Arc::clone(&self.attributes),
        }
    }
}

/// Resolves handler attributes into a [`PeriodicHandlerConfig`].
#[derive(Debug, Clone)]
pub struct PeriodicHandlerTransformer {
    attributes: Arc<AttributeRegistry>,
}

impl Transformer for PeriodicHandlerTransformer {
    type Output = PeriodicHandlerConfig;

    fn transform(
        &self,
        resolver: &dyn ExpressionResolver,
        name: &str,
        values: &ModelNode,
    ) -> Result<PeriodicHandlerConfig, ModelError> {
        let resolved = ResolvedValues::resolve(resolver, values, self.attributes.iter())?;

        let level = resolved
            .string(LEVEL)?
            .parse::<Level>()
            .map_err(|err| ModelError::resolution(LEVEL, err.to_string()))?;
        let file = FileSpec::from_model(resolved.object(FILE)?)
            .map_err(|err| ModelError::resolution(FILE, err.to_string()))?;
        let suffix = resolved.string(SUFFIX)?;
        let period = RotationPeriod::from_suffix(suffix)
            .map_err(|err| ModelError::resolution(SUFFIX, err.to_string()))?;

        Ok(PeriodicHandlerConfig {
            name: name.to_string(),
            enabled: resolved.boolean(ENABLED)?,
            level,
            encoding: resolved.optional_string(ENCODING)?.map(str::to_string),
            formatter: resolved.string(FORMATTER)?.to_string(),
            autoflush: resolved.boolean(AUTOFLUSH)?,
            append: resolved.boolean(APPEND)?,
            file,
            suffix: suffix.to_string(),
            period,
        })
    }
}
