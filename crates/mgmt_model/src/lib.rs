//! Attribute definitions, registries and resource definitions (Layer 1).
//!
//! This crate describes configurable management resources:
//!
//! - [`attribute`] - Attribute definitions and their builders
//! - [`registry`] - Ordered attribute registries with XML names and legacy aliases
//! - [`resource`] - Resource definitions and the read-only / read-write mode controller
//! - [`registration`] - The registration boundary and its in-memory implementation
//! - [`transform`] - Conversion of resource values into domain objects
//! - [`model`] - The in-memory management model and its extension
//!
//! Supporting modules hold the value model ([`value`], [`flags`]), resource
//! addresses ([`address`]), expression resolution ([`expression`]), handler
//! strategies ([`handler`], [`context`]) and errors ([`error`]).
//!
//! # Data Flow
//!
//! Raw named values arrive from configuration or a management call. The
//! [`AttributeRegistry`](registry::AttributeRegistry) resolves each name
//! (canonical, XML or legacy) to its definition, which validates the value.
//! The [`AttributeMode`](resource::AttributeMode) of the resource decides which
//! attributes are exposed and whether they are writable. On demand, a
//! [`Transformer`](transform::Transformer) resolves every value and builds the
//! domain object the runtime uses.

pub mod address;
pub mod attribute;
pub mod context;
pub mod error;
pub mod expression;
pub mod flags;
pub mod handler;
pub mod model;
pub mod registration;
pub mod registry;
pub mod resource;
pub mod transform;
pub mod value;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::address::{PathAddress, PathElement, WILDCARD};
    pub use crate::attribute::{
        AttributeDefinition, AttributeDefinitionBuilder, ObjectTypeBuilder, define,
    };
    pub use crate::context::OperationContext;
    pub use crate::error::ModelError;
    pub use crate::expression::{ExpressionResolver, PropertyResolver, is_expression};
    pub use crate::flags::AttributeFlags;
    pub use crate::handler::{
        ModelAddHandler, ModelReadHandler, ModelRemoveHandler, ModelWriteHandler,
        OperationStepHandler, ReadAttributeHandler, ReadOnlyWriteHandler, WriteAttributeHandler,
    };
    pub use crate::model::{ManagementExtension, ManagementModel};
    pub use crate::registration::{
        AccessType, AttributeAccess, ManagementResourceRegistration, ResourceRegistration,
        StorageType,
    };
    pub use crate::registry::AttributeRegistry;
    pub use crate::resource::{AttributeMode, ResourceDefinition};
    pub use crate::transform::{ResolvedValues, Transformer};
    pub use crate::value::{ModelMap, ModelNode, ValueType};
}
