//! Extension system for pluggable management subsystems.
//!
//! Every subsystem (logging, messaging, the management model itself) is
//! delivered as an [`Extension`]. Extensions build their attribute registries
//! and resource definitions explicitly and hand them to the [`Server`], which
//! keeps them for the rest of its lifetime. Nothing is held in statics.
//!
//! # Example
//!
//! ```
//! use mgmt_system::extension::{Extension, ExtensionId};
//! use mgmt_system::server::Server;
//!
//! struct ModelExtension;
//! impl Extension for ModelExtension {
//!     fn build(&self, _server: &mut Server) {}
//! }
//!
//! struct LoggingExtension;
//! impl Extension for LoggingExtension {
//!     fn build(&self, _server: &mut Server) {}
//!
//!     fn dependencies(&self) -> Vec<ExtensionId> {
//!         vec![ExtensionId::of::<ModelExtension>()]
//!     }
//! }
//!
//! Server::new()
//!     .add_extensions(ModelExtension)
//!     .add_extensions(LoggingExtension)
//!     .run();
//! ```

use core::any::TypeId;

use crate::server::Server;

// ─────────────────────────────────────────────────────────────────────────────
// ExtensionId
// ─────────────────────────────────────────────────────────────────────────────

/// Unique identifier for an extension type.
///
/// Used for dependency resolution and duplicate detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExtensionId {
    type_id: TypeId,
    type_name: &'static str,
}

impl ExtensionId {
    /// Creates an `ExtensionId` for the given extension type.
    #[must_use]
    pub fn of<E: Extension>() -> Self {
        Self {
            type_id: TypeId::of::<E>(),
            type_name: core::any::type_name::<E>(),
        }
    }

    /// Returns the underlying `TypeId`.
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns the type name for debugging.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Extension Trait
// ─────────────────────────────────────────────────────────────────────────────

/// A subsystem that contributes services and resource definitions to a server.
///
/// Extensions follow a strict lifecycle managed by the server:
///
/// 1. **Build Phase** - `build()` is called in dependency order. Registries
///    are constructed here; construction errors are fatal.
/// 2. **Ready Phase** - `ready()` is called in dependency order. Registries
///    staged during build are frozen into global services.
/// 3. **Cleanup Phase** - `cleanup()` is called in reverse dependency order.
pub trait Extension: Send + Sync + 'static {
    /// Configures the server. Called once, in dependency order.
    fn build(&self, server: &mut Server);

    /// Called after every extension has been built.
    fn ready(&self, _server: &mut Server) {}

    /// Called when the server is shutting down, in reverse dependency order.
    fn cleanup(&self, _server: &mut Server) {}

    /// Returns the extension's name for diagnostics.
    fn name(&self) -> &str {
        core::any::type_name::<Self>()
    }

    /// Declares extensions that must be built before this one.
    ///
    /// The server panics in `finish()` if a dependency was never added.
    fn dependencies(&self) -> Vec<ExtensionId> {
        Vec::new()
    }

    /// Returns true if this extension can only be added once.
    fn is_unique(&self) -> bool {
        true
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Extensions Trait (for add_extensions polymorphism)
// ─────────────────────────────────────────────────────────────────────────────

/// Types that can be added to a server: a single [`Extension`] or an
/// [`ExtensionGroupBuilder`].
pub trait Extensions {
    /// Adds these extensions to the server.
    fn add_to_server(self, server: &mut Server);
}

impl<E: Extension> Extensions for E {
    fn add_to_server(self, server: &mut Server) {
        let id = ExtensionId::of::<E>();
        server.add_extension_boxed(id, Box::new(self));
    }
}

impl Extensions for ExtensionGroupBuilder {
    fn add_to_server(self, server: &mut Server) {
        for boxed in self.extensions {
            server.add_extension_boxed(boxed.id, boxed.extension);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ExtensionGroup
// ─────────────────────────────────────────────────────────────────────────────

/// A collection of extensions that can be added together.
///
/// ```ignore
/// Server::new()
///     .add_extensions(DefaultExtensions.build().disable::<TracingExtension>())
///     .run();
/// ```
pub trait ExtensionGroup {
    /// Returns the extensions in this group.
    fn build(self) -> ExtensionGroupBuilder;
}

pub(crate) struct BoxedExtension {
    pub(crate) id: ExtensionId,
    pub(crate) extension: Box<dyn Extension>,
}

/// Builder for customizing extension groups.
#[derive(Default)]
pub struct ExtensionGroupBuilder {
    pub(crate) extensions: Vec<BoxedExtension>,
}

impl ExtensionGroupBuilder {
    /// Creates a new empty group builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            extensions: Vec::new(),
        }
    }

    /// Adds an extension to the end of the group.
    #[must_use]
    #[expect(
        clippy::should_implement_trait,
        reason = "This is a builder method, not std::ops::Add"
    )]
    pub fn add<E: Extension>(mut self, extension: E) -> Self {
        self.extensions.push(BoxedExtension {
            id: ExtensionId::of::<E>(),
            extension: Box::new(extension),
        });
        self
    }

    /// Removes an extension from the group by type. No-op when absent.
    #[must_use]
    pub fn disable<E: Extension>(mut self) -> Self {
        let target = ExtensionId::of::<E>();
        self.extensions.retain(|e| e.id != target);
        self
    }

    /// Returns the number of extensions in the group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    /// Returns true if the group contains no extensions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ExtensionA;
    impl Extension for ExtensionA {
        fn build(&self, _server: &mut Server) {}
    }

    struct ExtensionB;
    impl Extension for ExtensionB {
        fn build(&self, _server: &mut Server) {}
        fn dependencies(&self) -> Vec<ExtensionId> {
            vec![ExtensionId::of::<ExtensionA>()]
        }
    }

    #[test]
    fn extension_id_equality() {
        assert_eq!(ExtensionId::of::<ExtensionA>(), ExtensionId::of::<ExtensionA>());
        assert_ne!(ExtensionId::of::<ExtensionA>(), ExtensionId::of::<ExtensionB>());
        assert!(ExtensionId::of::<ExtensionA>().type_name().contains("ExtensionA"));
    }

    #[test]
    fn extension_defaults() {
        let extension = ExtensionA;
        assert!(extension.is_unique());
        assert!(extension.dependencies().is_empty());
        assert!(extension.name().contains("ExtensionA"));
    }

    #[test]
    fn group_builder_add_and_disable() {
        let builder = ExtensionGroupBuilder::new()
            .add(ExtensionA)
            .add(ExtensionB)
            .disable::<ExtensionA>();

        assert_eq!(builder.len(), 1);
        assert_eq!(builder.extensions[0].id, ExtensionId::of::<ExtensionB>());
    }

    #[test]
    fn group_builder_disable_missing_is_noop() {
        let builder = ExtensionGroupBuilder::new().add(ExtensionA).disable::<ExtensionB>();
        assert_eq!(builder.len(), 1);
        assert!(!builder.is_empty());
    }
}
