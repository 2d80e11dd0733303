//! Core infrastructure extensions for management servers.
//!
//! - [`TracingExtension`] - Structured logging via the `tracing` crate
//! - [`DefaultExtensions`] - Tracing plus the management model
//! - [`MinimalExtensions`] - The management model alone
//!
//! # Example
//!
//! ```
//! use mgmt_core_plugins::DefaultExtensions;
//! use mgmt_model::model::ManagementModel;
//! use mgmt_system::extension::ExtensionGroup;
//! use mgmt_system::server::Server;
//!
//! let mut server = Server::new();
//! server.add_extensions(DefaultExtensions.build());
//! server.finish();
//! assert!(server.contains_global::<ManagementModel>());
//! ```
//!
//! # Architecture
//!
//! - **Layer 1** (`mgmt_system`, `mgmt_model`, `mgmt_core_plugins`): lifecycle,
//!   attribute model and infrastructure
//! - **Layer 2** (`mgmt_messaging`, `mgmt_logging`): subsystem resources

mod tracing_extension;

pub use tracing_extension::{TracingConfig, TracingExtension, TracingFormat};

use mgmt_model::model::ManagementExtension;
use mgmt_system::extension::{ExtensionGroup, ExtensionGroupBuilder};

/// Default extensions for most management servers.
///
/// Includes:
/// - [`TracingExtension`] - Logging
/// - [`ManagementExtension`] - The management model and expression resolver
///
/// Use the builder to customize:
///
/// ```
/// use mgmt_core_plugins::{DefaultExtensions, TracingExtension};
/// use mgmt_system::extension::ExtensionGroup;
///
/// let group = DefaultExtensions.build().disable::<TracingExtension>();
/// assert_eq!(group.len(), 1);
/// ```
pub struct DefaultExtensions;

impl ExtensionGroup for DefaultExtensions {
    fn build(self) -> ExtensionGroupBuilder {
        ExtensionGroupBuilder::new()
            .add(TracingExtension::default())
            .add(ManagementExtension::default())
    }
}

/// Extensions for tests and embedded use: no subscriber is installed.
pub struct MinimalExtensions;

impl ExtensionGroup for MinimalExtensions {
    fn build(self) -> ExtensionGroupBuilder {
        ExtensionGroupBuilder::new().add(ManagementExtension::default())
    }
}
