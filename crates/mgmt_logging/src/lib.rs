//! Periodic rotating file handlers for the management model (Layer 2).
//!
//! A periodic rotating file handler writes to one file and rotates it as often
//! as its date suffix changes. This crate defines the handler resource, whose
//! attributes extend the defaults every handler shares, and keeps the running
//! handlers in [`HandlerRegistry`].
//!
//! - [`definition`] - Handler attributes, resource definition and transformer
//! - [`config`] - [`PeriodicHandlerConfig`], the transformed handler
//! - [`level`] - Handler levels
//! - [`period`] - Rotation periods derived from suffixes
//! - [`handlers`] - Add, remove and write handlers
//! - [`registry`] - Running handlers
//! - [`extension`] - [`LoggingExtension`]
//!
//! # Example
//!
//! ```
//! use mgmt_logging::prelude::*;
//! use mgmt_model::prelude::*;
//! use mgmt_system::prelude::*;
//! use serde_json::json;
//!
//! let mut server = Server::new();
//! server
//!     .add_extensions(ManagementExtension::default())
//!     .add_extensions(LoggingExtension::default());
//! server.finish();
//!
//! let model = server.get_global::<ManagementModel>().unwrap();
//! let address: PathAddress = "/subsystem=logging/periodic-rotating-file-handler=daily".parse()?;
//! model.add(
//!     server.global_services(),
//!     &address,
//!     &json!({"file": {"path": "server.log"}, "suffix": ".yyyy-MM-dd"}),
//! )?;
//!
//! let registry = server.get_global::<HandlerRegistry>().unwrap();
//! assert_eq!(registry.get("daily").unwrap().period, RotationPeriod::Day);
//! # Ok::<(), ModelError>(())
//! ```

pub mod config;
pub mod definition;
pub mod error;
pub mod extension;
pub mod handlers;
pub mod level;
pub mod period;
pub mod registry;

pub use config::{FileSpec, PeriodicHandlerConfig};
pub use definition::{PeriodicHandlerDefinition, PeriodicHandlerTransformer};
pub use error::LoggingError;
pub use extension::LoggingExtension;
pub use level::Level;
pub use period::RotationPeriod;
pub use registry::HandlerRegistry;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::config::{FileSpec, PeriodicHandlerConfig};
    pub use crate::definition::{PeriodicHandlerDefinition, PeriodicHandlerTransformer};
    pub use crate::error::LoggingError;
    pub use crate::extension::LoggingExtension;
    pub use crate::level::Level;
    pub use crate::period::RotationPeriod;
    pub use crate::registry::HandlerRegistry;
}
