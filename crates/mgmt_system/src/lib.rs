//! Composition root for the management model (Layer 1).
//!
//! `mgmt_system` owns everything that would otherwise be a static singleton:
//! attribute registries, resource definitions and runtime services are all
//! created by [`Extension`](extension::Extension)s and stored on the
//! [`Server`](server::Server) that wires them together.
//!
//! - [`extension`] - Extension trait and extension groups
//! - [`service`] - Typed, thread-safe service storage
//! - [`server`] - Server runtime that drives the extension lifecycle
//!
//! # Example
//!
//! ```
//! use mgmt_system::extension::Extension;
//! use mgmt_system::server::Server;
//! use mgmt_system::service::GlobalService;
//!
//! #[derive(Default)]
//! struct SubsystemSettings { enabled: bool }
//! impl GlobalService for SubsystemSettings {}
//!
//! struct SubsystemExtension;
//!
//! impl Extension for SubsystemExtension {
//!     fn build(&self, server: &mut Server) {
//!         server.insert_global(SubsystemSettings::default());
//!     }
//! }
//!
//! let mut server = Server::new();
//! server.add_extensions(SubsystemExtension);
//! server.finish();
//! assert!(server.contains_global::<SubsystemSettings>());
//! ```

/// Extension trait for pluggable subsystems.
pub mod extension;

/// Server runtime for extension orchestration.
pub mod server;

/// Typed service storage.
pub mod service;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::extension::*;
    pub use crate::server::*;
    pub use crate::service::*;
}
