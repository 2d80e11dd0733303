//! # mgmt Internal Library
//!
//! Re-exports the core mgmt crates for convenience.

/// Layer 1: Extension and service framework.
pub use mgmt_system;

/// Layer 1: Attribute definitions, resources and the management model.
pub use mgmt_model;

/// Layer 2: Infrastructure extensions.
pub use mgmt_core_plugins;

/// Layer 2: Messaging security roles.
pub use mgmt_messaging;

/// Layer 2: Periodic rotating file handlers.
pub use mgmt_logging;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use mgmt_core_plugins::{DefaultExtensions, MinimalExtensions, TracingExtension};
    pub use mgmt_logging::prelude::*;
    pub use mgmt_messaging::prelude::*;
    pub use mgmt_model::prelude::*;
    pub use mgmt_system::prelude::*;
}
