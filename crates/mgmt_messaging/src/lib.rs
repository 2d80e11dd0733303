//! Messaging security roles for the management model (Layer 2).
//!
//! A security role grants seven permissions on the addresses matched by its
//! enclosing security setting. This crate defines the role resource and its
//! read-only runtime view, transforms role values into [`SecurityRole`]s and
//! keeps the broker-facing [`SecuritySettings`] up to date.
//!
//! - [`role`] - The [`SecurityRole`] domain object and its [`Permissions`]
//! - [`definition`] - Role attributes, legacy XML names and resource definitions
//! - [`handlers`] - Add, remove, write and read-only read handlers
//! - [`settings`] - Installed roles by address match
//! - [`extension`] - [`MessagingExtension`]
//!
//! # Example
//!
//! ```
//! use mgmt_messaging::prelude::*;
//! use mgmt_model::prelude::*;
//! use mgmt_system::prelude::*;
//! use serde_json::json;
//!
//! let mut server = Server::new();
//! server
//!     .add_extensions(ManagementExtension::default())
//!     .add_extensions(MessagingExtension::default());
//! server.finish();
//!
//! let model = server.get_global::<ManagementModel>().unwrap();
//! let services = server.global_services();
//! let setting: PathAddress = "/subsystem=messaging/hornetq-server=default/security-setting=#".parse()?;
//! model.add(services, &setting, &json!({}))?;
//! model.add(
//!     services,
//!     &setting.append(PathElement::new("role", "guest")),
//!     &json!({
//!         "send": true, "consume": true, "createDurableQueue": false,
//!         "deleteDurableQueue": false, "createTempQueue": true,
//!         "deleteTempQueue": true, "manage": false,
//!     }),
//! )?;
//!
//! let settings = server.get_global::<SecuritySettings>().unwrap();
//! assert!(settings.roles_for_address("default", "jms.queue.orders")[0].send());
//! # Ok::<(), ModelError>(())
//! ```

pub mod definition;
pub mod extension;
pub mod handlers;
pub mod role;
pub mod settings;

pub use definition::{SecurityRoleDefinition, SecurityRoleTransformer};
pub use extension::MessagingExtension;
pub use role::{Permissions, SecurityRole};
pub use settings::SecuritySettings;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::definition::{SecurityRoleDefinition, SecurityRoleTransformer};
    pub use crate::extension::MessagingExtension;
    pub use crate::role::{Permissions, SecurityRole};
    pub use crate::settings::SecuritySettings;
}
