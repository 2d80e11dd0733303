//! Messaging subsystem extension.

use std::sync::Arc;

use mgmt_model::address::{PathAddress, PathElement};
use mgmt_model::handler::{ModelAddHandler, ModelRemoveHandler};
use mgmt_model::model::{ManagementExtension, ManagementModel};
use mgmt_model::registry::AttributeRegistry;
use mgmt_model::resource::ResourceDefinition;
use mgmt_system::extension::{Extension, ExtensionId};
use mgmt_system::server::Server;

use crate::definition::SecurityRoleDefinition;
use crate::handlers::{CORE_ADDRESS, SECURITY_SETTING};
use crate::settings::SecuritySettings;

/// Subsystem name of the messaging resources.
pub const SUBSYSTEM: &str = "messaging";
/// Path key of messaging servers.
pub const HORNETQ_SERVER: &str = "hornetq-server";

/// The address template of messaging servers, `/subsystem=messaging/hornetq-server=*`.
#[must_use]
pub fn server_template() -> PathAddress {
    PathAddress::from(PathElement::new("subsystem", SUBSYSTEM))
        .append(PathElement::wildcard(HORNETQ_SERVER))
}

/// Registers the security-setting and role resources.
///
/// # Services Provided
///
/// | Service | Scope | Description |
/// |---------|-------|-------------|
/// | [`SecuritySettings`] | Global | Installed roles by address match |
/// | [`SecurityRoleDefinition`] | Global | Role attributes and transformer |
///
/// # Resources Registered
///
/// - `.../hornetq-server=*/security-setting=*`
/// - `.../security-setting=*/role=*`, writable
/// - `.../hornetq-server=*/core-address=*/role=*`, read-only, when enabled
#[derive(Debug, Clone)]
pub struct MessagingExtension {
    register_runtime_only: bool,
    read_only_roles: bool,
}

impl Default for MessagingExtension {
    fn default() -> Self {
        Self {
            register_runtime_only: false,
            read_only_roles: true,
        }
    }
}

impl MessagingExtension {
    /// Sets whether runtime-only attributes are registered on writable roles.
    #[must_use]
    pub fn with_runtime_only(mut self, register_runtime_only: bool) -> Self {
        self.register_runtime_only = register_runtime_only;
        self
    }

    /// Sets whether the read-only per-address role view is registered.
    #[must_use]
    pub fn with_read_only_roles(mut self, enabled: bool) -> Self {
        self.read_only_roles = enabled;
        self
    }
}

impl Extension for MessagingExtension {
    fn build(&self, server: &mut Server) {
        let roles = SecurityRoleDefinition::new()
            .unwrap_or_else(|err| panic!("security role attributes are invalid: {err}"));
        let settings_attributes = Arc::new(AttributeRegistry::default());
        let security_setting = ResourceDefinition::new_mutable(
            PathElement::wildcard(SECURITY_SETTING),
            Arc::clone(&settings_attributes),
            Arc::new(ModelAddHandler::new(settings_attributes)),
            Arc::new(ModelRemoveHandler),
            self.register_runtime_only,
        );

        {
            let mut model = server
                .get_service_mut::<ManagementModel>()
                .expect("ManagementModel should exist from ManagementExtension build phase");
            let setting_template = model
                .register_resource(&server_template(), security_setting)
                .unwrap_or_else(|err| panic!("security-setting registered twice: {err}"));
            model
                .register_resource(&setting_template, roles.new_mutable(self.register_runtime_only))
                .unwrap_or_else(|err| panic!("role registered twice: {err}"));
            if self.read_only_roles {
                let core_address = server_template().append(PathElement::wildcard(CORE_ADDRESS));
                model
                    .register_resource(&core_address, roles.new_read_only())
                    .unwrap_or_else(|err| panic!("read-only role registered twice: {err}"));
            }
        }

        server.insert_global(SecuritySettings::new());
        server.insert_global(roles);
        tracing::info!(
            register_runtime_only = self.register_runtime_only,
            read_only_roles = self.read_only_roles,
            "messaging subsystem built"
        );
    }

    fn name(&self) -> &str {
        "mgmt::messaging"
    }

    fn dependencies(&self) -> Vec<ExtensionId> {
        vec![ExtensionId::of::<ManagementExtension>()]
    }
}
