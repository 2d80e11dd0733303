//! Logging subsystem extension.

use mgmt_model::address::{PathAddress, PathElement};
use mgmt_model::model::{ManagementExtension, ManagementModel};
use mgmt_system::extension::{Extension, ExtensionId};
use mgmt_system::server::Server;

use crate::definition::PeriodicHandlerDefinition;
use crate::registry::HandlerRegistry;

/// Subsystem name of the logging resources.
pub const SUBSYSTEM: &str = "logging";

/// The address of the logging subsystem, `/subsystem=logging`.
#[must_use]
pub fn subsystem_address() -> PathAddress {
    PathAddress::from(PathElement::new("subsystem", SUBSYSTEM))
}

/// Registers the periodic rotating file handler resource.
///
/// # Services Provided
///
/// | Service | Scope | Description |
/// |---------|-------|-------------|
/// | [`HandlerRegistry`] | Global | Running handlers by name |
/// | [`PeriodicHandlerDefinition`] | Global | Handler attributes and transformer |
///
/// # Resources Registered
///
/// - `/subsystem=logging/periodic-rotating-file-handler=*`, writable
#[derive(Debug, Clone, Default)]
pub struct LoggingExtension {
    register_runtime_only: bool,
}

impl LoggingExtension {
    /// Sets whether runtime-only attributes are registered.
    #[must_use]
    pub fn with_runtime_only(mut self, register_runtime_only: bool) -> Self {
        self.register_runtime_only = register_runtime_only;
        self
    }
}

impl Extension for LoggingExtension {
    fn build(&self, server: &mut Server) {
        let handlers = PeriodicHandlerDefinition::new()
            .unwrap_or_else(|err| panic!("periodic handler attributes are invalid: {err}"));

        server
            .get_service_mut::<ManagementModel>()
            .expect("ManagementModel should exist from ManagementExtension build phase")
            .register_resource(
                &subsystem_address(),
                handlers.resource_definition(self.register_runtime_only),
            )
            .unwrap_or_else(|err| panic!("periodic-rotating-file-handler registered twice: {err}"));

        server.insert_global(HandlerRegistry::new());
        server.insert_global(handlers);
        tracing::info!(
            register_runtime_only = self.register_runtime_only,
            "logging subsystem built"
        );
    }

    fn cleanup(&self, server: &mut Server) {
        if let Some(registry) = server.get_global::<HandlerRegistry>() {
            for name in registry.names() {
                registry.uninstall(&name);
            }
        }
    }

    fn name(&self) -> &str {
        "mgmt::logging"
    }

    fn dependencies(&self) -> Vec<ExtensionId> {
        vec![ExtensionId::of::<ManagementExtension>()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_resource_and_services() {
        let mut server = Server::new();
        server
            .add_extensions(ManagementExtension::default())
            .add_extensions(LoggingExtension::default());
        server.finish();

        let model = server.get_global::<ManagementModel>().unwrap();
        let templates: Vec<_> = model.templates().map(ToString::to_string).collect();
        assert_eq!(
            templates,
            ["/subsystem=logging/periodic-rotating-file-handler=*"]
        );
        assert!(server.contains_global::<HandlerRegistry>());
        assert!(server.contains_global::<PeriodicHandlerDefinition>());
    }
}
