//! Installed handlers.

use indexmap::IndexMap;
use mgmt_system::service::GlobalService;
use parking_lot::RwLock;
use serde::Serialize;

use crate::config::PeriodicHandlerConfig;

/// A running handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstalledHandler {
    /// The configuration in force.
    pub config: PeriodicHandlerConfig,
    /// Bumped every time the handler is constructed again.
    pub generation: u64,
}

/// The runtime's handlers by name.
///
/// A handler is constructed on install. Later installs reconfigure it in
/// place unless a construction property changed, in which case it is
/// constructed again with a new generation.
#[derive(Debug, Default)]
pub struct HandlerRegistry {
    handlers: RwLock<IndexMap<String, InstalledHandler>>,
}

impl GlobalService for HandlerRegistry {}

impl HandlerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs or reconfigures the handler named by `config` and returns
    /// its generation.
    pub fn install(&self, config: PeriodicHandlerConfig) -> u64 {
        let mut handlers = self.handlers.write();
        let generation = match handlers.get(&config.name) {
            Some(current) if current.config.needs_reconstruction(&config) => {
                current.generation + 1
            }
            Some(current) => current.generation,
            None => 1,
        };
        tracing::debug!(
            handler = %config.name,
            generation,
            period = ?config.period,
            "handler installed"
        );
        handlers.insert(config.name.clone(), InstalledHandler { config, generation });
        generation
    }

    /// Closes and removes a handler.
    pub fn uninstall(&self, name: &str) -> Option<PeriodicHandlerConfig> {
        let removed = self.handlers.write().shift_remove(name)?;
        tracing::debug!(handler = name, "handler uninstalled");
        Some(removed.config)
    }

    /// The configuration of a running handler.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<PeriodicHandlerConfig> {
        self.handlers.read().get(name).map(|h| h.config.clone())
    }

    /// The generation of a running handler.
    #[must_use]
    pub fn generation(&self, name: &str) -> Option<u64> {
        self.handlers.read().get(name).map(|h| h.generation)
    }

    /// Names of running handlers, in installation order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.handlers.read().keys().cloned().collect()
    }

    /// Every running handler as JSON.
    ///
    /// # Errors
    ///
    /// Returns the serializer's error.
    pub fn describe(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(&*self.handlers.read())
    }

    /// Returns the number of running handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.read().len()
    }

    /// Returns true if no handler is running.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FileSpec;
    use crate::level::Level;
    use crate::period::RotationPeriod;

    fn config(path: &str, level: Level) -> PeriodicHandlerConfig {
        PeriodicHandlerConfig {
            name: "daily".to_string(),
            enabled: true,
            level,
            encoding: None,
            formatter: "%s%n".to_string(),
            autoflush: true,
            append: true,
            file: FileSpec {
                relative_to: None,
                path: path.to_string(),
            },
            suffix: ".yyyy-MM-dd".to_string(),
            period: RotationPeriod::Day,
        }
    }

    #[test]
    fn reconfigure_keeps_generation() {
        let registry = HandlerRegistry::new();
        assert_eq!(registry.install(config("a.log", Level::Info)), 1);
        assert_eq!(registry.install(config("a.log", Level::Debug)), 1);
        assert_eq!(registry.get("daily").unwrap().level, Level::Debug);
    }

    #[test]
    fn construction_property_change_reconstructs() {
        let registry = HandlerRegistry::new();
        registry.install(config("a.log", Level::Info));
        assert_eq!(registry.install(config("b.log", Level::Info)), 2);
        assert_eq!(registry.generation("daily"), Some(2));
    }

    #[test]
    fn uninstall_and_describe() {
        let registry = HandlerRegistry::new();
        registry.install(config("a.log", Level::Info));
        let described = registry.describe().unwrap();
        assert_eq!(described["daily"]["generation"], 1);
        assert_eq!(described["daily"]["config"]["level"], "INFO");

        assert!(registry.uninstall("daily").is_some());
        assert!(registry.uninstall("daily").is_none());
        assert!(registry.is_empty());
        assert!(registry.names().is_empty());
    }
}
