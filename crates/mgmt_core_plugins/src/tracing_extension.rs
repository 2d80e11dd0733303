//! Structured logging for management servers.
//!
//! Provides [`TracingExtension`] which installs the `tracing` subscriber and
//! exposes its configuration as a global service.
//!
//! # Lifecycle
//!
//! - **`build()`** inserts [`TracingConfig`] so subsystem extensions can see
//!   the intended level while they build their registries.
//! - **`ready()`** installs the subscriber. Installation is skipped when a
//!   global subscriber already exists, so several servers in one process
//!   (as in tests) are fine.
//!
//! # Example
//!
//! ```
//! use mgmt_core_plugins::{TracingExtension, TracingFormat};
//! use mgmt_system::server::Server;
//! use tracing::Level;
//!
//! let mut server = Server::new();
//! server.add_extensions(
//!     TracingExtension::default()
//!         .with_level(Level::DEBUG)
//!         .with_format(TracingFormat::Compact),
//! );
//! server.finish();
//! ```

use mgmt_system::extension::Extension;
use mgmt_system::server::Server;
use mgmt_system::service::GlobalService;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

// ─────────────────────────────────────────────────────────────────────────────
// TracingFormat
// ─────────────────────────────────────────────────────────────────────────────

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TracingFormat {
    /// Human-readable multi-line output (default).
    #[default]
    Pretty,
    /// Compact single-line output.
    Compact,
    /// JSON structured output for log aggregation.
    Json,
}

// ─────────────────────────────────────────────────────────────────────────────
// TracingConfig
// ─────────────────────────────────────────────────────────────────────────────

/// Tracing configuration, readable by every extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    /// The configured maximum log level.
    pub level: Level,
    /// The configured output format.
    pub format: TracingFormat,
    /// Target-specific directives, if any.
    pub env_filter: Option<String>,
}

impl GlobalService for TracingConfig {}

impl TracingConfig {
    /// Builds the subscriber filter. Invalid directives fall back to `level`.
    #[must_use]
    pub fn filter(&self) -> EnvFilter {
        match &self.env_filter {
            Some(directives) => EnvFilter::try_new(directives).unwrap_or_else(|err| {
                tracing::warn!(%err, directives = %directives, "invalid filter directives, using level");
                EnvFilter::new(self.level.as_str())
            }),
            None => EnvFilter::new(self.level.as_str()),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// TracingExtension
// ─────────────────────────────────────────────────────────────────────────────

/// Installs a `tracing_subscriber` registry with an [`EnvFilter`] and the
/// configured output layer.
///
/// # Services Provided
///
/// | Service | Scope | Description |
/// |---------|-------|-------------|
/// | [`TracingConfig`] | Global | Tracing configuration (read-only) |
///
/// # Environment Filter
///
/// ```
/// use mgmt_core_plugins::TracingExtension;
///
/// TracingExtension::default()
///     .with_env_filter("mgmt_model=debug,mgmt_messaging=info")
/// # ;
/// ```
#[derive(Debug, Clone)]
pub struct TracingExtension {
    level: Level,
    format: TracingFormat,
    env_filter: Option<String>,
}

impl Default for TracingExtension {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: TracingFormat::Pretty,
            env_filter: None,
        }
    }
}

impl TracingExtension {
    /// Creates a `TracingExtension` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum log level.
    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Sets the output format.
    #[must_use]
    pub fn with_format(mut self, format: TracingFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets target-specific directives, `target=level,target=level,...`.
    #[must_use]
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    fn config(&self) -> TracingConfig {
        TracingConfig {
            level: self.level,
            format: self.format,
            env_filter: self.env_filter.clone(),
        }
    }
}

impl Extension for TracingExtension {
    fn build(&self, server: &mut Server) {
        server.insert_global(self.config());
    }

    fn ready(&self, server: &mut Server) {
        let config = server
            .get_global::<TracingConfig>()
            .map_or_else(|| self.config(), |config| (*config).clone());
        let filter = config.filter();

        // try_init fails only when a global subscriber is already installed.
        let installed = match config.format {
            TracingFormat::Pretty => tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .try_init()
                .is_ok(),
            TracingFormat::Compact => tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().compact())
                .try_init()
                .is_ok(),
            TracingFormat::Json => tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .try_init()
                .is_ok(),
        };

        tracing::info!(
            level = %config.level,
            format = ?config.format,
            installed,
            "tracing initialized"
        );
    }

    fn cleanup(&self, _server: &mut Server) {
        tracing::info!("tracing shutting down");
    }

    fn name(&self) -> &str {
        "mgmt::tracing"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let extension = TracingExtension::default();
        assert_eq!(extension.level, Level::INFO);
        assert_eq!(extension.format, TracingFormat::Pretty);
        assert_eq!(extension.env_filter, None);
    }

    #[test]
    fn builder_methods() {
        let extension = TracingExtension::new()
            .with_level(Level::DEBUG)
            .with_format(TracingFormat::Json)
            .with_env_filter("mgmt_model=trace");
        assert_eq!(
            extension.config(),
            TracingConfig {
                level: Level::DEBUG,
                format: TracingFormat::Json,
                env_filter: Some("mgmt_model=trace".to_string()),
            }
        );
    }

    #[test]
    fn invalid_directives_fall_back_to_level() {
        let config = TracingExtension::new()
            .with_level(Level::WARN)
            .with_env_filter("mgmt_model=[")
            .config();
        assert_eq!(
            config.filter().max_level_hint(),
            Some(tracing::level_filters::LevelFilter::WARN)
        );
    }

    #[test]
    fn registers_config_and_survives_repeated_init() {
        for _ in 0..2 {
            let mut server = Server::new();
            server.add_extensions(TracingExtension::default().with_format(TracingFormat::Compact));
            server.finish();

            let config = server.get_global::<TracingConfig>().unwrap();
            assert_eq!(config.format, TracingFormat::Compact);
        }
    }
}
