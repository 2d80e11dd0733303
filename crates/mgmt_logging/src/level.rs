//! Handler levels.

use core::fmt;
use core::str::FromStr;

use serde::{Serialize, Serializer};
use tracing::level_filters::LevelFilter;

use crate::error::LoggingError;

/// Level names accepted by the `level` attribute, from most to least verbose.
pub const LEVEL_NAMES: [&str; 14] = [
    "ALL", "FINEST", "FINER", "TRACE", "DEBUG", "FINE", "CONFIG", "INFO", "WARN", "WARNING",
    "ERROR", "SEVERE", "FATAL", "OFF",
];

/// The minimum level a handler publishes.
///
/// Several names are synonyms kept for configuration written against older
/// log managers; each keeps its own spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    /// Publish everything.
    All,
    /// `java.util.logging` finest.
    Finest,
    /// `java.util.logging` finer.
    Finer,
    /// Tracing detail.
    Trace,
    /// Debugging detail.
    Debug,
    /// `java.util.logging` fine.
    Fine,
    /// Configuration messages.
    Config,
    /// Informational messages.
    Info,
    /// Warnings.
    Warn,
    /// Warnings, `java.util.logging` spelling.
    Warning,
    /// Errors.
    Error,
    /// Errors, `java.util.logging` spelling.
    Severe,
    /// Fatal errors.
    Fatal,
    /// Publish nothing.
    Off,
}

impl Level {
    const ALL_LEVELS: [Self; 14] = [
        Self::All,
        Self::Finest,
        Self::Finer,
        Self::Trace,
        Self::Debug,
        Self::Fine,
        Self::Config,
        Self::Info,
        Self::Warn,
        Self::Warning,
        Self::Error,
        Self::Severe,
        Self::Fatal,
        Self::Off,
    ];

    /// The configuration name.
    #[must_use]
    pub fn name(self) -> &'static str {
        LEVEL_NAMES[self as usize]
    }

    /// The closest `tracing` filter.
    #[must_use]
    pub fn filter(self) -> LevelFilter {
        match self {
            Self::All | Self::Finest | Self::Finer | Self::Trace => LevelFilter::TRACE,
            Self::Debug | Self::Fine | Self::Config => LevelFilter::DEBUG,
            Self::Info => LevelFilter::INFO,
            Self::Warn | Self::Warning => LevelFilter::WARN,
            Self::Error | Self::Severe | Self::Fatal => LevelFilter::ERROR,
            Self::Off => LevelFilter::OFF,
        }
    }
}

impl FromStr for Level {
    type Err = LoggingError;

    /// Parses a level name, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LEVEL_NAMES
            .iter()
            .position(|name| name.eq_ignore_ascii_case(s))
            .map(|index| Self::ALL_LEVELS[index])
            .ok_or_else(|| LoggingError::UnknownLevel(s.to_string()))
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Level {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}
