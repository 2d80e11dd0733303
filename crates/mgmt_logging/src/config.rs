//! The periodic rotating file handler configuration.

use std::path::PathBuf;

use serde::Serialize;

use mgmt_model::value::ModelMap;

use crate::error::LoggingError;
use crate::level::Level;
use crate::period::RotationPeriod;

/// The file a handler writes to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct FileSpec {
    /// Name of a path the file is relative to, such as `jboss.server.log.dir`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relative_to: Option<String>,
    /// The file path.
    pub path: String,
}

impl FileSpec {
    /// Reads a resolved `file` object.
    ///
    /// # Errors
    ///
    /// Returns [`LoggingError::MissingPath`] if `path` is absent.
    pub fn from_model(file: &ModelMap) -> Result<Self, LoggingError> {
        let path = file
            .get("path")
            .and_then(|path| path.as_str())
            .ok_or(LoggingError::MissingPath)?;
        Ok(Self {
            relative_to: file
                .get("relative-to")
                .and_then(|relative_to| relative_to.as_str())
                .map(str::to_string),
            path: path.to_string(),
        })
    }

    /// Resolves the file against the directory `relative_to` names, using
    /// `lookup` to find it. Unknown or absent names leave the path as is.
    #[must_use]
    pub fn resolve(&self, lookup: impl Fn(&str) -> Option<PathBuf>) -> PathBuf {
        match self.relative_to.as_deref().and_then(lookup) {
            Some(base) => base.join(&self.path),
            None => PathBuf::from(&self.path),
        }
    }
}

/// Everything a periodic rotating file handler is built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct PeriodicHandlerConfig {
    /// Handler name.
    pub name: String,
    /// Whether the handler publishes records.
    pub enabled: bool,
    /// Minimum level published.
    pub level: Level,
    /// Character encoding, the platform default when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    /// Pattern formatter.
    pub formatter: String,
    /// Whether every record is flushed.
    pub autoflush: bool,
    /// Whether an existing file is appended to.
    pub append: bool,
    /// The target file.
    pub file: FileSpec,
    /// Date pattern appended to rotated files.
    pub suffix: String,
    /// Rotation period derived from the suffix.
    pub period: RotationPeriod,
}

impl PeriodicHandlerConfig {
    /// Returns true if switching from `self` to `next` needs a new handler.
    ///
    /// The file and the append mode are only read when the handler is
    /// constructed; everything else applies to a running handler.
    #[must_use]
    pub fn needs_reconstruction(&self, next: &Self) -> bool {
        self.file != next.file || self.append != next.append
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> PeriodicHandlerConfig {
        PeriodicHandlerConfig {
            name: "daily".to_string(),
            enabled: true,
            level: Level::Info,
            encoding: None,
            formatter: "%s%n".to_string(),
            autoflush: true,
            append: true,
            file: FileSpec {
                relative_to: Some("jboss.server.log.dir".to_string()),
                path: "server.log".to_string(),
            },
            suffix: ".yyyy-MM-dd".to_string(),
            period: RotationPeriod::Day,
        }
    }

    #[test]
    fn file_from_model() {
        let file = json!({"path": "server.log"});
        assert_eq!(
            FileSpec::from_model(file.as_object().unwrap()).unwrap(),
            FileSpec {
                relative_to: None,
                path: "server.log".to_string(),
            }
        );

        let no_path = json!({"relative-to": "jboss.server.log.dir"});
        assert_eq!(
            FileSpec::from_model(no_path.as_object().unwrap()).unwrap_err(),
            LoggingError::MissingPath
        );
    }

    #[test]
    fn file_resolves_against_named_directory() {
        let file = config().file;
        let resolved = file.resolve(|name| {
            (name == "jboss.server.log.dir").then(|| PathBuf::from("/var/log/app"))
        });
        assert_eq!(resolved, PathBuf::from("/var/log/app/server.log"));
        assert_eq!(file.resolve(|_| None), PathBuf::from("server.log"));
    }

    #[test]
    fn reconstruction_follows_construction_properties() {
        let current = config();

        let mut next = current.clone();
        next.level = Level::Debug;
        next.suffix = ".yyyy-MM-dd-HH".to_string();
        next.period = RotationPeriod::Hour;
        assert!(!current.needs_reconstruction(&next));

        next.append = false;
        assert!(current.needs_reconstruction(&next));
    }

    #[test]
    fn serializes_kebab_case() {
        assert_eq!(
            serde_json::to_value(config()).unwrap(),
            json!({
                "name": "daily",
                "enabled": true,
                "level": "INFO",
                "formatter": "%s%n",
                "autoflush": true,
                "append": true,
                "file": {"relative-to": "jboss.server.log.dir", "path": "server.log"},
                "suffix": ".yyyy-MM-dd",
                "period": "day",
            })
        );
    }
}
