//! Configuration management for Portico
//!
//! Configuration is layered with figment. From lowest to highest priority:
//! built-in defaults, a TOML file, then `PORTICO__*` environment variables
//! (`PORTICO__RULES__CONTAINER_SEGMENT=libs` sets `rules.container_segment`).

pub mod logging;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use portico_foundation::LayoutMismatchPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config files looked up in the working directory, first match wins
pub const CONFIG_FILE_CANDIDATES: &[&str] = &["portico.toml", ".portico/config.toml"];

/// Prefix of environment variable overrides
pub const ENV_PREFIX: &str = "PORTICO__";

const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("Failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub rules: RulesConfig,
    pub logging: LoggingConfig,
}

/// Settings of the import rewrite rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Path segment under which every module root lives
    pub container_segment: String,
    /// Directory the container segment is searched below; the CLI falls
    /// back to its working directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_root: Option<PathBuf>,
    /// File name suffix marking a module root directory
    pub module_marker_suffix: String,
    /// Marker-like suffixes that never define a module root
    pub excluded_marker_suffixes: Vec<String>,
    pub on_layout_mismatch: LayoutMismatchPolicy,
    /// Extensions (without the dot) of files the CLI visits
    pub extensions: Vec<String>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            container_segment: "projects".to_string(),
            workspace_root: None,
            module_marker_suffix: ".module.ts".to_string(),
            excluded_marker_suffixes: vec!["-routing.module.ts".to_string()],
            on_layout_mismatch: LayoutMismatchPolicy::default(),
            extensions: vec!["ts".to_string()],
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format for development
    #[default]
    Pretty,
    /// Structured JSON format
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, a config file and the environment
    ///
    /// With `explicit` set, that file is the only one read and it must exist.
    /// Otherwise the first of [`CONFIG_FILE_CANDIDATES`] found in the working
    /// directory is used, if any.
    pub fn load(explicit: Option<&Path>) -> ConfigResult<Self> {
        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

        match explicit {
            Some(path) => {
                if !path.is_file() {
                    return Err(ConfigError::MissingFile(path.to_path_buf()));
                }
                tracing::debug!(path = %path.display(), "Loading TOML configuration");
                figment = figment.merge(Toml::file(path));
            }
            None => {
                if let Some(path) = CONFIG_FILE_CANDIDATES
                    .iter()
                    .map(Path::new)
                    .find(|p| p.is_file())
                {
                    tracing::debug!(path = %path.display(), "Loading TOML configuration");
                    figment = figment.merge(Toml::file(path));
                }
            }
        }

        let config: AppConfig = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(Box::new)?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.rules.container_segment.is_empty() {
            return Err(ConfigError::invalid("Container segment cannot be empty"));
        }
        if self.rules.container_segment.contains(['/', '\\']) {
            return Err(ConfigError::invalid(format!(
                "Container segment '{}' must be a single path segment",
                self.rules.container_segment
            )));
        }

        if self.rules.module_marker_suffix.is_empty() {
            return Err(ConfigError::invalid("Module marker suffix cannot be empty"));
        }

        if self.rules.extensions.is_empty() {
            return Err(ConfigError::invalid(
                "At least one file extension must be configured",
            ));
        }

        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::invalid(format!(
                "Invalid log level '{}', must be one of: {}",
                self.logging.level,
                VALID_LOG_LEVELS.join(", ")
            )));
        }

        Ok(())
    }

    /// Whether the CLI should visit `path`, judged by its extension
    pub fn handles_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.rules.extensions.iter().any(|e| e == ext))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use pretty_assertions::assert_eq;

    fn load(explicit: Option<&Path>) -> figment::Result<AppConfig> {
        AppConfig::load(explicit).map_err(|e| e.to_string().into())
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.rules.container_segment, "projects");
        assert_eq!(config.rules.module_marker_suffix, ".module.ts");
        assert_eq!(config.rules.on_layout_mismatch, LayoutMismatchPolicy::Error);
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_no_file_uses_defaults() {
        Jail::expect_with(|_jail| {
            assert_eq!(load(None)?, AppConfig::default());
            Ok(())
        });
    }

    #[test]
    fn test_load_from_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "portico.toml",
                r#"
                [rules]
                container_segment = "libs"
                on_layout_mismatch = "legacy-empty"
                extensions = ["ts", "tsx"]
                "#,
            )?;

            let config = load(None)?;
            assert_eq!(config.rules.container_segment, "libs");
            assert_eq!(
                config.rules.on_layout_mismatch,
                LayoutMismatchPolicy::LegacyEmpty
            );
            assert_eq!(config.rules.extensions, vec!["ts", "tsx"]);
            assert_eq!(config.rules.workspace_root, None);
            // Untouched keys keep their defaults
            assert_eq!(config.rules.module_marker_suffix, ".module.ts");
            Ok(())
        });
    }

    #[test]
    fn test_nested_config_file() {
        Jail::expect_with(|jail| {
            jail.create_dir(".portico")?;
            jail.create_file(
                ".portico/config.toml",
                r#"
                [logging]
                level = "debug"
                format = "json"
                "#,
            )?;

            let config = load(None)?;
            assert_eq!(config.logging.level, "debug");
            assert_eq!(config.logging.format, LogFormat::Json);
            Ok(())
        });
    }

    #[test]
    fn test_env_var_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "portico.toml",
                r#"
                [rules]
                container_segment = "libs"
                "#,
            )?;
            jail.set_env("PORTICO__RULES__CONTAINER_SEGMENT", "apps");
            jail.set_env("PORTICO__RULES__ON_LAYOUT_MISMATCH", "skip");

            let config = load(None)?;
            assert_eq!(config.rules.container_segment, "apps");
            assert_eq!(config.rules.on_layout_mismatch, LayoutMismatchPolicy::Skip);
            Ok(())
        });
    }

    #[test]
    fn test_workspace_root_from_env() {
        Jail::expect_with(|jail| {
            jail.set_env("PORTICO__RULES__WORKSPACE_ROOT", "/home/dev/projects/acme-ws");
            let config = load(None)?;
            assert_eq!(
                config.rules.workspace_root,
                Some(PathBuf::from("/home/dev/projects/acme-ws"))
            );
            Ok(())
        });
    }

    #[test]
    fn test_explicit_file_replaces_lookup() {
        Jail::expect_with(|jail| {
            jail.create_file("portico.toml", "[rules]\ncontainer_segment = \"libs\"\n")?;
            jail.create_file("custom.toml", "[rules]\ncontainer_segment = \"pkgs\"\n")?;

            let config = load(Some(Path::new("custom.toml")))?;
            assert_eq!(config.rules.container_segment, "pkgs");
            Ok(())
        });
    }

    #[test]
    fn test_explicit_file_must_exist() {
        Jail::expect_with(|_jail| {
            let err = AppConfig::load(Some(Path::new("missing.toml"))).unwrap_err();
            assert!(matches!(err, ConfigError::MissingFile(_)));
            Ok(())
        });
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("portico.toml", "[logging]\nlevel = \"loud\"\n")?;
            let err = AppConfig::load(None).unwrap_err();
            assert!(err.to_string().contains("Invalid log level 'loud'"));
            Ok(())
        });

        let mut config = AppConfig::default();
        config.rules.container_segment = String::new();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.rules.container_segment = "projects/libs".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.rules.extensions.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_policy_fails_to_load() {
        Jail::expect_with(|jail| {
            jail.create_file("portico.toml", "[rules]\non_layout_mismatch = \"ignore\"\n")?;
            assert!(matches!(AppConfig::load(None), Err(ConfigError::Load(_))));
            Ok(())
        });
    }

    #[test]
    fn test_handles_file_by_extension() {
        let config = AppConfig::default();
        assert!(config.handles_file(Path::new("src/app.component.ts")));
        assert!(!config.handles_file(Path::new("src/app.component.html")));
        assert!(!config.handles_file(Path::new("Makefile")));
    }
}
