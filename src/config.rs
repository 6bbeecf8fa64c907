//! Configuration file handling

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use kubeinspect_core::{AggregatorConfig, DEFAULT_SIDECAR_PREFIX};
use kubeinspect_types::ResourceKind;

use crate::output::OutputFormat;

/// Lines fetched per container when nothing else is configured
pub const DEFAULT_TAIL_LINES: i64 = 100;

/// Contents of `config.toml`; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Containers whose name starts with this are left out of metrics and logs
    pub sidecar_prefix: Option<String>,
    /// Which resource kinds the resources report lists, in order
    pub resource_kinds: Option<Vec<ResourceKind>>,
    /// Lines of log fetched per container
    pub tail_lines: Option<i64>,
    /// Default output format for subcommands
    pub output: Option<OutputFormat>,
}

impl Config {
    /// Load from `path`, or from the default location when `None`.
    ///
    /// A missing default file yields the defaults; a missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::read(path),
            None => {
                let path = Self::config_path()?;
                if !path.exists() {
                    return Ok(Self::default());
                }
                Self::read(&path)
            }
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let home = dirs_next::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".config").join("kubeinspect").join("config.toml"))
    }
}

/// Values from the command line that take precedence over the file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub sidecar_prefix: Option<String>,
    pub tail_lines: Option<i64>,
    pub output: Option<OutputFormat>,
}

/// Effective settings after layering defaults, file and flags
#[derive(Debug, Clone)]
pub struct Settings {
    pub aggregator: AggregatorConfig,
    pub tail_lines: i64,
    pub output: OutputFormat,
}

impl Settings {
    pub fn resolve(config: Config, overrides: Overrides) -> Result<Self> {
        let tail_lines = overrides
            .tail_lines
            .or(config.tail_lines)
            .unwrap_or(DEFAULT_TAIL_LINES);
        if tail_lines <= 0 {
            anyhow::bail!("tail_lines must be positive, got {}", tail_lines);
        }

        let defaults = AggregatorConfig::default();
        let resource_kinds = match config.resource_kinds {
            Some(kinds) if kinds.is_empty() => {
                anyhow::bail!("resource_kinds must name at least one of requests, limits")
            }
            Some(kinds) => kinds,
            None => defaults.resource_kinds,
        };

        Ok(Self {
            aggregator: AggregatorConfig {
                sidecar_prefix: overrides
                    .sidecar_prefix
                    .or(config.sidecar_prefix)
                    .unwrap_or_else(|| DEFAULT_SIDECAR_PREFIX.to_string()),
                resource_kinds,
            },
            tail_lines,
            output: overrides.output.or(config.output).unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_file_values() {
        let settings = Settings::resolve(Config::default(), Overrides::default()).unwrap();
        assert_eq!(settings.aggregator.sidecar_prefix, "istio");
        assert_eq!(
            settings.aggregator.resource_kinds,
            vec![ResourceKind::Requests, ResourceKind::Limits]
        );
        assert_eq!(settings.tail_lines, DEFAULT_TAIL_LINES);
        assert_eq!(settings.output, OutputFormat::Table);
    }

    #[test]
    fn test_parse_full_file() {
        let config = Config::parse(
            r#"
            sidecar_prefix = "linkerd"
            resource_kinds = ["limits"]
            tail_lines = 20
            output = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.sidecar_prefix.as_deref(), Some("linkerd"));
        assert_eq!(config.resource_kinds, Some(vec![ResourceKind::Limits]));
        assert_eq!(config.tail_lines, Some(20));
        assert_eq!(config.output, Some(OutputFormat::Json));
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(Config::parse("sidecar = \"istio\"").is_err());
    }

    #[test]
    fn test_flags_override_file() {
        let config = Config {
            sidecar_prefix: Some("linkerd".to_string()),
            tail_lines: Some(20),
            ..Default::default()
        };
        let overrides = Overrides {
            sidecar_prefix: Some("envoy".to_string()),
            ..Default::default()
        };

        let settings = Settings::resolve(config, overrides).unwrap();
        assert_eq!(settings.aggregator.sidecar_prefix, "envoy");
        assert_eq!(settings.tail_lines, 20);
    }

    #[test]
    fn test_empty_prefix_is_kept() {
        let config = Config::parse("sidecar_prefix = \"\"").unwrap();
        let settings = Settings::resolve(config, Overrides::default()).unwrap();
        assert_eq!(settings.aggregator.sidecar_prefix, "");
    }

    #[test]
    fn test_invalid_values_rejected() {
        let config = Config::parse("resource_kinds = []").unwrap();
        assert!(Settings::resolve(config, Overrides::default()).is_err());

        let overrides = Overrides {
            tail_lines: Some(0),
            ..Default::default()
        };
        assert!(Settings::resolve(Config::default(), overrides).is_err());
    }

    #[test]
    fn test_load_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "tail_lines = 5").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.tail_lines, Some(5));
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load(Some(&dir.path().join("absent.toml"))).is_err());
    }
}
