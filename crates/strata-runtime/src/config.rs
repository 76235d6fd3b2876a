//! Runtime configuration.
//!
//! Values come from three layers, lowest priority first: built-in defaults,
//! an optional TOML file named by `STRATA_CONFIG_PATH`, and individual
//! `STRATA_*` environment variables.
//!
//! ```toml
//! service_name = "strata"
//! record_traces = true
//!
//! [observability]
//! log_level = "info"
//! log_format = "json"
//! ```

use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use strata_observability::{LogFormat, ObservabilityConfig};

pub const ENV_SERVICE_NAME: &str = "STRATA_SERVICE_NAME";
pub const ENV_RECORD_TRACES: &str = "STRATA_RECORD_TRACES";
pub const ENV_LOG_LEVEL: &str = "STRATA_LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "STRATA_LOG_FORMAT";
pub const ENV_CONFIG_PATH: &str = "STRATA_CONFIG_PATH";

const DEFAULT_SERVICE_NAME: &str = "strata";

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid environment variable '{key}': {message}")]
    InvalidEnvVar { key: String, message: String },

    #[error("Failed to read config file '{}': {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Configuration validation failed: {0}")]
    Validation(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Process-wide settings for a Strata service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Name reported by service metadata.
    pub service_name: String,
    /// Whether dispatches with a correlation id write memory records.
    pub record_traces: bool,
    pub observability: ObservabilityConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            record_traces: true,
            observability: ObservabilityConfig::default(),
        }
    }
}

impl RuntimeConfig {
    pub fn builder() -> RuntimeConfigBuilder {
        RuntimeConfigBuilder::new()
    }

    /// Defaults, then `STRATA_CONFIG_PATH`, then `STRATA_*` overrides.
    pub fn from_env() -> ConfigResult<Self> {
        RuntimeConfigBuilder::from_env()?.build()
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::File {
            path: path.to_path_buf(),
            source,
        })?;

        Self::load_from_toml(&content)
    }

    /// Load configuration from a TOML string
    pub fn load_from_toml(toml_content: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(toml_content)?)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.service_name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "service_name must not be empty".to_string(),
            ));
        }
        if self.observability.log_level.trim().is_empty() {
            return Err(ConfigError::Validation(
                "observability.log_level must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for [`RuntimeConfig`] with environment variable support
#[derive(Debug, Clone, Default)]
pub struct RuntimeConfigBuilder {
    config: RuntimeConfig,
}

impl RuntimeConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an already loaded configuration.
    pub fn from_config(config: RuntimeConfig) -> Self {
        Self { config }
    }

    /// Read the process environment.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reads variables through
    /// `lookup`.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = match lookup(ENV_CONFIG_PATH) {
            Some(path) => Self::from_config(RuntimeConfig::load_from_file(path)?),
            None => Self::default(),
        };

        if let Some(name) = lookup(ENV_SERVICE_NAME) {
            builder = builder.service_name(name);
        }
        if let Some(record) = parse_bool(ENV_RECORD_TRACES, lookup(ENV_RECORD_TRACES))? {
            builder = builder.record_traces(record);
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            builder = builder.log_level(level);
        }
        if let Some(format) = lookup(ENV_LOG_FORMAT) {
            let format = format
                .parse::<LogFormat>()
                .map_err(|e| ConfigError::InvalidEnvVar {
                    key: ENV_LOG_FORMAT.to_string(),
                    message: e.to_string(),
                })?;
            builder = builder.log_format(format);
        }

        Ok(builder)
    }

    pub fn service_name(mut self, name: impl Into<String>) -> Self {
        self.config.service_name = name.into();
        self
    }

    pub fn record_traces(mut self, enabled: bool) -> Self {
        self.config.record_traces = enabled;
        self
    }

    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.config.observability.log_level = level.into();
        self
    }

    pub fn log_format(mut self, format: LogFormat) -> Self {
        self.config.observability.log_format = format;
        self
    }

    pub fn observability(mut self, observability: ObservabilityConfig) -> Self {
        self.config.observability = observability;
        self
    }

    /// Validate and build.
    pub fn build(self) -> ConfigResult<RuntimeConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

fn parse_bool(key: &str, value: Option<String>) -> ConfigResult<Option<bool>> {
    let Some(val) = value else {
        return Ok(None);
    };
    match val.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(Some(true)),
        "false" | "0" | "no" | "off" => Ok(Some(false)),
        _ => Err(ConfigError::InvalidEnvVar {
            key: key.to_string(),
            message: format!("invalid boolean value '{val}', expected true/false/1/0/yes/no/on/off"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_builder() {
        let config = RuntimeConfigBuilder::new().build().unwrap();
        assert_eq!(config.service_name, "strata");
        assert!(config.record_traces);
        assert_eq!(config.observability.log_level, "info");
        assert_eq!(config.observability.log_format, LogFormat::Text);
    }

    #[test]
    fn test_empty_environment_gives_defaults() {
        let config = RuntimeConfigBuilder::from_lookup(lookup_from(&[]))
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(config, RuntimeConfig::default());
    }

    #[test]
    fn test_env_overrides() {
        let config = RuntimeConfigBuilder::from_lookup(lookup_from(&[
            (ENV_SERVICE_NAME, "operator"),
            (ENV_RECORD_TRACES, "off"),
            (ENV_LOG_LEVEL, "debug"),
            (ENV_LOG_FORMAT, "json"),
        ]))
        .unwrap()
        .build()
        .unwrap();

        assert_eq!(config.service_name, "operator");
        assert!(!config.record_traces);
        assert_eq!(config.observability.log_level, "debug");
        assert_eq!(config.observability.log_format, LogFormat::Json);
    }

    #[rstest]
    #[case("true", true)]
    #[case("1", true)]
    #[case("YES", true)]
    #[case("off", false)]
    #[case(" no ", false)]
    fn test_env_bool_parsing(#[case] raw: &str, #[case] expected: bool) {
        assert_eq!(
            parse_bool(ENV_RECORD_TRACES, Some(raw.to_string())).unwrap(),
            Some(expected)
        );
    }

    #[test]
    fn test_invalid_bool_is_rejected() {
        let err = RuntimeConfigBuilder::from_lookup(lookup_from(&[(ENV_RECORD_TRACES, "maybe")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar { ref key, .. } if key == ENV_RECORD_TRACES));
        assert!(err.to_string().contains("invalid boolean value 'maybe'"));
    }

    #[test]
    fn test_invalid_log_format_is_rejected() {
        let err = RuntimeConfigBuilder::from_lookup(lookup_from(&[(ENV_LOG_FORMAT, "xml")]))
            .unwrap_err();
        assert!(err.to_string().contains(ENV_LOG_FORMAT));
    }

    #[test]
    fn test_blank_service_name_fails_validation() {
        let err = RuntimeConfigBuilder::new()
            .service_name("   ")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("service_name must not be empty"));
    }

    #[test]
    fn test_load_from_toml_with_partial_content() {
        let config = RuntimeConfig::load_from_toml(
            r#"
            service_name = "ops"

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.service_name, "ops");
        assert!(config.record_traces);
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn test_load_from_toml_rejects_bad_types() {
        let err = RuntimeConfig::load_from_toml("record_traces = \"sometimes\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_file_then_env_layering() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "service_name = \"from-file\"\nrecord_traces = false").unwrap();
        let path = file.path().to_string_lossy().into_owned();

        let config = RuntimeConfigBuilder::from_lookup(lookup_from(&[
            (ENV_CONFIG_PATH, path.as_str()),
            (ENV_RECORD_TRACES, "true"),
        ]))
        .unwrap()
        .build()
        .unwrap();

        assert_eq!(config.service_name, "from-file");
        assert!(config.record_traces);
    }

    #[test]
    fn test_missing_file_is_reported() {
        let err = RuntimeConfig::load_from_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::File { .. }));
        assert!(err.to_string().contains("/definitely/not/here.toml"));
    }
}
