use std::collections::HashMap;

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::internal::logger::Severity;

// Version information from build script - using option_env! for safety
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prefix of the environment variables read by [`LoggingConfig::load`].
pub const ENV_PREFIX: &str = "SEVLOG";

/// Get version information
pub fn get_version_info() -> String {
    let build_timestamp = option_env!("VERGEN_BUILD_TIMESTAMP").unwrap_or("unknown");
    let build_date = option_env!("VERGEN_BUILD_DATE").unwrap_or("unknown");
    let rustc_semver = option_env!("VERGEN_RUSTC_SEMVER").unwrap_or("unknown");
    let cargo_target_triple = option_env!("VERGEN_CARGO_TARGET_TRIPLE").unwrap_or("unknown");

    format!(
        "sevlog version {}\n\
         Built: {} ({})\n\
         Rust: {}\n\
         Target: {}",
        VERSION, build_date, build_timestamp, rustc_semver, cargo_target_triple
    )
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum severity written to the outputs.
    #[serde(default)]
    pub stderrthreshold: Severity,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default = "default_true")]
    pub color: bool,
    #[serde(default)]
    pub output_path: Option<String>,
    #[serde(default)]
    pub append_to_file: bool,
    #[serde(default)]
    pub disable_console: bool,
}

fn default_log_format() -> String {
    "compact".to_string()
}
fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            stderrthreshold: Severity::default(),
            format: default_log_format(),
            color: default_true(),
            output_path: None,
            append_to_file: false,
            disable_console: false,
        }
    }
}

impl LoggingConfig {
    /// Load from defaults, then `./sevlog.{yaml,toml,json}` (or `path`,
    /// which must then exist), then `SEVLOG_*` environment variables.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, None)
    }

    /// Like [`load`](Self::load), reading environment overrides from `env`
    /// instead of the process environment when it is given.
    pub fn load_with_env(
        path: Option<&str>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::with_name(path).required(true),
            None => File::with_name("sevlog").required(false),
        };

        let config = Config::builder()
            .set_default("stderrthreshold", "info")?
            .set_default("format", "compact")?
            .set_default("color", true)?
            .set_default("append_to_file", false)?
            .set_default("disable_console", false)?
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .source(env),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Check combinations that only make sense once CLI overrides are in.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.disable_console && self.output_path.is_none() {
            return Err(ConfigError::Message(
                "disable_console requires output_path".to_string(),
            ));
        }
        Ok(())
    }

    /// Apply command-line overrides on top of the loaded values.
    pub fn apply_args(&mut self, matches: &clap::ArgMatches) {
        if let Some(threshold) = matches.get_one::<Severity>("stderrthreshold") {
            self.stderrthreshold = *threshold;
        }
        if let Some(path) = matches.get_one::<String>("log-file") {
            self.output_path = Some(path.clone());
        }
        if let Some(format) = matches.get_one::<String>("format") {
            self.format = format.clone();
        }
        if matches.get_flag("append") {
            self.append_to_file = true;
        }
        if matches.get_flag("no-console") {
            self.disable_console = true;
        }
        if matches.get_flag("no-color") {
            self.color = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_defaults_without_sources() {
        let cfg = LoggingConfig::load_with_env(None, Some(HashMap::new())).unwrap();
        assert_eq!(cfg, LoggingConfig::default());
    }

    #[test]
    fn test_file_then_env_precedence() {
        let mut file = Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "stderrthreshold: warning\nformat: full\ncolor: false").unwrap();

        let mut env = HashMap::new();
        env.insert("SEVLOG_STDERRTHRESHOLD".to_string(), "2".to_string());

        let cfg =
            LoggingConfig::load_with_env(file.path().to_str(), Some(env)).unwrap();
        assert_eq!(cfg.stderrthreshold, Severity::Error);
        assert_eq!(cfg.format, "full");
        assert!(!cfg.color);
    }

    #[test]
    fn test_invalid_threshold_is_rejected() {
        let mut env = HashMap::new();
        env.insert("SEVLOG_STDERRTHRESHOLD".to_string(), "loud".to_string());
        assert!(LoggingConfig::load_with_env(None, Some(env)).is_err());
    }

    #[test]
    fn test_disabled_console_needs_a_file() {
        let mut env = HashMap::new();
        env.insert("SEVLOG_DISABLE_CONSOLE".to_string(), "true".to_string());
        let mut cfg = LoggingConfig::load_with_env(None, Some(env)).unwrap();
        assert!(cfg.disable_console);
        assert!(cfg.validate().is_err());

        cfg.output_path = Some("/tmp/sevlog.log".to_string());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        assert!(LoggingConfig::load_with_env(Some("/nonexistent/sevlog.yaml"), Some(HashMap::new())).is_err());
    }
}
