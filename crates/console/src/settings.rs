//! Console settings
//!
//! Layered with the `config` crate, later sources winning:
//!
//! 1. built-in defaults
//! 2. `~/.queue-console/settings.toml` and the platform config dir
//!    (`directories`), both optional, or an explicit `--settings` file
//! 3. `QUEUE_CONSOLE_*` environment variables
//!
//! ```text
//! QUEUE_CONSOLE_CONNECT_DELAY_MS=500 \
//! QUEUE_CONSOLE_LOG_FORMAT=json \
//!     ./queue-console
//! ```

use config::{Config, ConfigError, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use queue_console_core::application::constants::{
    CONNECT_DELAY, CONSUME_INTERVAL, MESSAGE_TOKEN_LENGTH,
};
use queue_console_core::application::LifecycleTimings;

const ENV_PREFIX: &str = "QUEUE_CONSOLE";
const DEFAULT_SETTINGS_PATH: &str = "~/.queue-console/settings.toml";
const SETTINGS_FILE_NAME: &str = "settings.toml";

/// Diagnostic log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConsoleSettings {
    /// Delay before a simulated connect resolves
    pub connect_delay_ms: u64,
    /// Interval between simulated deliveries
    pub consume_interval_ms: u64,
    /// Length of the random token in each message
    pub token_length: usize,
    pub log_format: LogFormat,
    /// Write diagnostics to a daily rolling file here instead of stderr
    pub log_dir: Option<String>,
}

impl ConsoleSettings {
    /// Load settings; an explicit file must exist, the default ones may not
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let files = match explicit {
            Some(path) => vec![(path.to_path_buf(), true)],
            None => default_locations()
                .into_iter()
                .map(|path| (path, false))
                .collect(),
        };
        Self::from_files(&files)
    }

    fn from_files(files: &[(PathBuf, bool)]) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("connect_delay_ms", CONNECT_DELAY.as_millis() as i64)?
            .set_default("consume_interval_ms", CONSUME_INTERVAL.as_millis() as i64)?
            .set_default("token_length", MESSAGE_TOKEN_LENGTH as i64)?
            .set_default("log_format", "pretty")?;

        for (path, required) in files {
            builder = builder.add_source(
                File::from(path.as_path())
                    .format(FileFormat::Toml)
                    .required(*required),
            );
        }

        let settings: Self = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.consume_interval_ms == 0 {
            return Err(ConfigError::Message(
                "consume_interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.token_length == 0 {
            return Err(ConfigError::Message(
                "token_length must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn timings(&self) -> LifecycleTimings {
        LifecycleTimings {
            connect_delay: Duration::from_millis(self.connect_delay_ms),
            consume_interval: Duration::from_millis(self.consume_interval_ms),
        }
    }
}

fn default_locations() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(
        shellexpand::tilde(DEFAULT_SETTINGS_PATH).into_owned(),
    )];
    if let Some(dirs) = ProjectDirs::from("", "", "queue-console") {
        paths.push(dirs.config_dir().join(SETTINGS_FILE_NAME));
    }
    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "queue-console-{}-{}.toml",
            name,
            std::process::id()
        ));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_defaults_match_lifecycle_constants() {
        let settings = ConsoleSettings::from_files(&[]).unwrap();
        assert_eq!(settings.timings(), LifecycleTimings::default());
        assert_eq!(settings.token_length, MESSAGE_TOKEN_LENGTH);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let path = write_temp(
            "override",
            "connect_delay_ms = 250\nlog_format = \"json\"\nlog_dir = \"/tmp/qc-logs\"\n",
        );
        let settings = ConsoleSettings::load(Some(&path)).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(settings.connect_delay_ms, 250);
        assert_eq!(settings.consume_interval_ms, 3000);
        assert_eq!(settings.log_format, LogFormat::Json);
        assert_eq!(settings.log_dir.as_deref(), Some("/tmp/qc-logs"));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let path = std::env::temp_dir().join("queue-console-does-not-exist.toml");
        assert!(ConsoleSettings::load(Some(&path)).is_err());
    }

    #[test]
    fn test_zero_interval_rejected() {
        let path = write_temp("zero", "consume_interval_ms = 0\n");
        let result = ConsoleSettings::load(Some(&path));
        std::fs::remove_file(&path).ok();

        let err = result.unwrap_err();
        assert!(err.to_string().contains("consume_interval_ms"));
    }
}
