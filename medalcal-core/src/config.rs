//! medalcal configuration.
//!
//! Read from `~/.config/medalcal/config.toml` unless another path is given.
//! Every field has a default, so a missing file is not an error.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CoreError, CoreResult};
use crate::retry::RetryPolicy;

static DEFAULT_CALENDAR_NAME: &str = "NBC Sports";
static DEFAULT_LOG_DIR: &str = "./logs";

fn default_time_min() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2022, 2, 1, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Display name of the calendar to reconcile (exact match)
    pub calendar_name: String,
    /// Lower bound for fetched events
    pub time_min: DateTime<Utc>,
    pub log_dir: PathBuf,
    pub retry: RetryConfig,
    pub google: GoogleConfig,
    pub lights: LightsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            calendar_name: DEFAULT_CALENDAR_NAME.to_string(),
            time_min: default_time_min(),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            retry: RetryConfig::default(),
            google: GoogleConfig::default(),
            lights: LightsConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub base: f64,
    /// humantime duration, e.g. "60s"
    pub max_total_delay: String,
    pub jitter_threshold: String,
    pub max_jitter: String,
}

impl Default for RetryConfig {
    fn default() -> Self {
        RetryConfig {
            base: 2.0,
            max_total_delay: "60s".to_string(),
            jitter_threshold: "500ms".to_string(),
            max_jitter: "1s".to_string(),
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> CoreResult<RetryPolicy> {
        let policy = RetryPolicy {
            base: self.base,
            max_total_delay: parse_duration("retry.max_total_delay", &self.max_total_delay)?,
            jitter_threshold: parse_duration("retry.jitter_threshold", &self.jitter_threshold)?,
            max_jitter: parse_duration("retry.max_jitter", &self.max_jitter)?,
        };
        policy.validate()?;
        Ok(policy)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GoogleConfig {
    /// OAuth client id/secret, used for token refresh
    pub credentials_path: PathBuf,
    /// Stored access/refresh tokens
    pub token_path: PathBuf,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        GoogleConfig {
            credentials_path: PathBuf::from("~/.config/medalcal/credentials.json"),
            token_path: PathBuf::from("~/.config/medalcal/token.json"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LightsConfig {
    /// LIFX selector, e.g. "all" or "group:Living Room"
    pub selector: String,
    /// File holding the LIFX personal access token
    pub token_path: PathBuf,
    pub poll_interval: String,
    pub brightness: f64,
}

impl Default for LightsConfig {
    fn default() -> Self {
        LightsConfig {
            selector: "all".to_string(),
            token_path: PathBuf::from("~/.config/medalcal/lifx_token"),
            poll_interval: "60s".to_string(),
            brightness: 1.0,
        }
    }
}

impl LightsConfig {
    pub fn poll_interval(&self) -> CoreResult<Duration> {
        parse_duration("lights.poll_interval", &self.poll_interval)
    }
}

impl Config {
    pub fn config_path() -> CoreResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CoreError::Config("Could not determine config directory".into()))?
            .join("medalcal");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from `path`, or the default location when `None`.
    pub fn load(path: Option<&Path>) -> CoreResult<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Config::default());
        }

        let contents = std::fs::read_to_string(&path).map_err(|e| {
            CoreError::Config(format!("Could not read {}: {}", path.display(), e))
        })?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| CoreError::Config(format!("Invalid {}: {}", path.display(), e)))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> CoreResult<()> {
        self.retry.policy()?;
        self.lights.poll_interval()?;

        if !(0.0..=1.0).contains(&self.lights.brightness) {
            return Err(CoreError::Config(format!(
                "lights.brightness must be between 0 and 1, got {}",
                self.lights.brightness
            )));
        }

        Ok(())
    }

    pub fn log_dir(&self) -> PathBuf {
        expand_path(&self.log_dir)
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> CoreResult<()> {
        let contents = format!(
            "\
# medalcal configuration

# Calendar to reconcile (exact display name):
# calendar_name = \"{}\"

# Only events starting after this instant are fetched:
# time_min = \"2022-02-01T00:00:00Z\"

# Where per-run log files go:
# log_dir = \"{}\"

# [retry]
# base = 2.0
# max_total_delay = \"60s\"
# jitter_threshold = \"500ms\"
# max_jitter = \"1s\"

# [google]
# credentials_path = \"~/.config/medalcal/credentials.json\"
# token_path = \"~/.config/medalcal/token.json\"

# [lights]
# selector = \"all\"
# token_path = \"~/.config/medalcal/lifx_token\"
# poll_interval = \"60s\"
# brightness = 1.0
",
            DEFAULT_CALENDAR_NAME, DEFAULT_LOG_DIR
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, contents)?;

        Ok(())
    }
}

/// Expand a leading `~` and environment variables.
pub fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    match shellexpand::full(&raw) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => PathBuf::from(shellexpand::tilde(&raw).as_ref()),
    }
}

fn parse_duration(field: &str, value: &str) -> CoreResult<Duration> {
    humantime::parse_duration(value)
        .map_err(|e| CoreError::Config(format!("{} = \"{}\": {}", field, value, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_means_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(Some(&dir.path().join("nope.toml"))).unwrap();

        assert_eq!(config.calendar_name, "NBC Sports");
        assert_eq!(config.time_min, default_time_min());
        assert_eq!(config.retry.policy().unwrap(), RetryPolicy::default());
        assert_eq!(config.lights.poll_interval().unwrap(), Duration::from_secs(60));
    }

    #[test]
    fn partial_file_overrides_only_given_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
calendar_name = "Olympics"
time_min = "2026-02-06T00:00:00Z"

[retry]
max_total_delay = "2m"

[lights]
brightness = 0.4
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();

        assert_eq!(config.calendar_name, "Olympics");
        assert_eq!(config.time_min.to_rfc3339(), "2026-02-06T00:00:00+00:00");
        assert_eq!(
            config.retry.policy().unwrap().max_total_delay,
            Duration::from_secs(120)
        );
        assert_eq!(config.retry.base, 2.0);
        assert_eq!(config.lights.brightness, 0.4);
        assert_eq!(config.lights.selector, "all");
    }

    #[test]
    fn invalid_values_are_config_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        std::fs::write(&path, "[retry]\nmax_total_delay = \"soon\"\n").unwrap();
        assert!(matches!(Config::load(Some(&path)), Err(CoreError::Config(_))));

        std::fs::write(&path, "[lights]\nbrightness = 3.0\n").unwrap();
        assert!(matches!(Config::load(Some(&path)), Err(CoreError::Config(_))));
    }

    #[test]
    fn default_template_parses_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        Config::create_default_config(&path).unwrap();
        let config = Config::load(Some(&path)).unwrap();

        assert_eq!(config.calendar_name, DEFAULT_CALENDAR_NAME);
        assert_eq!(config.log_dir, PathBuf::from(DEFAULT_LOG_DIR));
    }

    #[test]
    fn unwritable_template_path_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();

        let err = Config::create_default_config(dir.path()).unwrap_err();

        assert!(matches!(err, CoreError::Io(_)));
    }
}
