use sentry::types::Dsn;
use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracker::TrackerError;
use tracker::client::DEFAULT_API_URL;

pub const PROJECT_NAME_VAR: &str = "INPUT_PROJECT_NAME";
pub const API_KEY_VAR: &str = "DEFECTDOJO_API_KEY";
pub const API_URL_VAR: &str = "API_URL";
pub const GITHUB_OUTPUT_VAR: &str = "GITHUB_OUTPUT";
pub const COMPOSE_DIR_VAR: &str = "DEFECTDOJO_COMPOSE_DIR";
pub const SETTLE_SECS_VAR: &str = "DEFECTDOJO_SETTLE_SECS";
pub const SENTRY_DSN_VAR: &str = "SENTRY_DSN";
pub const STATSD_HOST_VAR: &str = "STATSD_HOST";
pub const STATSD_PORT_VAR: &str = "STATSD_PORT";

const DEFAULT_SETTLE_SECS: u64 = 10;
const DEFAULT_STATSD_PORT: u16 = 8125;

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct LoggingConfig {
    pub sentry_dsn: Option<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct MetricsConfig {
    pub statsd_host: String,
    #[serde(default = "default_statsd_port")]
    pub statsd_port: u16,
}

/// Settings for one run, built once at startup and passed down by reference.
///
/// Required values are kept optional here because each subcommand needs a
/// different subset; use the `require_*` accessors at the point of use.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Config {
    pub project_name: Option<String>,
    pub api_key: Option<String>,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// CI step output file; results go to stdout when unset.
    pub github_output: Option<PathBuf>,
    /// Directory the remediation runs `docker compose` in.
    pub compose_dir: Option<PathBuf>,
    #[serde(default = "default_settle_secs")]
    pub settle_secs: u64,
    #[serde(default)]
    pub logging: LoggingConfig,
    pub metrics: Option<MetricsConfig>,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_settle_secs() -> u64 {
    DEFAULT_SETTLE_SECS
}

fn default_statsd_port() -> u16 {
    DEFAULT_STATSD_PORT
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let data: Config = serde_yaml::from_reader(file)?;
        data.validate()?;

        Ok(data)
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads `path` when given, otherwise the environment. File values for the
    /// step output and the API key yield to the environment, since the CI
    /// runner sets those per job.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => {
                let config = Self::from_file(path)?;
                Ok(config.with_env_overrides(|name| std::env::var(name).ok()))
            }
            None => Self::from_env(),
        }
    }

    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(path) = var(GITHUB_OUTPUT_VAR) {
            self.github_output = Some(PathBuf::from(path));
        }
        if let Some(api_key) = var(API_KEY_VAR) {
            self.api_key = Some(api_key);
        }
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.sentry_dsn().map(|_| ())
    }

    pub fn sentry_dsn(&self) -> Result<Option<Dsn>, ConfigError> {
        self.logging
            .sentry_dsn
            .as_deref()
            .map(|dsn| {
                dsn.trim().parse::<Dsn>().map_err(|_| ConfigError::InvalidValue {
                    name: SENTRY_DSN_VAR,
                    value: dsn.to_string(),
                })
            })
            .transpose()
    }

    /// Builds the config from a variable lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let settle_secs = match var(SETTLE_SECS_VAR) {
            Some(value) => parse_var(SETTLE_SECS_VAR, &value)?,
            None => DEFAULT_SETTLE_SECS,
        };

        let metrics = match var(STATSD_HOST_VAR) {
            Some(statsd_host) => Some(MetricsConfig {
                statsd_host,
                statsd_port: match var(STATSD_PORT_VAR) {
                    Some(value) => parse_var(STATSD_PORT_VAR, &value)?,
                    None => DEFAULT_STATSD_PORT,
                },
            }),
            None => None,
        };

        let config = Config {
            project_name: var(PROJECT_NAME_VAR),
            api_key: var(API_KEY_VAR),
            api_url: var(API_URL_VAR).unwrap_or_else(default_api_url),
            github_output: var(GITHUB_OUTPUT_VAR).map(PathBuf::from),
            compose_dir: var(COMPOSE_DIR_VAR).map(PathBuf::from),
            settle_secs,
            logging: LoggingConfig {
                sentry_dsn: var(SENTRY_DSN_VAR),
            },
            metrics,
        };
        config.validate()?;

        Ok(config)
    }

    pub fn require_api_key(&self) -> Result<&str, TrackerError> {
        require(self.api_key.as_deref(), API_KEY_VAR)
    }

    pub fn require_project_name(&self) -> Result<&str, TrackerError> {
        require(self.project_name.as_deref(), PROJECT_NAME_VAR)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_secs(self.settle_secs)
    }
}

fn require<'a>(value: Option<&'a str>, name: &str) -> Result<&'a str, TrackerError> {
    value
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| TrackerError::ConfigurationMissing(name.to_string()))
}

fn parse_var<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        name,
        value: value.to_string(),
    })
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("could not load config from file: {0}")]
    LoadError(#[from] std::io::Error),
    #[error("could not parse config: {0}")]
    ParseError(#[from] serde_yaml::Error),
    #[error("invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },
}
