use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use standby_observe::{LoggerError, LoggerFormat};

// Environment variable names (external interface).
const ENV_PORT: &str = "TASK_SERVER_PORT";
const ENV_AUTH_TOKEN: &str = "TASK_AUTH_TOKEN";
const ENV_TIMEOUT: &str = "WORKER_TIMEOUT";
const ENV_WORK_DIR: &str = "WORKER_WORK_DIR";
const ENV_INTERPRETER: &str = "WORKER_INTERPRETER";
const ENV_LOG_LEVEL: &str = "LOG_LEVEL";
const ENV_LOG_FORMAT: &str = "LOG_FORMAT";

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_TIMEOUT_SECS: u64 = 3600;
const DEFAULT_WORK_DIR: &str = "/tmp";
const DEFAULT_INTERPRETER: &str = "python";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {var}: {value}")]
    InvalidNumber { var: &'static str, value: String },
    #[error(transparent)]
    Logger(#[from] LoggerError),
}

/// Worker configuration, read from the environment at startup.
#[derive(Debug, Clone)]
pub struct StandbyConfig {
    pub port: u16,
    /// Bearer secret; empty disables auth.
    pub auth_token: String,
    pub timeout: Duration,
    pub work_dir: PathBuf,
    pub interpreter: String,
    pub log_level: String,
    pub log_format: LoggerFormat,
}

impl StandbyConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = parse_number(ENV_PORT, DEFAULT_PORT)?;
        let timeout_secs = parse_number(ENV_TIMEOUT, DEFAULT_TIMEOUT_SECS)?;
        let log_format = match std::env::var(ENV_LOG_FORMAT) {
            Ok(raw) => raw.parse::<LoggerFormat>()?,
            Err(_) => LoggerFormat::Text,
        };

        Ok(Self {
            port,
            auth_token: std::env::var(ENV_AUTH_TOKEN).unwrap_or_default(),
            timeout: Duration::from_secs(timeout_secs),
            work_dir: std::env::var(ENV_WORK_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_WORK_DIR)),
            interpreter: std::env::var(ENV_INTERPRETER)
                .unwrap_or_else(|_| DEFAULT_INTERPRETER.to_string()),
            log_level: std::env::var(ENV_LOG_LEVEL).unwrap_or_else(|_| "info".to_string()),
            log_format,
        })
    }

    pub fn auth_enabled(&self) -> bool {
        !self.auth_token.is_empty()
    }
}

fn parse_number<T: std::str::FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(var) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { var, value: raw }),
        Err(_) => Ok(default),
    }
}
