mod config;
mod error;
mod init;

pub use config::{LoggerConfig, LoggerFormat};
pub use error::LoggerError;

/// Install the global tracing subscriber for the worker process.
///
/// Must be called once, before any task handling starts.
pub fn logger_init(cfg: &LoggerConfig) -> Result<(), LoggerError> {
    match cfg.format {
        LoggerFormat::Text => init::text(cfg),
        LoggerFormat::Json => init::json(cfg),
        LoggerFormat::Journald => init::journald(cfg),
    }
}
