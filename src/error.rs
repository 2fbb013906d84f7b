//! Error types for the croupier wagering core

use thiserror::Error;
use uuid::Uuid;

/// Main error type for the wagering and ledger core
///
/// Every variant maps to a stable error code via [`CoreError::error_code`],
/// suitable for surfacing to API clients alongside the human-readable
/// message.
#[derive(Debug, Clone, Error)]
pub enum CoreError {
    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Game {game_id} unavailable: {reason}")]
    GameUnavailable { game_id: Uuid, reason: String },

    #[error("Insufficient balance: required {required}, available {available}")]
    InsufficientBalance { required: u64, available: u64 },

    #[error("Duplicate operation {operation_id} for user {user_id}")]
    DuplicateOperation { user_id: Uuid, operation_id: Uuid },

    #[error("Concurrency conflict after {attempts} attempts: {message}")]
    ConcurrencyConflict { message: String, attempts: u32 },

    #[error("Persistence failure during {operation}: {message}")]
    Persistence { message: String, operation: String },

    #[error("Manual reconciliation required: {message}")]
    Reconciliation {
        message: String,
        debit_entry: Option<Uuid>,
    },

    #[error("Configuration error: {message}")]
    Configuration { message: String, field: String },
}

impl CoreError {
    /// Stable machine-readable code for this error kind
    pub fn error_code(&self) -> &'static str {
        match self {
            CoreError::Validation { .. } => "VALIDATION_ERROR",
            CoreError::NotFound { .. } => "NOT_FOUND",
            CoreError::GameUnavailable { .. } => "GAME_UNAVAILABLE",
            CoreError::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            CoreError::DuplicateOperation { .. } => "DUPLICATE_OPERATION",
            CoreError::ConcurrencyConflict { .. } => "CONCURRENCY_CONFLICT",
            CoreError::Persistence { .. } => "PERSISTENCE_ERROR",
            CoreError::Reconciliation { .. } => "RECONCILIATION_REQUIRED",
            CoreError::Configuration { .. } => "CONFIGURATION_ERROR",
        }
    }

    /// Whether the error was raised before any balance mutation occurred
    ///
    /// Pre-mutation errors are safe to retry verbatim; the others require
    /// the caller to re-read state (or, for reconciliation, an operator).
    pub fn is_pre_mutation(&self) -> bool {
        matches!(
            self,
            CoreError::Validation { .. }
                | CoreError::NotFound { .. }
                | CoreError::GameUnavailable { .. }
                | CoreError::InsufficientBalance { .. }
                | CoreError::DuplicateOperation { .. }
                | CoreError::ConcurrencyConflict { .. }
        )
    }

    /// Shorthand for a validation error without a field reference
    pub fn validation(message: impl Into<String>) -> Self {
        CoreError::Validation {
            message: message.into(),
            field: None,
        }
    }

    /// Shorthand for a validation error tied to a specific input field
    pub fn validation_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        CoreError::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }
}

// Manual From implementations for external error types
impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Persistence {
            message: err.to_string(),
            operation: "serialization".to_string(),
        }
    }
}

/// Type alias for the main result type used throughout the library
pub type CoreResult<T> = Result<T, CoreError>;

/// Utility functions for cryptographic operations
pub mod utils {
    use sha2::{Digest, Sha256};

    /// Compute SHA256 hash of input data
    pub fn sha256(data: &[u8]) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(data);
        hasher.finalize().into()
    }

    /// Convert bytes to hexadecimal string
    pub fn to_hex(bytes: &[u8]) -> String {
        hex::encode(bytes)
    }

    /// Compute SHA256 hash and return as hex string
    pub fn sha256_hex(data: &[u8]) -> String {
        to_hex(&sha256(data))
    }
}

/// Logging configuration and initialization
pub mod logging {
    use std::env;
    use tracing::Level;
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    /// Logging output format
    #[derive(Debug, Clone)]
    pub enum LogFormat {
        Human,
        Json,
    }

    /// Logging output destination
    #[derive(Debug, Clone)]
    pub enum LogOutput {
        Stdout,
        Stderr,
    }

    /// Logging configuration
    #[derive(Debug, Clone)]
    pub struct LoggingConfig {
        pub level: Level,
        pub format: LogFormat,
        pub output: LogOutput,
    }

    impl Default for LoggingConfig {
        fn default() -> Self {
            Self {
                level: Level::INFO,
                format: LogFormat::Human,
                output: LogOutput::Stdout,
            }
        }
    }

    /// Initialize structured logging with the given configuration
    pub fn init_logging(config: LoggingConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let env_filter = EnvFilter::builder()
            .with_default_directive(config.level.into())
            .from_env_lossy()
            .add_directive("croupier=trace".parse()?)
            .add_directive("tokio=info".parse()?);

        let registry = tracing_subscriber::registry().with(env_filter);

        match config.format {
            LogFormat::Human => {
                let fmt_layer = fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true);

                match config.output {
                    LogOutput::Stdout => registry.with(fmt_layer.with_writer(std::io::stdout)).init(),
                    LogOutput::Stderr => registry.with(fmt_layer.with_writer(std::io::stderr)).init(),
                }
            }
            LogFormat::Json => {
                let fmt_layer = fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_span_events(fmt::format::FmtSpan::CLOSE);

                match config.output {
                    LogOutput::Stdout => registry.with(fmt_layer.with_writer(std::io::stdout)).init(),
                    LogOutput::Stderr => registry.with(fmt_layer.with_writer(std::io::stderr)).init(),
                }
            }
        }

        Ok(())
    }

    /// Initialize logging with environment-based configuration
    pub fn init_from_env() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let level = env::var("CROUPIER_LOG_LEVEL")
            .unwrap_or_else(|_| "info".to_string())
            .parse::<Level>()
            .unwrap_or(Level::INFO);

        let format = match env::var("CROUPIER_LOG_FORMAT").as_ref().map(|s| s.as_str()) {
            Ok("json") => LogFormat::Json,
            _ => LogFormat::Human,
        };

        let output = match env::var("CROUPIER_LOG_OUTPUT").as_ref().map(|s| s.as_str()) {
            Ok("stderr") => LogOutput::Stderr,
            _ => LogOutput::Stdout,
        };

        let config = LoggingConfig { level, format, output };
        init_logging(config)
    }
}
