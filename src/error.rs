//! Error types for `matchwarden`
//!
//! Configuration problems are fatal and carry every validation issue found.
//! Runtime problems inside the match engine are never errors: stale events,
//! guard failures and missing host data are logged and dropped. What remains
//! here are the failures of the surrounding process (config, scripts, host
//! output, I/O).

use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Exit Codes
// ============================================================================

/// Process exit codes for `matchwarden` CLI operations.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// General error
    pub const ERROR: i32 = 1;

    /// Configuration error (invalid YAML, validation failure)
    pub const CONFIG_ERROR: i32 = 2;

    /// I/O error (file not found, permission denied)
    pub const IO_ERROR: i32 = 3;

    /// Event script error (malformed line, unknown console command)
    pub const SCRIPT_ERROR: i32 = 4;

    /// Host adapter error (intent output failed)
    pub const HOST_ERROR: i32 = 5;

    /// Usage error (invalid arguments, missing required options)
    pub const USAGE_ERROR: i32 = 64;

    /// Interrupted by SIGINT (Ctrl+C)
    pub const INTERRUPTED: i32 = 130;

    /// Terminated by SIGTERM
    pub const TERMINATED: i32 = 143;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `matchwarden` operations.
#[derive(Debug, Error)]
pub enum MatchWardenError {
    /// Configuration loading or validation error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Event script or console parsing error
    #[error(transparent)]
    Script(#[from] ScriptError),

    /// Host adapter error
    #[error(transparent)]
    Host(#[from] HostError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl MatchWardenError {
    /// Returns the exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Json(_) | Self::Yaml(_) => ExitCode::CONFIG_ERROR,
            Self::Script(_) => ExitCode::SCRIPT_ERROR,
            Self::Host(_) => ExitCode::HOST_ERROR,
            Self::Io(_) => ExitCode::IO_ERROR,
        }
    }
}

// ============================================================================
// Configuration Errors
// ============================================================================

/// Configuration loading and validation errors.
///
/// All of these are fatal: the process refuses to start a session with a
/// configuration that failed to load.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// YAML parsing failed
    #[error("parse error in {path}: {message}")]
    ParseError {
        /// Path to the configuration file
        path: PathBuf,
        /// Line number where the error occurred (if available)
        line: Option<usize>,
        /// Error message from the parser
        message: String,
    },

    /// Configuration validation failed
    #[error("validation failed for {path}: {}", summarize(.errors))]
    ValidationError {
        /// Path to the configuration file
        path: String,
        /// List of validation issues found
        errors: Vec<ValidationIssue>,
    },

    /// Configuration file not found
    #[error("file not found: {path}")]
    MissingFile {
        /// Path to the missing file
        path: PathBuf,
    },

    /// Refusing to overwrite an existing file
    #[error("file already exists: {path} (use --force to overwrite)")]
    AlreadyExists {
        /// Path to the existing file
        path: PathBuf,
    },

    /// Field has an invalid value
    #[error("invalid value for '{field}': got '{value}', expected {expected}")]
    InvalidValue {
        /// Name of the field with invalid value
        field: String,
        /// The actual value provided
        value: String,
        /// Description of what was expected
        expected: String,
    },

    /// Environment variable referenced in configuration is not set
    #[error("environment variable '{var}' not set ({location})")]
    EnvVarNotSet {
        /// Name of the environment variable
        var: String,
        /// Message attached to the `${VAR:?message}` reference
        location: String,
    },
}

fn summarize(errors: &[ValidationIssue]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

// ============================================================================
// Validation Types
// ============================================================================

/// A single validation issue found during configuration validation.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// Path to the problematic field (e.g., "stations[1].addresses")
    pub path: String,
    /// Description of the validation issue
    pub message: String,
    /// Severity level of the issue
    pub severity: Severity,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {} at {}", prefix, self.message, self.path)
    }
}

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Validation failure that prevents the configuration from being used
    Error,
    /// Potential issue that does not prevent loading
    Warning,
}

// ============================================================================
// Script Errors
// ============================================================================

/// Errors raised while parsing event scripts and operator console lines.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// A script line could not be parsed
    #[error("script line {line}: {message}")]
    Parse {
        /// 1-based line (or list item) number
        line: usize,
        /// Parser message
        message: String,
    },

    /// A duration literal could not be parsed
    #[error("invalid duration '{0}'")]
    InvalidDuration(String),

    /// Console command is not recognized
    #[error("unknown console command '{input}'{}", did_you_mean(.suggestion.as_deref()))]
    UnknownCommand {
        /// The command word as typed
        input: String,
        /// Closest known command, if any is near enough
        suggestion: Option<String>,
    },

    /// Console command is missing a required argument
    #[error("console command '{command}' requires {argument}")]
    MissingArgument {
        /// Command word
        command: String,
        /// Description of the missing argument
        argument: String,
    },
}

fn did_you_mean(suggestion: Option<&str>) -> String {
    suggestion.map_or_else(String::new, |s| format!(", did you mean '{s}'?"))
}

// ============================================================================
// Host Errors
// ============================================================================

/// Errors raised by a host adapter while executing intents.
#[derive(Debug, Error)]
pub enum HostError {
    /// Writing intent output failed
    #[error("host output failed: {0}")]
    Output(#[from] std::io::Error),

    /// Intent could not be serialized
    #[error("intent serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

// ============================================================================
// Result Type Alias
// ============================================================================

/// Result type alias for `matchwarden` operations.
pub type Result<T> = std::result::Result<T, MatchWardenError>;

// ============================================================================
// Tests
// ============================================================================
