//! Unified error types for zepower
//!
//! This module defines all error types used throughout the application.
//! Uses thiserror for ergonomic error definitions.

use crate::sysman::ffi::ZeResult;
use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from Sysman operations
    #[error("Sysman error: {0}")]
    Sysman(#[from] SysmanError),

    /// Discovery could not run to completion
    #[error("Discovery failed: {0}")]
    Discovery(#[from] DiscoveryError),

    /// Error from configuration parsing/validation
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Failed to install the Ctrl-C handler
    #[error("Failed to set signal handler: {0}")]
    Signal(#[from] ctrlc::Error),

    /// IO error (console and file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from the Level Zero Sysman interface
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SysmanError {
    /// The Level Zero loader library could not be opened
    #[error("Level Zero loader not found. Is the GPU driver installed?")]
    LibraryNotFound,

    /// The loader is present but lacks an entry point we need
    #[error("Function not available: {0}")]
    MissingSymbol(String),

    /// A Sysman call returned a non-success status
    #[error("Error in {function}: {code}")]
    Call {
        function: &'static str,
        code: ZeResult,
    },
}

impl SysmanError {
    /// Build a call error for the named entry point
    pub fn call(function: &'static str, code: ZeResult) -> Self {
        SysmanError::Call { function, code }
    }
}

/// Failures that abort device discovery as a whole
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryError {
    /// zesInit (or loading the interface) failed
    #[error("Sysman initialization failed: {0}")]
    SubsystemInitFailed(SysmanError),

    /// Driver enumeration failed or returned nothing
    #[error("No Level Zero drivers found")]
    NoDriversFound,

    /// Discovery ran but no device exposed a readable power domain
    #[error("No devices found or initialization failed")]
    NoDevicesFound,
}

/// Errors from configuration parsing and validation
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file not found
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// Invalid config value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
