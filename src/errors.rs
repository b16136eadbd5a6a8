/*!
 * Error types for the clipkeep application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when working with a clipboard store
#[derive(Error, Debug)]
pub enum StoreError {
    /// The requested item does not exist
    #[error("Clipboard item not found: {0}")]
    NotFound(i64),

    /// Error raised by the storage backend itself
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Errors that can occur in the service registry
#[derive(Error, Debug)]
pub enum RegistryError {
    /// A service failed to initialize
    #[error("Service '{name}' failed to initialize: {message}")]
    InitializationFailed {
        /// Registered service name
        name: String,
        /// Failure reported by the service
        message: String,
    },

    /// A health check reported a problem
    #[error("Health check failed for '{name}': {message}")]
    Unhealthy {
        /// Registered service name
        name: String,
        /// Failure reported by the service
        message: String,
    },
}

/// Errors that can occur while routing a gateway command
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Channel name is not routed by the gateway
    #[error("Unknown channel: {0}")]
    UnknownChannel(String),

    /// Payload does not match the channel's expected shape
    #[error("Invalid payload for '{channel}': {message}")]
    InvalidPayload {
        /// Channel the payload was sent to
        channel: String,
        /// Deserialization failure
        message: String,
    },

    /// Error from the clipboard store
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Errors raised while bringing the backend up
#[derive(Error, Debug)]
pub enum AppError {
    /// The configuration failed validation
    #[error("Configuration error: {0}")]
    Config(String),

    /// The clipboard store could not be opened
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl From<anyhow::Error> for StoreError {
    fn from(error: anyhow::Error) -> Self {
        Self::Backend(format!("{:#}", error))
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(error: rusqlite::Error) -> Self {
        Self::Backend(error.to_string())
    }
}
