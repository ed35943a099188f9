use std::fmt;
use thiserror::Error;

/// The base error type for all Eximbay testbed errors.
///
/// Feature crates extend this by implementing `From<SpecificError> for EximbayError`.
#[derive(Error, Debug)]
pub enum EximbayError {
    /// The gateway could not be reached (connection refused, TLS, DNS, ...)
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// The gateway did not answer within the configured timeout
    #[error("Timeout: {0}")]
    TimeoutError(String),

    /// Error occurred while parsing or serializing data
    #[error("Failed to parse data: {0}")]
    ParseError(String),

    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error occurred during input validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// The gateway answered but rejected the request
    #[error("External service error: {service_name} - {message}")]
    ExternalServiceError {
        service_name: String,
        message: String,
    },

    /// Error occurred due to an internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for EximbayError {
    fn status_code(&self) -> u16 {
        match self {
            EximbayError::HttpError(_) => 502,
            EximbayError::TimeoutError(_) => 504,
            EximbayError::ParseError(_) => 400,
            EximbayError::ConfigError(_) => 500,
            EximbayError::ValidationError(_) => 400,
            EximbayError::ExternalServiceError { .. } => 502,
            EximbayError::InternalError(_) => 500,
        }
    }
}

impl From<serde_json::Error> for EximbayError {
    fn from(err: serde_json::Error) -> Self {
        EximbayError::ParseError(err.to_string())
    }
}

// Utility functions for error handling
pub fn config_error<T: fmt::Display>(message: T) -> EximbayError {
    EximbayError::ConfigError(message.to_string())
}

pub fn validation_error<T: fmt::Display>(message: T) -> EximbayError {
    EximbayError::ValidationError(message.to_string())
}

pub fn external_service_error<T: fmt::Display>(service_name: &str, message: T) -> EximbayError {
    EximbayError::ExternalServiceError {
        service_name: service_name.to_string(),
        message: message.to_string(),
    }
}

pub fn internal_error<T: fmt::Display>(message: T) -> EximbayError {
    EximbayError::InternalError(message.to_string())
}
