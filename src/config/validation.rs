//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (limits > 0, max-age >= -1)
//! - Reject CORS combinations browsers refuse (wildcard origin with credentials)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::RouterConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: '{value}' is not a socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("cors.allowed_origins must not be empty")]
    NoAllowedOrigins,

    #[error("cors.allow_credentials cannot be combined with a '*' origin")]
    WildcardWithCredentials,

    #[error("cors.max_age_secs must be -1 or greater, got {0}")]
    InvalidMaxAge(i64),

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("{field}: TLS {which} path is empty")]
    EmptyTlsPath { field: &'static str, which: &'static str },
}

/// Checks every rule and returns all violations.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }
    if let Some(tls) = &config.listener.tls {
        if tls.cert_path.trim().is_empty() {
            errors.push(ValidationError::EmptyTlsPath {
                field: "listener.tls",
                which: "certificate",
            });
        }
        if tls.key_path.trim().is_empty() {
            errors.push(ValidationError::EmptyTlsPath {
                field: "listener.tls",
                which: "key",
            });
        }
    }

    let cors = &config.cors;
    if cors.allowed_origins.is_empty() {
        errors.push(ValidationError::NoAllowedOrigins);
    }
    if cors.allow_credentials && cors.allowed_origins.iter().any(|o| o.trim() == "*") {
        errors.push(ValidationError::WildcardWithCredentials);
    }
    if cors.max_age_secs < -1 {
        errors.push(ValidationError::InvalidMaxAge(cors.max_age_secs));
    }

    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::Zero("limits.max_body_bytes"));
    }
    if config.limits.max_uri_length == 0 {
        errors.push(ValidationError::Zero("limits.max_uri_length"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.request_secs"));
    }

    let observability = &config.observability;
    if observability.metrics_enabled
        && observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
