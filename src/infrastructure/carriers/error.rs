//! # Carrier Errors
//!
//! Error types for carrier rate providers.
//!
//! Carrier errors never escape the rate aggregator: a failing provider is
//! logged, counted and dropped.
//!
//! # Examples
//!
//! ```
//! use landed_cost::infrastructure::carriers::error::CarrierError;
//!
//! let error = CarrierError::timeout("no answer after 3000ms");
//! assert!(error.is_retryable());
//!
//! let error = CarrierError::authentication("API key rejected");
//! assert!(!error.is_retryable());
//! ```

use crate::infrastructure::http_client::HttpError;
use reqwest::StatusCode;
use thiserror::Error;

/// Error type for carrier rate provider operations.
#[derive(Debug, Clone, Error)]
pub enum CarrierError {
    /// Request timed out.
    #[error("carrier timeout: {message}")]
    Timeout {
        /// Error message.
        message: String,
        /// Timeout duration in milliseconds.
        timeout_ms: Option<u64>,
    },

    /// Network or connection error.
    #[error("carrier connection error: {message}")]
    Connection {
        /// Error message.
        message: String,
    },

    /// Credentials rejected.
    #[error("carrier authentication error: {message}")]
    Authentication {
        /// Error message.
        message: String,
    },

    /// Rate limit exceeded.
    #[error("carrier rate limit exceeded: {message}")]
    RateLimited {
        /// Error message.
        message: String,
    },

    /// The carrier rejected the request parameters.
    #[error("carrier invalid request: {message}")]
    InvalidRequest {
        /// Error message.
        message: String,
    },

    /// The response could not be understood.
    #[error("carrier protocol error: {message}")]
    ProtocolError {
        /// Error message.
        message: String,
    },

    /// The carrier serves no rate for this lane or weight.
    #[error("carrier quote unavailable: {message}")]
    QuoteUnavailable {
        /// Error message.
        message: String,
    },

    /// Adapter-side failure.
    #[error("carrier internal error: {message}")]
    InternalError {
        /// Error message.
        message: String,
    },
}

impl CarrierError {
    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
            timeout_ms: None,
        }
    }

    /// Creates a timeout error with duration.
    #[must_use]
    pub fn timeout_with_duration(message: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            message: message.into(),
            timeout_ms: Some(timeout_ms),
        }
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates an authentication error.
    #[must_use]
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    /// Creates a rate limited error.
    #[must_use]
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::RateLimited {
            message: message.into(),
        }
    }

    /// Creates an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Creates a protocol error.
    #[must_use]
    pub fn protocol_error(message: impl Into<String>) -> Self {
        Self::ProtocolError {
            message: message.into(),
        }
    }

    /// Creates a quote unavailable error.
    #[must_use]
    pub fn quote_unavailable(message: impl Into<String>) -> Self {
        Self::QuoteUnavailable {
            message: message.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }

    /// Returns true if the failure is transient.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. } | Self::Connection { .. } | Self::RateLimited { .. }
        )
    }

    /// Returns true for timeouts, including the aggregator's own deadline.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

impl From<HttpError> for CarrierError {
    fn from(error: HttpError) -> Self {
        match error {
            HttpError::Timeout => Self::timeout("request timed out"),
            HttpError::Connection(message) => Self::connection(message),
            HttpError::Decode(message) => Self::protocol_error(message),
            HttpError::Build(message) => Self::internal_error(message),
            HttpError::Status { status, body } => match status {
                StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                    Self::invalid_request(format!("bad request: {body}"))
                }
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    Self::authentication(format!("authentication failed: {body}"))
                }
                StatusCode::NOT_FOUND => Self::quote_unavailable(format!("no rate: {body}")),
                StatusCode::TOO_MANY_REQUESTS => Self::rate_limited("rate limit exceeded"),
                status if status.is_server_error() => {
                    Self::connection(format!("server error ({status}): {body}"))
                }
                status => Self::protocol_error(format!("HTTP error ({status}): {body}")),
            },
        }
    }
}

/// Result type for carrier operations.
pub type CarrierResult<T> = Result<T, CarrierError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_is_retryable() {
        let error = CarrierError::timeout_with_duration("test", 3000);
        assert!(error.is_retryable());
        assert!(error.is_timeout());
    }

    #[test]
    fn authentication_is_not_retryable() {
        assert!(!CarrierError::authentication("test").is_retryable());
        assert!(!CarrierError::invalid_request("test").is_retryable());
    }

    #[test]
    fn status_codes_map_to_variants() {
        let unauthorized = CarrierError::from(HttpError::Status {
            status: StatusCode::UNAUTHORIZED,
            body: String::new(),
        });
        assert!(matches!(unauthorized, CarrierError::Authentication { .. }));

        let throttled = CarrierError::from(HttpError::Status {
            status: StatusCode::TOO_MANY_REQUESTS,
            body: String::new(),
        });
        assert!(matches!(throttled, CarrierError::RateLimited { .. }));

        let outage = CarrierError::from(HttpError::Status {
            status: StatusCode::BAD_GATEWAY,
            body: "upstream".to_string(),
        });
        assert!(outage.is_retryable());
    }

    #[test]
    fn decode_failure_is_protocol_error() {
        let error = CarrierError::from(HttpError::Decode("missing field".to_string()));
        assert!(matches!(error, CarrierError::ProtocolError { .. }));
    }

    #[test]
    fn display_format() {
        let display = CarrierError::quote_unavailable("no lane to NZ").to_string();
        assert!(display.contains("quote unavailable"));
        assert!(display.contains("no lane to NZ"));
    }
}
