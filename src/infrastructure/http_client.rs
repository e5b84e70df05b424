//! # HTTP Client
//!
//! Shared JSON-over-HTTP client for carrier, currency and duty adapters.
//!
//! Each adapter converts [`HttpError`] into its own error type, so the
//! mapping from transport failures and status codes lives in one place.
//!
//! # Examples
//!
//! ```ignore
//! use landed_cost::infrastructure::http_client::HttpClient;
//!
//! let client = HttpClient::new(5000)?;
//! let rates: RatesResponse = client.get_with_params(url, &[("from", "USD")]).await?;
//! ```

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

/// Transport-level failure of one HTTP exchange.
#[derive(Debug, Clone, Error)]
pub enum HttpError {
    /// The request did not complete within the client timeout.
    #[error("request timed out")]
    Timeout,

    /// The connection could not be established or was dropped.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The server answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status {
        /// The response status.
        status: StatusCode,
        /// The response body, possibly empty.
        body: String,
    },

    /// The body was not the expected JSON shape.
    #[error("failed to parse response: {0}")]
    Decode(String),

    /// The client could not be constructed.
    #[error("failed to create HTTP client: {0}")]
    Build(String),
}

impl HttpError {
    /// Returns the status code for status errors.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for HTTP exchanges.
pub type HttpResult<T> = Result<T, HttpError>;

/// Thin wrapper around `reqwest::Client` with a fixed timeout.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    timeout_ms: u64,
}

impl HttpClient {
    /// Creates a client with the given request timeout.
    ///
    /// # Errors
    ///
    /// Returns `HttpError::Build` if the TLS backend cannot be initialised.
    pub fn new(timeout_ms: u64) -> HttpResult<Self> {
        Self::with_headers(timeout_ms, reqwest::header::HeaderMap::new())
    }

    /// Creates a client that sends `default_headers` with every request.
    ///
    /// # Errors
    ///
    /// Returns `HttpError::Build` if the TLS backend cannot be initialised.
    pub fn with_headers(
        timeout_ms: u64,
        default_headers: reqwest::header::HeaderMap,
    ) -> HttpResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .default_headers(default_headers)
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;

        Ok(Self { client, timeout_ms })
    }

    /// Returns the configured timeout in milliseconds.
    #[inline]
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// GETs `url` and decodes the JSON body.
    ///
    /// # Errors
    ///
    /// Returns an `HttpError` on transport failure, non-success status or
    /// undecodable body.
    pub async fn get<T: DeserializeOwned>(&self, url: &str) -> HttpResult<T> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        handle_response(response).await
    }

    /// GETs `url` with query parameters and decodes the JSON body.
    ///
    /// # Errors
    ///
    /// Returns an `HttpError` on transport failure, non-success status or
    /// undecodable body.
    pub async fn get_with_params<T: DeserializeOwned, P: serde::Serialize + ?Sized>(
        &self,
        url: &str,
        params: &P,
    ) -> HttpResult<T> {
        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        handle_response(response).await
    }

    /// POSTs a JSON body to `url` and decodes the JSON response.
    ///
    /// # Errors
    ///
    /// Returns an `HttpError` on transport failure, non-success status or
    /// undecodable body.
    pub async fn post<T: DeserializeOwned, B: serde::Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> HttpResult<T> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        handle_response(response).await
    }
}

async fn handle_response<T: DeserializeOwned>(response: Response) -> HttpResult<T> {
    let status = response.status();

    if status.is_success() {
        response
            .json::<T>()
            .await
            .map_err(|e| HttpError::Decode(e.to_string()))
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(HttpError::Status { status, body })
    }
}

fn map_reqwest_error(error: reqwest::Error) -> HttpError {
    if error.is_timeout() {
        HttpError::Timeout
    } else if error.is_decode() {
        HttpError::Decode(error.to_string())
    } else {
        HttpError::Connection(error.to_string())
    }
}
