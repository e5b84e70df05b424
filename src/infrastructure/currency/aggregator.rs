//! # Aggregator Source
//!
//! General-purpose exchange-rate feed (open.er-api.com shape), consulted
//! after the central bank.
//!
//! ```text
//! GET {base_url}/latest/USD
//! { "result": "success", "time_last_update_unix": 1714608000, "rates": { "CNY": 7.24 } }
//! ```

use crate::domain::value_objects::Timestamp;
use crate::infrastructure::currency::traits::{
    CurrencyError, CurrencyResult, CurrencySource, FetchedRate,
};
use crate::infrastructure::http_client::{HttpClient, HttpResult};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;

/// Default public endpoint.
pub const DEFAULT_AGGREGATOR_URL: &str = "https://open.er-api.com/v6";

#[derive(Debug, Deserialize)]
struct LatestResponse {
    result: String,
    #[serde(default, rename = "error-type")]
    error_type: Option<String>,
    #[serde(default)]
    time_last_update_unix: Option<i64>,
    #[serde(default)]
    rates: HashMap<String, Decimal>,
}

/// Secondary exchange-rate feed.
#[derive(Debug, Clone)]
pub struct AggregatorSource {
    base_url: String,
    client: HttpClient,
}

impl AggregatorSource {
    /// Creates a source for the given API root.
    ///
    /// # Errors
    ///
    /// Returns an `HttpError` if the client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout_ms: u64) -> HttpResult<Self> {
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: HttpClient::new(timeout_ms)?,
        })
    }
}

#[async_trait]
impl CurrencySource for AggregatorSource {
    fn name(&self) -> &str {
        "aggregator"
    }

    async fn fetch_rate(&self, base: &str, target: &str) -> CurrencyResult<FetchedRate> {
        let url = format!("{}/latest/{base}", self.base_url);
        let response: LatestResponse = self.client.get(&url).await?;

        if response.result != "success" {
            return Err(CurrencyError::Rejected(
                response.error_type.unwrap_or(response.result),
            ));
        }

        let rate = response
            .rates
            .get(target)
            .copied()
            .ok_or_else(|| CurrencyError::MissingRate {
                target: target.to_string(),
            })?;
        let as_of = response
            .time_last_update_unix
            .and_then(Timestamp::from_secs)
            .unwrap_or_else(Timestamp::now);

        Ok(FetchedRate { rate, as_of })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn parses_rate_and_update_time() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/latest/USD"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "result": "success",
                "time_last_update_unix": 1714608000,
                "rates": {"CNY": "7.24"}
            })))
            .mount(&server)
            .await;

        let source = AggregatorSource::new(server.uri(), 2000).unwrap();
        let fetched = source.fetch_rate("USD", "CNY").await.unwrap();
        assert_eq!(fetched.rate, Decimal::new(724, 2));
        assert_eq!(fetched.as_of.timestamp_secs(), 1_714_608_000);
    }

    #[tokio::test]
    async fn error_payload_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "result": "error", "error-type": "unsupported-code"
            })))
            .mount(&server)
            .await;

        let source = AggregatorSource::new(server.uri(), 2000).unwrap();
        let err = source.fetch_rate("XXX", "CNY").await.unwrap_err();
        assert!(matches!(err, CurrencyError::Rejected(ref reason) if reason == "unsupported-code"));
    }

    #[tokio::test]
    async fn server_error_is_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let source = AggregatorSource::new(server.uri(), 2000).unwrap();
        let err = source.fetch_rate("USD", "CNY").await.unwrap_err();
        assert!(matches!(err, CurrencyError::Http(_)));
    }
}
