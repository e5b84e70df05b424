//! # HTTP Carrier Provider
//!
//! Adapter for carriers exposing a JSON rate API.
//!
//! # Wire format
//!
//! ```text
//! POST {base_url}/rates
//! { "destination": "AU", "weight_kg": "2", "actual_kg": "2", "volumetric_kg": "1.8" }
//!
//! 200 OK
//! { "rates": [ { "service": "Express", "amount": 1000, "surcharge": 120, "transit_days": 3 } ] }
//! ```
//!
//! Amounts are integer minor units. An optional bearer token is sent on
//! every request, and an optional `governor` quota caps the request rate.

use crate::domain::entities::package::BillableWeight;
use crate::domain::entities::rate_option::CarrierQuote;
use crate::domain::value_objects::{CountryCode, Money, ProviderId};
use crate::infrastructure::carriers::error::{CarrierError, CarrierResult};
use crate::infrastructure::carriers::traits::CarrierRateProvider;
use crate::infrastructure::http_client::HttpClient;
use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;
use std::sync::Arc;

/// Connection settings for one HTTP carrier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpCarrierConfig {
    /// Provider identifier.
    pub id: String,
    /// API root; `/rates` is appended.
    pub base_url: String,
    /// Bearer token, if the carrier requires one.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Maximum requests per second; unlimited when absent.
    #[serde(default)]
    pub requests_per_second: Option<NonZeroU32>,
}

fn default_timeout_ms() -> u64 {
    5000
}

#[derive(Debug, Serialize)]
struct RateRequest<'a> {
    destination: &'a str,
    weight_kg: Decimal,
    actual_kg: Decimal,
    volumetric_kg: Decimal,
}

#[derive(Debug, Deserialize)]
struct RateResponse {
    #[serde(default)]
    rates: Vec<RateEntry>,
}

#[derive(Debug, Deserialize)]
struct RateEntry {
    service: String,
    amount: i64,
    #[serde(default)]
    surcharge: i64,
    #[serde(default)]
    transit_days: Option<u32>,
}

impl RateEntry {
    fn into_quote(self) -> Option<CarrierQuote> {
        if self.service.trim().is_empty() {
            return None;
        }
        let quote = CarrierQuote::new(
            self.service,
            Money::from_minor(self.amount),
            Money::from_minor(self.surcharge),
        );
        Some(match self.transit_days {
            Some(days) => quote.with_estimated_days(days),
            None => quote,
        })
    }
}

/// A carrier reached over a JSON HTTP API.
pub struct HttpCarrierProvider {
    id: ProviderId,
    rates_url: String,
    client: HttpClient,
    limiter: Option<Arc<DefaultDirectRateLimiter>>,
}

impl HttpCarrierProvider {
    /// Creates a provider from its connection settings.
    ///
    /// # Errors
    ///
    /// Returns `CarrierError::InternalError` if the API key is not a valid
    /// header value or the HTTP client cannot be built.
    pub fn new(config: &HttpCarrierConfig) -> CarrierResult<Self> {
        let mut headers = HeaderMap::new();
        if let Some(key) = &config.api_key {
            let value = HeaderValue::from_str(&format!("Bearer {key}"))
                .map_err(|e| CarrierError::internal_error(format!("invalid API key: {e}")))?;
            headers.insert(AUTHORIZATION, value);
        }
        let client = HttpClient::with_headers(config.timeout_ms, headers)?;
        let limiter = config
            .requests_per_second
            .map(|rate| Arc::new(RateLimiter::direct(Quota::per_second(rate))));

        Ok(Self {
            id: ProviderId::new(config.id.clone()),
            rates_url: format!("{}/rates", config.base_url.trim_end_matches('/')),
            client,
            limiter,
        })
    }

    /// Returns true if a request quota is configured.
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        self.limiter.is_some()
    }
}

impl fmt::Debug for HttpCarrierProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpCarrierProvider")
            .field("id", &self.id)
            .field("rates_url", &self.rates_url)
            .field("rate_limited", &self.limiter.is_some())
            .finish()
    }
}

#[async_trait]
impl CarrierRateProvider for HttpCarrierProvider {
    fn provider_id(&self) -> &ProviderId {
        &self.id
    }

    fn timeout_ms(&self) -> Option<u64> {
        Some(self.client.timeout_ms())
    }

    async fn quote(
        &self,
        destination: &CountryCode,
        weight: &BillableWeight,
    ) -> CarrierResult<Vec<CarrierQuote>> {
        // Waiting here counts against the aggregator deadline.
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }

        let request = RateRequest {
            destination: destination.as_str(),
            weight_kg: weight.billable_kg(),
            actual_kg: weight.actual_kg(),
            volumetric_kg: weight.volumetric_kg(),
        };
        let response: RateResponse = self.client.post(&self.rates_url, &request).await?;

        let quotes: Vec<CarrierQuote> = response
            .rates
            .into_iter()
            .filter_map(RateEntry::into_quote)
            .collect();
        tracing::debug!(provider = %self.id, count = quotes.len(), "carrier rates received");
        Ok(quotes)
    }
}
