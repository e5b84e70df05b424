//! # Central Bank Source
//!
//! Reference rates from a Frankfurter-compatible feed (ECB data).
//!
//! ```text
//! GET {base_url}/latest?from=USD&to=CNY
//! { "amount": 1.0, "base": "USD", "date": "2024-05-02", "rates": { "CNY": 7.2391 } }
//! ```

use crate::domain::value_objects::Timestamp;
use crate::infrastructure::currency::traits::{
    CurrencyError, CurrencyResult, CurrencySource, FetchedRate,
};
use crate::infrastructure::http_client::{HttpClient, HttpResult};
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;

/// Default public endpoint.
pub const DEFAULT_CENTRAL_BANK_URL: &str = "https://api.frankfurter.app";

#[derive(Debug, Deserialize)]
struct LatestResponse {
    #[serde(default)]
    date: Option<String>,
    rates: HashMap<String, Decimal>,
}

/// Authoritative reference-rate feed, consulted first.
#[derive(Debug, Clone)]
pub struct CentralBankSource {
    base_url: String,
    client: HttpClient,
}

impl CentralBankSource {
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
impl CurrencySource for CentralBankSource {
    fn name(&self) -> &str {
        "central-bank"
    }

    async fn fetch_rate(&self, base: &str, target: &str) -> CurrencyResult<FetchedRate> {
        let url = format!("{}/latest", self.base_url);
        let response: LatestResponse = self
            .client
            .get_with_params(&url, &[("from", base), ("to", target)])
            .await?;

        let rate = response
            .rates
            .get(target)
            .copied()
            .ok_or_else(|| CurrencyError::MissingRate {
                target: target.to_string(),
            })?;

        // Published at end of business day; midnight UTC is close enough.
        let as_of = response
            .date
            .as_deref()
            .and_then(|date| NaiveDate::parse_from_str(date, "%Y-%m-%d").ok())
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|datetime| Timestamp::from_datetime(datetime.and_utc()))
            .unwrap_or_else(Timestamp::now);

        Ok(FetchedRate { rate, as_of })
    }
}
