//! # HTTP Duty Estimator
//!
//! Secondary duty source: a remote estimation service consulted when the
//! official table has no record.
//!
//! ```text
//! POST {base_url}/estimate
//! { "hs_code": "610910", "destination": "GB", "kind": "IMPORT_DUTY" }
//!
//! 200 OK   { "rate_percent": "12" }
//! 404      no estimate for this code
//! ```

use crate::domain::value_objects::{LevyKind, RateSource};
use crate::infrastructure::duty::traits::{
    DutyQuery, DutyRateRecord, DutyRateSource, DutySourceError, DutySourceResult,
};
use crate::infrastructure::http_client::{HttpClient, HttpError, HttpResult};
use async_trait::async_trait;
use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct EstimateRequest<'a> {
    hs_code: &'a str,
    destination: &'a str,
    kind: LevyKind,
}

#[derive(Debug, Deserialize)]
struct EstimateResponse {
    rate_percent: Decimal,
}

/// Remote duty estimation service.
#[derive(Debug, Clone)]
pub struct HttpDutyEstimator {
    estimate_url: String,
    client: HttpClient,
}

impl HttpDutyEstimator {
    /// Creates an estimator for the given API root.
    ///
    /// # Errors
    ///
    /// Returns an `HttpError` if the client cannot be built.
    pub fn new(base_url: &str, timeout_ms: u64) -> HttpResult<Self> {
        Ok(Self {
            estimate_url: format!("{}/estimate", base_url.trim_end_matches('/')),
            client: HttpClient::new(timeout_ms)?,
        })
    }
}

#[async_trait]
impl DutyRateSource for HttpDutyEstimator {
    fn name(&self) -> &str {
        "duty-estimator"
    }

    async fn lookup_duty_rate(
        &self,
        query: DutyQuery<'_>,
    ) -> DutySourceResult<Option<DutyRateRecord>> {
        let request = EstimateRequest {
            hs_code: query.hs_code.as_str(),
            destination: query.destination.as_str(),
            kind: query.kind,
        };

        let response: EstimateResponse = match self.client.post(&self.estimate_url, &request).await {
            Ok(response) => response,
            Err(HttpError::Status {
                status: StatusCode::NOT_FOUND,
                ..
            }) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if response.rate_percent.is_sign_negative() {
            return Err(DutySourceError::InvalidRate(response.rate_percent.to_string()));
        }

        Ok(Some(DutyRateRecord {
            hs_code: query.hs_code.as_str().to_string(),
            base_rate_percent: response.rate_percent,
            source: RateSource::Estimated,
        }))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{CountryCode, HsCode};
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn lookup(estimator: &HttpDutyEstimator) -> DutySourceResult<Option<DutyRateRecord>> {
        let hs = HsCode::canonicalize("6109.10", 6).unwrap();
        let destination = CountryCode::new("GB").unwrap();
        estimator
            .lookup_duty_rate(DutyQuery {
                hs_code: &hs,
                destination: &destination,
                kind: LevyKind::ImportDuty,
            })
            .await
    }

    #[tokio::test]
    async fn returns_estimated_record() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/estimate"))
            .and(body_json(serde_json::json!({
                "hs_code": "610910", "destination": "GB", "kind": "IMPORT_DUTY"
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"rate_percent": "12"})),
            )
            .mount(&server)
            .await;

        let estimator = HttpDutyEstimator::new(&server.uri(), 2000).unwrap();
        let record = lookup(&estimator).await.unwrap().unwrap();
        assert_eq!(record.base_rate_percent, Decimal::from(12));
        assert_eq!(record.source, RateSource::Estimated);
    }

    #[tokio::test]
    async fn not_found_is_a_miss() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let estimator = HttpDutyEstimator::new(&server.uri(), 2000).unwrap();
        assert!(lookup(&estimator).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn negative_rate_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"rate_percent": "-1"})),
            )
            .mount(&server)
            .await;

        let estimator = HttpDutyEstimator::new(&server.uri(), 2000).unwrap();
        assert!(matches!(
            lookup(&estimator).await,
            Err(DutySourceError::InvalidRate(_))
        ));
    }

    #[tokio::test]
    async fn outage_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let estimator = HttpDutyEstimator::new(&server.uri(), 2000).unwrap();
        assert!(matches!(lookup(&estimator).await, Err(DutySourceError::Http(_))));
    }
}
