//! # Table Carrier Provider
//!
//! A carrier priced from a configured flat tariff instead of a live API.
//!
//! ```text
//! base_price = round(base_fee + per_kg × billable_kg)
//! surcharge  = round(base_price × surcharge_percent / 100)
//! ```
//!
//! Useful for postal services that publish fixed rate cards, and as a
//! deterministic provider in tests.

use crate::domain::entities::package::BillableWeight;
use crate::domain::entities::rate_option::CarrierQuote;
use crate::domain::value_objects::arithmetic::{CheckedArithmetic, round_to_minor_units};
use crate::domain::value_objects::{CountryCode, Money, ProviderId};
use crate::infrastructure::carriers::error::{CarrierError, CarrierResult};
use crate::infrastructure::carriers::traits::CarrierRateProvider;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One service on a rate card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableService {
    /// Service name shown to the customer.
    pub name: String,
    /// Fixed fee per shipment, minor units.
    pub base_fee: Money,
    /// Fee per billable kilogram, minor units.
    pub per_kg: Money,
    /// Fuel or service surcharge as a percent of the base price.
    #[serde(default)]
    pub surcharge_percent: Decimal,
    /// Quoted transit time.
    #[serde(default)]
    pub estimated_days: Option<u32>,
    /// Destinations served; every destination when empty.
    #[serde(default)]
    pub destinations: Vec<CountryCode>,
    /// Heaviest billable weight accepted.
    #[serde(default)]
    pub max_weight_kg: Option<Decimal>,
}

impl TableService {
    fn serves(&self, destination: &CountryCode, billable_kg: Decimal) -> bool {
        let lane = self.destinations.is_empty() || self.destinations.contains(destination);
        let weight = self.max_weight_kg.is_none_or(|max| billable_kg <= max);
        lane && weight
    }

    fn price(&self, billable_kg: Decimal) -> CarrierResult<CarrierQuote> {
        let raw_base = self
            .per_kg
            .to_decimal()
            .safe_mul(billable_kg)
            .and_then(|weighted| weighted.safe_add(self.base_fee.to_decimal()))
            .map_err(|e| CarrierError::internal_error(e.to_string()))?;
        let base = Money::from_minor(
            round_to_minor_units(raw_base).map_err(|e| CarrierError::internal_error(e.to_string()))?,
        );
        let surcharge = base
            .percent(self.surcharge_percent)
            .map_err(|e| CarrierError::internal_error(e.to_string()))?;

        let quote = CarrierQuote::new(self.name.clone(), base, surcharge);
        Ok(match self.estimated_days {
            Some(days) => quote.with_estimated_days(days),
            None => quote,
        })
    }
}

/// Rate card configuration for one table carrier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCarrierConfig {
    /// Provider identifier.
    pub id: String,
    /// Services on the card.
    pub services: Vec<TableService>,
}

/// A carrier whose prices come from a rate card.
#[derive(Debug, Clone)]
pub struct TableCarrierProvider {
    id: ProviderId,
    services: Vec<TableService>,
}

impl TableCarrierProvider {
    /// Creates a provider from a rate card.
    #[must_use]
    pub fn new(config: TableCarrierConfig) -> Self {
        Self {
            id: ProviderId::new(config.id),
            services: config.services,
        }
    }
}

#[async_trait]
impl CarrierRateProvider for TableCarrierProvider {
    fn provider_id(&self) -> &ProviderId {
        &self.id
    }

    async fn quote(
        &self,
        destination: &CountryCode,
        weight: &BillableWeight,
    ) -> CarrierResult<Vec<CarrierQuote>> {
        let billable_kg = weight.billable_kg();
        let quotes = self
            .services
            .iter()
            .filter(|service| service.serves(destination, billable_kg))
            .map(|service| service.price(billable_kg))
            .collect::<CarrierResult<Vec<_>>>()?;

        if quotes.is_empty() {
            return Err(CarrierError::quote_unavailable(format!(
                "no service to {destination} at {billable_kg}kg"
            )));
        }
        Ok(quotes)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::domain::services::dimension_normalizer::normalize_raw;

    fn card() -> TableCarrierProvider {
        TableCarrierProvider::new(TableCarrierConfig {
            id: "post".to_string(),
            services: vec![
                TableService {
                    name: "Airmail".to_string(),
                    base_fee: Money::from_minor(500),
                    per_kg: Money::from_minor(250),
                    surcharge_percent: Decimal::TEN,
                    estimated_days: Some(9),
                    destinations: vec![],
                    max_weight_kg: Some(Decimal::from(20)),
                },
                TableService {
                    name: "Courier".to_string(),
                    base_fee: Money::from_minor(1500),
                    per_kg: Money::from_minor(400),
                    surcharge_percent: Decimal::ZERO,
                    estimated_days: Some(3),
                    destinations: vec![CountryCode::new("AU").unwrap()],
                    max_weight_kg: None,
                },
            ],
        })
    }

    #[tokio::test]
    async fn prices_every_serving_service() {
        let weight = normalize_raw(30.0, 20.0, 15.0, 2.0).unwrap();
        let quotes = card()
            .quote(&CountryCode::new("AU").unwrap(), &weight)
            .await
            .unwrap();

        assert_eq!(quotes.len(), 2);
        // 500 + 250 * 2 = 1000, surcharge 10% = 100
        assert_eq!(quotes[0].base_price(), Money::from_minor(1000));
        assert_eq!(quotes[0].surcharge(), Money::from_minor(100));
        assert_eq!(quotes[1].base_price(), Money::from_minor(2300));
    }

    #[tokio::test]
    async fn lane_restrictions_apply() {
        let weight = normalize_raw(30.0, 20.0, 15.0, 2.0).unwrap();
        let quotes = card()
            .quote(&CountryCode::new("NZ").unwrap(), &weight)
            .await
            .unwrap();
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].service_name(), "Airmail");
    }

    #[tokio::test]
    async fn nothing_serving_is_quote_unavailable() {
        let weight = normalize_raw(100.0, 100.0, 100.0, 30.0).unwrap();
        let err = card()
            .quote(&CountryCode::new("NZ").unwrap(), &weight)
            .await
            .unwrap_err();
        assert!(matches!(err, CarrierError::QuoteUnavailable { .. }));
    }
}
