//! # Engine Wiring
//!
//! Builds a [`LandedCostEngine`] from [`Settings`]: carrier adapters,
//! currency feeds, the duty chain and the policy store.

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::{
    CheapestFirstStrategy, CurrencyRateCache, DutyTaxEstimator, FastestFirstStrategy,
    InsuranceCalculator, LandedCostEngine, MultiplierResolver, RankingStrategy, RateAggregator,
    ServiceRestrictions,
};
use crate::config::{CarrierSettings, RankingChoice, Settings};
use crate::infrastructure::carriers::{CarrierRateProvider, HttpCarrierProvider, TableCarrierProvider};
use crate::infrastructure::currency::{AggregatorSource, CentralBankSource, CurrencySource};
use crate::infrastructure::duty::{
    DestinationDefaults, DutyRateSource, HttpDutyEstimator, InMemoryTariffTable,
};
use crate::infrastructure::persistence::InMemoryPolicyStore;
use std::sync::Arc;

impl LandedCostEngine {
    /// Validates `settings` and wires every component.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` if the settings are invalid
    /// or an HTTP adapter cannot be built.
    pub fn from_settings(settings: &Settings) -> ApplicationResult<Self> {
        settings.validate()?;

        let store = Arc::new(
            InMemoryPolicyStore::with_policies(
                settings.multipliers.tiers()?,
                settings.insurance.ranges()?,
            )
            .map_err(|e| ApplicationError::configuration(format!("policy store: {e}")))?,
        );

        let aggregator = RateAggregator::new(
            build_carriers(&settings.carriers)?,
            ranking_strategy(settings.ranking),
            settings.engine.aggregation(),
        )
        .with_restrictions(build_restrictions(settings));

        let currency = CurrencyRateCache::new(
            build_currency_sources(settings)?,
            settings.currency.cache(),
        );

        let duty = DutyTaxEstimator::new(
            build_duty_sources(settings)?,
            Arc::new(DestinationDefaults::new(
                settings.duty.destination_defaults.iter().cloned(),
            )),
            settings.duty.policy(),
        );

        tracing::info!(
            carriers = aggregator.provider_count(),
            ranking = aggregator.ranking_strategy_name(),
            base = %settings.currency.base,
            target = %settings.currency.target,
            "landed cost engine ready"
        );

        Ok(Self::new(
            MultiplierResolver::new(store.clone()),
            Arc::new(aggregator),
            InsuranceCalculator::new(store, settings.insurance.formula()),
            duty,
            Arc::new(currency),
            settings.engine.engine(),
        ))
    }
}

fn ranking_strategy(choice: RankingChoice) -> Arc<dyn RankingStrategy> {
    match choice {
        RankingChoice::Cheapest => Arc::new(CheapestFirstStrategy),
        RankingChoice::Fastest => Arc::new(FastestFirstStrategy),
    }
}

fn build_carriers(carriers: &[CarrierSettings]) -> ApplicationResult<Vec<Arc<dyn CarrierRateProvider>>> {
    carriers
        .iter()
        .map(|carrier| -> ApplicationResult<Arc<dyn CarrierRateProvider>> {
            match carrier {
                CarrierSettings::Http(config) => {
                    let provider = HttpCarrierProvider::new(config).map_err(|e| {
                        ApplicationError::configuration(format!("carrier {}: {e}", config.id))
                    })?;
                    Ok(Arc::new(provider))
                }
                CarrierSettings::Table(config) => {
                    Ok(Arc::new(TableCarrierProvider::new(config.clone())))
                }
            }
        })
        .collect()
}

fn build_restrictions(settings: &Settings) -> ServiceRestrictions {
    settings
        .service_restrictions
        .iter()
        .flat_map(|rule| {
            rule.services
                .iter()
                .map(move |service| (rule.destination.clone(), service.as_str()))
        })
        .fold(ServiceRestrictions::new(), |restrictions, (destination, service)| {
            restrictions.block(destination, service)
        })
}

fn build_currency_sources(settings: &Settings) -> ApplicationResult<Vec<Arc<dyn CurrencySource>>> {
    let currency = &settings.currency;
    let mut sources: Vec<Arc<dyn CurrencySource>> = Vec::new();

    if let Some(url) = &currency.central_bank_url {
        let source = CentralBankSource::new(url.as_str(), currency.timeout_ms)
            .map_err(|e| ApplicationError::configuration(format!("central bank feed: {e}")))?;
        sources.push(Arc::new(source));
    }
    if let Some(url) = &currency.aggregator_url {
        let source = AggregatorSource::new(url.as_str(), currency.timeout_ms)
            .map_err(|e| ApplicationError::configuration(format!("aggregator feed: {e}")))?;
        sources.push(Arc::new(source));
    }

    if sources.is_empty() {
        tracing::warn!("no currency feeds configured, every quote will use the fallback rate");
    }
    Ok(sources)
}

fn build_duty_sources(settings: &Settings) -> ApplicationResult<Vec<Arc<dyn DutyRateSource>>> {
    let duty = &settings.duty;
    let mut sources: Vec<Arc<dyn DutyRateSource>> = vec![Arc::new(
        InMemoryTariffTable::from_entries(duty.tariffs.iter().cloned()),
    )];

    if let Some(url) = &duty.estimator_url {
        let estimator = HttpDutyEstimator::new(url, duty.timeout_ms)
            .map_err(|e| ApplicationError::configuration(format!("duty estimator: {e}")))?;
        sources.push(Arc::new(estimator));
    }
    Ok(sources)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::application::services::LandedCostRequest;
    use crate::config::{CountryMultiplier, InsuranceBand, MultiplierSettings, ServiceRestriction};
    use crate::domain::entities::package::PackageDimensions;
    use crate::domain::value_objects::{CountryCode, Money, MultiplierTierKind};
    use crate::infrastructure::carriers::{TableCarrierConfig, TableService};
    use rust_decimal::Decimal;

    fn au() -> CountryCode {
        CountryCode::new("AU").unwrap()
    }

    fn settings() -> Settings {
        let mut settings = Settings {
            multipliers: MultiplierSettings {
                global_default: Some(Decimal::ONE),
                countries: vec![CountryMultiplier {
                    country: au(),
                    factor: Decimal::new(125, 2),
                    active: true,
                }],
                ..MultiplierSettings::default()
            },
            carriers: vec![CarrierSettings::Table(TableCarrierConfig {
                id: "postal".to_string(),
                services: vec![
                    TableService {
                        name: "Economy".to_string(),
                        base_fee: Money::from_minor(1000),
                        per_kg: Money::ZERO,
                        surcharge_percent: Decimal::ZERO,
                        estimated_days: Some(10),
                        destinations: vec![],
                        max_weight_kg: None,
                    },
                    TableService {
                        name: "Courier".to_string(),
                        base_fee: Money::from_minor(3000),
                        per_kg: Money::ZERO,
                        surcharge_percent: Decimal::ZERO,
                        estimated_days: Some(3),
                        destinations: vec![],
                        max_weight_kg: None,
                    },
                ],
            })],
            service_restrictions: vec![ServiceRestriction {
                destination: au(),
                services: vec![" COURIER ".to_string()],
            }],
            ..Settings::default()
        };
        settings.insurance.ranges = vec![InsuranceBand {
            min: Money::from_minor(5000),
            max: Money::from_minor(15_000),
            premium: Money::from_minor(300),
        }];
        settings.currency.central_bank_url = None;
        settings.currency.aggregator_url = None;
        settings
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let mut invalid = settings();
        invalid.multipliers.global_default = None;
        let err = LandedCostEngine::from_settings(&invalid).unwrap_err();
        assert!(err.is_configuration());
    }

    #[tokio::test]
    async fn wired_engine_prices_with_configured_policies() {
        let engine = LandedCostEngine::from_settings(&settings()).unwrap();
        let dimensions = PackageDimensions::new(30.0, 20.0, 15.0, 2.0).unwrap();
        let request = LandedCostRequest::new(dimensions, au())
            .with_declared_value(Money::from_minor(10_000))
            .with_insurance();

        let breakdown = engine.quote(request).await.unwrap();

        assert_eq!(breakdown.multiplier.tier, MultiplierTierKind::Country);
        assert_eq!(breakdown.ranked_options.len(), 1);
        let best = breakdown.ranked_options.first().unwrap();
        assert_eq!(best.option.final_price(), Money::from_minor(1250));
        assert_eq!(best.insurance, Money::from_minor(300));
        assert!(breakdown.exchange.is_fallback());
    }
}
