//! # Destination Defaults
//!
//! Destination-level default percents, the last step of the duty chain.

use crate::domain::value_objects::{CountryCode, LevyKind};
use crate::infrastructure::duty::traits::{DefaultPercentSource, DutySourceResult};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A configured default for one destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationDefault {
    /// Importing country.
    pub destination: CountryCode,
    /// Default duty percent, when the destination levies duty.
    #[serde(default)]
    pub duty_percent: Option<Decimal>,
    /// Default VAT percent, when the destination levies VAT.
    #[serde(default)]
    pub vat_percent: Option<Decimal>,
}

/// Default percents keyed by destination.
#[derive(Debug, Clone, Default)]
pub struct DestinationDefaults {
    defaults: HashMap<CountryCode, DestinationDefault>,
}

impl DestinationDefaults {
    /// Creates the table; later entries for the same destination win.
    #[must_use]
    pub fn new(defaults: impl IntoIterator<Item = DestinationDefault>) -> Self {
        Self {
            defaults: defaults
                .into_iter()
                .map(|entry| (entry.destination.clone(), entry))
                .collect(),
        }
    }

    fn lookup(&self, destination: &CountryCode, kind: LevyKind) -> Option<Decimal> {
        let entry = self.defaults.get(destination)?;
        match kind {
            LevyKind::ImportDuty => entry.duty_percent,
            LevyKind::Vat => entry.vat_percent,
            LevyKind::NotApplicable => None,
        }
    }
}

#[async_trait]
impl DefaultPercentSource for DestinationDefaults {
    async fn default_percent(
        &self,
        destination: &CountryCode,
        kind: LevyKind,
    ) -> DutySourceResult<Option<Decimal>> {
        Ok(self.lookup(destination, kind))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_percent_for_requested_kind() {
        let gb = CountryCode::new("GB").unwrap();
        let defaults = DestinationDefaults::new([DestinationDefault {
            destination: gb.clone(),
            duty_percent: Some(Decimal::from(4)),
            vat_percent: Some(Decimal::from(20)),
        }]);

        assert_eq!(
            defaults.default_percent(&gb, LevyKind::Vat).await.unwrap(),
            Some(Decimal::from(20))
        );
        assert_eq!(
            defaults.default_percent(&gb, LevyKind::ImportDuty).await.unwrap(),
            Some(Decimal::from(4))
        );
    }

    #[tokio::test]
    async fn unknown_destination_has_no_default() {
        let defaults = DestinationDefaults::default();
        let fr = CountryCode::new("FR").unwrap();
        assert!(defaults.default_percent(&fr, LevyKind::Vat).await.unwrap().is_none());
    }
}
