//! # In-Memory Tariff Table
//!
//! The official tariff schedule, loaded from configuration.
//!
//! Lookups try the canonical code first, then its 4-digit heading and
//! 2-digit chapter, so a schedule published at heading level still
//! answers for a 6-digit subheading.

use crate::domain::value_objects::{CountryCode, RateSource};
use crate::infrastructure::duty::traits::{
    DutyQuery, DutyRateRecord, DutyRateSource, DutySourceResult,
};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

const PREFIX_LENGTHS: [usize; 2] = [4, 2];

/// One row of the official schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TariffEntry {
    /// Importing country.
    pub destination: CountryCode,
    /// Digits-only classification, any length.
    pub hs_code: String,
    /// Percent of customs value.
    pub percent: Decimal,
}

type TariffKey = (CountryCode, String);

/// Official tariff rates held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTariffTable {
    storage: Arc<RwLock<HashMap<TariffKey, Decimal>>>,
}

impl InMemoryTariffTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table from schedule rows; later rows replace earlier ones.
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = TariffEntry>) -> Self {
        let map = entries
            .into_iter()
            .map(|entry| ((entry.destination, entry.hs_code), entry.percent))
            .collect();
        Self {
            storage: Arc::new(RwLock::new(map)),
        }
    }

    /// Adds or replaces a row.
    pub async fn upsert(&self, entry: TariffEntry) {
        let mut storage = self.storage.write().await;
        storage.insert((entry.destination, entry.hs_code), entry.percent);
    }

    /// Returns the number of rows.
    pub async fn len(&self) -> usize {
        self.storage.read().await.len()
    }

    /// Returns true if the table has no rows.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl DutyRateSource for InMemoryTariffTable {
    fn name(&self) -> &str {
        "official-tariff"
    }

    async fn lookup_duty_rate(
        &self,
        query: DutyQuery<'_>,
    ) -> DutySourceResult<Option<DutyRateRecord>> {
        let storage = self.storage.read().await;
        let code = query.hs_code.as_str();

        let candidates = std::iter::once(code).chain(
            PREFIX_LENGTHS
                .iter()
                .filter(|len| **len < code.len())
                .filter_map(|len| code.get(..*len)),
        );

        for candidate in candidates {
            let key = (query.destination.clone(), candidate.to_string());
            if let Some(percent) = storage.get(&key) {
                return Ok(Some(DutyRateRecord {
                    hs_code: candidate.to_string(),
                    base_rate_percent: *percent,
                    source: RateSource::Official,
                }));
            }
        }
        Ok(None)
    }
}
