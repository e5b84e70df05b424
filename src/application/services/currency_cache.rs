//! # Currency Rate Cache
//!
//! Holds one exchange-rate quote with a fixed time-to-live and refreshes
//! it from an ordered list of feeds.
//!
//! # Concurrency
//!
//! The current quote sits behind a `parking_lot::RwLock` and is swapped
//! whole, so readers see either the old quote or the new one. Refreshes
//! are serialized by an async mutex. Every finished sweep bumps a
//! generation counter; a caller that queued behind a sweep sees the bump
//! and takes that sweep's result instead of starting another. Concurrent
//! misses therefore cost one outbound sweep.
//!
//! # Fallback
//!
//! If every feed fails, callers get a fixed conservative quote tagged
//! `fallback`. It is not cached as fresh; the next miss tries the feeds
//! again.

use crate::domain::entities::currency_quote::CurrencyQuote;
use crate::infrastructure::currency::{CurrencyError, CurrencySource};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Default quote lifetime.
pub const DEFAULT_TTL_SECS: u64 = 3600;

/// Cache parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyCacheConfig {
    /// Base currency code.
    pub base: String,
    /// Display currency code.
    pub target: String,
    /// Quote lifetime in seconds.
    pub ttl_secs: u64,
    /// Rate served when every feed fails.
    pub fallback_rate: Decimal,
}

impl Default for CurrencyCacheConfig {
    fn default() -> Self {
        Self {
            base: "USD".to_string(),
            target: "CNY".to_string(),
            ttl_secs: DEFAULT_TTL_SECS,
            fallback_rate: Decimal::new(720, 2),
        }
    }
}

#[derive(Debug, Default)]
struct CacheState {
    current: Option<(CurrencyQuote, Instant)>,
    last_sweep: Option<CurrencyQuote>,
    generation: u64,
}

/// Single-flight exchange-rate cache.
#[derive(Debug)]
pub struct CurrencyRateCache {
    sources: Vec<Arc<dyn CurrencySource>>,
    config: CurrencyCacheConfig,
    state: RwLock<CacheState>,
    refresh_lock: Mutex<()>,
}

impl CurrencyRateCache {
    /// Creates an empty cache. `sources` are tried in order.
    #[must_use]
    pub fn new(sources: Vec<Arc<dyn CurrencySource>>, config: CurrencyCacheConfig) -> Self {
        Self {
            sources,
            config,
            state: RwLock::new(CacheState::default()),
            refresh_lock: Mutex::new(()),
        }
    }

    /// Returns the cache parameters.
    #[must_use]
    pub fn config(&self) -> &CurrencyCacheConfig {
        &self.config
    }

    /// Returns the current quote, refreshing it if it has expired.
    ///
    /// Never fails; see the module docs for the fallback.
    pub async fn get(&self) -> CurrencyQuote {
        if let Some(quote) = self.fresh() {
            return quote;
        }

        let observed = self.state.read().generation;
        let _guard = self.refresh_lock.lock().await;

        {
            let state = self.state.read();
            if state.generation != observed
                && let Some(quote) = &state.last_sweep
            {
                return quote.clone();
            }
        }
        if let Some(quote) = self.fresh() {
            return quote;
        }

        let swept = self.sweep().await;
        let mut state = self.state.write();
        state.generation = state.generation.wrapping_add(1);
        state.last_sweep = Some(swept.clone());
        if !swept.is_fallback() {
            state.current = Some((swept.clone(), Instant::now()));
        }
        swept
    }

    /// Drops the cached quote so the next `get` refreshes.
    pub fn invalidate(&self) {
        let mut state = self.state.write();
        state.current = None;
        tracing::info!("currency cache invalidated");
    }

    /// Returns the cached quote if it is still within its TTL.
    #[must_use]
    pub fn fresh(&self) -> Option<CurrencyQuote> {
        let ttl = Duration::from_secs(self.config.ttl_secs);
        let state = self.state.read();
        state
            .current
            .as_ref()
            .filter(|(_, stored_at)| stored_at.elapsed() < ttl)
            .map(|(quote, _)| quote.clone())
    }

    /// Tries every feed in order; the first positive rate wins.
    async fn sweep(&self) -> CurrencyQuote {
        let base = &self.config.base;
        let target = &self.config.target;

        for source in &self.sources {
            let result = source
                .fetch_rate(base, target)
                .await
                .and_then(|fetched| {
                    if fetched.rate > Decimal::ZERO {
                        Ok(fetched)
                    } else {
                        Err(CurrencyError::NonPositiveRate(fetched.rate))
                    }
                });

            match result {
                Ok(fetched) => {
                    tracing::info!(
                        source = source.name(),
                        rate = %fetched.rate,
                        as_of = %fetched.as_of,
                        "currency rate refreshed"
                    );
                    return CurrencyQuote::new(
                        base.as_str(),
                        target.as_str(),
                        fetched.rate,
                        fetched.as_of,
                        source.name(),
                        self.config.ttl_secs,
                    );
                }
                Err(e) => {
                    tracing::warn!(source = source.name(), error = %e, "currency source failed, trying next");
                }
            }
        }

        tracing::warn!(
            rate = %self.config.fallback_rate,
            "all currency sources failed, serving fallback rate"
        );
        CurrencyQuote::fallback(base.as_str(), target.as_str(), self.config.fallback_rate)
    }
}
