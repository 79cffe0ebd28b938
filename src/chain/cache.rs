use std::collections::HashMap;

use tracing::debug;

use super::filter;
use super::gateway::{FetchOutcome, Gateway, OptionsProvider};
use super::models::{ChainTable, Expiration, Ticker};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ChainKey {
    ticker: Ticker,
    expiration: Expiration,
}

impl ChainKey {
    fn new(ticker: &Ticker, expiration: &Expiration) -> Self {
        Self {
            ticker: ticker.clone(),
            expiration: *expiration,
        }
    }
}

/// Session-scoped memo of gateway and filter results.
///
/// Entries are written once and never evicted or refreshed; soft failures are
/// stored like any other result.
#[derive(Debug, Default)]
pub struct ResultCache {
    expirations: HashMap<Ticker, FetchOutcome<Vec<Expiration>>>,
    chains: HashMap<ChainKey, FetchOutcome<ChainTable>>,
    valid_expirations: HashMap<Ticker, Vec<Expiration>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct CacheStats {
    pub expiration_lists: usize,
    pub chains: usize,
    pub validated_tickers: usize,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            expiration_lists: self.expirations.len(),
            chains: self.chains.len(),
            validated_tickers: self.valid_expirations.len(),
        }
    }
}

/// Gateway plus the session's cache; every lookup goes through the cache first.
pub struct CachedGateway<P> {
    gateway: Gateway<P>,
    cache: ResultCache,
}

impl<P: OptionsProvider> CachedGateway<P> {
    pub fn new(provider: P) -> Self {
        Self {
            gateway: Gateway::new(provider),
            cache: ResultCache::new(),
        }
    }

    pub fn provider(&self) -> &P {
        self.gateway.provider()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub async fn list_expirations_outcome(
        &mut self,
        ticker: &Ticker,
    ) -> FetchOutcome<Vec<Expiration>> {
        if let Some(hit) = self.cache.expirations.get(ticker) {
            debug!(ticker = %ticker, "expirations cache hit");
            return hit.clone();
        }

        debug!(ticker = %ticker, "expirations cache miss");
        let outcome = self.gateway.list_expirations_outcome(ticker).await;
        self.cache.expirations.insert(ticker.clone(), outcome.clone());
        outcome
    }

    pub async fn list_expirations(&mut self, ticker: &Ticker) -> Vec<Expiration> {
        self.list_expirations_outcome(ticker).await.into_data()
    }

    pub async fn fetch_chain_outcome(
        &mut self,
        ticker: &Ticker,
        expiration: &Expiration,
    ) -> FetchOutcome<ChainTable> {
        let key = ChainKey::new(ticker, expiration);
        if let Some(hit) = self.cache.chains.get(&key) {
            debug!(ticker = %ticker, expiration = %expiration, "chain cache hit");
            return hit.clone();
        }

        debug!(ticker = %ticker, expiration = %expiration, "chain cache miss");
        let outcome = self.gateway.fetch_chain_outcome(ticker, expiration).await;
        self.cache.chains.insert(key, outcome.clone());
        outcome
    }

    pub async fn fetch_chain(&mut self, ticker: &Ticker, expiration: &Expiration) -> ChainTable {
        self.fetch_chain_outcome(ticker, expiration).await.into_data()
    }

    pub async fn valid_expirations(&mut self, ticker: &Ticker) -> Vec<Expiration> {
        if let Some(hit) = self.cache.valid_expirations.get(ticker) {
            debug!(ticker = %ticker, "valid expirations cache hit");
            return hit.clone();
        }

        let valid = filter::validate_expirations(self, ticker).await;
        self.cache.valid_expirations.insert(ticker.clone(), valid.clone());
        valid
    }
}
