use async_trait::async_trait;
use serde::Serialize;
use tracing::warn;

use super::models::{ChainTable, Expiration, RawChain, Ticker};
use super::normalizer;
use crate::error::GatewayError;

/// Raw access to a market-data vendor.
#[async_trait]
pub trait OptionsProvider: Send + Sync {
    /// All listed expirations for `ticker`, in provider order.
    async fn expirations(&self, ticker: &Ticker) -> Result<Vec<Expiration>, GatewayError>;

    /// Call and put contracts for one expiration.
    async fn option_chain(
        &self,
        ticker: &Ticker,
        expiration: &Expiration,
    ) -> Result<RawChain, GatewayError>;
}

#[async_trait]
impl<P: OptionsProvider + ?Sized> OptionsProvider for std::sync::Arc<P> {
    async fn expirations(&self, ticker: &Ticker) -> Result<Vec<Expiration>, GatewayError> {
        (**self).expirations(ticker).await
    }

    async fn option_chain(
        &self,
        ticker: &Ticker,
        expiration: &Expiration,
    ) -> Result<RawChain, GatewayError> {
        (**self).option_chain(ticker, expiration).await
    }
}

/// Why a gateway call produced no data
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GatewayFailure {
    pub message: String,
}

impl From<GatewayError> for GatewayFailure {
    fn from(err: GatewayError) -> Self {
        Self { message: err.to_string() }
    }
}

/// Result of a gateway call: data, or the reason the provider was unavailable.
///
/// `into_data` / `data_or_empty` give the soft view where a failure reads as
/// empty data.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T> {
    Fetched(T),
    Unavailable(GatewayFailure),
}

impl<T: Default + Clone> FetchOutcome<T> {
    pub fn into_data(self) -> T {
        match self {
            FetchOutcome::Fetched(data) => data,
            FetchOutcome::Unavailable(_) => T::default(),
        }
    }

    pub fn data_or_empty(&self) -> T {
        self.clone().into_data()
    }
}

impl<T> FetchOutcome<T> {
    pub fn data(&self) -> Option<&T> {
        match self {
            FetchOutcome::Fetched(data) => Some(data),
            FetchOutcome::Unavailable(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&GatewayFailure> {
        match self {
            FetchOutcome::Fetched(_) => None,
            FetchOutcome::Unavailable(failure) => Some(failure),
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, FetchOutcome::Unavailable(_))
    }
}

/// Remote data gateway: provider calls in, normalized tables out, no errors.
pub struct Gateway<P> {
    provider: P,
}

impl<P: OptionsProvider> Gateway<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub async fn list_expirations_outcome(&self, ticker: &Ticker) -> FetchOutcome<Vec<Expiration>> {
        match self.provider.expirations(ticker).await {
            Ok(expirations) => FetchOutcome::Fetched(expirations),
            Err(e) => {
                warn!(ticker = %ticker, error = %e, "expiration listing unavailable");
                FetchOutcome::Unavailable(e.into())
            }
        }
    }

    pub async fn fetch_chain_outcome(
        &self,
        ticker: &Ticker,
        expiration: &Expiration,
    ) -> FetchOutcome<ChainTable> {
        match self.provider.option_chain(ticker, expiration).await {
            Ok(raw) => {
                FetchOutcome::Fetched(normalizer::normalize(raw.calls, raw.puts, expiration))
            }
            Err(e) => {
                warn!(
                    ticker = %ticker,
                    expiration = %expiration,
                    error = %e,
                    "option chain unavailable"
                );
                FetchOutcome::Unavailable(e.into())
            }
        }
    }

    /// Expirations for `ticker`; empty when the provider fails
    pub async fn list_expirations(&self, ticker: &Ticker) -> Vec<Expiration> {
        self.list_expirations_outcome(ticker).await.into_data()
    }

    /// Normalized chain; empty when the provider fails or has no data
    pub async fn fetch_chain(&self, ticker: &Ticker, expiration: &Expiration) -> ChainTable {
        self.fetch_chain_outcome(ticker, expiration).await.into_data()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_projects_to_default() {
        let outcome: FetchOutcome<Vec<Expiration>> =
            FetchOutcome::Unavailable(GatewayError::Provider("boom".into()).into());
        assert!(outcome.is_unavailable());
        assert_eq!(outcome.failure().unwrap().message, "Provider error: boom");
        assert!(outcome.data().is_none());
        assert!(outcome.into_data().is_empty());
    }
}
