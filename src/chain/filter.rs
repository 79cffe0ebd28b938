use tracing::info;

use super::cache::CachedGateway;
use super::gateway::OptionsProvider;
use super::models::{ChainTable, Expiration, Ticker};

/// An expiration is worth showing only if somebody holds contracts in it.
pub fn has_open_interest(chain: &ChainTable) -> bool {
    chain.is_valid()
}

/// Keep the expirations whose chain carries open interest, in gateway order.
///
/// Validity cannot be known without the chain itself, so every candidate is
/// fetched once, sequentially. The fetches go through the cache, which means the
/// chain is already there when the user later selects that expiration.
pub async fn validate_expirations<P: OptionsProvider>(
    gateway: &mut CachedGateway<P>,
    ticker: &Ticker,
) -> Vec<Expiration> {
    let candidates = gateway.list_expirations(ticker).await;
    let mut valid = Vec::with_capacity(candidates.len());

    for expiration in &candidates {
        let chain = gateway.fetch_chain(ticker, expiration).await;
        if has_open_interest(&chain) {
            valid.push(*expiration);
        }
    }

    info!(
        ticker = %ticker,
        candidates = candidates.len(),
        valid = valid.len(),
        "validated expirations"
    );

    valid
}
