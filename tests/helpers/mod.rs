#![allow(dead_code)]

use async_trait::async_trait;
use options_dashboard::chain::{Expiration, OptionsProvider, RawChain, RawContract, Ticker};
use options_dashboard::GatewayError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// In-memory provider that counts every call it receives
#[derive(Default)]
pub struct StubProvider {
    pub expirations: Vec<Expiration>,
    pub chains: HashMap<Expiration, RawChain>,
    pub fail: bool,
    pub expiration_calls: AtomicUsize,
    pub chain_calls: AtomicUsize,
}

impl StubProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn with_chain(
        mut self,
        expiration: &str,
        calls: Vec<RawContract>,
        puts: Vec<RawContract>,
    ) -> Self {
        let expiration = exp(expiration);
        self.expirations.push(expiration);
        self.chains.insert(expiration, RawChain { calls, puts });
        self
    }

    pub fn expiration_calls(&self) -> usize {
        self.expiration_calls.load(Ordering::SeqCst)
    }

    pub fn chain_calls(&self) -> usize {
        self.chain_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OptionsProvider for StubProvider {
    async fn expirations(&self, _ticker: &Ticker) -> Result<Vec<Expiration>, GatewayError> {
        self.expiration_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(GatewayError::Provider("stub offline".to_string()));
        }
        Ok(self.expirations.clone())
    }

    async fn option_chain(
        &self,
        _ticker: &Ticker,
        expiration: &Expiration,
    ) -> Result<RawChain, GatewayError> {
        self.chain_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(GatewayError::Provider("stub offline".to_string()));
        }
        Ok(self.chains.get(expiration).cloned().unwrap_or_default())
    }
}

pub fn exp(s: &str) -> Expiration {
    Expiration::parse(s).unwrap()
}

pub fn contract(strike: f64, open_interest: f64, volume: f64) -> RawContract {
    RawContract {
        contract_symbol: format!("AAPL{:08}", (strike * 1000.0) as u64),
        strike,
        open_interest: Some(open_interest),
        volume: Some(volume),
        ..RawContract::default()
    }
}
