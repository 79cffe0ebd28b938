pub mod chain;
pub mod error;
pub mod logging;
pub mod utility;

// Re-exports for convenience
pub use chain::{
    CachedGateway, ChainTable, DashboardSession, DerivedChainTable, Expiration, OptionRecord,
    OptionType, OptionsProvider, Ticker, YahooClient,
};
pub use error::{DashboardError, GatewayError};
