pub mod cache;
pub mod chain_api_server;
pub mod chain_commands;
pub mod config;
pub mod derived;
pub mod export;
pub mod filter;
pub mod gateway;
pub mod models;
pub mod normalizer;
pub mod plots;
pub mod session;
pub mod yahoo_client;

// Re-exports (public API)
pub use cache::{CacheStats, CachedGateway, ResultCache};
pub use derived::{
    non_zero_changes, positive_open_interest_sorted_by_expiry_desc, positive_volume,
    with_change_in_oi,
};
pub use filter::{has_open_interest, validate_expirations};
pub use gateway::{FetchOutcome, Gateway, GatewayFailure, OptionsProvider};
pub use models::{
    ChainTable, DerivedChainTable, DerivedRow, Expiration, OptionRecord, OptionType, RawChain,
    RawContract, Ticker,
};
pub use normalizer::normalize;
pub use plots::{BarPoint, PlotData, PlotKind, build_plot};
pub use session::{DashboardSession, EmptyReason, SessionState, SessionSummary};
pub use yahoo_client::YahooClient;
