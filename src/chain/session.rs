use serde::Serialize;
use tracing::{info, warn};

use super::cache::{CacheStats, CachedGateway};
use super::config;
use super::derived;
use super::export;
use super::gateway::{FetchOutcome, OptionsProvider};
use super::models::{ChainTable, DerivedChainTable, Expiration, Ticker};
use super::plots::{self, PlotData, PlotKind};
use crate::error::DashboardError;
use crate::utility::timing::Timer;

/// Why a fetch came back without rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum EmptyReason {
    NoRows,
    ProviderUnavailable(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// Nothing fetched for the current selection
    Idle,
    Fetching { expiration: Expiration },
    Ready { expiration: Expiration, table: ChainTable },
    Empty { expiration: Expiration, reason: EmptyReason },
    Error { message: String },
}

/// Inputs that move the state machine
#[derive(Debug, Clone)]
pub enum SessionEvent {
    SelectionChanged,
    FetchStarted(Expiration),
    FetchCompleted(Expiration, FetchOutcome<ChainTable>),
    Rejected(String),
}

impl SessionState {
    /// Transition table. Events that make no sense in the current state leave it unchanged.
    pub fn on(self, event: SessionEvent) -> SessionState {
        match (self, event) {
            (_, SessionEvent::SelectionChanged) => SessionState::Idle,
            (_, SessionEvent::FetchStarted(expiration)) => SessionState::Fetching { expiration },
            (SessionState::Fetching { expiration }, SessionEvent::FetchCompleted(done, outcome))
                if expiration == done =>
            {
                match outcome {
                    FetchOutcome::Fetched(table) if !table.is_empty() => {
                        SessionState::Ready { expiration, table }
                    }
                    FetchOutcome::Fetched(_) => SessionState::Empty {
                        expiration,
                        reason: EmptyReason::NoRows,
                    },
                    FetchOutcome::Unavailable(failure) => SessionState::Empty {
                        expiration,
                        reason: EmptyReason::ProviderUnavailable(failure.message),
                    },
                }
            }
            (state, SessionEvent::FetchCompleted(..)) => state,
            (_, SessionEvent::Rejected(message)) => SessionState::Error { message },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Fetching { .. } => "fetching",
            SessionState::Ready { .. } => "ready",
            SessionState::Empty { .. } => "empty",
            SessionState::Error { .. } => "error",
        }
    }
}

/// Serializable view of the session for UI collaborators
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub state: &'static str,
    pub ticker: Option<String>,
    pub valid_expirations: Vec<String>,
    pub selected_expiration: Option<String>,
    pub rows: Option<usize>,
    pub total_open_interest: Option<u64>,
    pub empty_reason: Option<EmptyReason>,
    pub error: Option<String>,
    pub cache: CacheStats,
}

/// One analyst session: a ticker, its validated expirations, one selection and
/// the cache that backs them all.
pub struct DashboardSession<P> {
    gateway: CachedGateway<P>,
    ticker: Option<Ticker>,
    valid_expirations: Vec<Expiration>,
    selected: Option<Expiration>,
    state: SessionState,
}

impl<P: OptionsProvider> DashboardSession<P> {
    pub fn new(provider: P) -> Self {
        Self {
            gateway: CachedGateway::new(provider),
            ticker: None,
            valid_expirations: Vec::new(),
            selected: None,
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn ticker(&self) -> Option<&Ticker> {
        self.ticker.as_ref()
    }

    pub fn valid_expirations(&self) -> &[Expiration] {
        &self.valid_expirations
    }

    pub fn selected_expiration(&self) -> Option<&Expiration> {
        self.selected.as_ref()
    }

    pub fn gateway(&self) -> &CachedGateway<P> {
        &self.gateway
    }

    fn apply(&mut self, event: SessionEvent) {
        let previous = self.state.name();
        let state = std::mem::replace(&mut self.state, SessionState::Idle);
        self.state = state.on(event);
        if previous != self.state.name() {
            info!(from = previous, to = self.state.name(), "session transition");
        }
    }

    /// Enter a ticker and validate its expirations.
    ///
    /// The first valid expiration becomes the selection. No valid expiration is
    /// reported as `NoValidExpirations`, a warning rather than a fault.
    pub async fn enter_ticker(&mut self, raw: &str) -> Result<&[Expiration], DashboardError> {
        let ticker = match Ticker::parse(raw) {
            Ok(ticker) => ticker,
            Err(e) => {
                self.apply(SessionEvent::Rejected(e.to_string()));
                return Err(e);
            }
        };

        let valid = {
            let _timer = Timer::start(format!("validate expirations for {}", ticker));
            self.gateway.valid_expirations(&ticker).await
        };

        let same_ticker = self.ticker.as_ref() == Some(&ticker);
        self.ticker = Some(ticker.clone());
        self.valid_expirations = valid;

        // Re-entering the same ticker keeps the selection and any fetched data
        let keep_selection = same_ticker
            && self
                .selected
                .map(|e| self.valid_expirations.contains(&e))
                .unwrap_or(false);

        let keep_state = keep_selection
            && matches!(self.state, SessionState::Ready { .. } | SessionState::Empty { .. });

        if !keep_selection {
            self.selected = self.valid_expirations.first().copied();
        }
        if !keep_state {
            self.apply(SessionEvent::SelectionChanged);
        }

        if self.valid_expirations.is_empty() {
            warn!(ticker = %ticker, "no valid expiration dates");
            return Err(DashboardError::NoValidExpirations {
                ticker: ticker.to_string(),
            });
        }

        Ok(&self.valid_expirations)
    }

    /// Select one of the validated expirations. A new selection discards fetched data.
    pub fn select_expiration(&mut self, expiration: Expiration) -> Result<(), DashboardError> {
        let ticker = self.ticker.as_ref().ok_or(DashboardError::NoTicker)?;

        if !self.valid_expirations.contains(&expiration) {
            return Err(DashboardError::ExpirationNotValid {
                ticker: ticker.to_string(),
                expiration: expiration.to_string(),
            });
        }

        if self.selected != Some(expiration) {
            self.selected = Some(expiration);
            self.apply(SessionEvent::SelectionChanged);
        }
        Ok(())
    }

    /// Fetch the chain of the selected expiration (served from cache when validated earlier).
    pub async fn fetch(&mut self) -> Result<&ChainTable, DashboardError> {
        let Some(ticker) = self.ticker.clone() else {
            return Err(self.reject(DashboardError::NoTicker));
        };
        let Some(expiration) = self.selected else {
            return Err(self.reject(DashboardError::NoExpirationSelected));
        };

        self.apply(SessionEvent::FetchStarted(expiration));
        let outcome = {
            let _timer = Timer::start(format!("fetch {} {}", ticker, expiration));
            self.gateway.fetch_chain_outcome(&ticker, &expiration).await
        };
        self.apply(SessionEvent::FetchCompleted(expiration, outcome));

        match &self.state {
            SessionState::Ready { table, .. } => Ok(table),
            _ => Err(DashboardError::EmptyFetchResult {
                ticker: ticker.to_string(),
                expiration: expiration.to_string(),
            }),
        }
    }

    fn reject(&mut self, err: DashboardError) -> DashboardError {
        self.apply(SessionEvent::Rejected(err.to_string()));
        err
    }

    pub fn table(&self) -> Result<&ChainTable, DashboardError> {
        match &self.state {
            SessionState::Ready { table, .. } => Ok(table),
            _ => Err(DashboardError::NotReady),
        }
    }

    pub fn derived(&self) -> Result<DerivedChainTable, DashboardError> {
        self.table().map(derived::with_change_in_oi)
    }

    pub fn plot(&self, kind: PlotKind) -> Result<PlotData, DashboardError> {
        self.table().map(|table| plots::build_plot(kind, table))
    }

    /// CSV body and download file name
    pub fn export_csv(&self) -> Result<(String, String), DashboardError> {
        let table = self.table()?;
        let ticker = self.ticker.as_ref().ok_or(DashboardError::NoTicker)?;
        Ok((
            config::export_file_name(ticker.as_str()),
            export::chain_to_csv(table)?,
        ))
    }

    pub fn summary(&self) -> SessionSummary {
        let table = self.table().ok();
        SessionSummary {
            state: self.state.name(),
            ticker: self.ticker.as_ref().map(|t| t.to_string()),
            valid_expirations: self.valid_expirations.iter().map(|e| e.to_string()).collect(),
            selected_expiration: self.selected.map(|e| e.to_string()),
            rows: table.map(|t| t.len()),
            total_open_interest: table.map(|t| t.total_open_interest()),
            empty_reason: match &self.state {
                SessionState::Empty { reason, .. } => Some(reason.clone()),
                _ => None,
            },
            error: match &self.state {
                SessionState::Error { message } => Some(message.clone()),
                _ => None,
            },
            cache: self.gateway.cache_stats(),
        }
    }
}
