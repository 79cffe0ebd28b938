use thiserror::Error;

/// Failures raised by an options provider.
///
/// These never travel past the gateway: `chain::gateway` turns them into
/// `FetchOutcome::Unavailable` and callers see empty data instead.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP {status}: {preview}")]
    Status { status: u16, preview: String },

    #[error("Non-JSON response: {0}")]
    NonJson(String),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("No data returned for {0}")]
    NoResult(String),

    #[error("Session crumb unavailable")]
    MissingCrumb,
}

/// Errors surfaced by the dashboard session to its UI collaborators.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Invalid ticker symbol: '{0}'")]
    InvalidTicker(String),

    #[error("Invalid expiration date: '{0}' (expected YYYY-MM-DD)")]
    InvalidExpiration(String),

    #[error("No ticker entered")]
    NoTicker,

    #[error("No valid expiration dates found for {ticker}")]
    NoValidExpirations { ticker: String },

    #[error("Expiration {expiration} is not a valid expiration for {ticker}")]
    ExpirationNotValid { ticker: String, expiration: String },

    #[error("No expiration selected")]
    NoExpirationSelected,

    #[error("No options data found for {ticker} expiring {expiration}")]
    EmptyFetchResult { ticker: String, expiration: String },

    #[error("Options data has not been fetched yet")]
    NotReady,

    #[error("Unknown plot kind: '{0}'")]
    UnknownPlot(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DashboardError {
    /// Warnings are expected states the user can act on, not faults.
    pub fn is_warning(&self) -> bool {
        matches!(self, DashboardError::NoValidExpirations { .. })
    }
}
