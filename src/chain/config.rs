use std::time::Duration;

// -----------------------------------------------
// YAHOO FINANCE ENDPOINTS
// -----------------------------------------------
pub const YAHOO_COOKIE_URL: &str = "https://fc.yahoo.com";
pub const YAHOO_QUERY_BASE_URL: &str = "https://query2.finance.yahoo.com";
pub const YAHOO_CRUMB_PATH: &str = "/v1/test/getcrumb";

pub fn yahoo_crumb_url(query_base: &str) -> String {
    format!("{}{}", query_base.trim_end_matches('/'), YAHOO_CRUMB_PATH)
}

pub fn yahoo_options_url(query_base: &str, symbol: &str, crumb: &str, date: Option<i64>) -> String {
    let mut url = format!(
        "{}/v7/finance/options/{}?crumb={}",
        query_base.trim_end_matches('/'),
        urlencoding::encode(symbol),
        urlencoding::encode(crumb)
    );
    if let Some(date) = date {
        url.push_str(&format!("&date={}", date));
    }
    url
}

// -----------------------------------------------
// HTTP CLIENT CONFIG
// -----------------------------------------------
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
                               AppleWebKit/537.36 (KHTML, like Gecko) \
                               Chrome/131.0.0.0 Safari/537.36";

pub const ACCEPT_LANGUAGES: &[&str] = &["en-US,en;q=0.9", "en-GB,en;q=0.8", "en-CA,en;q=0.9"];

pub const HTTP_TIMEOUT: Duration = Duration::from_secs(20);

// Characters of an unexpected body kept in error messages
pub const BODY_PREVIEW_CHARS: usize = 200;

// -----------------------------------------------
// SESSION WARMUP
// -----------------------------------------------
pub const WARMUP_DELAY_MS: u64 = 200;

// -----------------------------------------------
// PLOTS
// -----------------------------------------------
pub const MAX_X_TICKS: usize = 20;
pub const CALL_COLOR: &str = "green";
pub const PUT_COLOR: &str = "red";

// -----------------------------------------------
// EXPORT
// -----------------------------------------------
pub fn export_file_name(ticker: &str) -> String {
    format!("{}_options.csv", ticker)
}

// -----------------------------------------------
// RUNTIME CONFIGURATION
// -----------------------------------------------
pub const DEFAULT_PORT: u16 = 3001;

/// Get the execution mode from environment or default to single
pub fn get_execution_mode() -> String {
    std::env::var("DASH_MODE").unwrap_or_else(|_| "single".to_string())
}

/// Ticker for single/expirations mode
pub fn get_ticker() -> String {
    std::env::var("DASH_TICKER").unwrap_or_else(|_| "AAPL".to_string())
}

/// Expiration for single mode; first valid expiration when unset
pub fn get_expiry() -> Option<String> {
    std::env::var("DASH_EXPIRY").ok().filter(|s| !s.trim().is_empty())
}

pub fn get_plot() -> String {
    std::env::var("DASH_PLOT").unwrap_or_else(|_| "change-in-oi".to_string())
}

pub fn get_port() -> u16 {
    std::env::var("DASH_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT)
}

pub fn get_export_dir() -> String {
    std::env::var("DASH_EXPORT_DIR").unwrap_or_else(|_| ".".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_url() {
        let url = yahoo_options_url("https://q.example/", "BRK-B", "a/b", Some(1_700_000_000));
        assert_eq!(
            url,
            "https://q.example/v7/finance/options/BRK-B?crumb=a%2Fb&date=1700000000"
        );

        let url = yahoo_options_url("https://q.example", "AAPL", "c", None);
        assert_eq!(url, "https://q.example/v7/finance/options/AAPL?crumb=c");
    }

    #[test]
    fn test_export_file_name() {
        assert_eq!(export_file_name("TSLA"), "TSLA_options.csv");
    }
}
