use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DashboardError;

// -----------------------------------------------
// IDENTIFIERS
// -----------------------------------------------

/// Uppercase symbol of one tradable equity; the identity key of every cache lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ticker(String);

impl Ticker {
    /// Trims and uppercases user input. Accepts ASCII alphanumerics plus `.` and `-`
    /// (share classes such as `BRK-B`).
    pub fn parse(raw: &str) -> Result<Self, DashboardError> {
        let symbol = raw.trim().to_ascii_uppercase();
        let well_formed = !symbol.is_empty()
            && symbol.chars().any(|c| c.is_ascii_alphanumeric())
            && symbol
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');

        if !well_formed {
            return Err(DashboardError::InvalidTicker(raw.to_string()));
        }
        Ok(Self(symbol))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Ticker {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Calendar date on which a set of contracts expires, written `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Expiration(NaiveDate);

impl Expiration {
    pub const FORMAT: &'static str = "%Y-%m-%d";

    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn parse(raw: &str) -> Result<Self, DashboardError> {
        NaiveDate::parse_from_str(raw.trim(), Self::FORMAT)
            .map(Self)
            .map_err(|_| DashboardError::InvalidExpiration(raw.to_string()))
    }

    /// Provider timestamps mark midnight UTC of the expiry date.
    pub fn from_epoch(secs: i64) -> Option<Self> {
        DateTime::from_timestamp(secs, 0).map(|dt| Self(dt.date_naive()))
    }

    pub fn to_epoch(&self) -> i64 {
        self.0.and_time(NaiveTime::default()).and_utc().timestamp()
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl FromStr for Expiration {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Expiration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(Self::FORMAT))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionType::Call => "Call",
            OptionType::Put => "Put",
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// -----------------------------------------------
// YAHOO WIRE FORMAT
// -----------------------------------------------

/// Main response structure from the Yahoo options endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct YahooOptionsResponse {
    #[serde(rename = "optionChain")]
    pub option_chain: YahooOptionChain,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YahooOptionChain {
    #[serde(default)]
    pub result: Vec<YahooOptionResult>,

    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YahooOptionResult {
    #[serde(rename = "underlyingSymbol")]
    pub underlying_symbol: Option<String>,

    /// Epoch seconds, provider order
    #[serde(rename = "expirationDates", default)]
    pub expiration_dates: Vec<i64>,

    #[serde(default)]
    pub options: Vec<YahooOptionsBlock>,
}

/// Calls and puts of one expiration
#[derive(Debug, Clone, Deserialize)]
pub struct YahooOptionsBlock {
    #[serde(rename = "expirationDate")]
    pub expiration_date: Option<i64>,

    #[serde(default)]
    pub calls: Vec<RawContract>,

    #[serde(default)]
    pub puts: Vec<RawContract>,
}

/// One contract as the provider reports it, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawContract {
    #[serde(default)]
    pub contract_symbol: String,
    pub strike: f64,
    pub currency: Option<String>,
    pub last_price: Option<f64>,
    pub change: Option<f64>,
    pub percent_change: Option<f64>,
    pub volume: Option<f64>,
    pub open_interest: Option<f64>,
    pub bid: Option<f64>,
    pub ask: Option<f64>,
    pub contract_size: Option<String>,
    pub expiration: Option<i64>,
    pub last_trade_date: Option<i64>,
    pub implied_volatility: Option<f64>,
    #[serde(default)]
    pub in_the_money: bool,
}

/// Call side and put side of one expiration, as supplied by a provider.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawChain {
    pub calls: Vec<RawContract>,
    pub puts: Vec<RawContract>,
}

// -----------------------------------------------
// NORMALIZED TABLES
// -----------------------------------------------

/// A single contract tagged with its side and expiration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionRecord {
    pub contract_symbol: String,
    pub last_trade_date: Option<DateTime<Utc>>,
    pub strike: f64,
    pub last_price: Option<f64>,
    pub bid: Option<f64>,
    pub ask: Option<f64>,
    pub change: Option<f64>,
    pub percent_change: Option<f64>,
    pub volume: u64,
    pub open_interest: u64,
    pub implied_volatility: Option<f64>,
    pub in_the_money: bool,
    pub contract_size: Option<String>,
    pub currency: Option<String>,

    #[serde(rename = "option_type")]
    pub option_type: OptionType,

    #[serde(rename = "expiration_date")]
    pub expiration_date: Expiration,
}

/// All contracts of one (ticker, expiration): calls first, then puts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChainTable {
    pub rows: Vec<OptionRecord>,
}

impl ChainTable {
    pub fn new(rows: Vec<OptionRecord>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn total_open_interest(&self) -> u64 {
        self.rows.iter().map(|r| r.open_interest).sum()
    }

    /// Non-empty with strictly positive aggregate open interest
    pub fn is_valid(&self) -> bool {
        !self.is_empty() && self.total_open_interest() > 0
    }

    pub fn calls(&self) -> impl Iterator<Item = &OptionRecord> {
        self.side(OptionType::Call)
    }

    pub fn puts(&self) -> impl Iterator<Item = &OptionRecord> {
        self.side(OptionType::Put)
    }

    fn side(&self, option_type: OptionType) -> impl Iterator<Item = &OptionRecord> {
        self.rows.iter().filter(move |r| r.option_type == option_type)
    }
}

/// Chain row with the open interest of the previous row at the same strike
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedRow {
    #[serde(flatten)]
    pub record: OptionRecord,

    #[serde(rename = "prev_openInterest")]
    pub prev_open_interest: u64,

    #[serde(rename = "change_in_OI")]
    pub change_in_oi: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DerivedChainTable {
    pub rows: Vec<DerivedRow>,
}

impl DerivedChainTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticker_parse() {
        assert_eq!(Ticker::parse(" aapl ").unwrap().as_str(), "AAPL");
        assert_eq!(Ticker::parse("brk-b").unwrap().as_str(), "BRK-B");
        assert!(Ticker::parse("").is_err());
        assert!(Ticker::parse("   ").is_err());
        assert!(Ticker::parse("AA PL").is_err());
        assert!(Ticker::parse("--").is_err());
    }

    #[test]
    fn test_expiration_epoch_round_trip() {
        let exp = Expiration::parse("2025-01-17").unwrap();
        assert_eq!(exp.to_epoch(), 1_737_072_000);
        assert_eq!(Expiration::from_epoch(1_737_072_000), Some(exp));
        assert_eq!(exp.to_string(), "2025-01-17");
    }

    #[test]
    fn test_expiration_rejects_other_formats() {
        assert!(Expiration::parse("17-Jan-2025").is_err());
        assert!(Expiration::parse("2025-13-01").is_err());
    }

    #[test]
    fn test_raw_contract_tolerates_missing_fields() {
        let raw: RawContract =
            serde_json::from_str(r#"{"contractSymbol":"X","strike":100.0}"#).unwrap();
        assert_eq!(raw.volume, None);
        assert_eq!(raw.open_interest, None);
        assert!(!raw.in_the_money);
    }
}
