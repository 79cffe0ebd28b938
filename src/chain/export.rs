use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use csv::Writer as CsvWriter;
use tracing::info;

use super::config;
use super::models::{ChainTable, DerivedChainTable, OptionRecord, Ticker};
use crate::error::DashboardError;

/// Column order of a chain export; the names are the record attribute names.
pub const CHAIN_HEADER: [&str; 16] = [
    "contractSymbol",
    "lastTradeDate",
    "strike",
    "lastPrice",
    "bid",
    "ask",
    "change",
    "percentChange",
    "volume",
    "openInterest",
    "impliedVolatility",
    "inTheMoney",
    "contractSize",
    "currency",
    "option_type",
    "expiration_date",
];

/// Appended after `CHAIN_HEADER` in a derived export
pub const DERIVED_HEADER: [&str; 2] = ["prev_openInterest", "change_in_OI"];

pub fn write_chain_csv<W: io::Write>(chain: &ChainTable, writer: W) -> Result<(), DashboardError> {
    let mut wtr = CsvWriter::from_writer(writer);
    wtr.write_record(CHAIN_HEADER)?;
    for record in &chain.rows {
        wtr.write_record(record_fields(record))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_derived_csv<W: io::Write>(
    derived: &DerivedChainTable,
    writer: W,
) -> Result<(), DashboardError> {
    let mut wtr = CsvWriter::from_writer(writer);
    wtr.write_record(CHAIN_HEADER.iter().chain(DERIVED_HEADER.iter()))?;
    for row in &derived.rows {
        let mut fields = record_fields(&row.record);
        fields.push(row.prev_open_interest.to_string());
        fields.push(row.change_in_oi.to_string());
        wtr.write_record(fields)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn chain_to_csv(chain: &ChainTable) -> Result<String, DashboardError> {
    let mut buf = Vec::new();
    write_chain_csv(chain, &mut buf)?;
    into_string(buf)
}

pub fn derived_to_csv(derived: &DerivedChainTable) -> Result<String, DashboardError> {
    let mut buf = Vec::new();
    write_derived_csv(derived, &mut buf)?;
    into_string(buf)
}

/// Write `{ticker}_options.csv` into `dir`
pub fn export_chain(
    chain: &ChainTable,
    ticker: &Ticker,
    dir: &Path,
) -> Result<PathBuf, DashboardError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(config::export_file_name(ticker.as_str()));

    write_chain_csv(chain, File::create(&path)?)?;

    info!(path = %path.display(), rows = chain.len(), "exported option chain");
    Ok(path)
}

fn record_fields(r: &OptionRecord) -> Vec<String> {
    vec![
        r.contract_symbol.clone(),
        r.last_trade_date
            .map(|ts| ts.format("%Y-%m-%d %H:%M:%S%:z").to_string())
            .unwrap_or_default(),
        r.strike.to_string(),
        opt(r.last_price),
        opt(r.bid),
        opt(r.ask),
        opt(r.change),
        opt(r.percent_change),
        r.volume.to_string(),
        r.open_interest.to_string(),
        opt(r.implied_volatility),
        if r.in_the_money { "True" } else { "False" }.to_string(),
        r.contract_size.clone().unwrap_or_default(),
        r.currency.clone().unwrap_or_default(),
        r.option_type.to_string(),
        r.expiration_date.to_string(),
    ]
}

fn opt(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn into_string(buf: Vec<u8>) -> Result<String, DashboardError> {
    String::from_utf8(buf)
        .map_err(|e| DashboardError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}
