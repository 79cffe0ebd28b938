use chrono::DateTime;

use super::models::{ChainTable, Expiration, OptionRecord, OptionType, RawContract};

/// Merge the call and put sides of one expiration into a single table.
///
/// Calls come first, then puts, each side in provider order. Every row is tagged
/// with its side and stamped with `expiration`; nothing is dropped or duplicated.
pub fn normalize(
    calls: Vec<RawContract>,
    puts: Vec<RawContract>,
    expiration: &Expiration,
) -> ChainTable {
    let mut rows = Vec::with_capacity(calls.len() + puts.len());

    rows.extend(calls.into_iter().map(|raw| to_record(raw, OptionType::Call, expiration)));
    rows.extend(puts.into_iter().map(|raw| to_record(raw, OptionType::Put, expiration)));

    ChainTable::new(rows)
}

fn to_record(raw: RawContract, option_type: OptionType, expiration: &Expiration) -> OptionRecord {
    OptionRecord {
        contract_symbol: raw.contract_symbol,
        last_trade_date: raw
            .last_trade_date
            .and_then(|secs| DateTime::from_timestamp(secs, 0)),
        strike: raw.strike,
        last_price: raw.last_price,
        bid: raw.bid,
        ask: raw.ask,
        change: raw.change,
        percent_change: raw.percent_change,
        volume: count(raw.volume),
        open_interest: count(raw.open_interest),
        implied_volatility: raw.implied_volatility,
        in_the_money: raw.in_the_money,
        contract_size: raw.contract_size,
        currency: raw.currency,
        option_type,
        expiration_date: *expiration,
    }
}

/// Provider counts arrive as JSON numbers and may be absent; missing or
/// negative values count as zero.
fn count(value: Option<f64>) -> u64 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v.trunc() as u64,
        _ => 0,
    }
}
