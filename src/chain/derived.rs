use std::collections::HashMap;

use super::models::{ChainTable, DerivedChainTable, DerivedRow, OptionRecord};

/// Attach `prev_openInterest` and `change_in_OI` to every row.
///
/// Rows are grouped by strike (calls and puts share a group) keeping their
/// relative order. Within a group the previous row's open interest becomes the
/// prior observation; the first row of a strike has none and counts from 0.
/// Output row order is the input row order.
pub fn with_change_in_oi(chain: &ChainTable) -> DerivedChainTable {
    let mut last_seen: HashMap<u64, u64> = HashMap::with_capacity(chain.len());

    let rows = chain
        .rows
        .iter()
        .map(|record| {
            let prev = last_seen
                .insert(strike_key(record.strike), record.open_interest)
                .unwrap_or(0);

            DerivedRow {
                record: record.clone(),
                prev_open_interest: prev,
                change_in_oi: record.open_interest as i64 - prev as i64,
            }
        })
        .collect();

    DerivedChainTable { rows }
}

/// Rows whose open interest moved; feeds the change-in-OI chart
pub fn non_zero_changes(derived: &DerivedChainTable) -> Vec<&DerivedRow> {
    derived.rows.iter().filter(|r| r.change_in_oi != 0).collect()
}

pub fn positive_volume(chain: &ChainTable) -> Vec<&OptionRecord> {
    chain.rows.iter().filter(|r| r.volume > 0).collect()
}

/// Rows with open interest, latest expiration first, then ascending strike.
/// The sort is stable so ties keep table order.
pub fn positive_open_interest_sorted_by_expiry_desc(chain: &ChainTable) -> Vec<&OptionRecord> {
    let mut rows: Vec<&OptionRecord> = chain.rows.iter().filter(|r| r.open_interest > 0).collect();

    rows.sort_by(|a, b| {
        b.expiration_date
            .cmp(&a.expiration_date)
            .then_with(|| a.strike.total_cmp(&b.strike))
    });

    rows
}

/// Number of distinct strikes, used for x-tick thinning
pub fn unique_strike_count(strikes: impl IntoIterator<Item = f64>) -> usize {
    let mut seen: Vec<u64> = strikes.into_iter().map(strike_key).collect();
    seen.sort_unstable();
    seen.dedup();
    seen.len()
}

// -0.0 and 0.0 are the same strike
fn strike_key(strike: f64) -> u64 {
    if strike == 0.0 { 0 } else { strike.to_bits() }
}
