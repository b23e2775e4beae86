//! Arbitrary-precision balance summation.
//!
//! Balances travel as decimal strings in minimal token units. Totals are
//! summed exactly as big integers; an `f64` approximation is accumulated
//! alongside for sorting and display.

use num_bigint::BigInt;
use num_traits::{ToPrimitive, Zero};
use serde::{Deserialize, Serialize};

use crate::types::{AccountStakeRecord, AccountsMap};

/// Conversion from minimal units to the approximate numeric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Denomination {
    /// Number of decimals the approximate value is scaled down by.
    pub decimals: u8,
}

impl Denomination {
    /// Minimal units, no scaling.
    pub const RAW: Denomination = Denomination { decimals: 0 };

    pub fn new(decimals: u8) -> Self {
        Self { decimals }
    }

    /// Converts an exact value to its approximate representation.
    pub fn to_float(&self, value: &BigInt) -> f64 {
        let raw = value.to_f64().unwrap_or(0.0);
        if self.decimals == 0 {
            raw
        } else {
            raw / 10f64.powi(i32::from(self.decimals))
        }
    }

    /// Approximate value of a decimal-string balance; malformed input is 0.
    pub fn balance_as_float(&self, balance: &str) -> f64 {
        parse_balance(balance)
            .map(|value| self.to_float(&value))
            .unwrap_or(0.0)
    }
}

/// Parses a base-10 balance.
///
/// Accepts an optional leading sign followed by ASCII digits. Anything else
/// (empty, whitespace, separators, other radixes) is rejected with `None`.
pub fn parse_balance(balance: &str) -> Option<BigInt> {
    let digits = balance.strip_prefix(['+', '-']).unwrap_or(balance);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    balance.parse::<BigInt>().ok()
}

/// Sums balances in minimal units.
///
/// Returns the exact total as a decimal string and the approximate total in
/// raw units. Malformed entries are skipped.
pub fn compute_total_balance<I, S>(balances: I) -> (String, f64)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    compute_total_balance_with(balances, Denomination::RAW)
}

/// Like [`compute_total_balance`], scaling the approximate total by `denomination`.
pub fn compute_total_balance_with<I, S>(balances: I, denomination: Denomination) -> (String, f64)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut total = BigInt::zero();
    let mut total_float = 0.0f64;

    for balance in balances {
        let balance = balance.as_ref();
        let Some(value) = parse_balance(balance) else {
            if !balance.is_empty() {
                tracing::debug!("Skipping malformed balance {:?}", balance);
            }
            continue;
        };

        total_float += denomination.to_float(&value);
        total += value;
    }

    (total.to_string(), total_float)
}

/// Recomputes `total_stake` and `total_stake_num` from the record's components.
pub fn apply_total_stake(record: &mut AccountStakeRecord, denomination: Denomination) {
    let (total, total_num) = compute_total_balance_with(record.totaled_balances(), denomination);
    record.total_stake = total;
    record.total_stake_num = total_num;
}

/// Recomputes the totals of every record, overwriting any previous values.
pub fn calculate_total_stake_for_accounts(accounts: &mut AccountsMap, denomination: Denomination) {
    for record in accounts.values_mut() {
        apply_total_stake(record, denomination);
    }
}
