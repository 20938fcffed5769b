//! Exchange math: how much a trade pays out and how it moves the rates.
//!
//! Every rate is "common units per group unit", so the multiplier of a trade
//! is always a ratio of two small integers. Settling with integer division
//! gives the same result as `floor(amount * multiplier)` without any
//! floating point.

use groupclick_types::economy::{Currency, Rate, RateTable, ERROR_SAME_CURRENCY};

use crate::EconomyError;

/// Exact multiplier `numerator / denominator` for a trade from `from` to `to`.
///
/// Returns `None` when both sides are the same currency.
pub fn multiplier(from: Currency, to: Currency, rates: &RateTable) -> Option<(u64, u64)> {
    match (from, to) {
        (Currency::Common, Currency::Common) => None,
        // Buying group currency: 1 / r(g)
        (Currency::Common, Currency::Group(group)) => Some((1, rates[group].get() as u64)),
        // Selling group currency: r(g)
        (Currency::Group(group), Currency::Common) => Some((rates[group].get() as u64, 1)),
        (Currency::Group(from), Currency::Group(to)) if from == to => None,
        // Cross rate through common: r(g1) / r(g2)
        (Currency::Group(from), Currency::Group(to)) => {
            Some((rates[from].get() as u64, rates[to].get() as u64))
        }
    }
}

/// Amount received for trading `amount` of `from` into `to`, floored.
pub fn quote(
    from: Currency,
    to: Currency,
    amount: u64,
    rates: &RateTable,
) -> Result<u64, EconomyError> {
    let (numerator, denominator) = multiplier(from, to, rates).ok_or(
        EconomyError::InvalidArgument(ERROR_SAME_CURRENCY),
    )?;
    let received = (amount as u128 * numerator as u128) / denominator as u128;
    Ok(u64::try_from(received).unwrap_or(u64::MAX))
}

/// Move the rate of the group involved in a direct group/common trade.
///
/// Selling a group currency raises its rate by one, buying it lowers the
/// rate by one (both clamped). Group-to-group trades leave rates alone.
/// Returns the new rate of the group that drifted.
pub fn drift(from: Currency, to: Currency, rates: &mut RateTable) -> Option<Rate> {
    match (from, to) {
        (Currency::Group(group), Currency::Common) => {
            rates[group] = rates[group].raise();
            Some(rates[group])
        }
        (Currency::Common, Currency::Group(group)) => {
            rates[group] = rates[group].lower();
            Some(rates[group])
        }
        _ => None,
    }
}
