//! The three player operations, as pure functions over borrowed entities.
//!
//! Each operation validates everything it needs before touching any field,
//! so an `Err` always leaves its inputs exactly as they were.

use groupclick_types::economy::{
    Currency, GroupId, Groups, Player, Rate, RateTable, CLICK_REWARD,
    ERROR_GROUP_ALREADY_SELECTED, ERROR_NON_POSITIVE_AMOUNT, ERROR_NO_GROUP, ERROR_SAME_CURRENCY,
};

use crate::{pricing, EconomyError};

/// What a completed trade moved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settlement {
    pub amount: u64,
    pub received: u64,
    pub rate_after: Option<Rate>,
}

/// Join `group`. First write wins: re-selecting the current group is a
/// no-op, switching to another group is rejected.
pub fn select_group(player: &mut Player, group: GroupId) -> Result<(), EconomyError> {
    match player.group {
        Some(current) if current != group => {
            Err(EconomyError::InvalidState(ERROR_GROUP_ALREADY_SELECTED))
        }
        _ => {
            player.group = Some(group);
            Ok(())
        }
    }
}

/// Credit one click to the player (common and group currency) and to their
/// group's total wealth. Returns the group that was credited.
pub fn apply_click(player: &mut Player, groups: &mut Groups) -> Result<GroupId, EconomyError> {
    let group = player
        .group
        .ok_or(EconomyError::InvalidState(ERROR_NO_GROUP))?;

    groups[group].total_wealth = groups[group].total_wealth.saturating_add(CLICK_REWARD);
    player.common_currency = player.common_currency.saturating_add(CLICK_REWARD);
    player.group_currencies[group] = player.group_currencies[group].saturating_add(CLICK_REWARD);

    Ok(group)
}

/// Exchange `amount` of `from` into `to` at the current rates, then drift
/// the rate of the group involved (direct group/common trades only).
pub fn trade(
    player: &mut Player,
    from: Currency,
    to: Currency,
    amount: i64,
    rates: &mut RateTable,
) -> Result<Settlement, EconomyError> {
    if from == to {
        return Err(EconomyError::InvalidArgument(ERROR_SAME_CURRENCY));
    }
    let amount = match u64::try_from(amount) {
        Ok(amount) if amount > 0 => amount,
        _ => return Err(EconomyError::InvalidArgument(ERROR_NON_POSITIVE_AMOUNT)),
    };
    let available = player.balance(from);
    if available < amount {
        return Err(EconomyError::InsufficientBalance {
            currency: from,
            required: amount,
            available,
        });
    }

    // Settle at the pre-drift rate
    let received = pricing::quote(from, to, amount, rates)?;

    *player.balance_mut(from) -= amount;
    let credited = player.balance_mut(to);
    *credited = credited.saturating_add(received);
    let rate_after = pricing::drift(from, to, rates);

    Ok(Settlement {
        amount,
        received,
        rate_after,
    })
}
