//! Policy lookups shared by the pipeline steps.

use std::collections::BTreeMap;

use crumbs_types::amount::FULL_PERCENT;
use crumbs_types::{Address, Config, Mutez, Percentage};

use crate::{EngineError, Result};

/// The baker is overdelegated when its staking balance covers less than
/// this percentage of the delegated balance.
pub const OVERDELEGATION_THRESHOLD_PCT: u128 = 10;

/// Fee for `delegator`: its override if configured, else `default_fee`.
pub fn get_applicable_fee(config: &Config, delegator: &Address) -> Percentage {
    config
        .delegator_overrides
        .get(delegator)
        .and_then(|o| o.fee)
        .unwrap_or(config.default_fee)
}

/// Payment address for `delegator`: its redirect if configured, else itself.
pub fn get_redirect_address(config: &Config, delegator: &Address) -> Address {
    config
        .delegator_overrides
        .get(delegator)
        .and_then(|o| o.recipient.clone())
        .unwrap_or_else(|| delegator.clone())
}

/// Whether `base / total_delegated < 10%`, where `base` is the staking
/// balance capped by the frozen-deposit limit when one is set.
///
/// A zero delegated balance is never overdelegated.
pub fn is_overdelegated(
    staking_balance: Mutez,
    total_delegated: Mutez,
    frozen_deposit_limit: Option<Mutez>,
) -> bool {
    let base = match frozen_deposit_limit {
        Some(limit) => limit.min(staking_balance),
        None => staking_balance,
    };
    // base / delegated < 10 / 100  <=>  base * 100 < delegated * 10
    base.as_u128().saturating_mul(100)
        < total_delegated
            .as_u128()
            .saturating_mul(OVERDELEGATION_THRESHOLD_PCT)
}

/// Minimum payment amount in mutez (zero when unset).
pub fn get_minimum_payment_amount(config: &Config) -> Mutez {
    config
        .payment_requirements
        .minimum_amount
        .map(|tez| tez.to_mutez())
        .unwrap_or(Mutez::ZERO)
}

/// Minimum delegator balance in mutez (zero when unset).
pub fn get_minimum_delegator_balance(config: &Config) -> Mutez {
    config
        .delegator_requirements
        .minimum_balance
        .map(|tez| tez.to_mutez())
        .unwrap_or(Mutez::ZERO)
}

/// Check that a recipient share map sums to exactly 100%.
///
/// # Errors
///
/// - [`EngineError::InvalidShareTotal`] otherwise
pub fn validate_share_total(pool: &'static str, shares: &BTreeMap<Address, Percentage>) -> Result<()> {
    let total: u64 = shares.values().map(|p| u64::from(p.scaled())).sum();
    if total != u64::from(FULL_PERCENT) {
        let whole = total / u64::from(FULL_PERCENT / 100);
        let frac = total % u64::from(FULL_PERCENT / 100);
        let total = if frac == 0 {
            whole.to_string()
        } else {
            format!("{whole}.{frac:04}").trim_end_matches('0').to_string()
        };
        return Err(EngineError::InvalidShareTotal { pool, total });
    }
    Ok(())
}
