//! Bond rewards.
//!
//! The baker's own stake earns its proportional share of the cycle rewards.
//! That share is locked as bond rewards and removed from the pool left for
//! delegators.
//!
//! ```text
//! bond_rewards = floor((staking - delegated) / staking * rewards)
//! ```
//!
//! A snapshot reporting more delegated than staked balance gives the baker
//! no own stake, and therefore no bond rewards.

use crumbs_types::Fraction;

use crate::{EngineError, Result, StepArguments};

/// Lock the baker's bond rewards and reduce the distributable pool.
///
/// # Errors
///
/// - [`EngineError::ZeroStakingBalance`] if the staking balance is zero
pub fn resolve_baker_rewards(mut args: StepArguments<'_>) -> Result<StepArguments<'_>> {
    let data = &args.cycle_data;
    if data.staking_balance.is_zero() {
        return Err(EngineError::ZeroStakingBalance);
    }
    let baker_balance = data.baker_balance();

    let bond_rewards =
        Fraction::ratio(baker_balance, data.staking_balance)?.floor_of(args.distributable_rewards)?;

    tracing::debug!(
        cycle = args.cycle(),
        %baker_balance,
        %bond_rewards,
        "locked bond rewards"
    );

    args.cycle_report.locked_bond_rewards =
        args.cycle_report.locked_bond_rewards.checked_add(bond_rewards)?;
    args.distributable_rewards = args.distributable_rewards.checked_sub(bond_rewards)?;
    Ok(args)
}
