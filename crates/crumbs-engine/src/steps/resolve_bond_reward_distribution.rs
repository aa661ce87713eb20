//! Bond reward redistribution.

use crumbs_types::IncomeKind;

use crate::steps::distribute_shares;
use crate::{Result, StepArguments};

/// Pay locked bond rewards out to `income_recipients.bond_rewards`.
///
/// With no recipients configured the rewards stay locked. Otherwise the
/// rounding residue is all that remains locked.
///
/// # Errors
///
/// - [`crate::EngineError::InvalidShareTotal`] if the shares do not sum to 100
pub fn resolve_bond_reward_distribution(mut args: StepArguments<'_>) -> Result<StepArguments<'_>> {
    let config = args.config;
    let shares = &config.income_recipients.bond_rewards;
    if shares.is_empty() {
        return Ok(args);
    }

    let cycle = args.cycle();
    let report = &mut args.cycle_report;
    let (payments, residue) = distribute_shares(
        cycle,
        "bond reward",
        report.locked_bond_rewards,
        shares,
        IncomeKind::BondReward,
    )?;
    report.bond_reward_payments.extend(payments);
    report.locked_bond_rewards = residue;
    Ok(args)
}
