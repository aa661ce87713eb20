//! The reward split.
//!
//! ```text
//! gross   = balance / delegated * distributable
//! fee     = floor(gross * fee_rate)
//! payment = floor(gross * (1 - fee_rate))
//! ```
//!
//! Both products are computed exactly and truncated once. The truncation
//! remainder stays in the distributable pool until the fee income step
//! absorbs it.

use crumbs_types::{DelegatorPayment, Fraction, Mutez};

use crate::helpers::{get_applicable_fee, get_redirect_address};
use crate::{EngineError, Result, StepArguments};

/// Create one payment per remaining share and accumulate fee income.
///
/// # Errors
///
/// - [`EngineError::ZeroDelegatedBalance`] if shares remain but the
///   delegated balance is zero
/// - [`EngineError::Amount`] if the shares exceed the delegated balance
pub fn resolve_delegator_rewards(mut args: StepArguments<'_>) -> Result<StepArguments<'_>> {
    let config = args.config;
    let cycle = args.cycle();
    let data = &args.cycle_data;
    let pool = args.distributable_rewards;

    if !data.shares.is_empty() && data.delegated_balance.is_zero() {
        return Err(EngineError::ZeroDelegatedBalance {
            shares: data.shares.len(),
        });
    }

    let mut payments = Vec::with_capacity(data.shares.len());
    let mut fee_income = Mutez::ZERO;
    let mut issued = Mutez::ZERO;

    for share in &data.shares {
        let gross = Fraction::ratio(share.balance, data.delegated_balance)?;
        let fee_rate = get_applicable_fee(config, &share.address);
        let fee = gross.checked_mul(fee_rate.as_fraction())?.floor_of(pool)?;
        let amount = gross
            .checked_mul(fee_rate.complement().as_fraction())?
            .floor_of(pool)?;

        tracing::trace!(
            delegator = %share.address,
            balance = %share.balance,
            %fee_rate,
            %fee,
            %amount,
            "delegator reward"
        );

        fee_income = fee_income.checked_add(fee)?;
        issued = issued.checked_add(fee)?.checked_add(amount)?;

        payments.push(DelegatorPayment {
            cycle,
            delegator: share.address.clone(),
            recipient: get_redirect_address(config, &share.address),
            delegator_balance: share.balance,
            baker_staking_balance: data.staking_balance,
            baker_cycle_rewards: data.rewards,
            fee_rate,
            amount,
            fee,
            transaction_fee: Mutez::ZERO,
            deferred_amount: Mutez::ZERO,
            note: None,
        });
    }

    tracing::debug!(
        cycle,
        payments = payments.len(),
        %fee_income,
        %issued,
        "resolved delegator rewards"
    );

    args.cycle_report.delegator_payments.extend(payments);
    args.cycle_report.fee_income = args.cycle_report.fee_income.checked_add(fee_income)?;
    args.distributable_rewards = pool.checked_sub(issued)?;
    Ok(args)
}
