//! Pipeline steps.
//!
//! Each step is a total function over [`StepArguments`]. [`PIPELINE`] lists
//! them in the order the driver applies them:
//!
//! 1. [`resolve_baker_rewards`] — lock the baker's bond rewards
//! 2. [`resolve_excluded_delegators`] — blacklist and overdelegation guard
//! 3. [`resolve_delegator_rewards`] — split the pool, withhold fees
//! 4. [`resolve_excluded_payments_by_minimum_delegator_balance`]
//! 5. [`resolve_excluded_payments_by_context`] — excluded shares, KT1 suppression
//! 6. [`resolve_excluded_payments_by_minimum_amount`]
//! 7. [`resolve_estimate_transaction_fees`]
//! 8. [`resolve_substract_transaction_fees`]
//! 9. [`resolve_fee_income_distribution`]
//! 10. [`resolve_bond_reward_distribution`]
//! 11. [`resolve_split_into_batches`]

mod resolve_baker_rewards;
mod resolve_bond_reward_distribution;
mod resolve_delegator_rewards;
mod resolve_estimate_transaction_fees;
mod resolve_excluded_delegators;
mod resolve_excluded_payments_by_context;
mod resolve_excluded_payments_by_minimum_amount;
mod resolve_excluded_payments_by_minimum_delegator_balance;
mod resolve_fee_income_distribution;
mod resolve_split_into_batches;
mod resolve_substract_transaction_fees;

pub use resolve_baker_rewards::resolve_baker_rewards;
pub use resolve_bond_reward_distribution::resolve_bond_reward_distribution;
pub use resolve_delegator_rewards::resolve_delegator_rewards;
pub use resolve_estimate_transaction_fees::resolve_estimate_transaction_fees;
pub use resolve_excluded_delegators::resolve_excluded_delegators;
pub use resolve_excluded_payments_by_context::resolve_excluded_payments_by_context;
pub use resolve_excluded_payments_by_minimum_amount::resolve_excluded_payments_by_minimum_amount;
pub use resolve_excluded_payments_by_minimum_delegator_balance::resolve_excluded_payments_by_minimum_delegator_balance;
pub use resolve_fee_income_distribution::resolve_fee_income_distribution;
pub use resolve_split_into_batches::resolve_split_into_batches;
pub use resolve_substract_transaction_fees::resolve_substract_transaction_fees;

use std::collections::BTreeMap;

use crumbs_types::{
    Address, Cycle, DelegatorPayment, IncomeKind, Mutez, NoteType, Percentage, SimplePayment,
    Transfer,
};

use crate::client::FeeEstimator;
use crate::helpers::validate_share_total;
use crate::{EngineError, Result, StepArguments};

/// A pipeline step.
pub type Step = for<'a> fn(StepArguments<'a>) -> Result<StepArguments<'a>>;

/// Every step, by name, in execution order.
pub const PIPELINE: [(&str, Step); 11] = [
    ("resolve_baker_rewards", resolve_baker_rewards),
    ("resolve_excluded_delegators", resolve_excluded_delegators),
    ("resolve_delegator_rewards", resolve_delegator_rewards),
    (
        "resolve_excluded_payments_by_minimum_delegator_balance",
        resolve_excluded_payments_by_minimum_delegator_balance,
    ),
    ("resolve_excluded_payments_by_context", resolve_excluded_payments_by_context),
    (
        "resolve_excluded_payments_by_minimum_amount",
        resolve_excluded_payments_by_minimum_amount,
    ),
    ("resolve_estimate_transaction_fees", resolve_estimate_transaction_fees),
    ("resolve_substract_transaction_fees", resolve_substract_transaction_fees),
    ("resolve_fee_income_distribution", resolve_fee_income_distribution),
    ("resolve_bond_reward_distribution", resolve_bond_reward_distribution),
    ("resolve_split_into_batches", resolve_split_into_batches),
];

/// Move delegator payments matching `excluded_when` out of
/// `delegator_payments`.
///
/// In accounting mode they become creditable (amount deferred, fee income
/// untouched); otherwise they are excluded with `note` and their amount
/// returns to fee income. Order is preserved in every list.
pub(crate) fn partition_payments<'a, F>(
    mut args: StepArguments<'a>,
    note: NoteType,
    mut excluded_when: F,
) -> Result<StepArguments<'a>>
where
    F: FnMut(&DelegatorPayment) -> bool,
{
    let accounting_mode = args.config.accounting_mode;
    let report = &mut args.cycle_report;
    let candidates = std::mem::take(&mut report.delegator_payments);
    let mut kept = Vec::with_capacity(candidates.len());

    for payment in candidates {
        if !excluded_when(&payment) {
            kept.push(payment);
            continue;
        }
        tracing::debug!(
            delegator = %payment.delegator,
            amount = %payment.amount,
            %note,
            accounting_mode,
            "payment withheld"
        );
        if accounting_mode {
            report.creditable_payments.push(payment.into_creditable());
        } else {
            report.fee_income = report.fee_income.checked_add(payment.amount)?;
            report.excluded_payments.push(payment.into_excluded(note)?);
        }
    }

    report.delegator_payments = kept;
    Ok(args)
}

/// Split `pool` between `shares`, rounding each payment down.
///
/// Returns the payments in address order and the undistributed residue.
///
/// # Errors
///
/// - [`crate::EngineError::InvalidShareTotal`] if the shares do not sum to 100
pub(crate) fn distribute_shares(
    cycle: Cycle,
    pool_name: &'static str,
    pool: Mutez,
    shares: &BTreeMap<Address, Percentage>,
    kind: IncomeKind,
) -> Result<(Vec<SimplePayment>, Mutez)> {
    validate_share_total(pool_name, shares)?;

    let mut payments = Vec::with_capacity(shares.len());
    let mut paid = Mutez::ZERO;
    for (recipient, share) in shares {
        let amount = share.as_fraction().floor_of(pool)?;
        paid = paid.checked_add(amount)?;
        payments.push(SimplePayment {
            cycle,
            recipient: recipient.clone(),
            amount,
            transaction_fee: Mutez::ZERO,
            kind,
        });
    }

    let residue = pool.checked_sub(paid)?;
    tracing::debug!(cycle, pool = pool_name, %paid, %residue, "distributed income");
    Ok((payments, residue))
}

/// Estimate one group of transfers submitted together.
///
/// # Errors
///
/// - [`EngineError::Estimate`] if the estimator fails
/// - [`EngineError::FeeEstimateMismatch`] if the estimator returns the wrong
///   number of fees
pub(crate) fn estimate_group(
    estimator: &dyn FeeEstimator,
    transfers: &[Transfer],
) -> Result<Vec<Mutez>> {
    let fees = estimator.estimate(transfers)?;
    if fees.len() != transfers.len() {
        return Err(EngineError::FeeEstimateMismatch {
            expected: transfers.len(),
            actual: fees.len(),
        });
    }
    Ok(fees)
}
