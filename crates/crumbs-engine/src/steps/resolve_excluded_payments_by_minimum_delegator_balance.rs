//! Minimum delegator balance.

use crumbs_types::NoteType;

use crate::helpers::get_minimum_delegator_balance;
use crate::steps::partition_payments;
use crate::{Result, StepArguments};

/// Withhold payments to delegators whose balance is below
/// `delegator_requirements.minimum_balance` (configured in tez).
///
/// # Errors
///
/// - [`crate::EngineError::Amount`] on fee income overflow
pub fn resolve_excluded_payments_by_minimum_delegator_balance(
    args: StepArguments<'_>,
) -> Result<StepArguments<'_>> {
    let minimum = get_minimum_delegator_balance(args.config);
    if minimum.is_zero() {
        return Ok(args);
    }
    partition_payments(args, NoteType::BalanceBelowMinimum, |payment| {
        payment.delegator_balance < minimum
    })
}
