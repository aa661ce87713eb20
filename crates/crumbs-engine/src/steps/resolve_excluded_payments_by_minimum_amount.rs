//! Minimum payment amount.

use crumbs_types::NoteType;

use crate::helpers::get_minimum_payment_amount;
use crate::steps::partition_payments;
use crate::{Result, StepArguments};

/// Withhold payments below `payment_requirements.minimum_amount`
/// (configured in tez).
///
/// Only payments still in `delegator_payments` are scanned, so a payment
/// already withheld for its balance is never counted twice.
///
/// # Errors
///
/// - [`crate::EngineError::Amount`] on fee income overflow
pub fn resolve_excluded_payments_by_minimum_amount(
    args: StepArguments<'_>,
) -> Result<StepArguments<'_>> {
    let minimum = get_minimum_payment_amount(args.config);
    if minimum.is_zero() {
        return Ok(args);
    }
    partition_payments(args, NoteType::PaymentBelowMinimum, |payment| {
        payment.amount < minimum
    })
}
