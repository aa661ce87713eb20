//! Network fee settlement.
//!
//! When the baker pays, the estimated fees are charged to fee income and
//! delegator payments are left whole. Whatever fee income cannot cover is
//! recorded as the report's `transaction_fee_shortfall`.
//!
//! Otherwise each delegator's fee is deducted from its own payment, and a
//! payment that cannot cover its fee is excluded.

use crumbs_types::{Mutez, NoteType};

use crate::{Result, StepArguments};

/// Deduct estimated network fees from fee income or from the payments.
///
/// # Errors
///
/// - [`crate::EngineError::Amount`] on overflow
pub fn resolve_substract_transaction_fees(
    mut args: StepArguments<'_>,
) -> Result<StepArguments<'_>> {
    let baker_pays = args.config.payment_requirements.baker_pays_transaction_fee;
    let cycle = args.cycle();
    let report = &mut args.cycle_report;

    if baker_pays {
        let total = Mutez::checked_sum(report.delegator_payments.iter().map(|p| p.transaction_fee))?;
        let absorbed = total.min(report.fee_income);
        let shortfall = total.checked_sub(absorbed)?;
        if !shortfall.is_zero() {
            tracing::warn!(
                cycle,
                fee_income = %report.fee_income,
                transaction_fees = %total,
                %shortfall,
                "fee income does not cover transaction fees"
            );
        }
        report.fee_income = report.fee_income.checked_sub(absorbed)?;
        report.transaction_fees = report.transaction_fees.checked_add(absorbed)?;
        report.transaction_fee_shortfall =
            report.transaction_fee_shortfall.checked_add(shortfall)?;
        tracing::debug!(cycle, %absorbed, "baker pays transaction fees");
        return Ok(args);
    }

    let candidates = std::mem::take(&mut report.delegator_payments);
    let mut kept = Vec::with_capacity(candidates.len());
    for mut payment in candidates {
        let fee = payment.transaction_fee;
        if fee.is_zero() {
            kept.push(payment);
        } else if payment.amount <= fee {
            tracing::debug!(
                delegator = %payment.delegator,
                amount = %payment.amount,
                %fee,
                "transaction fee exceeds payment"
            );
            report.fee_income = report.fee_income.checked_add(payment.amount)?;
            report
                .excluded_payments
                .push(payment.into_excluded(NoteType::TransactionFeeExceedsPayment)?);
        } else {
            payment.amount = payment.amount.checked_sub(fee)?;
            report.transaction_fees = report.transaction_fees.checked_add(fee)?;
            kept.push(payment);
        }
    }
    report.delegator_payments = kept;

    tracing::debug!(
        cycle,
        transaction_fees = %report.transaction_fees,
        "delegators pay transaction fees"
    );
    Ok(args)
}
