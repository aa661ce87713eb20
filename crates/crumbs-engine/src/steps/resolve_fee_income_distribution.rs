//! Fee income redistribution.

use crumbs_types::{IncomeKind, Mutez};

use crate::steps::distribute_shares;
use crate::{Result, StepArguments};

/// Pay fee income out to `income_recipients.fee_income`.
///
/// Any rounding remainder still in the distributable pool is folded into
/// fee income first. With no recipients configured the baker keeps it all;
/// otherwise each recipient gets its share rounded down and only the
/// rounding residue stays with the baker.
///
/// # Errors
///
/// - [`crate::EngineError::InvalidShareTotal`] if the shares do not sum to 100
pub fn resolve_fee_income_distribution(mut args: StepArguments<'_>) -> Result<StepArguments<'_>> {
    let config = args.config;
    let cycle = args.cycle();
    let remainder = std::mem::replace(&mut args.distributable_rewards, Mutez::ZERO);
    let report = &mut args.cycle_report;
    report.fee_income = report.fee_income.checked_add(remainder)?;

    let shares = &config.income_recipients.fee_income;
    if shares.is_empty() {
        return Ok(args);
    }

    let (payments, residue) = distribute_shares(
        cycle,
        "fee income",
        report.fee_income,
        shares,
        IncomeKind::FeeIncome,
    )?;
    report.fee_income_payments.extend(payments);
    report.fee_income = residue;
    Ok(args)
}
