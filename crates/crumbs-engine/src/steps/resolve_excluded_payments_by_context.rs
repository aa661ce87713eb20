//! Context-based exclusions.
//!
//! Shares removed before the split are recorded here as zero-amount
//! excluded payments so every delegator of the cycle shows up in the
//! report. Payments to originated contracts are then withheld when
//! `network_configuration.suppress_kt_payments` is set.

use crumbs_types::{DelegatorPayment, Mutez, NoteType};

use crate::helpers::{get_applicable_fee, get_redirect_address};
use crate::steps::partition_payments;
use crate::{Result, StepArguments};

/// Record excluded shares and suppress contract recipients.
///
/// # Errors
///
/// - [`crate::EngineError::Amount`] on fee income overflow
pub fn resolve_excluded_payments_by_context(
    mut args: StepArguments<'_>,
) -> Result<StepArguments<'_>> {
    let config = args.config;
    let cycle = args.cycle();
    let data = &args.cycle_data;

    let recorded: Vec<DelegatorPayment> = args
        .excluded_shares
        .iter()
        .map(|excluded| DelegatorPayment {
            cycle,
            delegator: excluded.share.address.clone(),
            recipient: get_redirect_address(config, &excluded.share.address),
            delegator_balance: excluded.share.balance,
            baker_staking_balance: data.staking_balance,
            baker_cycle_rewards: data.rewards,
            fee_rate: get_applicable_fee(config, &excluded.share.address),
            amount: Mutez::ZERO,
            fee: Mutez::ZERO,
            transaction_fee: Mutez::ZERO,
            deferred_amount: Mutez::ZERO,
            note: Some(excluded.note),
        })
        .collect();
    args.cycle_report.excluded_payments.extend(recorded);

    if !config.network_configuration.suppress_kt_payments {
        return Ok(args);
    }
    partition_payments(args, NoteType::ContractAddressSuppressed, |payment| {
        payment.recipient.is_contract()
    })
}
