//! Network fee estimation.

use crumbs_types::{Address, Transfer};

use crate::steps::estimate_group;
use crate::{Result, StepArguments};

/// Attach an estimated network fee to every delegator payment with a
/// positive amount.
///
/// Payments are submitted to the estimator in groups of at most
/// `network_configuration.batch_size`. Each group is recorded in
/// [`StepArguments::estimated_groups`] and later submitted as one batch.
/// Zero-amount payments are never transferred and keep a zero fee.
///
/// # Errors
///
/// - [`crate::EngineError::Estimate`] if the estimator fails
/// - [`crate::EngineError::FeeEstimateMismatch`] if a group gets the wrong
///   number of estimates back
pub fn resolve_estimate_transaction_fees(
    mut args: StepArguments<'_>,
) -> Result<StepArguments<'_>> {
    let batch_size = args.config.network_configuration.batch_size.max(1);
    let estimator = args.estimator;
    let payments = &mut args.cycle_report.delegator_payments;

    let payable: Vec<usize> = payments
        .iter()
        .enumerate()
        .filter(|(_, payment)| !payment.amount.is_zero())
        .map(|(index, _)| index)
        .collect();

    let mut groups = Vec::new();
    for group in payable.chunks(batch_size) {
        let transfers: Vec<Transfer> = group.iter().map(|&i| payments[i].transfer()).collect();
        let fees = estimate_group(estimator, &transfers)?;
        for (&index, fee) in group.iter().zip(fees) {
            payments[index].transaction_fee = fee;
        }
        groups.push(
            group
                .iter()
                .map(|&i| payments[i].delegator.clone())
                .collect::<Vec<Address>>(),
        );
    }
    args.estimated_groups = groups;

    tracing::debug!(
        cycle = args.cycle_report.cycle,
        estimated = payable.len(),
        groups = args.estimated_groups.len(),
        batch_size,
        "estimated transaction fees"
    );
    Ok(args)
}
