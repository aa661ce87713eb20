//! Transfer batching.
//!
//! Delegator payments keep the grouping they were estimated in, so every
//! submitted batch is priced by the estimate its fees came from. Income
//! payments are estimated here, in batches of their own.

use std::collections::BTreeMap;

use crumbs_types::{Address, Batch, SimplePayment, Transfer};

use crate::steps::estimate_group;
use crate::{Result, StepArguments};

/// Group every positive transfer into batches of at most
/// `network_configuration.batch_size`.
///
/// Delegator batches follow [`StepArguments::estimated_groups`], minus the
/// payments excluded since. Delegator payments outside any estimated group
/// are chunked after them. Fee income and then bond reward payments follow
/// in separate batches, each estimated once and its fees recorded on the
/// payments.
///
/// # Errors
///
/// - [`crate::EngineError::Estimate`] if the estimator fails
/// - [`crate::EngineError::FeeEstimateMismatch`] if an income batch gets the
///   wrong number of estimates back
pub fn resolve_split_into_batches(mut args: StepArguments<'_>) -> Result<StepArguments<'_>> {
    let batch_size = args.config.network_configuration.batch_size.max(1);
    let estimator = args.estimator;
    let report = &mut args.cycle_report;

    let mut payable: BTreeMap<&Address, Transfer> = report
        .delegator_payments
        .iter()
        .filter(|payment| !payment.amount.is_zero())
        .map(|payment| (&payment.delegator, payment.transfer()))
        .collect();

    let mut batches: Vec<Batch> = Vec::new();
    for group in &args.estimated_groups {
        let batch: Batch = group
            .iter()
            .filter_map(|delegator| payable.remove(delegator))
            .collect();
        if !batch.is_empty() {
            batches.push(batch);
        }
    }

    let ungrouped: Vec<Transfer> = report
        .delegator_payments
        .iter()
        .filter_map(|payment| payable.remove(&payment.delegator))
        .collect();
    batches.extend(ungrouped.chunks(batch_size).map(<[_]>::to_vec));

    let mut income: Vec<&mut SimplePayment> = report
        .fee_income_payments
        .iter_mut()
        .chain(report.bond_reward_payments.iter_mut())
        .filter(|payment| !payment.amount.is_zero())
        .collect();
    for chunk in income.chunks_mut(batch_size) {
        let batch: Batch = chunk.iter().map(|payment| payment.transfer()).collect();
        let fees = estimate_group(estimator, &batch)?;
        for (payment, fee) in chunk.iter_mut().zip(fees) {
            payment.transaction_fee = fee;
        }
        batches.push(batch);
    }

    tracing::debug!(
        cycle = report.cycle,
        transfers = batches.iter().map(Vec::len).sum::<usize>(),
        batches = batches.len(),
        "split into batches"
    );
    args.batches = batches;
    Ok(args)
}
