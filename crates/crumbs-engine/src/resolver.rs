//! The pipeline driver.
//!
//! [`resolve_cycle_data`] folds a cycle snapshot through every step in
//! [`PIPELINE`] and checks that the finished report accounts for the whole
//! cycle reward. [`CycleResolver`] pairs it with a [`CycleDataSource`] so a
//! cycle can be resolved by number.

use serde::Serialize;

use crumbs_types::{Batch, Config, Cycle, CycleData, CycleReport};

use crate::client::{CycleDataSource, FeeEstimator};
use crate::steps::PIPELINE;
use crate::{EngineError, Result, StepArguments};

/// The outcome of resolving one cycle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResolvedCycle {
    /// Categorized payments and retained balances.
    pub report: CycleReport,
    /// Transfers grouped for submission.
    pub batches: Vec<Batch>,
}

/// Run the full pipeline over `cycle_data`.
///
/// The result depends only on the arguments; resolving the same snapshot
/// twice yields identical output.
///
/// # Errors
///
/// - [`EngineError::Step`] naming the cycle and the failing step
/// - [`EngineError::UnbalancedReport`] if the report does not add up to the
///   cycle rewards
pub fn resolve_cycle_data(
    config: &Config,
    cycle: Cycle,
    cycle_data: CycleData,
    estimator: &dyn FeeEstimator,
) -> Result<ResolvedCycle> {
    let rewards = cycle_data.rewards;
    tracing::info!(
        cycle,
        baker = %config.baking_address,
        %rewards,
        shares = cycle_data.shares.len(),
        "resolving cycle"
    );

    let initial = StepArguments::new(config, estimator, cycle, cycle_data);
    let resolved = PIPELINE.iter().try_fold(initial, |args, &(name, step)| {
        tracing::trace!(cycle, step = name, "running step");
        step(args).map_err(|source| {
            tracing::error!(cycle, step = name, error = %source, "step failed");
            EngineError::Step {
                cycle,
                step: name,
                source: Box::new(source),
            }
        })
    })?;

    let allocated = resolved.total_allocated()?;
    if allocated != rewards {
        return Err(EngineError::UnbalancedReport {
            expected: rewards,
            actual: allocated,
        });
    }

    let report = resolved.cycle_report;
    tracing::info!(
        cycle,
        payments = report.delegator_payments.len(),
        excluded = report.excluded_payments.len(),
        creditable = report.creditable_payments.len(),
        batches = resolved.batches.len(),
        fee_income = %report.fee_income,
        "cycle resolved"
    );

    Ok(ResolvedCycle {
        report,
        batches: resolved.batches,
    })
}

/// Resolves cycles for one baker using injected collaborators.
pub struct CycleResolver<S, E> {
    config: Config,
    source: S,
    estimator: E,
}

impl<S: CycleDataSource, E: FeeEstimator> CycleResolver<S, E> {
    /// Create a resolver.
    pub fn new(config: Config, source: S, estimator: E) -> Self {
        Self {
            config,
            source,
            estimator,
        }
    }

    /// The payout configuration in use.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Fetch and resolve `cycle`.
    ///
    /// # Errors
    ///
    /// - [`EngineError::Fetch`] if the snapshot cannot be fetched
    /// - any error from [`resolve_cycle_data`]
    pub fn resolve_cycle(&self, cycle: Cycle) -> Result<ResolvedCycle> {
        let data = self
            .source
            .fetch_cycle_data(&self.config.baking_address, cycle)?;
        resolve_cycle_data(&self.config, cycle, data, &self.estimator)
    }
}
