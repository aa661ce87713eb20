//! The value threaded through the pipeline.
//!
//! Each step takes a [`StepArguments`] by value and returns the next one;
//! no step observes another step's partial state.

use crumbs_types::{Address, Batch, Config, Cycle, CycleData, CycleReport, CycleShare, Mutez, NoteType};

use crate::client::FeeEstimator;
use crate::Result;

/// A delegator share removed before rewards are split.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExcludedShare {
    /// The removed share.
    pub share: CycleShare,
    /// Why it was removed.
    pub note: NoteType,
}

/// Pipeline state for one cycle.
#[derive(Clone)]
pub struct StepArguments<'a> {
    /// Payout configuration.
    pub config: &'a Config,
    /// Injected network fee estimator.
    pub estimator: &'a dyn FeeEstimator,
    /// Cycle snapshot; shares and delegated balance shrink when delegators
    /// are excluded.
    pub cycle_data: CycleData,
    /// Report accumulated so far.
    pub cycle_report: CycleReport,
    /// Rewards not yet assigned to any bucket.
    pub distributable_rewards: Mutez,
    /// Shares removed by the exclusion step.
    pub excluded_shares: Vec<ExcludedShare>,
    /// Delegators whose transfers were estimated together, one entry per
    /// estimator call.
    pub estimated_groups: Vec<Vec<Address>>,
    /// Transfer batches, filled by the final step.
    pub batches: Vec<Batch>,
}

impl<'a> StepArguments<'a> {
    /// Initial state: the whole cycle reward is distributable.
    pub fn new(
        config: &'a Config,
        estimator: &'a dyn FeeEstimator,
        cycle: Cycle,
        cycle_data: CycleData,
    ) -> Self {
        Self {
            config,
            estimator,
            distributable_rewards: cycle_data.rewards,
            cycle_data,
            cycle_report: CycleReport::new(cycle),
            excluded_shares: Vec::new(),
            estimated_groups: Vec::new(),
            batches: Vec::new(),
        }
    }

    /// The cycle being resolved.
    pub fn cycle(&self) -> Cycle {
        self.cycle_report.cycle
    }

    /// Report buckets plus the unassigned remainder. Equal to the cycle
    /// rewards after every step.
    ///
    /// # Errors
    ///
    /// - [`crate::EngineError::Amount`] on overflow
    pub fn total_allocated(&self) -> Result<Mutez> {
        Ok(self
            .cycle_report
            .total_allocated()?
            .checked_add(self.distributable_rewards)?)
    }
}
