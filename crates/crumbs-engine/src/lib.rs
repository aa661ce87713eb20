//! # crumbs-engine
//!
//! Reward resolution for a baker's payout cycle.
//!
//! Raw cycle data is folded through a fixed sequence of pure steps that
//! split the reward pool between delegators and the baker, apply exclusion
//! and minimum-amount policies, account for network fees and batch the
//! resulting transfers. All arithmetic is exact in mutez.
//!
//! ## Modules
//!
//! - [`client`] — collaborator interfaces (cycle data source, fee estimator)
//! - [`context`] — the value threaded through the pipeline
//! - [`helpers`] — fee/redirect lookup, overdelegation test, thresholds
//! - [`steps`] — the eleven pipeline steps
//! - [`resolver`] — the pipeline driver

pub mod client;
pub mod context;
pub mod helpers;
pub mod resolver;
pub mod steps;

pub use client::{CycleDataSource, FeeEstimator, FixedFeeEstimator};
pub use context::{ExcludedShare, StepArguments};
pub use resolver::{resolve_cycle_data, CycleResolver, ResolvedCycle};

use crumbs_types::{AmountError, Cycle, Mutez};

/// Error types for reward resolution.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The baker reports no staking balance.
    #[error("staking balance is zero")]
    ZeroStakingBalance,

    /// Delegator shares exist but the delegated balance is zero.
    #[error("delegated balance is zero with {shares} delegator shares")]
    ZeroDelegatedBalance {
        /// Number of shares left to pay.
        shares: usize,
    },

    /// A recipient share map does not sum to 100%.
    #[error("{pool} recipient shares must sum to 100, got {total}")]
    InvalidShareTotal {
        /// Which share map.
        pool: &'static str,
        /// The actual total.
        total: String,
    },

    /// The fee estimator returned the wrong number of estimates.
    #[error("fee estimator returned {actual} estimates for {expected} transfers")]
    FeeEstimateMismatch {
        /// Transfers submitted for estimation.
        expected: usize,
        /// Estimates returned.
        actual: usize,
    },

    /// The finished report does not account for every mutez of the cycle.
    #[error("unbalanced report: cycle rewards {expected}, allocated {actual}")]
    UnbalancedReport {
        /// Cycle rewards.
        expected: Mutez,
        /// Sum of all report buckets.
        actual: Mutez,
    },

    /// Amount arithmetic failed.
    #[error("amount error: {0}")]
    Amount(#[from] AmountError),

    /// The cycle data source failed.
    #[error("cycle data fetch failed: {0}")]
    Fetch(String),

    /// The fee estimator failed.
    #[error("fee estimation failed: {0}")]
    Estimate(String),

    /// A pipeline step failed.
    #[error("cycle {cycle}: step {step} failed: {source}")]
    Step {
        /// The cycle being resolved.
        cycle: Cycle,
        /// Name of the failing step.
        step: &'static str,
        /// Underlying error.
        #[source]
        source: Box<EngineError>,
    },
}

/// Convenience result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
