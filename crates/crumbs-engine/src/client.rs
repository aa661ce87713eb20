//! Collaborator interfaces.
//!
//! Network access lives outside the engine. The driver receives a
//! [`CycleDataSource`] for the per-cycle snapshot and a [`FeeEstimator`]
//! for network fees, so tests can run the full pipeline against fixtures.

use crumbs_types::{Address, Cycle, CycleData, Mutez, Transfer};

use crate::Result;

/// Default network fee charged per transfer by [`FixedFeeEstimator`].
pub const DEFAULT_TRANSFER_FEE: Mutez = Mutez::new(1_500);

/// Supplies stake totals, reward totals and delegator shares for a cycle.
pub trait CycleDataSource {
    /// Fetch the snapshot for `baker` at `cycle`.
    ///
    /// # Errors
    ///
    /// - [`crate::EngineError::Fetch`] if the snapshot cannot be retrieved
    fn fetch_cycle_data(&self, baker: &Address, cycle: Cycle) -> Result<CycleData>;
}

/// Estimates network fees for a group of transfers.
pub trait FeeEstimator {
    /// Return one fee per transfer, in the same order.
    ///
    /// # Errors
    ///
    /// - [`crate::EngineError::Estimate`] if estimation fails
    fn estimate(&self, transfers: &[Transfer]) -> Result<Vec<Mutez>>;
}

/// An estimator that charges the same fee for every transfer.
#[derive(Debug, Clone)]
pub struct FixedFeeEstimator {
    fee_per_transfer: Mutez,
}

impl FixedFeeEstimator {
    /// Charge [`DEFAULT_TRANSFER_FEE`] per transfer.
    pub const fn new() -> Self {
        Self::with_fee(DEFAULT_TRANSFER_FEE)
    }

    /// Charge `fee_per_transfer` per transfer.
    pub const fn with_fee(fee_per_transfer: Mutez) -> Self {
        Self { fee_per_transfer }
    }

    /// The fee charged per transfer.
    pub fn fee_per_transfer(&self) -> Mutez {
        self.fee_per_transfer
    }
}

impl Default for FixedFeeEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl FeeEstimator for FixedFeeEstimator {
    fn estimate(&self, transfers: &[Transfer]) -> Result<Vec<Mutez>> {
        Ok(vec![self.fee_per_transfer; transfers.len()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_estimator_one_fee_per_transfer() {
        let estimator = FixedFeeEstimator::with_fee(Mutez::new(300));
        let transfers = vec![
            Transfer {
                recipient: Address::from("tz1a"),
                amount: Mutez::new(10),
            },
            Transfer {
                recipient: Address::from("tz1b"),
                amount: Mutez::new(20),
            },
        ];
        let fees = estimator.estimate(&transfers).expect("estimate");
        assert_eq!(fees, vec![Mutez::new(300), Mutez::new(300)]);
    }

    #[test]
    fn test_default_fee() {
        assert_eq!(FixedFeeEstimator::default().fee_per_transfer(), DEFAULT_TRANSFER_FEE);
    }
}
