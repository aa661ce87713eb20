//! Per-cycle stake and reward snapshot.
//!
//! Supplied by the cycle data source before the pipeline runs. Field names
//! on the wire follow the block explorer snapshot shape.

use serde::{Deserialize, Serialize};

use crate::{Address, Mutez};

/// A delegator's balance delegated to the baker during the cycle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleShare {
    /// Delegator address.
    pub address: Address,
    /// Delegated balance in mutez.
    pub balance: Mutez,
}

impl CycleShare {
    /// Build a share.
    pub fn new(address: impl Into<Address>, balance: Mutez) -> Self {
        Self {
            address: address.into(),
            balance,
        }
    }
}

/// Aggregate stake and rewards for one baker and cycle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleData {
    /// Sum of all delegated balances.
    #[serde(rename = "cycleDelegatedBalance")]
    pub delegated_balance: Mutez,
    /// Baker's own balance plus delegated balance.
    #[serde(rename = "cycleStakingBalance")]
    pub staking_balance: Mutez,
    /// Individual delegator shares.
    #[serde(rename = "cycleShares")]
    pub shares: Vec<CycleShare>,
    /// Total rewards: blocks, endorsements and fees.
    #[serde(rename = "cycleRewards")]
    pub rewards: Mutez,
    /// Baker-set cap on frozen deposits, if any.
    #[serde(default)]
    pub frozen_deposit_limit: Option<Mutez>,
}

impl CycleData {
    /// The baker's own stake (`staking - delegated`), zero when the
    /// snapshot reports more delegated than staked balance.
    pub fn baker_balance(&self) -> Mutez {
        self.staking_balance.saturating_sub(self.delegated_balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_snapshot() {
        let json = r#"{
            "cycleDelegatedBalance": 1100,
            "cycleStakingBalance": 1250,
            "cycleShares": [{"address": "tz1a", "balance": 600}, {"address": "tz1b", "balance": 500}],
            "cycleRewards": 90,
            "frozenDepositLimit": null
        }"#;
        let data: CycleData = serde_json::from_str(json).expect("deserialize");
        assert_eq!(data.delegated_balance, Mutez::new(1100));
        assert_eq!(data.shares.len(), 2);
        assert_eq!(data.frozen_deposit_limit, None);
        assert_eq!(data.baker_balance(), Mutez::new(150));
    }

    #[test]
    fn test_baker_balance_saturates() {
        let data = CycleData {
            delegated_balance: Mutez::new(10),
            staking_balance: Mutez::new(5),
            shares: Vec::new(),
            rewards: Mutez::ZERO,
            frozen_deposit_limit: None,
        };
        assert_eq!(data.baker_balance(), Mutez::ZERO);
    }
}
