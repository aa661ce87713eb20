//! Payout configuration.
//!
//! The configuration arrives pre-validated; this module only describes its
//! shape. Decimal values (fees, shares, tez thresholds) are written as
//! strings so they parse exactly, e.g. `default_fee = "7.5"`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Address, Percentage, Tez, MAX_BATCH_SIZE};

/// Complete payout configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// The baker whose rewards are being paid out.
    pub baking_address: Address,
    /// Service fee applied to delegators without an override.
    pub default_fee: Percentage,
    /// Record sub-threshold payments as credit instead of dropping them.
    #[serde(default)]
    pub accounting_mode: bool,
    /// Per-delegator fee and recipient overrides.
    #[serde(default)]
    pub delegator_overrides: BTreeMap<Address, DelegatorOverride>,
    /// Delegator eligibility requirements.
    #[serde(default)]
    pub delegator_requirements: DelegatorRequirements,
    /// Recipients of bond rewards and fee income.
    #[serde(default)]
    pub income_recipients: IncomeRecipients,
    /// Network-level settings.
    #[serde(default)]
    pub network_configuration: NetworkConfiguration,
    /// Overdelegation protection.
    #[serde(default)]
    pub overdelegation: OverdelegationConfig,
    /// Payment requirements.
    #[serde(default)]
    pub payment_requirements: PaymentRequirements,
}

/// Override for a single delegator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegatorOverride {
    /// Fee replacing `default_fee`.
    #[serde(default)]
    pub fee: Option<Percentage>,
    /// Address receiving the payment instead of the delegator.
    #[serde(default)]
    pub recipient: Option<Address>,
}

/// Delegator eligibility requirements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegatorRequirements {
    /// Minimum delegated balance in tez.
    #[serde(default)]
    pub minimum_balance: Option<Tez>,
}

/// Share maps (address → percentage, summing to 100).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeRecipients {
    /// Recipients of the baker's own (bond) rewards.
    #[serde(default)]
    pub bond_rewards: BTreeMap<Address, Percentage>,
    /// Recipients of the fee income withheld from delegators.
    #[serde(default)]
    pub fee_income: BTreeMap<Address, Percentage>,
}

/// Network-level settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfiguration {
    /// Do not pay originated contract (`KT1`) recipients.
    #[serde(default)]
    pub suppress_kt_payments: bool,
    /// Maximum transfers per operation group.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

/// Overdelegation protection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverdelegationConfig {
    /// Drop delegators while the baker is overdelegated.
    #[serde(default)]
    pub guard: bool,
    /// Delegators never paid; their share is redistributed.
    #[serde(default)]
    pub excluded_addresses: Vec<Address>,
}

/// Payment requirements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRequirements {
    /// The baker pays network fees out of fee income.
    #[serde(default)]
    pub baker_pays_transaction_fee: bool,
    /// Minimum payment in tez.
    #[serde(default)]
    pub minimum_amount: Option<Tez>,
}

fn default_batch_size() -> usize {
    MAX_BATCH_SIZE
}

impl Default for NetworkConfiguration {
    fn default() -> Self {
        Self {
            suppress_kt_payments: false,
            batch_size: default_batch_size(),
        }
    }
}

impl Config {
    /// A configuration with every optional section at its default.
    pub fn new(baking_address: impl Into<Address>, default_fee: Percentage) -> Self {
        Self {
            baking_address: baking_address.into(),
            default_fee,
            accounting_mode: false,
            delegator_overrides: BTreeMap::new(),
            delegator_requirements: DelegatorRequirements::default(),
            income_recipients: IncomeRecipients::default(),
            network_configuration: NetworkConfiguration::default(),
            overdelegation: OverdelegationConfig::default(),
            payment_requirements: PaymentRequirements::default(),
        }
    }
}
