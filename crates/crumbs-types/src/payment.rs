//! Payment records.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Address, Cycle, Mutez, Percentage};

/// Why a payment was not paid out this cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NoteType {
    /// Delegated balance below `minimum_balance`.
    BalanceBelowMinimum,
    /// Payment amount below `minimum_amount`.
    PaymentBelowMinimum,
    /// Address listed in `overdelegation.excluded_addresses`.
    Blacklisted,
    /// Dropped by the overdelegation guard.
    Overdelegated,
    /// Recipient is a contract and KT payments are suppressed.
    ContractAddressSuppressed,
    /// The payment cannot cover its own network fee.
    TransactionFeeExceedsPayment,
}

impl fmt::Display for NoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::BalanceBelowMinimum => "balance below minimum",
            Self::PaymentBelowMinimum => "payment below minimum",
            Self::Blacklisted => "excluded address",
            Self::Overdelegated => "overdelegation guard",
            Self::ContractAddressSuppressed => "contract payments suppressed",
            Self::TransactionFeeExceedsPayment => "transaction fee exceeds payment",
        };
        f.write_str(text)
    }
}

/// A delegator's payment for one cycle, with the audit fields it was
/// computed from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegatorPayment {
    /// Reward cycle.
    pub cycle: Cycle,
    /// The delegator, regardless of redirects.
    pub delegator: Address,
    /// Where the payment is sent.
    pub recipient: Address,
    /// Delegated balance.
    pub delegator_balance: Mutez,
    /// Baker's total staking balance.
    pub baker_staking_balance: Mutez,
    /// Baker's total cycle rewards.
    pub baker_cycle_rewards: Mutez,
    /// Applied service fee.
    pub fee_rate: Percentage,
    /// Amount to transfer.
    pub amount: Mutez,
    /// Amount withheld by the baker.
    pub fee: Mutez,
    /// Estimated network fee for the transfer.
    pub transaction_fee: Mutez,
    /// Amount owed as credit instead of paid (accounting mode).
    #[serde(default)]
    pub deferred_amount: Mutez,
    /// Classification of an excluded payment.
    #[serde(default)]
    pub note: Option<NoteType>,
}

impl DelegatorPayment {
    /// The transfer this payment produces.
    pub fn transfer(&self) -> Transfer {
        Transfer {
            recipient: self.recipient.clone(),
            amount: self.amount,
        }
    }

    /// Zero the payment and defer its amount as credit.
    pub fn into_creditable(self) -> Self {
        Self {
            deferred_amount: self.amount,
            amount: Mutez::ZERO,
            transaction_fee: Mutez::ZERO,
            note: None,
            ..self
        }
    }

    /// Zero the payment and mark it excluded. The forfeited amount joins the
    /// withheld fee.
    ///
    /// # Errors
    ///
    /// - [`crate::AmountError::Overflow`] if the combined fee does not fit
    pub fn into_excluded(self, note: NoteType) -> crate::Result<Self> {
        let fee = self.fee.checked_add(self.amount)?;
        Ok(Self {
            fee,
            amount: Mutez::ZERO,
            transaction_fee: Mutez::ZERO,
            deferred_amount: Mutez::ZERO,
            note: Some(note),
            ..self
        })
    }
}

/// Which pool a [`SimplePayment`] is drawn from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeKind {
    /// Fee income withheld from delegators.
    FeeIncome,
    /// The baker's own bond rewards.
    BondReward,
}

/// A payment from the baker's income to a configured recipient.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimplePayment {
    /// Reward cycle.
    pub cycle: Cycle,
    /// Destination.
    pub recipient: Address,
    /// Amount to transfer.
    pub amount: Mutez,
    /// Estimated network fee for the transfer. Informational; the baker
    /// covers it outside the reward pool.
    #[serde(default)]
    pub transaction_fee: Mutez,
    /// Source pool.
    pub kind: IncomeKind,
}

impl SimplePayment {
    /// The transfer this payment produces.
    pub fn transfer(&self) -> Transfer {
        Transfer {
            recipient: self.recipient.clone(),
            amount: self.amount,
        }
    }
}

/// A single on-chain transfer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    /// Destination.
    pub recipient: Address,
    /// Amount in mutez.
    pub amount: Mutez,
}

/// Transfers submitted together as one operation group.
pub type Batch = Vec<Transfer>;
