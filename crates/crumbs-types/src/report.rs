//! The cycle report accumulator.

use serde::{Deserialize, Serialize};

use crate::{Cycle, DelegatorPayment, Mutez, Result, SimplePayment, Transfer};

/// Categorized payments for one cycle, built step by step.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleReport {
    /// Reward cycle.
    pub cycle: Cycle,
    /// Payments to delegators that will be transferred.
    pub delegator_payments: Vec<DelegatorPayment>,
    /// Redistributed fee income.
    pub fee_income_payments: Vec<SimplePayment>,
    /// Redistributed bond rewards.
    pub bond_reward_payments: Vec<SimplePayment>,
    /// Payments deferred as credit (accounting mode).
    pub creditable_payments: Vec<DelegatorPayment>,
    /// Payments dropped for this cycle, each with a note.
    pub excluded_payments: Vec<DelegatorPayment>,
    /// Bond rewards retained by the baker.
    pub locked_bond_rewards: Mutez,
    /// Fee income retained by the baker.
    pub fee_income: Mutez,
    /// Network fees funded from the reward pool.
    pub transaction_fees: Mutez,
    /// Network fees the baker owes beyond its fee income. Paid from outside
    /// the reward pool, so not part of [`CycleReport::total_allocated`].
    #[serde(default)]
    pub transaction_fee_shortfall: Mutez,
}

impl CycleReport {
    /// An empty report for `cycle`.
    pub fn new(cycle: Cycle) -> Self {
        Self {
            cycle,
            ..Self::default()
        }
    }

    /// Every mutez accounted for by the report.
    ///
    /// Once the pipeline completes this equals the cycle rewards exactly.
    ///
    /// # Errors
    ///
    /// - [`crate::AmountError::Overflow`] if the total does not fit
    pub fn total_allocated(&self) -> Result<Mutez> {
        let delegators = Mutez::checked_sum(self.delegator_payments.iter().map(|p| p.amount))?;
        let credits = Mutez::checked_sum(self.creditable_payments.iter().map(|p| p.deferred_amount))?;
        let fee_income_paid = Mutez::checked_sum(self.fee_income_payments.iter().map(|p| p.amount))?;
        let bond_rewards_paid = Mutez::checked_sum(self.bond_reward_payments.iter().map(|p| p.amount))?;

        Mutez::checked_sum([
            delegators,
            credits,
            fee_income_paid,
            bond_rewards_paid,
            self.locked_bond_rewards,
            self.fee_income,
            self.transaction_fees,
        ])
    }

    /// Transfers with a positive amount, in submission order: delegators,
    /// then fee income, then bond rewards.
    pub fn payable_transfers(&self) -> Vec<Transfer> {
        self.delegator_payments
            .iter()
            .map(DelegatorPayment::transfer)
            .chain(self.fee_income_payments.iter().map(SimplePayment::transfer))
            .chain(self.bond_reward_payments.iter().map(SimplePayment::transfer))
            .filter(|transfer| !transfer.amount.is_zero())
            .collect()
    }
}
