//! Delegator exclusion before the reward split.
//!
//! Blacklisted addresses are always removed. With the overdelegation guard
//! on, delegators are then removed largest balance first (ties broken by
//! address) until the staking balance, capped by the frozen-deposit limit,
//! covers at least 10% of what remains delegated. Removed balances
//! leave the delegated total, so their share is redistributed to the
//! remaining delegators.

use std::collections::{BTreeSet, HashSet};

use crumbs_types::{Address, CycleShare, Mutez, NoteType};

use crate::context::ExcludedShare;
use crate::helpers::is_overdelegated;
use crate::{Result, StepArguments};

/// Filter `cycle_data.shares` and record the removed shares.
///
/// # Errors
///
/// - [`crate::EngineError::Amount`] if removed balances exceed the delegated total
pub fn resolve_excluded_delegators(mut args: StepArguments<'_>) -> Result<StepArguments<'_>> {
    let config = args.config;
    let blacklist: HashSet<&Address> = config.overdelegation.excluded_addresses.iter().collect();

    let (blacklisted, mut eligible): (Vec<CycleShare>, Vec<CycleShare>) =
        std::mem::take(&mut args.cycle_data.shares)
            .into_iter()
            .partition(|share| blacklist.contains(&share.address));

    let mut delegated = args
        .cycle_data
        .delegated_balance
        .checked_sub(Mutez::checked_sum(blacklisted.iter().map(|s| s.balance))?)?;

    let mut excluded: Vec<ExcludedShare> = blacklisted
        .into_iter()
        .map(|share| ExcludedShare {
            share,
            note: NoteType::Blacklisted,
        })
        .collect();

    if config.overdelegation.guard {
        let staking = args.cycle_data.staking_balance;
        let limit = args.cycle_data.frozen_deposit_limit;

        if is_overdelegated(staking, delegated, limit) {
            tracing::warn!(
                cycle = args.cycle(),
                %staking,
                %delegated,
                "baker is overdelegated, excluding largest delegators"
            );

            let mut order: Vec<usize> = (0..eligible.len()).collect();
            order.sort_by(|&a, &b| {
                eligible[b]
                    .balance
                    .cmp(&eligible[a].balance)
                    .then_with(|| eligible[a].address.cmp(&eligible[b].address))
            });

            let mut removed = BTreeSet::new();
            for index in order {
                if !is_overdelegated(staking, delegated, limit) {
                    break;
                }
                delegated = delegated.checked_sub(eligible[index].balance)?;
                removed.insert(index);
            }

            let (dropped, kept): (Vec<_>, Vec<_>) = eligible
                .into_iter()
                .enumerate()
                .partition(|(index, _)| removed.contains(index));
            eligible = kept.into_iter().map(|(_, share)| share).collect();
            excluded.extend(dropped.into_iter().map(|(_, share)| ExcludedShare {
                share,
                note: NoteType::Overdelegated,
            }));
        }
    }

    tracing::debug!(
        cycle = args.cycle(),
        eligible = eligible.len(),
        excluded = excluded.len(),
        %delegated,
        "resolved excluded delegators"
    );

    args.cycle_data.shares = eligible;
    args.cycle_data.delegated_balance = delegated;
    args.excluded_shares.extend(excluded);
    Ok(args)
}
