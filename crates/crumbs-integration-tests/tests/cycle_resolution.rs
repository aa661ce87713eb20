//! Integration test: resolving a whole cycle.
//!
//! A baker with 2,000 tez of its own stake and 8,000 tez delegated by five
//! delegators earns 500 tez. The baker's bond share is 100 tez and the
//! delegators split the remaining 400 tez at a 10% fee:
//!
//! | delegator | balance | gross | amount | fee  |
//! |-----------|---------|-------|--------|------|
//! | tz1d1     | 4,000   | 200   | 180    | 20   |
//! | tz1d2     | 2,500   | 125   | 112.5  | 12.5 |
//! | tz1d3     | 1,000   | 50    | 45     | 5    |
//! | tz1d4     | 400     | 20    | 18     | 2    |
//! | tz1d5     | 100     | 5     | 4.5    | 0.5  |

use std::cell::RefCell;
use std::collections::BTreeMap;

use crumbs_engine::{
    resolve_cycle_data, CycleDataSource, CycleResolver, EngineError, FeeEstimator,
    FixedFeeEstimator,
};
use crumbs_types::{
    Address, Config, Cycle, CycleData, CycleShare, IncomeKind, Mutez, Percentage, Transfer,
};

const CYCLE: Cycle = 560;

fn config() -> Config {
    Config::new("tz1baker", Percentage::from_percent(10).expect("fee"))
}

fn snapshot() -> CycleData {
    CycleData {
        delegated_balance: Mutez::from_tez(8_000),
        staking_balance: Mutez::from_tez(10_000),
        shares: vec![
            CycleShare::new("tz1d1", Mutez::from_tez(4_000)),
            CycleShare::new("tz1d2", Mutez::from_tez(2_500)),
            CycleShare::new("tz1d3", Mutez::from_tez(1_000)),
            CycleShare::new("tz1d4", Mutez::from_tez(400)),
            CycleShare::new("tz1d5", Mutez::from_tez(100)),
        ],
        rewards: Mutez::from_tez(500),
        frozen_deposit_limit: None,
    }
}

/// Charges nothing, so amounts can be checked against the table above.
fn free() -> FixedFeeEstimator {
    FixedFeeEstimator::with_fee(Mutez::ZERO)
}

struct MemorySource(BTreeMap<Cycle, CycleData>);

impl CycleDataSource for MemorySource {
    fn fetch_cycle_data(&self, _baker: &Address, cycle: Cycle) -> crumbs_engine::Result<CycleData> {
        self.0
            .get(&cycle)
            .cloned()
            .ok_or_else(|| EngineError::Fetch(format!("cycle {cycle} not indexed")))
    }
}

/// Charges 1,500 mutez per transfer and remembers every group it priced.
#[derive(Default)]
struct RecordingEstimator {
    groups: RefCell<Vec<Vec<Address>>>,
}

impl FeeEstimator for RecordingEstimator {
    fn estimate(&self, transfers: &[Transfer]) -> crumbs_engine::Result<Vec<Mutez>> {
        self.groups
            .borrow_mut()
            .push(transfers.iter().map(|t| t.recipient.clone()).collect());
        Ok(vec![Mutez::new(1_500); transfers.len()])
    }
}

/// Returns one estimate too few.
struct BrokenEstimator;

impl FeeEstimator for BrokenEstimator {
    fn estimate(&self, transfers: &[Transfer]) -> crumbs_engine::Result<Vec<Mutez>> {
        Ok(vec![Mutez::ZERO; transfers.len().saturating_sub(1)])
    }
}

#[test]
fn test_full_cycle_without_fees() {
    let resolved = resolve_cycle_data(&config(), CYCLE, snapshot(), &free()).expect("resolve");
    let report = &resolved.report;

    let amounts: Vec<Mutez> = report.delegator_payments.iter().map(|p| p.amount).collect();
    assert_eq!(
        amounts,
        vec![
            Mutez::from_tez(180),
            Mutez::new(112_500_000),
            Mutez::from_tez(45),
            Mutez::from_tez(18),
            Mutez::new(4_500_000),
        ]
    );
    assert_eq!(report.locked_bond_rewards, Mutez::from_tez(100));
    assert_eq!(report.fee_income, Mutez::from_tez(40));
    assert_eq!(report.transaction_fees, Mutez::ZERO);
    assert!(report.excluded_payments.is_empty());
    assert!(report.creditable_payments.is_empty());
    assert_eq!(report.total_allocated().expect("total"), Mutez::from_tez(500));

    assert_eq!(resolved.batches.len(), 1);
    assert_eq!(resolved.batches[0].len(), 5);
}

#[test]
fn test_delegators_pay_network_fees() {
    let resolved =
        resolve_cycle_data(&config(), CYCLE, snapshot(), &FixedFeeEstimator::new()).expect("resolve");
    let report = &resolved.report;

    assert_eq!(report.delegator_payments[0].amount, Mutez::new(179_998_500));
    assert_eq!(report.delegator_payments[0].transaction_fee, Mutez::new(1_500));
    assert_eq!(report.transaction_fees, Mutez::new(7_500));
    assert_eq!(report.fee_income, Mutez::from_tez(40));
    assert_eq!(report.total_allocated().expect("total"), Mutez::from_tez(500));
}

#[test]
fn test_baker_pays_network_fees() {
    let mut config = config();
    config.payment_requirements.baker_pays_transaction_fee = true;
    let resolved =
        resolve_cycle_data(&config, CYCLE, snapshot(), &FixedFeeEstimator::new()).expect("resolve");
    let report = &resolved.report;

    assert_eq!(report.delegator_payments[0].amount, Mutez::from_tez(180));
    assert_eq!(report.transaction_fees, Mutez::new(7_500));
    assert_eq!(report.fee_income, Mutez::new(39_992_500));
    assert_eq!(report.total_allocated().expect("total"), Mutez::from_tez(500));
}

#[test]
fn test_baker_fee_shortfall_reported() {
    let mut config = config();
    config.payment_requirements.baker_pays_transaction_fee = true;
    let estimator = FixedFeeEstimator::with_fee(Mutez::from_tez(10));
    let resolved = resolve_cycle_data(&config, CYCLE, snapshot(), &estimator).expect("resolve");
    let report = &resolved.report;

    // Five transfers at 10 tez against 40 tez of fee income.
    assert_eq!(report.fee_income, Mutez::ZERO);
    assert_eq!(report.transaction_fees, Mutez::from_tez(40));
    assert_eq!(report.transaction_fee_shortfall, Mutez::from_tez(10));
    assert_eq!(report.total_allocated().expect("total"), Mutez::from_tez(500));
}

#[test]
fn test_resolution_is_idempotent() {
    let mut config = config();
    config.overdelegation.excluded_addresses = vec![Address::from("tz1d3")];
    config.network_configuration.batch_size = 3;
    let estimator = FixedFeeEstimator::new();

    let first = resolve_cycle_data(&config, CYCLE, snapshot(), &estimator).expect("first");
    let second = resolve_cycle_data(&config, CYCLE, snapshot(), &estimator).expect("second");
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).expect("json"),
        serde_json::to_string(&second).expect("json")
    );
}

#[test]
fn test_income_redistribution_and_batching() {
    let mut config = config();
    config.network_configuration.batch_size = 2;
    config
        .income_recipients
        .fee_income
        .insert(Address::from("tz1ops"), Percentage::HUNDRED);
    config
        .income_recipients
        .bond_rewards
        .insert(Address::from("tz1cold"), Percentage::HUNDRED);

    let resolved = resolve_cycle_data(&config, CYCLE, snapshot(), &free()).expect("resolve");
    let report = &resolved.report;

    assert_eq!(report.fee_income_payments.len(), 1);
    assert_eq!(report.fee_income_payments[0].amount, Mutez::from_tez(40));
    assert_eq!(report.fee_income_payments[0].kind, IncomeKind::FeeIncome);
    assert_eq!(report.bond_reward_payments[0].amount, Mutez::from_tez(100));
    assert_eq!(report.fee_income, Mutez::ZERO);
    assert_eq!(report.locked_bond_rewards, Mutez::ZERO);

    // Delegators in their estimated pairs, income transfers batched apart.
    let sizes: Vec<usize> = resolved.batches.iter().map(Vec::len).collect();
    assert_eq!(sizes, vec![2, 2, 1, 2]);
    assert_eq!(resolved.batches[2][0].recipient, Address::from("tz1d5"));
    assert_eq!(resolved.batches[3][0].recipient, Address::from("tz1ops"));
    assert_eq!(resolved.batches[3][1].recipient, Address::from("tz1cold"));

    let batched = resolved
        .batches
        .iter()
        .flatten()
        .try_fold(Mutez::ZERO, |sum, t| sum.checked_add(t.amount))
        .expect("sum");
    assert_eq!(batched, Mutez::from_tez(500));
}

#[test]
fn test_submitted_batches_are_the_estimated_batches() {
    let mut config = config();
    config.network_configuration.batch_size = 2;
    config
        .income_recipients
        .fee_income
        .insert(Address::from("tz1ops"), Percentage::HUNDRED);
    let mut data = snapshot();
    data.shares.truncate(3);
    let estimator = RecordingEstimator::default();

    let resolved = resolve_cycle_data(&config, CYCLE, data, &estimator).expect("resolve");

    let submitted: Vec<Vec<Address>> = resolved
        .batches
        .iter()
        .map(|batch| batch.iter().map(|t| t.recipient.clone()).collect())
        .collect();
    assert_eq!(*estimator.groups.borrow(), submitted);
    assert_eq!(submitted.len(), 3);
    assert_eq!(submitted[2], vec![Address::from("tz1ops")]);
    assert_eq!(
        resolved.report.fee_income_payments[0].transaction_fee,
        Mutez::new(1_500)
    );
}

#[test]
fn test_rounding_conserves_every_mutez() {
    let mut config = Config::new("tz1baker", "7.5".parse().expect("fee"));
    for name in ["tz1x", "tz1y", "tz1z"] {
        config
            .income_recipients
            .fee_income
            .insert(Address::from(name), "33.3333".parse().expect("share"));
    }
    config
        .income_recipients
        .fee_income
        .insert(Address::from("tz1w"), "0.0001".parse().expect("share"));
    config
        .income_recipients
        .bond_rewards
        .insert(Address::from("tz1cold"), "66.6667".parse().expect("share"));
    config
        .income_recipients
        .bond_rewards
        .insert(Address::from("tz1hot"), "33.3333".parse().expect("share"));

    for rewards in [1_u128, 7, 1_000, 999_999, 123_456_789, 31_415_926_535] {
        let data = CycleData {
            delegated_balance: Mutez::new(1_000_000),
            staking_balance: Mutez::new(1_234_567),
            shares: vec![
                CycleShare::new("tz1a", Mutez::new(333_333)),
                CycleShare::new("tz1b", Mutez::new(333_333)),
                CycleShare::new("tz1c", Mutez::new(333_334)),
            ],
            rewards: Mutez::new(rewards),
            frozen_deposit_limit: None,
        };
        let resolved = resolve_cycle_data(&config, CYCLE, data, &free()).expect("resolve");
        assert_eq!(
            resolved.report.total_allocated().expect("total"),
            Mutez::new(rewards),
            "rewards {rewards}"
        );
    }
}

#[test]
fn test_resolver_fetches_snapshot() {
    let mut cycles = BTreeMap::new();
    cycles.insert(CYCLE, snapshot());
    let resolver = CycleResolver::new(config(), MemorySource(cycles), free());

    let resolved = resolver.resolve_cycle(CYCLE).expect("resolve");
    assert_eq!(resolved.report.cycle, CYCLE);
    assert_eq!(resolved.report.delegator_payments.len(), 5);

    let err = resolver.resolve_cycle(CYCLE + 1).err();
    assert!(matches!(err, Some(EngineError::Fetch(ref msg)) if msg.contains("561")));
}

#[test]
fn test_snapshot_json_shape() {
    let json = r#"{
        "cycleDelegatedBalance": 8000000000,
        "cycleStakingBalance": 10000000000,
        "cycleShares": [
            { "address": "tz1d1", "balance": 4000000000 },
            { "address": "tz1d2", "balance": 2500000000 },
            { "address": "tz1d3", "balance": 1000000000 },
            { "address": "tz1d4", "balance": 400000000 },
            { "address": "tz1d5", "balance": 100000000 }
        ],
        "cycleRewards": 500000000
    }"#;
    let data: CycleData = serde_json::from_str(json).expect("snapshot");
    assert_eq!(data, snapshot());

    let resolved = resolve_cycle_data(&config(), CYCLE, data, &free()).expect("resolve");
    let value = serde_json::to_value(&resolved).expect("json");
    assert_eq!(value["report"]["cycle"], CYCLE);
    assert_eq!(value["report"]["fee_income"], 40_000_000);
    assert_eq!(value["report"]["delegator_payments"][1]["fee_rate"], "10");
    assert_eq!(value["batches"][0][0]["recipient"], "tz1d1");
}

#[test]
fn test_fatal_error_names_cycle_and_step() {
    let mut data = snapshot();
    data.staking_balance = Mutez::ZERO;
    let err = resolve_cycle_data(&config(), CYCLE, data, &free()).err();
    assert!(matches!(
        err,
        Some(EngineError::Step { cycle: CYCLE, step: "resolve_baker_rewards", ref source })
            if matches!(**source, EngineError::ZeroStakingBalance)
    ));
}

#[test]
fn test_delegated_above_staking_pays_delegators_only() {
    let mut data = snapshot();
    data.delegated_balance = Mutez::from_tez(20_000);
    let resolved = resolve_cycle_data(&config(), CYCLE, data, &free()).expect("resolve");
    let report = &resolved.report;

    // No own stake, so nothing is locked. Shares cover 8,000 of the
    // 20,000 tez delegated: 180 tez paid, 20 tez fees plus the 300 tez
    // remainder as fee income.
    assert_eq!(report.locked_bond_rewards, Mutez::ZERO);
    assert_eq!(report.fee_income, Mutez::from_tez(320));
    assert_eq!(report.total_allocated().expect("total"), Mutez::from_tez(500));
}

#[test]
fn test_fee_share_total_error() {
    let mut config = config();
    config
        .income_recipients
        .fee_income
        .insert(Address::from("tz1ops"), Percentage::from_percent(50).expect("share"));
    config
        .income_recipients
        .fee_income
        .insert(Address::from("tz1dev"), Percentage::from_percent(40).expect("share"));

    let err = resolve_cycle_data(&config, CYCLE, snapshot(), &free()).err();
    assert!(matches!(
        err,
        Some(EngineError::Step { step: "resolve_fee_income_distribution", ref source, .. })
            if matches!(**source, EngineError::InvalidShareTotal { pool: "fee income", .. })
    ));
}

#[test]
fn test_estimator_mismatch_error() {
    let err = resolve_cycle_data(&config(), CYCLE, snapshot(), &BrokenEstimator).err();
    assert!(matches!(
        err,
        Some(EngineError::Step { step: "resolve_estimate_transaction_fees", ref source, .. })
            if matches!(**source, EngineError::FeeEstimateMismatch { expected: 5, actual: 4 })
    ));
}
