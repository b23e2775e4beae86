//! Core domain types for stake aggregation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Address-keyed stake records, as returned by a single stake source.
pub type AccountsMap = HashMap<String, AccountStakeRecord>;

/// The four stake-holding mechanisms - exhaustive match required (no default case).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StakeSource {
    /// Legacy delegation (frozen, waiting + active balances).
    Legacy,
    /// Direct validator staking (active + top-up).
    Validators,
    /// Pooled delegation.
    Delegators,
    /// Locked-token staking program.
    LkMex,
}

impl StakeSource {
    /// Fixed order in which sources are folded into the merged map.
    pub const MERGE_ORDER: [StakeSource; 4] = [
        StakeSource::Legacy,
        StakeSource::Validators,
        StakeSource::Delegators,
        StakeSource::LkMex,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            StakeSource::Legacy => "legacy delegators",
            StakeSource::Validators => "validators",
            StakeSource::Delegators => "delegators",
            StakeSource::LkMex => "lkMex stakers",
        }
    }

    /// Components whose values this source owns.
    pub fn components(&self) -> &'static [StakeComponent] {
        match self {
            StakeSource::Legacy => &[StakeComponent::LegacyWaiting, StakeComponent::LegacyActive],
            StakeSource::Validators => {
                &[StakeComponent::ValidatorActive, StakeComponent::ValidatorTopUp]
            }
            StakeSource::Delegators => &[StakeComponent::Delegation],
            StakeSource::LkMex => &[StakeComponent::LkMexStake],
        }
    }
}

impl std::fmt::Display for StakeSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A single balance field of an [`AccountStakeRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StakeComponent {
    LegacyWaiting,
    LegacyActive,
    ValidatorActive,
    ValidatorTopUp,
    Delegation,
    LkMexStake,
}

impl StakeComponent {
    /// Components summed into `total_stake`, in summation order.
    ///
    /// The locked-token stake is carried on the record but kept out of the
    /// total.
    pub const TOTALED: [StakeComponent; 5] = [
        StakeComponent::LegacyWaiting,
        StakeComponent::LegacyActive,
        StakeComponent::ValidatorActive,
        StakeComponent::ValidatorTopUp,
        StakeComponent::Delegation,
    ];

    /// Source that owns this component.
    pub fn source(&self) -> StakeSource {
        match self {
            StakeComponent::LegacyWaiting | StakeComponent::LegacyActive => StakeSource::Legacy,
            StakeComponent::ValidatorActive | StakeComponent::ValidatorTopUp => {
                StakeSource::Validators
            }
            StakeComponent::Delegation => StakeSource::Delegators,
            StakeComponent::LkMexStake => StakeSource::LkMex,
        }
    }

    pub fn counts_toward_total(&self) -> bool {
        Self::TOTALED.contains(self)
    }
}

/// Per-address stake values gathered from all sources.
///
/// Balances are decimal-string integers in minimal token units. The `*_num`
/// fields are approximate mirrors supplied by the owning source.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccountStakeRecord {
    pub address: String,

    pub legacy_delegation_waiting: String,
    pub legacy_delegation_active: String,

    pub validator_active: String,
    pub validator_active_num: f64,
    pub validator_top_up: String,
    pub validator_top_up_num: f64,

    pub delegation: String,
    pub delegation_num: f64,

    pub lk_mex_stake: String,
    pub lk_mex_stake_num: f64,

    pub total_stake: String,
    pub total_stake_num: f64,
}

impl AccountStakeRecord {
    /// Creates an empty record for `address`.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Default::default()
        }
    }

    /// Raw decimal string held for `component`.
    pub fn balance(&self, component: StakeComponent) -> &str {
        match component {
            StakeComponent::LegacyWaiting => &self.legacy_delegation_waiting,
            StakeComponent::LegacyActive => &self.legacy_delegation_active,
            StakeComponent::ValidatorActive => &self.validator_active,
            StakeComponent::ValidatorTopUp => &self.validator_top_up,
            StakeComponent::Delegation => &self.delegation,
            StakeComponent::LkMexStake => &self.lk_mex_stake,
        }
    }

    /// Balances that make up `total_stake`, in summation order.
    pub fn totaled_balances(&self) -> [&str; 5] {
        StakeComponent::TOTALED.map(|c| self.balance(c))
    }

    /// Overwrites the fields owned by `source` with the values from `other`.
    ///
    /// Fields owned by other sources, the address, and the totals are left
    /// untouched.
    pub fn absorb(&mut self, source: StakeSource, other: &AccountStakeRecord) {
        match source {
            StakeSource::Legacy => {
                self.legacy_delegation_waiting = other.legacy_delegation_waiting.clone();
                self.legacy_delegation_active = other.legacy_delegation_active.clone();
            }
            StakeSource::Validators => {
                self.validator_active = other.validator_active.clone();
                self.validator_active_num = other.validator_active_num;
                self.validator_top_up = other.validator_top_up.clone();
                self.validator_top_up_num = other.validator_top_up_num;
            }
            StakeSource::Delegators => {
                self.delegation = other.delegation.clone();
                self.delegation_num = other.delegation_num;
            }
            StakeSource::LkMex => {
                self.lk_mex_stake = other.lk_mex_stake.clone();
                self.lk_mex_stake_num = other.lk_mex_stake_num;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_record(address: &str) -> AccountStakeRecord {
        AccountStakeRecord {
            address: address.to_string(),
            legacy_delegation_waiting: "1".into(),
            legacy_delegation_active: "2".into(),
            validator_active: "3".into(),
            validator_active_num: 3.0,
            validator_top_up: "4".into(),
            validator_top_up_num: 4.0,
            delegation: "5".into(),
            delegation_num: 5.0,
            lk_mex_stake: "6".into(),
            lk_mex_stake_num: 6.0,
            total_stake: "99".into(),
            total_stake_num: 99.0,
        }
    }

    #[test]
    fn test_merge_order() {
        assert_eq!(
            StakeSource::MERGE_ORDER,
            [
                StakeSource::Legacy,
                StakeSource::Validators,
                StakeSource::Delegators,
                StakeSource::LkMex
            ]
        );
    }

    #[test]
    fn test_components_belong_to_their_source() {
        for source in StakeSource::MERGE_ORDER {
            for component in source.components() {
                assert_eq!(component.source(), source);
            }
        }
    }

    #[test]
    fn test_lkmex_not_totaled() {
        assert!(!StakeComponent::LkMexStake.counts_toward_total());
        assert!(StakeComponent::Delegation.counts_toward_total());
        assert_eq!(StakeComponent::TOTALED.len(), 5);
    }

    #[test]
    fn test_totaled_balances_order() {
        let record = full_record("erd1a");
        assert_eq!(record.totaled_balances(), ["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn test_absorb_validators_only_touches_validator_fields() {
        let mut record = AccountStakeRecord::new("erd1a");
        record.legacy_delegation_active = "50".into();

        record.absorb(StakeSource::Validators, &full_record("erd1other"));

        assert_eq!(record.address, "erd1a");
        assert_eq!(record.legacy_delegation_active, "50");
        assert_eq!(record.legacy_delegation_waiting, "");
        assert_eq!(record.validator_active, "3");
        assert_eq!(record.validator_active_num, 3.0);
        assert_eq!(record.validator_top_up, "4");
        assert_eq!(record.validator_top_up_num, 4.0);
        assert_eq!(record.delegation, "");
        assert_eq!(record.lk_mex_stake, "");
        assert_eq!(record.total_stake, "");
    }

    #[test]
    fn test_absorb_each_source_is_disjoint() {
        let donor = full_record("donor");
        let mut record = AccountStakeRecord::new("erd1a");
        for source in StakeSource::MERGE_ORDER {
            record.absorb(source, &donor);
        }
        // Everything but address and totals is now copied
        let mut expected = donor.clone();
        expected.address = "erd1a".into();
        expected.total_stake = String::new();
        expected.total_stake_num = 0.0;
        assert_eq!(record, expected);
    }

    #[test]
    fn test_deserialize_partial_record() {
        let json = r#"{"validatorActive":"2500","validatorActiveNum":2500.0}"#;
        let record: AccountStakeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.validator_active, "2500");
        assert_eq!(record.validator_active_num, 2500.0);
        assert_eq!(record.delegation, "");
        assert_eq!(record.total_stake_num, 0.0);
    }

    #[test]
    fn test_serialize_camel_case() {
        let json = serde_json::to_value(full_record("erd1a")).unwrap();
        assert_eq!(json["legacyDelegationWaiting"], "1");
        assert_eq!(json["validatorTopUpNum"], 4.0);
        assert_eq!(json["lkMexStake"], "6");
        assert_eq!(json["totalStake"], "99");
    }

    #[test]
    fn test_source_display() {
        assert_eq!(format!("{}", StakeSource::Validators), "validators");
        assert_eq!(format!("{}", StakeSource::LkMex), "lkMex stakers");
    }
}
