use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::error::RtidError;
use crate::primitives::*;
use crate::uint256::{serde_u256, U256};

/// Identifier of a version-bits upgrade deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentPos {
    /// Dummy deployment used to exercise the signaling machinery.
    TestDummy,
    /// Relative lock-time (BIP68, BIP112, BIP113).
    Csv,
    /// Segregated witness (BIP141, BIP143, BIP147).
    Segwit,
}

impl DeploymentPos {
    /// Number of entries in a [`Deployments`] table.
    pub const COUNT: usize = 3;

    pub const ALL: [DeploymentPos; Self::COUNT] =
        [DeploymentPos::TestDummy, DeploymentPos::Csv, DeploymentPos::Segwit];

    pub fn name(&self) -> &'static str {
        match self {
            DeploymentPos::TestDummy => "testdummy",
            DeploymentPos::Csv => "csv",
            DeploymentPos::Segwit => "segwit",
        }
    }

    fn index(&self) -> usize {
        match self {
            DeploymentPos::TestDummy => 0,
            DeploymentPos::Csv => 1,
            DeploymentPos::Segwit => 2,
        }
    }
}

impl std::str::FromStr for DeploymentPos {
    type Err = RtidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DeploymentPos::ALL
            .into_iter()
            .find(|pos| pos.name() == s)
            .ok_or_else(|| RtidError::UnknownDeployment(s.to_string()))
    }
}

impl std::fmt::Display for DeploymentPos {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Signaling bit and activation window of one deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Deployment {
    /// Block-version bit miners set to signal readiness (0..=31).
    pub bit: u8,
    /// Median time past at which signaling starts, or [`Deployment::ALWAYS_ACTIVE`].
    pub start_time: i64,
    /// Median time past after which the deployment fails, or [`Deployment::NO_TIMEOUT`].
    pub timeout: i64,
}

impl Deployment {
    /// Start time sentinel: the rules are enforced from genesis, no signaling.
    pub const ALWAYS_ACTIVE: i64 = -1;

    /// Timeout sentinel: the deployment never expires.
    pub const NO_TIMEOUT: i64 = i64::MAX;

    pub fn is_always_active(&self) -> bool {
        self.start_time == Self::ALWAYS_ACTIVE
    }

    pub fn has_timeout(&self) -> bool {
        self.timeout != Self::NO_TIMEOUT
    }
}

/// Deployment table keyed by [`DeploymentPos`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployments {
    entries: [Deployment; DeploymentPos::COUNT],
}

impl Deployments {
    pub fn new(testdummy: Deployment, csv: Deployment, segwit: Deployment) -> Self {
        Self {
            entries: [testdummy, csv, segwit],
        }
    }

    pub fn get(&self, pos: DeploymentPos) -> &Deployment {
        &self.entries[pos.index()]
    }

    /// Overwrite the activation window of one deployment, keeping its bit.
    pub fn set_window(&mut self, pos: DeploymentPos, start_time: i64, timeout: i64) {
        let entry = &mut self.entries[pos.index()];
        entry.start_time = start_time;
        entry.timeout = timeout;
    }

    pub fn iter(&self) -> impl Iterator<Item = (DeploymentPos, &Deployment)> {
        DeploymentPos::ALL.into_iter().zip(self.entries.iter())
    }
}

impl Serialize for Deployments {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(DeploymentPos::COUNT))?;
        for (pos, deployment) in self.iter() {
            map.serialize_entry(pos.name(), deployment)?;
        }
        map.end()
    }
}

/// Parameters every validating node on a network must agree on.
///
/// The proof-of-work knobs are consumed by the averaging-window retarget
/// algorithm and the deployment table by the version-bits evaluator; neither
/// lives in this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsensusRules {
    /// Blocks between subsidy halvings.
    pub subsidy_halving_interval: u32,
    /// Height from which P2SH (BIP16) is enforced.
    pub bip16_height: Height,
    /// Height from which the coinbase must commit to its height (BIP34).
    pub bip34_height: Height,
    /// Hash of the block at `bip34_height`, zero when not yet known.
    #[serde(with = "serde_hash")]
    pub bip34_hash: Hash,
    /// Height from which OP_CHECKLOCKTIMEVERIFY (BIP65) is enforced.
    pub bip65_height: Height,
    /// Height from which strict DER signatures (BIP66) are enforced.
    pub bip66_height: Height,
    /// Easiest allowed target.
    #[serde(with = "serde_u256")]
    pub pow_limit: U256,
    /// Target seconds between blocks.
    pub pow_target_spacing: i64,
    /// Seconds covered by one retarget period.
    pub pow_target_timespan: i64,
    /// Blocks averaged by the retarget algorithm.
    pub pow_averaging_window: i64,
    /// Maximum percentage the difficulty may rise per retarget.
    pub pow_max_adjust_up: i64,
    /// Maximum percentage the difficulty may fall per retarget.
    pub pow_max_adjust_down: i64,
    pub pow_allow_min_difficulty_blocks: bool,
    /// Height after which min-difficulty blocks are allowed, if ever.
    pub pow_allow_min_difficulty_blocks_after_height: Option<Height>,
    pub pow_no_retargeting: bool,
    /// Signaling blocks required within a confirmation window to lock in.
    pub rule_change_activation_threshold: u32,
    pub miner_confirmation_window: u32,
    pub deployments: Deployments,
    /// The best chain should have at least this much work.
    #[serde(with = "serde_u256")]
    pub minimum_chain_work: U256,
    /// Signatures in ancestors of this block are assumed valid.
    #[serde(with = "serde_hash")]
    pub default_assume_valid: Hash,
    #[serde(with = "serde_hash")]
    pub hash_genesis_block: Hash,
}

impl ConsensusRules {
    /// Blocks between difficulty adjustments as counted by the signaling window.
    pub fn difficulty_adjustment_interval(&self) -> i64 {
        self.pow_target_timespan / self.pow_target_spacing
    }

    /// Seconds the averaging window is expected to span.
    pub fn averaging_window_timespan(&self) -> i64 {
        self.pow_averaging_window * self.pow_target_spacing
    }

    /// Lower clamp applied to the measured window timespan.
    pub fn min_actual_timespan(&self) -> i64 {
        (self.averaging_window_timespan() * (100 - self.pow_max_adjust_up)) / 100
    }

    /// Upper clamp applied to the measured window timespan.
    pub fn max_actual_timespan(&self) -> i64 {
        (self.averaging_window_timespan() * (100 + self.pow_max_adjust_down)) / 100
    }

    /// Check that `U256::MAX / pow_limit` equals `expected_ratio` and is at
    /// least the averaging window, which ties the proof-of-work limit to the
    /// retarget window.
    pub fn check_pow_limit(&self, expected_ratio: u64) -> Result<(), RtidError> {
        let window = u64::try_from(self.pow_averaging_window).unwrap_or(u64::MAX);
        let ratio = if self.pow_limit.is_zero() {
            U256::zero()
        } else {
            U256::MAX / self.pow_limit
        };
        if self.pow_limit.is_zero()
            || ratio != U256::from(expected_ratio)
            || ratio < U256::from(window)
        {
            return Err(RtidError::SanityViolation {
                ratio,
                expected: expected_ratio,
                averaging_window: window,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn make_rules(pow_limit: &str, window: i64) -> ConsensusRules {
        ConsensusRules {
            subsidy_halving_interval: 150,
            bip16_height: 0,
            bip34_height: 100_000_000,
            bip34_hash: ZERO_HASH,
            bip65_height: 1351,
            bip66_height: 1251,
            pow_limit: U256::from_hex(pow_limit).unwrap(),
            pow_target_spacing: 5,
            pow_target_timespan: 61_200,
            pow_averaging_window: window,
            pow_max_adjust_up: 16,
            pow_max_adjust_down: 32,
            pow_allow_min_difficulty_blocks: false,
            pow_allow_min_difficulty_blocks_after_height: None,
            pow_no_retargeting: false,
            rule_change_activation_threshold: 9180,
            miner_confirmation_window: 12_240,
            deployments: Deployments::new(
                Deployment {
                    bit: 28,
                    start_time: 0,
                    timeout: Deployment::NO_TIMEOUT,
                },
                Deployment {
                    bit: 0,
                    start_time: Deployment::ALWAYS_ACTIVE,
                    timeout: Deployment::NO_TIMEOUT,
                },
                Deployment {
                    bit: 1,
                    start_time: Deployment::ALWAYS_ACTIVE,
                    timeout: Deployment::NO_TIMEOUT,
                },
            ),
            minimum_chain_work: U256::zero(),
            default_assume_valid: ZERO_HASH,
            hash_genesis_block: ZERO_HASH,
        }
    }

    const LIMIT_1024: &str = "003fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff";

    #[test]
    fn test_pow_limit_ratio_accepted() {
        let rules = make_rules(LIMIT_1024, 510);
        assert!(rules.check_pow_limit(1024).is_ok());
    }

    #[test]
    fn test_pow_limit_ratio_below_window_rejected() {
        let rules = make_rules(LIMIT_1024, 2048);
        let err = rules.check_pow_limit(1024).unwrap_err();
        assert!(matches!(
            err,
            RtidError::SanityViolation {
                expected: 1024,
                averaging_window: 2048,
                ..
            }
        ));
    }

    #[test]
    fn test_pow_limit_ratio_unexpected_value_rejected() {
        let rules = make_rules(LIMIT_1024, 17);
        assert!(rules.check_pow_limit(17).is_err());
    }

    #[test]
    fn test_zero_pow_limit_rejected() {
        let rules = make_rules("00", 17);
        assert!(rules.check_pow_limit(17).is_err());
    }

    #[test]
    fn test_derived_timespans() {
        let rules = make_rules(LIMIT_1024, 510);
        assert_eq!(rules.difficulty_adjustment_interval(), 12_240);
        assert_eq!(rules.averaging_window_timespan(), 2550);
        assert_eq!(rules.min_actual_timespan(), 2142);
        assert_eq!(rules.max_actual_timespan(), 3366);
    }

    #[test]
    fn test_set_window_keeps_bit() {
        let mut rules = make_rules(LIMIT_1024, 510);
        rules
            .deployments
            .set_window(DeploymentPos::Csv, 0, Deployment::NO_TIMEOUT);
        let csv = rules.deployments.get(DeploymentPos::Csv);
        assert_eq!(csv.bit, 0);
        assert_eq!(csv.start_time, 0);
        assert!(!csv.is_always_active());
        assert!(!csv.has_timeout());
        assert!(rules.deployments.get(DeploymentPos::Segwit).is_always_active());
    }

    #[test]
    fn test_deployment_pos_parse() {
        assert_eq!("csv".parse::<DeploymentPos>().unwrap(), DeploymentPos::Csv);
        assert_eq!(
            "segwit".parse::<DeploymentPos>().unwrap(),
            DeploymentPos::Segwit
        );
        assert_eq!(
            "taproot".parse::<DeploymentPos>().unwrap_err(),
            RtidError::UnknownDeployment("taproot".to_string())
        );
    }

    #[test]
    fn test_deployments_serialize_as_named_map() {
        let rules = make_rules(LIMIT_1024, 510);
        let json = serde_json::to_value(&rules.deployments).unwrap();
        assert_eq!(json["testdummy"]["bit"], 28);
        assert_eq!(json["csv"]["start_time"], -1);
        assert_eq!(json["segwit"]["timeout"], i64::MAX);
    }

    proptest! {
        // A limit of MAX / d divides back to d, so only the exact ratio passes
        // and only when the averaging window fits under it.
        #[test]
        fn prop_pow_limit_ratio_is_exact(d in 1u64..1_000_000, window in 1i64..4096) {
            let mut rules = make_rules("00", window);
            rules.pow_limit = U256::MAX / U256::from(d);
            prop_assert_eq!(rules.check_pow_limit(d).is_ok(), d >= window as u64);
            prop_assert!(rules.check_pow_limit(d + 1).is_err());
        }
    }
}
