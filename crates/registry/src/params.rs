//! Registry parameters fixed at construction

use preconf_config::{
    Config, ConfigResult, DuplicateDelegationPolicy, ExitRequestPolicy, ExitingCollateralPolicy,
    DEFAULT_ACTIVATION_DELAY, DEFAULT_EXIT_DELAY,
};
use serde::{Deserialize, Serialize};

/// Constants and policies a registry is built with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryParams {
    /// Effective collateral needed for PRECONFER status
    pub minimum_collateral: u128,
    /// Blocks before a first deposit counts
    pub activation_delay: u64,
    /// Blocks between exit initiation and withdrawal
    pub exit_delay: u64,
    /// Treatment of exiting collateral in eligibility
    pub exiting_collateral: ExitingCollateralPolicy,
    /// Treatment of repeated exit requests
    pub exit_requests: ExitRequestPolicy,
    /// Treatment of repeated delegations
    pub duplicate_delegations: DuplicateDelegationPolicy,
    /// Whether penalty evidence is accepted
    pub penalties_enabled: bool,
    /// Force NOT_PRECONFER on a penalised proposer
    pub demote_on_penalty: bool,
}

impl RegistryParams {
    /// Parameters with the given threshold and the default delays and policies.
    pub fn new(minimum_collateral: u128) -> Self {
        Self {
            minimum_collateral,
            activation_delay: DEFAULT_ACTIVATION_DELAY,
            exit_delay: DEFAULT_EXIT_DELAY,
            exiting_collateral: ExitingCollateralPolicy::default(),
            exit_requests: ExitRequestPolicy::default(),
            duplicate_delegations: DuplicateDelegationPolicy::default(),
            penalties_enabled: true,
            demote_on_penalty: true,
        }
    }

    /// Build parameters from a validated configuration.
    pub fn from_config(config: &Config) -> ConfigResult<Self> {
        config.validate()?;
        let registry = &config.registry;
        Ok(Self {
            minimum_collateral: registry.minimum_collateral_u128(),
            activation_delay: registry.activation_delay,
            exit_delay: registry.exit_delay,
            exiting_collateral: registry.exiting_collateral,
            exit_requests: registry.exit_requests,
            duplicate_delegations: registry.duplicate_delegations,
            penalties_enabled: config.penalty.enabled,
            demote_on_penalty: config.penalty.demote_on_penalty,
        })
    }

    /// Builder-style override of the exiting collateral policy.
    pub fn with_exiting_collateral(mut self, policy: ExitingCollateralPolicy) -> Self {
        self.exiting_collateral = policy;
        self
    }

    /// Builder-style override of the exit request policy.
    pub fn with_exit_requests(mut self, policy: ExitRequestPolicy) -> Self {
        self.exit_requests = policy;
        self
    }

    /// Builder-style override of the duplicate delegation policy.
    pub fn with_duplicate_delegations(mut self, policy: DuplicateDelegationPolicy) -> Self {
        self.duplicate_delegations = policy;
        self
    }

    /// Builder-style override of both timelocks.
    pub fn with_delays(mut self, activation_delay: u64, exit_delay: u64) -> Self {
        self.activation_delay = activation_delay;
        self.exit_delay = exit_delay;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_default_config() {
        let params = RegistryParams::from_config(&Config::default()).unwrap();
        assert_eq!(params.minimum_collateral, 1_000_000_000_000_000_000);
        assert_eq!(params.activation_delay, 32);
        assert_eq!(params.exit_delay, 32);
        assert!(params.penalties_enabled);
    }

    #[test]
    fn test_from_invalid_config() {
        let mut config = Config::default();
        config.registry.minimum_collateral = "0".to_string();
        assert!(RegistryParams::from_config(&config).is_err());
    }
}
