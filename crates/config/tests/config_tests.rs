//! Tests for Config module

use preconf_config::{
    Config, ConfigError, DuplicateDelegationPolicy, ExitRequestPolicy, ExitingCollateralPolicy,
    LogFormat, LoggingConfig, PenaltyConfig, RegistryConfig, MAX_DELAY_BLOCKS,
};
use std::path::Path;
use tempfile::TempDir;

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.registry.activation_delay, 32);
    assert_eq!(config.registry.exit_delay, 32);
    assert_eq!(
        config.registry.exiting_collateral,
        ExitingCollateralPolicy::CountFull
    );
    assert_eq!(config.registry.exit_requests, ExitRequestPolicy::Overwrite);
    assert_eq!(
        config.registry.duplicate_delegations,
        DuplicateDelegationPolicy::Append
    );
    assert!(config.validate().is_ok());
}

#[test]
fn test_zero_minimum_collateral() {
    let mut config = RegistryConfig::default();
    config.minimum_collateral = "0".to_string();
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidMinimumCollateral)
    ));
}

#[test]
fn test_unparseable_minimum_collateral() {
    let mut config = RegistryConfig::default();
    config.minimum_collateral = "ten".to_string();
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidBalance(ref s)) if s == "ten"
    ));
}

#[test]
fn test_delay_out_of_range() {
    let mut config = RegistryConfig::default();
    config.exit_delay = MAX_DELAY_BLOCKS + 1;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::DelayOutOfRange {
            name: "exit_delay",
            ..
        })
    ));

    config.exit_delay = 0;
    assert!(config.validate().is_ok());
}

#[test]
fn test_penalty_authority() {
    let mut config = PenaltyConfig::default();
    assert_eq!(config.authority_address().unwrap(), None);

    config.authority = Some("0x00000000000000000000000000000000000000aa".to_string());
    assert!(config.validate().is_ok());
    assert!(config.authority_address().unwrap().is_some());

    config.authority = Some("not-an-address".to_string());
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidAddress(_))
    ));
}

#[test]
fn test_invalid_log_settings() {
    let mut config = LoggingConfig::default();
    config.level = "loud".to_string();
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidLogLevel(_))
    ));

    let mut config = LoggingConfig::default();
    config.format = "xml".to_string();
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidLogFormat(_))
    ));

    config.format = "compact".to_string();
    assert_eq!(config.log_format().unwrap(), LogFormat::Compact);
}

#[test]
fn test_from_str_partial_sections() {
    let config = Config::from_str(
        r#"
        [registry]
        minimum_collateral = "1"
        exit_requests = "reject"

        [storage]
        state_file = "/tmp/registry.json"
        "#,
    )
    .unwrap();

    assert_eq!(config.registry.minimum_collateral_u128(), 1);
    assert_eq!(config.registry.exit_requests, ExitRequestPolicy::Reject);
    assert_eq!(config.registry.activation_delay, 32);
    assert_eq!(config.storage.state_file, "/tmp/registry.json");
}

#[test]
fn test_from_str_rejects_unknown_policy() {
    let result = Config::from_str(
        r#"
        [registry]
        exit_requests = "sometimes"
        "#,
    );
    assert!(matches!(result, Err(ConfigError::TomlParse(_))));
}

#[test]
fn test_save_and_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("preconf.toml");

    let mut config = Config::default();
    config.registry.minimum_collateral = "5000".to_string();
    config.registry.exiting_collateral = ExitingCollateralPolicy::ExcludeRegistrant;
    config.save(&path).unwrap();

    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded.registry.minimum_collateral_u128(), 5000);
    assert_eq!(
        loaded.registry.exiting_collateral,
        ExitingCollateralPolicy::ExcludeRegistrant
    );
}

#[test]
fn test_load_missing_file() {
    let result = Config::load(Path::new("/nonexistent/preconf.toml"));
    assert!(matches!(result, Err(ConfigError::FileRead { .. })));
}
