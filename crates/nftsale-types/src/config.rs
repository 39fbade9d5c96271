//! Configuration types for the devnet and the deployment script.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{FeeScale, Result, SaleError, constants, units};

/// Execution environment settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DevnetConfig {
    /// Number of deterministic, pre-funded signer accounts.
    pub accounts: usize,
    /// Starting balance of every account, in whole currency units (e.g. "10000").
    pub initial_balance: String,
    /// Price per unit of gas, in smallest currency units.
    pub gas_price: u128,
    /// Fixed start time (unix seconds). `None` starts at the wall clock.
    pub start_time: Option<u64>,
}

impl Default for DevnetConfig {
    fn default() -> Self {
        Self {
            accounts: constants::DEFAULT_DEV_ACCOUNTS,
            initial_balance: constants::DEFAULT_ACCOUNT_BALANCE.to_string(),
            gas_price: constants::DEFAULT_GAS_PRICE,
            start_time: None,
        }
    }
}

impl DevnetConfig {
    /// Starting balance in smallest units.
    pub fn initial_balance_units(&self) -> Result<u128> {
        units::parse_units(&self.initial_balance, constants::NATIVE_DECIMALS)
    }

    /// Check the settings are usable.
    ///
    /// # Errors
    /// Returns [`SaleError::Configuration`] if no accounts are requested or
    /// the initial balance does not parse.
    pub fn validate(&self) -> Result<()> {
        if self.accounts == 0 {
            return Err(SaleError::Configuration(
                "devnet needs at least one account".into(),
            ));
        }
        self.initial_balance_units()
            .map_err(|e| SaleError::Configuration(format!("initial_balance: {e}")))?;
        Ok(())
    }
}

/// Settings of the deployment script.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeployConfig {
    /// Signer index used as deployer and fee recipient.
    pub deployer_index: usize,
    /// Fee rate passed to the Sale constructor.
    pub fee_rate: u16,
    /// Denominator convention of `fee_rate`.
    pub fee_scale: FeeScale,
    /// Whether to also deploy a MockNft token contract.
    pub deploy_mock_nft: bool,
    /// Execution environment.
    pub devnet: DevnetConfig,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            deployer_index: 0,
            fee_rate: constants::DEFAULT_FEE_RATE,
            fee_scale: FeeScale::default(),
            deploy_mock_nft: true,
            devnet: DevnetConfig::default(),
        }
    }
}

impl DeployConfig {
    /// Load a JSON config file. Missing fields take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Parse a JSON config string. Missing fields take their defaults.
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the settings are usable.
    pub fn validate(&self) -> Result<()> {
        self.devnet.validate()?;
        if self.deployer_index >= self.devnet.accounts {
            return Err(SaleError::Configuration(format!(
                "deployer_index {} out of range for {} accounts",
                self.deployer_index, self.devnet.accounts
            )));
        }
        let max = self.fee_scale.denominator();
        if self.fee_rate > max {
            return Err(SaleError::InvalidFee {
                rate: self.fee_rate,
                max,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deploy_config_defaults() {
        let cfg = DeployConfig::default();
        assert_eq!(cfg.deployer_index, 0);
        assert_eq!(cfg.fee_rate, 50);
        assert_eq!(cfg.fee_scale, FeeScale::PerMille);
        assert!(cfg.deploy_mock_nft);
        assert_eq!(cfg.devnet.accounts, 20);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg = DeployConfig::from_json(
            r#"{ "fee_rate": 250, "fee_scale": "basis_points", "devnet": { "accounts": 3 } }"#,
        )
        .unwrap();
        assert_eq!(cfg.fee_rate, 250);
        assert_eq!(cfg.fee_scale, FeeScale::BasisPoints);
        assert_eq!(cfg.devnet.accounts, 3);
        assert_eq!(cfg.devnet.initial_balance, "10000");
        assert!(cfg.deploy_mock_nft);
    }

    #[test]
    fn invalid_configs_rejected() {
        assert!(matches!(
            DeployConfig::from_json(r#"{ "deployer_index": 5, "devnet": { "accounts": 2 } }"#),
            Err(SaleError::Configuration(_))
        ));
        assert!(matches!(
            DeployConfig::from_json(r#"{ "fee_rate": 1001 }"#),
            Err(SaleError::InvalidFee { .. })
        ));
        assert!(matches!(
            DeployConfig::from_json(r#"{ "devnet": { "initial_balance": "lots" } }"#),
            Err(SaleError::Configuration(_))
        ));
        assert!(matches!(
            DeployConfig::from_json("not json"),
            Err(SaleError::Serialization(_))
        ));
    }

    #[test]
    fn initial_balance_in_smallest_units() {
        let cfg = DevnetConfig::default();
        assert_eq!(
            cfg.initial_balance_units().unwrap(),
            10_000 * 1_000_000_000_000_000_000
        );
    }

    #[test]
    fn deploy_config_serde_roundtrip() {
        let cfg = DeployConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let back = DeployConfig::from_json(&json).unwrap();
        assert_eq!(cfg.fee_rate, back.fee_rate);
        assert_eq!(cfg.devnet.gas_price, back.devnet.gas_price);
    }
}
