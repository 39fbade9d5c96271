//! Deployment script.
//!
//! Deploys one Sale contract from the configured deployer account, with
//! that account as fee recipient, and optionally a MockNft token for
//! manual testing. Prints nothing itself; the `nftsale-deploy` binary
//! reports the result.

use nftsale_types::{Address, DeployConfig, FeeConfig, Result};
use serde::{Deserialize, Serialize};

use crate::devnet::Devnet;

/// Addresses produced by one deployment run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployment {
    pub deployer: Address,
    pub sale: Address,
    pub fees: FeeConfig,
    pub mock_nft: Option<Address>,
}

impl Deployment {
    /// The report printed by `nftsale-deploy`: a single JSON document.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Deploy onto an existing devnet.
pub fn deploy(devnet: &Devnet, config: &DeployConfig) -> Result<Deployment> {
    config.validate()?;
    let deployer = devnet.account(config.deployer_index)?;
    let fees = FeeConfig::new(deployer.address(), config.fee_rate, config.fee_scale)?;

    let sale = devnet.deploy_sale(deployer, fees.recipient, fees.rate, fees.scale)?;
    tracing::info!(fees = %fees, "Sale deployed to: {sale}");

    let mock_nft = if config.deploy_mock_nft {
        let token = devnet.deploy_mock_nft(deployer)?;
        tracing::info!(minter = %deployer.address().short(), "MockNft deployed to: {token}");
        Some(token)
    } else {
        None
    };

    Ok(Deployment {
        deployer: deployer.address(),
        sale,
        fees,
        mock_nft,
    })
}

/// Start a fresh devnet from `config.devnet` and deploy onto it.
pub fn run(config: &DeployConfig) -> Result<(Devnet, Deployment)> {
    config.validate()?;
    let devnet = Devnet::new(config.devnet.clone())?;
    let deployment = deploy(&devnet, config)?;
    Ok((devnet, deployment))
}
