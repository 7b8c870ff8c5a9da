//! Implementations of the various deploy scripts

use std::{io::Write, str::FromStr};

use alloy_primitives::{Address, U256};
use tracing::{info, warn};

use crate::{
    cli::{DeployControllerArgs, DeployTokenArgs},
    config::ScriptConfig,
    constants::LOCALHOST_NETWORK,
    deployer::ContractDeployer,
    errors::ScriptError,
    plan::DeploymentPlan,
    types::{
        deployer_progress_line, ConstructorArgs, DeployedContract, StakingContract,
        StakingDeployment,
    },
    utils::{parse_addr_from_deployments_file, write_deployed_address},
};

/// Deploy the full staking suite, reporting each address to `out` as it is confirmed
pub async fn deploy_all(
    config: &ScriptConfig,
    deployer: &impl ContractDeployer,
    deployer_address: Address,
    out: &mut impl Write,
) -> Result<StakingDeployment, ScriptError> {
    if config.network != LOCALHOST_NETWORK {
        warn!("deploying the staking suite to `{}`", config.network);
    }

    let deployed = DeploymentPlan::staking_suite()
        .execute(deployer, deployer_address, |d| {
            record_deployment(config, d, &mut *out)
        })
        .await?;

    StakingDeployment::from_deployed(deployer_address, &deployed)
}

/// Deploy a single token contract
pub async fn deploy_token(
    args: DeployTokenArgs,
    config: &ScriptConfig,
    deployer: &impl ContractDeployer,
    out: &mut impl Write,
) -> Result<DeployedContract, ScriptError> {
    let contract = StakingContract::from(args.contract);
    let constructor_args = match args.initial_supply {
        Some(supply) => ConstructorArgs::Token {
            initial_supply: U256::from_str(&supply)
                .map_err(|e| ScriptError::CalldataConstruction(e.to_string()))?,
        },
        None => ConstructorArgs::token(),
    };

    let address = deployer.deploy(contract, &constructor_args).await?;
    let deployed = DeployedContract { contract, address };
    record_deployment(config, &deployed, out)?;

    Ok(deployed)
}

/// Deploy the staking controller against already deployed tokens
pub async fn deploy_controller(
    args: DeployControllerArgs,
    config: &ScriptConfig,
    deployer: &impl ContractDeployer,
    deployer_address: Address,
    out: &mut impl Write,
) -> Result<DeployedContract, ScriptError> {
    let staking_token =
        resolve_token_address(args.staking_token, config, StakingContract::StakingToken)?;
    let reward_token =
        resolve_token_address(args.reward_token, config, StakingContract::RewardToken)?;
    let admin = match args.admin {
        Some(admin) => parse_address(&admin)?,
        None => deployer_address,
    };

    let constructor_args = ConstructorArgs::Controller {
        reward_rate_per_block: U256::from(args.reward_rate),
        staking_token,
        reward_token,
        admin,
    };

    let contract = StakingContract::StakingController;
    let address = deployer.deploy(contract, &constructor_args).await?;
    let deployed = DeployedContract { contract, address };
    record_deployment(config, &deployed, out)?;

    Ok(deployed)
}

/// Report the address signing the deployments
pub fn report_deployer(deployer_address: Address, out: &mut impl Write) -> Result<(), ScriptError> {
    writeln!(out, "{}", deployer_progress_line(deployer_address))
        .map_err(|e| ScriptError::Reporting(e.to_string()))
}

/// Report a deployed contract's address and record it in the deployments file
fn record_deployment(
    config: &ScriptConfig,
    deployed: &DeployedContract,
    out: &mut impl Write,
) -> Result<(), ScriptError> {
    writeln!(out, "{}", deployed.progress_line())
        .map_err(|e| ScriptError::Reporting(e.to_string()))?;

    if let Some(path) = &config.deployments_path {
        write_deployed_address(
            path,
            &config.network,
            deployed.contract.contract_key(),
            deployed.address,
        )?;
        info!("recorded `{}` in {}", deployed.contract, path.display());
    }

    Ok(())
}

/// Use the given token address, or look it up in the deployments file
fn resolve_token_address(
    given: Option<String>,
    config: &ScriptConfig,
    contract: StakingContract,
) -> Result<Address, ScriptError> {
    if let Some(addr) = given {
        return parse_address(&addr);
    }

    let path = config.deployments_path.as_ref().ok_or_else(|| {
        ScriptError::CalldataConstruction(format!(
            "no `{contract}` address given and no deployments file configured"
        ))
    })?;

    parse_addr_from_deployments_file(path, &config.network, contract.contract_key())
}

/// Parse a hex-encoded address
fn parse_address(addr: &str) -> Result<Address, ScriptError> {
    Address::from_str(addr).map_err(|e| ScriptError::CalldataConstruction(e.to_string()))
}

#[cfg(test)]
mod tests {
    use std::{io::sink, path::PathBuf, sync::Mutex};

    use alloy::primitives::address;
    use tempfile::tempdir;

    use super::*;
    use crate::{cli::TokenContract, config::NetworkConfig, types::initial_supply};

    /// Records every deployment and hands out sequential addresses
    #[derive(Default)]
    struct RecordingDeployer {
        /// The deployments requested so far
        calls: Mutex<Vec<(StakingContract, ConstructorArgs)>>,
    }

    impl ContractDeployer for RecordingDeployer {
        async fn deploy(
            &self,
            contract: StakingContract,
            args: &ConstructorArgs,
        ) -> Result<Address, ScriptError> {
            let mut calls = self.calls.lock().unwrap();
            calls.push((contract, args.clone()));
            Ok(Address::with_last_byte(0x10 + calls.len() as u8))
        }
    }

    fn config(deployments_path: Option<PathBuf>) -> ScriptConfig {
        let networks = NetworkConfig::new(Some("http://localhost:8545".into()), None);
        ScriptConfig::new(
            &networks,
            LOCALHOST_NETWORK,
            PathBuf::from("artifacts"),
            deployments_path,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_deploy_all_records_every_contract() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("deployments.json");
        let config = config(Some(path.clone()));
        let deployer = RecordingDeployer::default();
        let admin = Address::repeat_byte(0x42);

        let mut out = Vec::new();

        let suite = deploy_all(&config, &deployer, admin, &mut out).await.unwrap();

        assert_eq!(suite.deployer, admin);
        let lines: Vec<String> = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(String::from)
            .collect();
        assert_eq!(
            lines,
            vec![
                format!("Reward Token contract address --> {}", suite.reward_token),
                format!("Staking Token contract address --> {}", suite.staking_token),
                format!("Staking Controller contract address --> {}", suite.controller),
            ]
        );
        for (contract, address) in [
            (StakingContract::RewardToken, suite.reward_token),
            (StakingContract::StakingToken, suite.staking_token),
            (StakingContract::StakingController, suite.controller),
        ] {
            let recorded =
                parse_addr_from_deployments_file(&path, LOCALHOST_NETWORK, contract.contract_key())
                    .unwrap();
            assert_eq!(recorded, address);
        }
    }

    #[tokio::test]
    async fn test_deploy_token_custom_supply() {
        let deployer = RecordingDeployer::default();
        let args = DeployTokenArgs {
            contract: TokenContract::StakingToken,
            initial_supply: Some("1000".to_string()),
        };

        let deployed = deploy_token(args, &config(None), &deployer, &mut sink())
            .await
            .unwrap();

        assert_eq!(deployed.contract, StakingContract::StakingToken);
        assert_eq!(
            deployer.calls.into_inner().unwrap(),
            vec![(
                StakingContract::StakingToken,
                ConstructorArgs::Token {
                    initial_supply: U256::from(1000u64)
                }
            )]
        );
    }

    #[tokio::test]
    async fn test_deploy_token_default_supply() {
        let deployer = RecordingDeployer::default();
        let args = DeployTokenArgs {
            contract: TokenContract::RewardToken,
            initial_supply: None,
        };

        deploy_token(args, &config(None), &deployer, &mut sink())
            .await
            .unwrap();

        let calls = deployer.calls.into_inner().unwrap();
        assert_eq!(
            calls[0].1,
            ConstructorArgs::Token {
                initial_supply: initial_supply()
            }
        );
    }

    #[tokio::test]
    async fn test_deploy_controller_from_deployments_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("deployments.json");
        let reward_token = address!("5FbDB2315678afecb367f032d93F642f64180aa3");
        let staking_token = address!("e7f1725E7734CE288F8367e1Bb143E90bb3F0512");
        write_deployed_address(
            &path,
            LOCALHOST_NETWORK,
            StakingContract::RewardToken.contract_key(),
            reward_token,
        )
        .unwrap();
        write_deployed_address(
            &path,
            LOCALHOST_NETWORK,
            StakingContract::StakingToken.contract_key(),
            staking_token,
        )
        .unwrap();

        let deployer = RecordingDeployer::default();
        let admin = Address::repeat_byte(0x42);
        let args = DeployControllerArgs {
            staking_token: None,
            reward_token: None,
            admin: None,
            reward_rate: 7,
        };

        deploy_controller(args, &config(Some(path)), &deployer, admin, &mut sink())
            .await
            .unwrap();

        assert_eq!(
            deployer.calls.into_inner().unwrap(),
            vec![(
                StakingContract::StakingController,
                ConstructorArgs::Controller {
                    reward_rate_per_block: U256::from(7u64),
                    staking_token,
                    reward_token,
                    admin,
                }
            )]
        );
    }

    #[tokio::test]
    async fn test_deploy_controller_needs_token_addresses() {
        let deployer = RecordingDeployer::default();
        let args = DeployControllerArgs {
            staking_token: Some("0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512".to_string()),
            reward_token: None,
            admin: None,
            reward_rate: 1000,
        };

        let res =
            deploy_controller(args, &config(None), &deployer, Address::ZERO, &mut sink()).await;

        assert!(matches!(res, Err(ScriptError::CalldataConstruction(_))));
        assert!(deployer.calls.into_inner().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rejects_malformed_address() {
        let deployer = RecordingDeployer::default();
        let args = DeployControllerArgs {
            staking_token: Some("0x1234".to_string()),
            reward_token: Some("0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512".to_string()),
            admin: None,
            reward_rate: 1000,
        };

        let res =
            deploy_controller(args, &config(None), &deployer, Address::ZERO, &mut sink()).await;

        assert!(matches!(res, Err(ScriptError::CalldataConstruction(_))));
    }
}
