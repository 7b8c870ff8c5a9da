//! Definitions of CLI arguments and commands for deploy scripts

use std::{future::Future, io::Write, path::PathBuf};

use alloy::signers::local::PrivateKeySigner;
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::{
    commands::{deploy_all, deploy_controller, deploy_token, report_deployer},
    config::ScriptConfig,
    constants::{
        DEFAULT_ARTIFACTS_DIR, LOCALHOST_NETWORK, PRIVATE_KEY_ENV_VAR, REWARD_RATE_PER_BLOCK,
        RPC_URL_ENV_VAR,
    },
    deployer::ContractDeployer,
    errors::ScriptError,
    types::StakingContract,
};

/// Deploy the staking suite contracts to an EVM chain
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Private key of the deployer, in hex
    #[arg(short, long, env = PRIVATE_KEY_ENV_VAR, hide_env_values = true)]
    pub priv_key: Option<String>,

    /// Network RPC URL
    #[arg(short, long, env = RPC_URL_ENV_VAR)]
    pub rpc_url: Option<String>,

    /// Name of the network profile to deploy to
    #[arg(short, long, default_value = LOCALHOST_NETWORK)]
    pub network: String,

    /// Directory containing the compiled Hardhat artifacts
    #[arg(short, long, default_value = DEFAULT_ARTIFACTS_DIR)]
    pub artifacts: PathBuf,

    /// Path to a file in which deployed addresses are recorded
    #[arg(short, long)]
    pub deployments_path: Option<PathBuf>,

    /// Defaults to deploying the whole staking suite
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// The deploy scripts
#[derive(Subcommand)]
pub enum Command {
    /// Deploy the reward token, the staking token, and the staking controller
    DeployAll,
    /// Deploy a single token contract
    DeployToken(DeployTokenArgs),
    /// Deploy the staking controller against existing tokens
    DeployController(DeployControllerArgs),
}

impl Command {
    /// Resolve the deployer's signer, connect with `connect`, and run the
    /// command, reporting progress lines to `out`.
    ///
    /// Nothing is connected or deployed if the signer cannot be resolved.
    pub async fn run<D, F, Fut>(
        self,
        config: &ScriptConfig,
        out: &mut impl Write,
        connect: F,
    ) -> Result<(), ScriptError>
    where
        D: ContractDeployer,
        F: FnOnce(PrivateKeySigner) -> Fut,
        Fut: Future<Output = Result<D, ScriptError>>,
    {
        let signer = config.profile.signer()?;
        let deployer_address = signer.address();
        report_deployer(deployer_address, out)?;

        let deployer = connect(signer).await?;

        match self {
            Command::DeployAll => deploy_all(config, &deployer, deployer_address, out)
                .await
                .map(|_| ()),
            Command::DeployToken(args) => deploy_token(args, config, &deployer, out)
                .await
                .map(|_| ()),
            Command::DeployController(args) => {
                deploy_controller(args, config, &deployer, deployer_address, out)
                    .await
                    .map(|_| ())
            }
        }
    }
}

/// Deploy one of the token contracts
#[derive(Args)]
pub struct DeployTokenArgs {
    /// The token contract to deploy
    #[arg(short, long)]
    pub contract: TokenContract,

    /// Initial supply minted to the deployer, in base units.
    /// Defaults to 10 billion whole tokens
    #[arg(short, long)]
    pub initial_supply: Option<String>,
}

/// The token contracts of the staking suite
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum TokenContract {
    /// The reward token
    RewardToken,
    /// The staking token
    StakingToken,
}

impl From<TokenContract> for StakingContract {
    fn from(token: TokenContract) -> Self {
        match token {
            TokenContract::RewardToken => StakingContract::RewardToken,
            TokenContract::StakingToken => StakingContract::StakingToken,
        }
    }
}

/// Deploy the staking controller.
///
/// Token addresses that are not given are read from the deployments file.
#[derive(Args)]
pub struct DeployControllerArgs {
    /// Staking token contract address in hex
    #[arg(long)]
    pub staking_token: Option<String>,

    /// Reward token contract address in hex
    #[arg(long)]
    pub reward_token: Option<String>,

    /// Admin of the controller, defaults to the deployer
    #[arg(long)]
    pub admin: Option<String>,

    /// Reward paid out per block
    #[arg(long, default_value_t = REWARD_RATE_PER_BLOCK)]
    pub reward_rate: u64,
}
