//! Type definitions used throughout the scripts

use std::fmt::{self, Display};

use alloy_primitives::{Address, U256};
use alloy_sol_types::SolConstructor;

use crate::{
    constants::{
        INITIAL_SUPPLY_TOKENS, REWARD_TOKEN_CONTRACT_KEY, REWARD_RATE_PER_BLOCK,
        STAKING_CONTROLLER_CONTRACT_KEY, STAKING_TOKEN_CONTRACT_KEY, TOKEN_DECIMALS,
    },
    errors::ScriptError,
    solidity::{RCToken, SCToken, StakingController},
};

/// The contracts making up the staking suite
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum StakingContract {
    /// The reward token, paid out to stakers
    RewardToken,
    /// The staking token, deposited by stakers
    StakingToken,
    /// The staking controller, coordinating deposits and rewards
    StakingController,
}

impl StakingContract {
    /// The name of the contract as compiled, which is also the name of its artifact
    pub fn artifact_name(&self) -> &'static str {
        match self {
            StakingContract::RewardToken => "RCToken",
            StakingContract::StakingToken => "SCToken",
            StakingContract::StakingController => "StakingController",
        }
    }

    /// The key under which the contract's address is stored in the `deployments.json` file
    pub fn contract_key(&self) -> &'static str {
        match self {
            StakingContract::RewardToken => REWARD_TOKEN_CONTRACT_KEY,
            StakingContract::StakingToken => STAKING_TOKEN_CONTRACT_KEY,
            StakingContract::StakingController => STAKING_CONTROLLER_CONTRACT_KEY,
        }
    }

    /// The label used when reporting the contract's deployed address
    pub fn label(&self) -> &'static str {
        match self {
            StakingContract::RewardToken => "Reward Token",
            StakingContract::StakingToken => "Staking Token",
            StakingContract::StakingController => "Staking Controller",
        }
    }
}

impl Display for StakingContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StakingContract::RewardToken => write!(f, "reward-token"),
            StakingContract::StakingToken => write!(f, "staking-token"),
            StakingContract::StakingController => write!(f, "staking-controller"),
        }
    }
}

/// The constructor arguments of a staking suite contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstructorArgs {
    /// Arguments to either token contract
    Token {
        /// The amount minted to the deployer, in base units
        initial_supply: U256,
    },
    /// Arguments to the staking controller
    Controller {
        /// The reward paid out per block
        reward_rate_per_block: U256,
        /// The address of the staking token
        staking_token: Address,
        /// The address of the reward token
        reward_token: Address,
        /// The address administering the controller
        admin: Address,
    },
}

impl ConstructorArgs {
    /// Arguments for a token minting the default initial supply
    pub fn token() -> Self {
        ConstructorArgs::Token {
            initial_supply: initial_supply(),
        }
    }

    /// Arguments for a controller paying the default reward rate
    pub fn controller(staking_token: Address, reward_token: Address, admin: Address) -> Self {
        ConstructorArgs::Controller {
            reward_rate_per_block: U256::from(REWARD_RATE_PER_BLOCK),
            staking_token,
            reward_token,
            admin,
        }
    }

    /// ABI-encode the arguments, ready to be appended to the creation bytecode
    /// of the given contract.
    ///
    /// Token arguments only encode for a token, controller arguments only for
    /// the controller.
    pub fn abi_encode(&self, contract: StakingContract) -> Result<Vec<u8>, ScriptError> {
        match (self, contract) {
            (ConstructorArgs::Token { initial_supply }, StakingContract::RewardToken) => {
                Ok(RCToken::constructorCall {
                    initialSupply: *initial_supply,
                }
                .abi_encode())
            }
            (ConstructorArgs::Token { initial_supply }, StakingContract::StakingToken) => {
                Ok(SCToken::constructorCall {
                    initialSupply: *initial_supply,
                }
                .abi_encode())
            }
            (
                ConstructorArgs::Controller {
                    reward_rate_per_block,
                    staking_token,
                    reward_token,
                    admin,
                },
                StakingContract::StakingController,
            ) => Ok(StakingController::constructorCall {
                rewardPerBlock: *reward_rate_per_block,
                stakingToken: *staking_token,
                rewardToken: *reward_token,
                admin: *admin,
            }
            .abi_encode()),
            (args, contract) => Err(ScriptError::CalldataConstruction(format!(
                "{} arguments do not match the `{contract}` constructor",
                args.kind()
            ))),
        }
    }

    /// A short name for the argument variant, used in error messages
    fn kind(&self) -> &'static str {
        match self {
            ConstructorArgs::Token { .. } => "token",
            ConstructorArgs::Controller { .. } => "controller",
        }
    }
}

/// The initial supply of each token, `INITIAL_SUPPLY_TOKENS` scaled by the token decimals
pub fn initial_supply() -> U256 {
    U256::from(INITIAL_SUPPLY_TOKENS) * U256::from(10u8).pow(U256::from(TOKEN_DECIMALS))
}

/// A contract that has been deployed on-chain
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DeployedContract {
    /// Which contract was deployed
    pub contract: StakingContract,
    /// The address the contract was deployed at
    pub address: Address,
}

impl DeployedContract {
    /// The line reporting the deployed address to the operator
    pub fn progress_line(&self) -> String {
        format!(
            "{} contract address --> {}",
            self.contract.label(),
            self.address
        )
    }
}

/// The line reporting the address signing the deployments
pub fn deployer_progress_line(deployer: Address) -> String {
    format!("Address deploying the contract --> {deployer}")
}

/// The addresses of a fully deployed staking suite
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct StakingDeployment {
    /// The address that signed the deployments
    pub deployer: Address,
    /// The reward token address
    pub reward_token: Address,
    /// The staking token address
    pub staking_token: Address,
    /// The staking controller address
    pub controller: Address,
}
