//! Constants used in the deploy scripts

/// The initial supply minted by each token contract, in whole tokens
pub const INITIAL_SUPPLY_TOKENS: u64 = 10_000_000_000;

/// The number of decimals used by the token contracts
pub const TOKEN_DECIMALS: u8 = 18;

/// The reward paid out by the staking controller per block
pub const REWARD_RATE_PER_BLOCK: u64 = 1000;

/// The number of confirmations to wait for on each deployment transaction
pub const NUM_DEPLOY_CONFIRMATIONS: u64 = 1;

/// The Solidity compiler versions the contracts are compiled with
pub const SOLIDITY_COMPILER_VERSIONS: [&str; 2] = ["0.8.0", "0.8.1"];

/// The name of the environment variable holding the deployer private key
pub const PRIVATE_KEY_ENV_VAR: &str = "PRIVATE_KEY";

/// The name of the environment variable holding the RPC endpoint
pub const RPC_URL_ENV_VAR: &str = "URL";

/// The prefix of a hex-encoded private key
pub const HEX_PREFIX: &str = "0x";

/// The name of the local development network profile
pub const LOCALHOST_NETWORK: &str = "localhost";

/// The name of the Rinkeby testnet profile
pub const RINKEBY_NETWORK: &str = "rinkeby";

/// The chain ID a local Hardhat node reports
pub const LOCALHOST_CHAIN_ID: u64 = 31337;

/// The chain ID of the Rinkeby testnet
pub const RINKEBY_CHAIN_ID: u64 = 4;

/// The default directory holding compiled Hardhat artifacts
pub const DEFAULT_ARTIFACTS_DIR: &str = "artifacts";

/// The subdirectory of the artifacts directory holding contract artifacts
pub const CONTRACTS_PATH_SEGMENT: &str = "contracts";

/// The extension of a Solidity source file
pub const SOLIDITY_EXTENSION: &str = "sol";

/// The extension of an artifact file
pub const JSON_EXTENSION: &str = "json";

/// The deployments key in the `deployments.json` file
pub const DEPLOYMENTS_KEY: &str = "deployments";

/// The reward token contract key in the `deployments.json` file
pub const REWARD_TOKEN_CONTRACT_KEY: &str = "reward_token_contract";

/// The staking token contract key in the `deployments.json` file
pub const STAKING_TOKEN_CONTRACT_KEY: &str = "staking_token_contract";

/// The staking controller contract key in the `deployments.json` file
pub const STAKING_CONTROLLER_CONTRACT_KEY: &str = "staking_controller_contract";
