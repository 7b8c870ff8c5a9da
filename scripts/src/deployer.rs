//! The seam through which contracts are published on-chain

use std::path::PathBuf;

use alloy::{
    network::TransactionBuilder,
    primitives::Address,
    providers::{DynProvider, Provider},
    rpc::types::TransactionRequest,
    signers::local::PrivateKeySigner,
};
use tracing::{debug, info};

use crate::{
    config::ScriptConfig,
    constants::NUM_DEPLOY_CONFIRMATIONS,
    errors::ScriptError,
    types::{ConstructorArgs, StakingContract},
    utils::{load_artifact, setup_client},
};

/// Publishes a single contract and reports the address it was deployed at
#[allow(async_fn_in_trait)]
pub trait ContractDeployer {
    /// Deploy `contract` with the given constructor arguments, resolving once
    /// the deployment transaction is confirmed
    async fn deploy(
        &self,
        contract: StakingContract,
        args: &ConstructorArgs,
    ) -> Result<Address, ScriptError>;
}

/// Deploys contracts from compiled Hardhat artifacts over JSON-RPC
pub struct RpcDeployer {
    /// The signing provider used to send deployment transactions
    provider: DynProvider,
    /// The directory holding the compiled contract artifacts
    artifacts_dir: PathBuf,
}

impl RpcDeployer {
    /// Wrap an already configured signing provider
    pub fn new(provider: DynProvider, artifacts_dir: PathBuf) -> Self {
        Self {
            provider,
            artifacts_dir,
        }
    }

    /// Connect to the configured network, signing with `signer`
    pub async fn connect(
        config: &ScriptConfig,
        signer: PrivateKeySigner,
    ) -> Result<Self, ScriptError> {
        let provider = setup_client(&config.profile, signer).await?;
        Ok(Self::new(provider, config.artifacts_dir.clone()))
    }
}

impl ContractDeployer for RpcDeployer {
    async fn deploy(
        &self,
        contract: StakingContract,
        args: &ConstructorArgs,
    ) -> Result<Address, ScriptError> {
        let artifact = load_artifact(&self.artifacts_dir, contract)?;

        let mut code = artifact.creation_code()?;
        code.extend(args.abi_encode(contract)?);
        debug!("deploying `{contract}` with {} bytes of init code", code.len());

        let tx = TransactionRequest::default().with_deploy_code(code);
        let receipt = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?
            .with_required_confirmations(NUM_DEPLOY_CONFIRMATIONS)
            .get_receipt()
            .await
            .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;

        if !receipt.status() {
            return Err(ScriptError::ContractDeployment(format!(
                "`{contract}` deployment reverted in tx {:#x}",
                receipt.transaction_hash
            )));
        }

        let address = receipt.contract_address.ok_or_else(|| {
            ScriptError::ContractDeployment(format!(
                "no contract address in receipt of tx {:#x}",
                receipt.transaction_hash
            ))
        })?;
        info!(
            "`{contract}` deployed in tx {:#x} (block {:?})",
            receipt.transaction_hash, receipt.block_number
        );

        Ok(address)
    }
}
