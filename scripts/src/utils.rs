//! Utilities for the deploy scripts.

use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use alloy::{
    network::EthereumWallet,
    primitives::{hex, Address},
    providers::{DynProvider, Provider, ProviderBuilder},
    signers::local::PrivateKeySigner,
    transports::http::reqwest::Url,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{info, warn};

use crate::{
    config::NetworkProfile,
    constants::{CONTRACTS_PATH_SEGMENT, DEPLOYMENTS_KEY, JSON_EXTENSION, SOLIDITY_EXTENSION},
    errors::ScriptError,
    types::StakingContract,
};

/// Sets up a signing client for the given network, warning if the node
/// reports an unexpected chain ID
pub async fn setup_client(
    profile: &NetworkProfile,
    signer: PrivateKeySigner,
) -> Result<DynProvider, ScriptError> {
    let url = Url::parse(profile.url()?)
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;

    let provider = ProviderBuilder::new()
        .wallet(EthereumWallet::from(signer))
        .on_http(url);

    let chain_id = provider
        .get_chain_id()
        .await
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    if chain_id != profile.chain_id {
        warn!(
            "node reports chain ID {chain_id}, expected {}",
            profile.chain_id
        );
    } else {
        info!("connected to chain ID {chain_id}");
    }

    Ok(provider.erased())
}

// -------------
// | Artifacts |
// -------------

/// The subset of a Hardhat compilation artifact needed to deploy a contract
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HardhatArtifact {
    /// The name of the compiled contract
    pub contract_name: String,
    /// The hex-encoded creation bytecode
    pub bytecode: String,
}

impl HardhatArtifact {
    /// Decode the creation bytecode, rejecting artifacts without any
    /// (interfaces and abstract contracts)
    pub fn creation_code(&self) -> Result<Vec<u8>, ScriptError> {
        let code =
            hex::decode(&self.bytecode).map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?;

        if code.is_empty() {
            return Err(ScriptError::ArtifactParsing(format!(
                "`{}` has no creation bytecode",
                self.contract_name
            )));
        }

        Ok(code)
    }
}

/// Locate the artifact of the given contract anywhere under
/// `<artifacts>/contracts`.
///
/// Hardhat mirrors the source tree, so the artifact sits at
/// `contracts/<path>/<Source>.sol/<Name>.json` for some source path. Exactly
/// one match is accepted.
fn find_artifact(artifacts_dir: &Path, contract: StakingContract) -> Result<PathBuf, ScriptError> {
    let file_name = format!("{}.{JSON_EXTENSION}", contract.artifact_name());
    let contracts_dir = artifacts_dir.join(CONTRACTS_PATH_SEGMENT);

    let mut found = Vec::new();
    collect_artifacts(&contracts_dir, &file_name, &mut found)?;
    found.sort();

    match found.len() {
        0 => Err(ScriptError::ArtifactParsing(format!(
            "no artifact for `{}` under {}; were the contracts compiled?",
            contract.artifact_name(),
            contracts_dir.display()
        ))),
        1 => Ok(found.remove(0)),
        _ => {
            let paths: Vec<String> = found.iter().map(|p| p.display().to_string()).collect();
            Err(ScriptError::ArtifactParsing(format!(
                "multiple artifacts for `{}`: {}",
                contract.artifact_name(),
                paths.join(", ")
            )))
        }
    }
}

/// Recursively collect every `file_name` directly inside a `*.sol` directory under `dir`
fn collect_artifacts(
    dir: &Path,
    file_name: &str,
    found: &mut Vec<PathBuf>,
) -> Result<(), ScriptError> {
    let entries = fs::read_dir(dir)
        .map_err(|e| ScriptError::ArtifactParsing(format!("{}: {e}", dir.display())))?;

    for entry in entries {
        let path = entry
            .map_err(|e| ScriptError::ArtifactParsing(format!("{}: {e}", dir.display())))?
            .path();
        if !path.is_dir() {
            continue;
        }

        let is_source_dir = path
            .extension()
            .is_some_and(|ext| ext == SOLIDITY_EXTENSION);
        let candidate = path.join(file_name);
        if is_source_dir && candidate.is_file() {
            found.push(candidate);
        }

        collect_artifacts(&path, file_name, found)?;
    }

    Ok(())
}

/// Read and parse the compiled artifact of the given contract
pub fn load_artifact(
    artifacts_dir: &Path,
    contract: StakingContract,
) -> Result<HardhatArtifact, ScriptError> {
    let path = find_artifact(artifacts_dir, contract)?;
    let contents =
        fs::read_to_string(&path).map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?;

    let artifact: HardhatArtifact = serde_json::from_str(&contents)
        .map_err(|e| ScriptError::ArtifactParsing(format!("{}: {e}", path.display())))?;

    if artifact.contract_name != contract.artifact_name() {
        return Err(ScriptError::ArtifactParsing(format!(
            "{} holds `{}`, expected `{}`",
            path.display(),
            artifact.contract_name,
            contract.artifact_name()
        )));
    }

    Ok(artifact)
}

// ---------------
// | Deployments |
// ---------------

/// Read the deployments file as JSON
pub fn get_json_from_file(file_path: &Path) -> Result<Value, ScriptError> {
    let contents =
        fs::read_to_string(file_path).map_err(|e| ScriptError::ReadDeployments(e.to_string()))?;

    serde_json::from_str(&contents).map_err(|e| ScriptError::ReadDeployments(e.to_string()))
}

/// Read the address of a contract deployed to `network` from the deployments file
pub fn parse_addr_from_deployments_file(
    file_path: &Path,
    network: &str,
    contract_key: &str,
) -> Result<Address, ScriptError> {
    let parsed_json = get_json_from_file(file_path)?;

    let addr = parsed_json[DEPLOYMENTS_KEY][network][contract_key]
        .as_str()
        .ok_or_else(|| {
            ScriptError::ReadDeployments(format!(
                "no `{contract_key}` address for network `{network}`"
            ))
        })?;

    Address::from_str(addr).map_err(|e| ScriptError::ReadDeployments(e.to_string()))
}

/// Record the address of a contract deployed to `network` in the deployments
/// file, creating the file if it doesn't exist
pub fn write_deployed_address(
    file_path: &Path,
    network: &str,
    contract_key: &str,
    address: Address,
) -> Result<(), ScriptError> {
    let mut parsed_json = if file_path.exists() {
        get_json_from_file(file_path)?
    } else {
        json!({})
    };

    let root = parsed_json.as_object_mut().ok_or_else(|| {
        ScriptError::WriteDeployments("deployments file is not a JSON object".to_string())
    })?;
    let network_deployments = object_entry(root, DEPLOYMENTS_KEY)
        .and_then(|deployments| object_entry(deployments, network))?;
    network_deployments.insert(
        contract_key.to_string(),
        Value::String(format!("{address:#x}")),
    );

    let contents = serde_json::to_string_pretty(&parsed_json)
        .map_err(|e| ScriptError::WriteDeployments(e.to_string()))?;
    fs::write(file_path, contents).map_err(|e| ScriptError::WriteDeployments(e.to_string()))
}

/// Get the object stored under `key` in `map`, inserting an empty one if absent
fn object_entry<'a>(
    map: &'a mut Map<String, Value>,
    key: &str,
) -> Result<&'a mut Map<String, Value>, ScriptError> {
    map.entry(key)
        .or_insert_with(|| json!({}))
        .as_object_mut()
        .ok_or_else(|| ScriptError::WriteDeployments(format!("`{key}` is not an object")))
}
