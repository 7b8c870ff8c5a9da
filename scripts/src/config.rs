//! Network profiles and the run configuration of the deploy scripts

use std::{collections::BTreeMap, path::PathBuf, str::FromStr};

use alloy::signers::local::PrivateKeySigner;
use tracing::debug;

use crate::{
    constants::{
        HEX_PREFIX, LOCALHOST_CHAIN_ID, LOCALHOST_NETWORK, PRIVATE_KEY_ENV_VAR, RINKEBY_CHAIN_ID,
        RINKEBY_NETWORK, RPC_URL_ENV_VAR,
    },
    errors::ScriptError,
};

/// The connection details of a single named network
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkProfile {
    /// The RPC endpoint, if one was configured
    pub url: Option<String>,
    /// The `0x`-prefixed private keys of the accounts used on this network
    pub accounts: Vec<String>,
    /// The chain ID the endpoint is expected to report
    pub chain_id: u64,
}

impl NetworkProfile {
    /// The RPC endpoint of the network
    pub fn url(&self) -> Result<&str, ScriptError> {
        self.url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| ScriptError::Credential(format!("{RPC_URL_ENV_VAR} is not set")))
    }

    /// Derive the signer from the first configured account
    pub fn signer(&self) -> Result<PrivateKeySigner, ScriptError> {
        let key = self
            .accounts
            .first()
            .ok_or_else(|| ScriptError::Credential(format!("{PRIVATE_KEY_ENV_VAR} is not set")))?;

        PrivateKeySigner::from_str(key).map_err(|e| ScriptError::Credential(e.to_string()))
    }
}

/// The set of networks a deployment can target, keyed by name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    /// The network profiles
    networks: BTreeMap<String, NetworkProfile>,
}

impl NetworkConfig {
    /// Build the `localhost` and `rinkeby` profiles, both pointing at the given
    /// endpoint and signing with the given key
    pub fn new(rpc_url: Option<String>, private_key: Option<String>) -> Self {
        let accounts: Vec<String> = private_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .map(|key| prefixed_key(&key))
            .into_iter()
            .collect();

        let networks = [
            (LOCALHOST_NETWORK, LOCALHOST_CHAIN_ID),
            (RINKEBY_NETWORK, RINKEBY_CHAIN_ID),
        ]
        .into_iter()
        .map(|(name, chain_id)| {
            let profile = NetworkProfile {
                url: rpc_url.clone(),
                accounts: accounts.clone(),
                chain_id,
            };
            (name.to_string(), profile)
        })
        .collect();

        Self { networks }
    }

    /// Look up the profile of the given network
    pub fn profile(&self, network: &str) -> Result<&NetworkProfile, ScriptError> {
        self.networks.get(network).ok_or_else(|| {
            let known = self.networks.keys().cloned().collect::<Vec<_>>().join(", ");
            ScriptError::UnknownNetwork(format!("`{network}` (expected one of: {known})"))
        })
    }

    /// The names of all configured networks
    pub fn network_names(&self) -> impl Iterator<Item = &str> {
        self.networks.keys().map(String::as_str)
    }
}

/// Prepend the hex prefix to a private key, unless it already carries one in
/// either case. An existing prefix is normalized to lowercase
fn prefixed_key(key: &str) -> String {
    let stripped = match key.get(..HEX_PREFIX.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(HEX_PREFIX) => &key[HEX_PREFIX.len()..],
        _ => key,
    };
    format!("{HEX_PREFIX}{stripped}")
}

/// The configuration of a single run of the deploy scripts.
///
/// Constructed once at startup and then only borrowed.
#[derive(Debug, Clone)]
pub struct ScriptConfig {
    /// The name of the targeted network
    pub network: String,
    /// The profile of the targeted network
    pub profile: NetworkProfile,
    /// The directory holding the compiled contract artifacts
    pub artifacts_dir: PathBuf,
    /// The file to which deployed addresses are recorded, if any
    pub deployments_path: Option<PathBuf>,
}

impl ScriptConfig {
    /// Select the given network out of the network config
    pub fn new(
        networks: &NetworkConfig,
        network: &str,
        artifacts_dir: PathBuf,
        deployments_path: Option<PathBuf>,
    ) -> Result<Self, ScriptError> {
        let profile = networks.profile(network)?.clone();
        debug!("selected network `{network}` (chain ID {})", profile.chain_id);

        Ok(Self {
            network: network.to_string(),
            profile,
            artifacts_dir,
            deployments_path,
        })
    }
}
