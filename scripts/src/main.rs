use std::io;

use clap::Parser;
use scripts::{
    cli::{Cli, Command},
    config::{NetworkConfig, ScriptConfig},
    constants::SOLIDITY_COMPILER_VERSIONS,
    deployer::RpcDeployer,
    errors::ScriptError,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), ScriptError> {
    dotenv::dotenv().ok();

    let Cli {
        priv_key,
        rpc_url,
        network,
        artifacts,
        deployments_path,
        command,
    } = Cli::parse();

    tracing_subscriber::fmt()
        .pretty()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let networks = NetworkConfig::new(rpc_url, priv_key);
    let config = ScriptConfig::new(&networks, &network, artifacts, deployments_path)?;
    info!(
        "deploying artifacts from {} (solc {})",
        config.artifacts_dir.display(),
        SOLIDITY_COMPILER_VERSIONS.join(", ")
    );

    let mut stdout = io::stdout();
    command
        .unwrap_or(Command::DeployAll)
        .run(&config, &mut stdout, |signer| {
            RpcDeployer::connect(&config, signer)
        })
        .await
}
