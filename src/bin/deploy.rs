//! Exchange deployment program
//!
//! Deploys the Crypto Dev exchange against the token configured in the
//! environment and prints the address of the new contract.
use anyhow::{Context, Result};
use crypto_dev_dex::{deploy_exchange, ContractArtifact, DexConfig};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging, RUST_LOG takes precedence
    let filter = EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::builder()
            .parse("info,alloy_transport_http=off,alloy_rpc_client=off,hyper_util=off,reqwest=off")
    })?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = DexConfig::from_env().context("Failed to load configuration")?;
    let token = config.token()?;

    let artifact = ContractArtifact::load(config.artifact_path()).with_context(|| {
        format!(
            "Failed to load exchange artifact from {}",
            config.artifact_path().display()
        )
    })?;

    let provider = config.signing_provider().await?;
    info!(chain = %config.chain(), deployer = ?config.signer_address(), "Connected");

    let address = deploy_exchange(&provider, &artifact, token).await?;

    // print the address of the deployed contract
    println!("Exchange Contract Address: {address}");

    Ok(())
}
