//! Read only view of a deployed exchange
//!
//! Usage: `quote <amount> [eth|cd]`
//!
//! Prints the pool reserves and what swapping `amount` of the chosen asset
//! (ether by default) would return. With a `PRIVATE_KEY` configured it also
//! prints the account's balances and what withdrawing all of its LP tokens
//! would pay out.
use alloy::primitives::utils::{format_ether, parse_ether};
use anyhow::{bail, Context, Result};
use crypto_dev_dex::{CryptoDevDex, DexConfig, SwapDirection};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::builder()
            .parse("warn,alloy_transport_http=off,alloy_rpc_client=off,hyper_util=off,reqwest=off")
    })?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let mut args = std::env::args().skip(1);
    let amount = args.next().context("usage: quote <amount> [eth|cd]")?;
    let amount = parse_ether(&amount).with_context(|| format!("Invalid amount {amount}"))?;
    let direction = match args.next().as_deref() {
        None | Some("eth") => SwapDirection::EthToCryptoDev,
        Some("cd") => SwapDirection::CryptoDevToEth,
        Some(other) => bail!("Unknown asset {other}, expected eth or cd"),
    };

    let config = DexConfig::from_env().context("Failed to load configuration")?;
    let dex = CryptoDevDex::read_only(&config)?;

    let reserves = dex.reserves().await?;
    println!("Exchange {} on {}", dex.exchange_address(), config.chain());
    println!("  ETH reserve:     {}", format_ether(reserves.ether));
    println!("  CD reserve:      {}", format_ether(reserves.crypto_dev));
    println!("  LP total supply: {}", format_ether(reserves.lp_total_supply));

    if reserves.is_empty() {
        println!("Pool has no liquidity yet");
        return Ok(());
    }

    let received = dex
        .get_amount_of_tokens_received_from_swap(amount, direction, reserves.ether, reserves.crypto_dev)
        .await?;
    println!(
        "Swap {direction}: {} in, {} out",
        format_ether(amount),
        format_ether(received)
    );

    if let Some(account) = config.signer_address() {
        let balances = dex.balances(account).await?;
        println!("Account {account}");
        println!("  ETH: {}", format_ether(balances.ether));
        println!("  CD:  {}", format_ether(balances.crypto_dev));
        println!("  LP:  {}", format_ether(balances.lp_tokens));

        let share = dex
            .get_tokens_after_remove(balances.lp_tokens, reserves.ether, reserves.crypto_dev)
            .await?;
        println!(
            "  Withdrawing all LP returns {} ETH and {} CD",
            format_ether(share.ether),
            format_ether(share.crypto_dev)
        );
    }

    Ok(())
}
