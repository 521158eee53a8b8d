//! Crypto Dev exchange client
//!
//! Holds a provider together with the exchange and token addresses. The
//! operations themselves live in the `swap`, `liquidity` and `reserves`
//! modules as extra `impl` blocks on [`CryptoDevDex`].

use crate::errors::DexError;
use crate::onchain::{CryptoDevExchange, CryptoDevToken};
use crate::DexConfig;
use alloy::network::{Ethereum, ReceiptResponse};
use alloy::primitives::{Address, TxHash};
use alloy::providers::{DynProvider, PendingTransactionBuilder, Provider};
use alloy::rpc::types::TransactionReceipt;
use tracing::{debug, info};

/// Number of confirmations every submitted transaction waits for
pub const CONFIRMATIONS: u64 = 1;

/// Client for a deployed exchange.
///
/// A read only provider is enough for quotes and reserve queries. Anything
/// that submits a transaction needs a provider with a wallet attached.
#[derive(Debug, Clone)]
pub struct CryptoDevDex<P> {
    pub(crate) provider: P,
    pub(crate) exchange: Address,
    pub(crate) token: Address,
}

impl<P: Provider> CryptoDevDex<P> {
    /// Constructor
    pub fn new(provider: P, exchange: Address, token: Address) -> Self {
        Self {
            provider,
            exchange,
            token,
        }
    }

    /// Address of the exchange contract
    pub fn exchange_address(&self) -> Address {
        self.exchange
    }

    /// Address of the Crypto Dev token contract
    pub fn token_address(&self) -> Address {
        self.token
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub(crate) fn exchange_contract(&self) -> CryptoDevExchange::CryptoDevExchangeInstance<&P> {
        CryptoDevExchange::new(self.exchange, &self.provider)
    }

    pub(crate) fn token_contract(&self) -> CryptoDevToken::CryptoDevTokenInstance<&P> {
        CryptoDevToken::new(self.token, &self.provider)
    }
}

impl CryptoDevDex<DynProvider> {
    /// Read only client from the configured endpoint
    pub fn read_only(config: &DexConfig) -> Result<Self, DexError> {
        Ok(Self::new(
            config.read_provider(),
            config.exchange()?,
            config.token()?,
        ))
    }

    /// Client that signs with the configured key
    pub async fn signing(config: &DexConfig) -> Result<Self, DexError> {
        Ok(Self::new(
            config.signing_provider().await?,
            config.exchange()?,
            config.token()?,
        ))
    }
}

/// Waits for a submitted transaction to be mined and fails if it reverted
pub(crate) async fn wait_for_receipt(
    pending: PendingTransactionBuilder<Ethereum>,
    action: &'static str,
) -> Result<TransactionReceipt, DexError> {
    let tx_hash = *pending.tx_hash();
    debug!(%tx_hash, action, "Waiting for confirmation");

    let receipt = pending
        .with_required_confirmations(CONFIRMATIONS)
        .get_receipt()
        .await?;
    ensure_success(&receipt)?;

    info!(%tx_hash, action, block = ?receipt.block_number, "Transaction confirmed");
    Ok(receipt)
}

/// Fails with the transaction hash if the receipt reports a revert
pub(crate) fn ensure_success(receipt: &TransactionReceipt) -> Result<(), DexError> {
    if receipt.status() {
        Ok(())
    } else {
        Err(DexError::TransactionReverted(receipt.transaction_hash))
    }
}

/// Same as [`wait_for_receipt`] but only keeps the transaction hash
pub(crate) async fn confirm(
    pending: PendingTransactionBuilder<Ethereum>,
    action: &'static str,
) -> Result<TxHash, DexError> {
    let receipt = wait_for_receipt(pending, action).await?;
    Ok(receipt.transaction_hash)
}
