//! Swap quotes and submission
//!
//! Pricing happens on chain through `getAmountOfTokens`. This module only
//! orders the reserves for the chosen direction and submits the swap.

use crate::dex::{confirm, CryptoDevDex};
use crate::errors::DexError;
use crate::onchain::CryptoDevExchange::getAmountOfTokensCall;
use alloy::contract::SolCallBuilder;
use alloy::primitives::{TxHash, U256};
use alloy::providers::Provider;
use std::fmt;
use tracing::{debug, error, info};

/// Which asset the user is paying with
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SwapDirection {
    /// Pay Ether, receive Crypto Dev tokens
    EthToCryptoDev,
    /// Pay Crypto Dev tokens, receive Ether
    CryptoDevToEth,
}

impl SwapDirection {
    /// Maps the "is Ether selected" toggle of a swap form onto a direction
    pub fn from_eth_selected(eth_selected: bool) -> Self {
        if eth_selected {
            SwapDirection::EthToCryptoDev
        } else {
            SwapDirection::CryptoDevToEth
        }
    }

    /// Returns (input reserve, output reserve) for this direction
    pub fn order_reserves(&self, eth_reserve: U256, cd_reserve: U256) -> (U256, U256) {
        match self {
            SwapDirection::EthToCryptoDev => (eth_reserve, cd_reserve),
            SwapDirection::CryptoDevToEth => (cd_reserve, eth_reserve),
        }
    }
}

impl fmt::Display for SwapDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwapDirection::EthToCryptoDev => write!(f, "ETH -> CD"),
            SwapDirection::CryptoDevToEth => write!(f, "CD -> ETH"),
        }
    }
}

impl<P: Provider> CryptoDevDex<P> {
    /// Returns how much of the output asset the exchange would pay for
    /// `swap_amount` of the input asset, given the current reserves.
    pub async fn get_amount_of_tokens_received_from_swap(
        &self,
        swap_amount: U256,
        direction: SwapDirection,
        eth_balance: U256,
        cd_reserve: U256,
    ) -> Result<U256, DexError> {
        let amount = self
            .quote_request(swap_amount, direction, eth_balance, cd_reserve)
            .call()
            .await
            .inspect_err(|e| error!(%direction, "Failed to quote swap: {e}"))?;

        debug!(%direction, %swap_amount, %amount, "Quoted swap");
        Ok(amount)
    }

    /// `getAmountOfTokens` call with the reserves ordered for `direction`
    fn quote_request(
        &self,
        swap_amount: U256,
        direction: SwapDirection,
        eth_balance: U256,
        cd_reserve: U256,
    ) -> SolCallBuilder<&P, getAmountOfTokensCall> {
        let (input_reserve, output_reserve) = direction.order_reserves(eth_balance, cd_reserve);
        self.exchange_contract()
            .getAmountOfTokens(swap_amount, input_reserve, output_reserve)
            .with_cloned_provider()
    }

    /// Swaps `swap_amount` of the input asset for at least `min_received` of the output.
    ///
    /// Selling Crypto Dev tokens first approves the exchange for `swap_amount`
    /// and waits for that approval before swapping. Returns the hash of the
    /// swap transaction once it has one confirmation.
    pub async fn swap_tokens(
        &self,
        swap_amount: U256,
        min_received: U256,
        direction: SwapDirection,
    ) -> Result<TxHash, DexError> {
        let result = match direction {
            SwapDirection::EthToCryptoDev => self.swap_eth_for_tokens(swap_amount, min_received).await,
            SwapDirection::CryptoDevToEth => self.swap_tokens_for_eth(swap_amount, min_received).await,
        };

        match &result {
            Ok(tx_hash) => info!(%direction, %swap_amount, %tx_hash, "Swap complete"),
            Err(e) => error!(%direction, %swap_amount, "Swap failed: {e}"),
        }
        result
    }

    async fn swap_eth_for_tokens(&self, value: U256, min_tokens: U256) -> Result<TxHash, DexError> {
        let pending = self
            .exchange_contract()
            .ethToCryptoDevToken(min_tokens)
            .value(value)
            .send()
            .await?;
        confirm(pending, "ethToCryptoDevToken").await
    }

    async fn swap_tokens_for_eth(&self, tokens_sold: U256, min_eth: U256) -> Result<TxHash, DexError> {
        self.approve_exchange(tokens_sold).await?;

        let pending = self
            .exchange_contract()
            .cryptoDevTokenToEth(tokens_sold, min_eth)
            .send()
            .await?;
        confirm(pending, "cryptoDevTokenToEth").await
    }

    /// Lets the exchange pull `amount` Crypto Dev tokens from the signer
    pub(crate) async fn approve_exchange(&self, amount: U256) -> Result<TxHash, DexError> {
        let pending = self
            .token_contract()
            .approve(self.exchange, amount)
            .send()
            .await?;
        confirm(pending, "approve").await
    }
}
