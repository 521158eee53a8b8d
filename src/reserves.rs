use crate::dex::CryptoDevDex;
use crate::errors::DexError;
use alloy::primitives::{Address, U256};
use alloy::providers::Provider;
use futures::try_join;
use tracing::{debug, error};

/// Snapshot of what the exchange holds
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct PoolReserves {
    /// Ether held by the exchange contract
    pub ether: U256,
    /// Crypto Dev tokens held by the exchange contract
    pub crypto_dev: U256,
    /// LP tokens in circulation
    pub lp_total_supply: U256,
}

impl PoolReserves {
    /// True until the first liquidity deposit
    pub fn is_empty(&self) -> bool {
        self.lp_total_supply.is_zero()
    }
}

/// Snapshot of one account's holdings
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct AccountBalances {
    pub ether: U256,
    pub crypto_dev: U256,
    pub lp_tokens: U256,
}

impl<P: Provider> CryptoDevDex<P> {
    /// Reads the exchange's Ether balance, Crypto Dev reserve and LP supply
    pub async fn reserves(&self) -> Result<PoolReserves, DexError> {
        let exchange = self.exchange_contract();

        let ether = async { Ok::<_, DexError>(self.provider.get_balance(self.exchange).await?) };
        let crypto_dev = async { Ok::<_, DexError>(exchange.getReserve().call().await?) };
        let lp_total_supply = async { Ok::<_, DexError>(exchange.totalSupply().call().await?) };

        let (ether, crypto_dev, lp_total_supply) = try_join!(ether, crypto_dev, lp_total_supply)
            .inspect_err(|e| error!(exchange = %self.exchange, "Failed to read reserves: {e}"))?;

        debug!(%ether, %crypto_dev, %lp_total_supply, "Fetched reserves");
        Ok(PoolReserves {
            ether,
            crypto_dev,
            lp_total_supply,
        })
    }

    /// Reads the Ether, Crypto Dev and LP token balances of `account`
    pub async fn balances(&self, account: Address) -> Result<AccountBalances, DexError> {
        let exchange = self.exchange_contract();
        let token = self.token_contract();

        let ether = async { Ok::<_, DexError>(self.provider.get_balance(account).await?) };
        let crypto_dev = async { Ok::<_, DexError>(token.balanceOf(account).call().await?) };
        let lp_tokens = async { Ok::<_, DexError>(exchange.balanceOf(account).call().await?) };

        let (ether, crypto_dev, lp_tokens) = try_join!(ether, crypto_dev, lp_tokens)
            .inspect_err(|e| error!(%account, "Failed to read balances: {e}"))?;

        Ok(AccountBalances {
            ether,
            crypto_dev,
            lp_tokens,
        })
    }
}
