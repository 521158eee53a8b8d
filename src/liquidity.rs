//! Adding and removing liquidity
//!
//! Withdrawals pay out each reserve in proportion to the share of LP tokens
//! burned. The exchange settles this on chain. [`tokens_after_remove`] repeats
//! the same floor division locally so a frontend can show the payout before
//! anything is signed.

use crate::dex::{confirm, CryptoDevDex};
use crate::errors::DexError;
use alloy::primitives::ruint::UintTryFrom;
use alloy::primitives::{TxHash, U256, U512};
use alloy::providers::Provider;
use tracing::{debug, error, info};

/// What a liquidity provider gets back for burning LP tokens
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct LiquidityShare {
    /// Ether paid out, in wei
    pub ether: U256,
    /// Crypto Dev tokens paid out, in minor units
    pub crypto_dev: U256,
}

/// Computes the payout for burning `remove_lp` out of `total_supply` LP tokens.
///
/// `ether = eth_balance * remove_lp / total_supply` and
/// `crypto_dev = cd_reserve * remove_lp / total_supply`, both rounded down.
///
/// None when `total_supply` is zero, or when a quotient does not fit in 256
/// bits (only possible if `remove_lp > total_supply`).
pub fn tokens_after_remove(
    eth_balance: U256,
    cd_reserve: U256,
    remove_lp: U256,
    total_supply: U256,
) -> Option<LiquidityShare> {
    Some(LiquidityShare {
        ether: mul_div(eth_balance, remove_lp, total_supply)?,
        crypto_dev: mul_div(cd_reserve, remove_lp, total_supply)?,
    })
}

/// `floor(a * b / denominator)` with a 512 bit intermediate product
fn mul_div(a: U256, b: U256, denominator: U256) -> Option<U256> {
    if denominator.is_zero() {
        return None;
    }
    let product: U512 = a.widening_mul(b);
    U256::uint_try_from(product / U512::from(denominator)).ok()
}

/// Crypto Dev tokens that must accompany `add_ether` to keep the pool ratio.
///
/// Returns None for an empty pool, where the first deposit sets the ratio
/// and any amount is accepted. Also None if the result exceeds 256 bits.
pub fn cd_tokens_for_ether(add_ether: U256, eth_balance: U256, cd_reserve: U256) -> Option<U256> {
    mul_div(add_ether, cd_reserve, eth_balance)
}

impl<P: Provider> CryptoDevDex<P> {
    /// Burns `lp_amount` LP tokens and withdraws the matching Ether and Crypto Dev tokens
    pub async fn remove_liquidity(&self, lp_amount: U256) -> Result<TxHash, DexError> {
        let result: Result<TxHash, DexError> = async {
            let pending = self
                .exchange_contract()
                .removeLiquidity(lp_amount)
                .send()
                .await?;
            confirm(pending, "removeLiquidity").await
        }
        .await;

        match &result {
            Ok(tx_hash) => info!(%lp_amount, %tx_hash, "Removed liquidity"),
            Err(e) => error!(%lp_amount, "Failed to remove liquidity: {e}"),
        }
        result
    }

    /// Reads the LP token supply and computes what burning `remove_lp` would pay out
    pub async fn get_tokens_after_remove(
        &self,
        remove_lp: U256,
        eth_balance: U256,
        cd_reserve: U256,
    ) -> Result<LiquidityShare, DexError> {
        let total_supply = self
            .exchange_contract()
            .totalSupply()
            .call()
            .await
            .inspect_err(|e| error!("Failed to read LP supply: {e}"))?;

        if total_supply.is_zero() {
            error!(exchange = %self.exchange, "Exchange has no LP tokens");
            return Err(DexError::EmptyLiquidityPool(self.exchange));
        }

        let share = tokens_after_remove(eth_balance, cd_reserve, remove_lp, total_supply)
            .ok_or(DexError::ArithmeticOverflow)
            .inspect_err(|_| error!(%remove_lp, %total_supply, "Withdrawal exceeds 256 bits"))?;
        debug!(%remove_lp, %total_supply, ether = %share.ether, crypto_dev = %share.crypto_dev, "Computed withdrawal");
        Ok(share)
    }

    /// Deposits `eth_amount` Ether and `cd_amount` Crypto Dev tokens for LP tokens.
    ///
    /// Approves the exchange for `cd_amount` first and waits for the approval.
    pub async fn add_liquidity(&self, cd_amount: U256, eth_amount: U256) -> Result<TxHash, DexError> {
        let result: Result<TxHash, DexError> = async {
            self.approve_exchange(cd_amount).await?;
            let pending = self
                .exchange_contract()
                .addLiquidity(cd_amount)
                .value(eth_amount)
                .send()
                .await?;
            confirm(pending, "addLiquidity").await
        }
        .await;

        match &result {
            Ok(tx_hash) => info!(%eth_amount, %cd_amount, %tx_hash, "Added liquidity"),
            Err(e) => error!(%eth_amount, %cd_amount, "Failed to add liquidity: {e}"),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dex::test_utils::{mocked_dex, push_uint, EXCHANGE};
    use alloy::transports::mock::Asserter;

    fn u(v: u64) -> U256 {
        U256::from(v)
    }

    #[test]
    fn remove_matches_reference_example() {
        let share = tokens_after_remove(u(100), u(500), u(10), u(50)).unwrap();
        assert_eq!(share.ether, u(20));
        assert_eq!(share.crypto_dev, u(100));
    }

    #[test]
    fn remove_rounds_down() {
        // 10 * 1 / 3 = 3.33..
        let share = tokens_after_remove(u(10), u(20), u(1), u(3)).unwrap();
        assert_eq!(share.ether, u(3));
        assert_eq!(share.crypto_dev, u(6));
    }

    #[test]
    fn remove_never_exceeds_reserves() {
        let eth = u(1_000_000_007);
        let cd = u(3_333_333_331);
        let supply = u(97);
        for lp in 0..=97u64 {
            let share = tokens_after_remove(eth, cd, u(lp), supply).unwrap();
            assert!(share.ether <= eth);
            assert!(share.crypto_dev <= cd);
        }
        let all = tokens_after_remove(eth, cd, supply, supply).unwrap();
        assert_eq!(all, LiquidityShare { ether: eth, crypto_dev: cd });
    }

    #[test]
    fn remove_from_empty_supply() {
        assert_eq!(tokens_after_remove(u(100), u(500), u(10), U256::ZERO), None);
    }

    #[test]
    fn remove_with_wide_intermediate_product() {
        // (MAX / 2) * 3 does not fit in 256 bits, the quotient does
        let eth = U256::MAX / u(2);
        let share = tokens_after_remove(eth, u(1), u(3), u(4)).unwrap();
        assert_eq!(share.ether, eth / u(4) * u(3) + (eth % u(4)) * u(3) / u(4));
        assert_eq!(share.crypto_dev, U256::ZERO);

        let all = tokens_after_remove(U256::MAX, U256::MAX, U256::MAX, U256::MAX).unwrap();
        assert_eq!(all.ether, U256::MAX);
        assert_eq!(all.crypto_dev, U256::MAX);
    }

    #[test]
    fn remove_more_than_supply_can_overflow() {
        assert_eq!(tokens_after_remove(U256::MAX, u(1), u(2), u(1)), None);
    }

    #[test]
    fn zero_lp_pays_nothing() {
        let share = tokens_after_remove(u(100), u(500), U256::ZERO, u(50)).unwrap();
        assert_eq!(share, LiquidityShare::default());
    }

    #[test]
    fn deposit_keeps_ratio() {
        // pool holds 2 ETH : 10 CD, so 1 ETH pairs with 5 CD
        let one = U256::from(10u64).pow(U256::from(18u64));
        let cd = cd_tokens_for_ether(one, one * u(2), one * u(10)).unwrap();
        assert_eq!(cd, one * u(5));
    }

    #[test]
    fn first_deposit_is_unconstrained() {
        assert_eq!(cd_tokens_for_ether(u(1), U256::ZERO, U256::ZERO), None);
    }

    #[tokio::test]
    async fn withdrawal_preview_uses_lp_supply() {
        let asserter = Asserter::new();
        push_uint(&asserter, 50);
        let dex = mocked_dex(asserter);

        let share = dex.get_tokens_after_remove(u(10), u(100), u(500)).await.unwrap();
        assert_eq!(share.ether, u(20));
        assert_eq!(share.crypto_dev, u(100));
    }

    #[tokio::test]
    async fn withdrawal_preview_on_empty_pool() {
        let asserter = Asserter::new();
        push_uint(&asserter, 0);
        let dex = mocked_dex(asserter);

        let err = dex.get_tokens_after_remove(u(10), u(100), u(500)).await.unwrap_err();
        assert!(matches!(err, DexError::EmptyLiquidityPool(addr) if addr == EXCHANGE));
    }

    #[tokio::test]
    async fn withdrawal_preview_wider_than_256_bits() {
        let asserter = Asserter::new();
        push_uint(&asserter, 1);
        let dex = mocked_dex(asserter);

        let err = dex.get_tokens_after_remove(u(2), U256::MAX, u(500)).await.unwrap_err();
        assert!(matches!(err, DexError::ArithmeticOverflow));
    }

    #[tokio::test]
    async fn withdrawal_preview_surfaces_rpc_failure() {
        let asserter = Asserter::new();
        asserter.push_failure_msg("header not found");
        let dex = mocked_dex(asserter);

        let err = dex.get_tokens_after_remove(u(10), u(100), u(500)).await.unwrap_err();
        assert!(matches!(err, DexError::ContractError(_)));
    }
}
