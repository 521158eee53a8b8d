//! Client and deployment toolkit for the Crypto Dev exchange, a constant
//! product AMM that trades Ether against the Crypto Dev ERC20 token.
//!
//! Pricing and settlement happen in the exchange contract. This crate quotes
//! through it, submits swaps and liquidity changes, and deploys it.

pub use chain::Chain;
pub use config::{DexConfig, DexConfigBuilder};
pub use deploy::{deploy_contract, deploy_exchange, ContractArtifact};
pub use dex::CryptoDevDex;
pub use errors::DexError;
pub use liquidity::{cd_tokens_for_ether, tokens_after_remove, LiquidityShare};
pub use reserves::{AccountBalances, PoolReserves};
pub use swap::SwapDirection;

mod chain;
mod config;
mod deploy;
mod dex;
mod errors;
mod liquidity;
pub mod onchain;
mod reserves;
mod swap;
