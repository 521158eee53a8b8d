//! Crypto Dev DEX Error Types
//!
//! This module defines the error type returned by every exchange operation.
//! It leverages the `thiserror` crate for deriving the `Error` trait and providing
//! formatted error messages.

use alloy::primitives::{Address, TxHash};
use thiserror::Error;

/// Enumerates the various error types that can occur while talking to the exchange
#[derive(Error, Debug)]
pub enum DexError {
    /// A contract call or transaction submission was rejected
    #[error("Contract error: {0}")]
    ContractError(#[from] alloy::contract::Error),

    /// Represents errors that occur when interacting with the rpc endpoint
    #[error("Provider error: {0}")]
    ProviderError(#[from] alloy::transports::TransportError),

    /// The transaction was sent but never reached the required confirmations
    #[error("Pending transaction error: {0}")]
    PendingTransactionError(#[from] alloy::providers::PendingTransactionError),

    /// The transaction was mined but reverted
    #[error("Transaction {0} reverted")]
    TransactionReverted(TxHash),

    /// Represents I/O errors that may occur while reading a contract artifact
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Represents errors that occur during JSON deserialization of an artifact
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The artifact has no creation bytecode, it is an interface or abstract contract
    #[error("Artifact {0} has no deployable bytecode")]
    EmptyBytecode(String),

    /// The deployment receipt did not carry a contract address
    #[error("Deployment failed")]
    FailedDeployment,

    /// Rpc endpoint is not set
    #[error("Rpc endpoint not set")]
    EndpointNotSet,

    /// Unable to parse endpoint
    #[error("Failed to parse endpoint into URL")]
    ParseEndpointError,

    /// An operation that signs was requested without a key
    #[error("Private key not set")]
    SignerNotSet,

    #[error("Invalid private key")]
    InvalidPrivateKey,

    /// A required contract address is missing from the configuration
    #[error("{0} address not set")]
    AddressNotSet(&'static str),

    #[error("Failed to parse {0} address")]
    ParseAddressError(&'static str),

    #[error("Unknown chain {0}")]
    UnknownChain(String),

    /// The endpoint serves a different chain than the one configured
    #[error("Chain mismatch: expected chain id {expected}, endpoint reports {actual}")]
    ChainMismatch { expected: u64, actual: u64 },

    /// The exchange has no LP tokens in circulation
    #[error("Exchange {0} has no liquidity")]
    EmptyLiquidityPool(Address),

    /// A ratio product does not fit in 256 bits
    #[error("Arithmetic overflow")]
    ArithmeticOverflow,
}
