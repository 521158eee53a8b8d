//! Chain Support
//!
//! This module defines the networks the exchange can be deployed to and
//! maps each of them to its EIP-155 chain id.

use crate::errors::DexError;
use std::fmt;
use std::str::FromStr;

/// Enum representing supported blockchain networks
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Chain {
    /// Ethereum mainnet
    Ethereum,
    /// Sepolia testnet
    #[default]
    Sepolia,
    /// Goerli testnet
    Goerli,
    /// Local development node (anvil or hardhat)
    Local,
}

impl Chain {
    /// The EIP-155 chain id of this network
    pub fn chain_id(&self) -> u64 {
        match self {
            Chain::Ethereum => 1,
            Chain::Sepolia => 11_155_111,
            Chain::Goerli => 5,
            Chain::Local => 31_337,
        }
    }

    /// Reverse lookup from a chain id reported by an endpoint
    pub fn from_chain_id(chain_id: u64) -> Option<Chain> {
        match chain_id {
            1 => Some(Chain::Ethereum),
            11_155_111 => Some(Chain::Sepolia),
            5 => Some(Chain::Goerli),
            31_337 => Some(Chain::Local),
            _ => None,
        }
    }

    /// Block explorer prefix for a transaction hash, None for a local node
    pub fn tx_explorer(&self) -> Option<&'static str> {
        match self {
            Chain::Ethereum => Some("https://etherscan.io/tx/"),
            Chain::Sepolia => Some("https://sepolia.etherscan.io/tx/"),
            Chain::Goerli => Some("https://goerli.etherscan.io/tx/"),
            Chain::Local => None,
        }
    }
}

impl FromStr for Chain {
    type Err = DexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ethereum" | "mainnet" => Ok(Chain::Ethereum),
            "sepolia" => Ok(Chain::Sepolia),
            "goerli" => Ok(Chain::Goerli),
            "local" | "anvil" | "hardhat" | "localhost" => Ok(Chain::Local),
            other => Err(DexError::UnknownChain(other.to_string())),
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Chain::Ethereum => write!(f, "Ethereum"),
            Chain::Sepolia => write!(f, "Sepolia"),
            Chain::Goerli => write!(f, "Goerli"),
            Chain::Local => write!(f, "Local"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_ids_round_trip() {
        for chain in [Chain::Ethereum, Chain::Sepolia, Chain::Goerli, Chain::Local] {
            assert_eq!(Chain::from_chain_id(chain.chain_id()), Some(chain));
        }
        assert_eq!(Chain::from_chain_id(137), None);
    }

    #[test]
    fn parses_aliases() {
        assert_eq!("Mainnet".parse::<Chain>().unwrap(), Chain::Ethereum);
        assert_eq!(" hardhat ".parse::<Chain>().unwrap(), Chain::Local);
        assert!(matches!(
            "rinkeby".parse::<Chain>(),
            Err(DexError::UnknownChain(name)) if name == "rinkeby"
        ));
    }

    #[test]
    fn local_has_no_explorer() {
        assert!(Chain::Local.tx_explorer().is_none());
        assert_eq!(
            Chain::Sepolia.tx_explorer(),
            Some("https://sepolia.etherscan.io/tx/")
        );
    }
}
