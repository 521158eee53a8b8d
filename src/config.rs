//! Exchange Configuration
//!
//! This module provides a builder for the endpoint, signing key and contract
//! addresses needed to talk to a deployed exchange. The builder can be filled
//! by hand or from the process environment (with `.env` support).

use crate::errors::DexError;
use crate::Chain;
use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use alloy::transports::http::reqwest::Url;
use std::path::PathBuf;
use tracing::debug;

/// Default location of the compiled exchange contract in a hardhat project
pub const DEFAULT_ARTIFACT_PATH: &str = "artifacts/contracts/Exchange.sol/Exchange.json";

// Environment variables read by `DexConfig::from_env`
const RPC_URL_VAR: &str = "RPC_URL";
const PRIVATE_KEY_VAR: &str = "PRIVATE_KEY";
const TOKEN_ADDRESS_VAR: &str = "CRYPTO_DEV_TOKEN_CONTRACT_ADDRESS";
const EXCHANGE_ADDRESS_VAR: &str = "EXCHANGE_CONTRACT_ADDRESS";
const CHAIN_VAR: &str = "CHAIN";
const ARTIFACT_VAR: &str = "EXCHANGE_ARTIFACT";

/// Fully validated configuration
#[derive(Debug, Clone)]
pub struct DexConfig {
    endpoint: Url,
    chain: Chain,
    signer: Option<PrivateKeySigner>,
    token: Option<Address>,
    exchange: Option<Address>,
    artifact_path: PathBuf,
}

/// Builder for constructing a DexConfig
#[derive(Default)]
pub struct DexConfigBuilder {
    endpoint: Option<String>,
    chain: Option<Chain>,
    private_key: Option<String>,
    token: Option<String>,
    exchange: Option<String>,
    artifact_path: Option<PathBuf>,
}

impl DexConfigBuilder {
    /// Sets the rpc endpoint
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Sets the chain the endpoint is expected to serve
    pub fn chain(mut self, chain: Chain) -> Self {
        self.chain = Some(chain);
        self
    }

    /// Sets the hex encoded private key used to sign transactions
    pub fn private_key(mut self, key: impl Into<String>) -> Self {
        self.private_key = Some(key.into());
        self
    }

    /// Sets the Crypto Dev token address
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Sets the exchange address
    pub fn exchange(mut self, exchange: impl Into<String>) -> Self {
        self.exchange = Some(exchange.into());
        self
    }

    /// Sets the path of the compiled exchange artifact
    pub fn artifact_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.artifact_path = Some(path.into());
        self
    }

    /// Fills every field that has a matching environment variable
    pub fn with_env(mut self) -> Result<Self, DexError> {
        dotenv::dotenv().ok();
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        if let Some(endpoint) = var(RPC_URL_VAR) {
            self.endpoint = Some(endpoint);
        }
        if let Some(key) = var(PRIVATE_KEY_VAR) {
            self.private_key = Some(key);
        }
        if let Some(token) = var(TOKEN_ADDRESS_VAR) {
            self.token = Some(token);
        }
        if let Some(exchange) = var(EXCHANGE_ADDRESS_VAR) {
            self.exchange = Some(exchange);
        }
        if let Some(chain) = var(CHAIN_VAR) {
            self.chain = Some(chain.parse()?);
        }
        if let Some(path) = var(ARTIFACT_VAR) {
            self.artifact_path = Some(PathBuf::from(path));
        }
        Ok(self)
    }

    /// Consumes the builder and produces a validated DexConfig
    pub fn build(self) -> Result<DexConfig, DexError> {
        // The endpoint is the only mandatory field
        let endpoint = self.endpoint.ok_or(DexError::EndpointNotSet)?;
        let endpoint = endpoint
            .trim()
            .parse::<Url>()
            .map_err(|_| DexError::ParseEndpointError)?;

        let signer = self
            .private_key
            .map(|key| {
                key.trim()
                    .parse::<PrivateKeySigner>()
                    .map_err(|_| DexError::InvalidPrivateKey)
            })
            .transpose()?;

        let token = parse_address(self.token, "token")?;
        let exchange = parse_address(self.exchange, "exchange")?;

        Ok(DexConfig {
            endpoint,
            chain: self.chain.unwrap_or_default(),
            signer,
            token,
            exchange,
            artifact_path: self
                .artifact_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_ARTIFACT_PATH)),
        })
    }
}

fn parse_address(raw: Option<String>, label: &'static str) -> Result<Option<Address>, DexError> {
    raw.map(|addr| {
        addr.trim()
            .parse::<Address>()
            .map_err(|_| DexError::ParseAddressError(label))
    })
    .transpose()
}

impl DexConfig {
    /// Constructs a builder
    pub fn builder() -> DexConfigBuilder {
        DexConfigBuilder::default()
    }

    /// Loads `.env` and builds the configuration from the environment
    pub fn from_env() -> Result<DexConfig, DexError> {
        DexConfigBuilder::default().with_env()?.build()
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn chain(&self) -> Chain {
        self.chain
    }

    pub fn artifact_path(&self) -> &PathBuf {
        &self.artifact_path
    }

    /// Address of the account that signs, if a key is configured
    pub fn signer_address(&self) -> Option<Address> {
        self.signer.as_ref().map(|signer| signer.address())
    }

    pub fn token(&self) -> Result<Address, DexError> {
        self.token.ok_or(DexError::AddressNotSet("token"))
    }

    pub fn exchange(&self) -> Result<Address, DexError> {
        self.exchange.ok_or(DexError::AddressNotSet("exchange"))
    }

    /// Read only provider, enough for quotes and balance queries
    pub fn read_provider(&self) -> DynProvider {
        ProviderBuilder::new()
            .connect_http(self.endpoint.clone())
            .erased()
    }

    /// Provider that fills nonce, gas and chain id and signs with the configured key.
    /// The endpoint must serve the configured chain.
    pub async fn signing_provider(&self) -> Result<DynProvider, DexError> {
        let signer = self.signer.clone().ok_or(DexError::SignerNotSet)?;
        debug!(account = %signer.address(), chain = %self.chain, "Building signing provider");

        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect_http(self.endpoint.clone())
            .erased();

        let actual = provider.get_chain_id().await?;
        let expected = self.chain.chain_id();
        if actual != expected {
            return Err(DexError::ChainMismatch { expected, actual });
        }
        Ok(provider)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    // Well known first account of a local anvil/hardhat node
    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn endpoint_is_required() {
        let err = DexConfig::builder().build().unwrap_err();
        assert!(matches!(err, DexError::EndpointNotSet));
    }

    #[test]
    fn rejects_bad_endpoint() {
        let err = DexConfig::builder().endpoint("not a url").build().unwrap_err();
        assert!(matches!(err, DexError::ParseEndpointError));
    }

    #[test]
    fn defaults_without_optional_fields() {
        let config = DexConfig::builder()
            .endpoint("http://127.0.0.1:8545")
            .build()
            .unwrap();
        assert_eq!(config.chain(), Chain::Sepolia);
        assert_eq!(config.artifact_path(), &PathBuf::from(DEFAULT_ARTIFACT_PATH));
        assert!(config.signer_address().is_none());
        assert!(matches!(config.token(), Err(DexError::AddressNotSet("token"))));
        assert!(matches!(
            config.exchange(),
            Err(DexError::AddressNotSet("exchange"))
        ));
    }

    #[test]
    fn parses_key_and_addresses() {
        let config = DexConfig::builder()
            .endpoint("http://127.0.0.1:8545")
            .chain(Chain::Local)
            .private_key(DEV_KEY)
            .token("0x5FbDB2315678afecb367f032d93F642f64180aa3")
            .exchange("0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512")
            .build()
            .unwrap();

        assert_eq!(
            config.signer_address(),
            Some(address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266"))
        );
        assert_eq!(
            config.token().unwrap(),
            address!("5FbDB2315678afecb367f032d93F642f64180aa3")
        );
        assert_eq!(
            config.exchange().unwrap(),
            address!("e7f1725E7734CE288F8367e1Bb143E90bb3F0512")
        );
    }

    #[test]
    fn rejects_bad_key_and_address() {
        let err = DexConfig::builder()
            .endpoint("http://127.0.0.1:8545")
            .private_key("0x1234")
            .build()
            .unwrap_err();
        assert!(matches!(err, DexError::InvalidPrivateKey));

        let err = DexConfig::builder()
            .endpoint("http://127.0.0.1:8545")
            .token("0xnothex")
            .build()
            .unwrap_err();
        assert!(matches!(err, DexError::ParseAddressError("token")));
    }

    #[tokio::test]
    async fn signing_requires_a_key() {
        let config = DexConfig::builder()
            .endpoint("http://127.0.0.1:8545")
            .build()
            .unwrap();
        assert!(matches!(
            config.signing_provider().await,
            Err(DexError::SignerNotSet)
        ));
    }
}
