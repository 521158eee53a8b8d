//! Exchange deployment
//!
//! Deploys the compiled exchange contract against an existing Crypto Dev
//! token. The creation bytecode comes from the build artifact written by
//! hardhat (`artifacts/contracts/Exchange.sol/Exchange.json`) or forge
//! (`out/Exchange.sol/Exchange.json`).

use crate::dex::{ensure_success, wait_for_receipt};
use crate::errors::DexError;
use crate::onchain::CryptoDevExchange;
use alloy::network::{ReceiptResponse, TransactionBuilder};
use alloy::primitives::{Address, Bytes};
use alloy::providers::Provider;
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use alloy::sol_types::SolConstructor;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, error, info};

/// A compiled contract, reduced to what deployment needs
#[derive(Debug, Clone)]
pub struct ContractArtifact {
    pub name: String,
    pub bytecode: Bytes,
}

// Hardhat stores the bytecode as a hex string, forge nests it under `object`
#[derive(Deserialize)]
#[serde(untagged)]
enum RawBytecode {
    Hex(Bytes),
    Object { object: Bytes },
}

#[derive(Deserialize)]
struct RawArtifact {
    #[serde(rename = "contractName")]
    contract_name: Option<String>,
    bytecode: RawBytecode,
}

impl ContractArtifact {
    /// Parses an artifact, `fallback_name` is used when the artifact carries no name
    pub fn from_json(json: &str, fallback_name: &str) -> Result<Self, DexError> {
        let raw: RawArtifact = serde_json::from_str(json)?;
        let name = raw
            .contract_name
            .unwrap_or_else(|| fallback_name.to_string());
        let bytecode = match raw.bytecode {
            RawBytecode::Hex(bytes) | RawBytecode::Object { object: bytes } => bytes,
        };

        if bytecode.is_empty() {
            return Err(DexError::EmptyBytecode(name));
        }
        Ok(Self { name, bytecode })
    }

    /// Reads and parses an artifact from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DexError> {
        let path = path.as_ref();
        let fallback = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("Exchange");

        let json = std::fs::read_to_string(path)?;
        let artifact = Self::from_json(&json, fallback)?;
        debug!(path = %path.display(), name = %artifact.name, size = artifact.bytecode.len(), "Loaded artifact");
        Ok(artifact)
    }

    /// Creation code followed by already ABI encoded constructor arguments
    pub fn init_code(&self, constructor_args: &[u8]) -> Bytes {
        let mut code = Vec::with_capacity(self.bytecode.len() + constructor_args.len());
        code.extend_from_slice(&self.bytecode);
        code.extend_from_slice(constructor_args);
        code.into()
    }

    /// Init code for the exchange, whose only constructor argument is the token
    pub fn exchange_init_code(&self, token: Address) -> Bytes {
        let args = CryptoDevExchange::constructorCall {
            _CryptoDevtoken: token,
        }
        .abi_encode();
        self.init_code(&args)
    }
}

/// Address created by a deployment receipt
pub(crate) fn deployed_address(receipt: &TransactionReceipt) -> Result<Address, DexError> {
    ensure_success(receipt)?;
    receipt.contract_address().ok_or(DexError::FailedDeployment)
}

/// Sends a create transaction with `init_code` and returns the new contract's address
pub async fn deploy_contract<P: Provider>(
    provider: &P,
    name: &str,
    init_code: Bytes,
) -> Result<Address, DexError> {
    let deployment = async {
        let tx = TransactionRequest::default().with_deploy_code(init_code);
        let pending = provider.send_transaction(tx).await?;
        let receipt = wait_for_receipt(pending, "deploy").await?;
        deployed_address(&receipt)
    };

    match deployment.await {
        Ok(address) => {
            info!(contract = name, %address, "Contract deployed");
            Ok(address)
        }
        Err(e) => {
            error!(contract = name, "Deployment failed: {e}");
            Err(e)
        }
    }
}

/// Deploys the exchange for `token` and returns the new contract's address
pub async fn deploy_exchange<P: Provider>(
    provider: &P,
    artifact: &ContractArtifact,
    token: Address,
) -> Result<Address, DexError> {
    info!(contract = %artifact.name, %token, "Deploying exchange");
    deploy_contract(provider, &artifact.name, artifact.exchange_init_code(token)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dex::test_utils::receipt;
    use alloy::primitives::{address, bytes};

    const TOKEN: Address = address!("5FbDB2315678afecb367f032d93F642f64180aa3");

    #[test]
    fn parses_hardhat_artifact() {
        let json = r#"{
            "_format": "hh-sol-artifact-1",
            "contractName": "Exchange",
            "sourceName": "contracts/Exchange.sol",
            "abi": [],
            "bytecode": "0x6080604052",
            "deployedBytecode": "0x6080"
        }"#;
        let artifact = ContractArtifact::from_json(json, "ignored").unwrap();
        assert_eq!(artifact.name, "Exchange");
        assert_eq!(artifact.bytecode, bytes!("6080604052"));
    }

    #[test]
    fn parses_forge_artifact() {
        let json = r#"{
            "abi": [],
            "bytecode": { "object": "0x60806040", "sourceMap": "", "linkReferences": {} }
        }"#;
        let artifact = ContractArtifact::from_json(json, "Exchange").unwrap();
        assert_eq!(artifact.name, "Exchange");
        assert_eq!(artifact.bytecode, bytes!("60806040"));
    }

    #[test]
    fn rejects_interface_artifact() {
        let json = r#"{ "contractName": "IExchange", "abi": [], "bytecode": "0x" }"#;
        let err = ContractArtifact::from_json(json, "IExchange").unwrap_err();
        assert!(matches!(err, DexError::EmptyBytecode(name) if name == "IExchange"));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = ContractArtifact::from_json("{ \"abi\": [] }", "Exchange").unwrap_err();
        assert!(matches!(err, DexError::JsonError(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = ContractArtifact::load("does/not/exist/Exchange.json").unwrap_err();
        assert!(matches!(err, DexError::IoError(_)));
    }

    #[test]
    fn init_code_appends_padded_token() {
        let artifact = ContractArtifact {
            name: "Exchange".into(),
            bytecode: bytes!("6080604052"),
        };
        let code = artifact.exchange_init_code(TOKEN);

        assert_eq!(code.len(), 5 + 32);
        assert_eq!(&code[..5], &[0x60, 0x80, 0x60, 0x40, 0x52]);
        assert!(code[5..17].iter().all(|b| *b == 0));
        assert_eq!(&code[17..], TOKEN.as_slice());
    }

    #[test]
    fn receipt_yields_contract_address() {
        let exchange = address!("e7f1725E7734CE288F8367e1Bb143E90bb3F0512");
        assert_eq!(deployed_address(&receipt(true, Some(exchange))).unwrap(), exchange);
    }

    #[test]
    fn receipt_without_address_is_failed_deployment() {
        let err = deployed_address(&receipt(true, None)).unwrap_err();
        assert!(matches!(err, DexError::FailedDeployment));
    }

    #[test]
    fn reverted_deployment_is_reported_as_revert() {
        let exchange = address!("e7f1725E7734CE288F8367e1Bb143E90bb3F0512");
        let err = deployed_address(&receipt(false, Some(exchange))).unwrap_err();
        assert!(matches!(err, DexError::TransactionReverted(_)));
    }
}
