//! Truffle build artifacts.

use std::{collections::HashMap, path::Path};

use alloy::primitives::Address;
use serde::Deserialize;

use super::expand_home;
use crate::{
    error::{AppError, Result},
    validation::parse_address,
};

/// The parts of a Truffle build artifact this crate reads.
#[derive(Debug, Clone, Deserialize)]
pub struct ContractArtifact {
    #[serde(rename = "contractName", default)]
    pub contract_name: Option<String>,
    /// Deployments keyed by network id.
    #[serde(default)]
    pub networks: HashMap<String, NetworkDeployment>,
}

/// A deployment of the contract on one network.
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkDeployment {
    pub address: String,
}

impl ContractArtifact {
    /// Read an artifact file. A leading `~` is expanded.
    pub fn from_file(path: &str) -> Result<Self> {
        let path = expand_home(path);
        let raw = std::fs::read_to_string(&path).map_err(|e| {
            AppError::Config(format!("Cannot read artifact {}: {}", path.display(), e))
        })?;
        Self::from_json(&raw, &path)
    }

    fn from_json(raw: &str, path: &Path) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| {
            AppError::Config(format!("Malformed artifact {}: {}", path.display(), e))
        })
    }

    /// Deployed address on `network_id`.
    pub fn address(&self, network_id: &str) -> Result<Address> {
        let deployment = self.networks.get(network_id).ok_or_else(|| {
            AppError::Config(format!(
                "{} is not deployed on network {}",
                self.contract_name.as_deref().unwrap_or("Contract"),
                network_id
            ))
        })?;

        parse_address(&deployment.address)
    }
}

/// An explicit address wins; otherwise it is read from the artifact.
pub fn resolve_contract_address(
    explicit: Option<Address>,
    artifact: &str,
    network_id: &str,
) -> Result<Address> {
    if let Some(address) = explicit {
        return Ok(address);
    }

    let address = ContractArtifact::from_file(artifact)?.address(network_id)?;
    tracing::debug!(artifact = artifact, network_id = network_id, address = %address, "Contract address loaded");
    Ok(address)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    const ARTIFACT: &str = r#"{
        "contractName": "CFPFactory",
        "abi": [],
        "networks": {
            "5777": { "address": "0x5FbDB2315678afecb367f032d93F642f64180aa3", "transactionHash": "0x01" }
        }
    }"#;

    #[test]
    fn test_artifact_address() {
        let artifact = ContractArtifact::from_json(ARTIFACT, Path::new("CFPFactory.json")).unwrap();

        assert_eq!(artifact.contract_name.as_deref(), Some("CFPFactory"));
        assert_eq!(
            artifact.address("5777").unwrap(),
            address!("5FbDB2315678afecb367f032d93F642f64180aa3")
        );
    }

    #[test]
    fn test_artifact_missing_network() {
        let artifact = ContractArtifact::from_json(ARTIFACT, Path::new("CFPFactory.json")).unwrap();

        let err = artifact.address("55555000000").unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert!(err.to_string().contains("55555000000"));
    }

    #[test]
    fn test_artifact_malformed() {
        let result = ContractArtifact::from_json("{not json", Path::new("Stamper.json"));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_artifact_from_file() {
        let path = std::env::temp_dir().join(format!("bfa-artifact-{}.json", std::process::id()));
        std::fs::write(&path, ARTIFACT).unwrap();

        let address = resolve_contract_address(None, path.to_str().unwrap(), "5777").unwrap();
        assert_eq!(address, address!("5FbDB2315678afecb367f032d93F642f64180aa3"));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_explicit_address_skips_artifact() {
        let explicit = address!("70997970C51812dc3A010C7d01b50e0d17dc79C8");
        let resolved =
            resolve_contract_address(Some(explicit), "/nonexistent/Stamper.json", "1").unwrap();
        assert_eq!(resolved, explicit);
    }

    #[test]
    fn test_missing_artifact_file() {
        let result = resolve_contract_address(None, "/nonexistent/Stamper.json", "1");
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
