//! Persisted deployment record (`deployed-contract.json`)

use std::path::{Path, PathBuf};

use agro_trust::AgroTrust;
use serde::{Deserialize, Serialize};
use soroban_sdk::xdr::{Limits, ReadXdr, ScSpecEntry};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeploymentError {
    #[error("failed to access deployment record {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed deployment record {path}: {source}")]
    Format {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("no deployment record found (tried {0})")]
    NotFound(String),
}

/// One callable function of the record-store contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionSpec {
    pub name: String,
    pub inputs: Vec<String>,
    pub mutating: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    pub address: String,
    pub owner: String,
    pub signer: String,
    pub network: String,
    pub deployed_at: String,
    pub functions: Vec<FunctionSpec>,
}

/// Spec entries of the contract's exported functions, and whether each writes
const CONTRACT_FUNCTIONS: &[(&[u8], bool)] = &[
    (&AgroTrust::spec_xdr_initialize(), true),
    (&AgroTrust::spec_xdr_get_owner(), false),
    (&AgroTrust::spec_xdr_authorize_user(), true),
    (&AgroTrust::spec_xdr_revoke_user(), true),
    (&AgroTrust::spec_xdr_is_authorized(), false),
    (&AgroTrust::spec_xdr_create_batch(), true),
    (&AgroTrust::spec_xdr_batch_exists(), false),
    (&AgroTrust::spec_xdr_get_batch(), false),
    (&AgroTrust::spec_xdr_get_batch_count(), false),
    (&AgroTrust::spec_xdr_list_batches(), false),
    (&AgroTrust::spec_xdr_add_farmer_info(), true),
    (&AgroTrust::spec_xdr_add_cultivation_details(), true),
    (&AgroTrust::spec_xdr_add_processing_info(), true),
    (&AgroTrust::spec_xdr_add_lab_result(), true),
    (&AgroTrust::spec_xdr_add_certificate(), true),
    (&AgroTrust::spec_xdr_add_trace_data(), true),
    (&AgroTrust::spec_xdr_add_transfer_record(), true),
    (&AgroTrust::spec_xdr_get_farmer_info(), false),
    (&AgroTrust::spec_xdr_get_cultivation_details(), false),
    (&AgroTrust::spec_xdr_get_processing_info(), false),
    (&AgroTrust::spec_xdr_get_lab_result(), false),
    (&AgroTrust::spec_xdr_get_certificate(), false),
    (&AgroTrust::spec_xdr_get_trace_data(), false),
    (&AgroTrust::spec_xdr_get_transfer_records(), false),
    (&AgroTrust::spec_xdr_get_transfer_record(), false),
    (&AgroTrust::spec_xdr_get_transfer_record_count(), false),
];

fn function_spec(xdr: &[u8], mutating: bool) -> Option<FunctionSpec> {
    match ScSpecEntry::from_xdr(xdr, Limits::none()) {
        Ok(ScSpecEntry::FunctionV0(function)) => Some(FunctionSpec {
            name: function.name.0.to_utf8_string_lossy(),
            inputs: function
                .inputs
                .iter()
                .map(|input| input.name.to_utf8_string_lossy())
                .collect(),
            mutating,
        }),
        _ => None,
    }
}

/// Call interface of the record-store contract, read from its exported spec
pub fn contract_interface() -> Vec<FunctionSpec> {
    CONTRACT_FUNCTIONS
        .iter()
        .filter_map(|(xdr, mutating)| function_spec(xdr, *mutating))
        .collect()
}

impl Deployment {
    pub fn new(address: String, owner: String, signer: String, network: String) -> Self {
        Self {
            address,
            owner,
            signer,
            network,
            deployed_at: chrono::Utc::now().to_rfc3339(),
            functions: contract_interface(),
        }
    }

    pub fn load(path: &Path) -> Result<Self, DeploymentError> {
        let content = std::fs::read_to_string(path).map_err(|source| DeploymentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| DeploymentError::Format {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the first record that exists among `candidates`
    pub fn load_first(candidates: &[PathBuf]) -> Result<Self, DeploymentError> {
        match candidates.iter().find(|path| path.is_file()) {
            Some(path) => Self::load(path),
            None => Err(DeploymentError::NotFound(
                candidates
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            )),
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), DeploymentError> {
        let io_err = |source| DeploymentError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let content = serde_json::to_string_pretty(self).map_err(|source| DeploymentError::Format {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, content).map_err(io_err)
    }

    pub fn function(&self, name: &str) -> Option<&FunctionSpec> {
        self.functions.iter().find(|f| f.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Deployment {
        Deployment::new(
            "CCONTRACT".to_string(),
            "GOWNER".to_string(),
            "GOWNER".to_string(),
            "sandbox".to_string(),
        )
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deployed-contract.json");

        let deployment = sample();
        deployment.save(&path).unwrap();

        let loaded = Deployment::load(&path).unwrap();
        assert_eq!(loaded, deployment);

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["address"], "CCONTRACT");
        assert!(raw["deployedAt"].is_string());
    }

    #[test]
    fn test_load_first_skips_missing_candidates() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        let present = dir.path().join("deployed-contract.json");
        sample().save(&present).unwrap();

        let loaded = Deployment::load_first(&[missing.clone(), present]).unwrap();
        assert_eq!(loaded.network, "sandbox");

        let err = Deployment::load_first(&[missing]).unwrap_err();
        assert!(matches!(err, DeploymentError::NotFound(_)));
    }

    #[test]
    fn test_load_first_passes_over_directories() {
        let dir = tempfile::tempdir().unwrap();
        let record = dir.path().join("deployed-contract.json");
        sample().save(&record).unwrap();

        let given = dir.path().to_path_buf();
        let loaded = Deployment::load_first(&[given.clone(), given.join("deployed-contract.json")]).unwrap();
        assert_eq!(loaded.address, "CCONTRACT");

        let err = Deployment::load_first(&[given]).unwrap_err();
        assert!(matches!(err, DeploymentError::NotFound(_)));
    }

    #[test]
    fn test_interface_lists_every_function() {
        let deployment = sample();
        let create = deployment.function("create_batch").unwrap();
        assert!(create.mutating);
        assert_eq!(
            create.inputs,
            ["caller", "batch_id", "crop_name", "variety", "location", "harvest_date"]
        );
        assert!(!deployment.function("get_transfer_record").unwrap().mutating);
        assert_eq!(deployment.functions.len(), CONTRACT_FUNCTIONS.len());
    }

    #[test]
    fn test_interface_matches_contract_signatures() {
        let functions = contract_interface();
        let names: std::collections::HashSet<_> = functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names.len(), functions.len());

        let transfer = functions
            .iter()
            .find(|f| f.name == "add_transfer_record")
            .unwrap();
        assert_eq!(
            transfer.inputs,
            ["caller", "batch_id", "from", "to", "purpose", "transfer_date"]
        );

        // Every writing call is authorized by its first argument.
        for function in functions.iter().filter(|f| f.mutating) {
            let signer = function.inputs.first().map(String::as_str);
            assert!(
                matches!(signer, Some("caller" | "owner")),
                "{} is not signed",
                function.name
            );
        }
        for function in functions.iter().filter(|f| !f.mutating) {
            assert_ne!(function.inputs.first().map(String::as_str), Some("caller"));
        }
    }

    #[test]
    fn test_malformed_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deployed-contract.json");
        std::fs::write(&path, "{not json").unwrap();

        assert!(matches!(
            Deployment::load(&path),
            Err(DeploymentError::Format { .. })
        ));
    }
}
