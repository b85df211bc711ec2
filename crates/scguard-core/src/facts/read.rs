use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::{fs, path::Path};

use crate::error::FactError;
use crate::facts::model::ContractFact;
use crate::facts::provider::FactProvider;
use crate::report::model::{InputHash, InputInfo};

#[derive(Debug, Deserialize)]
struct RawDocument {
    #[serde(default)]
    contracts: Vec<ContractFact>,
}

/// A fact document read from disk, bound to the exact bytes it came from.
#[derive(Debug, Clone)]
pub struct FactDocument {
    /// Optional source path (informational only).
    pub path: Option<String>,

    pub contracts: Vec<ContractFact>,

    /// Size of the document in bytes.
    pub size_bytes: u64,

    /// Hex-encoded SHA-256 of the document bytes.
    pub hash_hex: String,
}

impl FactDocument {
    /// Parses a `{ "contracts": [...] }` JSON document.
    ///
    /// The identity depends only on `bytes`; no filesystem metadata is used.
    pub fn from_bytes(path: Option<String>, bytes: &[u8]) -> Result<Self, FactError> {
        let raw: RawDocument = serde_json::from_slice(bytes).map_err(|source| FactError::Parse {
            path: path.clone().unwrap_or_else(|| "<memory>".to_string()),
            source,
        })?;

        let mut hasher = Sha256::new();
        hasher.update(bytes);

        Ok(Self {
            path,
            contracts: raw.contracts,
            size_bytes: bytes.len() as u64,
            hash_hex: hex::encode(hasher.finalize()),
        })
    }
}

impl FactProvider for FactDocument {
    fn contracts(&self) -> Result<Vec<ContractFact>, FactError> {
        Ok(self.contracts.clone())
    }

    fn input_info(&self) -> InputInfo {
        InputInfo {
            path: self.path.clone(),
            size_bytes: self.size_bytes,
            hash: InputHash {
                algorithm: "sha256".to_string(),
                value: self.hash_hex.clone(),
            },
        }
    }
}

/// Read a fact document and compute its fingerprint.
pub fn read_facts(path: &Path) -> Result<FactDocument, FactError> {
    let display = path.display().to_string();
    let bytes = fs::read(path).map_err(|source| FactError::Read {
        path: display.clone(),
        source,
    })?;

    FactDocument::from_bytes(Some(display), &bytes)
}
