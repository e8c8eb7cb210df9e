//! ChEMBL API client.
//!
//! ChEMBL is a database of bioactive molecules with drug-like properties.
//!
//! API docs: https://chembl.gitbook.io/chembl-interface-documentation/web-resources/chembl-api
//! Endpoint: https://www.ebi.ac.uk/chembl/api/data
//!
//! molfetch needs a single lookup from it: compound ID → canonical SMILES,
//! read from the `molecule_structures.canonical_smiles` field of the
//! molecule record.

use molfetch_common::sandbox::SandboxClient as Client;
use std::time::Duration;
use tracing::{debug, instrument, warn};

pub const CHEMBL_API_URL: &str = "https://www.ebi.ac.uk/chembl/api/data";

const LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// ChEMBL client for compound structure lookups.
pub struct ChemblClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl ChemblClient {
    pub fn new() -> Self {
        Self::configured(CHEMBL_API_URL, LOOKUP_TIMEOUT)
    }

    /// Client with a custom endpoint and request timeout. Tests point the
    /// base URL at a local mock server.
    pub fn configured(base_url: &str, timeout: Duration) -> Self {
        Self {
            client: Client::new().unwrap(),
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    /// Fetch the canonical SMILES for a ChEMBL compound ID.
    ///
    /// Returns `Ok(None)` when the ID is unknown or the record carries no
    /// structure; transport failures surface as `Err`.
    #[instrument(skip(self))]
    pub async fn fetch_canonical_smiles(&self, chembl_id: &str) -> anyhow::Result<Option<String>> {
        let url = format!("{}/molecule/{}.json", self.base_url, chembl_id);

        debug!(chembl_id = chembl_id, "Fetching ChEMBL compound structure");

        let resp = self.client
            .get(&url)?
            .timeout(self.timeout)
            .send()
            .await?;

        if !resp.status().is_success() {
            warn!(chembl_id = chembl_id, status = %resp.status(), "ChEMBL ID not found");
            return Ok(None);
        }

        let json: serde_json::Value = match resp.json().await {
            Ok(j) => j,
            Err(e) => {
                warn!(chembl_id = chembl_id, "Malformed ChEMBL response: {}", e);
                return Ok(None);
            }
        };

        match json["molecule_structures"]["canonical_smiles"].as_str() {
            Some(smiles) => Ok(Some(smiles.to_string())),
            None => {
                warn!(chembl_id = chembl_id, "ChEMBL record has no canonical SMILES");
                Ok(None)
            }
        }
    }
}

impl Default for ChemblClient {
    fn default() -> Self { Self::new() }
}
