//! PubChem PUG REST client.
//!
//! API docs: https://pubchem.ncbi.nlm.nih.gov/docs/pug-rest
//! Endpoint: https://pubchem.ncbi.nlm.nih.gov/rest/pug
//!
//! Two operations:
//!   - SMILES → CID list; the first CID of `IdentifierList.CID` is taken
//!   - CID → 3D SDF record, written verbatim to disk
//!
//! The SMILES travels as a path segment and is percent-encoded: canonical
//! SMILES routinely contain `/`, `#` and `=` characters.

use molfetch_common::sandbox::SandboxClient as Client;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tracing::{debug, info, instrument, warn};

pub const PUBCHEM_API_URL: &str = "https://pubchem.ncbi.nlm.nih.gov/rest/pug";

const LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Deserialize)]
struct CidResponse {
    #[serde(rename = "IdentifierList")]
    identifier_list: IdentifierList,
}

#[derive(Deserialize)]
struct IdentifierList {
    #[serde(rename = "CID")]
    cids: Vec<u64>,
}

/// PubChem client for CID resolution and 3D record downloads.
pub struct PubChemClient {
    client: Client,
    base_url: String,
    lookup_timeout: Duration,
    download_timeout: Duration,
}

impl PubChemClient {
    pub fn new() -> Self {
        Self::configured(PUBCHEM_API_URL, LOOKUP_TIMEOUT, DOWNLOAD_TIMEOUT)
    }

    /// Client with a custom endpoint and request timeouts. Tests point the
    /// base URL at a local mock server.
    pub fn configured(base_url: &str, lookup_timeout: Duration, download_timeout: Duration) -> Self {
        Self {
            client: Client::new().unwrap(),
            base_url: base_url.trim_end_matches('/').to_string(),
            lookup_timeout,
            download_timeout,
        }
    }

    /// Resolve a SMILES string to the first matching PubChem CID.
    ///
    /// PubChem can return several CIDs for one structure; the first element
    /// is the contract. An empty `CID` list is a miss, not a panic.
    #[instrument(skip(self))]
    pub async fn resolve_cid(&self, smiles: &str) -> anyhow::Result<Option<u64>> {
        let url = format!(
            "{}/compound/smiles/{}/cids/JSON",
            self.base_url,
            urlencoding::encode(smiles)
        );

        debug!(smiles = smiles, "Resolving PubChem CID");

        let resp = self.client
            .get(&url)?
            .timeout(self.lookup_timeout)
            .send()
            .await?;

        if !resp.status().is_success() {
            warn!(smiles = smiles, status = %resp.status(), "No CID found for SMILES");
            return Ok(None);
        }

        let body: CidResponse = match resp.json().await {
            Ok(b) => b,
            Err(e) => {
                warn!(smiles = smiles, "Malformed CID response: {}", e);
                return Ok(None);
            }
        };

        match body.identifier_list.cids.first().copied() {
            Some(cid) => {
                debug!(cid = cid, "Resolved CID");
                Ok(Some(cid))
            }
            None => {
                warn!(smiles = smiles, "PubChem returned an empty CID list");
                Ok(None)
            }
        }
    }

    /// Download the 3D SDF record for a CID into `output_dir`.
    ///
    /// The file is named `<stem>.sdf` after the originating compound ID and
    /// overwrites any previous download. Returns the written path, or
    /// `Ok(None)` when PubChem has no 3D record for the compound.
    #[instrument(skip(self))]
    pub async fn download_sdf(
        &self,
        cid: u64,
        stem: &str,
        output_dir: &Path,
    ) -> anyhow::Result<Option<PathBuf>> {
        let url = format!(
            "{}/compound/cid/{}/record/SDF?record_type=3d",
            self.base_url, cid
        );

        debug!(cid = cid, "Downloading 3D SDF record");

        let resp = self.client
            .get(&url)?
            .timeout(self.download_timeout)
            .send()
            .await?;

        if !resp.status().is_success() {
            warn!(cid = cid, status = %resp.status(), "3D structure not available");
            return Ok(None);
        }

        let content = resp.bytes().await?;
        if content.iter().all(|b| b.is_ascii_whitespace()) {
            warn!(cid = cid, "3D structure not available (empty record)");
            return Ok(None);
        }

        let file_path = output_dir.join(format!("{}.sdf", stem));
        fs::create_dir_all(output_dir).await?;
        fs::write(&file_path, &content).await?;

        info!(cid = cid, path = %file_path.display(), "Saved 3D SDF");
        Ok(Some(file_path))
    }
}

impl Default for PubChemClient {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use wiremock::matchers::{method, path, path_regex, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> PubChemClient {
        PubChemClient::configured(&server.uri(), LOOKUP_TIMEOUT, DOWNLOAD_TIMEOUT)
    }

    #[tokio::test]
    async fn test_resolve_cid_takes_first() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path_regex(r"^/compound/smiles/[^/]+/cids/JSON$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "IdentifierList": { "CID": [241, 168_963_410] }
            })))
            .mount(&server)
            .await;

        let cid = test_client(&server).resolve_cid("C1=CC=CC=C1").await.unwrap();
        assert_eq!(cid, Some(241));
    }

    #[tokio::test]
    async fn test_resolve_cid_encodes_smiles_path_segment() {
        let server = MockServer::start().await;
        // trans-2-butene: an unencoded SMILES would split the path on '/'
        Mock::given(method("GET"))
            .and(path_regex(r"^/compound/smiles/[^/]+/cids/JSON$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "IdentifierList": { "CID": [62695] }
            })))
            .mount(&server)
            .await;

        let cid = test_client(&server).resolve_cid("C/C=C/C").await.unwrap();
        assert_eq!(cid, Some(62695));
    }

    #[tokio::test]
    async fn test_resolve_cid_empty_list_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path_regex(r"^/compound/smiles/[^/]+/cids/JSON$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "IdentifierList": { "CID": [] }
            })))
            .mount(&server)
            .await;

        let cid = test_client(&server).resolve_cid("C1=CC=CC=C1").await.unwrap();
        assert_eq!(cid, None);
    }

    #[tokio::test]
    async fn test_resolve_cid_not_found_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path_regex(r"^/compound/smiles/[^/]+/cids/JSON$"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "Fault": { "Code": "PUGREST.NotFound" }
            })))
            .mount(&server)
            .await;

        let cid = test_client(&server).resolve_cid("bogus").await.unwrap();
        assert_eq!(cid, None);
    }

    #[tokio::test]
    async fn test_download_sdf_writes_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/compound/cid/241/record/SDF"))
            .and(query_param("record_type", "3d"))
            .respond_with(ResponseTemplate::new(200).set_body_string("241\n  -OEChem-\n\nM  END\n$$$$\n"))
            .mount(&server)
            .await;

        let dir = tempdir().unwrap();
        let written = test_client(&server)
            .download_sdf(241, "CHEMBL277500", dir.path())
            .await
            .unwrap();

        let file_path = written.expect("expected a written file");
        assert_eq!(file_path, dir.path().join("CHEMBL277500.sdf"));
        let content = std::fs::read_to_string(&file_path).unwrap();
        assert!(content.contains("$$$$"));
    }

    #[tokio::test]
    async fn test_download_sdf_overwrites_previous_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/compound/cid/241/record/SDF"))
            .respond_with(ResponseTemplate::new(200).set_body_string("fresh record\n"))
            .mount(&server)
            .await;

        let dir = tempdir().unwrap();
        let stale = dir.path().join("CHEMBL277500.sdf");
        std::fs::write(&stale, "stale record\n").unwrap();

        let client = test_client(&server);
        client.download_sdf(241, "CHEMBL277500", dir.path()).await.unwrap();
        client.download_sdf(241, "CHEMBL277500", dir.path()).await.unwrap();

        assert_eq!(std::fs::read_to_string(&stale).unwrap(), "fresh record\n");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_download_sdf_empty_body_writes_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/compound/cid/500/record/SDF"))
            .respond_with(ResponseTemplate::new(200).set_body_string("\n  \n"))
            .mount(&server)
            .await;

        let dir = tempdir().unwrap();
        let written = test_client(&server)
            .download_sdf(500, "CHEMBL999", dir.path())
            .await
            .unwrap();

        assert!(written.is_none());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_download_sdf_missing_record_writes_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/compound/cid/500/record/SDF"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let dir = tempdir().unwrap();
        let written = test_client(&server)
            .download_sdf(500, "CHEMBL999", dir.path())
            .await
            .unwrap();

        assert!(written.is_none());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
