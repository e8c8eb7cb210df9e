use reqwest::{Client, ClientBuilder};
use std::collections::HashSet;
use std::time::Duration;
use url::Url;
use crate::error::MolfetchError;

/// A sandbox-capped HTTP client that only allows requests to approved domains.
/// molfetch talks to exactly two public APIs; anything else is a bug.
#[derive(Debug, Clone)]
pub struct SandboxClient {
    client: Client,
    allowlist: HashSet<String>,
}

/// Hosts the retrieval pipeline is permitted to reach.
/// localhost entries exist so tests can stand up mock servers.
const DEFAULT_ALLOWLIST: &[&str] = &[
    "www.ebi.ac.uk",           // ChEMBL
    "pubchem.ncbi.nlm.nih.gov", // PubChem PUG REST
    "localhost",
    "127.0.0.1",
];

impl SandboxClient {
    /// Creates a new SandboxClient with the default molfetch allowlist.
    pub fn new() -> Result<Self, MolfetchError> {
        let allowlist = DEFAULT_ALLOWLIST.iter().map(|d| d.to_string()).collect();

        // Outer bound only; callers set tighter per-request timeouts.
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self { client, allowlist })
    }

    /// Appends an exact hostname to the allowlist.
    pub fn allow_domain(&mut self, domain: &str) {
        self.allowlist.insert(domain.to_string());
    }

    /// Validates if a URL is permitted under the current sandbox policy.
    pub fn is_allowed(&self, url: &str) -> bool {
        if let Ok(parsed) = Url::parse(url) {
            if let Some(host) = parsed.host_str() {
                // Exact match or subdomain of an allowed domain
                for allowed in &self.allowlist {
                    if host == allowed || host.ends_with(&format!(".{}", allowed)) {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Exposes the inner `reqwest::Client` builder pattern safely for GET requests.
    pub fn get(&self, url: &str) -> Result<reqwest::RequestBuilder, MolfetchError> {
        if !self.is_allowed(url) {
            return Err(MolfetchError::Security(format!(
                "Network capabilities capped: domain not in allowlist for URL {}",
                url
            )));
        }

        Ok(self.client.get(url))
    }
}
