//! Configuration loading for molfetch.
//! Reads molfetch.toml from the current directory or path in MOLFETCH_CONFIG env var.
//! Every field has a default, so the tool runs with no config file present.

use molfetch_retrieval::pipeline::RetrievalJob;
use molfetch_retrieval::sources::chembl::CHEMBL_API_URL;
use molfetch_retrieval::sources::pubchem::PUBCHEM_API_URL;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub compounds: CompoundsConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub endpoints: EndpointConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompoundsConfig {
    /// ChEMBL IDs to retrieve, processed in order.
    #[serde(default = "default_chembl_ids")]
    pub chembl_ids: Vec<String>,
}

fn default_chembl_ids() -> Vec<String> {
    [
        "CHEMBL483017",
        "CHEMBL491307",
        "CHEMBL1079367",
        "CHEMBL2376097",
        "CHEMBL2333536",
        "CHEMBL507166",
        "CHEMBL494659",
        "CHEMBL1081338",
        "CHEMBL464376",
        "CHEMBL4544522",
        "CHEMBL491879",
        "CHEMBL1514916",
        "CHEMBL519970",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for CompoundsConfig {
    fn default() -> Self {
        Self { chembl_ids: default_chembl_ids() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Pause between compounds, in milliseconds. Zero disables the pause.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default = "default_lookup_timeout")]
    pub lookup_timeout_secs: u64,
    #[serde(default = "default_download_timeout")]
    pub download_timeout_secs: u64,
}

fn default_delay_ms()         -> u64    { 1000 }
fn default_output_dir()       -> String { ".".to_string() }
fn default_lookup_timeout()   -> u64    { 10 }
fn default_download_timeout() -> u64    { 20 }

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_delay_ms(),
            output_dir: default_output_dir(),
            lookup_timeout_secs: default_lookup_timeout(),
            download_timeout_secs: default_download_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    #[serde(default = "default_chembl_base")]
    pub chembl_base_url: String,
    #[serde(default = "default_pubchem_base")]
    pub pubchem_base_url: String,
}

fn default_chembl_base()  -> String { CHEMBL_API_URL.to_string() }
fn default_pubchem_base() -> String { PUBCHEM_API_URL.to_string() }

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            chembl_base_url: default_chembl_base(),
            pubchem_base_url: default_pubchem_base(),
        }
    }
}


impl Config {
    /// Load configuration from molfetch.toml.
    /// Checks MOLFETCH_CONFIG env var first, then current directory.
    /// A missing file yields the defaults; an invalid one is an error.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("MOLFETCH_CONFIG")
            .unwrap_or_else(|_| "molfetch.toml".to_string());

        if !Path::new(&path).exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Translate the on-disk config into a pipeline job.
    pub fn to_job(&self) -> RetrievalJob {
        RetrievalJob {
            compounds: self.compounds.chembl_ids.clone(),
            delay_ms: self.retrieval.delay_ms,
            output_dir: PathBuf::from(&self.retrieval.output_dir),
            lookup_timeout_secs: self.retrieval.lookup_timeout_secs,
            download_timeout_secs: self.retrieval.download_timeout_secs,
            chembl_base_url: self.endpoints.chembl_base_url.clone(),
            pubchem_base_url: self.endpoints.pubchem_base_url.clone(),
        }
    }
}
