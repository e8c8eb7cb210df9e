//! End-to-end retrieval pipeline.
//!
//! Orchestrates the full flow for one batch run:
//!   1. Resolve each ChEMBL ID to its canonical SMILES
//!   2. Resolve the SMILES to a PubChem CID (first match wins)
//!   3. Download the 3D SDF record for the CID to disk
//!
//! Stages short-circuit per compound: a miss at any stage logs the skip
//! and moves on to the next ID. A failed download does not remove the CID
//! from the collected list. A single compound never aborts the run.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::sources::chembl::{ChemblClient, CHEMBL_API_URL};
use crate::sources::pubchem::{PubChemClient, PUBCHEM_API_URL};

// ── Job config ────────────────────────────────────────────────────────────────

/// Parameters for a single retrieval run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalJob {
    /// ChEMBL compound IDs, processed in order.
    pub compounds: Vec<String>,
    /// Courtesy pause between compounds; zero disables the pause.
    pub delay_ms: u64,
    /// Directory the SDF files are written to.
    pub output_dir: PathBuf,
    pub lookup_timeout_secs: u64,
    pub download_timeout_secs: u64,
    pub chembl_base_url: String,
    pub pubchem_base_url: String,
}

impl Default for RetrievalJob {
    fn default() -> Self {
        Self {
            compounds: Vec::new(),
            delay_ms: 1000,
            output_dir: PathBuf::from("."),
            lookup_timeout_secs: 10,
            download_timeout_secs: 20,
            chembl_base_url: CHEMBL_API_URL.to_string(),
            pubchem_base_url: PUBCHEM_API_URL.to_string(),
        }
    }
}

// ── Result summary ────────────────────────────────────────────────────────────

/// Outcome of a retrieval run. `cids` holds one entry per compound that
/// passed both resolver stages, in input order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RetrievalResult {
    pub cids: Vec<u64>,
    pub compounds_processed: usize,
    pub structures_resolved: usize,
    pub cids_resolved: usize,
    pub files_written: usize,
    pub errors: Vec<String>,
    pub duration_ms: u64,
}

// ── Pipeline orchestrator ─────────────────────────────────────────────────────

/// Runs the retrieval pipeline for one job.
///
/// The pipeline is non-destructive: on per-compound errors it logs and
/// continues, and the caller always receives the full summary.
#[instrument(skip(job))]
pub async fn run_retrieval(job: &RetrievalJob) -> RetrievalResult {
    let t0 = std::time::Instant::now();

    info!(compounds = job.compounds.len(), "Starting structure retrieval pipeline");

    let chembl = ChemblClient::configured(
        &job.chembl_base_url,
        Duration::from_secs(job.lookup_timeout_secs),
    );
    let pubchem = PubChemClient::configured(
        &job.pubchem_base_url,
        Duration::from_secs(job.lookup_timeout_secs),
        Duration::from_secs(job.download_timeout_secs),
    );

    let mut result = RetrievalResult::default();

    for chembl_id in &job.compounds {
        result.compounds_processed += 1;
        process_compound(&chembl, &pubchem, job, chembl_id, &mut result).await;

        // Rate-limit courtesy pause, applied after every compound
        if job.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(job.delay_ms)).await;
        }
    }

    result.duration_ms = t0.elapsed().as_millis() as u64;
    info!(
        cids = ?result.cids,
        files = result.files_written,
        skipped = result.errors.len(),
        "Retrieval pipeline finished"
    );

    result
}

/// Runs the three stages for one compound, recording the outcome.
async fn process_compound(
    chembl: &ChemblClient,
    pubchem: &PubChemClient,
    job: &RetrievalJob,
    chembl_id: &str,
    result: &mut RetrievalResult,
) {
    // ── 1. ChEMBL ID → canonical SMILES ──────────────────────────────────────
    let smiles = match chembl.fetch_canonical_smiles(chembl_id).await {
        Ok(Some(s)) => s,
        Ok(None) => {
            result.errors.push(format!("{chembl_id}: structure not found in ChEMBL"));
            return;
        }
        Err(e) => {
            let msg = format!("{chembl_id}: ChEMBL fetch failed: {e}");
            warn!("{}", &msg);
            result.errors.push(msg);
            return;
        }
    };
    result.structures_resolved += 1;

    // ── 2. SMILES → PubChem CID ──────────────────────────────────────────────
    let cid = match pubchem.resolve_cid(&smiles).await {
        Ok(Some(cid)) => cid,
        Ok(None) => {
            result.errors.push(format!("{chembl_id}: no PubChem CID for its SMILES"));
            return;
        }
        Err(e) => {
            let msg = format!("{chembl_id}: CID lookup failed: {e}");
            warn!("{}", &msg);
            result.errors.push(msg);
            return;
        }
    };
    result.cids_resolved += 1;
    result.cids.push(cid);

    // ── 3. CID → 3D SDF on disk (outcome does not gate the CID list) ─────────
    match pubchem.download_sdf(cid, chembl_id, &job.output_dir).await {
        Ok(Some(path)) => {
            result.files_written += 1;
            debug!(chembl_id = chembl_id, path = %path.display(), "Compound complete");
        }
        Ok(None) => {
            result.errors.push(format!("{chembl_id}: no 3D record for CID {cid}"));
        }
        Err(e) => {
            let msg = format!("{chembl_id}: SDF download failed: {e}");
            warn!("{}", &msg);
            result.errors.push(msg);
        }
    }
}
