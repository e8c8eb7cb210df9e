//! molfetch — batch 3D structure retrieval from ChEMBL and PubChem.
//! Entry point for the CLI binary.

mod config;

use molfetch_retrieval::pipeline::run_retrieval;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("molfetch=debug,info")),
        )
        .init();

    info!("🧪 molfetch starting up...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Load configuration; a missing molfetch.toml means the built-in defaults
    let config = match config::Config::load() {
        Ok(c) => {
            info!(
                "Configuration loaded. {} compounds, {} ms between requests",
                c.compounds.chembl_ids.len(),
                c.retrieval.delay_ms
            );
            c
        }
        Err(e) => {
            tracing::warn!("Could not load molfetch.toml: {e}");
            tracing::warn!("Fix the file (see molfetch.example.toml) and run again.");
            return Ok(());
        }
    };

    let job = config.to_job();
    let result = run_retrieval(&job).await;

    if !result.errors.is_empty() {
        info!(
            "{} of {} compounds skipped or incomplete",
            result.errors.len(),
            result.compounds_processed
        );
    }
    info!(
        "✅ Done: {} SMILES resolved, {} CIDs, {} SDF files written in {} ms",
        result.structures_resolved,
        result.cids_resolved,
        result.files_written,
        result.duration_ms
    );

    // The CID list goes to stdout, independent of the log filter
    println!("🧾 Final CID list: {:?}", result.cids);

    Ok(())
}
