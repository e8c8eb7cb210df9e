//! molfetch retrieval - the three-stage structure retrieval pipeline.
//!
//! For each compound in a batch:
//! 1. ChEMBL compound ID → canonical SMILES (`sources::chembl`)
//! 2. SMILES → PubChem CID, first match wins (`sources::pubchem`)
//! 3. CID → 3D SDF record written to disk (`sources::pubchem`)
//!
//! `pipeline::run_retrieval` chains the stages per compound and collects
//! the resolved CIDs.

pub mod pipeline;
pub mod sources;
