//! Structure data source clients.

pub mod chembl;
pub mod pubchem;
