//! # ETL
//!
//! Two steps fill the catalog from a directory tree of raw files:
//!
//! 1. [`scan`] walks `<data_root>/grupo_<letter>/<assay>/` and produces one
//!    [`MappingRow`] per FCS file, which can be saved with [`write_mapping`]
//!    for review.
//! 2. [`populate`] loads mapping rows into the [`Catalog`](crate::catalog::Catalog).

mod error;
mod mapping;
mod populate;
mod scan;

#[cfg(test)]
mod tests;

pub use error::EtlError;
pub use mapping::{read_mapping, read_mapping_from, write_mapping, write_mapping_to, MappingRow};
pub use populate::{populate, EtlStats};
pub use scan::{animal_id_from_name, find_fcs_files, scan};
