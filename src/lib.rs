//! # cytocat - Flow Cytometry Result Catalog
//!
//! `cytocat` reads the metadata of Flow Cytometry Standard (FCS) files, renders
//! it as small tables, compares several acquisitions statistically and keeps
//! a SQLite catalog of which result file belongs to which experimental group,
//! assay and animal.
//!
//! ## Key Features
//!
//! - **Headers-only extraction**: acquisition date, cytometer, sample name,
//!   event count and fluorescence channels are read from the HEADER and TEXT
//!   segments without decoding the event matrix.
//!
//! - **Failure as data**: an unreadable file yields a diagnostic value rather
//!   than an error, so batch views keep going.
//!
//! - **Comparison**: descriptive statistics over the general metadata of many
//!   files, with event counts summarized numerically.
//!
//! - **Catalog and ETL**: a master/detail SQLite schema filled by scanning a
//!   `grupo_<letter>/<assay>/` directory tree.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cytocat::metadata::extract;
//! use cytocat::table::format;
//!
//! let tables = format(&extract("sample.fcs"));
//! println!("{}", tables.general);
//! println!("{}", tables.channels);
//! ```
//!
//! ## Comparing files
//!
//! ```rust,no_run
//! use cytocat::compare::compare;
//!
//! let summary = compare(&["a.fcs", "b.fcs"])?;
//! let (general, events) = summary.tables();
//! println!("{}\n{}", general, events);
//! # Ok::<(), cytocat::compare::CompareError>(())
//! ```
//!
//! ## Modules
//!
//! - [`fcs`]: HEADER/TEXT/DATA segment reader and a writer for test data
//! - [`metadata`]: metadata extraction and the fluorescence channel filter
//! - [`table`]: tabular rendering of extraction results
//! - [`compare`]: multi-file statistics
//! - [`catalog`]: SQLite catalog store
//! - [`etl`]: directory scan and catalog loading
//! - [`config`]: `cytocat.toml` configuration

#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod catalog;
pub mod compare;
pub mod config;
pub mod etl;
pub mod fcs;
pub mod metadata;
pub mod table;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::catalog::{Assay, Catalog, CatalogError, Group, NewResult, ResultEntry};
    pub use crate::compare::{compare, ColumnSummary, CompareError, ComparisonSummary};
    pub use crate::config::{Config, GroupConfig};
    pub use crate::etl::{populate, scan, EtlError, EtlStats, MappingRow};
    pub use crate::fcs::{FcsError, FcsFile, FcsWriter, ParseMode};
    pub use crate::metadata::{
        extract, is_fluorescence_channel, Channel, ExtractionResult, FileMetadata, NOT_AVAILABLE,
    };
    pub use crate::table::{format, Cell, FormattedTables, Table};
}
