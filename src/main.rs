//! # cytocat
//!
//! Command-line front end for FCS metadata inspection and the result catalog.
//!
//! ## Usage
//!
//! ```bash
//! # Metadata of one file
//! cytocat inspect sample.fcs
//!
//! # Statistics over several files
//! cytocat compare data/raw/grupo_a/fagocitose/*.fcs
//!
//! # Build the catalog from the data tree
//! cytocat init-db
//! cytocat scan
//! cytocat populate
//! cytocat browse --group "Grupo A" --assay fagocitose
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
