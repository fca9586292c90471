use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use cytocat::config::Config;

mod browse;
mod compare;
mod demo;
mod download;
mod etl;
mod inspect;

/// cytocat - Flow cytometry metadata viewer and result catalog
#[derive(Parser)]
#[command(name = "cytocat")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Load settings from a TOML config file (defaults to ./cytocat.toml when present)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Output format of `inspect`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum InspectFormat {
    /// Aligned text tables
    #[default]
    Text,
    /// The three tables as CSV, separated by blank lines
    Csv,
    /// The extraction result as JSON
    Json,
}

/// Output format of `compare`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum CompareFormat {
    /// Aligned text tables
    #[default]
    Text,
    /// The full comparison summary as JSON
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the catalog database schema
    InitDb,

    /// Scan the raw data tree and write the mapping CSV
    Scan {
        /// Mapping CSV path (defaults to the configured mapping_csv)
        #[arg(short, long, value_name = "CSV")]
        output: Option<PathBuf>,
    },

    /// Load a mapping CSV into the catalog
    Populate {
        /// Mapping CSV path (defaults to the configured mapping_csv)
        #[arg(short, long, value_name = "CSV")]
        mapping: Option<PathBuf>,
    },

    /// List groups, the assays of a group, or the result files of a group and assay
    Browse {
        /// Group name, e.g. "Grupo A"
        #[arg(short, long)]
        group: Option<String>,

        /// Assay name (requires --group)
        #[arg(short, long, requires = "group")]
        assay: Option<String>,

        /// Also print the metadata tables of every listed file
        #[arg(long, requires = "assay")]
        details: bool,
    },

    /// Show the metadata of one FCS file
    Inspect {
        /// Input FCS file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text", value_enum)]
        format: InspectFormat,
    },

    /// Compare the general metadata of several FCS files
    Compare {
        /// Input FCS files
        #[arg(value_name = "FILE", required = true, num_args = 1..)]
        files: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "text", value_enum)]
        format: CompareFormat,
    },

    /// Copy the result files of one animal out of the catalog
    Download {
        /// Group name
        #[arg(short, long)]
        group: String,

        /// Assay name
        #[arg(short, long)]
        assay: String,

        /// Animal id
        #[arg(long)]
        animal: i64,

        /// Destination directory
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        out: PathBuf,
    },

    /// Write synthetic FCS files for trying the tool
    Demo {
        /// Output directory
        #[arg(value_name = "DIR", default_value = "demo_fcs")]
        output: PathBuf,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    let config_path = cli.config;
    let config = || Config::load(config_path.as_deref());

    match cli.command {
        Commands::InitDb => etl::init_db(&config()?),
        Commands::Scan { output } => etl::scan(&config()?, output),
        Commands::Populate { mapping } => etl::populate(&config()?, mapping),
        Commands::Browse {
            group,
            assay,
            details,
        } => browse::run(&config()?, group, assay, details),
        Commands::Inspect { file, format } => inspect::run(&file, format),
        Commands::Compare { files, format } => compare::run(&files, format),
        Commands::Download {
            group,
            assay,
            animal,
            out,
        } => download::run(&config()?, &group, &assay, animal, &out),
        Commands::Demo { output } => demo::run(&output),
    }
}

/// Fail with a NotFound error before any parsing is attempted
fn ensure_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("File does not exist: {}", path.display()),
        )
        .into());
    }
    Ok(())
}

/// Section title, styled when colorized output is enabled
fn heading(title: &str) -> String {
    #[cfg(feature = "colorized_output")]
    {
        console::style(title).bold().cyan().to_string()
    }

    #[cfg(not(feature = "colorized_output"))]
    {
        title.to_string()
    }
}

/// Problem marker, styled when colorized output is enabled
fn problem(text: &str) -> String {
    #[cfg(feature = "colorized_output")]
    {
        console::style(text).red().bold().to_string()
    }

    #[cfg(not(feature = "colorized_output"))]
    {
        text.to_string()
    }
}
