use std::io::{Read, Seek};
use std::path::Path;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::channel::{is_fluorescence_channel, Channel};
use crate::fcs::{FcsError, FcsFile, ParseMode};

/// Placeholder shown for text fields the file does not carry
pub const NOT_AVAILABLE: &str = "N/A";

/// Summary metadata of one FCS file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    /// Acquisition date (`$DATE`)
    pub date: String,
    /// Cytometer identifier (`$CYT`)
    pub cytometer: String,
    /// Sample / tube name (`TBNM`)
    pub sample: String,
    /// Total number of recorded events (`$TOT`)
    pub event_count: u64,
    /// Fluorescence channels in parameter order
    pub channels: Vec<Channel>,
}

impl FileMetadata {
    /// Build the summary from an already parsed file
    pub fn from_fcs(fcs: &FcsFile) -> Result<Self, FcsError> {
        let text_or_default = |key: &str| {
            fcs.keyword(key)
                .map(str::to_string)
                .unwrap_or_else(|| NOT_AVAILABLE.to_string())
        };

        let event_count = fcs
            .keyword("tot")
            .and_then(|value| value.trim().parse::<u64>().ok())
            .unwrap_or(0);

        let channels = fcs
            .parameters()?
            .into_iter()
            .filter(|p| is_fluorescence_channel(&p.name, &p.label))
            .map(|p| Channel::new(p.name, p.label))
            .collect();

        Ok(Self {
            date: text_or_default("date"),
            cytometer: text_or_default("cyt"),
            sample: text_or_default("tbnm"),
            event_count,
            channels,
        })
    }

    /// Channel short names, index-aligned with [`FileMetadata::fluorophores`]
    pub fn channel_names(&self) -> Vec<&str> {
        self.channels.iter().map(|c| c.name.as_str()).collect()
    }

    /// Fluorophore labels, index-aligned with [`FileMetadata::channel_names`]
    pub fn fluorophores(&self) -> Vec<&str> {
        self.channels.iter().map(|c| c.label.as_str()).collect()
    }
}

/// Outcome of reading one file: metadata, or a diagnostic explaining why not
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExtractionResult {
    /// The file was read
    Extracted(FileMetadata),
    /// The file could not be opened or parsed
    Failed {
        /// Human-readable cause
        diagnostic: String,
    },
}

impl ExtractionResult {
    /// True for the failure variant
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Metadata, when extraction succeeded
    pub fn metadata(&self) -> Option<&FileMetadata> {
        match self {
            Self::Extracted(meta) => Some(meta),
            Self::Failed { .. } => None,
        }
    }

    /// Diagnostic text, when extraction failed
    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            Self::Extracted(_) => None,
            Self::Failed { diagnostic } => Some(diagnostic),
        }
    }
}

impl From<Result<FileMetadata, FcsError>> for ExtractionResult {
    fn from(result: Result<FileMetadata, FcsError>) -> Self {
        match result {
            Ok(meta) => Self::Extracted(meta),
            Err(e) => Self::Failed {
                diagnostic: e.to_string(),
            },
        }
    }
}

/// Read the HEADER and TEXT of an FCS file and summarize them.
///
/// Never fails: open and parse errors become [`ExtractionResult::Failed`].
/// The DATA segment is not read.
pub fn extract<P: AsRef<Path>>(path: P) -> ExtractionResult {
    let path = path.as_ref();
    let result: ExtractionResult = FcsFile::open(path, ParseMode::HeadersOnly)
        .and_then(|fcs| FileMetadata::from_fcs(&fcs))
        .into();

    match &result {
        ExtractionResult::Extracted(meta) => debug!(
            "Extracted {}: {} events, {} fluorescence channels",
            path.display(),
            meta.event_count,
            meta.channels.len()
        ),
        ExtractionResult::Failed { diagnostic } => {
            warn!("Could not read {}: {}", path.display(), diagnostic)
        }
    }
    result
}

/// Same as [`extract`] for an in-memory or already opened source
pub fn extract_from_reader<R: Read + Seek>(reader: R) -> ExtractionResult {
    FcsFile::from_reader(reader, ParseMode::HeadersOnly)
        .and_then(|fcs| FileMetadata::from_fcs(&fcs))
        .into()
}
