//! # Metadata extraction
//!
//! Turns the TEXT segment of an FCS file into a flat [`FileMetadata`] record:
//! acquisition date, cytometer, sample name, event count and the list of
//! fluorescence channels. Scatter (`FSC`, `SSC`), `TIME` and `WIDTH`
//! parameters are filtered out by [`is_fluorescence_channel`].
//!
//! Extraction runs in headers-only mode and converts every open/parse error
//! into [`ExtractionResult::Failed`], so callers only ever branch on a variant.

mod channel;
mod extract;


pub use channel::{is_fluorescence_channel, Channel, EXCLUDED_TERMS};
pub use extract::{extract, extract_from_reader, ExtractionResult, FileMetadata, NOT_AVAILABLE};
