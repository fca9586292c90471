//! # FCS segment reader and writer
//!
//! Flow Cytometry Standard files consist of a fixed 58-byte HEADER followed by
//! a TEXT segment of delimiter-separated keyword/value pairs, the DATA segment
//! holding the event matrix, and an optional ANALYSIS segment.
//!
//! The reader has two modes:
//!
//! - [`ParseMode::HeadersOnly`] reads the HEADER and TEXT (plus supplemental
//!   TEXT) and never touches the DATA segment. Cost is bounded by the size of
//!   the TEXT segment, independent of how many events were acquired.
//! - [`ParseMode::Full`] additionally decodes the event matrix.
//!
//! ```rust,no_run
//! use cytocat::fcs::{FcsFile, ParseMode};
//!
//! let fcs = FcsFile::open("sample.fcs", ParseMode::HeadersOnly)?;
//! println!("{} parameters", fcs.parameter_count()?);
//! # Ok::<(), cytocat::fcs::FcsError>(())
//! ```

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use log::warn;

pub use data::{DataLayout, DataType, Endianness, EventMatrix};
pub use error::FcsError;
pub use header::{FcsHeader, FcsVersion, Segment, HEADER_LEN, MAX_HEADER_OFFSET};
pub use text::{escape, normalize_key, TextSegment};
pub use writer::FcsWriter;

mod data;
mod error;
mod header;
mod text;
mod writer;


/// How much of the file to parse
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParseMode {
    /// HEADER and TEXT only; the DATA segment is never read
    HeadersOnly,
    /// HEADER, TEXT and the decoded event matrix
    #[default]
    Full,
}

/// One acquisition parameter as described by its `$Pn*` keywords
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// 1-based parameter index
    pub index: usize,
    /// Short name (`$PnN`), empty when absent
    pub name: String,
    /// Stain / fluorophore label (`$PnS`), empty when absent
    pub label: String,
}

/// A parsed FCS file
#[derive(Debug, Clone)]
pub struct FcsFile {
    /// HEADER segment
    pub header: FcsHeader,
    /// TEXT keywords, supplemental TEXT merged in
    pub text: TextSegment,
    /// Event matrix, only present in [`ParseMode::Full`]
    pub events: Option<EventMatrix>,
}

impl FcsFile {
    /// Open and parse a file. The handle is closed before returning.
    pub fn open<P: AsRef<Path>>(path: P, mode: ParseMode) -> Result<Self, FcsError> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(BufReader::new(file), mode)
    }

    /// Parse from any seekable source
    pub fn from_reader<R: Read + Seek>(mut reader: R, mode: ParseMode) -> Result<Self, FcsError> {
        let file_len = reader.seek(SeekFrom::End(0))?;
        reader.seek(SeekFrom::Start(0))?;

        let header = FcsHeader::read_from(&mut reader)?;
        check_bounds("TEXT", header.text, file_len)?;
        let mut text = TextSegment::parse(&read_segment(&mut reader, header.text)?)?;

        if header.version.has_extended_offsets() {
            let supplemental = supplemental_segment(&text);
            if !supplemental.is_empty() && supplemental != header.text {
                check_bounds("supplemental TEXT", supplemental, file_len)?;
                let extra = TextSegment::parse(&read_segment(&mut reader, supplemental)?)?;
                text.merge_supplemental(extra);
            }
        }

        let events = match mode {
            ParseMode::HeadersOnly => None,
            ParseMode::Full => {
                let layout = DataLayout::from_text(&text)?;
                let segment = data_segment(&header, &text)?;
                if layout.expected_len() == 0 {
                    Some(data::decode(&[], &layout)?)
                } else {
                    check_bounds("DATA", segment, file_len)?;
                    Some(data::decode(&read_segment(&mut reader, segment)?, &layout)?)
                }
            }
        };

        Ok(Self {
            header,
            text,
            events,
        })
    }

    /// Look up a TEXT keyword
    pub fn keyword(&self, key: &str) -> Option<&str> {
        self.text.get(key)
    }

    /// Number of parameters declared by `$PAR`
    pub fn parameter_count(&self) -> Result<usize, FcsError> {
        self.text.parameter_count()
    }

    /// All parameters in ascending index order
    pub fn parameters(&self) -> Result<Vec<Parameter>, FcsError> {
        let count = self.parameter_count()?;
        Ok((1..=count)
            .map(|index| Parameter {
                index,
                name: self.text.parameter(index, 'n').unwrap_or_default().to_string(),
                label: self.text.parameter(index, 's').unwrap_or_default().to_string(),
            })
            .collect())
    }
}

/// Supplemental TEXT offsets. Unreadable offsets are skipped so the primary
/// TEXT stays usable.
fn supplemental_segment(text: &TextSegment) -> Segment {
    match (text.get_u64("beginstext"), text.get_u64("endstext")) {
        (Ok(start), Ok(end)) => Segment::new(start.unwrap_or(0), end.unwrap_or(0)),
        (Err(e), _) | (_, Err(e)) => {
            warn!("Ignoring supplemental TEXT: {}", e);
            Segment::default()
        }
    }
}

/// DATA offsets from the HEADER, or from TEXT when the HEADER fields are zero
fn data_segment(header: &FcsHeader, text: &TextSegment) -> Result<Segment, FcsError> {
    if !header.data.is_empty() {
        return Ok(header.data);
    }
    Ok(Segment::new(
        text.get_u64("begindata")?.unwrap_or(0),
        text.get_u64("enddata")?.unwrap_or(0),
    ))
}

fn check_bounds(name: &str, segment: Segment, file_len: u64) -> Result<(), FcsError> {
    if segment.is_empty() || segment.end >= file_len {
        return Err(FcsError::InvalidHeader(format!(
            "{} segment {}..={} lies outside the file ({} bytes)",
            name, segment.start, segment.end, file_len
        )));
    }
    Ok(())
}

fn read_segment<R: Read + Seek>(reader: &mut R, segment: Segment) -> Result<Vec<u8>, FcsError> {
    reader.seek(SeekFrom::Start(segment.start))?;
    let mut buf = vec![0u8; segment.len() as usize];
    reader.read_exact(&mut buf)?;
    Ok(buf)
}
