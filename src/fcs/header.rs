use std::fmt;
use std::io::Read;

use super::FcsError;

/// Length of the fixed HEADER segment in bytes
pub const HEADER_LEN: usize = 58;

/// Largest offset that fits in an 8-character HEADER field
pub const MAX_HEADER_OFFSET: u64 = 99_999_999;

/// FCS standard revision declared in the first six HEADER bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FcsVersion {
    /// FCS 2.0
    Fcs2_0,
    /// FCS 3.0
    Fcs3_0,
    /// FCS 3.1
    Fcs3_1,
    /// FCS 3.2
    Fcs3_2,
}

impl FcsVersion {
    /// Parse the version tag (e.g. `FCS3.1`)
    pub fn from_tag(tag: &[u8]) -> Option<Self> {
        match tag {
            b"FCS2.0" => Some(Self::Fcs2_0),
            b"FCS3.0" => Some(Self::Fcs3_0),
            b"FCS3.1" => Some(Self::Fcs3_1),
            b"FCS3.2" => Some(Self::Fcs3_2),
            _ => None,
        }
    }

    /// Version tag as written in the HEADER
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Fcs2_0 => "FCS2.0",
            Self::Fcs3_0 => "FCS3.0",
            Self::Fcs3_1 => "FCS3.1",
            Self::Fcs3_2 => "FCS3.2",
        }
    }

    /// Whether this revision defines supplemental TEXT and 64-bit offsets in TEXT
    pub fn has_extended_offsets(&self) -> bool {
        !matches!(self, Self::Fcs2_0)
    }
}

impl fmt::Display for FcsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Inclusive byte range of a segment. `0..=0` means "not present".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Segment {
    /// First byte of the segment
    pub start: u64,
    /// Last byte of the segment (inclusive)
    pub end: u64,
}

impl Segment {
    /// Create a segment from inclusive offsets
    pub fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    /// True when the segment is absent or degenerate
    pub fn is_empty(&self) -> bool {
        (self.start == 0 && self.end == 0) || self.end < self.start
    }

    /// Number of bytes covered by the segment
    pub fn len(&self) -> u64 {
        if self.is_empty() {
            0
        } else {
            self.end - self.start + 1
        }
    }
}

/// Parsed HEADER segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FcsHeader {
    /// Declared standard revision
    pub version: FcsVersion,
    /// Primary TEXT segment
    pub text: Segment,
    /// DATA segment (may be zero when the offsets live in TEXT)
    pub data: Segment,
    /// ANALYSIS segment
    pub analysis: Segment,
}

impl FcsHeader {
    /// Parse the 58 HEADER bytes
    pub fn parse(bytes: &[u8]) -> Result<Self, FcsError> {
        if bytes.len() < HEADER_LEN {
            return Err(FcsError::InvalidHeader(format!(
                "expected {} bytes, found {}",
                HEADER_LEN,
                bytes.len()
            )));
        }

        let version = FcsVersion::from_tag(&bytes[0..6]).ok_or_else(|| {
            FcsError::InvalidHeader(format!(
                "unrecognized version tag {:?}",
                String::from_utf8_lossy(&bytes[0..6])
            ))
        })?;

        let mut offsets = [0u64; 6];
        for (i, offset) in offsets.iter_mut().enumerate() {
            let start = 10 + i * 8;
            *offset = parse_offset(&bytes[start..start + 8])?;
        }

        let text = Segment::new(offsets[0], offsets[1]);
        if text.is_empty() {
            return Err(FcsError::InvalidHeader("TEXT segment is empty".to_string()));
        }
        if text.start < HEADER_LEN as u64 {
            return Err(FcsError::InvalidHeader(format!(
                "TEXT segment starts inside the HEADER (offset {})",
                text.start
            )));
        }

        Ok(Self {
            version,
            text,
            data: Segment::new(offsets[2], offsets[3]),
            analysis: Segment::new(offsets[4], offsets[5]),
        })
    }

    /// Read and parse the HEADER from the start of a stream
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self, FcsError> {
        let mut buf = [0u8; HEADER_LEN];
        reader.read_exact(&mut buf).map_err(|e| match e.kind() {
            std::io::ErrorKind::UnexpectedEof => {
                FcsError::InvalidHeader("file is shorter than the HEADER segment".to_string())
            }
            _ => FcsError::IoError(e),
        })?;
        Self::parse(&buf)
    }

    /// Serialize the HEADER. Offsets above the 8-digit limit are written as zero.
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut out = [b' '; HEADER_LEN];
        out[0..6].copy_from_slice(self.version.tag().as_bytes());
        let fields = [
            self.text.start,
            self.text.end,
            self.data.start,
            self.data.end,
            self.analysis.start,
            self.analysis.end,
        ];
        for (i, value) in fields.iter().enumerate() {
            let value = if *value > MAX_HEADER_OFFSET { 0 } else { *value };
            let start = 10 + i * 8;
            out[start..start + 8].copy_from_slice(format!("{:>8}", value).as_bytes());
        }
        out
    }
}

/// Parse one right-aligned ASCII offset; blank fields read as zero.
fn parse_offset(field: &[u8]) -> Result<u64, FcsError> {
    let text = std::str::from_utf8(field)
        .map_err(|_| FcsError::InvalidHeader("non-ASCII offset field".to_string()))?
        .trim();
    if text.is_empty() {
        return Ok(0);
    }
    text.parse::<u64>()
        .map_err(|_| FcsError::InvalidHeader(format!("invalid offset {:?}", text)))
}
