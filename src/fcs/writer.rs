use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use byteorder::{LittleEndian, WriteBytesExt};

use super::header::{FcsHeader, FcsVersion, Segment, HEADER_LEN};
use super::text::{escape, normalize_key};
use super::FcsError;

const DELIMITER: char = '/';

/// Width of the zero-padded offset values written into TEXT, so the TEXT
/// length is known before the DATA offsets are.
const OFFSET_WIDTH: usize = 20;

/// Builder for FCS 3.1 list-mode files with float32 little-endian data.
///
/// Standard keywords (`$PAR`, `$TOT`, `$DATATYPE`, offsets, ...) are generated.
/// Keywords added with [`FcsWriter::keyword`] override generated ones with the
/// same normalized name, and [`FcsWriter::without_keyword`] suppresses one.
///
/// ```rust
/// use cytocat::fcs::FcsWriter;
///
/// let bytes = FcsWriter::new()
///     .keyword("$CYT", "FACSCanto")
///     .parameter("FSC-A", "")
///     .parameter("FL1", "CD4-FITC")
///     .event(vec![1000.0, 12.5])
///     .to_bytes()
///     .unwrap();
/// assert!(bytes.starts_with(b"FCS3.1"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct FcsWriter {
    keywords: Vec<(String, String)>,
    suppressed: Vec<String>,
    parameters: Vec<(String, String)>,
    events: Vec<Vec<f32>>,
}

impl FcsWriter {
    /// Create an empty writer
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or override a TEXT keyword
    pub fn keyword(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.keywords.push((key.into(), value.into()));
        self
    }

    /// Do not emit a keyword, generated or user supplied
    pub fn without_keyword(mut self, key: &str) -> Self {
        self.suppressed.push(normalize_key(key));
        self
    }

    /// Append a parameter. An empty label omits `$PnS`.
    pub fn parameter(mut self, name: impl Into<String>, label: impl Into<String>) -> Self {
        self.parameters.push((name.into(), label.into()));
        self
    }

    /// Append one event; it must have one value per parameter
    pub fn event(mut self, values: Vec<f32>) -> Self {
        self.events.push(values);
        self
    }

    /// Append several events
    pub fn events<I>(mut self, events: I) -> Self
    where
        I: IntoIterator<Item = Vec<f32>>,
    {
        self.events.extend(events);
        self
    }

    /// Serialize the whole file
    pub fn to_bytes(&self) -> Result<Vec<u8>, FcsError> {
        let mut out = Vec::new();
        self.write_to(&mut out)?;
        Ok(out)
    }

    /// Write the file to a path
    pub fn write_file<P: AsRef<Path>>(&self, path: P) -> Result<(), FcsError> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Serialize into any writer
    pub fn write_to<W: Write>(&self, out: &mut W) -> Result<(), FcsError> {
        let width = self.parameters.len();
        if let Some(bad) = self.events.iter().position(|e| e.len() != width) {
            return Err(FcsError::InvalidData(format!(
                "event {} has {} values, expected {}",
                bad,
                self.events[bad].len(),
                width
            )));
        }

        let data_len = (self.events.len() * width * 4) as u64;
        let pairs = self.keyword_pairs()?;

        // First pass with placeholder offsets fixes the TEXT length
        let text_len = encode_text(&pairs, Segment::default()).len() as u64;
        let text = Segment::new(HEADER_LEN as u64, HEADER_LEN as u64 + text_len - 1);
        let data = if data_len == 0 {
            Segment::default()
        } else {
            Segment::new(text.end + 1, text.end + data_len)
        };
        let text_bytes = encode_text(&pairs, data);

        let header = FcsHeader {
            version: FcsVersion::Fcs3_1,
            text,
            data,
            analysis: Segment::default(),
        };
        out.write_all(&header.to_bytes())?;
        out.write_all(&text_bytes)?;
        for event in &self.events {
            for value in event {
                out.write_f32::<LittleEndian>(*value)?;
            }
        }
        // CRC not computed
        out.write_all(b"00000000")?;
        Ok(())
    }

    fn keyword_pairs(&self) -> Result<Vec<(String, String)>, FcsError> {
        let mut generated = vec![
            ("$BYTEORD".to_string(), "1,2,3,4".to_string()),
            ("$DATATYPE".to_string(), "F".to_string()),
            ("$MODE".to_string(), "L".to_string()),
            ("$NEXTDATA".to_string(), "0".to_string()),
            ("$PAR".to_string(), self.parameters.len().to_string()),
            ("$TOT".to_string(), self.events.len().to_string()),
        ];
        for (i, (name, label)) in self.parameters.iter().enumerate() {
            let n = i + 1;
            generated.push((format!("$P{}N", n), name.clone()));
            if !label.is_empty() {
                generated.push((format!("$P{}S", n), label.clone()));
            }
            generated.push((format!("$P{}B", n), "32".to_string()));
            generated.push((format!("$P{}E", n), "0,0".to_string()));
            generated.push((format!("$P{}R", n), "262144".to_string()));
        }

        let overridden: Vec<String> = self.keywords.iter().map(|(k, _)| normalize_key(k)).collect();
        let mut pairs: Vec<(String, String)> = generated
            .into_iter()
            .filter(|(k, _)| !overridden.contains(&normalize_key(k)))
            .chain(self.keywords.iter().cloned())
            .filter(|(k, _)| !self.suppressed.contains(&normalize_key(k)))
            .collect();

        for (key, value) in &pairs {
            if key.trim().is_empty() {
                return Err(FcsError::InvalidText("empty keyword name".to_string()));
            }
            if value.is_empty() {
                return Err(FcsError::InvalidText(format!("keyword {} has an empty value", key)));
            }
            // A leading delimiter would read back as an escaped delimiter
            if key.starts_with(DELIMITER) || value.starts_with(DELIMITER) {
                return Err(FcsError::InvalidText(format!(
                    "keyword {:?} = {:?} starts with the delimiter {:?}",
                    key, value, DELIMITER
                )));
            }
        }
        pairs.retain(|(k, _)| !is_offset_keyword(k));
        Ok(pairs)
    }
}

fn is_offset_keyword(key: &str) -> bool {
    matches!(
        normalize_key(key).as_str(),
        "begindata" | "enddata" | "beginanalysis" | "endanalysis" | "beginstext" | "endstext"
    )
}

fn encode_text(pairs: &[(String, String)], data: Segment) -> Vec<u8> {
    let mut text = String::new();
    text.push(DELIMITER);
    let offsets = [
        ("$BEGINANALYSIS", 0),
        ("$ENDANALYSIS", 0),
        ("$BEGINSTEXT", 0),
        ("$ENDSTEXT", 0),
        ("$BEGINDATA", data.start),
        ("$ENDDATA", data.end),
    ];
    for (key, value) in offsets {
        text.push_str(key);
        text.push(DELIMITER);
        text.push_str(&format!("{:0width$}", value, width = OFFSET_WIDTH));
        text.push(DELIMITER);
    }
    for (key, value) in pairs {
        text.push_str(&escape(key, DELIMITER));
        text.push(DELIMITER);
        text.push_str(&escape(value, DELIMITER));
        text.push(DELIMITER);
    }
    text.into_bytes()
}
