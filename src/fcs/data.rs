//! DATA segment decoding for list-mode files.
//!
//! Only `$MODE` L is supported. Values of every `$DATATYPE` are widened to
//! `f64` so callers do not have to care about the on-disk representation.

use std::io::Cursor;

use byteorder::{BigEndian, ByteOrder, LittleEndian, ReadBytesExt};

use super::{FcsError, TextSegment};

/// On-disk value type declared by `$DATATYPE`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    /// Unsigned integers, width from `$PnB`
    Integer,
    /// IEEE-754 single precision
    Float,
    /// IEEE-754 double precision
    Double,
}

impl DataType {
    fn from_keyword(value: &str) -> Result<Self, FcsError> {
        match value.trim().to_ascii_uppercase().as_str() {
            "I" => Ok(Self::Integer),
            "F" => Ok(Self::Float),
            "D" => Ok(Self::Double),
            "A" => Err(FcsError::Unsupported("ASCII ($DATATYPE A) data".to_string())),
            other => Err(FcsError::InvalidKeyword {
                keyword: "datatype".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// Byte order declared by `$BYTEORD`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
    /// `1,2,3,4`
    Little,
    /// `4,3,2,1`
    Big,
}

impl Endianness {
    fn from_keyword(value: &str) -> Result<Self, FcsError> {
        let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
        match compact.as_str() {
            "1,2,3,4" | "1,2" | "1,2,3,4,5,6,7,8" => Ok(Self::Little),
            "4,3,2,1" | "2,1" | "8,7,6,5,4,3,2,1" => Ok(Self::Big),
            _ => Err(FcsError::Unsupported(format!("byte order {:?}", value))),
        }
    }
}

/// Everything needed to walk the DATA segment, resolved from TEXT keywords
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLayout {
    /// Value type
    pub datatype: DataType,
    /// Byte order
    pub endianness: Endianness,
    /// Bit width of each parameter, in parameter order
    pub bits: Vec<u32>,
    /// Number of events (`$TOT`)
    pub event_count: usize,
}

impl DataLayout {
    /// Resolve the layout from TEXT keywords
    pub fn from_text(text: &TextSegment) -> Result<Self, FcsError> {
        if let Some(mode) = text.get("mode") {
            if !mode.trim().eq_ignore_ascii_case("L") {
                return Err(FcsError::Unsupported(format!("$MODE {}", mode.trim())));
            }
        }

        let datatype = DataType::from_keyword(
            text.get("datatype")
                .ok_or_else(|| FcsError::MissingKeyword("$DATATYPE".to_string()))?,
        )?;
        let endianness = Endianness::from_keyword(
            text.get("byteord")
                .ok_or_else(|| FcsError::MissingKeyword("$BYTEORD".to_string()))?,
        )?;
        let parameter_count = text.parameter_count()?;
        let event_count = text
            .get_u64("tot")?
            .ok_or_else(|| FcsError::MissingKeyword("$TOT".to_string()))? as usize;

        let mut bits = Vec::with_capacity(parameter_count);
        for index in 1..=parameter_count {
            let width = match datatype {
                DataType::Float => 32,
                DataType::Double => 64,
                DataType::Integer => {
                    let key = format!("p{}b", index);
                    let raw = text
                        .get(&key)
                        .ok_or_else(|| FcsError::MissingKeyword(format!("$P{}B", index)))?;
                    match raw.trim().parse::<u32>() {
                        Ok(width @ (8 | 16 | 32 | 64)) => width,
                        _ => {
                            return Err(FcsError::Unsupported(format!(
                                "integer width {:?} for parameter {}",
                                raw, index
                            )))
                        }
                    }
                }
            };
            bits.push(width);
        }

        Ok(Self {
            datatype,
            endianness,
            bits,
            event_count,
        })
    }

    /// Bytes occupied by one event
    pub fn event_width(&self) -> usize {
        self.bits.iter().map(|b| *b as usize / 8).sum()
    }

    /// Bytes the DATA segment must hold
    pub fn expected_len(&self) -> usize {
        self.event_width().saturating_mul(self.event_count)
    }
}

/// Decoded list-mode event matrix, stored row-major (one row per event)
#[derive(Debug, Clone, PartialEq)]
pub struct EventMatrix {
    parameter_count: usize,
    values: Vec<f64>,
}

impl EventMatrix {
    /// Number of parameters (columns)
    pub fn parameter_count(&self) -> usize {
        self.parameter_count
    }

    /// Number of events (rows)
    pub fn event_count(&self) -> usize {
        if self.parameter_count == 0 {
            0
        } else {
            self.values.len() / self.parameter_count
        }
    }

    /// Values of one event
    pub fn event(&self, index: usize) -> Option<&[f64]> {
        let start = index.checked_mul(self.parameter_count)?;
        let end = start.checked_add(self.parameter_count)?;
        self.values.get(start..end)
    }

    /// Values of one parameter across all events (0-based column)
    pub fn column(&self, parameter: usize) -> impl Iterator<Item = f64> + '_ {
        let stride = self.parameter_count.max(1);
        let take = if parameter < self.parameter_count {
            self.event_count()
        } else {
            0
        };
        self.values.iter().skip(parameter).step_by(stride).take(take).copied()
    }
}

/// Decode the DATA segment bytes according to `layout`
pub fn decode(bytes: &[u8], layout: &DataLayout) -> Result<EventMatrix, FcsError> {
    let expected = layout.expected_len();
    if bytes.len() < expected {
        return Err(FcsError::InvalidData(format!(
            "expected {} bytes for {} events, segment holds {}",
            expected,
            layout.event_count,
            bytes.len()
        )));
    }

    let values = match layout.endianness {
        Endianness::Little => decode_with::<LittleEndian>(&bytes[..expected], layout)?,
        Endianness::Big => decode_with::<BigEndian>(&bytes[..expected], layout)?,
    };

    Ok(EventMatrix {
        parameter_count: layout.bits.len(),
        values,
    })
}

fn decode_with<B: ByteOrder>(bytes: &[u8], layout: &DataLayout) -> Result<Vec<f64>, FcsError> {
    if layout.bits.is_empty() {
        return Ok(Vec::new());
    }
    let mut cursor = Cursor::new(bytes);
    let mut values = Vec::with_capacity(layout.event_count * layout.bits.len());
    for _ in 0..layout.event_count {
        for &width in &layout.bits {
            let value = match (layout.datatype, width) {
                (DataType::Float, _) => cursor.read_f32::<B>()? as f64,
                (DataType::Double, _) => cursor.read_f64::<B>()?,
                (DataType::Integer, 8) => cursor.read_u8()? as f64,
                (DataType::Integer, 16) => cursor.read_u16::<B>()? as f64,
                (DataType::Integer, 32) => cursor.read_u32::<B>()? as f64,
                (DataType::Integer, _) => cursor.read_u64::<B>()? as f64,
            };
            values.push(value);
        }
    }
    Ok(values)
}
