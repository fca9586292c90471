use std::collections::BTreeMap;

use super::FcsError;

/// Keyword/value pairs of a TEXT segment.
///
/// Keys are stored normalized: surrounding whitespace trimmed, the leading `$`
/// of standard keywords removed, and lowercased. `$P3N`, `p3n` and `$p3N` all
/// resolve to `p3n`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextSegment {
    keywords: BTreeMap<String, String>,
}

impl TextSegment {
    /// Create an empty segment
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse raw TEXT bytes. The first byte is the delimiter.
    pub fn parse(raw: &[u8]) -> Result<Self, FcsError> {
        let (&delimiter, body) = raw
            .split_first()
            .ok_or_else(|| FcsError::InvalidText("segment is empty".to_string()))?;
        if delimiter == 0 || delimiter > 126 {
            return Err(FcsError::InvalidText(format!(
                "delimiter byte {:#04x} is not a printable ASCII character",
                delimiter
            )));
        }

        let utf8 = std::str::from_utf8(raw).is_ok();
        let fields = split_fields(body, delimiter);
        if fields.len() % 2 != 0 {
            return Err(FcsError::InvalidText(format!(
                "odd number of fields ({}); a keyword is missing its value",
                fields.len()
            )));
        }

        let mut segment = Self::new();
        for pair in fields.chunks_exact(2) {
            let key = decode(&pair[0], utf8);
            if key.trim().is_empty() {
                return Err(FcsError::InvalidText("empty keyword name".to_string()));
            }
            segment.insert(&key, decode(&pair[1], utf8));
        }
        Ok(segment)
    }

    /// Insert a keyword, replacing any previous value
    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        self.keywords.insert(normalize_key(key), value.into());
    }

    /// Look up a keyword (any spelling of the key is accepted)
    pub fn get(&self, key: &str) -> Option<&str> {
        self.keywords.get(&normalize_key(key)).map(String::as_str)
    }

    /// Look up a keyword and parse it as an unsigned integer
    pub fn get_u64(&self, key: &str) -> Result<Option<u64>, FcsError> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => value
                .trim()
                .parse::<u64>()
                .map(Some)
                .map_err(|_| FcsError::InvalidKeyword {
                    keyword: normalize_key(key),
                    value: value.to_string(),
                }),
        }
    }

    /// Per-parameter keyword, e.g. `parameter(3, 'n')` reads `$P3N`
    pub fn parameter(&self, index: usize, suffix: char) -> Option<&str> {
        self.get(&format!("p{}{}", index, suffix))
    }

    /// Merge keywords from a supplemental segment. Existing keys win.
    pub fn merge_supplemental(&mut self, other: TextSegment) {
        for (key, value) in other.keywords {
            self.keywords.entry(key).or_insert(value);
        }
    }

    /// `$PAR`, bounded by the number of keywords since every parameter
    /// carries at least its own `$PnN`
    pub fn parameter_count(&self) -> Result<usize, FcsError> {
        let count = self
            .get_u64("par")?
            .ok_or_else(|| FcsError::MissingKeyword("$PAR".to_string()))?;
        if count > self.len() as u64 {
            return Err(FcsError::InvalidKeyword {
                keyword: "par".to_string(),
                value: count.to_string(),
            });
        }
        Ok(count as usize)
    }

    /// Number of keywords
    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    /// True when there are no keywords
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Iterate keywords in normalized-key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.keywords.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Normalize a keyword name for lookup
pub fn normalize_key(key: &str) -> String {
    let key = key.trim();
    key.strip_prefix('$').unwrap_or(key).to_lowercase()
}

/// Escape a key or value for writing: the delimiter is doubled
pub fn escape(field: &str, delimiter: char) -> String {
    let doubled: String = [delimiter, delimiter].iter().collect();
    field.replace(delimiter, &doubled)
}

/// Split on single delimiters; a doubled delimiter is a literal delimiter byte.
fn split_fields(body: &[u8], delimiter: u8) -> Vec<Vec<u8>> {
    let mut fields = Vec::new();
    let mut current = Vec::new();
    let mut i = 0;
    while i < body.len() {
        let byte = body[i];
        if byte == delimiter {
            if body.get(i + 1) == Some(&delimiter) {
                current.push(delimiter);
                i += 2;
                continue;
            }
            fields.push(std::mem::take(&mut current));
        } else {
            current.push(byte);
        }
        i += 1;
    }

    // Missing final delimiter; padding after it is ignored
    if current.iter().any(|b| !b.is_ascii_whitespace() && *b != 0) {
        fields.push(current);
    }
    fields
}

fn decode(bytes: &[u8], utf8: bool) -> String {
    if utf8 {
        String::from_utf8_lossy(bytes).into_owned()
    } else {
        // Latin-1: every byte maps to the code point of the same value
        bytes.iter().map(|&b| b as char).collect()
    }
}
