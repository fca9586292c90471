use serde::{Deserialize, Serialize};

/// Substrings that mark scatter, time and pulse-width pseudo-channels
pub const EXCLUDED_TERMS: [&str; 4] = ["FSC", "SSC", "TIME", "WIDTH"];

/// One detector channel retained after filtering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    /// Short channel code (`$PnN`), e.g. "FL1"
    pub name: String,
    /// Fluorophore or marker label (`$PnS`), empty when the file has none
    pub label: String,
}

impl Channel {
    /// Create a channel entry
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
        }
    }
}

/// True when a parameter measures fluorescence rather than scatter, time or width.
///
/// Name and label are uppercased and concatenated before the substring test,
/// so a match in either field (or across the seam) excludes the parameter.
/// Empty strings never match on their own.
pub fn is_fluorescence_channel(name: &str, label: &str) -> bool {
    let combined = format!("{}{}", name, label).to_uppercase();
    !EXCLUDED_TERMS.iter().any(|term| combined.contains(term))
}
