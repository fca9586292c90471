use std::collections::HashMap;

use serde::Serialize;

use crate::table::Cell;

/// Statistic row labels, in display order
pub const STAT_ROWS: [&str; 11] = [
    "count", "unique", "top", "freq", "mean", "std", "min", "25%", "50%", "75%", "max",
];

/// Descriptive statistics of a numeric column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericSummary {
    /// Number of values
    pub count: usize,
    /// Arithmetic mean
    pub mean: f64,
    /// Sample standard deviation; absent for a single value
    pub std: Option<f64>,
    /// Smallest value
    pub min: f64,
    /// 25th percentile
    pub q1: f64,
    /// 50th percentile
    pub median: f64,
    /// 75th percentile
    pub q3: f64,
    /// Largest value
    pub max: f64,
}

impl NumericSummary {
    /// Summarize values; `None` when there are none
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let count = sorted.len();
        let mean = sorted.iter().sum::<f64>() / count as f64;
        let std = if count > 1 {
            let ss: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
            Some((ss / (count - 1) as f64).sqrt())
        } else {
            None
        };

        Some(Self {
            count,
            mean,
            std,
            min: sorted[0],
            q1: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q3: quantile(&sorted, 0.75),
            max: sorted[count - 1],
        })
    }

    /// Cell for one of [`STAT_ROWS`]
    pub fn cell(&self, stat: &str) -> Cell {
        match stat {
            "count" => Cell::Integer(self.count as i64),
            "mean" => Cell::Float(self.mean),
            "std" => self.std.into(),
            "min" => Cell::Float(self.min),
            "25%" => Cell::Float(self.q1),
            "50%" => Cell::Float(self.median),
            "75%" => Cell::Float(self.q3),
            "max" => Cell::Float(self.max),
            _ => Cell::Empty,
        }
    }
}

/// Presence statistics of a free-text column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextSummary {
    /// Number of values
    pub count: usize,
    /// Number of distinct values
    pub unique: usize,
    /// Most frequent value; ties go to the value seen first
    pub top: String,
    /// Occurrences of `top`
    pub freq: usize,
}

impl TextSummary {
    /// Summarize values; `None` when there are none
    pub fn from_values(values: &[String]) -> Option<Self> {
        let first = values.first()?;
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for value in values {
            *counts.entry(value.as_str()).or_insert(0) += 1;
        }

        let mut top = first.as_str();
        let mut freq = 0;
        for value in values {
            let n = counts[value.as_str()];
            if n > freq {
                top = value.as_str();
                freq = n;
            }
        }

        Some(Self {
            count: values.len(),
            unique: counts.len(),
            top: top.to_string(),
            freq,
        })
    }

    /// Cell for one of [`STAT_ROWS`]
    pub fn cell(&self, stat: &str) -> Cell {
        match stat {
            "count" => Cell::Integer(self.count as i64),
            "unique" => Cell::Integer(self.unique as i64),
            "top" => Cell::text(self.top.as_str()),
            "freq" => Cell::Integer(self.freq as i64),
            _ => Cell::Empty,
        }
    }
}

/// Summary of one column: numeric when every value parses as a number
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnSummary {
    /// Every value is a number
    Numeric(NumericSummary),
    /// Free text
    Text(TextSummary),
}

impl ColumnSummary {
    /// Summarize a column of cells; `None` when it has no non-empty cells
    pub fn from_cells(cells: &[&Cell]) -> Option<Self> {
        let present: Vec<&Cell> = cells.iter().copied().filter(|c| !c.is_empty()).collect();
        if present.is_empty() {
            return None;
        }

        let numbers: Option<Vec<f64>> = present.iter().map(|c| c.as_f64()).collect();
        match numbers {
            Some(values) => NumericSummary::from_values(&values).map(Self::Numeric),
            None => {
                let values: Vec<String> = present.iter().map(|c| c.to_string()).collect();
                TextSummary::from_values(&values).map(Self::Text)
            }
        }
    }

    /// Cell for one of [`STAT_ROWS`]
    pub fn cell(&self, stat: &str) -> Cell {
        match self {
            Self::Numeric(s) => s.cell(stat),
            Self::Text(s) => s.cell(stat),
        }
    }

    fn is_numeric(&self) -> bool {
        matches!(self, Self::Numeric(_))
    }
}

/// Statistic labels that apply to at least one of the summaries
pub(crate) fn applicable_rows<'a, I>(summaries: I) -> Vec<&'static str>
where
    I: IntoIterator<Item = &'a ColumnSummary>,
{
    let (mut any_numeric, mut any_text) = (false, false);
    for summary in summaries {
        if summary.is_numeric() {
            any_numeric = true;
        } else {
            any_text = true;
        }
    }
    STAT_ROWS
        .iter()
        .copied()
        .filter(|stat| match *stat {
            "count" => true,
            "unique" | "top" | "freq" => any_text,
            _ => any_numeric,
        })
        .collect()
}

/// Linear interpolation between closest ranks of a sorted slice
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}
