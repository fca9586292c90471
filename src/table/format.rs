use serde::Serialize;

use super::{Cell, Table};
use crate::metadata::ExtractionResult;

/// Key column of the general-info table
pub const METRIC_COLUMN: &str = "Métrica";
/// Value column of the general-info table
pub const VALUE_COLUMN: &str = "Valor";
/// Single column of the channel table
pub const CHANNEL_COLUMN: &str = "Canal";
/// Single column of the fluorophore table
pub const FLUOROPHORE_COLUMN: &str = "Fluoróforo";
/// Diagnostic column present only when extraction failed
pub const ERROR_COLUMN: &str = "Erro de Leitura";
/// Source file name column added by comparisons
pub const FILE_COLUMN: &str = "Arquivo";

/// Acquisition date metric
pub const DATE_METRIC: &str = "Data";
/// Cytometer metric
pub const CYTOMETER_METRIC: &str = "Citômetro";
/// Sample name metric
pub const SAMPLE_METRIC: &str = "Amostra";
/// Event count metric
pub const EVENTS_METRIC: &str = "Eventos registrados";

/// Row order of the general-info table
pub const GENERAL_METRICS: [&str; 4] = [DATE_METRIC, CYTOMETER_METRIC, SAMPLE_METRIC, EVENTS_METRIC];

/// The three views of one extraction result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormattedTables {
    /// `Métrica`/`Valor` rows, or a single `Erro de Leitura` column on failure
    pub general: Table,
    /// One `Canal` row per retained channel
    pub channels: Table,
    /// One `Fluoróforo` row per retained channel
    pub fluorophores: Table,
}

impl FormattedTables {
    /// True when the general table carries the diagnostic column
    pub fn is_failure(&self) -> bool {
        self.general.has_column(ERROR_COLUMN)
    }

    /// Diagnostic text of a failed extraction
    pub fn diagnostic(&self) -> Option<&str> {
        self.general.cell(0, ERROR_COLUMN).and_then(Cell::as_text)
    }

    /// General info as one wide row (columns = metric names)
    pub fn general_row(&self) -> Option<Table> {
        self.general.transpose(METRIC_COLUMN, VALUE_COLUMN)
    }
}

/// Build the general, channel and fluorophore tables for one result
pub fn format(result: &ExtractionResult) -> FormattedTables {
    let mut channels = Table::new([CHANNEL_COLUMN]);
    let mut fluorophores = Table::new([FLUOROPHORE_COLUMN]);

    let meta = match result {
        ExtractionResult::Extracted(meta) => meta,
        ExtractionResult::Failed { diagnostic } => {
            let mut general = Table::new([ERROR_COLUMN]);
            general.push_row(vec![Cell::text(diagnostic.as_str())]);
            return FormattedTables {
                general,
                channels,
                fluorophores,
            };
        }
    };

    let mut general = Table::new([METRIC_COLUMN, VALUE_COLUMN]);
    let values = [
        Cell::text(meta.date.as_str()),
        Cell::text(meta.cytometer.as_str()),
        Cell::text(meta.sample.as_str()),
        Cell::Integer(i64::try_from(meta.event_count).unwrap_or(i64::MAX)),
    ];
    for (metric, value) in GENERAL_METRICS.iter().zip(values) {
        general.push_row(vec![Cell::text(*metric), value]);
    }

    for channel in &meta.channels {
        channels.push_row(vec![Cell::text(channel.name.as_str())]);
        fluorophores.push_row(vec![Cell::text(channel.label.as_str())]);
    }

    FormattedTables {
        general,
        channels,
        fluorophores,
    }
}
