use super::*;
use crate::fcs::FcsWriter;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_file(dir: &TempDir, name: &str, cytometer: &str, sample: &str, tot: &str) -> PathBuf {
    let path = dir.path().join(name);
    FcsWriter::new()
        .keyword("$DATE", "2024-01-01")
        .keyword("$CYT", cytometer)
        .keyword("TBNM", sample)
        .keyword("$TOT", tot)
        .parameter("FSC-A", "")
        .parameter("FL1", "CD4-FITC")
        .write_file(&path)
        .unwrap();
    path
}

#[test]
fn test_empty_input_rejected() {
    let paths: Vec<PathBuf> = Vec::new();
    assert!(matches!(compare(&paths), Err(CompareError::EmptyInput)));
}

#[test]
fn test_compare_two_files() {
    let dir = TempDir::new().unwrap();
    let a = write_file(&dir, "a.fcs", "FACSCanto", "Tube A", "1000");
    let b = write_file(&dir, "b.fcs", "FACSCanto", "Tube B", "3000");

    let summary = compare(&[a, b]).unwrap();
    assert_eq!(summary.rows.len(), 2);
    assert_eq!(
        summary.rows.columns(),
        &["Data", "Citômetro", "Amostra", "Eventos registrados", "Arquivo"]
    );
    assert_eq!(summary.rows.cell(1, FILE_COLUMN), Some(&Cell::text("b.fcs")));

    assert_eq!(summary.events.count, 2);
    assert_eq!(summary.events.mean, 2000.0);
    assert_eq!(summary.events.min, 1000.0);
    assert_eq!(summary.events.max, 3000.0);
    assert_eq!(summary.events.median, 2000.0);
    let std = summary.events.std.unwrap();
    assert!((std - 1414.213562).abs() < 1e-3);

    let names: Vec<&str> = summary.general.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["Data", "Citômetro", "Amostra", "Arquivo"]);
    match &summary.general[1].1 {
        ColumnSummary::Text(s) => {
            assert_eq!(s.count, 2);
            assert_eq!(s.unique, 1);
            assert_eq!(s.top, "FACSCanto");
            assert_eq!(s.freq, 2);
        }
        other => panic!("expected text summary, got {:?}", other),
    }
    assert!(summary.failures.is_empty());
}

#[test]
fn test_numeric_text_column_summarized_numerically() {
    let dir = TempDir::new().unwrap();
    let a = write_file(&dir, "a.fcs", "Canto", "1", "10");
    let b = write_file(&dir, "b.fcs", "Canto", "3", "20");

    let summary = compare(&[a, b]).unwrap();
    let sample = summary
        .general
        .iter()
        .find(|(n, _)| n == "Amostra")
        .map(|(_, s)| s)
        .unwrap();
    match sample {
        ColumnSummary::Numeric(s) => assert_eq!(s.mean, 2.0),
        other => panic!("expected numeric summary, got {:?}", other),
    }
}

#[test]
fn test_unreadable_file_contributes_defaults() {
    let dir = TempDir::new().unwrap();
    let good = write_file(&dir, "good.fcs", "Canto", "S1", "400");
    let missing = dir.path().join("missing.fcs");

    let summary = compare(&[good, missing]).unwrap();
    assert_eq!(summary.rows.len(), 2);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].file, "missing.fcs");
    assert!(!summary.failures[0].diagnostic.is_empty());
    assert_eq!(summary.rows.cell(1, "Citômetro"), Some(&Cell::text("N/A")));
    assert_eq!(summary.events.min, 0.0);
    assert_eq!(summary.events.max, 400.0);
}

#[test]
fn test_non_numeric_event_count_is_zero() {
    let dir = TempDir::new().unwrap();
    let a = write_file(&dir, "a.fcs", "Canto", "S1", "n/a");
    let summary = compare(&[a]).unwrap();
    assert_eq!(summary.events.mean, 0.0);
    assert_eq!(summary.events.std, None);
}

#[test]
fn test_rendered_tables() {
    let dir = TempDir::new().unwrap();
    let a = write_file(&dir, "a.fcs", "Canto", "S1", "100");
    let b = write_file(&dir, "b.fcs", "Aria", "S2", "300");

    let (general, events) = compare(&[a, b]).unwrap().tables();

    let stat_names: Vec<String> = general
        .column(STAT_COLUMN)
        .unwrap()
        .iter()
        .map(|c| c.to_string())
        .collect();
    assert_eq!(stat_names, vec!["count", "unique", "top", "freq"]);
    assert_eq!(general.cell(1, "Citômetro"), Some(&Cell::Integer(2)));

    let stat_names: Vec<String> = events
        .column(STAT_COLUMN)
        .unwrap()
        .iter()
        .map(|c| c.to_string())
        .collect();
    assert_eq!(
        stat_names,
        vec!["count", "mean", "std", "min", "25%", "50%", "75%", "max"]
    );
    assert_eq!(events.cell(1, EVENTS_METRIC), Some(&Cell::Float(200.0)));
    assert_eq!(events.cell(4, EVENTS_METRIC), Some(&Cell::Float(150.0)));
}

#[test]
fn test_quartiles_interpolate() {
    let s = NumericSummary::from_values(&[1.0, 2.0, 3.0, 4.0]).unwrap();
    assert_eq!(s.q1, 1.75);
    assert_eq!(s.median, 2.5);
    assert_eq!(s.q3, 3.25);
    assert!(NumericSummary::from_values(&[]).is_none());
}

#[test]
fn test_text_summary_tie_goes_to_first_seen() {
    let values: Vec<String> = ["b", "a", "a", "b"].iter().map(|s| s.to_string()).collect();
    let s = TextSummary::from_values(&values).unwrap();
    assert_eq!(s.top, "b");
    assert_eq!(s.freq, 2);
    assert_eq!(s.unique, 2);
}

#[test]
fn test_nan_sample_names_summarized_as_text() {
    let dir = TempDir::new().unwrap();
    let a = write_file(&dir, "a.fcs", "Canto", "NaN", "10");
    let b = write_file(&dir, "b.fcs", "Canto", "inf", "20");

    let summary = compare(&[a, b]).unwrap();
    let sample = summary
        .general
        .iter()
        .find(|(n, _)| n == "Amostra")
        .map(|(_, s)| s)
        .unwrap();
    match sample {
        ColumnSummary::Text(s) => assert_eq!(s.unique, 2),
        other => panic!("expected text summary, got {:?}", other),
    }
}
