//! End-to-end tests: FCS files written to disk, extracted, formatted,
//! compared, and catalogued through the ETL.

use cytocat::catalog::{Assay, Catalog};
use cytocat::compare::{compare, ColumnSummary, CompareError};
use cytocat::config::Config;
use cytocat::etl::{self, read_mapping, write_mapping};
use cytocat::fcs::{FcsFile, FcsWriter, ParseMode};
use cytocat::metadata::{extract, ExtractionResult};
use cytocat::table::{format, Cell, ERROR_COLUMN};
use std::error::Error;
use std::path::Path;
use tempfile::tempdir;

fn write_reference_file(path: &Path) -> Result<(), Box<dyn Error>> {
    FcsWriter::new()
        .keyword("$DATE", "2024-01-01")
        .keyword("$CYT", "FACSCanto")
        .keyword("TBNM", "Sample1")
        .keyword("$TOT", "5000")
        .parameter("FSC-A", "")
        .parameter("FL1", "CD4-FITC")
        .parameter("FL2", "CD8-PE")
        .write_file(path)?;
    Ok(())
}

fn write_sample(path: &Path, cytometer: &str, sample: &str, events: usize) -> Result<(), Box<dyn Error>> {
    std::fs::create_dir_all(path.parent().ok_or("no parent")?)?;
    FcsWriter::new()
        .keyword("$DATE", "05-MAR-2024")
        .keyword("$CYT", cytometer)
        .keyword("TBNM", sample)
        .parameter("FSC-A", "")
        .parameter("SSC-A", "")
        .parameter("FL1-A", "CD3-FITC")
        .parameter("Time", "")
        .events((0..events).map(|i| vec![i as f32, 2.0 * i as f32, 10.0, i as f32 * 0.1]))
        .write_file(path)?;
    Ok(())
}

#[test]
fn test_reference_round_trip() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("reference.fcs");
    write_reference_file(&path)?;

    let result = extract(&path);
    let meta = result.metadata().ok_or("extraction failed")?;
    assert_eq!(meta.channel_names(), vec!["FL1", "FL2"]);
    assert_eq!(meta.fluorophores(), vec!["CD4-FITC", "CD8-PE"]);

    let tables = format(&result);
    let row = tables.general_row().ok_or("no general row")?;
    assert_eq!(row.cell(0, "Data"), Some(&Cell::text("2024-01-01")));
    assert_eq!(row.cell(0, "Citômetro"), Some(&Cell::text("FACSCanto")));
    assert_eq!(row.cell(0, "Amostra"), Some(&Cell::text("Sample1")));
    assert_eq!(row.cell(0, "Eventos registrados"), Some(&Cell::Integer(5000)));
    assert_eq!(tables.channels.len(), 2);
    assert_eq!(tables.fluorophores.len(), 2);
    Ok(())
}

#[test]
fn test_full_parse_decodes_events() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("events.fcs");
    write_sample(&path, "Canto", "S1", 25)?;

    let headers = FcsFile::open(&path, ParseMode::HeadersOnly)?;
    assert!(headers.events.is_none());

    let full = FcsFile::open(&path, ParseMode::Full)?;
    let events = full.events.as_ref().ok_or("no events decoded")?;
    assert_eq!(events.event_count(), 25);
    assert_eq!(events.parameter_count(), 4);
    let event = events.event(3).ok_or("missing event")?;
    assert_eq!(&event[..3], &[3.0, 6.0, 10.0]);
    Ok(())
}

#[test]
fn test_unreadable_file_formats_as_diagnostic() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("broken.fcs");
    std::fs::write(&path, b"this is not an FCS file at all, not even close to it.......")?;

    let result = extract(&path);
    assert!(matches!(result, ExtractionResult::Failed { .. }));

    let tables = format(&result);
    assert!(tables.is_failure());
    assert!(tables.general.has_column(ERROR_COLUMN));
    assert!(!tables.diagnostic().unwrap_or_default().is_empty());
    assert!(tables.channels.is_empty());
    assert!(tables.fluorophores.is_empty());
    Ok(())
}

#[test]
fn test_compare_files_on_disk() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let a = dir.path().join("a.fcs");
    let b = dir.path().join("b.fcs");
    let c = dir.path().join("c.fcs");
    write_sample(&a, "Canto", "S1", 100)?;
    write_sample(&b, "Canto", "S2", 200)?;
    write_sample(&c, "Aria", "S3", 600)?;

    let summary = compare(&[a, b, c])?;
    assert_eq!(summary.events.count, 3);
    assert_eq!(summary.events.mean, 300.0);
    assert_eq!(summary.events.median, 200.0);

    let cytometer = summary
        .general
        .iter()
        .find(|(name, _)| name == "Citômetro")
        .map(|(_, s)| s)
        .ok_or("no cytometer summary")?;
    match cytometer {
        ColumnSummary::Text(s) => {
            assert_eq!(s.unique, 2);
            assert_eq!(s.top, "Canto");
            assert_eq!(s.freq, 2);
        }
        other => panic!("expected text summary, got {:?}", other),
    }

    let empty: Vec<&Path> = Vec::new();
    assert!(matches!(compare(&empty), Err(CompareError::EmptyInput)));
    Ok(())
}

#[test]
fn test_scan_populate_browse() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let raw = dir.path().join("data/raw");
    write_sample(&raw.join("grupo_a/imunofenotipagem/R11.fcs"), "Canto", "R11", 10)?;
    write_sample(&raw.join("grupo_a/imunofenotipagem/R12.fcs"), "Canto", "R12", 20)?;
    write_sample(&raw.join("grupo_b/fagocitose/placa_3/R25.FCS"), "Aria", "R25", 30)?;

    let mut config = Config::default();
    config.catalog.project_root = dir.path().to_path_buf();

    // Scan and write the mapping for review
    let rows = etl::scan(&config)?;
    assert_eq!(rows.len(), 3);
    let mapping = config.catalog.resolve(&config.catalog.mapping_csv);
    write_mapping(&mapping, &rows)?;

    // Populate the catalog from the mapping file
    let db_path = config.catalog.resolve(&config.catalog.database);
    let mut catalog = Catalog::open(&db_path)?;
    catalog.create_schema()?;
    let stats = etl::populate(&mut catalog, &config, &read_mapping(&mapping)?)?;
    assert_eq!(stats.succeeded, 3);
    assert_eq!(stats.failed, 0);

    // Browse: group -> assays -> results
    let group_b = catalog.group_id("Grupo B")?.ok_or("missing group")?;
    assert_eq!(catalog.assays_for_group(group_b)?, vec![Assay::Fagocitose]);

    let results = catalog.results(group_b, Assay::Fagocitose)?;
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].animal_id, Some(25));
    assert_eq!(
        results[0].file_path,
        "data/raw/grupo_b/fagocitose/placa_3/R25.FCS"
    );

    // Catalogued paths resolve against the project root
    let resolved = config.catalog.resolve(Path::new(&results[0].file_path));
    let meta = extract(&resolved);
    assert_eq!(meta.metadata().ok_or("extraction failed")?.sample, "R25");
    Ok(())
}
