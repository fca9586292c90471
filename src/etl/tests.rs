use super::*;
use crate::catalog::{Assay, Catalog};
use crate::config::{Config, GroupConfig};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn touch(path: &Path) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, b"FCS3.1").unwrap();
}

fn config_for(root: &Path) -> Config {
    let mut config = Config::default();
    config.catalog.project_root = root.to_path_buf();
    config
}

#[test]
fn test_animal_id_uses_group_range() {
    let group = GroupConfig::new("b", "Grupo B", 21, 30);
    assert_eq!(animal_id_from_name("2024_R23_tube.fcs", &group), Some(23));
    assert_eq!(animal_id_from_name("plate3_animal27.fcs", &group), Some(27));
    assert_eq!(animal_id_from_name("R5.fcs", &group), None);
    assert_eq!(animal_id_from_name("control.fcs", &group), None);
}

#[test]
fn test_find_fcs_files_recursive_and_sorted() {
    let dir = TempDir::new().unwrap();
    touch(&dir.path().join("b.fcs"));
    touch(&dir.path().join("nested/a.FCS"));
    touch(&dir.path().join("notes.txt"));

    let files = find_fcs_files(dir.path()).unwrap();
    let names: Vec<String> = files
        .iter()
        .map(|p| p.strip_prefix(dir.path()).unwrap().to_string_lossy().replace('\\', "/"))
        .collect();
    assert_eq!(names, vec!["b.fcs", "nested/a.FCS"]);
}

#[test]
fn test_scan_builds_relative_mapping() {
    let dir = TempDir::new().unwrap();
    let raw = dir.path().join("data/raw");
    touch(&raw.join("grupo_a/fagocitose/R12.fcs"));
    touch(&raw.join("grupo_a/fagocitose/day2/R15.fcs"));
    touch(&raw.join("grupo_b/agonistas/pool.fcs"));
    touch(&raw.join("grupo_b/desconhecido/R22.fcs"));

    let rows = scan(&config_for(dir.path())).unwrap();
    assert_eq!(rows.len(), 3);

    assert_eq!(
        rows[0],
        MappingRow {
            group: "Grupo A".to_string(),
            assay: "fagocitose".to_string(),
            animal_id: Some(12),
            file_path: "data/raw/grupo_a/fagocitose/R12.fcs".to_string(),
        }
    );
    assert_eq!(rows[1].file_path, "data/raw/grupo_a/fagocitose/day2/R15.fcs");
    assert_eq!(rows[1].animal_id, Some(15));
    assert_eq!(rows[2].group, "Grupo B");
    assert_eq!(rows[2].assay, "agonistas");
    assert_eq!(rows[2].animal_id, None);
}

#[test]
fn test_scan_missing_data_root_is_empty() {
    let dir = TempDir::new().unwrap();
    assert!(scan(&config_for(dir.path())).unwrap().is_empty());
}

#[test]
fn test_mapping_csv_round_trip_keeps_empty_animal() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out/mapeamento.csv");
    let rows = vec![
        MappingRow {
            group: "Grupo A".to_string(),
            assay: "fagocitose".to_string(),
            animal_id: Some(11),
            file_path: "data/raw/grupo_a/fagocitose/R11.fcs".to_string(),
        },
        MappingRow {
            group: "Grupo A".to_string(),
            assay: "agonistas".to_string(),
            animal_id: None,
            file_path: "data/raw/grupo_a/agonistas/pool.fcs".to_string(),
        },
    ];

    write_mapping(&path, &rows).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("nome_grupo,tipo_ensaio,id_animal,caminho_arquivo"));
    assert!(text.contains("Grupo A,agonistas,,data/raw/grupo_a/agonistas/pool.fcs"));

    assert_eq!(read_mapping(&path).unwrap(), rows);
}

#[test]
fn test_empty_mapping_still_has_header() {
    let mut out = Vec::new();
    write_mapping_to(&mut out, &[]).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap().trim(),
        "nome_grupo,tipo_ensaio,id_animal,caminho_arquivo"
    );
}

#[test]
fn test_malformed_mapping_is_csv_error() {
    let csv = "nome_grupo,tipo_ensaio,id_animal,caminho_arquivo\nGrupo A,fagocitose,onze,x.fcs\n";
    assert!(matches!(
        read_mapping_from(csv.as_bytes()),
        Err(EtlError::CsvError(_))
    ));
}

#[test]
fn test_populate_counts_failures() {
    let csv = "\
nome_grupo,tipo_ensaio,id_animal,caminho_arquivo
Grupo A,fagocitose,12,data/raw/grupo_a/fagocitose/R12.fcs
Grupo A,fagocitose,11,data/raw/grupo_a/fagocitose/R11.fcs
Grupo B,agonistas,,data/raw/grupo_b/agonistas/pool.fcs
Grupo Z,fagocitose,1,z.fcs
Grupo A,citometria,13,y.fcs
";
    let rows = read_mapping_from(csv.as_bytes()).unwrap();

    let mut catalog = Catalog::open_in_memory().unwrap();
    catalog.create_schema().unwrap();
    let stats = populate(&mut catalog, &Config::default(), &rows).unwrap();

    assert_eq!(stats, EtlStats { succeeded: 3, failed: 2 });
    assert_eq!(stats.to_string(), "3 rows loaded, 2 rows skipped");

    // Configured groups exist even without rows
    assert_eq!(catalog.groups().unwrap().len(), 3);

    let group_a = catalog.group_id("Grupo A").unwrap().unwrap();
    let results = catalog.results(group_a, Assay::Fagocitose).unwrap();
    let ids: Vec<Option<i64>> = results.iter().map(|r| r.animal_id).collect();
    assert_eq!(ids, vec![Some(11), Some(12)]);
}
