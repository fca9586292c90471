use super::*;

fn catalog() -> Catalog {
    let catalog = Catalog::open_in_memory().unwrap();
    catalog.create_schema().unwrap();
    catalog
}

fn result<'a>(animal_id: Option<i64>, file_path: &'a str) -> NewResult<'a> {
    NewResult {
        animal_id,
        file_path,
        condition: None,
        experiment_date: None,
    }
}

#[test]
fn test_create_schema_is_idempotent() {
    let catalog = catalog();
    catalog.create_schema().unwrap();
    assert!(catalog.groups().unwrap().is_empty());
}

#[test]
fn test_ensure_group_returns_same_id() {
    let catalog = catalog();
    let a = catalog.ensure_group("Grupo A").unwrap();
    let again = catalog.ensure_group("Grupo A").unwrap();
    let b = catalog.ensure_group("Grupo B").unwrap();
    assert_eq!(a, again);
    assert_ne!(a, b);
    assert_eq!(catalog.group_id("Grupo B").unwrap(), Some(b));
    assert_eq!(catalog.group_id("Grupo Z").unwrap(), None);
}

#[test]
fn test_groups_sorted_by_name() {
    let catalog = catalog();
    catalog.ensure_group("Grupo C").unwrap();
    catalog.ensure_group("Grupo A").unwrap();
    let names: Vec<String> = catalog.groups().unwrap().into_iter().map(|g| g.name).collect();
    assert_eq!(names, vec!["Grupo A", "Grupo C"]);
}

#[test]
fn test_insert_and_query_results() {
    let mut catalog = catalog();
    let group = catalog.ensure_group("Grupo A").unwrap();

    catalog
        .insert_result(group, Assay::Fagocitose, &result(Some(14), "data/raw/grupo_a/fagocitose/R14.fcs"))
        .unwrap();
    catalog
        .insert_result(group, Assay::Fagocitose, &result(Some(12), "data/raw/grupo_a/fagocitose/R12.fcs"))
        .unwrap();
    catalog
        .insert_result(
            group,
            Assay::Agonistas,
            &NewResult {
                animal_id: None,
                file_path: "data/raw/grupo_a/agonistas/pool.fcs",
                condition: Some("LPS"),
                experiment_date: Some("2024-03-01"),
            },
        )
        .unwrap();

    assert_eq!(
        catalog.assays_for_group(group).unwrap(),
        vec![Assay::Agonistas, Assay::Fagocitose]
    );

    let fagocitose = catalog.results(group, Assay::Fagocitose).unwrap();
    let ids: Vec<Option<i64>> = fagocitose.iter().map(|r| r.animal_id).collect();
    assert_eq!(ids, vec![Some(12), Some(14)]);
    assert_eq!(fagocitose[0].file_path, "data/raw/grupo_a/fagocitose/R12.fcs");

    let agonistas = catalog.results(group, Assay::Agonistas).unwrap();
    assert_eq!(agonistas.len(), 1);
    assert_eq!(agonistas[0].animal_id, None);
    assert_eq!(agonistas[0].condition.as_deref(), Some("LPS"));

    assert!(catalog.results(group, Assay::Cryptococcus).unwrap().is_empty());
}

#[test]
fn test_results_are_scoped_to_group() {
    let mut catalog = catalog();
    let a = catalog.ensure_group("Grupo A").unwrap();
    let b = catalog.ensure_group("Grupo B").unwrap();
    catalog
        .insert_result(a, Assay::Imunofenotipagem, &result(Some(11), "a.fcs"))
        .unwrap();
    catalog
        .insert_result(b, Assay::Imunofenotipagem, &result(Some(21), "b.fcs"))
        .unwrap();

    let rows = catalog.results(b, Assay::Imunofenotipagem).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].file_path, "b.fcs");
    assert!(catalog.assays_for_group(a).unwrap().contains(&Assay::Imunofenotipagem));
}

#[test]
fn test_insert_for_missing_group_rolls_back() {
    let mut catalog = catalog();
    let err = catalog
        .insert_result(999, Assay::Fagocitose, &result(Some(1), "orphan.fcs"))
        .unwrap_err();
    assert!(matches!(err, CatalogError::SqliteError(_)));

    // The detail row must not survive the failed master insert
    let group = catalog.ensure_group("Grupo A").unwrap();
    catalog
        .insert_result(group, Assay::Fagocitose, &result(Some(2), "kept.fcs"))
        .unwrap();
    let count: i64 = catalog
        .conn
        .query_row("SELECT COUNT(*) FROM detalhes_fagocitose", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn test_open_creates_parent_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("database").join("experimentos.db");
    let catalog = Catalog::open(&path).unwrap();
    catalog.create_schema().unwrap();
    assert!(path.exists());
}

#[test]
fn test_assay_parsing() {
    assert_eq!("Fagocitose".parse::<Assay>().unwrap(), Assay::Fagocitose);
    assert_eq!(" agonistas ".parse::<Assay>().unwrap(), Assay::Agonistas);
    assert!(matches!(
        "citometria".parse::<Assay>(),
        Err(CatalogError::UnknownAssay(_))
    ));
    assert_eq!(Assay::Cryptococcus.to_string(), "cryptococcus");
}
