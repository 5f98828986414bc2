use super::write_file;
use crate::*;

#[test]
fn default_config_is_valid() {
    let config = BenchConfig::default();
    config.validate().unwrap();
    assert_eq!(config.catalog().unwrap(), AlgorithmCatalog::default());
    assert_eq!(config.table_alias_table(), AliasTable::default_tables());
    assert_eq!(config.archive_alias_table(), AliasTable::default_archives());
    assert_eq!(config.metrics.len(), 4);
}

#[test]
fn partial_yaml_overrides_only_named_fields() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bench.yaml");
    write_file(
        &path,
        "algorithms: [FGO, EKF]\nvalue_column: mean\n\
         table_aliases:\n  - { pattern: factor_graph, label: FGO }\n",
    );

    let config = BenchConfig::from_path(&path).unwrap();
    assert_eq!(config.algorithms, vec!["FGO", "EKF"]);
    assert_eq!(config.value_column, "mean");
    assert_eq!(config.table_aliases, vec![Alias::new("factor_graph", "FGO")]);
    assert_eq!(config.archive_aliases, AliasTable::default_archive_aliases());
    assert_eq!(config.archive_marker, "ape_trans");
}

#[test]
fn json_config_is_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bench.json");
    write_file(&path, r#"{"archive_marker": "ape_rot", "archive_extension": "zip"}"#);
    let config = BenchConfig::from_path(&path).unwrap();
    assert_eq!(config.archive_marker, "ape_rot");
}

#[test]
fn config_errors_name_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.yaml");
    let err = BenchConfig::from_path(&missing).unwrap_err();
    assert!(matches!(err, Error::ConfigIo { .. }));

    let bad = dir.path().join("bad.yaml");
    write_file(&bad, "algorithms: {not: a list}\n");
    let err = BenchConfig::from_path(&bad).unwrap_err();
    assert!(matches!(err, Error::ConfigParse { ref path, .. } if *path == bad));
}

#[test]
fn validation_rejects_inconsistent_configs() {
    let mut config = BenchConfig::default();
    config.algorithms = vec!["FGO".into(), "FGO".into()];
    assert!(config.validate().is_err());

    let mut config = BenchConfig::default();
    config.metrics.clear();
    assert!(config.validate().is_err());

    let mut config = BenchConfig::default();
    let dup = config.metrics[0].clone();
    config.metrics.push(dup);
    assert!(config.validate().is_err());

    let mut config = BenchConfig::default();
    config.value_column = " ".into();
    assert!(config.validate().is_err());

    let mut config = BenchConfig::default();
    config.archive_aliases.push(Alias::new("", "FGO"));
    assert!(config.validate().is_err());

    assert!(Pipeline::new(&config).is_err());
}
