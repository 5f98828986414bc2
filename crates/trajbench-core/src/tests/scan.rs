use super::write_file;
use crate::*;

#[test]
fn missing_root_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("does-not-exist");
    let err = ArtifactScanner::new(&missing).unwrap_err();
    assert!(matches!(err, Error::RootNotFound { ref path } if *path == missing));
    assert!(err.to_string().starts_with("Input root directory does not exist:"));
}

#[test]
fn a_file_is_not_a_root() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("bags.txt");
    write_file(&file, "");
    assert!(ArtifactScanner::new(&file).is_err());
}

#[test]
fn tables_match_exact_file_names_in_sorted_order() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write_file(&root.join("b/benchmark_ape_trans.csv"), "");
    write_file(&root.join("a/nested/benchmark_ape_trans.csv"), "");
    write_file(&root.join("a/benchmark_ape_rot.csv"), "");
    write_file(&root.join("a/old_benchmark_ape_trans.csv"), "");

    let scanner = ArtifactScanner::new(root).unwrap();
    let found: Vec<_> = scanner
        .tables("benchmark_ape_trans.csv")
        .map(|p| p.strip_prefix(root).unwrap().to_path_buf())
        .collect();
    assert_eq!(
        found,
        vec![
            std::path::PathBuf::from("a/nested/benchmark_ape_trans.csv"),
            std::path::PathBuf::from("b/benchmark_ape_trans.csv"),
        ]
    );
}

#[test]
fn archives_need_the_extension_and_the_marker() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write_file(&root.join("run_fgo/ape_trans.zip"), "");
    write_file(&root.join("run_fgo/ape_rot.zip"), "");
    write_file(&root.join("run_ekf/results_ape_trans/result.ZIP"), "");
    write_file(&root.join("run_ekf/ape_trans.json"), "");

    let scanner = ArtifactScanner::new(root).unwrap();
    let found: Vec<_> = scanner
        .archives("zip", "ape_trans")
        .map(|p| p.strip_prefix(root).unwrap().to_path_buf())
        .collect();
    assert_eq!(
        found,
        vec![
            std::path::PathBuf::from("run_ekf/results_ape_trans/result.ZIP"),
            std::path::PathBuf::from("run_fgo/ape_trans.zip"),
        ]
    );
}

#[test]
fn marker_is_not_matched_against_the_root_itself() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("ape_trans_results");
    write_file(&root.join("run_fgo/ape_rot.zip"), "");
    let scanner = ArtifactScanner::new(&root).unwrap();
    assert_eq!(scanner.archives("zip", "ape_trans").count(), 0);
}

#[test]
fn agents_are_listed_by_bag_then_name() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    std::fs::create_dir_all(root.join("bag_b/evo/auv1")).unwrap();
    std::fs::create_dir_all(root.join("bag_a/evo/auv2")).unwrap();
    std::fs::create_dir_all(root.join("bag_a/evo/auv0")).unwrap();
    std::fs::create_dir_all(root.join("bag_c/plots")).unwrap();
    write_file(&root.join("bag_a/evo/notes.txt"), "");

    let scanner = ArtifactScanner::new(root).unwrap();
    let agents: Vec<_> = scanner
        .agents()
        .into_iter()
        .map(|a| format!("{}/{}", a.bag, a.name))
        .collect();
    assert_eq!(agents, vec!["bag_a/auv0", "bag_a/auv2", "bag_b/auv1"]);
}

#[test]
fn scans_are_repeatable() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    for bag in ["z", "m", "a"] {
        write_file(&root.join(bag).join("benchmark_rpe_rot.csv"), "");
    }
    let scanner = ArtifactScanner::new(root).unwrap();
    let first: Vec<_> = scanner.tables("benchmark_rpe_rot.csv").collect();
    let second: Vec<_> = scanner.tables("benchmark_rpe_rot.csv").collect();
    assert_eq!(first.len(), 3);
    assert_eq!(first, second);
}
