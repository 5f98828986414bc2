use super::{tum, write_archive, write_file};
use crate::*;

const TABLE: &str = "\
,max,mean,median,min,rmse,sse,std
global,0.91,0.40,0.35,0.02,0.45,120.5,0.21
global_tm,1.20,0.52,0.47,0.03,0.61,200.1,0.30
unknown_algo,2.00,1.00,1.00,0.10,1.10,900.0,0.50
";

#[test]
fn csv_table_keeps_first_column_keys_and_value_column() {
    let rows = CsvTableDecoder::default()
        .decode_reader(TABLE.as_bytes())
        .unwrap();
    assert_eq!(
        rows,
        vec![
            TableRow { key: "global".into(), value: 0.45 },
            TableRow { key: "global_tm".into(), value: 0.61 },
            TableRow { key: "unknown_algo".into(), value: 1.10 },
        ]
    );
}

#[test]
fn csv_table_uses_configured_value_column() {
    let rows = CsvTableDecoder::new("mean")
        .decode_reader(TABLE.as_bytes())
        .unwrap();
    assert_eq!(rows[0].value, 0.40);
    assert_eq!(rows[1].value, 0.52);
}

#[test]
fn csv_table_without_value_column_is_malformed() {
    let err = CsvTableDecoder::default()
        .decode_reader("name,mean\nglobal,0.3\n".as_bytes())
        .unwrap_err();
    assert!(matches!(err, ArtifactError::MissingColumn { ref column } if column == "rmse"));
}

#[test]
fn csv_table_value_column_cannot_be_the_key_column() {
    let err = CsvTableDecoder::default()
        .decode_reader("rmse,mean\nglobal,0.3\n".as_bytes())
        .unwrap_err();
    assert!(matches!(err, ArtifactError::MissingColumn { .. }));
}

#[test]
fn csv_table_rejects_the_whole_file_on_a_bad_cell() {
    let text = ",rmse\nglobal,0.45\nglobal_tm,n/a\n";
    let err = CsvTableDecoder::default()
        .decode_reader(text.as_bytes())
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "row `global_tm` has non-numeric value `n/a` in column `rmse`"
    );
}

#[test]
fn csv_table_reads_empty_cells_as_nan() {
    let text = ",mean,rmse\nglobal,0.3,0.45\ndvl,0.2,\nglobal_tm,0.5\n";
    let rows = CsvTableDecoder::default()
        .decode_reader(text.as_bytes())
        .unwrap();
    let keys: Vec<&str> = rows.iter().map(|r| r.key.as_str()).collect();
    assert_eq!(keys, ["global", "dvl", "global_tm"]);
    assert_eq!(rows[0].value, 0.45);
    assert!(rows[1].value.is_nan());
    assert!(rows[2].value.is_nan());
}

#[test]
fn csv_table_empty_file_has_no_header() {
    let err = CsvTableDecoder::default().decode_reader(&b""[..]).unwrap_err();
    assert!(matches!(err, ArtifactError::MissingHeader));
}

#[test]
fn csv_decoder_reports_missing_files_as_io_errors() {
    let dir = tempfile::tempdir().unwrap();
    let err = CsvTableDecoder::default()
        .decode(&dir.path().join("nope.csv"))
        .unwrap_err();
    assert!(matches!(err, ArtifactError::Io(_)));
}

#[test]
fn tum_parsing_skips_comments_and_accepts_commas() {
    let text = "# header\n\n0.0 1 2 3 0 0 0 1\n0.1,4,5,6,0,0,0,1\n";
    let traj = Trajectory::parse_tum("x.tum", text).unwrap();
    assert_eq!(traj.num_poses(), 2);
    assert_eq!(traj.start(), Some([1.0, 2.0, 3.0]));
    assert_eq!(traj.end(), Some([4.0, 5.0, 6.0]));
    assert_eq!(traj.poses()[1].timestamp, 0.1);
}

#[test]
fn tum_parsing_reports_line_numbers() {
    let err = Trajectory::parse_tum("x.tum", "0 1 2 3 0 0 0 1\n0 1 2\n").unwrap_err();
    assert_eq!(
        err.to_string(),
        "trajectory `x.tum` line 2: expected 8 values, found 3"
    );
}

#[test]
fn kitti_parsing_reads_translation_and_rotation() {
    // Identity rotation, then a 90 degree yaw.
    let text = "1 0 0 1 0 1 0 2 0 0 1 3\n0 -1 0 4 1 0 0 5 0 0 1 6\n";
    let traj = Trajectory::parse_kitti("x.kitti", text).unwrap();
    assert_eq!(traj.positions().collect::<Vec<_>>(), vec![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
    assert_eq!(traj.poses()[0].orientation, [0.0, 0.0, 0.0, 1.0]);

    let q = traj.poses()[1].orientation;
    let half = std::f64::consts::FRAC_1_SQRT_2;
    assert!((q[2] - half).abs() < 1e-12);
    assert!((q[3] - half).abs() < 1e-12);
    assert_eq!(traj.poses()[1].timestamp, 1.0);
}

#[test]
fn same_extent_compares_count_and_endpoints() {
    let a = Trajectory::from_positions([[0.0, 0.0, 0.0], [1.0, 1.0, 0.0]]);
    let b = Trajectory::from_positions([[0.0, 0.0, 0.0], [1.0, 1.0 + 1e-9, 0.0]]);
    let c = Trajectory::from_positions([[0.0, 0.0, 0.0], [2.0, 1.0, 0.0]]);
    let d = Trajectory::from_positions([[0.0, 0.0, 0.0], [0.5, 0.5, 0.0], [1.0, 1.0, 0.0]]);
    assert!(a.same_extent(&b, 1e-6));
    assert!(!a.same_extent(&c, 1e-6));
    assert!(!a.same_extent(&d, 1e-6));
}

#[test]
fn zip_archive_resolves_metadata_names_by_basename_and_stem() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ape_trans.zip");
    write_archive(
        &path,
        "/data/bags/run1/ground_truth.tum",
        "estimate",
        &[
            ("ground_truth.tum", tum(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]])),
            ("estimate.tum", tum(&[[0.0, 0.1, 0.0], [1.1, 0.0, 0.0]])),
        ],
    );

    let archive = ZipArchiveDecoder.decode(&path).unwrap();
    assert_eq!(archive.trajectories.len(), 2);
    assert_eq!(archive.reference().unwrap().end(), Some([1.0, 0.0, 0.0]));
    assert_eq!(archive.estimate().unwrap().end(), Some([1.1, 0.0, 0.0]));

    let (reference, estimate) = archive.into_roles();
    assert_eq!(reference.unwrap().num_poses(), 2);
    assert_eq!(estimate.unwrap().start(), Some([0.0, 0.1, 0.0]));
}

#[test]
fn zip_archive_without_metadata_is_malformed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plain.zip");
    {
        use std::io::Write as _;
        let mut zip = zip::ZipWriter::new(std::fs::File::create(&path).unwrap());
        zip.start_file("estimate.tum", zip::write::SimpleFileOptions::default())
            .unwrap();
        zip.write_all(b"0 0 0 0 0 0 0 1\n").unwrap();
        zip.finish().unwrap();
    }
    let err = ZipArchiveDecoder.decode(&path).unwrap_err();
    assert!(matches!(err, ArtifactError::MissingEntry { ref name } if name == "info.json"));
}

#[test]
fn non_zip_file_is_malformed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.zip");
    write_file(&path, "this is not an archive");
    let err = ZipArchiveDecoder.decode(&path).unwrap_err();
    assert!(matches!(err, ArtifactError::Zip(_)));
}
