mod config;
mod decode;
mod scan;

use std::io::Write as _;
use std::path::Path;

pub(crate) fn write_file(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, contents).unwrap();
}

/// TUM text for a trajectory through `points` (timestamps 0, 1, 2, ...).
pub(crate) fn tum(points: &[[f64; 3]]) -> String {
    let mut out = String::from("# timestamp x y z qx qy qz qw\n");
    for (i, p) in points.iter().enumerate() {
        out.push_str(&format!("{i} {} {} {} 0 0 0 1\n", p[0], p[1], p[2]));
    }
    out
}

/// Writes an evo-style result archive with `info.json` and the given trajectory entries.
pub(crate) fn write_archive(
    path: &Path,
    ref_name: &str,
    est_name: &str,
    entries: &[(&str, String)],
) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    let file = std::fs::File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Stored);

    zip.start_file("info.json", options).unwrap();
    let info = serde_json::json!({
        "title": "APE w.r.t. translation part (m)",
        "ref_name": ref_name,
        "est_name": est_name,
        "label": "APE (m)",
    });
    zip.write_all(info.to_string().as_bytes()).unwrap();

    zip.start_file("stats.json", options).unwrap();
    zip.write_all(br#"{"rmse": 0.5}"#).unwrap();

    for (name, contents) in entries {
        zip.start_file(*name, options).unwrap();
        zip.write_all(contents.as_bytes()).unwrap();
    }
    zip.finish().unwrap();
}
