#![cfg(feature = "render")]

use std::io::Write as _;
use std::path::Path;
use trajbench::render::{HeadlessRenderer, PlotStyle, metric_chart_file_name};
use trajbench::{BenchConfig, Pipeline};

fn write_file(path: &Path, contents: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, contents).unwrap();
}

fn write_archive(path: &Path, est: &[[f64; 2]], gt: &[[f64; 2]]) {
    fn tum(points: &[[f64; 2]]) -> String {
        let mut out = String::new();
        for (i, p) in points.iter().enumerate() {
            out.push_str(&format!("{i} {} {} 0 0 0 0 1\n", p[0], p[1]));
        }
        out
    }

    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut zip = zip::ZipWriter::new(std::fs::File::create(path).unwrap());
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Stored);
    let info = serde_json::json!({"ref_name": "/data/gt.tum", "est_name": "/data/est.tum"});
    zip.start_file("info.json", options).unwrap();
    zip.write_all(info.to_string().as_bytes()).unwrap();
    zip.start_file("gt.tum", options).unwrap();
    zip.write_all(tum(gt).as_bytes()).unwrap();
    zip.start_file("est.tum", options).unwrap();
    zip.write_all(tum(est).as_bytes()).unwrap();
    zip.finish().unwrap();
}

fn fixture(root: &Path) {
    write_file(
        &root.join("bag1/benchmark_ape_trans.csv"),
        ",rmse,mean\nglobal,0.45,0.4\nglobal_tm,0.61,0.5\nunknown_algo,9.0,9.0\n",
    );
    write_file(
        &root.join("bag2/benchmark_ape_trans.csv"),
        ",rmse\nglobal,0.52\nglobal_ekf,0.8\n",
    );
    let gt = [[0.0, 0.0], [1.0, 0.0], [2.0, 1.0]];
    write_archive(
        &root.join("bag1/evo/auv0/run_fgo/ape_trans.zip"),
        &[[0.0, 0.1], [1.1, 0.0], [2.0, 1.2]],
        &gt,
    );
    write_archive(
        &root.join("bag1/evo/auv0/run_ekf/ape_trans.zip"),
        &[[0.0, -0.1], [0.9, 0.2], [1.8, 0.9]],
        &gt,
    );
}

#[test]
fn metric_svg_lists_algorithms_in_catalog_order() {
    let dir = tempfile::tempdir().unwrap();
    fixture(dir.path());

    let pipeline = Pipeline::new(&BenchConfig::default()).unwrap();
    let report = pipeline.metrics(dir.path()).unwrap();
    let summary = report.get("ape_trans").unwrap();

    let renderer = HeadlessRenderer::default();
    let svg = renderer
        .metric_svg(summary, pipeline.catalog(), PlotStyle::Violin)
        .unwrap();
    let doc = roxmltree::Document::parse(&svg).unwrap();

    assert_eq!(doc.root_element().attribute("id"), Some("violin_ape_trans"));
    let labels: Vec<&str> = doc
        .descendants()
        .filter(|n| n.has_tag_name("g") && n.attribute("class") == Some("series"))
        .filter_map(|n| n.attribute("data-label"))
        .collect();
    assert_eq!(labels, ["FGO", "TM", "EKF"]);
    assert_eq!(
        metric_chart_file_name(PlotStyle::Violin, summary.table.kind(), "png"),
        "violin_ape_trans.png"
    );
}

#[test]
fn metric_kinds_without_tables_fail_to_render() {
    let dir = tempfile::tempdir().unwrap();
    fixture(dir.path());

    let pipeline = Pipeline::new(&BenchConfig::default()).unwrap();
    let report = pipeline.metrics(dir.path()).unwrap();
    let empty = report.get("rpe_rot").unwrap();
    assert!(!empty.has_data());

    let err = HeadlessRenderer::default()
        .metric_svg(empty, pipeline.catalog(), PlotStyle::Box)
        .unwrap_err();
    assert!(matches!(err, trajbench::render::HeadlessError::Render(_)));
}

#[test]
fn trajectory_svg_draws_estimates_then_ground_truth() {
    let dir = tempfile::tempdir().unwrap();
    fixture(dir.path());

    let pipeline = Pipeline::new(&BenchConfig::default()).unwrap();
    let report = pipeline.trajectories(dir.path()).unwrap();
    let agent = report.renderable().next().unwrap();
    assert_eq!(agent.dir.name, "auv0");

    let svg = HeadlessRenderer::default()
        .trajectory_svg(&agent.summary.set, pipeline.catalog())
        .unwrap();
    let doc = roxmltree::Document::parse(&svg).unwrap();
    assert_eq!(doc.root_element().attribute("id"), Some("auv0_trajectories"));
    let labels: Vec<&str> = doc
        .descendants()
        .filter(|n| n.attribute("class") == Some("series"))
        .filter_map(|n| n.attribute("data-label"))
        .collect();
    assert_eq!(labels, ["FGO", "EKF", "GT"]);
}

#[cfg(feature = "raster")]
#[test]
fn trajectory_chart_rasterizes_at_configured_dpi() {
    use trajbench::render::raster::{OutputFormat, RasterOptions, encode_chart};

    let dir = tempfile::tempdir().unwrap();
    fixture(dir.path());

    let pipeline = Pipeline::new(&BenchConfig::default()).unwrap();
    let report = pipeline.trajectories(dir.path()).unwrap();
    let agent = report.renderable().next().unwrap();

    let renderer = HeadlessRenderer::default();
    let layout = renderer
        .trajectory_layout(&agent.summary.set, pipeline.catalog())
        .unwrap();
    let raster = RasterOptions::from_config(&renderer.config);
    let png = encode_chart(&layout, &renderer.svg, &raster, OutputFormat::Png).unwrap();
    assert!(png.starts_with(b"\x89PNG\r\n\x1a\n"));

    // 3.5in x 3.0in at 300 dpi.
    let width = u32::from_be_bytes(png[16..20].try_into().unwrap());
    let height = u32::from_be_bytes(png[20..24].try_into().unwrap());
    assert_eq!((width, height), (1050, 900));
}
