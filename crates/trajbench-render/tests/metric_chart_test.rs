use std::path::{Path, PathBuf};
use trajbench_core::{
    AlgorithmCatalog, AliasTable, ArtifactResult, MetricAggregator, MetricKind, TableDecoder,
    TableRow,
};
use trajbench_render::model::Drawable;
use trajbench_render::{
    ChartKind, DeterministicTextMeasurer, MetricChartInput, MetricGroup, PlotStyle, RenderConfig,
    layout_metric_chart,
};

fn group(label: &str, values: &[f64]) -> MetricGroup {
    MetricGroup {
        label: label.to_string(),
        values: values.to_vec(),
    }
}

fn input(groups: Vec<MetricGroup>) -> MetricChartInput {
    MetricChartInput {
        kind_id: "ape_trans".to_string(),
        title: "APE Translation".to_string(),
        axis_label: "APE Translation RMSE (m)".to_string(),
        groups,
        missing: Vec::new(),
    }
}

/// Rows keyed by file name, so a test can feed several "tables" without touching disk.
struct InMemoryTables;

impl TableDecoder for InMemoryTables {
    fn decode(&self, path: &Path) -> ArtifactResult<Vec<TableRow>> {
        let rows: &[(&str, f64)] = match path.to_str() {
            Some("a") => &[("dvl", 2.0), ("global", 0.5), ("global_ekf", 0.9)],
            Some("b") => &[("global", 0.7), ("global_ekf", f64::NAN), ("unknown_algo", 3.0)],
            _ => &[],
        };
        Ok(rows
            .iter()
            .map(|(key, value)| TableRow {
                key: key.to_string(),
                value: *value,
            })
            .collect())
    }
}

#[test]
fn chart_input_groups_summary_records_in_catalog_order() {
    let catalog = AlgorithmCatalog::default();
    let aliases = AliasTable::default_tables();
    let kind = MetricKind::defaults().remove(0);
    let summary = MetricAggregator::new(&catalog, &aliases, &InMemoryTables)
        .aggregate_kind(&kind, [PathBuf::from("a"), PathBuf::from("b")]);

    let input = MetricChartInput::from_summary(&summary, &catalog);
    assert_eq!(input.kind_id, "ape_trans");
    assert_eq!(input.axis_label, "APE Translation RMSE (m)");
    assert_eq!(
        input.groups,
        vec![
            group("FGO", &[0.5, 0.7]),
            group("EKF", &[0.9]),
            group("DVL", &[2.0]),
        ]
    );
    assert_eq!(input.missing, vec!["TM", "UKF", "IEKF"]);
}

#[test]
fn violin_layout_has_one_series_per_group_in_order() {
    let input = input(vec![
        group("FGO", &[0.4, 0.5, 0.45, 0.62]),
        group("TM", &[0.8, 0.7]),
        group("DVL", &[2.1]),
    ]);
    let layout = layout_metric_chart(
        &input,
        PlotStyle::Violin,
        &RenderConfig::default(),
        &DeterministicTextMeasurer::default(),
    )
    .unwrap();

    assert_eq!(layout.kind, ChartKind::Violin);
    assert_eq!(layout.series_labels().collect::<Vec<_>>(), vec!["FGO", "TM", "DVL"]);
    assert_eq!(layout.series("FGO").unwrap().color, "#4C72B0");
    assert_eq!(layout.series("DVL").unwrap().color, "#FFC107");
    assert_eq!((layout.width, layout.height), (252.0, 216.0));

    // A single value has no spread: drawn as a flat line, not a density body.
    let dvl = &layout.series("DVL").unwrap().drawables;
    assert!(matches!(dvl.as_slice(), [Drawable::Line { .. }]));
    let fgo = &layout.series("FGO").unwrap().drawables;
    assert!(matches!(fgo.first(), Some(Drawable::Path { .. })));
    assert!(fgo.iter().any(|d| matches!(d, Drawable::Circle { .. })));

    // Groups are laid out left to right inside the plot area.
    let centers: Vec<f64> = layout
        .series
        .iter()
        .map(|s| match s.drawables.last() {
            Some(Drawable::Circle { cx, .. }) => *cx,
            Some(Drawable::Line { x1, x2, .. }) => (x1 + x2) / 2.0,
            other => panic!("unexpected drawable {other:?}"),
        })
        .collect();
    assert!(centers.windows(2).all(|w| w[0] < w[1]));
    assert!(centers.iter().all(|&x| layout.plot_area.contains(x, layout.plot_area.min_y)));
}

#[test]
fn box_layout_marks_outliers() {
    let input = input(vec![group("EKF", &[1.0, 2.0, 3.0, 4.0, 5.0, 100.0])]);
    let layout = layout_metric_chart(
        &input,
        PlotStyle::Box,
        &RenderConfig::default(),
        &DeterministicTextMeasurer::default(),
    )
    .unwrap();

    assert_eq!(layout.kind, ChartKind::Box);
    let drawables = &layout.series[0].drawables;
    let circles = drawables
        .iter()
        .filter(|d| matches!(d, Drawable::Circle { .. }))
        .count();
    let rects = drawables
        .iter()
        .filter(|d| matches!(d, Drawable::Rect { .. }))
        .count();
    assert_eq!(circles, 1);
    assert_eq!(rects, 1);
}

#[test]
fn axis_label_and_group_names_are_drawn() {
    let input = input(vec![group("FGO", &[0.1, 0.2]), group("UKF", &[0.3, 0.35])]);
    let layout = layout_metric_chart(
        &input,
        PlotStyle::Box,
        &RenderConfig::default(),
        &DeterministicTextMeasurer::default(),
    )
    .unwrap();

    let texts: Vec<&str> = layout.texts().map(|t| t.text.as_str()).collect();
    assert!(texts.contains(&"FGO"));
    assert!(texts.contains(&"UKF"));
    assert!(texts.contains(&"APE Translation RMSE (m)"));
    let y_label = layout
        .texts()
        .find(|t| t.text == "APE Translation RMSE (m)")
        .unwrap();
    assert_eq!(y_label.rotation, -90.0);
}

#[test]
fn empty_input_is_rejected() {
    let err = layout_metric_chart(
        &input(vec![group("FGO", &[])]),
        PlotStyle::Violin,
        &RenderConfig::default(),
        &DeterministicTextMeasurer::default(),
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "nothing to draw for ape_trans");
}

#[test]
fn invalid_config_is_rejected() {
    let config = RenderConfig {
        dpi: 0.0,
        ..RenderConfig::default()
    };
    let err = layout_metric_chart(
        &input(vec![group("FGO", &[1.0])]),
        PlotStyle::Box,
        &config,
        &DeterministicTextMeasurer::default(),
    )
    .unwrap_err();
    assert!(err.to_string().contains("dpi"));
}

#[test]
fn layout_is_deterministic() {
    let input = input(vec![group("FGO", &[0.4, 0.5, 0.45]), group("TM", &[0.8, 0.7])]);
    let a = layout_metric_chart(
        &input,
        PlotStyle::Violin,
        &RenderConfig::default(),
        &DeterministicTextMeasurer::default(),
    )
    .unwrap();
    let b = layout_metric_chart(
        &input,
        PlotStyle::Violin,
        &RenderConfig::default(),
        &DeterministicTextMeasurer::default(),
    )
    .unwrap();
    assert_eq!(
        trajbench_render::layout_to_json(&a).unwrap(),
        trajbench_render::layout_to_json(&b).unwrap()
    );
}
