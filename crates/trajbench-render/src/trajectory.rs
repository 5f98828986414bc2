use crate::axis::{LinearScale, padded_domain};
use crate::frame::{AxisSpec, Frame, Tick};
use crate::model::{
    Bounds, ChartKind, ChartLayout, Drawable, Paint, SeriesLayout, TextAnchor, TextBaseline,
};
use crate::svg::path_through;
use crate::text::TextMeasurer;
use crate::{Error, RenderConfig, Result};
use euclid::default::{Box2D, Point2D, Transform2D};
use serde::Serialize;
use trajbench_core::{AlgorithmCatalog, Trajectory, TrajectorySet};

pub const GROUND_TRUTH_LABEL: &str = "GT";
const X_LABEL: &str = "$x$ (m)";
const Y_LABEL: &str = "$y$ (m)";
const GT_DASH: &str = "3.7 1.6";
const LINE_WIDTH: f64 = 1.0;
const MARKER_RADIUS: f64 = 2.2;
const TICK_COUNT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrajectorySeries {
    pub label: String,
    /// XY positions in metres.
    pub points: Vec<[f64; 2]>,
}

impl TrajectorySeries {
    pub fn from_trajectory(label: impl Into<String>, trajectory: &Trajectory) -> Self {
        Self {
            label: label.into(),
            points: trajectory.positions().map(|[x, y, _]| [x, y]).collect(),
        }
    }
}

/// An agent's estimates (in display order) plus its ground truth, projected onto XY.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrajectoryChartInput {
    pub agent: String,
    pub ground_truth: TrajectorySeries,
    pub estimates: Vec<TrajectorySeries>,
}

impl TrajectoryChartInput {
    /// Fails with [`Error::MissingGroundTruth`] for an incomplete set.
    pub fn from_set(set: &TrajectorySet, catalog: &AlgorithmCatalog) -> Result<Self> {
        let gt = set.ground_truth().ok_or_else(|| Error::MissingGroundTruth {
            agent: set.agent().to_string(),
        })?;
        Ok(Self {
            agent: set.agent().to_string(),
            ground_truth: TrajectorySeries::from_trajectory(GROUND_TRUTH_LABEL, gt),
            estimates: set
                .ordered_estimates(catalog)
                .into_iter()
                .map(|(label, t)| TrajectorySeries::from_trajectory(label, t))
                .collect(),
        })
    }

    fn all_points(&self) -> impl Iterator<Item = Point2D<f64>> + '_ {
        self.estimates
            .iter()
            .chain(std::iter::once(&self.ground_truth))
            .flat_map(|s| s.points.iter())
            .filter(|[x, y]| x.is_finite() && y.is_finite())
            .map(|&[x, y]| Point2D::new(x, y))
    }
}

/// Visible data window with equal units per canvas point on both axes, centred on the data.
fn equal_aspect_window(data: &Box2D<f64>, plot: &Bounds) -> (f64, (f64, f64), (f64, f64)) {
    let (x0, x1) = padded_domain(data.min.x, data.max.x, 0.05);
    let (y0, y1) = padded_domain(data.min.y, data.max.y, 0.05);
    let units_per_point = ((x1 - x0) / plot.width()).max((y1 - y0) / plot.height());
    let half_w = units_per_point * plot.width() / 2.0;
    let half_h = units_per_point * plot.height() / 2.0;
    let (cx, cy) = ((x0 + x1) / 2.0, (y0 + y1) / 2.0);
    (
        units_per_point,
        (cx - half_w, cx + half_w),
        (cy - half_h, cy + half_h),
    )
}

/// XY trajectory plot: estimates as solid lines, ground truth dashed and drawn last, start
/// (circle) and end (cross) markers per series, and a legend in the upper-right corner.
pub fn layout_trajectory_chart(
    input: &TrajectoryChartInput,
    config: &RenderConfig,
    measurer: &dyn TextMeasurer,
) -> Result<ChartLayout> {
    config.validate()?;

    let data = Box2D::from_points(input.all_points());
    if input.all_points().next().is_none() {
        return Err(Error::EmptyChart {
            chart: format!("{} trajectories", input.agent),
        });
    }

    let frame = Frame::new(config, measurer);

    // First pass: tick labels of the padded data window, for margin sizing only.
    let (px0, px1) = padded_domain(data.min.x, data.max.x, 0.05);
    let (py0, py1) = padded_domain(data.min.y, data.max.y, 0.05);
    let rough_labels = |domain| -> Vec<String> {
        LinearScale::new(domain, (0.0, 1.0))
            .ticks(TICK_COUNT)
            .into_iter()
            .map(|(_, l)| l)
            .collect()
    };
    let plot = frame.plot_area(&rough_labels((px0, px1)), &rough_labels((py0, py1)), true, true);

    let (units_per_point, x_domain, y_domain) = equal_aspect_window(&data, &plot);
    let s = 1.0 / units_per_point;
    let to_canvas: Transform2D<f64> = Transform2D::new(
        s,
        0.0,
        0.0,
        -s,
        plot.min_x - x_domain.0 * s,
        plot.max_y + y_domain.0 * s,
    );

    let x_scale = LinearScale::new(x_domain, (plot.min_x, plot.max_x));
    let y_scale = LinearScale::new(y_domain, (plot.max_y, plot.min_y));
    let ticks = |scale: &LinearScale| -> Vec<Tick> {
        scale
            .ticks(TICK_COUNT)
            .into_iter()
            .map(|(v, label)| Tick {
                pos: scale.map(v),
                label,
            })
            .collect()
    };
    let frame_drawables = frame.draw(
        &plot,
        &AxisSpec {
            ticks: ticks(&x_scale),
            label: Some(X_LABEL),
            grid: true,
        },
        &AxisSpec {
            ticks: ticks(&y_scale),
            label: Some(Y_LABEL),
            grid: true,
        },
    );

    let mut series = Vec::with_capacity(input.estimates.len() + 1);
    for (i, est) in input.estimates.iter().enumerate() {
        let color = config.color_for(&est.label, i).to_string();
        series.push(SeriesLayout {
            label: est.label.clone(),
            drawables: series_drawables(est, &to_canvas, &color, None),
            color,
        });
    }
    let gt_color = config.ground_truth_color.clone();
    series.push(SeriesLayout {
        label: GROUND_TRUTH_LABEL.to_string(),
        drawables: series_drawables(&input.ground_truth, &to_canvas, &gt_color, Some(GT_DASH)),
        color: gt_color,
    });

    let legend = legend(&frame, config, &plot, &series);

    let (width, height) = config.canvas_size();
    Ok(ChartLayout {
        kind: ChartKind::Trajectory,
        title: format!("{} trajectories", input.agent),
        width,
        height,
        background: config.background.clone(),
        font_family: config.font_family.css().to_string(),
        label_mode: config.label_mode,
        plot_area: plot,
        frame: frame_drawables,
        series,
        legend,
    })
}

fn series_drawables(
    series: &TrajectorySeries,
    to_canvas: &Transform2D<f64>,
    color: &str,
    dash: Option<&str>,
) -> Vec<Drawable> {
    let points: Vec<(f64, f64)> = series
        .points
        .iter()
        .filter(|[x, y]| x.is_finite() && y.is_finite())
        .map(|&[x, y]| {
            let p = to_canvas.transform_point(Point2D::new(x, y));
            (p.x, p.y)
        })
        .collect();

    let mut out = Vec::new();
    if points.len() >= 2 {
        let mut paint = Paint::stroke(color, LINE_WIDTH);
        if let Some(dash) = dash {
            paint = paint.dashed(dash);
        }
        out.push(Drawable::Path {
            d: path_through(points.iter().copied(), false),
            paint,
        });
    }
    if let (Some(&(sx, sy)), Some(&(ex, ey))) = (points.first(), points.last()) {
        out.push(Drawable::Circle {
            cx: sx,
            cy: sy,
            r: MARKER_RADIUS,
            paint: Paint::fill(color),
        });
        let r = MARKER_RADIUS;
        out.push(Drawable::Path {
            d: format!(
                "{} {}",
                path_through([(ex - r, ey - r), (ex + r, ey + r)], false),
                path_through([(ex - r, ey + r), (ex + r, ey - r)], false)
            ),
            paint: Paint::stroke(color, 1.0),
        });
    }
    out
}

fn legend(
    frame: &Frame<'_>,
    config: &RenderConfig,
    plot: &Bounds,
    series: &[SeriesLayout],
) -> Vec<Drawable> {
    const PAD: f64 = 4.0;
    const SAMPLE: f64 = 14.0;
    const GAP: f64 = 4.0;

    let fs = config.tick_font_size();
    let row = frame.measure_line(fs);
    let text_w = series
        .iter()
        .map(|s| frame.measure_width(&s.label, fs))
        .fold(0.0, f64::max);
    let width = PAD + SAMPLE + GAP + text_w + PAD;
    let height = PAD * 2.0 + row * series.len() as f64;
    let x = plot.max_x - PAD - width;
    let y = plot.min_y + PAD;

    let mut out = vec![Drawable::Rect {
        x,
        y,
        width,
        height,
        paint: Paint::fill("white").with_opacity(0.8).with_stroke("#cccccc", 0.8),
    }];
    for (i, s) in series.iter().enumerate() {
        let cy = y + PAD + row * (i as f64 + 0.5);
        let mut paint = Paint::stroke(&s.color, LINE_WIDTH);
        if s.label == GROUND_TRUTH_LABEL {
            paint = paint.dashed(GT_DASH);
        }
        out.push(Drawable::Line {
            x1: x + PAD,
            y1: cy,
            x2: x + PAD + SAMPLE,
            y2: cy,
            paint,
        });
        out.push(frame.text(
            x + PAD + SAMPLE + GAP,
            cy,
            &s.label,
            fs,
            TextAnchor::Start,
            TextBaseline::Central,
        ));
    }
    out
}
