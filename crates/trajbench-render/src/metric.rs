use crate::axis::{LinearScale, padded_domain};
use crate::frame::{AxisSpec, Frame, Tick};
use crate::model::{ChartKind, ChartLayout, Drawable, Paint, SeriesLayout};
use crate::stats::{BoxStats, box_stats, gaussian_kde, linspace, scott_bandwidth, sorted_finite};
use crate::svg::path_through;
use crate::text::TextMeasurer;
use crate::{Error, RenderConfig, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use trajbench_core::{AlgorithmCatalog, MetricSummary};

/// Outline color of violins and boxes (seaborn's dark gray).
const EDGE: &str = "#3f3f3f";
/// Violins extend this many bandwidths past the data.
const KDE_CUT: f64 = 2.0;
const KDE_GRID: usize = 100;
const TICK_COUNT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlotStyle {
    Violin,
    Box,
}

impl PlotStyle {
    pub const ALL: [PlotStyle; 2] = [PlotStyle::Violin, PlotStyle::Box];

    /// Output file prefix (`violin_ape_trans.png`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Violin => "violin",
            Self::Box => "box",
        }
    }

    fn chart_kind(self) -> ChartKind {
        match self {
            Self::Violin => ChartKind::Violin,
            Self::Box => ChartKind::Box,
        }
    }
}

impl FromStr for PlotStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "violin" => Ok(Self::Violin),
            "box" => Ok(Self::Box),
            other => Err(Error::invalid_option("style", format!("unknown plot style `{other}`"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricGroup {
    pub label: String,
    pub values: Vec<f64>,
}

/// Everything a distribution chart needs: one group per label, already in display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricChartInput {
    pub kind_id: String,
    pub title: String,
    pub axis_label: String,
    pub groups: Vec<MetricGroup>,
    /// Catalog labels without data; informational.
    pub missing: Vec<String>,
}

impl MetricChartInput {
    /// Groups the catalog-ordered records of `summary` by label. Non-finite values are dropped.
    pub fn from_summary(summary: &MetricSummary, catalog: &AlgorithmCatalog) -> Self {
        let kind = summary.table.kind();
        let mut groups: Vec<MetricGroup> = Vec::new();
        for (label, value) in summary.table.ordered_values(catalog) {
            if !value.is_finite() {
                continue;
            }
            match groups.last_mut() {
                Some(group) if group.label == label => group.values.push(value),
                _ => groups.push(MetricGroup {
                    label: label.to_string(),
                    values: vec![value],
                }),
            }
        }
        Self {
            kind_id: kind.id.clone(),
            title: kind.title.clone(),
            axis_label: kind.axis_label.clone(),
            groups,
            missing: summary.coverage.missing().to_vec(),
        }
    }
}

enum Body {
    Violin { support: Vec<f64>, density: Vec<f64> },
    /// Zero-spread sample: the violin collapses to a line.
    Flat { value: f64 },
    Box,
}

struct GroupShape {
    body: Body,
    stats: BoxStats,
    lo: f64,
    hi: f64,
}

impl GroupShape {
    fn compute(values: &[f64], style: PlotStyle) -> Option<Self> {
        let sorted = sorted_finite(values);
        let stats = box_stats(&sorted)?;
        let (min, max) = (*sorted.first()?, *sorted.last()?);

        let (body, lo, hi) = match style {
            PlotStyle::Box => (Body::Box, min, max),
            PlotStyle::Violin => match scott_bandwidth(&sorted) {
                Some(bw) => {
                    let (lo, hi) = (min - KDE_CUT * bw, max + KDE_CUT * bw);
                    let support = linspace(lo, hi, KDE_GRID);
                    let density = gaussian_kde(&sorted, bw, &support);
                    (Body::Violin { support, density }, lo, hi)
                }
                None => (Body::Flat { value: min }, min, max),
            },
        };
        Some(Self { body, stats, lo, hi })
    }

    fn draw(&self, cx: f64, half_width: f64, y: &LinearScale, color: &str) -> Vec<Drawable> {
        let mut out = Vec::new();
        match &self.body {
            Body::Violin { support, density } => {
                let peak = density.iter().copied().fold(0.0, f64::max);
                let scale = if peak > 0.0 { half_width / peak } else { 0.0 };
                let right = support
                    .iter()
                    .zip(density)
                    .map(|(v, d)| (cx + d * scale, y.map(*v)));
                let left = support
                    .iter()
                    .zip(density)
                    .rev()
                    .map(|(v, d)| (cx - d * scale, y.map(*v)));
                out.push(Drawable::Path {
                    d: path_through(right.chain(left), true),
                    paint: Paint::fill(color).with_stroke(EDGE, 1.0),
                });
                self.inner_box(cx, y, &mut out);
            }
            Body::Flat { value } => {
                out.push(Drawable::Line {
                    x1: cx - half_width,
                    y1: y.map(*value),
                    x2: cx + half_width,
                    y2: y.map(*value),
                    paint: Paint::stroke(color, 1.5),
                });
            }
            Body::Box => self.box_body(cx, half_width, y, color, &mut out),
        }
        out
    }

    /// Whisker line, thick interquartile bar and a white median dot inside a violin.
    fn inner_box(&self, cx: f64, y: &LinearScale, out: &mut Vec<Drawable>) {
        let s = &self.stats;
        out.push(Drawable::Line {
            x1: cx,
            y1: y.map(s.whisker_low),
            x2: cx,
            y2: y.map(s.whisker_high),
            paint: Paint::stroke(EDGE, 1.0),
        });
        out.push(Drawable::Rect {
            x: cx - 1.5,
            y: y.map(s.q3),
            width: 3.0,
            height: (y.map(s.q1) - y.map(s.q3)).abs(),
            paint: Paint::fill(EDGE),
        });
        out.push(Drawable::Circle {
            cx,
            cy: y.map(s.median),
            r: 1.5,
            paint: Paint::fill("white"),
        });
    }

    fn box_body(
        &self,
        cx: f64,
        half_width: f64,
        y: &LinearScale,
        color: &str,
        out: &mut Vec<Drawable>,
    ) {
        let s = &self.stats;
        let cap = half_width / 2.0;
        for (from, to) in [(s.q1, s.whisker_low), (s.q3, s.whisker_high)] {
            out.push(Drawable::Line {
                x1: cx,
                y1: y.map(from),
                x2: cx,
                y2: y.map(to),
                paint: Paint::stroke(EDGE, 1.0),
            });
            out.push(Drawable::Line {
                x1: cx - cap,
                y1: y.map(to),
                x2: cx + cap,
                y2: y.map(to),
                paint: Paint::stroke(EDGE, 1.0),
            });
        }
        out.push(Drawable::Rect {
            x: cx - half_width,
            y: y.map(s.q3),
            width: 2.0 * half_width,
            height: (y.map(s.q1) - y.map(s.q3)).abs(),
            paint: Paint::fill(color).with_stroke(EDGE, 1.0),
        });
        out.push(Drawable::Line {
            x1: cx - half_width,
            y1: y.map(s.median),
            x2: cx + half_width,
            y2: y.map(s.median),
            paint: Paint::stroke(EDGE, 1.0),
        });
        for &v in &s.outliers {
            out.push(Drawable::Circle {
                cx,
                cy: y.map(v),
                r: 2.0,
                paint: Paint::fill(EDGE),
            });
        }
    }
}

/// Lays out a violin or box plot with one group per label, left to right in input order.
///
/// Fails with [`Error::EmptyChart`] when no group has a finite value.
pub fn layout_metric_chart(
    input: &MetricChartInput,
    style: PlotStyle,
    config: &RenderConfig,
    measurer: &dyn TextMeasurer,
) -> Result<ChartLayout> {
    config.validate()?;

    let shaped: Vec<(&str, GroupShape)> = input
        .groups
        .iter()
        .filter_map(|g| GroupShape::compute(&g.values, style).map(|s| (g.label.as_str(), s)))
        .collect();
    if shaped.is_empty() {
        return Err(Error::EmptyChart {
            chart: input.kind_id.clone(),
        });
    }

    let lo = shaped.iter().map(|(_, s)| s.lo).fold(f64::INFINITY, f64::min);
    let hi = shaped.iter().map(|(_, s)| s.hi).fold(f64::NEG_INFINITY, f64::max);
    let domain = padded_domain(lo, hi, 0.05);

    let frame = Frame::new(config, measurer);
    let y_ticks = LinearScale::new(domain, (1.0, 0.0)).ticks(TICK_COUNT);
    let y_tick_labels: Vec<String> = y_ticks.iter().map(|(_, l)| l.clone()).collect();
    let x_tick_labels: Vec<String> = shaped.iter().map(|(l, _)| l.to_string()).collect();
    let y_title = (!input.axis_label.is_empty()).then_some(input.axis_label.as_str());

    let plot = frame.plot_area(&x_tick_labels, &y_tick_labels, false, y_title.is_some());
    let y_scale = LinearScale::new(domain, (plot.max_y, plot.min_y));
    let band = plot.width() / shaped.len() as f64;
    let center = |i: usize| plot.min_x + band * (i as f64 + 0.5);

    let frame_drawables = frame.draw(
        &plot,
        &AxisSpec {
            ticks: shaped
                .iter()
                .enumerate()
                .map(|(i, (label, _))| Tick {
                    pos: center(i),
                    label: label.to_string(),
                })
                .collect(),
            label: None,
            grid: false,
        },
        &AxisSpec {
            ticks: y_ticks
                .into_iter()
                .map(|(v, label)| Tick {
                    pos: y_scale.map(v),
                    label,
                })
                .collect(),
            label: y_title,
            grid: true,
        },
    );

    let series = shaped
        .iter()
        .enumerate()
        .map(|(i, (label, shape))| {
            let color = config.color_for(label, i).to_string();
            SeriesLayout {
                label: label.to_string(),
                drawables: shape.draw(center(i), band * 0.4, &y_scale, &color),
                color,
            }
        })
        .collect();

    let (width, height) = config.canvas_size();
    Ok(ChartLayout {
        kind: style.chart_kind(),
        title: input.title.clone(),
        width,
        height,
        background: config.background.clone(),
        font_family: config.font_family.css().to_string(),
        label_mode: config.label_mode,
        plot_area: plot,
        frame: frame_drawables,
        series,
        legend: Vec::new(),
    })
}
