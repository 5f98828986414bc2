#![forbid(unsafe_code)]

//! Headless chart layout + SVG rendering for aggregated benchmark results.
//!
//! Layout and drawing are split: `layout_*` functions turn ordered data into a [`ChartLayout`]
//! of positioned drawables (serializable, so layouts can be inspected as JSON), and
//! [`svg::render_chart_svg`] turns a layout into SVG text. Neither step reorders or filters the
//! data it is handed.

pub mod axis;
pub mod config;
pub mod metric;
pub mod model;
pub mod stats;
pub mod svg;
pub mod text;
pub mod trajectory;

mod frame;

pub use config::{FontFamily, LabelMode, RenderConfig, Theme};
pub use metric::{MetricChartInput, MetricGroup, PlotStyle, layout_metric_chart};
pub use model::{Bounds, ChartKind, ChartLayout, Drawable, Paint, SeriesLayout, TextData};
pub use svg::{SvgRenderOptions, render_chart_svg};
pub use text::{DeterministicTextMeasurer, TextMeasurer, TextMetrics, TextStyle};
pub use trajectory::{TrajectoryChartInput, TrajectorySeries, layout_trajectory_chart};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("nothing to draw for {chart}")]
    EmptyChart { chart: String },
    #[error("agent `{agent}` has no ground truth trajectory")]
    MissingGroundTruth { agent: String },
    #[error("invalid render option `{name}`: {message}")]
    InvalidOption { name: String, message: String },
    #[error("layout JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn invalid_option(name: &str, message: impl Into<String>) -> Self {
        Self::InvalidOption {
            name: name.to_string(),
            message: message.into(),
        }
    }
}

/// Serializes a layout for inspection (`--layout-json` style debugging, snapshot tests).
pub fn layout_to_json(layout: &ChartLayout) -> Result<String> {
    Ok(serde_json::to_string_pretty(layout)?)
}
