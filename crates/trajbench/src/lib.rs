#![forbid(unsafe_code)]

//! `trajbench` aggregates trajectory-estimation benchmark results and plots them.
//!
//! The headless pipeline (discovery, identifier normalization, aggregation) is re-exported from
//! `trajbench-core`.
//!
//! # Features
//!
//! - `render`: chart layout + SVG rendering (`trajbench::render`)
//! - `raster`: PNG/JPG/PDF output via pure-Rust SVG rasterization/conversion

pub use trajbench_core::*;

#[cfg(feature = "render")]
pub mod render {
    pub use trajbench_render::model::ChartLayout;
    pub use trajbench_render::text::{DeterministicTextMeasurer, TextMeasurer};
    pub use trajbench_render::{
        FontFamily, LabelMode, MetricChartInput, PlotStyle, RenderConfig, SvgRenderOptions, Theme,
        TrajectoryChartInput, layout_metric_chart, layout_trajectory_chart, render_chart_svg,
    };

    #[cfg(feature = "raster")]
    pub mod raster;

    use std::sync::Arc;
    use trajbench_core::{AlgorithmCatalog, MetricKind, MetricSummary, TrajectorySet};

    #[derive(Debug, thiserror::Error)]
    pub enum HeadlessError {
        #[error(transparent)]
        Pipeline(#[from] trajbench_core::Error),
        #[error(transparent)]
        Render(#[from] trajbench_render::Error),
    }

    pub type Result<T> = std::result::Result<T, HeadlessError>;

    /// Converts an arbitrary string into a conservative SVG `id` token.
    ///
    /// Agent and metric names end up in root ids; when several charts are inlined into one
    /// document their ids must not collide or break CSS selectors.
    pub fn sanitize_svg_id(raw: &str) -> String {
        let raw = raw.trim();
        if raw.is_empty() {
            return "t-untitled".to_string();
        }

        let mut out = String::with_capacity(raw.len() + 4);
        for ch in raw.chars() {
            let ok = ch.is_ascii_alphanumeric() || ch == '-' || ch == '_';
            out.push(if ok { ch } else { '-' });
        }

        let starts_ok = out.chars().next().is_some_and(|c| c.is_ascii_alphabetic());
        if !starts_ok {
            out.insert_str(0, "t-");
        }

        while out.contains("--") {
            out = out.replace("--", "-");
        }
        let out = out.trim_matches('-');
        if out.is_empty() || out == "t" {
            return "t-untitled".to_string();
        }
        out.to_string()
    }

    /// `<style>_<kind id>.<ext>`, e.g. `violin_ape_trans.png`.
    pub fn metric_chart_file_name(style: PlotStyle, kind: &MetricKind, ext: &str) -> String {
        format!("{}_{}.{ext}", style.as_str(), kind.id)
    }

    /// `<agent>_trajectories.<ext>`.
    pub fn trajectory_chart_file_name(agent: &str, ext: &str) -> String {
        format!("{agent}_trajectories.{ext}")
    }

    /// Bundles styling, text measurement and SVG options so call sites pass one value.
    #[derive(Clone)]
    pub struct HeadlessRenderer {
        pub config: RenderConfig,
        pub measurer: Arc<dyn TextMeasurer + Send + Sync>,
        pub svg: SvgRenderOptions,
    }

    impl Default for HeadlessRenderer {
        fn default() -> Self {
            Self::new(RenderConfig::default())
        }
    }

    impl HeadlessRenderer {
        pub fn new(config: RenderConfig) -> Self {
            Self {
                config,
                measurer: Arc::new(DeterministicTextMeasurer::default()),
                svg: SvgRenderOptions::default(),
            }
        }

        pub fn metric_layout(
            &self,
            summary: &MetricSummary,
            catalog: &AlgorithmCatalog,
            style: PlotStyle,
        ) -> Result<ChartLayout> {
            let input = MetricChartInput::from_summary(summary, catalog);
            Ok(layout_metric_chart(
                &input,
                style,
                &self.config,
                self.measurer.as_ref(),
            )?)
        }

        pub fn trajectory_layout(
            &self,
            set: &TrajectorySet,
            catalog: &AlgorithmCatalog,
        ) -> Result<ChartLayout> {
            let input = TrajectoryChartInput::from_set(set, catalog)?;
            Ok(layout_trajectory_chart(
                &input,
                &self.config,
                self.measurer.as_ref(),
            )?)
        }

        /// Renders with a root id derived from `id_hint` unless one is configured.
        pub fn svg(&self, layout: &ChartLayout, id_hint: &str) -> String {
            let mut options = self.svg.clone();
            if options.diagram_id.is_none() {
                options.diagram_id = Some(sanitize_svg_id(id_hint));
            }
            render_chart_svg(layout, &options)
        }

        pub fn metric_svg(
            &self,
            summary: &MetricSummary,
            catalog: &AlgorithmCatalog,
            style: PlotStyle,
        ) -> Result<String> {
            let layout = self.metric_layout(summary, catalog, style)?;
            let id = format!("{}_{}", style.as_str(), summary.table.kind().id);
            Ok(self.svg(&layout, &id))
        }

        pub fn trajectory_svg(
            &self,
            set: &TrajectorySet,
            catalog: &AlgorithmCatalog,
        ) -> Result<String> {
            let layout = self.trajectory_layout(set, catalog)?;
            Ok(self.svg(&layout, &format!("{}_trajectories", set.agent())))
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn svg_ids_are_sanitized() {
            assert_eq!(sanitize_svg_id("violin_ape_trans"), "violin_ape_trans");
            assert_eq!(sanitize_svg_id("auv 0/traj"), "auv-0-traj");
            assert_eq!(sanitize_svg_id("0_trajectories"), "t-0_trajectories");
            assert_eq!(sanitize_svg_id("  "), "t-untitled");
            assert_eq!(sanitize_svg_id("$$"), "t-untitled");
        }

        #[test]
        fn output_names_follow_the_plot_scripts() {
            let kind = MetricKind::defaults().remove(1);
            assert_eq!(
                metric_chart_file_name(PlotStyle::Violin, &kind, "png"),
                "violin_ape_rot.png"
            );
            assert_eq!(
                metric_chart_file_name(PlotStyle::Box, &kind, "svg"),
                "box_ape_rot.svg"
            );
            assert_eq!(
                trajectory_chart_file_name("auv0", "pdf"),
                "auv0_trajectories.pdf"
            );
        }
    }
}
