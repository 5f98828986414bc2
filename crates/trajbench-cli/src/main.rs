use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use trajbench::render::raster::{OutputFormat, RasterError, RasterOptions, encode_chart};
use trajbench::render::{
    ChartLayout, HeadlessError, HeadlessRenderer, PlotStyle, SvgRenderOptions,
    metric_chart_file_name, sanitize_svg_id, trajectory_chart_file_name,
};
use trajbench::{
    BenchConfig, CoverageReport, MetricReport, Pipeline, ScanDiagnostics, TrajectoryReport,
};
use trajbench_render::config::parse_figure_size;
use trajbench_render::{FontFamily, LabelMode, RenderConfig, Theme};

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Write { path: PathBuf, source: std::io::Error },
    Pipeline(trajbench::Error),
    Render(HeadlessError),
    Raster(RasterError),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Write { path, source } => {
                write!(f, "failed to write {}: {source}", path.display())
            }
            CliError::Pipeline(err) => write!(f, "{err}"),
            CliError::Render(err) => write!(f, "{err}"),
            CliError::Raster(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<trajbench::Error> for CliError {
    fn from(value: trajbench::Error) -> Self {
        Self::Pipeline(value)
    }
}

impl From<HeadlessError> for CliError {
    fn from(value: HeadlessError) -> Self {
        Self::Render(value)
    }
}

impl From<trajbench_render::Error> for CliError {
    fn from(value: trajbench_render::Error) -> Self {
        Self::Render(value.into())
    }
}

impl From<RasterError> for CliError {
    fn from(value: RasterError) -> Self {
        Self::Raster(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Metrics,
    Trajectories,
    All,
    Summary,
}

#[derive(Debug, Clone, Copy, Default)]
enum StyleSelection {
    Violin,
    Box,
    #[default]
    Both,
}

impl StyleSelection {
    fn styles(self) -> &'static [PlotStyle] {
        match self {
            Self::Violin => &[PlotStyle::Violin],
            Self::Box => &[PlotStyle::Box],
            Self::Both => &PlotStyle::ALL,
        }
    }
}

impl FromStr for StyleSelection {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "violin" => Ok(Self::Violin),
            "box" => Ok(Self::Box),
            "both" => Ok(Self::Both),
            _ => Err(()),
        }
    }
}

/// Flag values that override the `render` section of the config file.
#[derive(Debug, Default)]
struct RenderOverrides {
    figure_size: Option<[f64; 2]>,
    dpi: Option<f64>,
    font_family: Option<FontFamily>,
    theme: Option<Theme>,
    label_mode: Option<LabelMode>,
    background: Option<String>,
}

impl RenderOverrides {
    fn apply(&self, config: &mut RenderConfig) {
        if let Some(size) = self.figure_size {
            config.figure_size = size;
        }
        if let Some(dpi) = self.dpi {
            config.dpi = dpi;
        }
        if let Some(font_family) = self.font_family {
            config.font_family = font_family;
        }
        if let Some(theme) = self.theme {
            config.theme = theme;
        }
        if let Some(label_mode) = self.label_mode {
            config.label_mode = label_mode;
        }
        if let Some(background) = &self.background {
            config.background = background.clone();
        }
    }
}

#[derive(Debug)]
struct Args {
    command: Option<Command>,
    root: Option<PathBuf>,
    config: Option<PathBuf>,
    format: OutputFormat,
    style: StyleSelection,
    out: Option<PathBuf>,
    scale: Option<f32>,
    pretty: bool,
    quiet: bool,
    render: RenderOverrides,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            command: None,
            root: None,
            config: None,
            format: OutputFormat::Png,
            style: StyleSelection::default(),
            out: None,
            scale: None,
            pretty: false,
            quiet: false,
            render: RenderOverrides::default(),
        }
    }
}

/// Config file layout: pipeline settings at the top level, styling under `render`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    #[serde(flatten)]
    bench: BenchConfig,
    render: RenderConfig,
}

fn usage() -> &'static str {
    "trajbench\n\
\n\
USAGE:\n\
  trajbench metrics      [options] <root>\n\
  trajbench trajectories [options] <root>\n\
  trajbench all          [options] <root>\n\
  trajbench summary      [--pretty] [--config <path>] <root>\n\
\n\
OPTIONS:\n\
  --config <path>         YAML or JSON configuration file\n\
  --format svg|png|jpg|pdf\n\
  --style violin|box|both metric chart style (default both)\n\
  --out <dir>             output directory\n\
  --scale <n>             raster pixels per point (default dpi/72)\n\
  --background <css-color>\n\
  --figsize <w>x<h>       figure size in inches (default 3.5x3.0)\n\
  --dpi <n>\n\
  --font-family serif|sans-serif|monospace\n\
  --theme whitegrid|darkgrid|white|ticks\n\
  --label-mode tex|plain\n\
  --quiet                 only log warnings (RUST_LOG overrides)\n\
\n\
NOTES:\n\
  - Metric charts are written as <style>_<metric>.<ext> to the root (or --out).\n\
  - Trajectory charts are written as <agent>_trajectories.<ext> to the agent's bag directory\n\
    (or <out>/<bag> with --out).\n\
  - Exit codes: 2 usage error, 3 root directory not found, 1 any other error.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        let mut value = || it.next().ok_or(CliError::Usage(usage()));
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "metrics" if args.command.is_none() => args.command = Some(Command::Metrics),
            "trajectories" if args.command.is_none() => {
                args.command = Some(Command::Trajectories)
            }
            "all" if args.command.is_none() => args.command = Some(Command::All),
            "summary" if args.command.is_none() => args.command = Some(Command::Summary),
            "--pretty" => args.pretty = true,
            "--quiet" | "-q" => args.quiet = true,
            "--config" => args.config = Some(PathBuf::from(value()?)),
            "--out" => args.out = Some(PathBuf::from(value()?)),
            "--format" => {
                args.format = OutputFormat::parse(value()?).ok_or(CliError::Usage(usage()))?;
            }
            "--style" => {
                args.style = value()?
                    .parse::<StyleSelection>()
                    .map_err(|_| CliError::Usage(usage()))?;
            }
            "--scale" => {
                let scale = value()?
                    .parse::<f32>()
                    .map_err(|_| CliError::Usage(usage()))?;
                if !(scale.is_finite() && scale > 0.0) {
                    return Err(CliError::Usage(usage()));
                }
                args.scale = Some(scale);
            }
            "--background" => {
                let bg = value()?;
                if !bg.trim().is_empty() {
                    args.render.background = Some(bg.trim().to_string());
                }
            }
            "--figsize" => {
                let size = parse_figure_size(value()?).map_err(|_| CliError::Usage(usage()))?;
                args.render.figure_size = Some(size);
            }
            "--dpi" => {
                let dpi = value()?
                    .parse::<f64>()
                    .map_err(|_| CliError::Usage(usage()))?;
                args.render.dpi = Some(dpi);
            }
            "--font-family" => {
                let family = value()?
                    .parse::<FontFamily>()
                    .map_err(|_| CliError::Usage(usage()))?;
                args.render.font_family = Some(family);
            }
            "--theme" => {
                let theme = value()?
                    .parse::<Theme>()
                    .map_err(|_| CliError::Usage(usage()))?;
                args.render.theme = Some(theme);
            }
            "--label-mode" => {
                let mode = value()?
                    .parse::<LabelMode>()
                    .map_err(|_| CliError::Usage(usage()))?;
                args.render.label_mode = Some(mode);
            }
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            path => {
                if args.root.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.root = Some(PathBuf::from(path));
            }
        }
    }

    if args.command.is_none() || args.root.is_none() {
        return Err(CliError::Usage(usage()));
    }
    Ok(args)
}

fn init_tracing(quiet: bool) {
    let default = if quiet { "warn" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn load_config(path: Option<&Path>) -> Result<FileConfig, CliError> {
    match path {
        Some(path) => Ok(trajbench::load_config_file(path)?),
        None => Ok(FileConfig::default()),
    }
}

/// Output settings shared by every chart of one invocation.
struct ChartWriter {
    renderer: HeadlessRenderer,
    raster: RasterOptions,
    format: OutputFormat,
}

impl ChartWriter {
    fn new(render: RenderConfig, args: &Args) -> Result<Self, CliError> {
        render.validate()?;
        let mut raster = RasterOptions::from_config(&render);
        if let Some(scale) = args.scale {
            raster.scale = scale;
        }
        Ok(Self {
            renderer: HeadlessRenderer::new(render),
            raster,
            format: args.format,
        })
    }

    fn write(
        &self,
        layout: &ChartLayout,
        id: &str,
        dir: &Path,
        name: &str,
    ) -> Result<(), CliError> {
        let svg_options = SvgRenderOptions {
            diagram_id: Some(sanitize_svg_id(id)),
        };
        let bytes = encode_chart(layout, &svg_options, &self.raster, self.format)?;

        let path = dir.join(name);
        std::fs::create_dir_all(dir)
            .and_then(|()| std::fs::write(&path, bytes))
            .map_err(|source| CliError::Write {
                path: path.clone(),
                source,
            })?;
        tracing::info!(path = %path.display(), "wrote chart");
        Ok(())
    }
}

fn plot_metrics(
    pipeline: &Pipeline,
    report: &MetricReport,
    writer: &ChartWriter,
    styles: &[PlotStyle],
    out_dir: &Path,
) -> Result<usize, CliError> {
    let ext = writer.format.extension();
    let mut written = 0;
    for summary in report.with_data() {
        let kind = summary.table.kind();
        for &style in styles {
            let layout = match writer.renderer.metric_layout(summary, pipeline.catalog(), style) {
                Ok(layout) => layout,
                Err(err) => {
                    tracing::warn!(
                        metric = %kind.id,
                        style = style.as_str(),
                        error = %err,
                        "skipping chart"
                    );
                    continue;
                }
            };
            let name = metric_chart_file_name(style, kind, ext);
            let id = format!("{}_{}", style.as_str(), kind.id);
            writer.write(&layout, &id, out_dir, &name)?;
            written += 1;
        }
    }
    Ok(written)
}

fn plot_trajectories(
    pipeline: &Pipeline,
    report: &TrajectoryReport,
    writer: &ChartWriter,
    out: Option<&Path>,
) -> Result<usize, CliError> {
    let ext = writer.format.extension();
    let mut written = 0;
    for agent in report.renderable() {
        let name = &agent.dir.name;
        let layout = match writer
            .renderer
            .trajectory_layout(&agent.summary.set, pipeline.catalog())
        {
            Ok(layout) => layout,
            Err(err) => {
                tracing::warn!(agent = %name, error = %err, "skipping chart");
                continue;
            }
        };
        let dir = match out {
            Some(out) => out.join(&agent.dir.bag),
            None => agent.dir.bag_path.clone(),
        };
        let file = trajectory_chart_file_name(name, ext);
        writer.write(&layout, &format!("{name}_trajectories"), &dir, &file)?;
        written += 1;
    }
    Ok(written)
}

#[derive(Serialize)]
struct RecordOut<'a> {
    algorithm: &'a str,
    value: f64,
}

#[derive(Serialize)]
struct MetricOut<'a> {
    id: &'a str,
    file_name: &'a str,
    records: Vec<RecordOut<'a>>,
    coverage: &'a CoverageReport,
    diagnostics: &'a ScanDiagnostics,
}

#[derive(Serialize)]
struct AgentOut<'a> {
    bag: &'a str,
    agent: &'a str,
    renderable: bool,
    estimates: Vec<&'a str>,
    coverage: &'a CoverageReport,
    diagnostics: &'a ScanDiagnostics,
}

#[derive(Serialize)]
struct SummaryOut<'a> {
    algorithms: Vec<&'a str>,
    metrics: Vec<MetricOut<'a>>,
    agents: Vec<AgentOut<'a>>,
}

fn summarize<'a>(
    pipeline: &'a Pipeline,
    metrics: &'a MetricReport,
    trajectories: &'a TrajectoryReport,
) -> SummaryOut<'a> {
    let catalog = pipeline.catalog();
    SummaryOut {
        algorithms: catalog.iter().collect(),
        metrics: metrics
            .kinds
            .iter()
            .map(|summary| MetricOut {
                id: &summary.table.kind().id,
                file_name: &summary.table.kind().file_name,
                records: summary
                    .table
                    .ordered_values(catalog)
                    .into_iter()
                    .map(|(algorithm, value)| RecordOut { algorithm, value })
                    .collect(),
                coverage: &summary.coverage,
                diagnostics: &summary.diagnostics,
            })
            .collect(),
        agents: trajectories
            .agents
            .iter()
            .map(|agent| AgentOut {
                bag: &agent.dir.bag,
                agent: &agent.dir.name,
                renderable: agent.summary.is_renderable(),
                estimates: agent
                    .summary
                    .set
                    .ordered_estimates(catalog)
                    .into_iter()
                    .map(|(label, _)| label)
                    .collect(),
                coverage: &agent.summary.coverage,
                diagnostics: &agent.summary.diagnostics,
            })
            .collect(),
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    if pretty {
        serde_json::to_writer_pretty(&mut stdout, value)?;
    } else {
        serde_json::to_writer(&mut stdout, value)?;
    }
    std::io::Write::write_all(&mut stdout, b"\n")?;
    Ok(())
}

fn run(args: Args) -> Result<(), CliError> {
    let (Some(command), Some(root)) = (args.command, args.root.as_deref()) else {
        return Err(CliError::Usage(usage()));
    };

    let FileConfig { bench, mut render } = load_config(args.config.as_deref())?;
    args.render.apply(&mut render);
    let pipeline = Pipeline::new(&bench)?;

    if command == Command::Summary {
        let metrics = pipeline.metrics(root)?;
        let trajectories = pipeline.trajectories(root)?;
        return write_json(&summarize(&pipeline, &metrics, &trajectories), args.pretty);
    }

    let writer = ChartWriter::new(render, &args)?;

    if matches!(command, Command::Metrics | Command::All) {
        let report = pipeline.metrics(root)?;
        for kind in report.without_data() {
            tracing::warn!(metric = %kind.id, "no data, chart not written");
        }
        let out_dir = args.out.as_deref().unwrap_or(root);
        let written = plot_metrics(&pipeline, &report, &writer, args.style.styles(), out_dir)?;
        tracing::info!(
            charts = written,
            skipped_files = report.skipped_count(),
            "metrics done"
        );
    }

    if matches!(command, Command::Trajectories | Command::All) {
        let report = pipeline.trajectories(root)?;
        let written = plot_trajectories(&pipeline, &report, &writer, args.out.as_deref())?;
        let incomplete = report.incomplete().count();
        tracing::info!(charts = written, incomplete, "trajectories done");
    }

    Ok(())
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    init_tracing(args.quiet);

    match run(args) {
        Ok(()) => {}
        Err(err @ CliError::Pipeline(trajbench::Error::RootNotFound { .. })) => {
            eprintln!("{err}");
            std::process::exit(3);
        }
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
