use crate::{
    AgentDir, AgentSummary, AlgorithmCatalog, AliasTable, ArchiveDecoder, ArtifactScanner,
    BenchConfig, CsvTableDecoder, MetricAggregator, MetricKind, MetricReport, Result,
    TableDecoder, TrajectorySetBuilder, ZipArchiveDecoder,
};
use serde::Serialize;
use std::path::Path;

/// An agent's summary together with where it was found.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentReport {
    #[serde(skip)]
    pub dir: AgentDir,
    #[serde(flatten)]
    pub summary: AgentSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrajectoryReport {
    pub agents: Vec<AgentReport>,
}

impl TrajectoryReport {
    pub fn renderable(&self) -> impl Iterator<Item = &AgentReport> + '_ {
        self.agents.iter().filter(|a| a.summary.is_renderable())
    }

    pub fn incomplete(&self) -> impl Iterator<Item = &AgentReport> + '_ {
        self.agents.iter().filter(|a| !a.summary.is_renderable())
    }
}

/// Discovery + aggregation over one input root, configured once and reusable across roots.
pub struct Pipeline {
    catalog: AlgorithmCatalog,
    table_aliases: AliasTable,
    archive_aliases: AliasTable,
    metrics: Vec<MetricKind>,
    archive_marker: String,
    archive_extension: String,
    table_decoder: Box<dyn TableDecoder>,
    archive_decoder: Box<dyn ArchiveDecoder>,
}

impl Pipeline {
    /// Validates `config` and wires the default CSV/zip decoders.
    pub fn new(config: &BenchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            catalog: config.catalog()?,
            table_aliases: config.table_alias_table(),
            archive_aliases: config.archive_alias_table(),
            metrics: config.metrics.clone(),
            archive_marker: config.archive_marker.clone(),
            archive_extension: config.archive_extension.clone(),
            table_decoder: Box::new(CsvTableDecoder::new(config.value_column.clone())),
            archive_decoder: Box::new(ZipArchiveDecoder),
        })
    }

    pub fn with_table_decoder(mut self, decoder: impl TableDecoder + 'static) -> Self {
        self.table_decoder = Box::new(decoder);
        self
    }

    pub fn with_archive_decoder(mut self, decoder: impl ArchiveDecoder + 'static) -> Self {
        self.archive_decoder = Box::new(decoder);
        self
    }

    pub fn catalog(&self) -> &AlgorithmCatalog {
        &self.catalog
    }

    pub fn metric_kinds(&self) -> &[MetricKind] {
        &self.metrics
    }

    /// Aggregates every configured metric kind found under `root`.
    ///
    /// Fails only when `root` does not exist.
    pub fn metrics(&self, root: &Path) -> Result<MetricReport> {
        let scanner = ArtifactScanner::new(root)?;
        let aggregator =
            MetricAggregator::new(&self.catalog, &self.table_aliases, self.table_decoder.as_ref());

        let kinds = self
            .metrics
            .iter()
            .map(|kind| aggregator.aggregate_kind(kind, scanner.tables(&kind.file_name)))
            .collect::<Vec<_>>();

        let found: usize = kinds.iter().map(|k| k.diagnostics.discovered).sum();
        tracing::info!(root = %root.display(), files = found, "found metric files");
        Ok(MetricReport { kinds })
    }

    /// Builds the trajectory set of a single agent directory.
    pub fn agent(&self, name: &str, dir: &Path) -> Result<AgentSummary> {
        let scanner = ArtifactScanner::new(dir)?;
        Ok(self.build_agent(name, &scanner))
    }

    fn build_agent(&self, name: &str, scanner: &ArtifactScanner) -> AgentSummary {
        let builder = TrajectorySetBuilder::new(
            &self.catalog,
            &self.archive_aliases,
            self.archive_decoder.as_ref(),
        );
        builder.build(
            name,
            scanner.archives(&self.archive_extension, &self.archive_marker),
        )
    }

    /// Discovers every `<bag>/evo/<agent>` directory under `root` and builds its set.
    ///
    /// Agents without a ground truth stay in the report (see [`TrajectoryReport::incomplete`])
    /// but are never rendered.
    pub fn trajectories(&self, root: &Path) -> Result<TrajectoryReport> {
        let scanner = ArtifactScanner::new(root)?;
        let dirs = scanner.agents();
        tracing::info!(root = %root.display(), agents = dirs.len(), "found agent directories");

        let mut agents = Vec::with_capacity(dirs.len());
        for dir in dirs {
            // The directory was listed a moment ago; losing it now only drops this agent.
            let agent_scanner = match ArtifactScanner::new(&dir.path) {
                Ok(scanner) => scanner,
                Err(err) => {
                    tracing::warn!(agent = %dir.name, error = %err, "skipping agent");
                    continue;
                }
            };
            let summary = self.build_agent(&dir.name, &agent_scanner);
            agents.push(AgentReport { dir, summary });
        }
        Ok(TrajectoryReport { agents })
    }
}
