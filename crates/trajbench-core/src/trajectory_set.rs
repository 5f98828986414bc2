use crate::{
    AlgorithmCatalog, AliasTable, ArchiveDecoder, CoverageReport, IdentifierNormalizer,
    ScanDiagnostics, Trajectory,
};
use indexmap::IndexMap;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Endpoint tolerance (metres) when comparing reference trajectories of one agent.
pub const GROUND_TRUTH_TOLERANCE: f64 = 1e-6;

/// One ground truth plus at most one estimate per algorithm, for a single agent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrajectorySet {
    agent: String,
    ground_truth: Option<Trajectory>,
    estimated: IndexMap<String, Trajectory>,
}

impl TrajectorySet {
    pub fn new(agent: impl Into<String>) -> Self {
        Self {
            agent: agent.into(),
            ground_truth: None,
            estimated: IndexMap::new(),
        }
    }

    pub fn agent(&self) -> &str {
        &self.agent
    }

    pub fn ground_truth(&self) -> Option<&Trajectory> {
        self.ground_truth.as_ref()
    }

    pub fn estimated(&self, label: &str) -> Option<&Trajectory> {
        self.estimated.get(label)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.estimated.keys().map(String::as_str)
    }

    /// Without a ground truth the set is incomplete and is not rendered.
    pub fn is_complete(&self) -> bool {
        self.ground_truth.is_some()
    }

    /// Estimates in catalog order, the renderer hand-off.
    pub fn ordered_estimates<'a>(
        &'a self,
        catalog: &'a AlgorithmCatalog,
    ) -> Vec<(&'a str, &'a Trajectory)> {
        catalog
            .iter()
            .filter_map(|label| self.estimated.get(label).map(|t| (label, t)))
            .collect()
    }

    /// Keeps the first reference offered. Later references are handed back for comparison.
    fn offer_ground_truth(&mut self, reference: Trajectory) -> Option<Trajectory> {
        match &self.ground_truth {
            None => {
                self.ground_truth = Some(reference);
                None
            }
            Some(_) => Some(reference),
        }
    }

    /// Last write wins; returns the replaced estimate, if any.
    fn set_estimate(&mut self, label: &str, estimate: Trajectory) -> Option<Trajectory> {
        self.estimated.insert(label.to_string(), estimate)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentSummary {
    pub set: TrajectorySet,
    pub coverage: CoverageReport,
    pub diagnostics: ScanDiagnostics,
}

impl AgentSummary {
    pub fn is_renderable(&self) -> bool {
        self.set.is_complete()
    }
}

/// Builds a [`TrajectorySet`] from the result archives of one agent.
///
/// Archive identifiers are the archive's parent directory names, resolved with substring
/// matching. The first resolvable reference trajectory becomes the ground truth; later
/// references are only compared against it. Estimates follow last-write-wins in discovery order.
pub struct TrajectorySetBuilder<'a> {
    catalog: &'a AlgorithmCatalog,
    aliases: &'a AliasTable,
    decoder: &'a dyn ArchiveDecoder,
}

impl<'a> TrajectorySetBuilder<'a> {
    pub fn new(
        catalog: &'a AlgorithmCatalog,
        aliases: &'a AliasTable,
        decoder: &'a dyn ArchiveDecoder,
    ) -> Self {
        Self {
            catalog,
            aliases,
            decoder,
        }
    }

    pub fn build(&self, agent: &str, archives: impl IntoIterator<Item = PathBuf>) -> AgentSummary {
        let normalizer = IdentifierNormalizer::new(self.catalog, self.aliases);
        let mut set = TrajectorySet::new(agent);
        let mut diagnostics = ScanDiagnostics::default();

        for path in archives {
            diagnostics.discovered += 1;
            let fragment = parent_name(&path);
            let Some(label) = normalizer.resolve(&fragment) else {
                tracing::debug!(
                    agent,
                    path = %path.display(),
                    "ignoring archive with unrecognized run directory"
                );
                diagnostics.unrecognized += 1;
                continue;
            };

            let archive = match self.decoder.decode(&path) {
                Ok(archive) => archive,
                Err(err) => {
                    diagnostics.skip(&path, &err);
                    continue;
                }
            };
            diagnostics.loaded += 1;

            let (reference, estimate) = archive.into_roles();
            if let Some(reference) = reference {
                if let Some(later) = set.offer_ground_truth(reference) {
                    let agrees = set
                        .ground_truth()
                        .is_some_and(|gt| gt.same_extent(&later, GROUND_TRUTH_TOLERANCE));
                    if !agrees {
                        tracing::warn!(
                            agent,
                            path = %path.display(),
                            "reference trajectory differs from the selected ground truth"
                        );
                        diagnostics.ground_truth_conflicts += 1;
                    }
                }
            }

            match estimate {
                Some(estimate) => {
                    if set.set_estimate(label, estimate).is_some() {
                        tracing::debug!(
                            agent,
                            algorithm = label,
                            path = %path.display(),
                            "replacing earlier estimate"
                        );
                    }
                }
                None => tracing::debug!(
                    agent,
                    path = %path.display(),
                    "archive has no estimated trajectory"
                ),
            }
        }

        let coverage = CoverageReport::compute(self.catalog, set.labels());
        tracing::info!(
            agent,
            archives = diagnostics.discovered,
            skipped = diagnostics.skipped_count(),
            estimates = set.estimated.len(),
            "loaded trajectory archives"
        );
        if !coverage.is_complete() {
            tracing::warn!(agent, missing = ?coverage.missing(), "algorithms missing from agent");
        }
        if !set.is_complete() {
            tracing::warn!(agent, "no ground truth trajectory found, skipping");
        }

        AgentSummary {
            set,
            coverage,
            diagnostics,
        }
    }
}

fn parent_name(path: &Path) -> String {
    path.parent()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
