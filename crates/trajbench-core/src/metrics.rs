use crate::{
    AlgorithmCatalog, AliasTable, CoverageReport, IdentifierNormalizer, ScanDiagnostics,
    TableDecoder,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One of the fixed summary-statistic categories, tied to the table file that carries it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricKind {
    /// Short stable id, used in output file names (`ape_trans`).
    pub id: String,
    /// Recognized table file name (`benchmark_ape_trans.csv`).
    pub file_name: String,
    pub title: String,
    pub axis_label: String,
}

impl MetricKind {
    pub fn new(
        id: impl Into<String>,
        file_name: impl Into<String>,
        title: impl Into<String>,
        axis_label: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            file_name: file_name.into(),
            title: title.into(),
            axis_label: axis_label.into(),
        }
    }

    /// Absolute/relative pose error, translation and rotation.
    pub fn defaults() -> Vec<MetricKind> {
        vec![
            Self::new(
                "ape_trans",
                "benchmark_ape_trans.csv",
                "APE Translation",
                "APE Translation RMSE (m)",
            ),
            Self::new(
                "ape_rot",
                "benchmark_ape_rot.csv",
                "APE Rotation",
                "APE Rotation RMSE (deg)",
            ),
            Self::new(
                "rpe_trans",
                "benchmark_rpe_trans.csv",
                "RPE Translation",
                "RPE Translation RMSE (m/m)",
            ),
            Self::new(
                "rpe_rot",
                "benchmark_rpe_rot.csv",
                "RPE Rotation",
                "RPE Rotation RMSE (deg/m)",
            ),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricRecord {
    pub algorithm: String,
    pub value: f64,
}

/// All records of one metric kind, merged across every discovered table.
///
/// Records are kept in discovery order; [`MetricTable::ordered`] applies catalog order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricTable {
    kind: MetricKind,
    records: Vec<MetricRecord>,
}

impl MetricTable {
    pub fn new(kind: MetricKind) -> Self {
        Self {
            kind,
            records: Vec::new(),
        }
    }

    pub fn kind(&self) -> &MetricKind {
        &self.kind
    }

    pub fn records(&self) -> &[MetricRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub(crate) fn push(&mut self, record: MetricRecord) {
        self.records.push(record);
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.records.iter().map(|r| r.algorithm.as_str())
    }

    /// Records sorted by catalog position. The sort is stable, so records of one algorithm keep
    /// their discovery order. Labels outside the catalog are dropped.
    pub fn ordered(&self, catalog: &AlgorithmCatalog) -> Vec<&MetricRecord> {
        let mut keyed: Vec<(usize, &MetricRecord)> = self
            .records
            .iter()
            .filter_map(|r| catalog.position(&r.algorithm).map(|pos| (pos, r)))
            .collect();
        keyed.sort_by_key(|(pos, _)| *pos);
        keyed.into_iter().map(|(_, r)| r).collect()
    }

    /// `(label, value)` pairs in catalog order; the renderer hand-off.
    pub fn ordered_values(&self, catalog: &AlgorithmCatalog) -> Vec<(&str, f64)> {
        self.ordered(catalog)
            .into_iter()
            .map(|r| (r.algorithm.as_str(), r.value))
            .collect()
    }
}

/// Aggregate of one metric kind plus its coverage and diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSummary {
    pub table: MetricTable,
    pub coverage: CoverageReport,
    pub diagnostics: ScanDiagnostics,
}

impl MetricSummary {
    /// Kinds without any resolved record are excluded from rendering.
    pub fn has_data(&self) -> bool {
        !self.table.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricReport {
    pub kinds: Vec<MetricSummary>,
}

impl MetricReport {
    pub fn with_data(&self) -> impl Iterator<Item = &MetricSummary> + '_ {
        self.kinds.iter().filter(|k| k.has_data())
    }

    pub fn without_data(&self) -> impl Iterator<Item = &MetricKind> + '_ {
        self.kinds
            .iter()
            .filter(|k| !k.has_data())
            .map(|k| k.table.kind())
    }

    pub fn get(&self, kind_id: &str) -> Option<&MetricSummary> {
        self.kinds.iter().find(|k| k.table.kind().id == kind_id)
    }

    pub fn skipped_count(&self) -> usize {
        self.kinds.iter().map(|k| k.diagnostics.skipped_count()).sum()
    }
}

/// Merges metric tables of each kind, normalizing row keys with exact matching.
pub struct MetricAggregator<'a> {
    catalog: &'a AlgorithmCatalog,
    aliases: &'a AliasTable,
    decoder: &'a dyn TableDecoder,
}

impl<'a> MetricAggregator<'a> {
    pub fn new(
        catalog: &'a AlgorithmCatalog,
        aliases: &'a AliasTable,
        decoder: &'a dyn TableDecoder,
    ) -> Self {
        Self {
            catalog,
            aliases,
            decoder,
        }
    }

    /// Aggregates `paths`, all assumed to hold tables of `kind`.
    ///
    /// Unreadable tables are skipped and recorded; rows with unrecognized keys are counted and
    /// dropped. Never fails.
    pub fn aggregate_kind(
        &self,
        kind: &MetricKind,
        paths: impl IntoIterator<Item = PathBuf>,
    ) -> MetricSummary {
        let normalizer = IdentifierNormalizer::new(self.catalog, self.aliases);
        let mut table = MetricTable::new(kind.clone());
        let mut diagnostics = ScanDiagnostics::default();

        for path in paths {
            diagnostics.discovered += 1;
            let rows = match self.decoder.decode(&path) {
                Ok(rows) => rows,
                Err(err) => {
                    diagnostics.skip(&path, &err);
                    continue;
                }
            };
            diagnostics.loaded += 1;

            for row in rows {
                match normalizer.resolve(&row.key) {
                    Some(label) => table.push(MetricRecord {
                        algorithm: label.to_string(),
                        value: row.value,
                    }),
                    None => {
                        tracing::debug!(
                            kind = %kind.id,
                            key = %row.key,
                            path = %path.display(),
                            "dropping row with unrecognized identifier"
                        );
                        diagnostics.unrecognized += 1;
                    }
                }
            }
        }

        let coverage = CoverageReport::compute(self.catalog, table.labels());
        tracing::info!(
            kind = %kind.id,
            files = diagnostics.discovered,
            skipped = diagnostics.skipped_count(),
            records = table.len(),
            unrecognized = diagnostics.unrecognized,
            "aggregated metric tables"
        );
        if table.is_empty() {
            tracing::warn!(kind = %kind.id, file = %kind.file_name, "no data for metric, skipping");
        } else if !coverage.is_complete() {
            tracing::warn!(
                kind = %kind.id,
                missing = ?coverage.missing(),
                "algorithms missing from metric"
            );
        }

        MetricSummary {
            table,
            coverage,
            diagnostics,
        }
    }
}
