use crate::{AlgorithmCatalog, ArtifactError};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Which catalog algorithms a result set does and does not contain.
///
/// `present` and `missing` partition the catalog; both are listed in catalog order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverageReport {
    present: Vec<String>,
    missing: Vec<String>,
}

impl CoverageReport {
    pub fn compute<'a>(
        catalog: &AlgorithmCatalog,
        labels: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let seen: Vec<&str> = labels.into_iter().collect();
        let (present, missing): (Vec<&str>, Vec<&str>) =
            catalog.iter().partition(|label| seen.contains(label));
        Self {
            present: present.into_iter().map(str::to_string).collect(),
            missing: missing.into_iter().map(str::to_string).collect(),
        }
    }

    pub fn present(&self) -> &[String] {
        &self.present
    }

    pub fn missing(&self) -> &[String] {
        &self.missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedArtifact {
    pub path: PathBuf,
    pub reason: String,
}

/// Per-pass counters reported alongside every aggregate. Operator visibility only; nothing
/// downstream branches on these.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanDiagnostics {
    /// Artifacts matched by the scanner.
    pub discovered: usize,
    /// Artifacts decoded successfully.
    pub loaded: usize,
    pub skipped: Vec<SkippedArtifact>,
    /// Rows or archives whose identifier did not resolve to a catalog label.
    pub unrecognized: usize,
    /// Reference trajectories that disagree with the ground truth already selected.
    pub ground_truth_conflicts: usize,
}

impl ScanDiagnostics {
    pub(crate) fn skip(&mut self, path: &Path, err: &ArtifactError) {
        tracing::warn!(path = %path.display(), error = %err, "skipping unreadable artifact");
        self.skipped.push(SkippedArtifact {
            path: path.to_path_buf(),
            reason: err.to_string(),
        });
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}
