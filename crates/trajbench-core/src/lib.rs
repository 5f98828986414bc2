#![forbid(unsafe_code)]

//! Benchmark result discovery + aggregation (headless).
//!
//! Design goals:
//! - every output is ordered by the [`AlgorithmCatalog`], never by discovery order
//! - one corrupt artifact never invalidates the rest of a batch
//! - deterministic, testable outputs (sorted traversal, no hidden global state)
//!
//! The only hard failure surfaced to callers is a missing input root (see [`Error`]). Everything
//! else (unreadable files, unknown run identifiers, missing algorithms) is reported through
//! [`ScanDiagnostics`] / [`CoverageReport`] and `tracing` events.

pub mod alias;
pub mod catalog;
pub mod config;
pub mod coverage;
pub mod decode;
pub mod error;
pub mod metrics;
pub mod pipeline;
pub mod scan;
pub mod trajectory;
pub mod trajectory_set;

#[cfg(test)]
mod tests;

pub use alias::{Alias, AliasTable, IdentifierNormalizer, MatchMode};
pub use catalog::{AlgorithmCatalog, DEFAULT_ALGORITHMS};
pub use config::{BenchConfig, load_config_file};
pub use coverage::{CoverageReport, ScanDiagnostics, SkippedArtifact};
pub use decode::{
    ArchiveDecoder, CsvTableDecoder, ResultArchive, TableDecoder, TableRow, ZipArchiveDecoder,
};
pub use error::{ArtifactError, ArtifactResult, Error, Result};
pub use metrics::{
    MetricAggregator, MetricKind, MetricRecord, MetricReport, MetricSummary, MetricTable,
};
pub use pipeline::{AgentReport, Pipeline, TrajectoryReport};
pub use scan::{AgentDir, ArtifactScanner};
pub use trajectory::{Pose, Trajectory};
pub use trajectory_set::{AgentSummary, TrajectorySet, TrajectorySetBuilder};
