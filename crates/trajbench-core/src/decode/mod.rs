//! Artifact decoders: the only code that reads file contents.
//!
//! Decoders turn one file into typed values at the artifact boundary. Aggregation code never
//! sees raw rows or archive entries, only [`TableRow`]s and [`ResultArchive`]s.

mod archive;
mod table;

pub use archive::{ResultArchive, ZipArchiveDecoder};
pub use table::{CsvTableDecoder, TableRow};

use crate::ArtifactResult;
use std::path::Path;

/// Reads one metric table artifact.
pub trait TableDecoder: Send + Sync {
    fn decode(&self, path: &Path) -> ArtifactResult<Vec<TableRow>>;
}

/// Reads one trajectory result archive.
pub trait ArchiveDecoder: Send + Sync {
    fn decode(&self, path: &Path) -> ArtifactResult<ResultArchive>;
}
