use super::ArchiveDecoder;
use crate::{ArtifactError, ArtifactResult, Trajectory};
use indexmap::IndexMap;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use zip::result::ZipError;

const INFO_ENTRY: &str = "info.json";

#[derive(Debug, Deserialize)]
struct ArchiveInfo {
    ref_name: String,
    est_name: String,
}

/// A decoded result archive: the reference/estimate entry names from its metadata and every
/// trajectory it stores, keyed by entry name without the format suffix.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultArchive {
    pub ref_name: String,
    pub est_name: String,
    pub trajectories: IndexMap<String, Trajectory>,
}

impl ResultArchive {
    /// Looks up a trajectory by a metadata name. Metadata names are often full paths of the
    /// original input files, so the final path component is tried first, then its stem.
    pub fn trajectory(&self, name: &str) -> Option<&Trajectory> {
        self.resolve_key(name).and_then(|key| self.trajectories.get(key))
    }

    pub fn reference(&self) -> Option<&Trajectory> {
        self.trajectory(&self.ref_name)
    }

    pub fn estimate(&self) -> Option<&Trajectory> {
        self.trajectory(&self.est_name)
    }

    /// Splits the archive into its `(reference, estimate)` trajectories.
    pub fn into_roles(mut self) -> (Option<Trajectory>, Option<Trajectory>) {
        let ref_key = self.resolve_key(&self.ref_name).map(str::to_string);
        let est_key = self.resolve_key(&self.est_name).map(str::to_string);
        // Clone when both roles point at the same entry so each side gets its own copy.
        let estimate = est_key.and_then(|k| {
            if ref_key.as_deref() == Some(k.as_str()) {
                self.trajectories.get(&k).cloned()
            } else {
                self.trajectories.shift_remove(&k)
            }
        });
        let reference = ref_key.and_then(|k| self.trajectories.shift_remove(&k));
        (reference, estimate)
    }

    fn resolve_key<'a>(&'a self, name: &'a str) -> Option<&'a str> {
        let base = Path::new(name)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(name);
        if self.trajectories.contains_key(base) {
            return Some(base);
        }
        let stem = Path::new(base).file_stem().and_then(|n| n.to_str())?;
        self.trajectories.contains_key(stem).then_some(stem)
    }
}

#[derive(Debug, Clone, Copy)]
enum EntryFormat {
    Tum,
    Kitti,
}

impl EntryFormat {
    fn split(entry: &str) -> Option<(&str, Self)> {
        if let Some(key) = entry.strip_suffix(".tum") {
            return Some((key, Self::Tum));
        }
        entry.strip_suffix(".kitti").map(|key| (key, Self::Kitti))
    }

    fn parse(self, name: &str, text: &str) -> ArtifactResult<Trajectory> {
        match self {
            Self::Tum => Trajectory::parse_tum(name, text),
            Self::Kitti => Trajectory::parse_kitti(name, text),
        }
    }
}

/// Decodes zip result archives as written by the `evo` trajectory evaluation tools:
/// `info.json` metadata plus one `<name>.tum` / `<name>.kitti` entry per stored trajectory.
/// Other entries (statistics, error arrays) are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipArchiveDecoder;

impl ZipArchiveDecoder {
    pub fn decode_reader<R: Read + std::io::Seek>(
        &self,
        reader: R,
    ) -> ArtifactResult<ResultArchive> {
        let mut archive = zip::ZipArchive::new(reader)?;

        let info: ArchiveInfo = match archive.by_name(INFO_ENTRY) {
            Ok(entry) => serde_json::from_reader(entry)?,
            Err(ZipError::FileNotFound) => {
                return Err(ArtifactError::MissingEntry {
                    name: INFO_ENTRY.to_string(),
                });
            }
            Err(err) => return Err(err.into()),
        };

        let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
        names.sort();

        let mut trajectories = IndexMap::new();
        for name in names {
            let Some((key, format)) = EntryFormat::split(&name) else {
                continue;
            };
            let mut text = String::new();
            archive.by_name(&name)?.read_to_string(&mut text)?;
            let trajectory = format.parse(&name, &text)?;
            trajectories.insert(key.to_string(), trajectory);
        }

        Ok(ResultArchive {
            ref_name: info.ref_name,
            est_name: info.est_name,
            trajectories,
        })
    }
}

impl ArchiveDecoder for ZipArchiveDecoder {
    fn decode(&self, path: &Path) -> ArtifactResult<ResultArchive> {
        let file = std::fs::File::open(path)?;
        self.decode_reader(std::io::BufReader::new(file))
    }
}
