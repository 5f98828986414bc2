use crate::{Error, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Read-only, recursive artifact discovery rooted at an existing directory.
///
/// Traversal is sorted by file name, so two scans of an unchanged tree yield the same sequence.
/// Nothing is opened; the iterators only produce paths.
#[derive(Debug, Clone)]
pub struct ArtifactScanner {
    root: PathBuf,
}

/// An agent results directory laid out as `<root>/<bag>/evo/<agent>/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentDir {
    pub bag: String,
    pub bag_path: PathBuf,
    pub name: String,
    pub path: PathBuf,
}

impl ArtifactScanner {
    /// Fails with [`Error::RootNotFound`] when `root` is missing or not a directory.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(Error::RootNotFound { path: root });
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn files(&self) -> impl Iterator<Item = PathBuf> + '_ {
        WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) if entry.file_type().is_file() => Some(entry.into_path()),
                Ok(_) => None,
                Err(err) => {
                    tracing::warn!(error = %err, "skipping unreadable directory entry");
                    None
                }
            })
    }

    /// Table artifacts anywhere under the root whose file name equals `file_name`.
    pub fn tables<'a>(&'a self, file_name: &'a str) -> impl Iterator<Item = PathBuf> + 'a {
        self.files()
            .filter(move |path| path.file_name().and_then(|n| n.to_str()) == Some(file_name))
    }

    /// Archives with `extension` whose path below the root contains `marker`.
    pub fn archives<'a>(
        &'a self,
        extension: &'a str,
        marker: &'a str,
    ) -> impl Iterator<Item = PathBuf> + 'a {
        self.files().filter(move |path| {
            let ext_ok = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(extension));
            if !ext_ok {
                return false;
            }
            let rel = path.strip_prefix(&self.root).unwrap_or(path);
            rel.to_string_lossy().contains(marker)
        })
    }

    /// Lists agent directories (`<bag>/evo/<agent>`), sorted by bag then agent name.
    pub fn agents(&self) -> Vec<AgentDir> {
        let mut out = Vec::new();
        for bag_path in sorted_subdirs(&self.root) {
            let evo = bag_path.join("evo");
            if !evo.is_dir() {
                continue;
            }
            let bag = dir_name(&bag_path);
            for agent_path in sorted_subdirs(&evo) {
                out.push(AgentDir {
                    bag: bag.clone(),
                    bag_path: bag_path.clone(),
                    name: dir_name(&agent_path),
                    path: agent_path,
                });
            }
        }
        out
    }
}

fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn sorted_subdirs(dir: &Path) -> Vec<PathBuf> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::warn!(path = %dir.display(), error = %err, "cannot list directory");
            return Vec::new();
        }
    };
    let mut dirs: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    dirs.sort();
    dirs
}
