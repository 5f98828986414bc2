use crate::{
    Alias, AlgorithmCatalog, AliasTable, DEFAULT_ALGORITHMS, Error, MatchMode, MetricKind, Result,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Pipeline configuration. Every field has a default matching the upstream benchmark layout, so
/// a config file only needs to name what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    /// Canonical algorithm labels in display order.
    pub algorithms: Vec<String>,
    /// Exact-match aliases for metric table row keys.
    pub table_aliases: Vec<Alias>,
    /// Substring aliases for archive directory names, tried in order.
    pub archive_aliases: Vec<Alias>,
    pub metrics: Vec<MetricKind>,
    /// Table column holding the summary value.
    pub value_column: String,
    /// Path substring selecting one archive per run (avoids double counting).
    pub archive_marker: String,
    pub archive_extension: String,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            algorithms: DEFAULT_ALGORITHMS.iter().map(|s| s.to_string()).collect(),
            table_aliases: AliasTable::default_table_aliases(),
            archive_aliases: AliasTable::default_archive_aliases(),
            metrics: MetricKind::defaults(),
            value_column: "rmse".to_string(),
            archive_marker: "ape_trans".to_string(),
            archive_extension: "zip".to_string(),
        }
    }
}

impl BenchConfig {
    pub fn from_path(path: &Path) -> Result<Self> {
        load_config_file(path)
    }

    pub fn catalog(&self) -> Result<AlgorithmCatalog> {
        AlgorithmCatalog::new(&self.algorithms)
    }

    pub fn table_alias_table(&self) -> AliasTable {
        AliasTable::from_aliases(MatchMode::Exact, self.table_aliases.iter().cloned())
    }

    pub fn archive_alias_table(&self) -> AliasTable {
        AliasTable::from_aliases(MatchMode::Substring, self.archive_aliases.iter().cloned())
    }

    pub fn validate(&self) -> Result<()> {
        self.catalog()?;
        if self.metrics.is_empty() {
            return Err(Error::invalid_config("at least one metric kind is required"));
        }
        for (i, kind) in self.metrics.iter().enumerate() {
            if kind.id.trim().is_empty() || kind.file_name.trim().is_empty() {
                return Err(Error::invalid_config(
                    "metric kinds need a non-empty `id` and `file_name`",
                ));
            }
            let dup = self.metrics[..i]
                .iter()
                .any(|k| k.id == kind.id || k.file_name == kind.file_name);
            if dup {
                return Err(Error::invalid_config(format!(
                    "duplicate metric kind `{}` ({})",
                    kind.id, kind.file_name
                )));
            }
        }
        if self.value_column.trim().is_empty() {
            return Err(Error::invalid_config("`value_column` must not be empty"));
        }
        if self.archive_extension.trim().is_empty() {
            return Err(Error::invalid_config("`archive_extension` must not be empty"));
        }
        if self.archive_aliases.iter().any(|a| a.pattern.is_empty()) {
            return Err(Error::invalid_config("archive alias patterns must not be empty"));
        }
        Ok(())
    }
}

/// Reads a YAML or JSON configuration file (JSON is accepted as a YAML subset).
pub fn load_config_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path).map_err(|source| Error::ConfigIo {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&text).map_err(|source| Error::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}
