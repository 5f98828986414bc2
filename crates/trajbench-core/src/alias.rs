use crate::AlgorithmCatalog;
use serde::{Deserialize, Serialize};

/// How an [`AliasTable`] compares a raw identifier against its patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// The raw identifier must equal the pattern (metric-table row keys).
    Exact,
    /// The pattern must occur somewhere in the raw identifier (archive directory names, which
    /// carry timestamps and run indices around the algorithm token).
    Substring,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alias {
    pub pattern: String,
    pub label: String,
}

impl Alias {
    pub fn new(pattern: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            label: label.into(),
        }
    }
}

/// Ordered `(pattern, label)` pairs. The first matching alias wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasTable {
    mode: MatchMode,
    aliases: Vec<Alias>,
}

impl AliasTable {
    pub fn new(mode: MatchMode) -> Self {
        Self {
            mode,
            aliases: Vec::new(),
        }
    }

    pub fn from_aliases(mode: MatchMode, aliases: impl IntoIterator<Item = Alias>) -> Self {
        Self {
            mode,
            aliases: aliases.into_iter().collect(),
        }
    }

    pub fn add(&mut self, alias: Alias) {
        self.aliases.push(alias);
    }

    pub fn add_pair(&mut self, pattern: impl Into<String>, label: impl Into<String>) {
        self.add(Alias::new(pattern, label));
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    pub fn aliases(&self) -> &[Alias] {
        &self.aliases
    }

    /// Row keys written by the benchmark tool for each estimator node.
    pub fn default_table_aliases() -> Vec<Alias> {
        vec![
            Alias::new("global", "FGO"),
            Alias::new("global_tm", "TM"),
            Alias::new("global_ekf", "EKF"),
            Alias::new("global_ukf", "UKF"),
            Alias::new("global_iekf", "IEKF"),
            Alias::new("dvl", "DVL"),
        ]
    }

    /// Tokens found in archive directory names.
    pub fn default_archive_aliases() -> Vec<Alias> {
        // `iekf` must come before `ekf`: the shorter token is a substring of the longer one.
        vec![
            Alias::new("fgo", "FGO"),
            Alias::new("tm", "TM"),
            Alias::new("iekf", "IEKF"),
            Alias::new("ekf", "EKF"),
            Alias::new("ukf", "UKF"),
            Alias::new("dvl", "DVL"),
        ]
    }

    pub fn default_tables() -> Self {
        Self::from_aliases(MatchMode::Exact, Self::default_table_aliases())
    }

    pub fn default_archives() -> Self {
        Self::from_aliases(MatchMode::Substring, Self::default_archive_aliases())
    }

    /// Returns the label of the first alias matching `raw`, without consulting any catalog.
    pub fn lookup(&self, raw: &str) -> Option<&str> {
        let found = match self.mode {
            MatchMode::Exact => self.aliases.iter().find(|a| a.pattern == raw),
            MatchMode::Substring => self
                .aliases
                .iter()
                .find(|a| !a.pattern.is_empty() && raw.contains(a.pattern.as_str())),
        };
        found.map(|a| a.label.as_str())
    }
}

/// Resolves raw identifiers to catalog labels.
///
/// Resolution is gated twice: the alias table must produce a label, and that label must be a
/// catalog member. In exact mode a raw key that already is a catalog label resolves to itself.
#[derive(Debug, Clone, Copy)]
pub struct IdentifierNormalizer<'a> {
    catalog: &'a AlgorithmCatalog,
    aliases: &'a AliasTable,
}

impl<'a> IdentifierNormalizer<'a> {
    pub fn new(catalog: &'a AlgorithmCatalog, aliases: &'a AliasTable) -> Self {
        Self { catalog, aliases }
    }

    /// Returns the canonical label for `raw`, or `None` when it is unrecognized.
    pub fn resolve(&self, raw: &str) -> Option<&'a str> {
        let candidate = match self.aliases.lookup(raw) {
            Some(label) => label,
            None if self.aliases.mode() == MatchMode::Exact => raw,
            None => return None,
        };
        self.catalog.get(candidate)
    }
}
