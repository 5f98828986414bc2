use crate::{Error, Result};

/// Canonical algorithm labels, in display order.
pub const DEFAULT_ALGORITHMS: [&str; 6] = ["FGO", "TM", "EKF", "UKF", "IEKF", "DVL"];

/// The ordered set of algorithms every output is filtered and sorted by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlgorithmCatalog {
    labels: Vec<String>,
}

impl Default for AlgorithmCatalog {
    fn default() -> Self {
        Self {
            labels: DEFAULT_ALGORITHMS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl AlgorithmCatalog {
    /// Builds a catalog from configuration. Labels are trimmed; empty or duplicate labels are
    /// rejected.
    pub fn new<I, S>(labels: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out: Vec<String> = Vec::new();
        for label in labels {
            let label = label.as_ref().trim();
            if label.is_empty() {
                return Err(Error::invalid_config("algorithm labels must not be empty"));
            }
            if out.iter().any(|l| l == label) {
                return Err(Error::invalid_config(format!(
                    "duplicate algorithm label `{label}`"
                )));
            }
            out.push(label.to_string());
        }
        if out.is_empty() {
            return Err(Error::invalid_config("algorithm catalog is empty"));
        }
        Ok(Self { labels: out })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.labels.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.position(label).is_some()
    }

    /// Catalog index of `label`; this is the sort key for all outputs.
    pub fn position(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    /// Returns the catalog-owned spelling of `label`, if it is a member.
    pub fn get(&self, label: &str) -> Option<&str> {
        self.labels
            .iter()
            .find(|l| l.as_str() == label)
            .map(String::as_str)
    }
}
