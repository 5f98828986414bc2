use super::TableDecoder;
use crate::{ArtifactError, ArtifactResult};
use std::io::Read;
use std::path::Path;

/// One decoded table row: the raw run identifier and the summary value.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub key: String,
    pub value: f64,
}

/// Decodes benchmark CSV tables: a header row, the run identifier in the first column and the
/// summary statistic in a named column (`rmse` by default). Other columns are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvTableDecoder {
    value_column: String,
}

impl Default for CsvTableDecoder {
    fn default() -> Self {
        Self::new("rmse")
    }
}

impl CsvTableDecoder {
    pub fn new(value_column: impl Into<String>) -> Self {
        Self {
            value_column: value_column.into(),
        }
    }

    pub fn value_column(&self) -> &str {
        &self.value_column
    }

    pub fn decode_reader<R: Read>(&self, reader: R) -> ArtifactResult<Vec<TableRow>> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        if headers.is_empty() {
            return Err(ArtifactError::MissingHeader);
        }
        // Column 0 holds the row key, so the value column must come after it.
        let column = headers
            .iter()
            .position(|h| h == self.value_column)
            .filter(|&idx| idx > 0)
            .ok_or_else(|| ArtifactError::MissingColumn {
                column: self.value_column.clone(),
            })?;

        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            let key = record.get(0).unwrap_or_default().to_string();
            // Empty or absent cells are how pandas writes NaN.
            let raw = record.get(column).unwrap_or_default();
            if raw.is_empty() {
                rows.push(TableRow { key, value: f64::NAN });
                continue;
            }
            let value = raw.parse::<f64>().map_err(|_| ArtifactError::InvalidValue {
                key: key.clone(),
                column: self.value_column.clone(),
                raw: raw.to_string(),
            })?;
            rows.push(TableRow { key, value });
        }
        Ok(rows)
    }
}

impl TableDecoder for CsvTableDecoder {
    fn decode(&self, path: &Path) -> ArtifactResult<Vec<TableRow>> {
        let file = std::fs::File::open(path)?;
        self.decode_reader(std::io::BufReader::new(file))
    }
}
