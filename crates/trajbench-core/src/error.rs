use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

/// Batch-level failures. These abort a pipeline run before any artifact is processed.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Input root directory does not exist: {}", .path.display())]
    RootNotFound { path: PathBuf },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Failed to read configuration file {}: {source}", .path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration file {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

impl Error {
    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}

pub type ArtifactResult<T> = std::result::Result<T, ArtifactError>;

/// Failure to decode a single artifact. Callers turn these into skip diagnostics; they never
/// abort a batch.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("table has no header row")]
    MissingHeader,

    #[error("table has no `{column}` column")]
    MissingColumn { column: String },

    #[error("row `{key}` has non-numeric value `{raw}` in column `{column}`")]
    InvalidValue {
        key: String,
        column: String,
        raw: String,
    },

    #[error("archive has no `{name}` entry")]
    MissingEntry { name: String },

    #[error("trajectory `{name}` line {line}: {message}")]
    TrajectoryParse {
        name: String,
        line: usize,
        message: String,
    },
}
