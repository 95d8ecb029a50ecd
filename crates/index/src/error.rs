use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, IndexError>;

#[derive(Error, Debug)]
pub enum IndexError {
    /// The source declaration could not be read.
    #[error("Failed to read bang source {path:?}: {source}")]
    SourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source declaration was read but is not a valid bang list.
    #[error("Failed to parse bang source {path:?}: {source}")]
    SourceParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A compiled artifact could not be loaded.
    #[error("Failed to read {path:?}: {source}")]
    ArtifactRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Duplicate trigger digest: '{trigger}' collides with '{existing}'")]
    DuplicateTrigger { trigger: String, existing: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl IndexError {
    /// True for the failures that mean the source list itself is unusable.
    pub fn is_source_error(&self) -> bool {
        matches!(self, Self::SourceRead { .. } | Self::SourceParse { .. })
    }
}
