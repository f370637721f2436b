use std::path::{Path, PathBuf};

use thiserror::Error;

/// Terminal failure of a load operation. Every variant carries the offending
/// path; there is no partial-success mode and no retry.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not load benchmarks from {}", .path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("could not load benchmark descriptor {}", .path.display())]
    Descriptor {
        path: PathBuf,
        #[source]
        source: DescriptorError,
    },

    #[error("could not load query file {}", .path.display())]
    Query {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not resolve configured directory {}", .path.display())]
    PathResolution {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LoadError {
    /// The path the failure is attributed to.
    pub fn path(&self) -> &Path {
        match self {
            LoadError::Walk { path, .. }
            | LoadError::Descriptor { path, .. }
            | LoadError::Query { path, .. }
            | LoadError::PathResolution { path, .. } => path,
        }
    }
}

/// Cause of a descriptor load failure.
#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error("{0}")]
    Invalid(String),
}
