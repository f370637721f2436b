use std::io;
use std::path::{Path, PathBuf};

use crate::error::LoadError;

/// Directories the loader reads from, validated at construction. The config
/// is a plain value passed into [`crate::BenchmarkLoader`]; nothing here is
/// shared or mutated after construction.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    benchmarks_dir: PathBuf,
    sql_dir: PathBuf,
}

impl LoaderConfig {
    /// Resolves both configured paths to existing directories. A missing or
    /// non-directory path fails with [`LoadError::PathResolution`].
    pub fn new(
        benchmarks_dir: impl Into<PathBuf>,
        sql_dir: impl Into<PathBuf>,
    ) -> Result<Self, LoadError> {
        Ok(Self {
            benchmarks_dir: resolve_dir(benchmarks_dir.into())?,
            sql_dir: resolve_dir(sql_dir.into())?,
        })
    }

    pub fn benchmarks_dir(&self) -> &Path {
        &self.benchmarks_dir
    }

    pub fn sql_dir(&self) -> &Path {
        &self.sql_dir
    }
}

fn resolve_dir(path: PathBuf) -> Result<PathBuf, LoadError> {
    let resolved = path
        .canonicalize()
        .map_err(|source| LoadError::PathResolution {
            path: path.clone(),
            source,
        })?;
    if !resolved.is_dir() {
        return Err(LoadError::PathResolution {
            path,
            source: io::Error::new(io::ErrorKind::InvalidInput, "not a directory"),
        });
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn resolves_existing_directories() {
        let root = TempDir::new().expect("tempdir");
        let benchmarks = root.path().join("benchmarks");
        let sql = root.path().join("sql");
        std::fs::create_dir(&benchmarks).expect("benchmarks dir");
        std::fs::create_dir(&sql).expect("sql dir");

        let config = LoaderConfig::new(&benchmarks, &sql).expect("config");
        assert!(config.benchmarks_dir().is_dir());
        assert!(config.sql_dir().is_dir());
    }

    #[test]
    fn missing_directory_is_a_path_resolution_error() {
        let root = TempDir::new().expect("tempdir");
        let sql = root.path().join("sql");
        std::fs::create_dir(&sql).expect("sql dir");

        let missing = root.path().join("nope");
        let err = LoaderConfig::new(&missing, &sql).expect_err("should fail");
        assert!(matches!(err, LoadError::PathResolution { .. }));
        assert_eq!(err.path(), missing.as_path());
    }

    #[test]
    fn file_in_place_of_directory_is_rejected() {
        let root = TempDir::new().expect("tempdir");
        let file = root.path().join("benchmarks");
        std::fs::write(&file, "not a dir").expect("write");
        let sql = root.path().join("sql");
        std::fs::create_dir(&sql).expect("sql dir");

        let err = LoaderConfig::new(&file, &sql).expect_err("should fail");
        assert!(matches!(err, LoadError::PathResolution { .. }));
    }
}
