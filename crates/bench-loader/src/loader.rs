use std::collections::BTreeMap;
use std::path::Path;

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::LoaderConfig;
use crate::descriptor::BenchmarkDescriptor;
use crate::error::LoadError;
use crate::naming::default_benchmark_name;
use crate::query::{Query, QueryLoader};

const BENCHMARK_FILE_EXTENSION: &str = "yaml";

/// One fully resolved, runnable benchmark: a descriptor paired with a single
/// variable mapping, queries already substituted.
#[derive(Debug, Clone)]
pub struct Benchmark {
    name: String,
    data_source: String,
    queries: Vec<Query>,
    runs: u64,
    concurrency: u64,
}

impl Benchmark {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data_source(&self) -> &str {
        &self.data_source
    }

    pub fn queries(&self) -> &[Query] {
        &self.queries
    }

    pub fn runs(&self) -> u64 {
        self.runs
    }

    pub fn concurrency(&self) -> u64 {
        self.concurrency
    }
}

/// Walks a directory of benchmark descriptors and expands each into one
/// benchmark per variable mapping. Loading is synchronous and all-or-nothing;
/// any failure discards the whole result.
#[derive(Debug)]
pub struct BenchmarkLoader {
    config: LoaderConfig,
    query_loader: QueryLoader,
}

impl BenchmarkLoader {
    pub fn new(config: LoaderConfig) -> Self {
        let query_loader = QueryLoader::new(config.sql_dir());
        Self {
            config,
            query_loader,
        }
    }

    /// Loads every `.yaml` descriptor under the configured root, sorted by
    /// full path string ascending, and flattens the expanded benchmarks into
    /// one ordered sequence.
    pub fn load_benchmarks(&self) -> Result<Vec<Benchmark>, LoadError> {
        let root = self.config.benchmarks_dir();
        let mut files = Vec::new();
        for entry in WalkDir::new(root) {
            let entry = entry.map_err(|source| LoadError::Walk {
                path: root.to_path_buf(),
                source,
            })?;
            if entry.file_type().is_file() && has_descriptor_extension(entry.path()) {
                files.push(entry.into_path());
            }
        }
        files.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));

        let mut benchmarks = Vec::new();
        for file in &files {
            benchmarks.extend(self.load_benchmark_file(file)?);
        }
        info!(
            descriptors = files.len(),
            benchmarks = benchmarks.len(),
            "loaded benchmarks from {}",
            root.display()
        );
        Ok(benchmarks)
    }

    /// Loads one descriptor file and expands it. The default benchmark name
    /// is derived from the file's path relative to the configured root.
    pub fn load_benchmark_file(&self, file: &Path) -> Result<Vec<Benchmark>, LoadError> {
        let default_name = default_benchmark_name(self.config.benchmarks_dir(), file);
        let descriptor = BenchmarkDescriptor::load_from_file(file, &default_name)?;
        debug!(
            name = descriptor.name(),
            mappings = descriptor.variable_maps().len(),
            "expanding descriptor {}",
            file.display()
        );
        self.expand(&descriptor)
    }

    /// One benchmark per variable mapping, in mapping order; a descriptor
    /// without variables yields exactly one benchmark with an empty mapping.
    pub fn expand(&self, descriptor: &BenchmarkDescriptor) -> Result<Vec<Benchmark>, LoadError> {
        let default_mapping = [BTreeMap::new()];
        let mappings: &[BTreeMap<String, String>] = if descriptor.variable_maps().is_empty() {
            &default_mapping
        } else {
            descriptor.variable_maps()
        };
        mappings
            .iter()
            .map(|variables| self.create_benchmark(descriptor, variables))
            .collect()
    }

    fn create_benchmark(
        &self,
        descriptor: &BenchmarkDescriptor,
        variables: &BTreeMap<String, String>,
    ) -> Result<Benchmark, LoadError> {
        let queries = descriptor
            .query_names()
            .iter()
            .map(|name| self.query_loader.load_from_file(name, variables))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Benchmark {
            name: descriptor.name().to_string(),
            data_source: descriptor.data_source().to_string(),
            queries,
            runs: descriptor.runs(),
            concurrency: descriptor.concurrency(),
        })
    }
}

fn has_descriptor_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext == BENCHMARK_FILE_EXTENSION)
        .unwrap_or(false)
}
