use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{DescriptorError, LoadError};

/// One parsed benchmark descriptor file. Immutable after load; expansion
/// into concrete benchmarks is done by [`crate::BenchmarkLoader`].
#[derive(Debug, Clone)]
pub struct BenchmarkDescriptor {
    name: String,
    data_source: String,
    query_names: Vec<String>,
    runs: u64,
    concurrency: u64,
    variable_maps: Vec<BTreeMap<String, String>>,
}

impl BenchmarkDescriptor {
    /// Parses a descriptor file. `default_name` is used unless the file
    /// declares a `name` of its own.
    pub fn load_from_file(path: &Path, default_name: &str) -> Result<Self, LoadError> {
        Self::parse_file(path, default_name).map_err(|source| LoadError::Descriptor {
            path: path.to_path_buf(),
            source,
        })
    }

    fn parse_file(path: &Path, default_name: &str) -> Result<Self, DescriptorError> {
        let raw_yaml = fs::read_to_string(path)?;
        let raw: RawDescriptor = serde_yaml::from_str(&raw_yaml)?;
        Self::from_raw(raw, default_name)
    }

    fn from_raw(raw: RawDescriptor, default_name: &str) -> Result<Self, DescriptorError> {
        if raw.concurrency == 0 {
            return Err(DescriptorError::Invalid(
                "concurrency must be at least 1".to_string(),
            ));
        }
        let query_names = raw.query_names.into_names();
        if query_names.is_empty() {
            return Err(DescriptorError::Invalid(
                "query-names must name at least one query".to_string(),
            ));
        }
        let variable_maps = expand_variable_sets(&raw.variables)?;
        Ok(Self {
            name: raw.name.unwrap_or_else(|| default_name.to_string()),
            data_source: raw.datasource,
            query_names,
            runs: raw.runs,
            concurrency: raw.concurrency,
            variable_maps,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data_source(&self) -> &str {
        &self.data_source
    }

    pub fn query_names(&self) -> &[String] {
        &self.query_names
    }

    pub fn runs(&self) -> u64 {
        self.runs
    }

    pub fn concurrency(&self) -> u64 {
        self.concurrency
    }

    /// Variable mappings in expansion order; empty when the descriptor
    /// declares no variables.
    pub fn variable_maps(&self) -> &[BTreeMap<String, String>] {
        &self.variable_maps
    }
}

#[derive(Debug, Deserialize)]
struct RawDescriptor {
    #[serde(default)]
    name: Option<String>,
    datasource: String,
    #[serde(rename = "query-names")]
    query_names: QueryNames,
    #[serde(default = "default_runs")]
    runs: u64,
    #[serde(default = "default_concurrency")]
    concurrency: u64,
    #[serde(default)]
    variables: BTreeMap<String, BTreeMap<String, VariableValues>>,
}

fn default_runs() -> u64 {
    1
}

fn default_concurrency() -> u64 {
    1
}

/// `query-names` accepts a YAML list or a single comma-separated string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum QueryNames {
    List(Vec<String>),
    Joined(String),
}

impl QueryNames {
    fn into_names(self) -> Vec<String> {
        match self {
            QueryNames::List(names) => names
                .into_iter()
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty())
                .collect(),
            QueryNames::Joined(joined) => joined
                .split(',')
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty())
                .collect(),
        }
    }
}

/// A variable in a set carries one value or a list of values to cross.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum VariableValues {
    Many(Vec<serde_yaml::Value>),
    One(serde_yaml::Value),
}

impl VariableValues {
    fn to_strings(&self) -> Result<Vec<String>, DescriptorError> {
        match self {
            VariableValues::Many(values) => values.iter().map(scalar_to_string).collect(),
            VariableValues::One(value) => Ok(vec![scalar_to_string(value)?]),
        }
    }
}

fn scalar_to_string(value: &serde_yaml::Value) -> Result<String, DescriptorError> {
    match value {
        serde_yaml::Value::String(s) => Ok(s.clone()),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        _ => Err(DescriptorError::Invalid(
            "variable values must be scalars".to_string(),
        )),
    }
}

/// Expands every named variable set to the cartesian product of its value
/// lists and concatenates the sets' products. Sets are processed in
/// ascending set-name order, keys within a set in ascending key order,
/// values in declared order, so expansion order is deterministic.
fn expand_variable_sets(
    sets: &BTreeMap<String, BTreeMap<String, VariableValues>>,
) -> Result<Vec<BTreeMap<String, String>>, DescriptorError> {
    let mut maps = Vec::new();
    for set in sets.values() {
        let mut product: Vec<BTreeMap<String, String>> = vec![BTreeMap::new()];
        for (key, values) in set {
            let values = values.to_strings()?;
            let mut next = Vec::with_capacity(product.len() * values.len());
            for map in &product {
                for value in &values {
                    let mut entry = map.clone();
                    entry.insert(key.clone(), value.clone());
                    next.push(entry);
                }
            }
            product = next;
        }
        maps.extend(product);
    }
    Ok(maps)
}
