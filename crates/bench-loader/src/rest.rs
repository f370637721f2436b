use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::naming::sanitize_name;

pub const MAX_BENCHMARK_NAME_LENGTH: usize = 255;

/// Boundary payload of the name-generation endpoint: a benchmark name plus
/// the variable mapping it was expanded with. Nothing in the loader consumes
/// this; it exists for callers speaking the REST shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateBenchmarkNamesRequestItem {
    benchmark_name: String,
    #[serde(default)]
    variables: BTreeMap<String, String>,
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("benchmarkName must be between 1 and {} characters, got {0}", MAX_BENCHMARK_NAME_LENGTH)]
    BenchmarkNameLength(usize),
}

impl GenerateBenchmarkNamesRequestItem {
    pub fn new(benchmark_name: impl Into<String>, variables: BTreeMap<String, String>) -> Self {
        Self {
            benchmark_name: benchmark_name.into(),
            variables,
        }
    }

    pub fn benchmark_name(&self) -> &str {
        &self.benchmark_name
    }

    pub fn variables(&self) -> &BTreeMap<String, String> {
        &self.variables
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let length = self.benchmark_name.chars().count();
        if length == 0 || length > MAX_BENCHMARK_NAME_LENGTH {
            return Err(ValidationError::BenchmarkNameLength(length));
        }
        Ok(())
    }

    /// The generated name: benchmark name followed by each `key=value` pair
    /// in ascending key order, joined with `_`, sanitized like default
    /// benchmark names.
    pub fn unique_name(&self) -> String {
        let mut parts = Vec::with_capacity(1 + self.variables.len());
        parts.push(self.benchmark_name.clone());
        for (key, value) in &self.variables {
            parts.push(format!("{}={}", key, value));
        }
        sanitize_name(&parts.join("_"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn deserializes_the_camel_case_wire_shape() {
        let item: GenerateBenchmarkNamesRequestItem = serde_json::from_str(
            r#"{"benchmarkName": "tpch_q01", "variables": {"env": "dev"}}"#,
        )
        .expect("deserialize");
        assert_eq!(item.benchmark_name(), "tpch_q01");
        assert_eq!(item.variables()["env"], "dev");
    }

    #[test]
    fn variables_default_to_empty() {
        let item: GenerateBenchmarkNamesRequestItem =
            serde_json::from_str(r#"{"benchmarkName": "n"}"#).expect("deserialize");
        assert!(item.variables().is_empty());
    }

    #[test]
    fn empty_name_fails_validation() {
        let item = GenerateBenchmarkNamesRequestItem::new("", BTreeMap::new());
        let err = item.validate().expect_err("should fail");
        assert!(matches!(err, ValidationError::BenchmarkNameLength(0)));
    }

    #[test]
    fn overlong_name_fails_validation() {
        let item = GenerateBenchmarkNamesRequestItem::new("x".repeat(256), BTreeMap::new());
        assert!(item.validate().is_err());
    }

    #[test]
    fn boundary_lengths_pass_validation() {
        let one = GenerateBenchmarkNamesRequestItem::new("x", BTreeMap::new());
        let max = GenerateBenchmarkNamesRequestItem::new("x".repeat(255), BTreeMap::new());
        one.validate().expect("length 1");
        max.validate().expect("length 255");
    }

    #[test]
    fn unique_name_appends_key_ordered_pairs() {
        let item = GenerateBenchmarkNamesRequestItem::new(
            "tpch",
            vars(&[("scale", "10"), ("env", "dev")]),
        );
        assert_eq!(item.unique_name(), "tpch_env_dev_scale_10");
    }

    #[test]
    fn unique_name_is_sanitized() {
        let item =
            GenerateBenchmarkNamesRequestItem::new("tpch q01", vars(&[("env", "dev/eu")]));
        assert_eq!(item.unique_name(), "tpch_q01_env_dev_eu");
    }

    #[test]
    fn unique_name_without_variables_is_the_sanitized_name() {
        let item = GenerateBenchmarkNamesRequestItem::new("plain-name", BTreeMap::new());
        assert_eq!(item.unique_name(), "plain-name");
    }
}
