use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use tracing::debug;

use crate::error::LoadError;

/// One resolved query: the substituted text plus the variable mapping that
/// produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    name: String,
    text: String,
    variables: BTreeMap<String, String>,
}

impl Query {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn variables(&self) -> &BTreeMap<String, String> {
        &self.variables
    }
}

/// Resolves query names to files under a base directory and substitutes
/// `${var}` references from a variable mapping.
#[derive(Debug, Clone)]
pub struct QueryLoader {
    sql_dir: PathBuf,
}

impl QueryLoader {
    pub fn new(sql_dir: impl Into<PathBuf>) -> Self {
        Self {
            sql_dir: sql_dir.into(),
        }
    }

    /// Reads `sql_dir/<query_name>` and substitutes every `${key}` with the
    /// mapped value. References without a mapping pass through verbatim.
    pub fn load_from_file(
        &self,
        query_name: &str,
        variables: &BTreeMap<String, String>,
    ) -> Result<Query, LoadError> {
        let path = self.sql_dir.join(query_name);
        let raw = fs::read_to_string(&path).map_err(|source| LoadError::Query {
            path: path.clone(),
            source,
        })?;
        Ok(Query {
            name: query_name.to_string(),
            text: substitute_variables(&raw, variables),
            variables: variables.clone(),
        })
    }
}

fn substitute_variables(text: &str, variables: &BTreeMap<String, String>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let reference = &rest[start..];
        match reference.find('}') {
            Some(end) => {
                let key = &reference[2..end];
                match variables.get(key) {
                    Some(value) => out.push_str(value),
                    None => {
                        debug!(reference = key, "no value for variable reference, keeping it");
                        out.push_str(&reference[..=end]);
                    }
                }
                rest = &reference[end + 1..];
            }
            // unterminated reference, keep the remainder as-is
            None => {
                out.push_str(reference);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}
