//! Loader for declarative benchmark definitions.
//!
//! A benchmark is described by a YAML file naming a data source, a list of
//! SQL query files, run/concurrency settings, and optional variable sets.
//! Loading expands every descriptor into one concrete [`Benchmark`] per
//! variable mapping, with `${var}` references in the query text substituted
//! from that mapping.

pub mod config;
pub mod descriptor;
pub mod error;
pub mod loader;
pub mod naming;
pub mod query;
pub mod rest;

pub use config::LoaderConfig;
pub use descriptor::BenchmarkDescriptor;
pub use error::{DescriptorError, LoadError};
pub use loader::{Benchmark, BenchmarkLoader};
pub use query::{Query, QueryLoader};
pub use rest::GenerateBenchmarkNamesRequestItem;
