use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;

use bench_loader::{Benchmark, BenchmarkLoader, GenerateBenchmarkNamesRequestItem, LoaderConfig};

#[derive(Parser)]
#[command(name = "bench", version, about = "Benchmark definition loader")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load every descriptor under the benchmarks directory and list the
    /// expanded benchmarks.
    List {
        #[arg(long, default_value = "benchmarks")]
        benchmarks_dir: PathBuf,
        #[arg(long, default_value = "sql")]
        sql_dir: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Expand a single descriptor file, including resolved query text.
    Describe {
        descriptor: PathBuf,
        #[arg(long, default_value = "benchmarks")]
        benchmarks_dir: PathBuf,
        #[arg(long, default_value = "sql")]
        sql_dir: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Generate unique benchmark names from a JSON array of request items.
    GenerateNames {
        requests: PathBuf,
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let json_mode = command_json_mode(&cli.command);
    match run_command(cli.command) {
        Ok(Some(payload)) => {
            emit_json(&payload);
            Ok(())
        }
        Ok(None) => Ok(()),
        Err(err) => {
            if json_mode {
                emit_json(&json_error("command_failed", format!("{:#}", err), json!({})));
                std::process::exit(1);
            }
            Err(err)
        }
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

fn run_command(command: Commands) -> Result<Option<Value>> {
    match command {
        Commands::List {
            benchmarks_dir,
            sql_dir,
            json,
        } => {
            let config = LoaderConfig::new(benchmarks_dir, sql_dir)?;
            let loader = BenchmarkLoader::new(config);
            let benchmarks = loader.load_benchmarks()?;
            if json {
                return Ok(Some(json!({
                    "ok": true,
                    "command": "list",
                    "benchmarks": benchmarks.iter().map(benchmark_to_json).collect::<Vec<_>>(),
                })));
            }
            for benchmark in &benchmarks {
                print_benchmark(benchmark);
            }
            println!("total: {}", benchmarks.len());
        }
        Commands::Describe {
            descriptor,
            benchmarks_dir,
            sql_dir,
            json,
        } => {
            let config = LoaderConfig::new(benchmarks_dir, sql_dir)?;
            let loader = BenchmarkLoader::new(config);
            let descriptor = descriptor
                .canonicalize()
                .with_context(|| format!("could not resolve {}", descriptor.display()))?;
            let benchmarks = loader.load_benchmark_file(&descriptor)?;
            if json {
                return Ok(Some(json!({
                    "ok": true,
                    "command": "describe",
                    "descriptor": descriptor.display().to_string(),
                    "benchmarks": benchmarks.iter().map(benchmark_to_json).collect::<Vec<_>>(),
                })));
            }
            for benchmark in &benchmarks {
                print_benchmark(benchmark);
                for query in benchmark.queries() {
                    println!("query {}:", query.name());
                    for line in query.text().lines() {
                        println!("  {}", line);
                    }
                }
            }
        }
        Commands::GenerateNames { requests, json } => {
            let raw = fs::read_to_string(&requests)
                .with_context(|| format!("could not read {}", requests.display()))?;
            let items: Vec<GenerateBenchmarkNamesRequestItem> = serde_json::from_str(&raw)
                .with_context(|| format!("could not parse {}", requests.display()))?;
            for item in &items {
                item.validate()
                    .with_context(|| format!("invalid request item '{}'", item.benchmark_name()))?;
            }
            let names: Vec<String> = items.iter().map(|item| item.unique_name()).collect();
            if json {
                return Ok(Some(json!({
                    "ok": true,
                    "command": "generate-names",
                    "names": names,
                })));
            }
            for name in &names {
                println!("{}", name);
            }
        }
    }
    Ok(None)
}

fn benchmark_to_json(benchmark: &Benchmark) -> Value {
    json!({
        "name": benchmark.name(),
        "datasource": benchmark.data_source(),
        "runs": benchmark.runs(),
        "concurrency": benchmark.concurrency(),
        "queries": benchmark.queries().iter().map(|query| json!({
            "name": query.name(),
            "text": query.text(),
            "variables": query.variables(),
        })).collect::<Vec<_>>(),
    })
}

fn print_benchmark(benchmark: &Benchmark) {
    println!(
        "benchmark: {} datasource: {} runs: {} concurrency: {} queries: {}",
        benchmark.name(),
        benchmark.data_source(),
        benchmark.runs(),
        benchmark.concurrency(),
        benchmark.queries().len()
    );
}

fn emit_json(value: &Value) {
    match serde_json::to_string(value) {
        Ok(s) => println!("{}", s),
        Err(_) => println!(
            "{{\"ok\":false,\"error\":{{\"code\":\"serialization_error\",\"message\":\"failed to serialize JSON payload\",\"details\":{{}}}}}}"
        ),
    }
}

fn json_error(code: &str, message: String, details: Value) -> Value {
    json!({
        "ok": false,
        "error": {
            "code": code,
            "message": message,
            "details": details
        }
    })
}

fn command_json_mode(command: &Commands) -> bool {
    match command {
        Commands::List { json, .. }
        | Commands::Describe { json, .. }
        | Commands::GenerateNames { json, .. } => *json,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_list_with_custom_directories() {
        let cli = Cli::try_parse_from([
            "bench",
            "list",
            "--benchmarks-dir",
            "defs",
            "--sql-dir",
            "queries",
            "--json",
        ])
        .expect("parse");
        match cli.command {
            Commands::List {
                benchmarks_dir,
                sql_dir,
                json,
            } => {
                assert_eq!(benchmarks_dir, PathBuf::from("defs"));
                assert_eq!(sql_dir, PathBuf::from("queries"));
                assert!(json);
            }
            _ => panic!("expected list"),
        }
    }

    #[test]
    fn describe_requires_a_descriptor_path() {
        assert!(Cli::try_parse_from(["bench", "describe"]).is_err());
    }

    #[test]
    fn json_error_payload_shape() {
        let payload = json_error("command_failed", "boom".to_string(), json!({}));
        assert_eq!(payload["ok"], false);
        assert_eq!(payload["error"]["code"], "command_failed");
    }
}
