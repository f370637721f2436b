use std::path::Path;

/// Replaces every character outside `[A-Za-z0-9_-]` with `_`, producing a
/// stable URL-safe identifier.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Default benchmark name for a descriptor file: its path relative to the
/// descriptor root, extension stripped, sanitized. Used only when the
/// descriptor does not declare a name of its own.
pub fn default_benchmark_name(root: &Path, file: &Path) -> String {
    let relative = file.strip_prefix(root).unwrap_or(file);
    let stem = relative.with_extension("");
    sanitize_name(&stem.to_string_lossy())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_replaces_everything_outside_the_safe_set() {
        assert_eq!(sanitize_name("tpch/q01 (scale 10)"), "tpch_q01__scale_10_");
        assert_eq!(sanitize_name("simple-name_3"), "simple-name_3");
    }

    #[test]
    fn sanitize_is_idempotent() {
        let once = sanitize_name("a/b c.d");
        assert_eq!(sanitize_name(&once), once);
    }

    #[test]
    fn default_name_comes_from_the_relative_path() {
        let root = Path::new("/data/benchmarks");
        let file = Path::new("/data/benchmarks/tpch/scale-1/q01.yaml");
        assert_eq!(default_benchmark_name(root, file), "tpch_scale-1_q01");
    }

    #[test]
    fn default_name_is_deterministic() {
        let root = Path::new("/data/benchmarks");
        let file = Path::new("/data/benchmarks/a/x.yaml");
        assert_eq!(
            default_benchmark_name(root, file),
            default_benchmark_name(root, file)
        );
    }

    #[test]
    fn file_outside_root_falls_back_to_the_full_path() {
        let root = Path::new("/data/benchmarks");
        let file = Path::new("/elsewhere/x.yaml");
        assert_eq!(default_benchmark_name(root, file), "_elsewhere_x");
    }
}
