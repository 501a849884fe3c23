//! Configuration resolution.

use std::path::PathBuf;

/// Environment variable naming the report directory.
pub const OUTPUT_DIR_ENV: &str = "IONIAN_WX_OUTPUT_DIR";

/// Report directory used when neither flag nor env var is given.
pub const DEFAULT_OUTPUT_DIR: &str = "data/extract";

/// Resolve the report directory: explicit flag, then env var, then default.
pub fn resolve_output_dir(explicit: Option<&str>) -> PathBuf {
    if let Some(dir) = explicit {
        return PathBuf::from(dir);
    }

    if let Ok(env_dir) = std::env::var(OUTPUT_DIR_ENV) {
        if !env_dir.is_empty() {
            return PathBuf::from(env_dir);
        }
    }

    PathBuf::from(DEFAULT_OUTPUT_DIR)
}
