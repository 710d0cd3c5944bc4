// Handlers for CLI subcommands.
//
// Each module handles one subcommand; main.rs only parses arguments and
// dispatches. Map loading is shared here.

pub mod nearest;
pub mod route;
pub mod street;
pub mod summary;

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use osmgraph_lib::{load_osm_file_with_report, Graph, IngestReport};

/// Pick the map file from `--map`, then from the environment.
pub fn resolve_map_path(flag: Option<PathBuf>, env: Option<OsString>) -> Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path);
    }
    match env {
        Some(value) if !value.is_empty() => Ok(PathBuf::from(value)),
        _ => bail!("no map file given; pass --map <PATH> or set OSMGRAPH_MAP"),
    }
}

/// Load the map through the library, keeping the ingestion counters.
pub fn load_map(path: &Path) -> Result<(Graph, IngestReport)> {
    load_osm_file_with_report(path)
        .with_context(|| format!("failed to load map from {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_takes_precedence_over_env() {
        let path = resolve_map_path(
            Some(PathBuf::from("flag.osm")),
            Some(OsString::from("env.osm")),
        )
        .unwrap();
        assert_eq!(path, PathBuf::from("flag.osm"));
    }

    #[test]
    fn env_is_used_without_flag() {
        let path = resolve_map_path(None, Some(OsString::from("env.osm"))).unwrap();
        assert_eq!(path, PathBuf::from("env.osm"));
    }

    #[test]
    fn missing_map_is_an_error() {
        assert!(resolve_map_path(None, None).is_err());
        assert!(resolve_map_path(None, Some(OsString::new())).is_err());
    }
}
