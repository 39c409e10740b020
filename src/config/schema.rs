//! Configuration schema types for `stylepipe.toml`

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// One source -> destination pair.
///
/// `[[map]]` entries in the config file; their document order is the
/// processing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapEntry {
    /// Stylesheet source path
    pub source: PathBuf,
    /// Compiled output path
    pub destination: PathBuf,
}

/// Compile behavior section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileConfig {
    /// Write compiled output to disk
    #[serde(default = "default_write")]
    pub write: bool,
    /// Minify compiled output
    #[serde(default)]
    pub minify: bool,
}

fn default_write() -> bool {
    true
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self { write: true, minify: false }
    }
}

/// Root configuration loaded from `stylepipe.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StylepipeConfig {
    /// Compile behavior
    #[serde(default)]
    pub compile: CompileConfig,
    /// Ordered destinations map
    #[serde(default, rename = "map")]
    pub maps: Vec<MapEntry>,
}

impl StylepipeConfig {
    /// Validate the configuration, collecting every problem.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let mut seen = HashSet::new();

        for entry in &self.maps {
            if entry.source.as_os_str().is_empty() {
                errors.push("map entry with empty source".to_string());
            }
            if entry.destination.as_os_str().is_empty() {
                errors
                    .push(format!("map entry {} has an empty destination", entry.source.display()));
            }
            if !seen.insert(&entry.source) {
                errors.push(format!("duplicate source {}", entry.source.display()));
            }
        }

        errors
    }

    /// Destinations map with relative paths resolved against `root`.
    pub fn destinations_map(&self, root: &Path) -> Vec<(PathBuf, PathBuf)> {
        self.maps
            .iter()
            .map(|entry| (resolve(root, &entry.source), resolve(root, &entry.destination)))
            .collect()
    }
}

fn resolve(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}
