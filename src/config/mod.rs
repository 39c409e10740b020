//! Configuration for standalone `stylepipe` runs.

pub mod loader;
pub mod schema;

pub use loader::{find_config, load_config, merge_cli_overrides, CliOverrides, ConfigError};
pub use schema::{CompileConfig, MapEntry, StylepipeConfig};
