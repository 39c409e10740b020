//! Configuration loading and discovery for `stylepipe.toml`

use super::schema::StylepipeConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse stylepipe.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Disable writing destinations to disk
    pub no_write: bool,
    /// Minify compiled output
    pub minify: Option<bool>,
}

/// Find stylepipe.toml by walking up from the current working directory.
pub fn find_config() -> Option<PathBuf> {
    env::current_dir().ok().and_then(find_config_from)
}

/// Find stylepipe.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join("stylepipe.toml");
        if config_path.exists() {
            return Some(config_path);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from a stylepipe.toml file.
///
/// With an explicit path, loads that file; otherwise uses [`find_config`].
/// Without any config file the defaults apply (an empty destinations map,
/// which the stage rejects at run time).
pub fn load_config(path: Option<&Path>) -> Result<StylepipeConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => load_config_file(&p),
        None => Ok(StylepipeConfig::default()),
    }
}

/// Load configuration from a specific file path.
fn load_config_file(path: &Path) -> Result<StylepipeConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: StylepipeConfig = toml::from_str(&contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors));
    }

    Ok(config)
}

/// Apply CLI overrides on top of a loaded configuration.
pub fn merge_cli_overrides(config: &mut StylepipeConfig, overrides: &CliOverrides) {
    if overrides.no_write {
        config.compile.write = false;
    }
    if let Some(minify) = overrides.minify {
        config.compile.minify = minify;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_walks_up() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("stylepipe.toml"), "").unwrap();
        let nested = temp.path().join("a/b/c");
        fs::create_dir_all(&nested).unwrap();

        let found = find_config_from(nested).unwrap();
        assert_eq!(found, temp.path().join("stylepipe.toml"));
    }

    #[test]
    fn test_load_config_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("stylepipe.toml");
        fs::write(
            &path,
            r#"
            [[map]]
            source = "app.scss"
            destination = "app.css"
            "#,
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.maps.len(), 1);
    }

    #[test]
    fn test_load_config_rejects_duplicates() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("stylepipe.toml");
        fs::write(
            &path,
            r#"
            [[map]]
            source = "app.scss"
            destination = "a.css"

            [[map]]
            source = "app.scss"
            destination = "b.css"
            "#,
        )
        .unwrap();

        let result = load_config(Some(&path));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_load_config_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("stylepipe.toml");
        fs::write(&path, "not valid toml [").unwrap();

        let result = load_config(Some(&path));
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_merge_cli_overrides() {
        let mut config = StylepipeConfig::default();
        merge_cli_overrides(
            &mut config,
            &CliOverrides { no_write: true, minify: Some(true) },
        );

        assert!(!config.compile.write);
        assert!(config.compile.minify);
    }
}
