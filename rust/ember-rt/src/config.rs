//! Runtime configuration for primitive props, read from the `[props]` table
//! of `ember.toml`.

use serde::Deserialize;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid toml: {0}")]
    Toml(#[from] toml::de::Error),
}

/// How `map` issues its callback calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapMode {
    /// Issue every call up front and gather results in index order.
    #[default]
    Concurrent,
    /// Await each call before issuing the next.
    Sequential,
}

/// How `filter`, `reduce` and `find` bound their iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IterationMode {
    /// Re-read the array length on every step, so callbacks that grow or
    /// shrink the array are observed.
    #[default]
    Live,
    /// Iterate over the elements present when the call started.
    Snapshot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct PropsConfig {
    pub map: MapMode,
    pub iteration: IterationMode,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    props: PropsConfig,
}

impl PropsConfig {
    /// Parse the `[props]` table out of a whole config document. A document
    /// without one yields the defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(content)?;
        Ok(file.props)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = PropsConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, PropsConfig::default());
        assert_eq!(cfg.map, MapMode::Concurrent);
        assert_eq!(cfg.iteration, IterationMode::Live);
    }

    #[test]
    fn test_parse_props_table() {
        let cfg = PropsConfig::from_toml_str(
            r#"
[package]
name = "demo"

[props]
map = "sequential"
iteration = "snapshot"
"#,
        )
        .unwrap();
        assert_eq!(cfg.map, MapMode::Sequential);
        assert_eq!(cfg.iteration, IterationMode::Snapshot);
    }

    #[test]
    fn test_partial_table() {
        let cfg = PropsConfig::from_toml_str("[props]\nmap = \"sequential\"\n").unwrap();
        assert_eq!(cfg.map, MapMode::Sequential);
        assert_eq!(cfg.iteration, IterationMode::Live);
    }

    #[test]
    fn test_invalid_mode() {
        let err = PropsConfig::from_toml_str("[props]\nmap = \"parallel\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = PropsConfig::load_from(Path::new("/nonexistent/ember.toml")).unwrap_err();
        assert!(err.to_string().starts_with("cannot read"));
    }
}
