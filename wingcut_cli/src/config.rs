use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use wingcut::SessionConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: String,
    pub metadata_dir: PathBuf,
    /// Where component images are exported.
    pub output_dir: PathBuf,
    pub session: SessionConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metadata_dir: PathBuf::from("metadata"),
            output_dir: PathBuf::from("output"),
            session: SessionConfig::default(),
        }
    }
}

impl Config {
    /// Reads `path`, falling back to defaults when it is missing or unreadable.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Config::default();
        }
        match Config::load(path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("ignoring config {}: {err:#}", path.display());
                Config::default()
            }
        }
    }

    fn load(path: &Path) -> anyhow::Result<Self> {
        let serialized = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        common::serde::deserialize(&serialized, common::SerdeFormat::Yaml)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let config = Config::load_or_default(Path::new("does/not/exist.yaml"));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.session.threshold.get(), 250);
    }

    #[test]
    fn yaml_overrides_nested_session() {
        let path = common::test_utils::test_output_path("wingcut_cli_config.yaml");
        std::fs::write(
            &path,
            "log_level: debug\nsession:\n  threshold: 200\n  gutter_width: 4\n",
        )
        .unwrap();
        let config = Config::load_or_default(&path);
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.metadata_dir, PathBuf::from("metadata"));
        assert_eq!(config.session.threshold.get(), 200);
        assert_eq!(config.session.gutter_width, 4);
        assert_eq!(config.session.symmetry_radius, 10);
    }
}
