//! Locating and reading the config file.

use std::path::{Path, PathBuf};

use super::types::{AdminConfig, APP_DIR_NAME};

/// Name of the per-directory config file.
pub const LOCAL_CONFIG_FILE: &str = ".pair-admin.toml";

/// Where the active configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    /// No candidate file existed.
    Defaults,
}

/// Finds the config file among an ordered list of candidates.
#[derive(Debug)]
pub struct ConfigLoader {
    candidates: Vec<PathBuf>,
}

impl ConfigLoader {
    /// Candidates: `./.pair-admin.toml`, then `<config_dir>/pair-admin/config.toml`.
    #[must_use]
    pub fn new() -> Self {
        let candidates = std::iter::once(PathBuf::from(LOCAL_CONFIG_FILE))
            .chain(dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join("config.toml")))
            .collect();
        Self { candidates }
    }

    /// Only consider `path`.
    #[must_use]
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            candidates: vec![path],
        }
    }

    /// Read the first existing candidate, falling back to defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<(AdminConfig, ConfigSource), ConfigError> {
        match self.find_config_file() {
            Some(path) => {
                let config = read_config(&path)?;
                Ok((config, ConfigSource::File(path)))
            }
            None => Ok((AdminConfig::default(), ConfigSource::Defaults)),
        }
    }

    /// Candidate paths in lookup order.
    #[must_use]
    pub fn search_paths(&self) -> &[PathBuf] {
        &self.candidates
    }

    /// First candidate that exists on disk.
    #[must_use]
    pub fn find_config_file(&self) -> Option<PathBuf> {
        self.candidates.iter().find(|p| p.is_file()).cloned()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn read_config(path: &Path) -> Result<AdminConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Errors from reading the config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_file_is_searched_first() {
        let loader = ConfigLoader::new();
        assert_eq!(loader.search_paths()[0], PathBuf::from(LOCAL_CONFIG_FILE));
    }

    #[test]
    fn test_defaults_when_no_file() {
        let loader = ConfigLoader::with_path(PathBuf::from("/nonexistent/path.toml"));
        let (config, source) = loader.load().unwrap();
        assert_eq!(config, AdminConfig::default());
        assert_eq!(source, ConfigSource::Defaults);
    }

    #[test]
    fn test_directory_is_not_a_config_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let loader = ConfigLoader::with_path(temp_dir.path().to_path_buf());
        assert!(loader.find_config_file().is_none());
        assert_eq!(loader.load().unwrap().1, ConfigSource::Defaults);
    }

    #[test]
    fn test_load_from_file_reports_source() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
                [api]
                base_url = "http://10.0.0.5:5000"
                request_timeout_secs = 5

                [storage]
                priority_cache_path = "/var/lib/pair-admin/prio.json"

                [health]
                aggregate_danger_failure_rate = 20.0
            "#,
        )
        .unwrap();

        let (config, source) = ConfigLoader::with_path(path.clone()).load().unwrap();
        assert_eq!(source, ConfigSource::File(path));
        assert_eq!(config.api.base_url, "http://10.0.0.5:5000");
        assert_eq!(config.api.request_timeout_secs, 5);
        assert_eq!(
            config.storage.priority_cache_path(),
            PathBuf::from("/var/lib/pair-admin/prio.json")
        );
        assert!((config.health.aggregate_danger_failure_rate - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[api\nbase_url = ").unwrap();

        let result = ConfigLoader::with_path(path).load();
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }
}
