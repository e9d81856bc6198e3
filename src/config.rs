use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::CatalogResult;
use crate::yaml_util::YamlDeserialize;

/// Names a YAML file to read settings from.
pub const CONFIG_PATH_VAR: &str = "ASTRONOMICON_CONFIG";
pub const DATA_FILE_VAR: &str = "ASTRONOMICON_DATA_FILE";
pub const LOG_FILTER_VAR: &str = "ASTRONOMICON_LOG";

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Record file the catalog loads from and saves to
    pub data_file: PathBuf,
    /// `tracing` filter directive used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            data_file: PathBuf::from("space_objects.txt"),
            log_filter: "info".to_string(),
        }
    }
}

impl Config {
    /// Reads `.env`, then the process environment.
    pub fn load() -> CatalogResult<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults, overlaid by the YAML file named by [`CONFIG_PATH_VAR`], overlaid
    /// by the individual variables.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> CatalogResult<Self> {
        let mut config = match lookup(CONFIG_PATH_VAR) {
            Some(path) => Config::from_yaml_file(Path::new(&path))?,
            None => Config::default(),
        };
        if let Some(data_file) = lookup(DATA_FILE_VAR) {
            config.data_file = PathBuf::from(data_file);
        }
        if let Some(log_filter) = lookup(LOG_FILTER_VAR) {
            config.log_filter = log_filter;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogError;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn defaults_without_any_source() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.data_file, PathBuf::from("space_objects.txt"));
    }

    #[test]
    fn yaml_file_fills_missing_fields_with_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "data_file: catalog/objects.txt").unwrap();
        let path = file.path().to_string_lossy().to_string();

        let config = Config::from_lookup(lookup_from(&[(CONFIG_PATH_VAR, &path)])).unwrap();
        assert_eq!(config.data_file, PathBuf::from("catalog/objects.txt"));
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn variables_override_yaml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "data_file: from_yaml.txt\nlog_filter: warn").unwrap();
        let path = file.path().to_string_lossy().to_string();

        let config = Config::from_lookup(lookup_from(&[
            (CONFIG_PATH_VAR, &path),
            (DATA_FILE_VAR, "from_env.txt"),
        ]))
        .unwrap();
        assert_eq!(config.data_file, PathBuf::from("from_env.txt"));
        assert_eq!(config.log_filter, "warn");
    }

    #[test]
    fn malformed_yaml_is_a_config_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "data_file: [unterminated").unwrap();
        let path = file.path().to_string_lossy().to_string();

        let result = Config::from_lookup(lookup_from(&[(CONFIG_PATH_VAR, &path)]));
        assert!(matches!(result, Err(CatalogError::Config { .. })));
    }

    #[test]
    fn missing_yaml_is_an_io_error() {
        let result = Config::from_lookup(lookup_from(&[(CONFIG_PATH_VAR, "/nonexistent/astronomicon.yaml")]));
        assert!(result.unwrap_err().is_not_found());
    }
}
