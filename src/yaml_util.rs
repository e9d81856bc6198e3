use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::{CatalogError, CatalogResult};

/// Loads a value from a YAML file.
pub trait YamlDeserialize: Sized {
    fn from_yaml_file(path: &Path) -> CatalogResult<Self>;
}

impl<T: DeserializeOwned> YamlDeserialize for T {
    fn from_yaml_file(path: &Path) -> CatalogResult<Self> {
        tracing::debug!(path = %path.display(), "Loading YAML");
        let file = std::fs::File::open(path).map_err(|source| CatalogError::io(path, source))?;
        let reader = std::io::BufReader::new(file);
        serde_yaml::from_reader(reader).map_err(|error| CatalogError::Config {
            path: path.to_path_buf(),
            message: error.to_string(),
        })
    }
}
