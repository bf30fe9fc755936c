//! Loader configuration, read from TOML.
//!
//! Every field is optional. Unset fields resolve through the
//! `effective_*` accessors to the platform and process defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{CONFIG_ENV_VAR, CONFIG_FILE_NAME, DEFAULT_TEMP_PREFIX, LIBRARIES};
use crate::errors::ConfigError;
use crate::platform::Platform;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoaderConfig {
    /// Overrides the detected OS name for naming and cleanup decisions.
    pub os_name: Option<String>,
    /// Overrides the ordered set of libraries to load.
    pub libraries: Option<Vec<String>>,
    /// Directory serving as the embedded resource namespace.
    pub resource_dir: Option<PathBuf>,
    /// Prefix for temporary extraction directories.
    pub temp_prefix: Option<String>,
    /// Overrides the program artifact location used for the sibling lookup.
    pub program_path: Option<PathBuf>,
}

impl LoaderConfig {
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Read a config file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_toml(&contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Io {
                path: path.display().to_string(),
                source,
            }),
        }
    }

    /// Config named by `TRIDENT_CONFIG`; otherwise `trident.toml` in the
    /// working directory, then next to the program; otherwise the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let explicit = std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from);
        let mut search_dirs = Vec::new();
        if let Ok(cwd) = std::env::current_dir() {
            search_dirs.push(cwd);
        }
        if let Some(dir) = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
        {
            search_dirs.push(dir);
        }
        Self::discover(explicit.as_deref(), &search_dirs)
    }

    /// Load `explicit` if given, else the first `trident.toml` found in
    /// `search_dirs`, else the defaults.
    pub fn discover(explicit: Option<&Path>, search_dirs: &[PathBuf]) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match search_dirs
            .iter()
            .map(|dir| dir.join(CONFIG_FILE_NAME))
            .find(|candidate| candidate.is_file())
        {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn effective_platform(&self) -> Platform {
        match &self.os_name {
            Some(name) => Platform::from_os_name(Some(name.as_str())),
            None => Platform::current(),
        }
    }

    pub fn effective_libraries(&self) -> Vec<String> {
        match &self.libraries {
            Some(libs) => libs.clone(),
            None => LIBRARIES.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn effective_temp_prefix(&self) -> &str {
        self.temp_prefix.as_deref().unwrap_or(DEFAULT_TEMP_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_is_default() {
        let config = LoaderConfig::from_toml("").unwrap();
        assert_eq!(config, LoaderConfig::default());
        assert_eq!(config.effective_temp_prefix(), "Trident-tmp");
        assert_eq!(config.effective_libraries().len(), 5);
        assert_eq!(config.effective_libraries()[0], "kognac-core");
    }

    #[test]
    fn test_full_toml() {
        let config = LoaderConfig::from_toml(
            r#"
            os_name = "Windows Server 2019"
            libraries = ["trident-core"]
            resource_dir = "/opt/trident/native"
            temp_prefix = "tr"
            "#,
        )
        .unwrap();
        assert_eq!(config.effective_platform(), Platform::Windows);
        assert_eq!(config.effective_libraries(), vec!["trident-core".to_string()]);
        assert_eq!(config.resource_dir, Some(PathBuf::from("/opt/trident/native")));
        assert_eq!(config.effective_temp_prefix(), "tr");
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(matches!(
            LoaderConfig::from_toml("bogus = 1"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = LoaderConfig::load(&dir.path().join("trident.toml")).unwrap();
        assert_eq!(config, LoaderConfig::default());
    }

    #[test]
    fn test_load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trident.toml");
        std::fs::write(&path, "os_name = \"Mac OS X\"\n").unwrap();
        let config = LoaderConfig::load(&path).unwrap();
        assert_eq!(config.effective_platform(), Platform::MacOs);
    }

    #[test]
    fn test_discover_prefers_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let explicit = dir.path().join("custom.toml");
        std::fs::write(&explicit, "temp_prefix = \"explicit\"\n").unwrap();
        std::fs::write(dir.path().join("trident.toml"), "temp_prefix = \"found\"\n").unwrap();

        let config = LoaderConfig::discover(Some(explicit.as_path()), &[dir.path().to_path_buf()]).unwrap();
        assert_eq!(config.effective_temp_prefix(), "explicit");
    }

    #[test]
    fn test_discover_takes_first_trident_toml() {
        let empty = tempfile::tempdir().unwrap();
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        std::fs::write(first.path().join("trident.toml"), "os_name = \"Mac OS X\"\n").unwrap();
        std::fs::write(second.path().join("trident.toml"), "os_name = \"Windows\"\n").unwrap();

        let dirs = [
            empty.path().to_path_buf(),
            first.path().to_path_buf(),
            second.path().to_path_buf(),
        ];
        let config = LoaderConfig::discover(None, &dirs).unwrap();
        assert_eq!(config.effective_platform(), Platform::MacOs);
    }

    #[test]
    fn test_discover_without_files_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = LoaderConfig::discover(None, &[dir.path().to_path_buf()]).unwrap();
        assert_eq!(config, LoaderConfig::default());
    }
}
