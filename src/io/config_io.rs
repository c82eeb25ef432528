use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::Config;

/// Name of the config file looked up from the working directory upwards
pub const CONFIG_FILE_NAME: &str = "textimp.toml";

/// Error type for config loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// A parsed config together with the directory relative paths resolve against
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub base_dir: PathBuf,
    /// None when no config file was found and defaults are in use
    pub path: Option<PathBuf>,
}

impl LoadedConfig {
    pub fn defaults(base_dir: &Path) -> Self {
        LoadedConfig {
            config: Config::default(),
            base_dir: base_dir.to_path_buf(),
            path: None,
        }
    }

    /// Resolve a possibly relative path from the config against its directory
    pub fn resolve(&self, path: &str) -> PathBuf {
        let p = Path::new(path);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.base_dir.join(p)
        }
    }

    /// The configured scene document path, if any
    pub fn scene_path(&self) -> Option<PathBuf> {
        self.config.scene.path.as_deref().map(|p| self.resolve(p))
    }

    /// The configured diagnostic log file, if any
    pub fn log_file(&self) -> Option<PathBuf> {
        self.config.log.file.as_deref().map(|p| self.resolve(p))
    }
}

/// Walk up from `start` looking for a config file.
pub fn discover_config(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Read and parse a config file
pub fn read_config(path: &Path) -> Result<LoadedConfig, ConfigError> {
    let text = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    let config: Config = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;
    let base_dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    Ok(LoadedConfig {
        config,
        base_dir,
        path: Some(path.to_path_buf()),
    })
}

/// Load an explicit config file, or discover one from `start`, or fall back to defaults.
pub fn load_config(explicit: Option<&Path>, start: &Path) -> Result<LoadedConfig, ConfigError> {
    match explicit {
        Some(path) => read_config(path),
        None => match discover_config(start) {
            Some(path) => read_config(&path),
            None => Ok(LoadedConfig::defaults(start)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn discover_from_subdirectory() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE_NAME), "").unwrap();
        let sub = tmp.path().join("a/b");
        fs::create_dir_all(&sub).unwrap();
        assert_eq!(
            discover_config(&sub),
            Some(tmp.path().join(CONFIG_FILE_NAME))
        );
    }

    #[test]
    fn missing_config_falls_back_to_defaults() {
        let tmp = TempDir::new().unwrap();
        let loaded = load_config(None, tmp.path()).unwrap();
        assert!(loaded.path.is_none());
        assert_eq!(loaded.config.log.capacity, 6);
        assert_eq!(loaded.scene_path(), None);
    }

    #[test]
    fn relative_paths_resolve_against_config_dir() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE_NAME);
        fs::write(
            &path,
            "[scene]\npath = \"scenes/main.json\"\n\n[log]\nfile = \"/var/log/timp.log\"\n",
        )
        .unwrap();
        let loaded = load_config(Some(&path), Path::new("/elsewhere")).unwrap();
        assert_eq!(loaded.scene_path(), Some(tmp.path().join("scenes/main.json")));
        assert_eq!(loaded.log_file(), Some(PathBuf::from("/var/log/timp.log")));
    }

    #[test]
    fn malformed_config_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[log]\ncapacity = \"many\"\n").unwrap();
        assert!(matches!(
            load_config(Some(&path), tmp.path()),
            Err(ConfigError::ParseError { .. })
        ));
    }
}
