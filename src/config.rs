use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::florist::{FLOWERS_FILE, INVOICES_FILE};

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_flowers_file() -> String {
    FLOWERS_FILE.to_string()
}

fn default_invoices_file() -> String {
    INVOICES_FILE.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_flowers_file")]
    pub flowers_file: String,
    #[serde(default = "default_invoices_file")]
    pub invoices_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            flowers_file: default_flowers_file(),
            invoices_file: default_invoices_file(),
        }
    }
}

impl StorageConfig {
    pub fn flowers_path(&self) -> PathBuf {
        self.data_dir.join(&self.flowers_file)
    }

    pub fn invoices_path(&self) -> PathBuf {
        self.data_dir.join(&self.invoices_file)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

pub struct ConfigLoader {
    base_dir: PathBuf,
}

impl ConfigLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<AppConfig> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        AppConfig::from_yaml(&data).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Loads `file` when given, otherwise falls back to defaults.
    pub fn load_or_default(&self, file: Option<&Path>) -> Result<AppConfig> {
        match file {
            Some(file) => self.load(file),
            None => Ok(AppConfig::default()),
        }
    }
}

impl AppConfig {
    pub fn from_yaml(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = AppConfig::from_yaml("server:\n  port: 9100\nlogging:\n  level: debug\n")
            .unwrap();
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.storage.flowers_path(), PathBuf::from("data/flowers.json"));
    }

    #[test]
    fn empty_yaml_is_default() {
        let config = AppConfig::from_yaml("").unwrap();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.storage.invoices_path(), PathBuf::from("data/invoices.json"));
    }

    #[test]
    fn loader_reports_missing_file() {
        let temp = tempfile::tempdir().unwrap();
        let loader = ConfigLoader::new(temp.path());
        let err = loader.load("absent.yaml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn loader_reads_file() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(
            temp.path().join("florist.yaml"),
            "storage:\n  data_dir: /srv/florist\n  flowers_file: stock.json\n",
        )
        .unwrap();
        let config = ConfigLoader::new(temp.path())
            .load_or_default(Some(Path::new("florist.yaml")))
            .unwrap();
        assert_eq!(
            config.storage.flowers_path(),
            PathBuf::from("/srv/florist/stock.json")
        );
    }
}
