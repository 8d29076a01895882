// Configuration - TOML file with serde defaults
//
// Every section and key is optional. A missing file means all defaults;
// a file that exists but does not parse is an error.

use crate::chart::DEFAULT_MARGIN;
use crate::theme::ThemeKind;
use anyhow::{anyhow, Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable overriding the config path
pub const CONFIG_ENV: &str = "MINI_CRM_CONFIG";

pub const DEFAULT_CONFIG_PATH: &str = "config/mini-crm.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// "dark" or "light"
    pub theme: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            theme: ThemeKind::default().as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub margin: f64,
    /// Random ±variation applied to mock monthly values
    pub jitter: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        ChartConfig {
            margin: DEFAULT_MARGIN,
            jitter: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub directory: String,
    /// flexi_logger level string, e.g. "info" or "mini_crm=debug"
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            directory: "logs".to_string(),
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            addr: "0.0.0.0:3000".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub ui: UiConfig,
    pub chart: ChartConfig,
    pub logging: LoggingConfig,
    pub server: ServerConfig,
}

impl AppConfig {
    /// Load from `$MINI_CRM_CONFIG`, falling back to the default path
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        AppConfig::load_from(&path)
    }

    pub fn load_from(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            return Ok(AppConfig::default());
        }

        let config: AppConfig =
            read_toml_from_file(path).with_context(|| format!("failed to load config {}", path))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if ThemeKind::from_name(&self.ui.theme).is_none() {
            return Err(anyhow!("unknown theme: {}", self.ui.theme));
        }
        if !self.chart.margin.is_finite() || self.chart.margin < 0.0 {
            return Err(anyhow!("chart.margin must be non-negative, got {}", self.chart.margin));
        }
        Ok(())
    }

    pub fn theme(&self) -> ThemeKind {
        ThemeKind::from_name(&self.ui.theme).unwrap_or_default()
    }
}

/// Read a TOML file into any deserializable type
pub fn read_toml_from_file<T: DeserializeOwned>(file_path: &str) -> Result<T> {
    let toml_content = std::fs::read_to_string(file_path)?;
    let toml: T = toml::from_str(&toml_content)?;

    Ok(toml)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str, contents: &str) -> String {
        let path = std::env::temp_dir().join(format!("mini-crm-{}-{}.toml", name, std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = AppConfig::load_from("/nonexistent/mini-crm.toml").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.theme(), ThemeKind::Dark);
        assert_eq!(config.chart.margin, 60.0);
        assert_eq!(config.server.addr, "0.0.0.0:3000");
    }

    #[test]
    fn test_partial_file() {
        let path = temp_file("partial", "[ui]\ntheme = \"light\"\n\n[chart]\njitter = 0\n");
        let config = AppConfig::load_from(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.theme(), ThemeKind::Light);
        assert_eq!(config.chart.jitter, 0);
        assert_eq!(config.chart.margin, 60.0);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_malformed_file_is_error() {
        let path = temp_file("broken", "[ui\ntheme = ");
        let result = AppConfig::load_from(&path);
        std::fs::remove_file(&path).ok();
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let path = temp_file("badtheme", "[ui]\ntheme = \"neon\"\n");
        let result = AppConfig::load_from(&path);
        std::fs::remove_file(&path).ok();
        assert!(result.is_err());

        let mut config = AppConfig::default();
        config.chart.margin = -1.0;
        assert!(config.validate().is_err());
    }
}
