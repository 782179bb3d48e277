//! Client settings

use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_TRADER_ID: &str = "trader-123";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_REVIEWER_NAME: &str = "OGA Officer";

/// Settings shared by the portal clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalSettings {
    /// Base URL of the consignment, task and OGA APIs
    pub api_base_url: String,

    /// Deployment instance for officer screens
    pub instance: Option<String>,

    /// Directory holding `<instance>.config.json` files; built-in presets
    /// are used when unset
    pub instance_dir: Option<PathBuf>,

    pub trader_id: String,

    pub reviewer_name: String,

    /// Offer sample data on forms
    pub autofill: bool,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for PortalSettings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            instance: None,
            instance_dir: None,
            trader_id: DEFAULT_TRADER_ID.to_string(),
            reviewer_name: DEFAULT_REVIEWER_NAME.to_string(),
            autofill: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl PortalSettings {
    /// Load settings from a TOML file (default location when `None`), then
    /// apply `PORTAL_*` environment overrides. A missing file yields defaults.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let mut settings = Self::from_file(path)?;
        settings.apply_env(|key| std::env::var(key).ok())?;
        Ok(settings)
    }

    /// Read only the TOML file
    pub fn from_file(path: Option<&Path>) -> ConfigResult<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_path()?,
        };

        if !path.exists() {
            tracing::debug!(path = %path.display(), "No settings file, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(toml::from_str(&contents)?)
    }

    /// `<config dir>/portal/config.toml`
    pub fn default_path() -> ConfigResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::Settings("Cannot find config directory".into()))?;
        Ok(config_dir.join("portal").join("config.toml"))
    }

    /// Apply overrides from an environment lookup
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<()> {
        if let Some(url) = lookup("PORTAL_API_URL") {
            self.api_base_url = url;
        }
        if let Some(instance) = lookup("PORTAL_INSTANCE") {
            self.instance = Some(instance);
        }
        if let Some(dir) = lookup("PORTAL_INSTANCE_DIR") {
            self.instance_dir = Some(PathBuf::from(dir));
        }
        if let Some(trader) = lookup("PORTAL_TRADER_ID") {
            self.trader_id = trader;
        }
        if let Some(name) = lookup("PORTAL_REVIEWER_NAME") {
            self.reviewer_name = name;
        }
        if let Some(flag) = lookup("PORTAL_AUTOFILL") {
            self.autofill = parse_flag("PORTAL_AUTOFILL", &flag)?;
        }
        if let Some(secs) = lookup("PORTAL_TIMEOUT_SECS") {
            self.timeout_secs = secs.trim().parse().map_err(|_| {
                ConfigError::Settings(format!("PORTAL_TIMEOUT_SECS must be a number, got {}", secs))
            })?;
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Load the configured instance, from `instance_dir` when set
    pub fn load_instance(&self) -> ConfigResult<crate::InstanceConfig> {
        let instance = self.instance.as_deref().ok_or_else(|| {
            ConfigError::Settings(
                "No instance configured; set PORTAL_INSTANCE (e.g. npqs, fcau)".into(),
            )
        })?;
        match &self.instance_dir {
            Some(dir) => crate::load_instance_from_dir(dir, instance),
            None => crate::load_instance(instance),
        }
    }
}

fn parse_flag(key: &str, value: &str) -> ConfigResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(ConfigError::Settings(format!(
            "{} must be a boolean, got {}",
            key, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let settings = PortalSettings::from_file(Some(Path::new("/nonexistent/portal.toml"))).unwrap();
        assert_eq!(settings, PortalSettings::default());
        assert_eq!(settings.api_base_url, "http://localhost:8080");
        assert_eq!(settings.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "api_base_url = \"https://portal.example\"\nautofill = true\n").unwrap();

        let settings = PortalSettings::from_file(Some(&path)).unwrap();
        assert_eq!(settings.api_base_url, "https://portal.example");
        assert!(settings.autofill);
        assert_eq!(settings.trader_id, DEFAULT_TRADER_ID);
    }

    #[test]
    fn test_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "timeout_secs = \"soon\"").unwrap();
        assert!(matches!(
            PortalSettings::from_file(Some(&path)),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let mut settings = PortalSettings::default();
        settings
            .apply_env(env(&[
                ("PORTAL_API_URL", "http://api:9000"),
                ("PORTAL_INSTANCE", "fcau"),
                ("PORTAL_AUTOFILL", "yes"),
                ("PORTAL_TIMEOUT_SECS", "5"),
            ]))
            .unwrap();

        assert_eq!(settings.api_base_url, "http://api:9000");
        assert_eq!(settings.instance.as_deref(), Some("fcau"));
        assert!(settings.autofill);
        assert_eq!(settings.timeout_secs, 5);
        assert_eq!(settings.load_instance().unwrap().id, "fcau");
    }

    #[test]
    fn test_bad_env_values() {
        let mut settings = PortalSettings::default();
        assert!(settings.apply_env(env(&[("PORTAL_TIMEOUT_SECS", "later")])).is_err());
        assert!(settings.apply_env(env(&[("PORTAL_AUTOFILL", "maybe")])).is_err());
    }

    #[test]
    fn test_instance_required() {
        assert!(matches!(
            PortalSettings::default().load_instance(),
            Err(ConfigError::Settings(_))
        ));
    }
}
