use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_NWS_URL: &str = "https://api.weather.gov";

/// Base URLs of the remote services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub nominatim: String,
    pub nws: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            nominatim: DEFAULT_NOMINATIM_URL.to_string(),
            nws: DEFAULT_NWS_URL.to_string(),
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// contact = "me@example.com"
///
/// [endpoints]
/// nominatim = "https://nominatim.openstreetmap.org"
/// nws = "https://api.weather.gov"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// E-mail or URL identifying the operator; both Nominatim and NWS ask
    /// clients to include one in the User-Agent.
    pub contact: Option<String>,

    pub endpoints: Endpoints,
}

impl Config {
    /// User-Agent sent with every request.
    pub fn user_agent(&self) -> String {
        let product = concat!("forecast-cli/", env!("CARGO_PKG_VERSION"));
        match self.contact.as_deref().map(str::trim) {
            Some(contact) if !contact.is_empty() => format!("{product} ({contact})"),
            _ => product.to_string(),
        }
    }

    pub fn set_contact(&mut self, contact: String) {
        let contact = contact.trim();
        self.contact = (!contact.is_empty()).then(|| contact.to_string());
    }

    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "forecast", "forecast-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_public_services() {
        let cfg = Config::default();
        assert_eq!(cfg.endpoints.nominatim, DEFAULT_NOMINATIM_URL);
        assert_eq!(cfg.endpoints.nws, DEFAULT_NWS_URL);
        assert!(cfg.contact.is_none());
    }

    #[test]
    fn user_agent_includes_contact() {
        let mut cfg = Config::default();
        assert!(cfg.user_agent().starts_with("forecast-cli/"));
        assert!(!cfg.user_agent().contains('('));

        cfg.set_contact("  me@example.com ".into());
        assert!(cfg.user_agent().ends_with("(me@example.com)"));
    }

    #[test]
    fn blank_contact_clears_it() {
        let mut cfg = Config::default();
        cfg.set_contact("me@example.com".into());
        cfg.set_contact("   ".into());
        assert!(cfg.contact.is_none());
    }

    #[test]
    fn partial_toml_keeps_default_endpoints() {
        let cfg = Config::from_toml(
            r#"
            contact = "ops@example.com"

            [endpoints]
            nws = "http://localhost:8080"
            "#,
        )
        .expect("config must parse");

        assert_eq!(cfg.contact.as_deref(), Some("ops@example.com"));
        assert_eq!(cfg.endpoints.nws, "http://localhost:8080");
        assert_eq!(cfg.endpoints.nominatim, DEFAULT_NOMINATIM_URL);
    }

    #[test]
    fn round_trips_through_toml() {
        let mut cfg = Config::default();
        cfg.set_contact("ops@example.com".into());
        let text = toml::to_string_pretty(&cfg).unwrap();
        let back = Config::from_toml(&text).unwrap();
        assert_eq!(back.contact, cfg.contact);
        assert_eq!(back.endpoints, cfg.endpoints);
    }
}
