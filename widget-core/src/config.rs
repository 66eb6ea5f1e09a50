use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

/// Port appended when the stored host does not carry one.
pub const DEFAULT_PORT: &str = "8000";

/// Server address as the user typed it, read fresh on every refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    pub host_or_url: String,
    pub port: String,
}

impl EndpointConfig {
    pub fn new(host_or_url: impl Into<String>, port: impl Into<String>) -> Self {
        Self { host_or_url: host_or_url.into(), port: port.into() }
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self { host_or_url: String::new(), port: DEFAULT_PORT.to_string() }
    }
}

/// Where a refresh cycle reads the configured endpoint from.
pub trait ConfigSource: Send + Sync {
    fn endpoint(&self) -> EndpointConfig;
}

impl ConfigSource for EndpointConfig {
    fn endpoint(&self) -> EndpointConfig {
        self.clone()
    }
}

/// Per-pipeline knobs, handed to each refresh instead of living in statics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshSettings {
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    /// Upper bound on list entries in the snapshot (headlines or forecast days).
    pub max_items: usize,
}

impl RefreshSettings {
    /// News tolerates a slow backend.
    pub const fn news() -> Self {
        Self {
            connect_timeout: Duration::from_secs(180),
            read_timeout: Duration::from_secs(180),
            max_items: 10,
        }
    }

    /// Weather favours freshness over patience.
    pub const fn weather() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(10),
            max_items: 5,
        }
    }

    /// Upper bound on the wall-clock duration of one cycle.
    pub fn total_timeout(&self) -> Duration {
        self.connect_timeout + self.read_timeout
    }
}

/// Host-side configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// server_host = "192.168.1.20"
/// server_port = "8000"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    pub server_host: Option<String>,
    pub server_port: Option<String>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            // First run: nothing configured.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "news-widgets", "widget-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Store a server address. A blank port clears the override so the default applies.
    pub fn set_server(&mut self, host: impl Into<String>, port: Option<String>) {
        self.server_host = Some(host.into());
        self.server_port = port.filter(|p| !p.trim().is_empty());
    }

    pub fn is_configured(&self) -> bool {
        self.server_host.as_deref().is_some_and(|h| !h.trim().is_empty())
    }
}

impl ConfigSource for Config {
    fn endpoint(&self) -> EndpointConfig {
        EndpointConfig {
            host_or_url: self.server_host.clone().unwrap_or_default(),
            port: self.server_port.clone().unwrap_or_else(|| DEFAULT_PORT.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_yields_default_port_and_no_host() {
        let cfg = Config::default();
        let endpoint = cfg.endpoint();

        assert_eq!(endpoint.host_or_url, "");
        assert_eq!(endpoint.port, DEFAULT_PORT);
        assert!(!cfg.is_configured());
    }

    #[test]
    fn set_server_keeps_explicit_port() {
        let mut cfg = Config::default();
        cfg.set_server("example.com", Some("9000".into()));

        assert!(cfg.is_configured());
        assert_eq!(cfg.endpoint(), EndpointConfig::new("example.com", "9000"));
    }

    #[test]
    fn blank_port_falls_back_to_default() {
        let mut cfg = Config::default();
        cfg.set_server("example.com", Some("  ".into()));

        assert_eq!(cfg.endpoint().port, DEFAULT_PORT);
    }

    #[test]
    fn whitespace_host_is_not_configured() {
        let mut cfg = Config::default();
        cfg.set_server("   ", None);
        assert!(!cfg.is_configured());
    }

    #[test]
    fn settings_differ_per_widget() {
        let news = RefreshSettings::news();
        let weather = RefreshSettings::weather();

        assert_eq!(news.total_timeout(), Duration::from_secs(360));
        assert_eq!(weather.total_timeout(), Duration::from_secs(20));
        assert_eq!(news.max_items, 10);
        assert_eq!(weather.max_items, 5);
    }

    #[test]
    fn toml_roundtrip_through_file() {
        let dir = std::env::temp_dir().join(format!("widget-core-config-{}", std::process::id()));
        let path = dir.join("config.toml");

        let mut cfg = Config::default();
        cfg.set_server("http://10.0.0.2", None);
        cfg.save_to(&path).expect("save should succeed");

        let loaded = Config::load_from(&path).expect("load should succeed");
        assert_eq!(loaded, cfg);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_file_loads_default() {
        let path = std::env::temp_dir().join("widget-core-does-not-exist/config.toml");
        let cfg = Config::load_from(&path).expect("missing file is not an error");
        assert_eq!(cfg, Config::default());
    }
}
