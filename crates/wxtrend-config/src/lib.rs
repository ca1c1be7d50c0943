use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_STATION_ID: &str = "KANE";
pub const DEFAULT_LOCATION: &str = "Plymouth, MN";
pub const DEFAULT_BASE_URL: &str = "https://api.weather.gov";
pub const DEFAULT_USER_AGENT: &str = "get-weather";
pub const DEFAULT_STORE_URL: &str = "sqlite://wxtrend.db";
pub const DEFAULT_WINDOW_HOURS: f64 = 24.0;
pub const DEFAULT_HTTP_BIND: &str = "0.0.0.0:8080";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StationConfig {
    pub id: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SourceConfig {
    pub base_url: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StoreConfig {
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SummaryConfig {
    pub window_hours: Option<f64>,
    /// "two_pass" (default) or "single_pass"
    pub scan: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HttpConfig {
    pub bind: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub station: Option<StationConfig>,
    pub source: Option<SourceConfig>,
    pub store: Option<StoreConfig>,
    pub summary: Option<SummaryConfig>,
    pub http: Option<HttpConfig>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppConfig {
    /// Load configuration from WXTREND_CONFIG path (TOML) if present, with reasonable defaults
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("WXTREND_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
        Self::load_from(path)
    }

    /// Load from an explicit path; a missing file yields defaults
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let cfg = if path.exists() {
            let s = fs::read_to_string(path)?;
            toml::from_str::<AppConfig>(&s)?
        } else {
            AppConfig::default()
        };
        Ok(cfg)
    }

    pub fn station_id(&self) -> String {
        self.station
            .as_ref()
            .and_then(|s| s.id.clone())
            .unwrap_or_else(|| DEFAULT_STATION_ID.to_string())
    }

    pub fn location(&self) -> String {
        self.station
            .as_ref()
            .and_then(|s| s.location.clone())
            .unwrap_or_else(|| DEFAULT_LOCATION.to_string())
    }

    pub fn base_url(&self) -> String {
        self.source
            .as_ref()
            .and_then(|s| s.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    pub fn user_agent(&self) -> String {
        self.source
            .as_ref()
            .and_then(|s| s.user_agent.clone())
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string())
    }

    pub fn store_url(&self) -> String {
        self.store
            .as_ref()
            .and_then(|s| s.url.clone())
            .unwrap_or_else(|| DEFAULT_STORE_URL.to_string())
    }

    pub fn window_hours(&self) -> f64 {
        self.summary
            .as_ref()
            .and_then(|s| s.window_hours)
            .unwrap_or(DEFAULT_WINDOW_HOURS)
    }

    /// True when summaries should use one full scan instead of two reads
    pub fn single_pass_scan(&self) -> bool {
        self.summary
            .as_ref()
            .and_then(|s| s.scan.as_deref())
            .map(|scan| scan == "single_pass")
            .unwrap_or(false)
    }

    /// Get HTTP bind address (default 0.0.0.0:8080)
    pub fn http_bind(&self) -> String {
        self.http
            .as_ref()
            .and_then(|h| h.bind.clone())
            .unwrap_or_else(|| DEFAULT_HTTP_BIND.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.http_bind(), "0.0.0.0:8080");
        assert_eq!(cfg.station_id(), "KANE");
        assert_eq!(cfg.location(), "Plymouth, MN");
        assert_eq!(cfg.window_hours(), 24.0);
        assert_eq!(cfg.store_url(), "sqlite://wxtrend.db");
        assert!(!cfg.single_pass_scan());
    }

    #[test]
    fn missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = AppConfig::load_from(dir.path().join("nope.toml")).unwrap();
        assert_eq!(cfg.base_url(), "https://api.weather.gov");
    }

    #[test]
    fn reads_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[station]
id = "KMSP"
location = "Minneapolis, MN"

[source]
user_agent = "wxtrend (ops@example.com)"

[store]
url = "mysql://wx:wx@db/wx"

[summary]
window_hours = 6.0
scan = "single_pass"

[http]
bind = "127.0.0.1:9000"
"#,
        )
        .unwrap();

        let cfg = AppConfig::load_from(&path).unwrap();
        assert_eq!(cfg.station_id(), "KMSP");
        assert_eq!(cfg.location(), "Minneapolis, MN");
        assert_eq!(cfg.user_agent(), "wxtrend (ops@example.com)");
        assert_eq!(cfg.store_url(), "mysql://wx:wx@db/wx");
        assert_eq!(cfg.window_hours(), 6.0);
        assert!(cfg.single_pass_scan());
        assert_eq!(cfg.http_bind(), "127.0.0.1:9000");
    }

    #[test]
    fn rejects_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[station\nid = ").unwrap();
        assert!(matches!(
            AppConfig::load_from(&path),
            Err(ConfigError::Toml(_))
        ));
    }
}
