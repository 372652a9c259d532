use serde::Deserialize;

/// Top-level application configuration.
/// Loaded from environment variables (`SITE__SECTION__KEY`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Release catalogue settings
    #[serde(default)]
    pub releases: ReleasesConfig,
    /// Public site settings used by the page templates
    #[serde(default)]
    pub site: SiteConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to (default: 0.0.0.0)
    #[serde(default = "default_host")]
    pub host: String,
    /// HTTP port (default: 8080)
    #[serde(default = "default_port")]
    pub port: u16,
    /// Log level used when `RUST_LOG` is unset (default: info)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Mount point of the downloads router (default: /downloads)
    #[serde(default = "default_downloads_prefix")]
    pub downloads_prefix: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReleasesConfig {
    /// Path of the JSON release manifest
    #[serde(default = "default_manifest_path")]
    pub manifest_path: String,
    /// Seconds between manifest reloads, 0 disables reloading (default: 300)
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Project name shown in page headers
    #[serde(default = "default_site_name")]
    pub name: String,
    /// Absolute origin for canonical links, e.g. `https://openrct2.org`
    #[serde(default)]
    pub base_url: Option<String>,
}

impl AppConfig {
    /// Load config from environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let cfg = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("SITE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        cfg.try_deserialize()
    }
}

impl SiteConfig {
    /// Base URL without a trailing slash, or an empty string for relative links.
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .map(|url| url.trim_end_matches('/'))
            .unwrap_or("")
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            downloads_prefix: default_downloads_prefix(),
        }
    }
}

impl Default for ReleasesConfig {
    fn default() -> Self {
        Self {
            manifest_path: default_manifest_path(),
            refresh_interval_secs: default_refresh_interval(),
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: default_site_name(),
            base_url: None,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_downloads_prefix() -> String {
    "/downloads".to_string()
}
fn default_manifest_path() -> String {
    "./releases/manifest.json".to_string()
}
fn default_refresh_interval() -> u64 {
    300
}
fn default_site_name() -> String {
    "OpenRCT2".to_string()
}
