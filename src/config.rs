//! Configuration management for catalogue-browser
//!
//! Config file location:
//! - Linux: ~/.config/catalogue-browser/config.toml
//! - macOS: ~/Library/Application Support/catalogue-browser/config.toml
//! - Windows: %APPDATA%/catalogue-browser/config.toml
//!
//! You can override the config location by setting `CATALOGUE_BROWSER_CONFIG_PATH`.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::render::Profile;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Catalogue API configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Cover image hosts
    #[serde(default)]
    pub images: ImageConfig,

    /// Paging and presentation defaults
    #[serde(default)]
    pub browse: BrowseConfig,

    /// Plans and contact link
    #[serde(default)]
    pub purchase: PurchaseConfig,

    /// Local web UI
    #[serde(default)]
    pub ui: UiConfig,
}

impl Config {
    /// Load configuration from file or create default
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

            let config: Config = toml::from_str(&content).with_context(|| {
                format!("Failed to parse config from {}", config_path.display())
            })?;

            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml = toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        fs::write(&config_path, toml)
            .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var("CATALOGUE_BROWSER_CONFIG_PATH") {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return Ok(PathBuf::from(trimmed));
            }
        }

        let proj_dirs = ProjectDirs::from("com", "forgemypc", "catalogue-browser")
            .context("Could not determine project directories")?;

        Ok(proj_dirs.config_dir().join("config.toml"))
    }

    /// Create default config file if it doesn't exist
    pub fn init() -> Result<Self> {
        let config = Self::load()?;

        let config_path = Self::config_path()?;
        if !config_path.exists() {
            config.save()?;
        }

        Ok(config)
    }

    /// Page size with the lower bound applied.
    pub fn page_size(&self) -> usize {
        self.browse.page_size.max(1)
    }
}

/// Catalogue API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Endpoint returning the JSON array of game records
    #[serde(default = "default_catalogue_url")]
    pub catalogue_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Whether to verify SSL certificates
    #[serde(default = "default_true")]
    pub verify_ssl: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            catalogue_url: default_catalogue_url(),
            timeout_seconds: default_timeout(),
            verify_ssl: default_true(),
        }
    }
}

fn default_catalogue_url() -> String {
    "https://gameboxbybear.pythonanywhere.com/api/onennabe".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

/// Cover image hosts. Templates substitute `{appid}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    #[serde(default = "default_primary_template")]
    pub primary_template: String,

    #[serde(default = "default_secondary_template")]
    pub secondary_template: String,

    #[serde(default = "default_placeholder_url")]
    pub placeholder_url: String,

    /// Timeout for a single cover probe
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_seconds: u64,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            primary_template: default_primary_template(),
            secondary_template: default_secondary_template(),
            placeholder_url: default_placeholder_url(),
            probe_timeout_seconds: default_probe_timeout(),
        }
    }
}

fn default_primary_template() -> String {
    "https://shared.fastly.steamstatic.com/store_item_assets/steam/apps/{appid}/library_600x900_2x.jpg"
        .to_string()
}

fn default_secondary_template() -> String {
    "https://barryhamsy.github.io/gamelist/{appid}.jpg".to_string()
}

fn default_placeholder_url() -> String {
    "https://barryhamsy.github.io/gamelist/placeholder.jpg".to_string()
}

fn default_probe_timeout() -> u64 {
    10
}

/// Paging and presentation defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowseConfig {
    /// Cards per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Presentation profile (`full` or `compact`)
    #[serde(default)]
    pub profile: Profile,
}

impl Default for BrowseConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            profile: Profile::default(),
        }
    }
}

fn default_page_size() -> usize {
    50
}

/// Plans offered in the Plans view and the contact link target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseConfig {
    #[serde(default = "default_contact_base_url")]
    pub contact_base_url: String,

    #[serde(default = "default_plans")]
    pub plans: Vec<String>,
}

impl Default for PurchaseConfig {
    fn default() -> Self {
        Self {
            contact_base_url: default_contact_base_url(),
            plans: default_plans(),
        }
    }
}

fn default_contact_base_url() -> String {
    "https://wa.me/60138254541".to_string()
}

fn default_plans() -> Vec<String> {
    vec![
        "Monthly".to_string(),
        "Yearly".to_string(),
        "Lifetime".to_string(),
    ]
}

/// Local web UI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

fn default_port() -> u16 {
    3000
}

/// Get configuration file path for display purposes
pub fn get_config_path() -> Result<String> {
    let path = Config::config_path()?;
    Ok(path.display().to_string())
}

pub(crate) fn parse_bool_value(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
