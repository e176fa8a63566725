//! Layered configuration
//!
//! Config is loaded with three layers of precedence (highest wins):
//! 1. Environment variables: `PORTRAIT_RIG_SITE_URL`, `PORTRAIT_RIG_LOCALE`
//! 2. Project-local: `.portrait-rig/config.toml`
//! 3. Global: `<config dir>/portrait-rig/config.toml`

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    catalog::{
        CatalogLayout, FALLBACK_LOCALE, HttpCatalog,
        http::{DEFAULT_SITE_URL, DEFAULT_TIMEOUT_SECS},
    },
    foundation::{
        core::Canvas,
        error::{RigError, RigResult},
    },
    script::ScriptConfig,
};

pub const ENV_SITE_URL: &str = "PORTRAIT_RIG_SITE_URL";
pub const ENV_LOCALE: &str = "PORTRAIT_RIG_LOCALE";

/// `[catalog]` table. Unset fields defer to lower layers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSection {
    #[serde(default)]
    pub site_url: Option<String>,
    #[serde(default)]
    pub catalog_dir: Option<String>,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// `[script]` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScriptSection {
    #[serde(default)]
    pub canvas_width: Option<u32>,
    #[serde(default)]
    pub canvas_height: Option<u32>,
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub data_dir: Option<String>,
}

/// Top-level config file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RigConfigFile {
    #[serde(default)]
    pub catalog: CatalogSection,
    #[serde(default)]
    pub script: ScriptSection,
}

/// Resolved configuration with defaults and environment overrides applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RigConfig {
    pub site_url: String,
    pub layout: CatalogLayout,
    pub locale: String,
    pub timeout: Duration,
    pub script: ScriptConfig,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            site_url: DEFAULT_SITE_URL.to_string(),
            layout: CatalogLayout::default(),
            locale: FALLBACK_LOCALE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            script: ScriptConfig::default(),
        }
    }
}

impl RigConfig {
    /// Load config with layered precedence: global < project < env vars
    pub fn load() -> RigResult<Self> {
        let mut config = RigConfigFile::default();

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                let global = Self::load_file(&global_path)?;
                Self::merge_into(&mut config, global);
            }
        }

        let local_path = PathBuf::from(".portrait-rig/config.toml");
        if local_path.exists() {
            let local = Self::load_file(&local_path)?;
            Self::merge_into(&mut config, local);
        }

        Self::apply_env_overrides(&mut config, |key| std::env::var(key).ok());
        Self::resolve(config)
    }

    /// Load config from a specific file path only, then apply env overrides.
    pub fn load_from_file(path: &Path) -> RigResult<Self> {
        let mut config = Self::load_file(path)?;
        Self::apply_env_overrides(&mut config, |key| std::env::var(key).ok());
        Self::resolve(config)
    }

    pub fn http_catalog(&self) -> HttpCatalog {
        HttpCatalog::new(self.site_url.clone(), self.layout.clone(), self.timeout)
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("portrait-rig").join("config.toml"))
    }

    fn load_file(path: &Path) -> RigResult<RigConfigFile> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| {
            RigError::config(format!("failed to parse {}: {e}", path.display()))
        })
    }

    fn merge_into(base: &mut RigConfigFile, overlay: RigConfigFile) {
        let c = overlay.catalog;
        if c.site_url.is_some() {
            base.catalog.site_url = c.site_url;
        }
        if c.catalog_dir.is_some() {
            base.catalog.catalog_dir = c.catalog_dir;
        }
        if c.locale.is_some() {
            base.catalog.locale = c.locale;
        }
        if c.timeout_secs.is_some() {
            base.catalog.timeout_secs = c.timeout_secs;
        }

        let s = overlay.script;
        if s.canvas_width.is_some() {
            base.script.canvas_width = s.canvas_width;
        }
        if s.canvas_height.is_some() {
            base.script.canvas_height = s.canvas_height;
        }
        if s.origin.is_some() {
            base.script.origin = s.origin;
        }
        if s.data_dir.is_some() {
            base.script.data_dir = s.data_dir;
        }
    }

    fn apply_env_overrides(config: &mut RigConfigFile, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_SITE_URL) {
            config.catalog.site_url = Some(url);
        }
        if let Some(locale) = lookup(ENV_LOCALE) {
            config.catalog.locale = Some(locale);
        }
    }

    fn resolve(file: RigConfigFile) -> RigResult<Self> {
        let defaults = ScriptConfig::default();
        let canvas = Canvas::new(
            file.script.canvas_width.unwrap_or(defaults.canvas.width),
            file.script.canvas_height.unwrap_or(defaults.canvas.height),
        )
        .map_err(|e| RigError::config(e.to_string()))?;

        let timeout_secs = file.catalog.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(RigError::config("catalog.timeout_secs must be > 0"));
        }

        Ok(Self {
            site_url: file
                .catalog
                .site_url
                .unwrap_or_else(|| DEFAULT_SITE_URL.to_string()),
            layout: file
                .catalog
                .catalog_dir
                .map(|catalog_dir| CatalogLayout { catalog_dir })
                .unwrap_or_default(),
            locale: file
                .catalog
                .locale
                .unwrap_or_else(|| FALLBACK_LOCALE.to_string()),
            timeout: Duration::from_secs(timeout_secs),
            script: ScriptConfig {
                canvas,
                origin: file.script.origin.unwrap_or(defaults.origin),
                data_dir: file.script.data_dir.unwrap_or(defaults.data_dir),
            },
        })
    }
}
