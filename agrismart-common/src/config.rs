//! Bootstrap configuration loading
//!
//! Configuration is read once at start-up and is immutable afterwards.
//!
//! # Settings Sources Priority
//!
//! 1. Command-line arguments (`--bind`, `--log-level`, `--accept-invalid-certs`)
//! 2. TOML configuration file, located by:
//!    - `--config <path>`
//!    - `AGRISMART_CONFIG` environment variable
//!    - `<config_dir>/agrismart/agrismart.toml`
//! 3. Built-in defaults (code constants)
//!
//! A missing TOML file is not fatal: a warning is logged and defaults apply.

use crate::{Error, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "AGRISMART_CONFIG";

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";
pub const DEFAULT_USER_AGENT: &str = "AgriSmartAudit/1.0";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// One product-registry endpoint
///
/// Mirrors are queried in list order; a match on an earlier mirror is final.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct MirrorSpec {
    /// Scheme + host, e.g. `https://world.openfoodfacts.org`
    pub base_url: String,
    /// Category label reported in audit results
    pub label: String,
}

impl MirrorSpec {
    pub fn new(base_url: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            label: label.into(),
        }
    }
}

/// The four registries consulted when no mirror list is configured
pub fn default_mirrors() -> Vec<MirrorSpec> {
    vec![
        MirrorSpec::new("https://world.openfoodfacts.org", "FOOD REGISTRY (GLOBAL)"),
        MirrorSpec::new("https://in.openfoodfacts.org", "FOOD REGISTRY (INDIA)"),
        MirrorSpec::new("https://world.openproductfacts.org", "HOUSEHOLD REGISTRY"),
        MirrorSpec::new("https://world.openbeautyfacts.org", "BEAUTY & PERSONAL CARE"),
    ]
}

/// Outbound registry client settings
#[derive(Debug, Clone, Deserialize)]
pub struct RegistryConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Skip TLS certificate verification for mirror requests.
    ///
    /// Off unless explicitly enabled.
    #[serde(default)]
    pub accept_invalid_certs: bool,

    #[serde(default = "default_mirrors")]
    pub mirrors: Vec<MirrorSpec>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            accept_invalid_certs: false,
            mirrors: default_mirrors(),
        }
    }
}

impl RegistryConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
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

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    /// HTTP listen address
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Largest accepted `/scan` request body
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub registry: RegistryConfig,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            max_upload_bytes: default_max_upload_bytes(),
            logging: LoggingConfig::default(),
            registry: RegistryConfig::default(),
        }
    }
}

fn default_bind_addr() -> String {
    DEFAULT_BIND_ADDR.to_string()
}

fn default_max_upload_bytes() -> usize {
    DEFAULT_MAX_UPLOAD_BYTES
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Command-line configuration overrides
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub bind_addr: Option<String>,
    pub log_level: Option<String>,
    pub accept_invalid_certs: Option<bool>,
}

impl TomlConfig {
    /// Parse and validate TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut config: TomlConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Apply CLI overrides on top of file values, then re-validate
    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) -> Result<()> {
        if let Some(bind_addr) = overrides.bind_addr {
            self.bind_addr = bind_addr;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if let Some(flag) = overrides.accept_invalid_certs {
            self.registry.accept_invalid_certs = flag;
        }
        self.validate()
    }

    /// Parsed listen address
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.bind_addr
            .parse()
            .map_err(|e| Error::Config(format!("Invalid bind_addr '{}': {}", self.bind_addr, e)))
    }

    fn normalize(&mut self) {
        for mirror in &mut self.registry.mirrors {
            let trimmed = mirror.base_url.trim().trim_end_matches('/').to_string();
            mirror.base_url = trimmed;
        }
    }

    /// Reject configurations the service cannot run with
    pub fn validate(&self) -> Result<()> {
        self.socket_addr()?;

        if !crate::logging::is_valid_level(&self.logging.level) {
            return Err(Error::Config(format!(
                "Invalid log level '{}' (expected trace, debug, info, warn or error)",
                self.logging.level
            )));
        }

        if self.max_upload_bytes == 0 {
            return Err(Error::Config("max_upload_bytes must be greater than 0".to_string()));
        }

        if self.registry.timeout_secs == 0 {
            return Err(Error::Config("registry.timeout_secs must be greater than 0".to_string()));
        }

        if self.registry.mirrors.is_empty() {
            return Err(Error::Config("registry.mirrors must list at least one mirror".to_string()));
        }

        for mirror in &self.registry.mirrors {
            if !(mirror.base_url.starts_with("http://") || mirror.base_url.starts_with("https://")) {
                return Err(Error::Config(format!(
                    "Mirror '{}' has unsupported base_url '{}'",
                    mirror.label, mirror.base_url
                )));
            }
            if mirror.label.trim().is_empty() {
                return Err(Error::Config(format!(
                    "Mirror {} has an empty label",
                    mirror.base_url
                )));
            }
        }

        Ok(())
    }
}

/// Where the loaded configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Parsed from this file
    File(PathBuf),
    /// Resolved path does not exist; built-in defaults in use
    Missing(PathBuf),
    /// No config directory on this platform; built-in defaults in use
    NoConfigDir,
}

impl ConfigSource {
    /// Report the source; call once tracing is initialized
    pub fn log(&self) {
        match self {
            ConfigSource::File(path) => {
                info!("Loaded TOML configuration from {}", path.display())
            }
            ConfigSource::Missing(path) => warn!(
                "Config file {} not found, using built-in defaults",
                path.display()
            ),
            ConfigSource::NoConfigDir => {
                warn!("Could not determine config directory, using built-in defaults")
            }
        }
    }
}

/// Configuration plus the source it was read from
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: TomlConfig,
    pub source: ConfigSource,
}

/// Locates and loads the bootstrap TOML file
pub struct ConfigResolver {
    cli_path: Option<PathBuf>,
}

impl ConfigResolver {
    pub fn new(cli_path: Option<PathBuf>) -> Self {
        Self { cli_path }
    }

    /// Path that would be loaded, following CLI > ENV > default location
    pub fn resolve_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.cli_path {
            return Some(path.clone());
        }

        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            if !path.trim().is_empty() {
                return Some(PathBuf::from(path));
            }
        }

        default_config_path()
    }

    /// Load configuration, falling back to defaults when no file exists.
    ///
    /// Nothing is logged here: this runs before tracing is initialized, so
    /// the caller reports `LoadedConfig::source` afterwards.
    pub fn load(&self) -> Result<LoadedConfig> {
        let (config, source) = match self.resolve_path() {
            Some(path) if path.exists() => (TomlConfig::from_file(&path)?, ConfigSource::File(path)),
            Some(path) => (TomlConfig::default(), ConfigSource::Missing(path)),
            None => (TomlConfig::default(), ConfigSource::NoConfigDir),
        };
        Ok(LoadedConfig { config, source })
    }
}

/// `<config_dir>/agrismart/agrismart.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("agrismart").join("agrismart.toml"))
}
