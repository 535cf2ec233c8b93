//! # Terminal Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     CAIXA_DB_PATH=/srv/loja/caixa.db                                   │
//! │     CAIXA_STORE_NAME="Papelaria Central"                               │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     $CAIXA_CONFIG, or                                                  │
//! │     ~/.config/caixa/caixa.toml (Linux)                                 │
//! │     ~/Library/Application Support/com.caixa.caixa/caixa.toml (macOS)   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [store]
//! name = "Loja Python"
//! pix_key = "loja@example.com"
//!
//! [database]
//! path = "/srv/loja/caixa.db"
//! max_connections = 2
//! connect_timeout_secs = 30
//!
//! [credentials]
//! service = "estoque_db"
//! account = "root"
//! required = false
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use caixa_db::DbConfig;

use crate::error::{AppError, AppResult};

const CONFIG_FILE_NAME: &str = "caixa.toml";
const DATABASE_FILE_NAME: &str = "caixa.db";

// =============================================================================
// Store
// =============================================================================

/// What the operator sees about the shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Shown in the welcome banner.
    #[serde(default = "default_store_name")]
    pub name: String,

    /// Shown when the customer pays by Pix.
    #[serde(default)]
    pub pix_key: Option<String>,
}

fn default_store_name() -> String {
    "Loja Python".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            name: default_store_name(),
            pix_key: None,
        }
    }
}

// =============================================================================
// Database
// =============================================================================

/// Where and how to open the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// Database file. Default: `caixa.db` in the platform data directory.
    #[serde(default)]
    pub path: Option<PathBuf>,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

fn default_max_connections() -> u32 {
    2
}

fn default_connect_timeout() -> u64 {
    30
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: None,
            max_connections: default_max_connections(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

// =============================================================================
// Credentials
// =============================================================================

/// Which password the credential store is asked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialSettings {
    #[serde(default = "default_service")]
    pub service: String,

    #[serde(default = "default_account")]
    pub account: String,

    /// Refuse to start without a password.
    #[serde(default)]
    pub required: bool,
}

fn default_service() -> String {
    "estoque_db".to_string()
}

fn default_account() -> String {
    "root".to_string()
}

impl Default for CredentialSettings {
    fn default() -> Self {
        CredentialSettings {
            service: default_service(),
            account: default_account(),
            required: false,
        }
    }
}

// =============================================================================
// Application Configuration
// =============================================================================

/// Complete terminal configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub credentials: CredentialSettings,
}

impl AppConfig {
    /// Loads configuration from file, then environment, then validates.
    ///
    /// `config_path` wins over `CAIXA_CONFIG`, which wins over the
    /// platform config directory. A missing file means defaults.
    pub fn load(config_path: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self::default();

        let path = config_path
            .or_else(|| std::env::var_os("CAIXA_CONFIG").map(PathBuf::from))
            .or_else(Self::default_config_path);

        if let Some(path) = path {
            if path.exists() {
                info!(?path, "Loading configuration from file");
                let contents = std::fs::read_to_string(&path)
                    .map_err(|e| AppError::Config(format!("{}: {e}", path.display())))?;
                config = Self::from_toml(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Parses a TOML document; absent keys take their defaults.
    pub fn from_toml(contents: &str) -> AppResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Checks values that would only fail later, mid-session.
    pub fn validate(&self) -> AppResult<()> {
        if self.store.name.trim().is_empty() {
            return Err(AppError::Config("store.name must not be empty".into()));
        }

        if self.database.max_connections == 0 {
            return Err(AppError::Config(
                "database.max_connections must be greater than 0".into(),
            ));
        }

        if self.database.connect_timeout_secs == 0 {
            return Err(AppError::Config(
                "database.connect_timeout_secs must be greater than 0".into(),
            ));
        }

        if self.credentials.service.is_empty() || self.credentials.account.is_empty() {
            return Err(AppError::Config(
                "credentials.service and credentials.account must not be empty".into(),
            ));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(path) = var("CAIXA_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = Some(PathBuf::from(path));
        }

        if let Some(name) = var("CAIXA_STORE_NAME") {
            self.store.name = name;
        }

        if let Some(key) = var("CAIXA_PIX_KEY") {
            self.store.pix_key = Some(key);
        }

        if let Some(max) = var("CAIXA_DB_MAX_CONNECTIONS") {
            match max.parse::<u32>() {
                Ok(m) => self.database.max_connections = m,
                Err(_) => warn!(value = %max, "Ignoring invalid CAIXA_DB_MAX_CONNECTIONS"),
            }
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "caixa", "caixa")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// The database file to open.
    pub fn database_path(&self) -> PathBuf {
        if let Some(path) = &self.database.path {
            return path.clone();
        }

        directories::ProjectDirs::from("com", "caixa", "caixa")
            .map(|dirs| dirs.data_dir().join(DATABASE_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(DATABASE_FILE_NAME))
    }

    /// Builds the pool configuration, creating the parent directory.
    pub fn db_config(&self) -> AppResult<DbConfig> {
        let path = self.database_path();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        Ok(DbConfig::new(path)
            .max_connections(self.database.max_connections)
            .connect_timeout(Duration::from_secs(self.database.connect_timeout_secs)))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.store.name, "Loja Python");
        assert_eq!(config.store.pix_key, None);
        assert_eq!(config.credentials.service, "estoque_db");
        assert_eq!(config.credentials.account, "root");
        assert!(!config.credentials.required);
        assert!(config.validate().is_ok());
        assert!(config.database_path().ends_with("caixa.db"));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [store]
            pix_key = "loja@example.com"

            [database]
            path = "/srv/loja/caixa.db"
            "#,
        )
        .unwrap();

        assert_eq!(config.store.name, "Loja Python");
        assert_eq!(config.store.pix_key.as_deref(), Some("loja@example.com"));
        assert_eq!(config.database_path(), PathBuf::from("/srv/loja/caixa.db"));
        assert_eq!(config.database.max_connections, 2);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = AppConfig::from_toml("[database]\nmax_connections = \"muitas\"").unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_config_validation() {
        let mut config = AppConfig::default();

        config.store.name = "  ".to_string();
        assert!(config.validate().is_err());

        config.store.name = "Papelaria".to_string();
        config.database.max_connections = 0;
        assert!(config.validate().is_err());

        config.database.max_connections = 1;
        config.credentials.account = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_environment_overrides() {
        let env: HashMap<&str, &str> = [
            ("CAIXA_DB_PATH", "/tmp/outra.db"),
            ("CAIXA_STORE_NAME", "Papelaria Central"),
            ("CAIXA_PIX_KEY", "11999990000"),
            ("CAIXA_DB_MAX_CONNECTIONS", "4"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.apply_overrides(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.database_path(), PathBuf::from("/tmp/outra.db"));
        assert_eq!(config.store.name, "Papelaria Central");
        assert_eq!(config.store.pix_key.as_deref(), Some("11999990000"));
        assert_eq!(config.database.max_connections, 4);
    }

    #[test]
    fn test_invalid_numeric_override_ignored() {
        let mut config = AppConfig::default();
        config.apply_overrides(|name| (name == "CAIXA_DB_MAX_CONNECTIONS").then(|| "x".to_string()));
        assert_eq!(config.database.max_connections, 2);
    }

    #[test]
    fn test_load_from_explicit_file() {
        let path = std::env::temp_dir().join(format!("caixa-config-{}.toml", std::process::id()));
        std::fs::write(&path, "[store]\nname = \"Loja do Teste\"\n").unwrap();

        let config = AppConfig::load(Some(path.clone())).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.store.name, "Loja do Teste");
    }

    #[test]
    fn test_toml_serialization() {
        let toml_str = toml::to_string_pretty(&AppConfig::default()).unwrap();
        assert!(toml_str.contains("[store]"));
        assert!(toml_str.contains("[credentials]"));
    }
}
