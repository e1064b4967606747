//! # Store Configuration
//!
//! Settings for the database pool and the cart store's behaviour switches.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     SHOPPINGCART_DB_PATH=./data/cart.db                                │
//! │     SHOPPINGCART_DELETE_MODE=strict                                    │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/shoppingcart/shoppingcart.toml (Linux)                   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     lenient deletes, product references not checked                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [database]
//! path = "./data/shoppingcart.db"
//! max_connections = 5
//!
//! [cart]
//! delete_mode = "strict"            # lenient | strict
//! enforce_product_reference = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, info, warn};

use crate::error::{PersistenceError, PersistenceResult};

pub const ENV_DB_PATH: &str = "SHOPPINGCART_DB_PATH";
pub const ENV_MAX_CONNECTIONS: &str = "SHOPPINGCART_MAX_CONNECTIONS";
pub const ENV_DELETE_MODE: &str = "SHOPPINGCART_DELETE_MODE";
pub const ENV_ENFORCE_PRODUCT_REFERENCE: &str = "SHOPPINGCART_ENFORCE_PRODUCT_REFERENCE";

// =============================================================================
// Delete Mode
// =============================================================================

/// What deleting a cart row that does not exist means.
///
/// ```text
/// LENIENT (Default)                   │  STRICT
/// ─────────────────                   │  ──────
/// 0 rows affected → Ok(())            │  0 rows affected → Err(NotFound)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteMode {
    /// Deleting a missing row is a silent no-op.
    #[default]
    Lenient,

    /// Deleting a missing row fails with `PersistenceError::NotFound`.
    Strict,
}

impl std::fmt::Display for DeleteMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeleteMode::Lenient => write!(f, "lenient"),
            DeleteMode::Strict => write!(f, "strict"),
        }
    }
}

impl FromStr for DeleteMode {
    type Err = PersistenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lenient" => Ok(DeleteMode::Lenient),
            "strict" => Ok(DeleteMode::Strict),
            other => Err(PersistenceError::InvalidConfig(format!(
                "unknown delete mode '{}', expected lenient or strict",
                other
            ))),
        }
    }
}

// =============================================================================
// Cart Settings
// =============================================================================

/// Behaviour switches for the cart store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CartSettings {
    /// How a delete that matches no row is reported.
    #[serde(default)]
    pub delete_mode: DeleteMode,

    /// Reject cart rows whose product id does not exist.
    /// Default: false (any product id is accepted)
    #[serde(default)]
    pub enforce_product_reference: bool,
}

// =============================================================================
// Database Settings
// =============================================================================

/// Pool settings as they appear in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// Path to the SQLite database file, or `:memory:`.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,

    #[serde(default = "default_true")]
    pub run_migrations: bool,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("shoppingcart.db")
}

fn default_max_connections() -> u32 {
    5
}

fn default_min_connections() -> u32 {
    1
}

fn default_connect_timeout() -> u64 {
    30
}

fn default_idle_timeout() -> u64 {
    600
}

fn default_true() -> bool {
    true
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: default_db_path(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            run_migrations: true,
        }
    }
}

// =============================================================================
// Store Configuration
// =============================================================================

/// Complete store configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub cart: CartSettings,
}

impl StoreConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (shoppingcart.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> PersistenceResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading store config from file");
                config = Self::from_toml(&std::fs::read_to_string(&path)?)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load store config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses a TOML document. Missing sections and keys take defaults.
    pub fn from_toml(contents: &str) -> PersistenceResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> PersistenceResult<()> {
        let db = &self.database;

        if db.path.as_os_str().is_empty() {
            return Err(PersistenceError::InvalidConfig(
                "database.path must not be empty".into(),
            ));
        }

        if db.max_connections == 0 {
            return Err(PersistenceError::InvalidConfig(
                "database.max_connections must be greater than 0".into(),
            ));
        }

        if db.min_connections > db.max_connections {
            return Err(PersistenceError::InvalidConfig(format!(
                "database.min_connections ({}) exceeds max_connections ({})",
                db.min_connections, db.max_connections
            )));
        }

        Ok(())
    }

    /// Applies overrides read through `lookup`, keyed by environment
    /// variable name. Malformed values are errors rather than ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> PersistenceResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_DB_PATH) {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = PathBuf::from(path);
        }

        if let Some(max) = lookup(ENV_MAX_CONNECTIONS) {
            self.database.max_connections = max.trim().parse().map_err(|_| {
                PersistenceError::InvalidConfig(format!(
                    "{} must be a positive integer, got '{}'",
                    ENV_MAX_CONNECTIONS, max
                ))
            })?;
        }

        if let Some(mode) = lookup(ENV_DELETE_MODE) {
            debug!(mode = %mode, "Overriding delete mode from environment");
            self.cart.delete_mode = mode.parse()?;
        }

        if let Some(flag) = lookup(ENV_ENFORCE_PRODUCT_REFERENCE) {
            self.cart.enforce_product_reference = parse_flag(&flag).ok_or_else(|| {
                PersistenceError::InvalidConfig(format!(
                    "{} must be true or false, got '{}'",
                    ENV_ENFORCE_PRODUCT_REFERENCE, flag
                ))
            })?;
        }

        Ok(())
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "shoppingcart", "shoppingcart")
            .map(|dirs| dirs.config_dir().join("shoppingcart.toml"))
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = StoreConfig::default();

        assert_eq!(config.cart.delete_mode, DeleteMode::Lenient);
        assert!(!config.cart.enforce_product_reference);
        assert_eq!(config.database.max_connections, 5);
        assert!(config.database.run_migrations);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = StoreConfig::from_toml(
            r#"
            [cart]
            delete_mode = "strict"
            "#,
        )
        .unwrap();

        assert_eq!(config.cart.delete_mode, DeleteMode::Strict);
        assert!(!config.cart.enforce_product_reference);
        assert_eq!(config.database, DatabaseSettings::default());
    }

    #[test]
    fn test_unknown_delete_mode_in_toml_is_rejected() {
        let result = StoreConfig::from_toml("[cart]\ndelete_mode = \"sometimes\"\n");
        assert!(matches!(result, Err(PersistenceError::InvalidConfig(_))));
    }

    #[test]
    fn test_overrides_win_over_file_values() {
        let mut config = StoreConfig::from_toml(
            r#"
            [database]
            path = "from-file.db"

            [cart]
            delete_mode = "strict"
            "#,
        )
        .unwrap();

        config
            .apply_overrides(lookup_from(&[
                (ENV_DB_PATH, "from-env.db"),
                (ENV_DELETE_MODE, "LENIENT"),
                (ENV_ENFORCE_PRODUCT_REFERENCE, "yes"),
                (ENV_MAX_CONNECTIONS, "8"),
            ]))
            .unwrap();

        assert_eq!(config.database.path, PathBuf::from("from-env.db"));
        assert_eq!(config.cart.delete_mode, DeleteMode::Lenient);
        assert!(config.cart.enforce_product_reference);
        assert_eq!(config.database.max_connections, 8);
    }

    #[test]
    fn test_malformed_overrides_are_errors() {
        let mut config = StoreConfig::default();
        assert!(config
            .apply_overrides(lookup_from(&[(ENV_ENFORCE_PRODUCT_REFERENCE, "maybe")]))
            .is_err());
        assert!(config
            .apply_overrides(lookup_from(&[(ENV_MAX_CONNECTIONS, "-1")]))
            .is_err());
    }

    #[test]
    fn test_validate_rejects_inverted_pool_bounds() {
        let mut config = StoreConfig::default();
        config.database.min_connections = 10;

        assert!(config.validate().is_err());

        config.database.min_connections = 1;
        config.database.max_connections = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shoppingcart.toml");
        std::fs::write(
            &path,
            "[database]\nmax_connections = 3\n\n[cart]\nenforce_product_reference = true\n",
        )
        .unwrap();

        let config = StoreConfig::load(Some(path)).unwrap();
        assert_eq!(config.database.max_connections, 3);
        assert!(config.cart.enforce_product_reference);
    }

    #[test]
    fn test_load_or_default_on_broken_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shoppingcart.toml");
        std::fs::write(&path, "this is = = not toml").unwrap();

        let config = StoreConfig::load_or_default(Some(path));
        assert_eq!(config.cart, CartSettings::default());
    }

    #[test]
    fn test_delete_mode_round_trips_through_display() {
        for mode in [DeleteMode::Lenient, DeleteMode::Strict] {
            assert_eq!(mode.to_string().parse::<DeleteMode>().unwrap(), mode);
        }
    }
}
