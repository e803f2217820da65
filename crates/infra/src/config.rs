//! Configuration loading and representation.
//!
//! Everything is read from environment variables. `from_lookup` takes the
//! lookup as a closure so tests never touch the process environment.

use std::path::PathBuf;

use thiserror::Error;

pub const APP_SKU_BATCHES_VAR: &str = "SKUSYNC_APP_SKU_BATCHES";
pub const INVENTORY_SKU_BATCHES_VAR: &str = "SKUSYNC_INVENTORY_SKU_BATCHES";
pub const WAREHOUSES_VAR: &str = "SKUSYNC_WAREHOUSES";
pub const DATABASE_URL_VAR: &str = "SKUSYNC_DATABASE_URL";
pub const DB_MAX_CONNECTIONS_VAR: &str = "SKUSYNC_DB_MAX_CONNECTIONS";

const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Postgres connection settings for the write sink.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl core::fmt::Debug for DatabaseConfig {
    // The URL usually carries credentials.
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &"<redacted>")
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

/// Settings for one `skusync` process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// JSON array of application SkuBatch records.
    pub app_sku_batches_path: PathBuf,
    /// JSON array of inventory SkuBatch records (also the inventory id list).
    pub inventory_sku_batches_path: PathBuf,
    /// JSON array of warehouses.
    pub warehouses_path: PathBuf,
    /// When absent, operations are rendered and logged instead of applied.
    pub database: Option<DatabaseConfig>,
}

impl SyncConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &'static str| non_blank(key).ok_or(ConfigError::Missing(key));

        let database = match non_blank(DATABASE_URL_VAR) {
            Some(url) => {
                let max_connections = match non_blank(DB_MAX_CONNECTIONS_VAR) {
                    Some(raw) => match raw.trim().parse::<u32>() {
                        Ok(n) if n > 0 => n,
                        _ => {
                            return Err(ConfigError::Invalid {
                                key: DB_MAX_CONNECTIONS_VAR,
                                value: raw,
                            });
                        }
                    },
                    None => DEFAULT_MAX_CONNECTIONS,
                };
                Some(DatabaseConfig {
                    url,
                    max_connections,
                })
            }
            None => None,
        };

        Ok(Self {
            app_sku_batches_path: required(APP_SKU_BATCHES_VAR)?.into(),
            inventory_sku_batches_path: required(INVENTORY_SKU_BATCHES_VAR)?.into(),
            warehouses_path: required(WAREHOUSES_VAR)?.into(),
            database,
        })
    }

    pub fn is_dry_run(&self) -> bool {
        self.database.is_none()
    }
}
