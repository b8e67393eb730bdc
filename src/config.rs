//! Config model and persistence helpers.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, time::Duration};

/// Top-level configuration stored in `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Billing backend connection settings.
    pub api: ApiCfg,
    /// Where the local key-value session store lives.
    pub storage: StorageCfg,
    /// Log output settings.
    pub logging: LoggingCfg,
}

/// Billing REST backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiCfg {
    /// Base URL without trailing slash, e.g. `http://localhost:5678`.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

/// Local session storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageCfg {
    /// JSON file holding the `user` and `jwt` entries.
    pub path: String,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingCfg {
    /// File the non-blocking appender writes to.
    pub file: String,
}

impl ApiCfg {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load from disk or create defaults when missing.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            let s = fs::read_to_string(path)?;
            Ok(toml::from_str(&s)?)
        } else {
            let cfg = Self::default();
            cfg.save(path)?;
            Ok(cfg)
        }
    }

    /// Persist the config as pretty TOML.
    pub fn save(&self, path: &Path) -> Result<()> {
        let s = toml::to_string_pretty(self)?;
        fs::write(path, s)?;
        Ok(())
    }
}

impl Default for Config {
    /// Defaults match the local development backend.
    fn default() -> Self {
        Self {
            api: ApiCfg {
                base_url: "http://localhost:5678".into(),
                timeout_secs: 30,
            },
            storage: StorageCfg {
                path: "local_storage.json".into(),
            },
            logging: LoggingCfg {
                file: "billed.log".into(),
            },
        }
    }
}
