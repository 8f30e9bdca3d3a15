//! Key-value configuration storage backed by SQLite, and the resolved
//! settings a run works with.
//!
//! Shares a database with [`AuthStorage`](crate::auth::AuthStorage).
//! Precedence is command-line flag, then stored value, then default.

use std::fmt;
use std::str::FromStr;
use std::sync::Mutex;

use anyhow::{Context, Result, bail};
use rusqlite::Connection;

use crate::consts::{DEFAULT_FIXED_COST, DEFAULT_HORIZON, DEFAULT_PROVIDER};
use crate::llm::Provider;

/// Persistent key-value configuration store.
pub struct Config {
    conn: Mutex<Connection>,
}

impl Config {
    /// Open or create the config table in the given database.
    /// Use `":memory:"` for tests.
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path).context("failed to open config database")?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS config (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
        )
        .context("failed to create config table")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Get a config value by key.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT value FROM config WHERE key = ?1")?;
        let mut rows = stmt.query([key])?;
        match rows.next()? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }

    /// Set a config value (upsert).
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO config (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            [key, value],
        )?;
        Ok(())
    }

    /// Remove a config key.
    pub fn remove(&self, key: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM config WHERE key = ?1", [key])?;
        Ok(())
    }
}

/// Keys accepted by `costlens config`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    Provider,
    Model,
    Horizon,
    FixedCost,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 4] = [
        ConfigKey::Provider,
        ConfigKey::Model,
        ConfigKey::Horizon,
        ConfigKey::FixedCost,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ConfigKey::Provider => "provider",
            ConfigKey::Model => "model",
            ConfigKey::Horizon => "horizon",
            ConfigKey::FixedCost => "fixed_cost",
        }
    }

    /// Reject values that would fail later when the settings are resolved.
    pub fn validate(self, value: &str) -> Result<()> {
        match self {
            ConfigKey::Provider => {
                value.parse::<Provider>()?;
            }
            ConfigKey::FixedCost => {
                let v: f64 = value
                    .trim()
                    .parse()
                    .with_context(|| format!("fixed_cost must be a number, got {value:?}"))?;
                if !v.is_finite() || v < 0.0 {
                    bail!("fixed_cost must be a non-negative number");
                }
            }
            ConfigKey::Model | ConfigKey::Horizon => {
                if value.trim().is_empty() {
                    bail!("{} cannot be empty", self.as_str());
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        ConfigKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s.trim())
            .with_context(|| {
                format!("unknown config key: {s} (expected provider, model, horizon or fixed_cost)")
            })
    }
}

/// Values given on the command line. `None` defers to the store.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub provider: Option<Provider>,
    pub model: Option<String>,
    pub horizon: Option<String>,
}

/// Effective settings for a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub provider: Provider,
    /// `None` means the provider's default model.
    pub model: Option<String>,
    pub horizon: String,
    pub fixed_cost: f64,
}

impl Settings {
    pub fn resolve(config: &Config, overrides: Overrides) -> Result<Self> {
        let provider = match overrides.provider {
            Some(p) => p,
            None => config
                .get(ConfigKey::Provider.as_str())?
                .as_deref()
                .unwrap_or(DEFAULT_PROVIDER)
                .parse()?,
        };

        // A stored model only applies to the provider it was stored with.
        let model = match overrides.model {
            Some(m) => Some(m),
            None if overrides.provider.is_none() => config.get(ConfigKey::Model.as_str())?,
            None => None,
        };

        let horizon = match overrides.horizon {
            Some(h) => h,
            None => config
                .get(ConfigKey::Horizon.as_str())?
                .unwrap_or_else(|| DEFAULT_HORIZON.to_string()),
        };

        let fixed_cost = match config.get(ConfigKey::FixedCost.as_str())? {
            Some(v) => v
                .trim()
                .parse()
                .with_context(|| format!("stored fixed_cost is not a number: {v:?}"))?,
            None => DEFAULT_FIXED_COST,
        };

        Ok(Self {
            provider,
            model,
            horizon,
            fixed_cost,
        })
    }

    /// Model name for display.
    pub fn model_name(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mem_config() -> Config {
        Config::open(":memory:").unwrap()
    }

    #[test]
    fn get_returns_none_for_missing_key() {
        let config = mem_config();
        assert!(config.get("nonexistent").unwrap().is_none());
    }

    #[test]
    fn set_and_get() {
        let config = mem_config();
        config.set("model", "llama-3.3-70b-versatile").unwrap();
        assert_eq!(
            config.get("model").unwrap().unwrap(),
            "llama-3.3-70b-versatile"
        );
    }

    #[test]
    fn set_overwrites_existing() {
        let config = mem_config();
        config.set("horizon", "6 mois").unwrap();
        config.set("horizon", "12 mois").unwrap();
        assert_eq!(config.get("horizon").unwrap().unwrap(), "12 mois");
    }

    #[test]
    fn remove_deletes_key() {
        let config = mem_config();
        config.set("model", "test").unwrap();
        config.remove("model").unwrap();
        assert!(config.get("model").unwrap().is_none());
        config.remove("model").unwrap();
    }

    #[test]
    fn persists_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config-test.db");
        let path_str = path.to_str().unwrap();

        {
            let config = Config::open(path_str).unwrap();
            config.set("horizon", "3 mois").unwrap();
        }

        {
            let config = Config::open(path_str).unwrap();
            assert_eq!(config.get("horizon").unwrap().unwrap(), "3 mois");
        }
    }

    #[test]
    fn defaults_when_nothing_stored() {
        let settings = Settings::resolve(&mem_config(), Overrides::default()).unwrap();
        assert_eq!(settings.provider, Provider::Groq);
        assert_eq!(settings.model, None);
        assert_eq!(settings.model_name(), "llama-3.3-70b-versatile");
        assert_eq!(settings.horizon, "6 mois");
        assert_eq!(settings.fixed_cost, 50_000.0);
    }

    #[test]
    fn stored_values_apply() {
        let config = mem_config();
        config.set("provider", "anthropic").unwrap();
        config.set("model", "claude-haiku").unwrap();
        config.set("horizon", "12 mois").unwrap();
        config.set("fixed_cost", "42000").unwrap();
        let settings = Settings::resolve(&config, Overrides::default()).unwrap();
        assert_eq!(settings.provider, Provider::Anthropic);
        assert_eq!(settings.model_name(), "claude-haiku");
        assert_eq!(settings.horizon, "12 mois");
        assert_eq!(settings.fixed_cost, 42_000.0);
    }

    #[test]
    fn flags_beat_stored_values() {
        let config = mem_config();
        config.set("provider", "anthropic").unwrap();
        config.set("model", "claude-haiku").unwrap();
        config.set("horizon", "12 mois").unwrap();
        let settings = Settings::resolve(
            &config,
            Overrides {
                provider: Some(Provider::Groq),
                model: None,
                horizon: Some("3 mois".to_string()),
            },
        )
        .unwrap();
        assert_eq!(settings.provider, Provider::Groq);
        assert_eq!(settings.model, None);
        assert_eq!(settings.horizon, "3 mois");
    }

    #[test]
    fn key_parsing_and_validation() {
        assert_eq!("fixed_cost".parse::<ConfigKey>().unwrap(), ConfigKey::FixedCost);
        assert!("colour".parse::<ConfigKey>().is_err());
        assert!(ConfigKey::Provider.validate("groq").is_ok());
        assert!(ConfigKey::Provider.validate("openai").is_err());
        assert!(ConfigKey::FixedCost.validate("-1").is_err());
        assert!(ConfigKey::FixedCost.validate("abc").is_err());
        assert!(ConfigKey::Horizon.validate(" ").is_err());
    }
}
