use std::sync::Mutex;

use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::llm::Provider;

/// Credential types stored per provider.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type")]
pub enum Credential {
    #[serde(rename = "api_key")]
    ApiKey { key: String },
}

/// Where a provider's key would come from right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    Stored,
    Env,
    Missing,
}

impl KeySource {
    pub fn label(self) -> &'static str {
        match self {
            KeySource::Stored => "API key ✓",
            KeySource::Env => "API key (env) ✓",
            KeySource::Missing => "not authenticated",
        }
    }
}

/// Manages credential storage in SQLite.
///
/// Shares a database with [`Config`](crate::config::Config): pass the
/// same path to both.
pub struct AuthStorage {
    conn: Mutex<Connection>,
}

impl AuthStorage {
    /// Open or create a credentials table in the given database path.
    /// Use `":memory:"` for tests.
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path).context("failed to open credentials database")?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS credentials (
                provider TEXT PRIMARY KEY,
                data     TEXT NOT NULL
            )",
        )
        .context("failed to create credentials table")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Get credential for a provider.
    pub fn get(&self, provider: &str) -> Result<Option<Credential>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT data FROM credentials WHERE provider = ?1")?;
        let mut rows = stmt.query([provider])?;
        match rows.next()? {
            Some(row) => {
                let json: String = row.get(0)?;
                let cred: Credential = serde_json::from_str(&json)?;
                Ok(Some(cred))
            }
            None => Ok(None),
        }
    }

    /// Store credential for a provider (upsert).
    pub fn set(&self, provider: &str, credential: Credential) -> Result<()> {
        let json = serde_json::to_string(&credential)?;
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO credentials (provider, data) VALUES (?1, ?2)
             ON CONFLICT(provider) DO UPDATE SET data = excluded.data",
            [provider, &json],
        )?;
        Ok(())
    }

    /// Remove credential for a provider.
    pub fn remove(&self, provider: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM credentials WHERE provider = ?1", [provider])?;
        Ok(())
    }

    /// Get the API key for a provider.
    /// Priority: stored API key → environment variable.
    pub fn api_key(&self, provider: Provider) -> Result<Option<String>> {
        if let Some(Credential::ApiKey { key }) = self.get(provider.as_str())? {
            return Ok(Some(key));
        }

        if let Ok(key) = std::env::var(provider.env_var())
            && !key.is_empty()
        {
            return Ok(Some(key));
        }

        Ok(None)
    }

    /// Report where the key for `provider` would be read from.
    pub fn key_source(&self, provider: Provider) -> Result<KeySource> {
        if self.get(provider.as_str())?.is_some() {
            return Ok(KeySource::Stored);
        }
        let from_env = std::env::var(provider.env_var())
            .map(|k| !k.is_empty())
            .unwrap_or(false);
        Ok(if from_env {
            KeySource::Env
        } else {
            KeySource::Missing
        })
    }
}
