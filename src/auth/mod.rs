pub mod storage;

pub use storage::AuthStorage;

use anyhow::{Context, Result, bail};
use storage::Credential;

use crate::llm::Provider;

/// Save an API key for a provider.
///
/// Shared by the `costlens login` subcommand and tests.
pub fn login(db_path: &str, provider: Provider, key: &str) -> Result<()> {
    let key = key.trim();
    if key.is_empty() {
        bail!("no API key provided");
    }
    let storage = AuthStorage::open(db_path).context("failed to open auth storage")?;
    storage
        .set(
            provider.as_str(),
            Credential::ApiKey {
                key: key.to_string(),
            },
        )
        .context("failed to save credentials")?;
    Ok(())
}

/// Remove stored credentials for a provider.
pub fn logout(db_path: &str, provider: Provider) -> Result<()> {
    let storage = AuthStorage::open(db_path).context("failed to open auth storage")?;
    storage
        .remove(provider.as_str())
        .context("failed to remove credentials")?;
    Ok(())
}
