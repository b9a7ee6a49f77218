//! # Session Store
//!
//! Key-value persistence for the hinted session (role name plus wallet
//! address). The hint only decides whether a silent restore is attempted on
//! mount; the role itself is always re-resolved from chain state.

use async_trait::async_trait;
use oath_types::{Address, Role};
use std::collections::HashMap;
use std::sync::Mutex;
use thiserror::Error;
use tracing::debug;

/// Storage key for the persisted role name.
pub const ROLE_KEY: &str = "oath-role";

/// Storage key for the persisted wallet address.
pub const WALLET_KEY: &str = "oath-wallet";

// =============================================================================
// ERRORS
// =============================================================================

/// Failures from the session store backend.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backend could not be reached or refused the operation.
    #[error("store backend unavailable: {0}")]
    Unavailable(String),
}

// =============================================================================
// PORT
// =============================================================================

/// Port over the host's key-value persistence.
///
/// Implementations must tolerate absent keys; `get` of a never-written key
/// returns `Ok(None)`.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Reads the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Writes `value` under `key`, replacing any prior value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Removes `key`. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

// =============================================================================
// PERSISTED SESSION HELPERS
// =============================================================================

/// A persisted session hint: what was connected last time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedSession {
    /// The wallet address of the last session.
    pub address: Address,
    /// The role resolved in the last session. Display hint only.
    pub role: Role,
}

/// Persists the session hint under the well-known keys.
pub async fn save_session(
    store: &dyn SessionStore,
    address: &Address,
    role: Role,
) -> Result<(), StoreError> {
    store.set(WALLET_KEY, &address.to_hex()).await?;
    store.set(ROLE_KEY, role.as_str()).await?;
    debug!(address = %address, role = %role.as_str(), "session persisted");
    Ok(())
}

/// Loads the persisted session hint, if both keys are present and parse.
///
/// A corrupt or partial record yields `None` rather than an error; the
/// caller simply skips the silent restore.
pub async fn load_persisted(store: &dyn SessionStore) -> Result<Option<PersistedSession>, StoreError> {
    let Some(raw_address) = store.get(WALLET_KEY).await? else {
        return Ok(None);
    };
    let Some(raw_role) = store.get(ROLE_KEY).await? else {
        return Ok(None);
    };

    let (Ok(address), Ok(role)) = (raw_address.parse::<Address>(), raw_role.parse::<Role>()) else {
        debug!("persisted session unparseable; ignoring");
        return Ok(None);
    };

    Ok(Some(PersistedSession { address, role }))
}

/// Removes both session keys.
pub async fn clear_session(store: &dyn SessionStore) -> Result<(), StoreError> {
    store.remove(ROLE_KEY).await?;
    store.remove(WALLET_KEY).await?;
    Ok(())
}

// =============================================================================
// IN-MEMORY ADAPTER
// =============================================================================

/// In-memory session store for tests and headless runs.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemorySessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries().remove(key);
        Ok(())
    }
}
