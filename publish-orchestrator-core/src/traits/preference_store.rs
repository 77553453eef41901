//! Preferred-account persistence abstract Trait

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::CoreResult;
use crate::types::Account;

/// Persists the user's preferred publishing account, so a new deployment
/// defaults to the last account they published with.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// The preferred `(server, name)` identity, if one was ever recorded
    async fn preferred_account(&self) -> CoreResult<Option<(String, String)>>;

    /// Record `account` as the new preferred account
    async fn set_preferred_account(&self, account: &Account) -> CoreResult<()>;
}

/// In-memory preference store.
///
/// Default implementation for frontends without durable preferences and for
/// tests; desktop frontends wrap their own settings storage instead.
#[derive(Default)]
pub struct InMemoryPreferenceStore {
    preferred: RwLock<Option<(String, String)>>,
}

impl InMemoryPreferenceStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PreferenceStore for InMemoryPreferenceStore {
    async fn preferred_account(&self) -> CoreResult<Option<(String, String)>> {
        Ok(self.preferred.read().await.clone())
    }

    async fn set_preferred_account(&self, account: &Account) -> CoreResult<()> {
        *self.preferred.write().await = Some((account.server.clone(), account.name.clone()));
        Ok(())
    }
}
