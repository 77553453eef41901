//! Account list management

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::types::Account;

/// Which account kinds the current flow wants to offer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountFilter {
    All,
    /// Cloud-service accounts only (interactive content without a local server)
    CloudOnly,
    /// Local server accounts only (static content to a private server)
    LocalOnly,
}

impl AccountFilter {
    fn accepts(self, account: &Account) -> bool {
        match self {
            Self::All => true,
            Self::CloudOnly => account.is_cloud,
            Self::LocalOnly => !account.is_cloud,
        }
    }
}

/// Ordered collection of known accounts with a selection.
///
/// The selected account is always index 0. A fetch failure never throws past
/// this component: it surfaces as a display error and the list keeps its
/// last-known-good state.
pub struct AccountList {
    ctx: Arc<ServiceContext>,
    filter: AccountFilter,
    accounts: RwLock<Vec<Account>>,
}

impl AccountList {
    /// Create an account list over the given filter
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>, filter: AccountFilter) -> Self {
        Self {
            ctx,
            filter,
            accounts: RwLock::new(Vec::new()),
        }
    }

    /// Replace the collection with the server's current account list,
    /// filtered to the kinds this flow wants.
    pub async fn refresh(&self) -> CoreResult<()> {
        match self.ctx.server.list_accounts().await {
            Ok(accounts) => {
                let wanted: Vec<Account> = accounts
                    .into_iter()
                    .filter(|a| self.filter.accepts(a))
                    .collect();
                log::info!("Account list refreshed: {} account(s)", wanted.len());
                *self.accounts.write().await = wanted;
                Ok(())
            }
            Err(e) => {
                // Keep prior state untouched.
                self.ctx.report_server_error("Error Retrieving Accounts", &e);
                Err(e)
            }
        }
    }

    /// Move `account` to the front and make it the selection, preserving the
    /// relative order of the rest. No-op when the account is not listed;
    /// idempotent.
    pub async fn select(&self, account: &Account) {
        let mut accounts = self.accounts.write().await;
        if let Some(pos) = accounts.iter().position(|a| a.same_identity(account)) {
            let chosen = accounts.remove(pos);
            accounts.insert(0, chosen);
        }
    }

    /// Select the account with the given `(server, name)` identity, if present
    pub async fn select_identity(&self, server: &str, name: &str) {
        let probe = Account::new(server, name, false);
        self.select(&probe).await;
    }

    /// The current selection: the first entry, or `None` when the list is empty
    pub async fn selected_account(&self) -> Option<Account> {
        self.accounts.read().await.first().cloned()
    }

    /// Snapshot of the current ordering
    pub async fn accounts(&self) -> Vec<Account> {
        self.accounts.read().await.clone()
    }

    pub async fn is_empty(&self) -> bool {
        self.accounts.read().await.is_empty()
    }

    /// The selection, or a validation error for flows that require one
    pub async fn require_selected(&self) -> CoreResult<Account> {
        self.selected_account()
            .await
            .ok_or(CoreError::NoAccountSelected)
    }
}
