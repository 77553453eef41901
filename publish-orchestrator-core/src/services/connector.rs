//! Account connection orchestration

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use crate::error::CoreResult;
use crate::services::ServiceContext;
use crate::types::{AuthUser, PreAuthToken, ServerInfo};

/// Prefix a pasted cloud setup command must start with
pub const CLOUD_SETUP_PREFIX: &str = "setAccountInfo(";

/// Default delay between auth-completion polls
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// How a connection attempt ended.
///
/// `Incomplete` clears progress but keeps the dialog open for retry;
/// `Failed` dismisses it; `Successful` dismisses it and notifies the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectOutcome {
    Incomplete,
    Successful,
    Failed,
}

/// Coordinates connecting a brand-new publishing account: either a pasted
/// cloud secret token, or a local server auth handshake driven by a
/// claim-URL polling loop.
pub struct AccountConnector {
    ctx: Arc<ServiceContext>,
    poll_interval: Duration,
}

impl AccountConnector {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self {
            ctx,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Override the auth poll interval (tests)
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Cloud path: submit a setup command the user pasted from the cloud
    /// service's dashboard.
    pub async fn connect_cloud(&self, setup_command: &str) -> ConnectOutcome {
        let command = setup_command.trim();
        if !command.starts_with(CLOUD_SETUP_PREFIX) {
            self.ctx.display.show_error(
                "Invalid Command",
                &format!(
                    "The pasted command should begin with {CLOUD_SETUP_PREFIX}. Copy the full \
                     command from your account page and try again."
                ),
            );
            // Format errors keep the dialog open for another paste.
            return ConnectOutcome::Incomplete;
        }

        self.ctx.display.begin_progress("Connecting account...");
        match self.ctx.server.connect_cloud_account(command).await {
            Ok(()) => {
                self.ctx.display.clear_progress();
                log::info!("Cloud account connected");
                ConnectOutcome::Successful
            }
            Err(e) => {
                self.ctx.report_server_error("Error Connecting Account", &e);
                ConnectOutcome::Failed
            }
        }
    }

    /// Local path: register an account for a user who completed the auth
    /// handshake against `server_info`.
    pub async fn connect_local(
        &self,
        server_info: &ServerInfo,
        account_name: &str,
        user: &AuthUser,
        token: &PreAuthToken,
    ) -> ConnectOutcome {
        let Some(user_id) = user.id else {
            self.ctx.display.show_error(
                "Account Not Connected",
                "Authentication did not complete, so the account was not registered.",
            );
            return ConnectOutcome::Failed;
        };

        self.ctx.display.begin_progress("Adding account...");
        match self
            .ctx
            .server
            .register_user_token(&server_info.name, account_name, user_id, token)
            .await
        {
            Ok(()) => {
                self.ctx.display.clear_progress();
                log::info!("Account {account_name} registered on {}", server_info.name);
                ConnectOutcome::Successful
            }
            Err(e) => {
                self.ctx.report_server_error("Account Connect Failed", &e);
                ConnectOutcome::Failed
            }
        }
    }

    /// Full local path: validate the server URL, obtain a pre-auth token,
    /// drive the claim handshake, then register the account.
    pub async fn connect_local_server(
        &self,
        server_url: &str,
        account_name: &str,
        window_closed: watch::Receiver<bool>,
    ) -> ConnectOutcome {
        let url = server_url.trim();
        if url.is_empty() {
            self.ctx.display.show_error(
                "Server Required",
                "Enter the URL of the server to connect an account on.",
            );
            return ConnectOutcome::Incomplete;
        }

        self.ctx.display.begin_progress("Checking server...");
        let info = match self.ctx.server.validate_server_url(url).await {
            Ok(info) => info,
            Err(e) => {
                self.ctx.report_server_error("Server Validation Failed", &e);
                return ConnectOutcome::Failed;
            }
        };
        let token = match self.ctx.server.get_pre_auth_token(&info.name).await {
            Ok(token) => token,
            Err(e) => {
                self.ctx.report_server_error("Error Connecting Account", &e);
                return ConnectOutcome::Failed;
            }
        };
        self.ctx.display.clear_progress();

        match self.wait_for_auth(&info.url, &token, window_closed).await {
            Ok(Some(user)) => self.connect_local(&info, account_name, &user, &token).await,
            // Window closed before the claim completed; the user can retry.
            Ok(None) => ConnectOutcome::Incomplete,
            Err(e) => {
                self.ctx.report_server_error("Account Connect Failed", &e);
                ConnectOutcome::Failed
            }
        }
    }

    /// Drive the local-server auth handshake: open the claim URL in an
    /// external window, then poll "get user from token" until the claim
    /// completes or the window closes.
    ///
    /// A poll that returns an invalid user is the expected pre-completion
    /// state and is ignored, as are transient poll errors. When the
    /// window-closed signal fires, polling halts and one final check
    /// resolves the handshake definitively.
    pub async fn wait_for_auth(
        &self,
        server_url: &str,
        token: &PreAuthToken,
        mut window_closed: watch::Receiver<bool>,
    ) -> CoreResult<Option<AuthUser>> {
        self.ctx.display.open_window(&token.claim_url);

        let mut ticks = tokio::time::interval(self.poll_interval);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

        while !*window_closed.borrow() {
            tokio::select! {
                _ = ticks.tick() => {
                    match self.ctx.server.get_user_from_token(server_url, token).await {
                        Ok(user) if user.is_valid() => return Ok(Some(user)),
                        // Not claimed yet; keep polling.
                        Ok(_) => {}
                        Err(e) => log::debug!("Auth poll not complete yet: {e}"),
                    }
                }
                changed = window_closed.changed() => {
                    if changed.is_err() {
                        // Sender dropped: treat as a closed window.
                        break;
                    }
                }
            }
        }

        // The user closed the window before the poll saw a valid user;
        // resolve success/failure with exactly one more check.
        let user = self.ctx.server.get_user_from_token(server_url, token).await?;
        Ok(user.is_valid().then_some(user))
    }
}
