//! Remote server operations abstract Trait

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::{
    Account, AppInfo, AuthUser, DeploymentFiles, DeploymentRecord, GeneratedAppName, PreAuthToken,
    ServerInfo,
};

/// The opaque server-operations collaborator.
///
/// Every method is an async request/response round trip; failures carry a
/// human-readable message and the core never interprets error codes beyond
/// display text. Frontends implement this over their own RPC layer.
#[async_trait]
pub trait ServerOperations: Send + Sync {
    /// List the accounts the client currently knows about
    async fn list_accounts(&self) -> CoreResult<Vec<Account>>;

    /// Check that a server URL points at a publishing server and resolve
    /// its canonical info
    async fn validate_server_url(&self, url: &str) -> CoreResult<ServerInfo>;

    /// Request a pre-auth token and claim URL from a local server
    async fn get_pre_auth_token(&self, server_name: &str) -> CoreResult<PreAuthToken>;

    /// Poll a local server for the user associated with a pre-auth token.
    /// Returns an invalid (empty) user until the claim flow completes.
    async fn get_user_from_token(
        &self,
        server_url: &str,
        token: &PreAuthToken,
    ) -> CoreResult<AuthUser>;

    /// Register a claimed (nickname, user id, token) triple with a local server
    async fn register_user_token(
        &self,
        server_name: &str,
        account_name: &str,
        user_id: i64,
        token: &PreAuthToken,
    ) -> CoreResult<()>;

    /// Connect a cloud account from a pasted setup command
    async fn connect_cloud_account(&self, setup_command: &str) -> CoreResult<()>;

    /// Generate a deployable app name from a human title
    async fn generate_app_name(&self, title: &str) -> CoreResult<GeneratedAppName>;

    /// Recursively list deployable files under a target, with the server's
    /// size accounting
    async fn get_deployment_files(&self, target: &str) -> CoreResult<DeploymentFiles>;

    /// Get the local deployment history records for a content path
    async fn get_deployments(
        &self,
        path: &str,
        output_path: &str,
    ) -> CoreResult<Vec<DeploymentRecord>>;

    /// Drop a record from the local deployment history
    async fn forget_deployment(&self, path: &str, record: &DeploymentRecord) -> CoreResult<()>;

    /// List the apps currently deployed under an account
    async fn list_apps(&self, account: &Account) -> CoreResult<Vec<AppInfo>>;
}
