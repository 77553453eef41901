//! 测试辅助模块
//!
//! 提供 mock 实现和便捷的测试工厂方法。

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::traits::{InMemoryPreferenceStore, ServerOperations, StatusDisplay};
use crate::types::{
    Account, AppInfo, AuthUser, DeploymentFiles, DeploymentRecord, GeneratedAppName, PreAuthToken,
    ServerInfo,
};

// ===== MockServerOperations =====

/// HashMap-backed server with per-operation error injection and call
/// counters for reentrancy/coalescing assertions.
#[derive(Default)]
pub struct MockServerOperations {
    accounts: RwLock<Vec<Account>>,
    list_accounts_error: RwLock<Option<String>>,

    user_polls: RwLock<VecDeque<Result<AuthUser, String>>>,
    user_poll_calls: RwLock<usize>,

    registered_tokens: RwLock<Vec<(String, String, i64)>>,
    register_token_error: RwLock<Option<String>>,

    cloud_connect_calls: RwLock<usize>,
    connect_cloud_error: RwLock<Option<String>>,

    generated_name: RwLock<Option<GeneratedAppName>>,
    generate_app_name_error: RwLock<Option<String>>,
    last_generated_title: RwLock<Option<String>>,

    deployment_files: RwLock<Option<DeploymentFiles>>,
    deployment_files_error: RwLock<Option<String>>,
    deployment_files_calls: RwLock<usize>,

    deployments: RwLock<HashMap<String, Vec<DeploymentRecord>>>,
    get_deployments_error: RwLock<Option<String>>,
    get_deployments_calls: RwLock<usize>,
    deployments_delay: RwLock<Duration>,
    forgotten: RwLock<Vec<(String, String)>>,

    apps: RwLock<Vec<AppInfo>>,
    list_apps_error: RwLock<Option<String>>,
    list_apps_calls: RwLock<usize>,
}

impl MockServerOperations {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_accounts(&self, accounts: Vec<Account>) {
        *self.accounts.write().await = accounts;
    }

    pub async fn set_list_accounts_error(&self, err: Option<String>) {
        *self.list_accounts_error.write().await = err;
    }

    /// Queue responses for successive `get_user_from_token` polls; once the
    /// queue drains, further polls return an invalid (unclaimed) user.
    pub async fn queue_user_polls(&self, polls: Vec<Result<AuthUser, String>>) {
        self.user_polls.write().await.extend(polls);
    }

    pub async fn user_poll_calls(&self) -> usize {
        *self.user_poll_calls.read().await
    }

    pub async fn registered_tokens(&self) -> Vec<(String, String, i64)> {
        self.registered_tokens.read().await.clone()
    }

    pub async fn set_register_token_error(&self, err: Option<String>) {
        *self.register_token_error.write().await = err;
    }

    pub async fn cloud_connect_calls(&self) -> usize {
        *self.cloud_connect_calls.read().await
    }

    pub async fn set_connect_cloud_error(&self, err: Option<String>) {
        *self.connect_cloud_error.write().await = err;
    }

    pub async fn set_generated_name(&self, generated: GeneratedAppName) {
        *self.generated_name.write().await = Some(generated);
    }

    pub async fn set_generate_app_name_error(&self, err: Option<String>) {
        *self.generate_app_name_error.write().await = err;
    }

    pub async fn last_generated_title(&self) -> Option<String> {
        self.last_generated_title.read().await.clone()
    }

    pub async fn set_deployment_files(&self, files: DeploymentFiles) {
        *self.deployment_files.write().await = Some(files);
    }

    pub async fn set_deployment_files_error(&self, err: Option<String>) {
        *self.deployment_files_error.write().await = err;
    }

    pub async fn deployment_files_calls(&self) -> usize {
        *self.deployment_files_calls.read().await
    }

    pub async fn set_deployments(&self, path: &str, records: Vec<DeploymentRecord>) {
        self.deployments
            .write()
            .await
            .insert(path.to_string(), records);
    }

    pub async fn set_get_deployments_error(&self, err: Option<String>) {
        *self.get_deployments_error.write().await = err;
    }

    pub async fn get_deployments_calls(&self) -> usize {
        *self.get_deployments_calls.read().await
    }

    /// Make `get_deployments` take this long (for coalescing tests)
    pub async fn set_deployments_delay(&self, delay: Duration) {
        *self.deployments_delay.write().await = delay;
    }

    pub async fn forgotten_deployments(&self) -> Vec<(String, String)> {
        self.forgotten.read().await.clone()
    }

    pub async fn set_apps(&self, apps: Vec<AppInfo>) {
        *self.apps.write().await = apps;
    }

    pub async fn set_list_apps_error(&self, err: Option<String>) {
        *self.list_apps_error.write().await = err;
    }

    pub async fn list_apps_calls(&self) -> usize {
        *self.list_apps_calls.read().await
    }
}

#[async_trait]
impl ServerOperations for MockServerOperations {
    async fn list_accounts(&self) -> CoreResult<Vec<Account>> {
        if let Some(msg) = self.list_accounts_error.read().await.clone() {
            return Err(CoreError::ServerError(msg));
        }
        Ok(self.accounts.read().await.clone())
    }

    async fn validate_server_url(&self, url: &str) -> CoreResult<ServerInfo> {
        Ok(ServerInfo {
            name: url.trim_start_matches("https://").to_string(),
            url: url.to_string(),
            about: None,
        })
    }

    async fn get_pre_auth_token(&self, server_name: &str) -> CoreResult<PreAuthToken> {
        Ok(PreAuthToken {
            token: "tok-123".to_string(),
            claim_url: format!("https://{server_name}/claim/tok-123"),
        })
    }

    async fn get_user_from_token(
        &self,
        _server_url: &str,
        _token: &PreAuthToken,
    ) -> CoreResult<AuthUser> {
        *self.user_poll_calls.write().await += 1;
        match self.user_polls.write().await.pop_front() {
            Some(Ok(user)) => Ok(user),
            Some(Err(msg)) => Err(CoreError::ServerError(msg)),
            // Claim not completed yet.
            None => Ok(AuthUser::default()),
        }
    }

    async fn register_user_token(
        &self,
        server_name: &str,
        account_name: &str,
        user_id: i64,
        _token: &PreAuthToken,
    ) -> CoreResult<()> {
        if let Some(msg) = self.register_token_error.read().await.clone() {
            return Err(CoreError::ServerError(msg));
        }
        self.registered_tokens.write().await.push((
            server_name.to_string(),
            account_name.to_string(),
            user_id,
        ));
        Ok(())
    }

    async fn connect_cloud_account(&self, _setup_command: &str) -> CoreResult<()> {
        *self.cloud_connect_calls.write().await += 1;
        if let Some(msg) = self.connect_cloud_error.read().await.clone() {
            return Err(CoreError::ServerError(msg));
        }
        Ok(())
    }

    async fn generate_app_name(&self, title: &str) -> CoreResult<GeneratedAppName> {
        *self.last_generated_title.write().await = Some(title.to_string());
        if let Some(msg) = self.generate_app_name_error.read().await.clone() {
            return Err(CoreError::ServerError(msg));
        }
        if let Some(generated) = self.generated_name.read().await.clone() {
            return Ok(generated);
        }
        Ok(GeneratedAppName {
            name: title.to_lowercase().replace(' ', "_"),
            valid: true,
            error: None,
        })
    }

    async fn get_deployment_files(&self, _target: &str) -> CoreResult<DeploymentFiles> {
        *self.deployment_files_calls.write().await += 1;
        if let Some(msg) = self.deployment_files_error.read().await.clone() {
            return Err(CoreError::ServerError(msg));
        }
        Ok(self
            .deployment_files
            .read()
            .await
            .clone()
            .unwrap_or(DeploymentFiles {
                files: Vec::new(),
                dir_size: 0,
                max_size: 1_000_000,
            }))
    }

    async fn get_deployments(
        &self,
        path: &str,
        _output_path: &str,
    ) -> CoreResult<Vec<DeploymentRecord>> {
        *self.get_deployments_calls.write().await += 1;
        let delay = *self.deployments_delay.read().await;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if let Some(msg) = self.get_deployments_error.read().await.clone() {
            return Err(CoreError::ServerError(msg));
        }
        Ok(self
            .deployments
            .read()
            .await
            .get(path)
            .cloned()
            .unwrap_or_default())
    }

    async fn forget_deployment(&self, path: &str, record: &DeploymentRecord) -> CoreResult<()> {
        self.forgotten
            .write()
            .await
            .push((path.to_string(), record.name.clone()));
        if let Some(records) = self.deployments.write().await.get_mut(path) {
            records.retain(|r| r.name != record.name);
        }
        Ok(())
    }

    async fn list_apps(&self, _account: &Account) -> CoreResult<Vec<AppInfo>> {
        *self.list_apps_calls.write().await += 1;
        if let Some(msg) = self.list_apps_error.read().await.clone() {
            return Err(CoreError::ServerError(msg));
        }
        Ok(self.apps.read().await.clone())
    }
}

// ===== MockStatusDisplay =====

/// Records everything shown to the user; confirmations answer with a
/// scripted yes/no.
pub struct MockStatusDisplay {
    errors: std::sync::Mutex<Vec<(String, String)>>,
    messages: std::sync::Mutex<Vec<(String, String)>>,
    opened_windows: std::sync::Mutex<Vec<String>>,
    confirm_answer: std::sync::Mutex<bool>,
    progress_depth: std::sync::Mutex<i32>,
}

impl Default for MockStatusDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl MockStatusDisplay {
    pub fn new() -> Self {
        Self {
            errors: std::sync::Mutex::new(Vec::new()),
            messages: std::sync::Mutex::new(Vec::new()),
            opened_windows: std::sync::Mutex::new(Vec::new()),
            confirm_answer: std::sync::Mutex::new(true),
            progress_depth: std::sync::Mutex::new(0),
        }
    }

    pub async fn errors(&self) -> Vec<(String, String)> {
        self.errors.lock().unwrap().clone()
    }

    pub async fn messages(&self) -> Vec<(String, String)> {
        self.messages.lock().unwrap().clone()
    }

    pub async fn opened_windows(&self) -> Vec<String> {
        self.opened_windows.lock().unwrap().clone()
    }

    pub async fn set_confirm_answer(&self, answer: bool) {
        *self.confirm_answer.lock().unwrap() = answer;
    }

    /// Outstanding progress indicators (begin minus clear)
    pub async fn progress_depth(&self) -> i32 {
        *self.progress_depth.lock().unwrap()
    }
}

#[async_trait]
impl StatusDisplay for MockStatusDisplay {
    fn show_error(&self, title: &str, message: &str) {
        self.errors
            .lock()
            .unwrap()
            .push((title.to_string(), message.to_string()));
    }

    fn show_message(&self, title: &str, message: &str) {
        self.messages
            .lock()
            .unwrap()
            .push((title.to_string(), message.to_string()));
    }

    async fn confirm(&self, _title: &str, _message: &str) -> bool {
        *self.confirm_answer.lock().unwrap()
    }

    fn open_window(&self, url: &str) {
        self.opened_windows.lock().unwrap().push(url.to_string());
    }

    fn begin_progress(&self, _message: &str) {
        *self.progress_depth.lock().unwrap() += 1;
    }

    fn clear_progress(&self) {
        *self.progress_depth.lock().unwrap() -= 1;
    }
}

// ===== 工厂方法 =====

/// 创建测试用 `ServiceContext`
pub fn create_test_context() -> (
    Arc<ServiceContext>,
    Arc<MockServerOperations>,
    Arc<MockStatusDisplay>,
    Arc<InMemoryPreferenceStore>,
) {
    let server = Arc::new(MockServerOperations::new());
    let display = Arc::new(MockStatusDisplay::new());
    let preferences = Arc::new(InMemoryPreferenceStore::new());

    let ctx = Arc::new(ServiceContext::new(
        server.clone(),
        display.clone(),
        preferences.clone(),
    ));

    (ctx, server, display, preferences)
}
