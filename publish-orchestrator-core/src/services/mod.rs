//! 业务逻辑服务层

mod account_list;
mod app_name;
mod connector;
mod publish_menu;
mod wizard;

pub use account_list::{AccountFilter, AccountList};
pub use app_name::{AppNameValidator, NameValidity};
pub use connector::{AccountConnector, ConnectOutcome, CLOUD_SETUP_PREFIX};
pub use publish_menu::{MenuSnapshot, PublishMenu};
pub use wizard::{AccountStep, DeployWizard, WizardState};

use std::sync::Arc;

use crate::traits::{PreferenceStore, ServerOperations, StatusDisplay};

/// 服务上下文 - 持有所有依赖
///
/// Frontends create this context and inject their platform-specific
/// implementations of the collaborator traits.
pub struct ServiceContext {
    /// Remote server operations
    pub server: Arc<dyn ServerOperations>,
    /// User-facing messaging surface
    pub display: Arc<dyn StatusDisplay>,
    /// Preferred-account persistence
    pub preferences: Arc<dyn PreferenceStore>,
}

impl ServiceContext {
    /// 创建服务上下文
    #[must_use]
    pub fn new(
        server: Arc<dyn ServerOperations>,
        display: Arc<dyn StatusDisplay>,
        preferences: Arc<dyn PreferenceStore>,
    ) -> Self {
        Self {
            server,
            display,
            preferences,
        }
    }

    /// Surface a remote failure: clear any progress indicator, show the
    /// server's message, and log it at the level its class calls for.
    pub fn report_server_error(&self, title: &str, err: &crate::error::CoreError) {
        self.display.clear_progress();
        self.display.show_error(title, &err.to_string());
        if err.is_expected() {
            log::warn!("{title}: {err}");
        } else {
            log::error!("{title}: {err}");
        }
    }
}
