//! Publish split-button presenter

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::types::{most_recent, ContentType, DeploymentRecord};

/// What the split-button should render right now
#[derive(Debug, Clone)]
pub struct MenuSnapshot {
    /// "Publish" for first-time content, "Republish" once history exists
    pub caption: &'static str,
    /// Deployment history for the current content path
    pub records: Vec<DeploymentRecord>,
    /// The record the primary button republishes to (most recent)
    pub default_record: Option<DeploymentRecord>,
}

struct MenuState {
    content_path: Option<String>,
    output_path: String,
    content_type: ContentType,
    /// Path the current `records` were fetched for; `None` forces a refetch
    populated_path: Option<String>,
    records: Vec<DeploymentRecord>,
}

impl MenuState {
    fn snapshot(&self) -> MenuSnapshot {
        MenuSnapshot {
            caption: if self.records.is_empty() {
                "Publish"
            } else {
                "Republish"
            },
            records: self.records.clone(),
            default_record: most_recent(&self.records).cloned(),
        }
    }
}

/// Headless presenter for the publish button and its deployment-history menu.
///
/// History is cached per content path and only refetched when the path
/// changes or a caller forces a refresh (after a completed deploy or an
/// external status event). The state mutex is held across the fetch, so a
/// second `populate` arriving mid-fetch waits for the in-flight one and then
/// reads the fresh cache instead of issuing a duplicate request.
pub struct PublishMenu {
    ctx: Arc<ServiceContext>,
    state: Mutex<MenuState>,
}

impl PublishMenu {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self {
            ctx,
            state: Mutex::new(MenuState {
                content_path: None,
                output_path: String::new(),
                content_type: ContentType::None,
                populated_path: None,
                records: Vec::new(),
            }),
        }
    }

    /// Bind the button to a content path (and its rendered output, if any)
    pub async fn set_content_path(&self, content_path: &str, output_path: &str) {
        let mut state = self.state.lock().await;
        state.content_path = Some(content_path.to_string());
        state.output_path = output_path.to_string();
    }

    /// Content-type changes re-scope the menu: document/app targets force a
    /// history refetch, raw-HTML targets erase the history entirely.
    pub async fn set_content_type(&self, content_type: ContentType) {
        let mut state = self.state.lock().await;
        if state.content_type == content_type {
            return;
        }
        state.content_type = content_type;
        match content_type {
            ContentType::Document | ContentType::App => state.populated_path = None,
            ContentType::Html | ContentType::Plot | ContentType::Presentation => {
                state.populated_path = None;
                state.records.clear();
            }
            _ => {}
        }
    }

    /// Refresh the deployment-history cache if needed and return the menu
    /// contents. A fetch failure leaves the previous menu in place (the
    /// button still works; history just may be stale).
    pub async fn populate(&self, force: bool) -> MenuSnapshot {
        let mut state = self.state.lock().await;

        if force {
            state.populated_path = None;
        }

        let Some(content_path) = state.content_path.clone() else {
            return state.snapshot();
        };

        if state.populated_path.as_deref() == Some(content_path.as_str()) {
            return state.snapshot();
        }

        // An application invoked through a source file is deployed as its
        // containing directory; look the history up there.
        let lookup_path = if state.content_type == ContentType::App {
            parent_for_source_file(&content_path)
        } else {
            content_path.clone()
        };

        match self
            .ctx
            .server
            .get_deployments(&lookup_path, &state.output_path)
            .await
        {
            Ok(records) => {
                state.populated_path = Some(content_path);
                state.records = records;
            }
            Err(e) => {
                log::warn!("Failed to load deployment history for {lookup_path}: {e}");
            }
        }
        state.snapshot()
    }

    /// The record a primary-button click republishes to, or `None` for a
    /// first-time publish.
    pub async fn default_record(&self) -> Option<DeploymentRecord> {
        let state = self.state.lock().await;
        most_recent(&state.records).cloned()
    }

    /// Resolve a primary-button click: rendered-HTML content types need a
    /// generated HTML file before they can be published.
    pub async fn publish_target(&self) -> CoreResult<Option<DeploymentRecord>> {
        let state = self.state.lock().await;
        if state.content_type.requires_rendered_html() && state.output_path.is_empty() {
            let message = "No HTML could be generated for the content.".to_string();
            self.ctx.display.show_error("Content Publish Failed", &message);
            return Err(CoreError::ValidationError(message));
        }
        Ok(most_recent(&state.records).cloned())
    }

    /// Drop a record from the local history ("remove from list") and refresh
    pub async fn forget(&self, record: &DeploymentRecord) -> CoreResult<MenuSnapshot> {
        let path = {
            let state = self.state.lock().await;
            state.content_path.clone().ok_or_else(|| {
                CoreError::InvalidState("no content path bound".to_string())
            })?
        };
        self.ctx.server.forget_deployment(&path, record).await?;
        Ok(self.populate(true).await)
    }

    /// A deployment finished somewhere; refresh on success so the menu and
    /// caption pick up the new record.
    pub async fn on_deployment_completed(&self, succeeded: bool) -> Option<MenuSnapshot> {
        if succeeded {
            Some(self.populate(true).await)
        } else {
            None
        }
    }

    /// An external upload reported status; refresh unless it errored
    pub async fn on_upload_status(&self, error: Option<&str>) -> Option<MenuSnapshot> {
        match error {
            None | Some("") => Some(self.populate(true).await),
            Some(_) => None,
        }
    }
}

/// Directory containing a `*.r` source file; other paths pass through
fn parent_for_source_file(path: &str) -> String {
    let is_source_file = path
        .rsplit_once('.')
        .is_some_and(|(_, ext)| ext.eq_ignore_ascii_case("r"));
    if is_source_file {
        if let Some((parent, _)) = path.rsplit_once('/') {
            if !parent.is_empty() {
                return parent.to_string();
            }
        }
    }
    path.to_string()
}
