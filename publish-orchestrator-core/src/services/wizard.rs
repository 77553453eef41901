//! Deployment wizard flow controller

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::{CoreError, CoreResult};
use crate::services::{AccountFilter, AccountList, ServiceContext};
use crate::types::{Account, DeploymentRecord, FileList, FileSource, PublishResult, PublishSource};

/// Forward-only wizard progression. Remote failures leave the state where it
/// was; the user re-triggers the step to retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardState {
    SelectingAccount,
    ResolvingFiles,
    ValidatingName,
    Ready,
    Deploying,
}

/// Outcome of the account-selection step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountStep {
    /// No accounts exist yet; the caller should run the account connection
    /// flow and then call `select_account` again.
    NeedsConnection,
    /// An account was selected (auto-selected from the prior deployment or
    /// the preferred account where possible).
    Selected(Account),
}

struct WizardData {
    state: WizardState,
    files: FileList,
    app_name: String,
    connect_offered: bool,
    collected: bool,
}

/// Walks a content item through: select/validate account → resolve the file
/// list → check for naming conflicts → collect the final publish settings.
///
/// One wizard instance per invocation; `from_previous` makes it an update
/// (republish) rather than a new deployment.
pub struct DeployWizard {
    ctx: Arc<ServiceContext>,
    source: PublishSource,
    from_previous: Option<DeploymentRecord>,
    accounts: AccountList,
    data: RwLock<WizardData>,
}

impl DeployWizard {
    #[must_use]
    pub fn new(
        ctx: Arc<ServiceContext>,
        source: PublishSource,
        from_previous: Option<DeploymentRecord>,
    ) -> Self {
        let accounts = AccountList::new(ctx.clone(), AccountFilter::All);
        Self {
            ctx,
            source,
            from_previous,
            accounts,
            data: RwLock::new(WizardData {
                state: WizardState::SelectingAccount,
                files: FileList::default(),
                app_name: String::new(),
                connect_offered: false,
                collected: false,
            }),
        }
    }

    /// Whether a prior deployment record exists for this content
    #[must_use]
    pub fn is_update(&self) -> bool {
        self.from_previous.is_some()
    }

    pub async fn state(&self) -> WizardState {
        self.data.read().await.state
    }

    /// The wizard's account list (for rendering the selection step)
    #[must_use]
    pub fn accounts(&self) -> &AccountList {
        &self.accounts
    }

    /// Current file selection snapshot
    pub async fn files(&self) -> FileList {
        self.data.read().await.files.clone()
    }

    /// Check or uncheck a file in the selection
    pub async fn set_file_checked(&self, path: &str, checked: bool) -> CoreResult<()> {
        self.data.write().await.files.set_checked(path, checked)
    }

    /// Manually add a file to the selection
    pub async fn add_file(&self, path: String) {
        self.data.write().await.files.add_file(path);
    }

    /// Step 1: populate accounts and pick the active one.
    ///
    /// With zero accounts the first call asks the caller to run the account
    /// connection flow; afterwards the prior deployment's account (updates)
    /// or the preferred account (new deployments) is floated to the front.
    pub async fn select_account(&self) -> CoreResult<AccountStep> {
        self.ensure_state(WizardState::SelectingAccount).await?;

        self.accounts.refresh().await?;

        if self.accounts.is_empty().await {
            let mut data = self.data.write().await;
            if !data.connect_offered {
                data.connect_offered = true;
                return Ok(AccountStep::NeedsConnection);
            }
            drop(data);
            let err = CoreError::NoAccountSelected;
            self.ctx.display.show_error(
                "No Accounts Connected",
                "Connect a publishing account to deploy this content.",
            );
            return Err(err);
        }

        if let Some(previous) = &self.from_previous {
            self.accounts
                .select_identity(&previous.server, &previous.account_name)
                .await;
        } else {
            match self.ctx.preferences.preferred_account().await {
                Ok(Some((server, name))) => self.accounts.select_identity(&server, &name).await,
                Ok(None) => {}
                // A broken preference never blocks publishing.
                Err(e) => log::warn!("Failed to read preferred account: {e}"),
            }
        }

        let account = self.accounts.require_selected().await?;
        self.data.write().await.state = WizardState::ResolvingFiles;
        Ok(AccountStep::Selected(account))
    }

    /// Step 2: resolve the file list to deploy.
    ///
    /// Self-contained content synthesizes a one-entry list without any
    /// directory scan; everything else asks the server for a recursive
    /// listing of the resolved file source, bounded by the server's maximum
    /// deployment size.
    pub async fn resolve_files(&self) -> CoreResult<FileList> {
        self.ensure_state(WizardState::ResolvingFiles).await?;

        if self.source.is_self_contained {
            let primary = self.source.primary_file()?;
            let files = FileList::new(primary, Vec::new());
            let mut data = self.data.write().await;
            data.files = files.clone();
            data.state = WizardState::ValidatingName;
            return Ok(files);
        }

        let target = match self.source.file_source()? {
            FileSource::Directory(dir) => dir,
            FileSource::SingleFile(file) => file,
        };

        self.ctx.display.begin_progress("Collecting files...");
        let listing = match self.ctx.server.get_deployment_files(&target).await {
            Ok(listing) => listing,
            Err(e) => {
                self.ctx.report_server_error("Error Listing Files", &e);
                return Err(e);
            }
        };
        self.ctx.display.clear_progress();

        if listing.dir_size > listing.max_size {
            let err = CoreError::DeploymentTooLarge {
                size: listing.dir_size,
                max: listing.max_size,
            };
            self.ctx
                .display
                .show_error("Deployment Too Large", &err.to_string());
            return Err(err);
        }

        let mut file_iter = listing.files.into_iter();
        let primary = match self.source.source_file.clone() {
            Some(file) => file,
            // Directory deployments without a designated source file pin
            // the first scanned file.
            None => file_iter.next().ok_or_else(|| {
                CoreError::ValidationError(format!("No deployable files found in {target}"))
            })?,
        };

        let files = FileList::new(primary, file_iter);
        let mut data = self.data.write().await;
        data.files = files.clone();
        data.state = WizardState::ValidatingName;
        Ok(files)
    }

    /// Step 3: settle the deployment name.
    ///
    /// Updates reuse the prior record's name verbatim and skip the check.
    /// New deployments are checked against the account's deployed apps; a
    /// case-insensitive collision asks the user whether to replace the
    /// existing content. A lookup failure counts as no conflict so that an
    /// unrelated error cannot block publishing.
    ///
    /// Returns `false` when the user declined to replace; the wizard stays
    /// in `ValidatingName` for another candidate.
    pub async fn validate_name(&self, candidate: &str) -> CoreResult<bool> {
        self.ensure_state(WizardState::ValidatingName).await?;

        if let Some(previous) = &self.from_previous {
            let mut data = self.data.write().await;
            data.app_name = previous.name.clone();
            data.state = WizardState::Ready;
            return Ok(true);
        }

        let account = self.accounts.require_selected().await?;
        match self.ctx.server.list_apps(&account).await {
            Ok(apps) => {
                let collision = apps
                    .iter()
                    .any(|app| app.name.eq_ignore_ascii_case(candidate));
                if collision {
                    let replace = self
                        .ctx
                        .display
                        .confirm(
                            "Overwrite Deployment",
                            &format!(
                                "Content named \"{candidate}\" already exists on {}. Replace \
                                 the existing content?",
                                account.server
                            ),
                        )
                        .await;
                    if !replace {
                        return Ok(false);
                    }
                }
            }
            // Fail open: a broken lookup must not block publishing.
            Err(e) => log::warn!("App listing failed, assuming no name conflict: {e}"),
        }

        let mut data = self.data.write().await;
        data.app_name = candidate.to_string();
        data.state = WizardState::Ready;
        Ok(true)
    }

    /// Step 4: assemble the final publish settings, exactly once.
    ///
    /// For new deployments the selected account also becomes the preferred
    /// account for the next publish.
    pub async fn collect(&self, additional_files: Vec<String>) -> CoreResult<PublishResult> {
        self.ensure_state(WizardState::Ready).await?;

        let account = self.accounts.require_selected().await?;

        let result = {
            let mut data = self.data.write().await;
            if data.collected {
                return Err(CoreError::InvalidState(
                    "publish settings were already collected".to_string(),
                ));
            }
            data.collected = true;
            data.state = WizardState::Deploying;

            let (as_multiple, as_static) = match &self.from_previous {
                Some(previous) => (previous.as_multiple, previous.as_static),
                None => (false, self.source.is_static),
            };

            PublishResult {
                app_name: data.app_name.clone(),
                app_title: self.source.title.clone(),
                app_id: self
                    .from_previous
                    .as_ref()
                    .and_then(|previous| previous.app_id.clone()),
                account: account.clone(),
                source: self.source.clone(),
                file_list: data.files.checked_files(),
                additional_files,
                ignored_files: data.files.ignored_files(),
                as_multiple,
                as_static,
                is_update: self.from_previous.is_some(),
            }
        };

        if !result.is_update {
            if let Err(e) = self.ctx.preferences.set_preferred_account(&account).await {
                log::warn!("Failed to persist preferred account: {e}");
            }
        }

        log::info!(
            "Publish settings collected: {} -> {} ({})",
            result.app_name,
            account.server,
            if result.is_update { "update" } else { "new" }
        );
        Ok(result)
    }

    async fn ensure_state(&self, expected: WizardState) -> CoreResult<()> {
        let state = self.data.read().await.state;
        if state == expected {
            Ok(())
        } else {
            Err(CoreError::InvalidState(format!(
                "expected {expected:?}, wizard is in {state:?}"
            )))
        }
    }
}
