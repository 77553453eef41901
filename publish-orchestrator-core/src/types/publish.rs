//! File selection and the final publish settings

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::{Account, PublishSource};

/// One candidate file in the deployment file list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileEntry {
    pub path: String,
    pub checked: bool,
    /// The primary file is pinned: `enabled == false`
    pub enabled: bool,
}

/// The selectable deployment file list.
///
/// Invariants: at most one primary per population round; the primary is
/// always first, always checked, and cannot be unchecked. The whole list is
/// rebuilt whenever the deployment target changes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileList {
    entries: Vec<FileEntry>,
}

impl FileList {
    /// Build a list from a population round: one pinned primary plus the
    /// rest of the scan, all checked by default.
    #[must_use]
    pub fn new(primary: String, files: impl IntoIterator<Item = String>) -> Self {
        let mut entries = vec![FileEntry {
            path: primary.clone(),
            checked: true,
            enabled: false,
        }];
        entries.extend(files.into_iter().filter(|f| *f != primary).map(|path| {
            FileEntry {
                path,
                checked: true,
                enabled: true,
            }
        }));
        Self { entries }
    }

    /// Manually add a file to the candidate list
    pub fn add_file(&mut self, path: String) {
        if self.entries.iter().any(|e| e.path == path) {
            return;
        }
        self.entries.push(FileEntry {
            path,
            checked: true,
            enabled: true,
        });
    }

    /// Check or uncheck an entry. Unchecking the pinned primary is refused.
    pub fn set_checked(&mut self, path: &str, checked: bool) -> CoreResult<()> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.path == path)
            .ok_or_else(|| {
                CoreError::ValidationError(format!("File not in the deployment list: {path}"))
            })?;
        if !entry.enabled && !checked {
            return Err(CoreError::ValidationError(
                "The primary file cannot be removed from the deployment".to_string(),
            ));
        }
        entry.checked = checked;
        Ok(())
    }

    #[must_use]
    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Paths that will go into the bundle
    #[must_use]
    pub fn checked_files(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| e.checked)
            .map(|e| e.path.clone())
            .collect()
    }

    /// Paths the user unchecked; persisted so the next publish of the same
    /// target starts from the same selection
    #[must_use]
    pub fn ignored_files(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| !e.checked)
            .map(|e| e.path.clone())
            .collect()
    }
}

/// The wizard's final output, handed to the publish-execution collaborator.
/// Constructed exactly once per wizard run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishResult {
    #[serde(rename = "appName")]
    pub app_name: String,
    #[serde(rename = "appTitle")]
    pub app_title: String,
    /// Server-side app id when republishing
    #[serde(rename = "appId", skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    pub account: Account,
    pub source: PublishSource,
    #[serde(rename = "fileList")]
    pub file_list: Vec<String>,
    #[serde(rename = "additionalFiles")]
    pub additional_files: Vec<String>,
    #[serde(rename = "ignoredFiles")]
    pub ignored_files: Vec<String>,
    #[serde(rename = "asMultiple")]
    pub as_multiple: bool,
    #[serde(rename = "asStatic")]
    pub as_static: bool,
    #[serde(rename = "isUpdate")]
    pub is_update: bool,
}
