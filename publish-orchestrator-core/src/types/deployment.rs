//! Deployment history and server-side application types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::Account;

/// A persisted fact that content at a given path was previously published
/// to a given account/server. Read-only; superseded by a new record after a
/// successful republish, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentRecord {
    /// App name on the server
    pub name: String,
    /// Display title shown in menus
    #[serde(rename = "displayName")]
    pub display_name: String,
    /// Server the deployment went to
    pub server: String,
    /// Account the deployment was made under
    #[serde(rename = "accountName")]
    pub account_name: String,
    /// URL the deployed content is hosted at
    #[serde(rename = "hostUrl")]
    pub host_url: String,
    /// Server-side application id, absent for never-completed deployments
    #[serde(rename = "appId", skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    /// When the deployment completed
    #[serde(with = "crate::utils::datetime")]
    pub when: DateTime<Utc>,
    /// Deployed as a multi-document bundle
    #[serde(rename = "asMultiple")]
    pub as_multiple: bool,
    /// Deployed as static content
    #[serde(rename = "asStatic")]
    pub as_static: bool,
    /// Files added to the bundle beyond the scanned list
    #[serde(rename = "additionalFiles", default)]
    pub additional_files: Vec<String>,
    /// Files the user unchecked last time
    #[serde(rename = "ignoredFiles", default)]
    pub ignored_files: Vec<String>,
}

impl DeploymentRecord {
    /// Whether this record was deployed under the given account
    #[must_use]
    pub fn matches_account(&self, account: &Account) -> bool {
        self.server == account.server && self.account_name == account.name
    }
}

/// Picks the most recently deployed record, independent of input order.
///
/// This is the record the primary publish button republishes to.
#[must_use]
pub fn most_recent(records: &[DeploymentRecord]) -> Option<&DeploymentRecord> {
    records.iter().max_by_key(|r| r.when)
}

/// An application currently deployed to a server, as reported by
/// "list remote apps for an account". Used for name-collision checks and
/// for locating a running app's management page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppInfo {
    pub name: String,
    pub url: String,
    #[serde(rename = "configUrl")]
    pub config_url: String,
}

/// Response of "get deployment file list": the recursive listing plus the
/// server's size accounting for the scanned directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentFiles {
    pub files: Vec<String>,
    /// Total size of the scanned directory in bytes
    #[serde(rename = "dirSize")]
    pub dir_size: u64,
    /// Maximum deployment size the server accepts
    #[serde(rename = "maxSize")]
    pub max_size: u64,
}

/// Server-assigned app name produced from a human title
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedAppName {
    pub name: String,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
