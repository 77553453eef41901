//! 账户相关类型定义

use serde::{Deserialize, Serialize};

/// A publishing account known to the client.
///
/// Identity is the natural key `(server, name)`; an account is never edited
/// in place — "changing the selected account" always rebinds to another
/// `Account` value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Account {
    /// Server the account lives on (nickname for local servers, the cloud
    /// service name for cloud accounts)
    pub server: String,
    /// Account name on that server
    pub name: String,
    /// Whether this is a cloud-service account (vs. a local server account)
    #[serde(rename = "isCloudAccount")]
    pub is_cloud: bool,
}

impl Account {
    /// Create an account value
    #[must_use]
    pub fn new(server: impl Into<String>, name: impl Into<String>, is_cloud: bool) -> Self {
        Self {
            server: server.into(),
            name: name.into(),
            is_cloud,
        }
    }

    /// Two accounts are the same iff server and name match
    #[must_use]
    pub fn same_identity(&self, other: &Self) -> bool {
        self.server == other.server && self.name == other.name
    }
}

/// User identity returned while polling a local-server auth handshake.
///
/// Before the user completes the claim flow, the server answers with an
/// empty user; `is_valid` distinguishes the two.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthUser {
    /// User id on the server, absent until the handshake completes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// User name, absent until the handshake completes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl AuthUser {
    /// Whether the handshake has produced a real user
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.id.is_some()
    }
}

/// Opaque token issued by a local server prior to full authentication.
///
/// The user visits `claim_url` in an external window; the client polls
/// "get user from token" with `token` until the claim completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreAuthToken {
    pub token: String,
    #[serde(rename = "claimUrl")]
    pub claim_url: String,
}

/// Result of validating a server URL before connecting a local account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerInfo {
    /// Server nickname
    pub name: String,
    /// Canonical URL the server answered on
    pub url: String,
    /// Optional server self-description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
}
