//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// No account is selected
    #[error("No account selected")]
    NoAccountSelected,

    /// Validation error (name format, malformed setup command, undeterminable file source)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Deployment directory exceeds the server's size bound
    #[error("The directory to be deployed ({size} bytes) exceeds the maximum deployment size ({max} bytes)")]
    DeploymentTooLarge { size: u64, max: u64 },

    /// Remote operation failed; the message is display text from the server
    #[error("Server error: {0}")]
    ServerError(String),

    /// Wizard invoked out of order
    #[error("Invalid wizard state: {0}")]
    InvalidState(String),

    /// Preference / history persistence error (constructed by frontend
    /// `PreferenceStore` implementations)
    #[error("Storage error: {0}")]
    StorageError(String),
}

impl CoreError {
    /// Whether it is expected behavior (user input, resource does not exist, etc.) is used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method simultaneously when new variants are added. **
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::NoAccountSelected
                | Self::ValidationError(_)
                | Self::DeploymentTooLarge { .. }
                | Self::InvalidState(_)
        )
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
