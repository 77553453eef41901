//! Publish Orchestrator Core Library
//!
//! Provides core business logic for content-publishing frontends, including:
//! - Account list management (Account List)
//! - Account connection (cloud token / local auth handshake)
//! - The deployment wizard flow (account → files → name → publish settings)
//! - The publish split-button presenter (deployment history menu)
//!
//! This library is UI- and transport-independent: the remote server, the
//! display surface, and preference persistence are abstracted through traits,
//! so desktop and web frontends inject their own implementations.

pub mod error;
pub mod services;
pub mod traits;
pub mod types;
pub mod utils;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use error::{CoreError, CoreResult};
pub use services::ServiceContext;
pub use traits::{PreferenceStore, ServerOperations, StatusDisplay};
