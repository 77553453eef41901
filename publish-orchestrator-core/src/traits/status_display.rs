//! Display/notification abstract Trait

use async_trait::async_trait;

/// User-facing messaging surface.
///
/// The core calls this purely for communication; nothing here affects
/// control flow except the yes/no outcome of [`confirm`](Self::confirm).
#[async_trait]
pub trait StatusDisplay: Send + Sync {
    /// Blocking error message
    fn show_error(&self, title: &str, message: &str);

    /// Informational message
    fn show_message(&self, title: &str, message: &str);

    /// Blocking yes/no confirmation
    async fn confirm(&self, title: &str, message: &str) -> bool;

    /// Open an external browser window (claim URLs, hosted content)
    fn open_window(&self, url: &str);

    /// Progress indicator lifecycle
    fn begin_progress(&self, message: &str);
    fn clear_progress(&self);
}
