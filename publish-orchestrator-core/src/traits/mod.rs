//! Collaborator abstraction trait definitions

mod preference_store;
mod server_operations;
mod status_display;

pub use preference_store::{InMemoryPreferenceStore, PreferenceStore};
pub use server_operations::ServerOperations;
pub use status_display::StatusDisplay;
