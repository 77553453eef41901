//! 类型定义模块

mod account;
mod content;
mod deployment;
mod publish;

pub use account::{Account, AuthUser, PreAuthToken, ServerInfo};
pub use content::{ContentType, FileSource, PublishSource};
pub use deployment::{most_recent, AppInfo, DeploymentFiles, DeploymentRecord, GeneratedAppName};
pub use publish::{FileEntry, FileList, PublishResult};
