// Adapters layer: concrete implementations for external systems (local filesystem, workspace REST API).

pub mod http;
pub mod storage;

pub use http::{HttpConfig, WorkspaceClient};
pub use storage::LocalDefinitionStore;
