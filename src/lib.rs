pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{HttpConfig, LocalDefinitionStore, WorkspaceClient};
pub use config::{genie::GenieArgs, sql::SqlArgs, DeployArgs, WorkspaceSettings};
pub use crate::core::{deployer::MetricViewDeployer, genie::GenieSpaceDeployer};
pub use utils::error::{DeployError, Result};
