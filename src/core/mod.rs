pub mod deployer;
pub mod genie;
pub mod sql_script;

pub use crate::domain::model::{DeployOutcome, DeploymentSummary, MetricViewDefinition};
pub use crate::domain::ports::{CatalogApi, DefinitionStore, GenieApi};
pub use crate::utils::error::Result;
