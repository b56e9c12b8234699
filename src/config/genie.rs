use crate::config::WorkspaceSettings;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, Validate,
};
use clap::Parser;
use std::fmt;

#[derive(Clone, Parser)]
#[command(name = "deploy-genie-space")]
#[command(about = "Create a Genie space from an exported space configuration")]
pub struct GenieArgs {
    /// Display name for the new Genie space
    #[arg(long, default_value = "OMOP Semantic Layer - Deployed")]
    pub name: String,

    /// SQL warehouse ID
    #[arg(long)]
    pub warehouse_id: String,

    /// Workspace URL
    #[arg(long, env = "DATABRICKS_HOST")]
    pub workspace_url: Option<String>,

    /// Access token
    #[arg(long, env = "DATABRICKS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Path to the exported Genie space configuration
    #[arg(long, default_value = "resources/genie/omop_semantic_layer_export.json")]
    pub config_file: String,

    /// Replace the exported description
    #[arg(long)]
    pub description: Option<String>,

    /// Show what would be created without calling the API
    #[arg(long)]
    pub dry_run: bool,

    /// Per-request timeout in seconds
    #[arg(long, default_value = "60")]
    pub timeout_secs: u64,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

impl GenieArgs {
    pub fn workspace(&self) -> Result<WorkspaceSettings> {
        WorkspaceSettings::resolve(&self.workspace_url, &self.token)
    }
}

impl fmt::Debug for GenieArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenieArgs")
            .field("name", &self.name)
            .field("warehouse_id", &self.warehouse_id)
            .field("workspace_url", &self.workspace_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("config_file", &self.config_file)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl Validate for GenieArgs {
    fn validate(&self) -> Result<()> {
        self.workspace()?;
        validate_non_empty_string("name", &self.name)?;
        validate_non_empty_string("warehouse_id", &self.warehouse_id)?;
        validate_path("config_file", &self.config_file)?;
        validate_positive_number("timeout_secs", self.timeout_secs, 1)?;
        Ok(())
    }
}
