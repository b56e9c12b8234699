pub mod genie;
pub mod sql;

use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_required_field,
    validate_url, Validate,
};
use clap::Parser;
use std::fmt;

/// 解析完成的 workspace 連線資訊
#[derive(Clone)]
pub struct WorkspaceSettings {
    pub host: String,
    pub token: String,
}

impl WorkspaceSettings {
    pub fn new(host: &str, token: &str) -> Self {
        Self {
            host: host.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    /// host 先於 token 檢查，兩者都在任何網路請求之前
    pub fn resolve(host: &Option<String>, token: &Option<String>) -> Result<Self> {
        let host = validate_required_field("host", host)?;
        let token = validate_required_field("token", token)?;
        validate_url("host", host)?;
        Ok(Self::new(host, token))
    }
}

impl fmt::Debug for WorkspaceSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkspaceSettings")
            .field("host", &self.host)
            .field("token", &"<redacted>")
            .finish()
    }
}

#[derive(Clone, Parser)]
#[command(name = "deploy-metric-views")]
#[command(about = "Deploy YAML metric view definitions to a Databricks workspace")]
pub struct DeployArgs {
    /// Target catalog name
    #[arg(long)]
    pub catalog: String,

    /// Target schema name
    #[arg(long)]
    pub schema: String,

    /// Workspace URL
    #[arg(long, env = "DATABRICKS_HOST")]
    pub host: Option<String>,

    /// Access token
    #[arg(long, env = "DATABRICKS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Directory containing metric view YAML files
    #[arg(long, default_value = "metric_views")]
    pub views_dir: String,

    /// Print what would be deployed without calling the API
    #[arg(long)]
    pub dry_run: bool,

    /// Per-request timeout in seconds
    #[arg(long, default_value = "30")]
    pub timeout_secs: u64,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

impl DeployArgs {
    pub fn workspace(&self) -> Result<WorkspaceSettings> {
        WorkspaceSettings::resolve(&self.host, &self.token)
    }
}

impl fmt::Debug for DeployArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeployArgs")
            .field("catalog", &self.catalog)
            .field("schema", &self.schema)
            .field("host", &self.host)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("views_dir", &self.views_dir)
            .field("dry_run", &self.dry_run)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Validate for DeployArgs {
    fn validate(&self) -> Result<()> {
        self.workspace()?;
        validate_non_empty_string("catalog", &self.catalog)?;
        validate_non_empty_string("schema", &self.schema)?;
        validate_path("views_dir", &self.views_dir)?;
        validate_positive_number("timeout_secs", self.timeout_secs, 1)?;
        Ok(())
    }
}
