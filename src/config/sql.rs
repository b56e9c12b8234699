use crate::utils::error::{DeployError, Result};
use crate::utils::validation::{validate_identifier, validate_path, Validate};
use clap::{Parser, ValueEnum};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

pub const DEFAULT_SOURCE_PLACEHOLDER: &str = "conn_sf_cursor_ward_catalog";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain SQL script
    Sql,
    /// Databricks notebook source with one %sql cell per block
    Notebook,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "generate-sql-deploy")]
#[command(about = "Generate a parameterized SQL script that creates every metric view")]
pub struct SqlArgs {
    /// Directory containing metric view YAML files
    #[arg(long, default_value = "metric_views")]
    pub views_dir: String,

    /// TOML manifest listing views and their comments, in order
    #[arg(long)]
    pub manifest: Option<String>,

    /// Literal source catalog name replaced by the :source_catalog parameter
    #[arg(long)]
    pub placeholder: Option<String>,

    /// Output file
    #[arg(long, default_value = "sql/ddl/deploy_metric_views.sql")]
    pub output: String,

    #[arg(long, value_enum, default_value_t = OutputFormat::Sql)]
    pub format: OutputFormat,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

impl Validate for SqlArgs {
    fn validate(&self) -> Result<()> {
        validate_path("views_dir", &self.views_dir)?;
        validate_path("output", &self.output)?;
        if let Some(manifest) = &self.manifest {
            validate_path("manifest", manifest)?;
        }
        if let Some(placeholder) = &self.placeholder {
            validate_identifier("placeholder", placeholder)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewEntry {
    pub name: String,
    #[serde(default)]
    pub comment: String,
}

/// views.toml：決定產生順序與每個 view 的註解
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewManifest {
    pub source_catalog_placeholder: Option<String>,
    #[serde(default)]
    pub views: Vec<ViewEntry>,
}

fn env_var_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap_or_else(|_| unreachable!())
    })
}

impl ViewManifest {
    /// 從 TOML 檔案載入
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);
        let manifest: ViewManifest = toml::from_str(&processed)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// 替換 ${VAR}，未定義的變數保留原樣
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }
}

impl Validate for ViewManifest {
    fn validate(&self) -> Result<()> {
        if self.views.is_empty() {
            return Err(DeployError::InvalidConfigValueError {
                field: "views".to_string(),
                value: String::new(),
                reason: "Manifest must list at least one view".to_string(),
            });
        }

        for (i, view) in self.views.iter().enumerate() {
            validate_identifier(&format!("views[{}].name", i), &view.name)?;
            if self.views[..i].iter().any(|v| v.name == view.name) {
                return Err(DeployError::InvalidConfigValueError {
                    field: format!("views[{}].name", i),
                    value: view.name.clone(),
                    reason: "Duplicate view name".to_string(),
                });
            }
        }

        if let Some(placeholder) = &self.source_catalog_placeholder {
            validate_identifier("source_catalog_placeholder", placeholder)?;
        }
        Ok(())
    }
}
