//! Builds a parameterized SQL deployment script (or notebook) from metric view
//! definitions. The script relies on session variables `source_catalog`,
//! `target_catalog` and `target_schema` being set before it runs.

use crate::adapters::storage::{parse_mapping, LocalDefinitionStore};
use crate::config::sql::{OutputFormat, ViewManifest};
use crate::domain::ports::DefinitionStore;
use crate::utils::error::{DeployError, Result};
use chrono::{DateTime, Utc};
use std::path::Path;

const RULE: &str =
    "-- =============================================================================";
const SOURCE_CATALOG_EXPR: &str = "\" || :source_catalog || \"";
const METRIC_VIEW_YAML_VERSION: &str = "1.1";

#[derive(Debug, Clone)]
pub struct ViewSpec {
    pub name: String,
    pub comment: String,
    pub yaml: String,
}

/// 一個輸出區塊；notebook 格式下每個區塊是一個 cell
#[derive(Debug, Clone)]
struct Block {
    heading: Option<String>,
    sql: String,
}

/// 依 manifest 順序讀取；沒有 manifest 時使用目錄內所有 YAML
pub fn collect_views(views_dir: &Path, manifest: Option<&ViewManifest>) -> Result<Vec<ViewSpec>> {
    match manifest {
        Some(manifest) => manifest
            .views
            .iter()
            .map(|entry| {
                let path = find_definition_file(views_dir, &entry.name)?;
                let definition = LocalDefinitionStore::read_definition(&path)?;
                Ok(ViewSpec {
                    name: entry.name.clone(),
                    comment: entry.comment.clone(),
                    yaml: definition.yaml,
                })
            })
            .collect(),
        None => {
            let store = LocalDefinitionStore::new(views_dir);
            store
                .list_definitions()?
                .iter()
                .map(|path| {
                    let definition = LocalDefinitionStore::read_definition(path)?;
                    let comment = parse_mapping(path, &definition.yaml)?
                        .get("comment")
                        .and_then(|v| v.as_str())
                        .unwrap_or_default()
                        .to_string();
                    Ok(ViewSpec {
                        name: definition.name,
                        comment,
                        yaml: definition.yaml,
                    })
                })
                .collect()
        }
    }
}

fn find_definition_file(views_dir: &Path, name: &str) -> Result<std::path::PathBuf> {
    ["yaml", "yml"]
        .iter()
        .map(|ext| views_dir.join(format!("{}.{}", name, ext)))
        .find(|p| p.is_file())
        .ok_or_else(|| DeployError::DefinitionError {
            path: views_dir.join(format!("{}.yaml", name)).display().to_string(),
            message: "Listed in manifest but no definition file found".to_string(),
        })
}

/// "lab_vitals_metrics" -> "Lab Vitals Metrics"
pub fn title_case(name: &str) -> String {
    name.split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// 去掉 version 行並跳脫成 SQL 雙引號字串內容，再把來源 catalog 換成參數
pub fn prepare_body(yaml: &str, placeholder: &str) -> String {
    let body = yaml
        .trim()
        .lines()
        .filter(|line| !line.starts_with("version:"))
        .collect::<Vec<_>>()
        .join("\n");

    body.trim()
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace(placeholder, SOURCE_CATALOG_EXPR)
}

pub struct SqlScriptGenerator {
    placeholder: String,
    generated_at: DateTime<Utc>,
}

impl SqlScriptGenerator {
    pub fn new(placeholder: &str) -> Self {
        Self {
            placeholder: placeholder.to_string(),
            generated_at: Utc::now(),
        }
    }

    pub fn with_timestamp(mut self, generated_at: DateTime<Utc>) -> Self {
        self.generated_at = generated_at;
        self
    }

    pub fn view_ddl(&self, view: &ViewSpec) -> String {
        let name = &view.name;
        let comment = view.comment.replace('\'', "''");
        let body = prepare_body(&view.yaml, &self.placeholder);

        format!(
            r#"DECLARE OR REPLACE {name}_ddl STRING;

SET VAR {name}_ddl =
"CREATE OR REPLACE VIEW {name}
COMMENT '{comment}'
WITH METRICS
LANGUAGE YAML
version: {version}

{body}
";

EXECUTE IMMEDIATE {name}_ddl;
SELECT 'Created: {name}' AS status;
"#,
            version = METRIC_VIEW_YAML_VERSION,
        )
    }

    fn header(&self) -> String {
        format!(
            r#"-- Creates every metric view in the target catalog and schema.
--
-- Variables:
--   source_catalog: catalog containing the source tables
--   target_catalog: catalog where metric views will be created
--   target_schema: schema within target catalog for metric views
--
-- Generated: {}

USE CATALOG IDENTIFIER(:target_catalog);
USE SCHEMA IDENTIFIER(:target_schema);
"#,
            self.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        )
    }

    fn footer(count: usize) -> String {
        format!(
            r#"SELECT
  '✅ Metric Views Deployment Complete' AS status,
  :target_catalog AS catalog,
  :target_schema AS schema,
  :source_catalog AS source_catalog,
  '{count} metric views created' AS views_created;

SHOW VIEWS IN IDENTIFIER(:target_catalog || '.' || :target_schema);
"#
        )
    }

    fn blocks(&self, views: &[ViewSpec]) -> Vec<Block> {
        let mut blocks = vec![Block {
            heading: Some("Deploy Metric Views".to_string()),
            sql: self.header(),
        }];

        for (i, view) in views.iter().enumerate() {
            blocks.push(Block {
                heading: Some(format!("{}. {}", i + 1, title_case(&view.name))),
                sql: self.view_ddl(view),
            });
        }

        blocks.push(Block {
            heading: Some("Deployment Complete - Summary".to_string()),
            sql: Self::footer(views.len()),
        });
        blocks
    }

    pub fn render(&self, views: &[ViewSpec], format: OutputFormat) -> String {
        let blocks = self.blocks(views);
        match format {
            OutputFormat::Sql => render_sql(&blocks),
            OutputFormat::Notebook => render_notebook(&blocks),
        }
    }
}

fn render_sql(blocks: &[Block]) -> String {
    let mut out = String::new();
    for block in blocks {
        if let Some(heading) = &block.heading {
            out.push_str(&format!("{}\n-- {}\n{}\n", RULE, heading, RULE));
        }
        out.push_str(&block.sql);
        out.push('\n');
    }
    out
}

fn magic(cell: &str) -> String {
    cell.lines()
        .map(|line| {
            if line.is_empty() {
                "# MAGIC".to_string()
            } else {
                format!("# MAGIC {}", line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_notebook(blocks: &[Block]) -> String {
    let mut cells = Vec::new();
    for block in blocks {
        if let Some(heading) = &block.heading {
            cells.push(magic(&format!("%md\n## {}", heading)));
        }
        cells.push(magic(&format!("%sql\n{}", block.sql.trim_end())));
    }

    format!(
        "# Databricks notebook source\n{}\n",
        cells.join("\n\n# COMMAND ----------\n\n")
    )
}

/// 寫入輸出檔，必要時建立上層目錄
pub fn write_script(output: &Path, content: &str) -> Result<()> {
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(output, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const PLACEHOLDER: &str = "conn_sf_catalog";

    fn view() -> ViewSpec {
        ViewSpec {
            name: "patient_population_metrics".to_string(),
            comment: "Patients' demographics".to_string(),
            yaml: "version: 0.1\nsource: conn_sf_catalog.OMOP.PERSON\njoins:\n  - name: location\n    \"on\": source.location_id = location.location_id\n".to_string(),
        }
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("lab_vitals_metrics"), "Lab Vitals Metrics");
        assert_eq!(title_case("OMOP_person"), "Omop Person");
    }

    #[test]
    fn test_prepare_body() {
        let body = prepare_body(&view().yaml, PLACEHOLDER);
        assert!(!body.contains("version:"));
        assert!(body.starts_with("source: \" || :source_catalog || \".OMOP.PERSON"));
        assert!(body.contains("\\\"on\\\": source.location_id"));
    }

    #[test]
    fn test_view_ddl_shape() {
        let generator = SqlScriptGenerator::new(PLACEHOLDER);
        let ddl = generator.view_ddl(&view());

        assert!(ddl.starts_with("DECLARE OR REPLACE patient_population_metrics_ddl STRING;"));
        assert!(ddl.contains("\"CREATE OR REPLACE VIEW patient_population_metrics\n"));
        assert!(ddl.contains("COMMENT 'Patients'' demographics'"));
        assert!(ddl.contains("WITH METRICS\nLANGUAGE YAML\nversion: 1.1\n"));
        assert!(ddl.contains("EXECUTE IMMEDIATE patient_population_metrics_ddl;"));
        assert!(ddl.contains("SELECT 'Created: patient_population_metrics' AS status;"));
    }

    #[test]
    fn test_render_sql_script() {
        let ts = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let generator = SqlScriptGenerator::new(PLACEHOLDER).with_timestamp(ts);
        let mut second = view();
        second.name = "condition_metrics".to_string();

        let script = generator.render(&[view(), second], OutputFormat::Sql);

        assert!(script.starts_with(RULE));
        assert!(script.contains("-- Generated: 2026-01-02 03:04:05 UTC"));
        assert!(script.contains("USE CATALOG IDENTIFIER(:target_catalog);"));
        assert!(script.contains("-- 1. Patient Population Metrics"));
        assert!(script.contains("-- 2. Condition Metrics"));
        assert!(script.contains("'2 metric views created' AS views_created"));
        let first = script.find("patient_population_metrics_ddl").unwrap();
        let later = script.find("condition_metrics_ddl").unwrap();
        assert!(first < later);
    }

    #[test]
    fn test_render_notebook() {
        let generator = SqlScriptGenerator::new(PLACEHOLDER);
        let notebook = generator.render(&[view()], OutputFormat::Notebook);

        assert!(notebook.starts_with("# Databricks notebook source\n"));
        assert!(notebook.contains("# COMMAND ----------"));
        assert!(notebook.contains("# MAGIC %sql\n# MAGIC DECLARE OR REPLACE"));
        assert!(notebook.contains("# MAGIC %md\n# MAGIC ## 1. Patient Population Metrics"));
        assert!(notebook.lines().all(|l| l.is_empty()
            || l.starts_with("# MAGIC")
            || l == "# COMMAND ----------"
            || l == "# Databricks notebook source"));
    }
}
