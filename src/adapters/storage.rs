use crate::domain::model::MetricViewDefinition;
use crate::domain::ports::DefinitionStore;
use crate::utils::error::{DeployError, Result};
use std::fs;
use std::path::{Path, PathBuf};

const DEFINITION_EXTENSIONS: [&str; 2] = ["yaml", "yml"];

/// 本機目錄中的 metric view 定義檔
#[derive(Debug, Clone)]
pub struct LocalDefinitionStore {
    base_path: PathBuf,
}

impl LocalDefinitionStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// 解析單一檔案，不經過目錄列舉
    pub fn read_definition(path: &Path) -> Result<MetricViewDefinition> {
        let yaml = fs::read_to_string(path)?;
        definition_from_text(path, yaml)
    }
}

fn definition_from_text(path: &Path, yaml: String) -> Result<MetricViewDefinition> {
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| DeployError::DefinitionError {
            path: path.display().to_string(),
            message: "File name is not valid UTF-8".to_string(),
        })?
        .to_string();

    parse_mapping(path, &yaml)?;

    Ok(MetricViewDefinition {
        name,
        path: path.to_path_buf(),
        yaml,
    })
}

/// 只檢查是否為 YAML mapping，內容本身交給平台驗證
pub fn parse_mapping(path: &Path, yaml: &str) -> Result<serde_yaml::Mapping> {
    let value: serde_yaml::Value =
        serde_yaml::from_str(yaml).map_err(|e| DeployError::DefinitionError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

    match value {
        serde_yaml::Value::Mapping(map) => Ok(map),
        _ => Err(DeployError::DefinitionError {
            path: path.display().to_string(),
            message: "Expected a YAML mapping at the top level".to_string(),
        }),
    }
}

impl DefinitionStore for LocalDefinitionStore {
    fn list_definitions(&self) -> Result<Vec<PathBuf>> {
        if !self.base_path.is_dir() {
            return Err(DeployError::InvalidConfigValueError {
                field: "views_dir".to_string(),
                value: self.base_path.display().to_string(),
                reason: format!("Directory not found: {}", self.base_path.display()),
            });
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(&self.base_path)? {
            let path = entry?.path();
            let is_definition = path.is_file()
                && path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| DEFINITION_EXTENSIONS.contains(&ext));
            if is_definition {
                files.push(path);
            }
        }

        if files.is_empty() {
            return Err(DeployError::InvalidConfigValueError {
                field: "views_dir".to_string(),
                value: self.base_path.display().to_string(),
                reason: format!("No YAML files found in {}", self.base_path.display()),
            });
        }

        files.sort();
        tracing::debug!("Found {} definition files", files.len());
        Ok(files)
    }

    /// path 為 list_definitions 回傳的路徑，已包含 base_path
    async fn load_definition(&self, path: &Path) -> Result<MetricViewDefinition> {
        let yaml = tokio::fs::read_to_string(path).await?;
        definition_from_text(path, yaml)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const VIEW: &str = "version: 1.1\nsource: main.omop.person\nmeasures:\n  - name: Total\n    expr: COUNT(1)\n";

    #[test]
    fn test_list_definitions_sorted_and_filtered() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b_metrics.yaml"), VIEW).unwrap();
        fs::write(dir.path().join("a_metrics.yml"), VIEW).unwrap();
        fs::write(dir.path().join("README.md"), "# notes").unwrap();

        let store = LocalDefinitionStore::new(dir.path());
        let files = store.list_definitions().unwrap();

        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a_metrics.yml", "b_metrics.yaml"]);
    }

    #[test]
    fn test_list_definitions_missing_dir() {
        let store = LocalDefinitionStore::new("/definitely/not/here");
        let err = store.list_definitions().unwrap_err();
        assert!(err.to_string().contains("Directory not found"));
    }

    #[test]
    fn test_list_definitions_empty_dir() {
        let dir = TempDir::new().unwrap();
        let store = LocalDefinitionStore::new(dir.path());
        let err = store.list_definitions().unwrap_err();
        assert!(err.to_string().contains("No YAML files found"));
    }

    #[tokio::test]
    async fn test_load_definition_keeps_text_verbatim() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("patient_metrics.yaml");
        fs::write(&path, VIEW).unwrap();

        let store = LocalDefinitionStore::new(dir.path());
        let def = store.load_definition(&path).await.unwrap();

        assert_eq!(def.name, "patient_metrics");
        assert_eq!(def.yaml, VIEW);
    }

    #[tokio::test]
    async fn test_load_listed_definitions_from_relative_dir() {
        // cargo test 以套件根目錄為工作目錄
        let store = LocalDefinitionStore::new("metric_views");
        let files = store.list_definitions().unwrap();
        assert!(!files.is_empty());

        for path in files {
            assert!(path.is_relative());
            let def = store.load_definition(&path).await.unwrap();
            assert_eq!(def.path, path);
            assert!(def.yaml.contains("source:"));
        }
    }

    #[tokio::test]
    async fn test_load_definition_rejects_scalar_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.yaml");
        fs::write(&path, "just a string").unwrap();

        let store = LocalDefinitionStore::new(dir.path());
        let err = store.load_definition(&path).await.unwrap_err();
        assert!(matches!(err, DeployError::DefinitionError { .. }));
    }
}
