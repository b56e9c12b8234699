use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// 從磁碟讀入的 metric view 定義，內容原樣保留
#[derive(Debug, Clone)]
pub struct MetricViewDefinition {
    pub name: String,
    pub path: PathBuf,
    pub yaml: String,
}

/// Unity Catalog 上的三段式名稱
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewTarget {
    pub catalog: String,
    pub schema: String,
    pub name: String,
}

impl ViewTarget {
    pub fn new(catalog: &str, schema: &str, name: &str) -> Self {
        Self {
            catalog: catalog.to_string(),
            schema: schema.to_string(),
            name: name.to_string(),
        }
    }
}

impl fmt::Display for ViewTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.catalog, self.schema, self.name)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateMetricViewRequest<'a> {
    pub name: &'a str,
    pub catalog_name: &'a str,
    pub schema_name: &'a str,
    pub table_type: &'static str,
    pub view_definition: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateMetricViewRequest<'a> {
    pub view_definition: &'a str,
}

/// 遠端 API 的原始回應，狀態碼分支交給呼叫端判斷
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployOutcome {
    Created,
    Updated,
    Planned,
    Failed(String),
}

impl DeployOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, DeployOutcome::Failed(_))
    }
}

#[derive(Debug, Clone)]
pub struct ItemResult {
    pub name: String,
    pub outcome: DeployOutcome,
}

#[derive(Debug, Clone, Default)]
pub struct DeploymentSummary {
    pub items: Vec<ItemResult>,
}

impl DeploymentSummary {
    pub fn record(&mut self, name: &str, outcome: DeployOutcome) {
        self.items.push(ItemResult {
            name: name.to_string(),
            outcome,
        });
    }

    pub fn total(&self) -> usize {
        self.items.len()
    }

    pub fn succeeded(&self) -> usize {
        self.items.iter().filter(|i| i.outcome.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed() == 0
    }
}

/// 從既有 Genie space 匯出的設定檔
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenieSpaceExport {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub serialized_space: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpaceStats {
    pub metric_views: usize,
    pub sample_questions: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateGenieSpaceRequest<'a> {
    pub display_name: &'a str,
    pub description: &'a str,
    pub warehouse_id: &'a str,
    pub serialized_space: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateGenieSpaceResponse {
    pub space_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts_always_add_up() {
        let mut summary = DeploymentSummary::default();
        summary.record("a", DeployOutcome::Created);
        summary.record("b", DeployOutcome::Failed("500".to_string()));
        summary.record("c", DeployOutcome::Updated);
        summary.record("d", DeployOutcome::Planned);

        assert_eq!(summary.total(), 4);
        assert_eq!(summary.succeeded(), 3);
        assert_eq!(summary.failed(), 1);
        assert_eq!(summary.succeeded() + summary.failed(), summary.total());
        assert!(!summary.all_succeeded());
    }

    #[test]
    fn test_view_target_display() {
        let target = ViewTarget::new("main", "semantic", "condition_metrics");
        assert_eq!(target.to_string(), "main.semantic.condition_metrics");
    }
}
