use crate::domain::model::{ApiResponse, MetricViewDefinition, ViewTarget};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

pub trait DefinitionStore: Send + Sync {
    /// 依檔名排序列出所有定義檔
    fn list_definitions(&self) -> Result<Vec<PathBuf>>;
    /// 接受 list_definitions 回傳的路徑，原樣讀取
    fn load_definition(
        &self,
        path: &Path,
    ) -> impl std::future::Future<Output = Result<MetricViewDefinition>> + Send;
}

#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn create_metric_view(&self, target: &ViewTarget, definition: &str)
        -> Result<ApiResponse>;
    async fn update_metric_view(&self, target: &ViewTarget, definition: &str)
        -> Result<ApiResponse>;
}

#[async_trait]
pub trait GenieApi: Send + Sync {
    async fn create_genie_space(
        &self,
        display_name: &str,
        description: &str,
        warehouse_id: &str,
        serialized_space: &str,
    ) -> Result<ApiResponse>;
}
