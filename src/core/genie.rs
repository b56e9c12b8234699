use crate::domain::model::{CreateGenieSpaceResponse, GenieSpaceExport, SpaceStats};
use crate::domain::ports::GenieApi;
use crate::utils::error::{DeployError, Result};
use serde_json::Value;
use std::path::Path;

/// 讀取匯出的 Genie space 設定
pub fn load_export<P: AsRef<Path>>(path: P) -> Result<GenieSpaceExport> {
    let content = std::fs::read_to_string(path)?;
    let export: GenieSpaceExport = serde_json::from_str(&content)?;
    Ok(export)
}

/// serialized_space 本身是 JSON 字串，缺少的欄位視為 0
pub fn space_stats(serialized_space: &str) -> Result<SpaceStats> {
    let parsed: Value = serde_json::from_str(serialized_space)?;

    let count = |pointer: &str| {
        parsed
            .pointer(pointer)
            .and_then(Value::as_array)
            .map_or(0, Vec::len)
    };

    Ok(SpaceStats {
        metric_views: count("/data_sources/metric_views"),
        sample_questions: count("/config/sample_questions"),
    })
}

pub fn room_url(host: &str, space_id: &str) -> String {
    format!("{}/genie/rooms/{}", host.trim_end_matches('/'), space_id)
}

pub struct GenieSpaceDeployer<A: GenieApi> {
    api: A,
}

impl<A: GenieApi> GenieSpaceDeployer<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    /// 以匯出設定複製一個新的 space，回傳新的 space_id
    pub async fn create(
        &self,
        export: &GenieSpaceExport,
        display_name: &str,
        description: Option<&str>,
        warehouse_id: &str,
    ) -> Result<String> {
        let description = description.unwrap_or(&export.description);

        tracing::info!("Creating Genie space '{}' on warehouse {}", display_name, warehouse_id);
        let response = self
            .api
            .create_genie_space(
                display_name,
                description,
                warehouse_id,
                &export.serialized_space,
            )
            .await?;

        if !response.is_success() {
            return Err(DeployError::ApiError {
                status: response.status,
                body: response.body,
            });
        }

        let created: CreateGenieSpaceResponse = serde_json::from_str(&response.body)?;
        created.space_id.ok_or_else(|| DeployError::ApiError {
            status: response.status,
            body: format!("response did not include space_id: {}", response.body),
        })
    }
}
