use crate::config::WorkspaceSettings;
use crate::domain::model::{
    ApiResponse, CreateGenieSpaceRequest, CreateMetricViewRequest, UpdateMetricViewRequest,
    ViewTarget,
};
use crate::domain::ports::{CatalogApi, GenieApi};
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, RequestBuilder};
use std::time::Duration;

const TABLES_PATH: &str = "/api/2.1/unity-catalog/tables";
const GENIE_SPACES_PATH: &str = "/api/2.0/genie/spaces";
const METRIC_VIEW_TABLE_TYPE: &str = "METRIC_VIEW";

#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            user_agent: format!("semantic-deploy/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpConfig {
    pub fn with_timeout_secs(secs: u64) -> Self {
        Self {
            request_timeout: Duration::from_secs(secs),
            ..Self::default()
        }
    }
}

/// Workspace REST API 用戶端，所有請求都帶 bearer token
pub struct WorkspaceClient {
    client: Client,
    settings: WorkspaceSettings,
}

impl WorkspaceClient {
    pub fn new(settings: WorkspaceSettings, config: HttpConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self { client, settings })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.settings.host, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.bearer_auth(&self.settings.token)
    }

    async fn send(&self, request: RequestBuilder) -> Result<ApiResponse> {
        let response = self.authorized(request).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        tracing::debug!("API response status: {}", status);
        Ok(ApiResponse { status, body })
    }
}

#[async_trait]
impl CatalogApi for WorkspaceClient {
    async fn create_metric_view(
        &self,
        target: &ViewTarget,
        definition: &str,
    ) -> Result<ApiResponse> {
        let url = self.url(TABLES_PATH);
        let payload = CreateMetricViewRequest {
            name: &target.name,
            catalog_name: &target.catalog,
            schema_name: &target.schema,
            table_type: METRIC_VIEW_TABLE_TYPE,
            view_definition: definition,
        };

        tracing::debug!("POST {} ({})", url, target);
        self.send(self.client.post(&url).json(&payload)).await
    }

    async fn update_metric_view(
        &self,
        target: &ViewTarget,
        definition: &str,
    ) -> Result<ApiResponse> {
        let url = format!("{}/{}", self.url(TABLES_PATH), target);
        let payload = UpdateMetricViewRequest {
            view_definition: definition,
        };

        tracing::debug!("PATCH {}", url);
        self.send(self.client.patch(&url).json(&payload)).await
    }
}

#[async_trait]
impl GenieApi for WorkspaceClient {
    async fn create_genie_space(
        &self,
        display_name: &str,
        description: &str,
        warehouse_id: &str,
        serialized_space: &str,
    ) -> Result<ApiResponse> {
        let url = self.url(GENIE_SPACES_PATH);
        let payload = CreateGenieSpaceRequest {
            display_name,
            description,
            warehouse_id,
            serialized_space,
        };

        tracing::debug!("POST {}", url);
        self.send(self.client.post(&url).json(&payload)).await
    }
}
