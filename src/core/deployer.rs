use crate::domain::model::{
    DeployOutcome, DeploymentSummary, MetricViewDefinition, ViewTarget,
};
use crate::domain::ports::{CatalogApi, DefinitionStore};
use crate::utils::error::Result;
use std::path::PathBuf;

/// 依序部署目錄中的每個 metric view：先建立，409 時改為更新
pub struct MetricViewDeployer<D: DefinitionStore, A: CatalogApi> {
    store: D,
    api: A,
    catalog: String,
    schema: String,
    dry_run: bool,
}

impl<D: DefinitionStore, A: CatalogApi> MetricViewDeployer<D, A> {
    pub fn new(store: D, api: A, catalog: &str, schema: &str) -> Self {
        Self {
            store,
            api,
            catalog: catalog.to_string(),
            schema: schema.to_string(),
            dry_run: false,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        self.store.list_definitions()
    }

    pub async fn run(&self) -> Result<DeploymentSummary> {
        let files = self.discover()?;
        Ok(self.deploy_all(&files).await)
    }

    /// 單一項目失敗不會中斷其餘項目
    pub async fn deploy_all(&self, files: &[PathBuf]) -> DeploymentSummary {
        let mut summary = DeploymentSummary::default();

        for file in files {
            let fallback_name = file
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| file.display().to_string());
            println!("📊 Processing: {}", fallback_name);

            let outcome = match self.store.load_definition(file).await {
                Ok(definition) => self.deploy_one(&definition).await,
                Err(e) => {
                    tracing::warn!("Failed to load {}: {}", file.display(), e);
                    println!("❌ Error processing {}: {}", file.display(), e);
                    DeployOutcome::Failed(e.to_string())
                }
            };

            summary.record(&fallback_name, outcome);
            println!();
        }

        summary
    }

    pub async fn deploy_one(&self, definition: &MetricViewDefinition) -> DeployOutcome {
        let target = ViewTarget::new(&self.catalog, &self.schema, &definition.name);

        if self.dry_run {
            println!("   [DRY RUN] Would create: {}", target);
            return DeployOutcome::Planned;
        }

        match self.api.create_metric_view(&target, &definition.yaml).await {
            Ok(response) if matches!(response.status, 200 | 201) => {
                println!("✅ Successfully created: {}", target);
                DeployOutcome::Created
            }
            Ok(response) if response.status == 409 => {
                println!("⚠️  Already exists: {}", target);
                self.update(&target, definition).await
            }
            Ok(response) => {
                println!("❌ Failed to create {}: {}", target.name, response.status);
                println!("   Response: {}", response.body);
                DeployOutcome::Failed(format!("create returned {}", response.status))
            }
            Err(e) => {
                tracing::debug!("Create request for {} failed: {:?}", target, e);
                println!("❌ Error deploying {}: {}", target.name, e);
                DeployOutcome::Failed(e.to_string())
            }
        }
    }

    async fn update(&self, target: &ViewTarget, definition: &MetricViewDefinition) -> DeployOutcome {
        match self.api.update_metric_view(target, &definition.yaml).await {
            Ok(response) if response.status == 200 => {
                println!("✅ Successfully updated: {}", target);
                DeployOutcome::Updated
            }
            Ok(response) => {
                println!("❌ Failed to update {}: {}", target.name, response.status);
                println!("   Response: {}", response.body);
                DeployOutcome::Failed(format!("update returned {}", response.status))
            }
            Err(e) => {
                tracing::debug!("Update request for {} failed: {:?}", target, e);
                println!("❌ Error updating {}: {}", target.name, e);
                DeployOutcome::Failed(e.to_string())
            }
        }
    }
}

pub fn print_summary(summary: &DeploymentSummary) {
    println!("{}", "=".repeat(60));
    println!("📈 Deployment Summary");
    println!("   Total views: {}", summary.total());
    println!("   Successful: {}", summary.succeeded());
    println!("   Failed: {}", summary.failed());

    if summary.all_succeeded() {
        println!("\n✅ All metric views deployed successfully!");
    } else {
        println!(
            "\n⚠️  {} metric view(s) failed to deploy",
            summary.failed()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::ApiResponse;
    use crate::utils::error::DeployError;
    use async_trait::async_trait;
    use std::collections::{BTreeMap, VecDeque};
    use std::path::Path;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct MockStore {
        files: BTreeMap<String, String>,
    }

    impl MockStore {
        fn with(files: &[(&str, &str)]) -> Self {
            Self {
                files: files
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            }
        }
    }

    impl DefinitionStore for MockStore {
        fn list_definitions(&self) -> Result<Vec<PathBuf>> {
            Ok(self.files.keys().map(PathBuf::from).collect())
        }

        async fn load_definition(&self, path: &Path) -> Result<MetricViewDefinition> {
            let key = path.to_string_lossy().to_string();
            let yaml = self.files.get(&key).cloned().ok_or_else(|| {
                DeployError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", key),
                ))
            })?;
            if yaml.is_empty() {
                return Err(DeployError::DefinitionError {
                    path: key,
                    message: "empty".to_string(),
                });
            }
            Ok(MetricViewDefinition {
                name: path.file_stem().unwrap().to_string_lossy().to_string(),
                path: path.to_path_buf(),
                yaml,
            })
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Create(String),
        Update(String),
    }

    /// 依序回傳預先設定的狀態碼，並記錄每次呼叫
    #[derive(Clone, Default)]
    struct MockApi {
        statuses: Arc<Mutex<VecDeque<u16>>>,
        calls: Arc<Mutex<Vec<Call>>>,
    }

    impl MockApi {
        fn scripted(statuses: &[u16]) -> Self {
            Self {
                statuses: Arc::new(Mutex::new(statuses.iter().copied().collect())),
                calls: Arc::default(),
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn next(&self) -> ApiResponse {
            let status = self.statuses.lock().unwrap().pop_front().unwrap_or(500);
            ApiResponse {
                status,
                body: format!("{{\"status\":{}}}", status),
            }
        }
    }

    #[async_trait]
    impl CatalogApi for MockApi {
        async fn create_metric_view(&self, target: &ViewTarget, _definition: &str) -> Result<ApiResponse> {
            self.calls.lock().unwrap().push(Call::Create(target.to_string()));
            Ok(self.next())
        }

        async fn update_metric_view(&self, target: &ViewTarget, _definition: &str) -> Result<ApiResponse> {
            self.calls.lock().unwrap().push(Call::Update(target.to_string()));
            Ok(self.next())
        }
    }

    const VIEW: &str = "source: main.omop.person\n";

    #[tokio::test]
    async fn test_dry_run_plans_every_file_without_calls() {
        let store = MockStore::with(&[("a.yaml", VIEW), ("b.yaml", VIEW), ("c.yaml", VIEW)]);
        let api = MockApi::default();
        let deployer =
            MetricViewDeployer::new(store, api.clone(), "main", "semantic").with_dry_run(true);

        let summary = deployer.run().await.unwrap();

        assert_eq!(summary.total(), 3);
        assert!(summary
            .items
            .iter()
            .all(|i| i.outcome == DeployOutcome::Planned));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_conflict_triggers_single_update_to_same_name() {
        let store = MockStore::with(&[("condition_metrics.yaml", VIEW)]);
        let api = MockApi::scripted(&[409, 200]);
        let deployer = MetricViewDeployer::new(store, api.clone(), "main", "semantic");

        let summary = deployer.run().await.unwrap();

        assert_eq!(
            api.calls(),
            vec![
                Call::Create("main.semantic.condition_metrics".to_string()),
                Call::Update("main.semantic.condition_metrics".to_string()),
            ]
        );
        assert_eq!(summary.items[0].outcome, DeployOutcome::Updated);
    }

    #[tokio::test]
    async fn test_failures_do_not_halt_processing() {
        let store = MockStore::with(&[
            ("a.yaml", VIEW),
            ("b.yaml", ""),
            ("c.yaml", VIEW),
            ("d.yaml", VIEW),
        ]);
        // a: created, c: server error, d: conflict then failed update
        let api = MockApi::scripted(&[201, 500, 409, 403]);
        let deployer = MetricViewDeployer::new(store, api.clone(), "main", "semantic");

        let summary = deployer.run().await.unwrap();

        assert_eq!(summary.total(), 4);
        assert_eq!(summary.succeeded(), 1);
        assert_eq!(summary.failed(), 3);
        assert_eq!(summary.succeeded() + summary.failed(), summary.total());
        assert_eq!(api.calls().len(), 4);
        assert!(!summary.all_succeeded());
    }

    #[tokio::test]
    async fn test_accepted_status_is_not_success() {
        let store = MockStore::with(&[("a.yaml", VIEW)]);
        let api = MockApi::scripted(&[202]);
        let deployer = MetricViewDeployer::new(store, api, "main", "semantic");

        let summary = deployer.run().await.unwrap();
        assert_eq!(summary.failed(), 1);
    }
}
