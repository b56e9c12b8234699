use semantic_deploy::core::deployer::print_summary;
use semantic_deploy::utils::cli::{exit_with_error, parse_or_exit};
use semantic_deploy::utils::{logger, validation::Validate};
use semantic_deploy::{
    DeployArgs, HttpConfig, LocalDefinitionStore, MetricViewDeployer, WorkspaceClient,
};

#[tokio::main]
async fn main() {
    let args: DeployArgs = parse_or_exit();

    // 初始化日誌
    logger::init(args.verbose, args.log_json);

    tracing::info!("Starting deploy-metric-views");
    tracing::debug!("CLI config: {:?}", args);

    // 驗證配置，在任何網路請求之前
    if let Err(e) = args.validate() {
        exit_with_error("Configuration validation failed", &e);
    }
    let workspace = match args.workspace() {
        Ok(workspace) => workspace,
        Err(e) => exit_with_error("Configuration validation failed", &e),
    };
    let host = workspace.host.clone();

    let client = match WorkspaceClient::new(workspace, HttpConfig::with_timeout_secs(args.timeout_secs)) {
        Ok(client) => client,
        Err(e) => exit_with_error("Failed to build HTTP client", &e),
    };

    let store = LocalDefinitionStore::new(&args.views_dir);
    let deployer = MetricViewDeployer::new(store, client, &args.catalog, &args.schema)
        .with_dry_run(args.dry_run);

    let files = match deployer.discover() {
        Ok(files) => files,
        Err(e) => exit_with_error("Definition discovery failed", &e),
    };

    println!(
        "\n🚀 Deploying {} metric views to {}.{}",
        files.len(),
        args.catalog,
        args.schema
    );
    println!("   Workspace: {}", host);
    if args.dry_run {
        println!("   🔍 DRY RUN MODE - no API calls will be made");
    }
    println!();

    let summary = deployer.deploy_all(&files).await;
    print_summary(&summary);

    tracing::info!(
        "Deployment finished: {} succeeded, {} failed",
        summary.succeeded(),
        summary.failed()
    );

    std::process::exit(if summary.all_succeeded() { 0 } else { 1 });
}
