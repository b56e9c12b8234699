use semantic_deploy::core::genie::{load_export, room_url, space_stats};
use semantic_deploy::utils::cli::{exit_with_error, parse_or_exit};
use semantic_deploy::utils::{logger, validation::Validate};
use semantic_deploy::{GenieArgs, GenieSpaceDeployer, HttpConfig, WorkspaceClient};

fn banner(title: &str) {
    println!("{}", "=".repeat(70));
    println!("{}", title);
    println!("{}", "=".repeat(70));
}

#[tokio::main]
async fn main() {
    let args: GenieArgs = parse_or_exit();

    logger::init(args.verbose, args.log_json);
    tracing::debug!("CLI config: {:?}", args);

    if let Err(e) = args.validate() {
        exit_with_error("Configuration validation failed", &e);
    }
    let workspace = match args.workspace() {
        Ok(workspace) => workspace,
        Err(e) => exit_with_error("Configuration validation failed", &e),
    };

    banner("SEMANTIC LAYER - GENIE SPACE DEPLOYMENT");
    println!();

    // 1. 載入匯出設定
    println!("[1/3] Loading configuration...");
    let export = match load_export(&args.config_file) {
        Ok(export) => export,
        Err(e) => exit_with_error(&format!("Failed to load {}", args.config_file), &e),
    };
    println!("  ✓ Loaded from: {}", args.config_file);
    println!("  ✓ Source space: {}", export.title);
    println!();

    // 2. 統計內容
    println!("[2/3] Preparing deployment...");
    let stats = match space_stats(&export.serialized_space) {
        Ok(stats) => stats,
        Err(e) => exit_with_error("serialized_space is not valid JSON", &e),
    };
    println!("  ✓ Metric Views: {}", stats.metric_views);
    println!("  ✓ Sample Questions: {}", stats.sample_questions);
    println!("  ✓ Target Warehouse: {}", args.warehouse_id);
    println!();

    if args.dry_run {
        println!("[3/3] [DRY RUN] Would create Genie space '{}'", args.name);
        println!("  Workspace: {}", workspace.host);
        return;
    }

    // 3. 建立
    println!("[3/3] Creating Genie space...");
    let host = workspace.host.clone();
    let client = match WorkspaceClient::new(workspace, HttpConfig::with_timeout_secs(args.timeout_secs)) {
        Ok(client) => client,
        Err(e) => exit_with_error("Failed to build HTTP client", &e),
    };
    let deployer = GenieSpaceDeployer::new(client);

    match deployer
        .create(
            &export,
            &args.name,
            args.description.as_deref(),
            &args.warehouse_id,
        )
        .await
    {
        Ok(space_id) => {
            tracing::info!("Created Genie space {}", space_id);
            println!();
            banner("✅ DEPLOYMENT SUCCESSFUL!");
            println!("Space ID: {}", space_id);
            println!("Name: {}", args.name);
            println!("URL: {}", room_url(&host, &space_id));
            println!();
            println!("Next Steps:");
            println!("  1. Open the URL above to access your Genie space");
            println!("  2. Try one of the sample questions");
            println!("  3. Ask your own natural language questions");
            println!("{}", "=".repeat(70));
        }
        Err(e) => {
            tracing::error!("Genie space creation failed: {}", e);
            println!();
            banner("❌ DEPLOYMENT FAILED");
            println!("Error: {}", e.user_friendly_message());
            if let semantic_deploy::DeployError::ApiError { body, .. } = &e {
                println!("Response: {}", body);
            }
            println!("{}", "=".repeat(70));
            std::process::exit(1);
        }
    }
}
