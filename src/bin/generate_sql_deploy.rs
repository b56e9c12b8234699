use semantic_deploy::config::sql::{ViewManifest, DEFAULT_SOURCE_PLACEHOLDER};
use semantic_deploy::core::sql_script::{collect_views, write_script, SqlScriptGenerator};
use semantic_deploy::utils::cli::{exit_with_error, parse_or_exit};
use semantic_deploy::utils::{logger, validation::Validate};
use semantic_deploy::SqlArgs;
use std::path::Path;

fn main() {
    let args: SqlArgs = parse_or_exit();

    logger::init(args.verbose, args.log_json);
    tracing::debug!("CLI config: {:?}", args);

    if let Err(e) = args.validate() {
        exit_with_error("Configuration validation failed", &e);
    }

    let manifest = match args.manifest.as_deref().map(ViewManifest::from_file).transpose() {
        Ok(manifest) => manifest,
        Err(e) => exit_with_error("Failed to load manifest", &e),
    };

    // 命令列優先於 manifest
    let placeholder = args
        .placeholder
        .clone()
        .or_else(|| manifest.as_ref().and_then(|m| m.source_catalog_placeholder.clone()))
        .unwrap_or_else(|| DEFAULT_SOURCE_PLACEHOLDER.to_string());

    let views = match collect_views(Path::new(&args.views_dir), manifest.as_ref()) {
        Ok(views) => views,
        Err(e) => exit_with_error("Failed to read metric view definitions", &e),
    };
    tracing::info!("Rendering {} views (placeholder: {})", views.len(), placeholder);

    let script = SqlScriptGenerator::new(&placeholder).render(&views, args.format);

    let output = Path::new(&args.output);
    if let Err(e) = write_script(output, &script) {
        exit_with_error(&format!("Failed to write {}", args.output), &e);
    }

    println!("✅ Generated: {}", output.display());
    println!("   Total views: {}", views.len());
}
