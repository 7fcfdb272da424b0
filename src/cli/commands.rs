// ABOUTME: Command implementations for the envgrid CLI
// ABOUTME: Handles the apply, validate, list, render and show commands

use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;
use tracing::{info, warn};

use super::config::Config;
use crate::csv::write_row;
use crate::engine::{DryRunSink, OutputNaming, TemplateDiscovery, TemplateExecutor};
use crate::registry::{Environment, EnvironmentRegistry, RegistryLoader};

const BYTE_ORDER_MARK: char = '\u{FEFF}';

/// Flags that only affect the apply command
#[derive(Debug, Clone, Default)]
pub struct ApplyOptions {
    pub dry_run: bool,
    pub report: Option<PathBuf>,
}

/// Read the value grid named by the configuration
pub fn load_registry(config: &Config) -> Result<EnvironmentRegistry> {
    let path = config.grid_path();
    RegistryLoader::new()
        .with_reader_options(config.reader_options()?)
        .with_strict_mode(!config.grid.lenient)
        .load_file(&path)
        .with_context(|| format!("Failed to load value grid '{}'", path.display()))
}

fn find_environment<'r>(registry: &'r EnvironmentRegistry, name: &str) -> Result<&'r Environment> {
    registry.get(name).ok_or_else(|| {
        let known: Vec<&str> = registry.environment_names().collect();
        anyhow!(
            "Unknown environment '{}'. Available environments: {}",
            name,
            known.join(", ")
        )
    })
}

/// Render every matching template for every environment
pub async fn apply_templates(config: &Config, options: ApplyOptions) -> Result<()> {
    let registry = load_registry(config)?;
    let naming = OutputNaming::new(&config.files.output_transform, &config.files.output_directory)?;
    let files = TemplateDiscovery::new(&config.files.base_directory)
        .with_file_mask(&config.files.file_mask)
        .discover()?;

    if files.is_empty() {
        warn!(
            "No files matching '{}' under {}",
            config.files.file_mask,
            config.files.base_directory.display()
        );
    }

    let mut executor = TemplateExecutor::new(registry, naming)
        .with_default_environment(config.default_environment());
    if options.dry_run {
        info!("Dry run - no files will be written");
        executor = executor.with_sink(Box::new(DryRunSink::new()));
    }

    let run = executor.run(&files).await;

    if let Some(report_path) = &options.report {
        let json_content = run
            .to_json()
            .map_err(|e| anyhow!("Failed to serialize run report to JSON: {}", e))?;
        tokio::fs::write(report_path, json_content)
            .await
            .map_err(|e| anyhow!("Failed to write report '{}': {}", report_path.display(), e))?;
        info!("Run report written to: {}", report_path.display());
    }

    for file in &run.files {
        println!("{} {}", file.status, file.input.display());
        if let Some(error) = &file.error {
            println!("    Error: {}", error);
        }
    }
    println!(
        "Applied {} of {} templates across {} environments ({} outputs, {} copied back)",
        run.summary.successful_files,
        files.len(),
        run.environments.len(),
        run.summary.outputs_written,
        run.summary.copybacks
    );

    if run.has_failures() {
        return Err(anyhow!("Apply failed with status: {}", run.status));
    }
    Ok(())
}

/// Load the grid with every integrity check enabled and summarise it
pub async fn validate_grid(config: &Config) -> Result<()> {
    let mut strict = config.clone();
    strict.grid.lenient = false;
    let registry = load_registry(&strict)?;

    let keys = registry.iter().next().map(Environment::len).unwrap_or(0);
    println!("✓ Value grid '{}' is valid", strict.grid_path().display());
    println!("  Environments: {}", registry.len());
    println!("  Keys: {}", keys);
    Ok(())
}

pub async fn list_environments(config: &Config) -> Result<()> {
    let registry = load_registry(config)?;
    for name in registry.environment_names() {
        println!("{}", name);
    }
    Ok(())
}

/// Transform one template for one environment and print the result
pub async fn render_template(config: &Config, environment: &str, template: PathBuf) -> Result<()> {
    let registry = load_registry(config)?;
    let environment = find_environment(&registry, environment)?;

    let content = tokio::fs::read_to_string(&template)
        .await
        .with_context(|| format!("Failed to read template '{}'", template.display()))?;
    let content = content.strip_prefix(BYTE_ORDER_MARK).unwrap_or(&content);

    print!("{}", environment.transform(content));
    Ok(())
}

/// Print an environment as a two-column key,value grid
pub async fn show_environment(config: &Config, environment: &str) -> Result<()> {
    let options = config.reader_options()?;
    let registry = load_registry(config)?;
    let environment = find_environment(&registry, environment)?;

    println!("{}", write_row(["key", "value"], &options));
    for (key, value) in environment.values() {
        println!("{}", write_row([key.as_str(), value.as_str()], &options));
    }
    Ok(())
}
