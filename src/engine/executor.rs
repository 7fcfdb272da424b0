// ABOUTME: Applies a template file to every environment in a registry
// ABOUTME: Prepares outputs, writes one transform per environment and copies back the default

use std::path::{Component, Path, PathBuf};

use tracing::{error, info, instrument, warn};

use super::error::{ExecutionError, Result};
use super::naming::OutputNaming;
use super::result::{FileResult, FileStatus, RunResult};
use super::sink::{FileSink, OutputSink};
use crate::registry::validation::normalise_name;
use crate::registry::{Environment, EnvironmentRegistry};

pub const DEFAULT_ENVIRONMENT: &str = "dev";

const BYTE_ORDER_MARK: char = '\u{FEFF}';

pub struct TemplateExecutor {
    registry: EnvironmentRegistry,
    naming: OutputNaming,
    default_environment: Option<String>,
    sink: Box<dyn OutputSink>,
}

impl TemplateExecutor {
    pub fn new(registry: EnvironmentRegistry, naming: OutputNaming) -> Self {
        Self {
            registry,
            naming,
            default_environment: Some(DEFAULT_ENVIRONMENT.to_string()),
            sink: Box::new(FileSink::new()),
        }
    }

    /// Environment whose output is also copied to the environment-free name.
    ///
    /// Matched trimmed and case-insensitively; `None` disables the copy.
    pub fn with_default_environment(mut self, environment: Option<String>) -> Self {
        self.default_environment = environment;
        self
    }

    pub fn with_sink(mut self, sink: Box<dyn OutputSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn registry(&self) -> &EnvironmentRegistry {
        &self.registry
    }

    pub fn naming(&self) -> &OutputNaming {
        &self.naming
    }

    fn is_default(&self, environment: &Environment) -> bool {
        self.default_environment
            .as_deref()
            .map(|default| normalise_name(default) == normalise_name(environment.name()))
            .unwrap_or(false)
    }

    /// Apply every file in order, stopping at the first failure.
    ///
    /// The failing file is still recorded in the returned result.
    pub async fn run(&self, files: &[PathBuf]) -> RunResult {
        let environments = self
            .registry
            .environment_names()
            .map(str::to_string)
            .collect();
        let mut run = RunResult::new(environments, self.sink.is_dry_run());

        if let Some(default) = &self.default_environment {
            if !self.registry.iter().any(|env| self.is_default(env)) {
                warn!(
                    "Default environment '{}' is not in the value grid, nothing will be copied back",
                    default
                );
            }
        }

        info!(
            "Applying {} templates across {} environments",
            files.len(),
            self.registry.len()
        );

        for file in files {
            let result = self.execute_file(file).await;
            let failed = result.is_failed();
            run.add_file_result(result);
            if failed {
                break;
            }
        }

        run.mark_completed();
        run
    }

    /// Apply one template file to every environment
    #[instrument(skip(self, input), fields(input = %input.display()))]
    pub async fn execute_file(&self, input: &Path) -> FileResult {
        let mut result = FileResult::new(input);
        match self.apply(input, &mut result).await {
            Ok(()) => result.mark_completed(FileStatus::Success, None),
            Err(e) => {
                error!("Failed to apply {}: {}", input.display(), e);
                result.mark_completed(FileStatus::Failed, Some(e.to_string()));
            }
        }
        result
    }

    async fn apply(&self, input: &Path, result: &mut FileResult) -> Result<()> {
        self.check_outputs(input)?;
        self.prepare(input).await?;

        let content = tokio::fs::read_to_string(input)
            .await
            .map_err(|e| ExecutionError::file("read", input, e))?;
        let content = content.strip_prefix(BYTE_ORDER_MARK).unwrap_or(&content);

        let mut copyback_source = None;
        for environment in self.registry.iter() {
            let transformed = environment.transform(content);
            let output = self.naming.output_path(input, environment.name())?;
            self.sink.write(&output, &transformed).await?;

            if copyback_source.is_none() && self.is_default(environment) {
                copyback_source = Some(output.clone());
            }
            result.add_output(environment.name(), output, transformed.len());
        }

        if let Some(source) = copyback_source {
            let target = self.naming.copyback_path(input)?;
            self.sink.copy(&source, &target).await?;
            result.copyback = Some(target);
        }

        Ok(())
    }

    /// Fail before touching the disk when any output would land on the template
    fn check_outputs(&self, input: &Path) -> Result<()> {
        let mut targets = Vec::with_capacity(self.registry.len() + 1);
        for name in self.registry.environment_names() {
            targets.push(self.naming.output_path(input, name)?);
        }
        if self.registry.iter().any(|env| self.is_default(env)) {
            targets.push(self.naming.copyback_path(input)?);
        }

        if targets.iter().any(|target| same_path(target, input)) {
            return Err(ExecutionError::OutputOverwritesTemplate {
                transform: self.naming.transform().to_string(),
                path: input.to_path_buf(),
            });
        }
        Ok(())
    }

    /// Create the output directory and clear outputs left by earlier runs
    async fn prepare(&self, input: &Path) -> Result<()> {
        self.sink
            .prepare_directory(&self.naming.output_directory_for(input))
            .await?;
        for name in self.registry.environment_names() {
            let output = self.naming.output_path(input, name)?;
            self.sink.remove(&output).await?;
        }
        Ok(())
    }
}

/// Lexical comparison that ignores `.` components
fn same_path(a: &Path, b: &Path) -> bool {
    fn significant(path: &Path) -> impl Iterator<Item = Component<'_>> {
        path.components()
            .filter(|component| !matches!(component, Component::CurDir))
    }
    significant(a).eq(significant(b))
}
