// ABOUTME: Main application orchestration for the envgrid CLI
// ABOUTME: Coordinates between CLI arguments, configuration, and command execution

use anyhow::{anyhow, Result};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use super::commands::{self, ApplyOptions};
use super::{Args, Commands, Config};

pub struct App {
    config: Config,
}

impl App {
    /// Create a new application instance
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Initialize logging based on configuration.
    ///
    /// Logs go to stderr so rendered output on stdout stays clean.
    pub fn init_logging(&self, verbose: bool, no_color: bool) -> Result<()> {
        let log_level = if verbose {
            "debug"
        } else {
            self.config.logging.level.as_str()
        };

        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

        let builder = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_ansi(!no_color)
            .with_target(false)
            .with_writer(std::io::stderr);

        let installed = match self.config.logging.format.as_str() {
            "compact" => builder.compact().try_init(),
            "pretty" => builder.pretty().try_init(),
            _ => builder.try_init(),
        };
        installed.map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;

        debug!("Logging initialized with level: {}", log_level);
        Ok(())
    }

    /// Run the application with parsed arguments
    pub async fn run(&mut self, args: Args) -> Result<()> {
        self.init_logging(args.verbose, args.no_color)?;

        info!("Starting envgrid v{}", env!("CARGO_PKG_VERSION"));
        debug!("Configuration loaded from: {:?}", args.config);

        self.config.merge_grid_args(args.command.grid_args());

        match args.command {
            Commands::Apply {
                file_mask,
                output_transform,
                output_directory,
                default_environment,
                no_copyback,
                dry_run,
                report,
                ..
            } => {
                if let Some(mask) = file_mask {
                    self.config.files.file_mask = mask;
                }
                if let Some(transform) = output_transform {
                    self.config.files.output_transform = transform;
                }
                if let Some(directory) = output_directory {
                    self.config.files.output_directory = directory;
                }
                if default_environment.is_some() {
                    self.config.files.default_environment = default_environment;
                }
                if no_copyback {
                    self.config.files.default_environment = None;
                }

                commands::apply_templates(&self.config, ApplyOptions { dry_run, report }).await
            }

            Commands::Validate { .. } => commands::validate_grid(&self.config).await,

            Commands::List { .. } => commands::list_environments(&self.config).await,

            Commands::Render {
                environment,
                template,
                ..
            } => commands::render_template(&self.config, &environment, template).await,

            Commands::Show { environment, .. } => {
                commands::show_environment(&self.config, &environment).await
            }
        }
    }

    /// Create application from command line arguments
    pub fn from_args(args: &Args) -> Result<Self> {
        let config = Config::load(args.config.clone())?;
        Ok(Self::new(config))
    }
}
