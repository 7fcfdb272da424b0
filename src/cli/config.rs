// ABOUTME: Configuration management for the envgrid application
// ABOUTME: Loads a YAML config file, applies environment variables and command line overrides

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::args::{parse_char_option, GridArgs};
use crate::csv::ReaderOptions;
use crate::engine::{DEFAULT_ENVIRONMENT, DEFAULT_FILE_MASK, DEFAULT_OUTPUT_TRANSFORM};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub grid: GridConfig,

    #[serde(default)]
    pub files: FilesConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub source: PathBuf,
    pub delimiter: String,
    pub quote: String,
    pub strict_quotes: bool,
    pub lenient: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    pub base_directory: PathBuf,
    pub file_mask: String,
    pub output_transform: String,
    pub output_directory: PathBuf,
    pub default_environment: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from("ConfigValues.csv"),
            delimiter: ",".to_string(),
            quote: "\"".to_string(),
            strict_quotes: false,
            lenient: false,
        }
    }
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            base_directory: PathBuf::from("."),
            file_mask: DEFAULT_FILE_MASK.to_string(),
            output_transform: DEFAULT_OUTPUT_TRANSFORM.to_string(),
            output_directory: PathBuf::from("."),
            default_environment: Some(DEFAULT_ENVIRONMENT.to_string()),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file path or default locations
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => Some(p),
            None => Self::find_config_file(),
        };

        let mut config = match config_path {
            Some(path) if path.exists() => {
                let contents = std::fs::read_to_string(&path)?;
                serde_yaml::from_str(&contents)?
            }
            _ => Config::default(),
        };

        config.merge_env();
        Ok(config)
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let possible_paths = [
            PathBuf::from("envgrid.yaml"),
            PathBuf::from("envgrid.yml"),
            PathBuf::from(".envgrid.yaml"),
            PathBuf::from(".envgrid.yml"),
        ];

        if let Some(path) = possible_paths.into_iter().find(|p| p.exists()) {
            return Some(path);
        }

        dirs::home_dir()
            .map(|home| home.join(".envgrid").join("config.yaml"))
            .filter(|p| p.exists())
    }

    fn merge_env(&mut self) {
        self.merge_env_from(|name| std::env::var(name).ok());
    }

    /// Apply `ENVGRID_*` overrides read through `lookup`
    pub fn merge_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(source) = lookup("ENVGRID_CONFIG_SOURCE") {
            self.grid.source = PathBuf::from(source);
        }
        if let Some(environment) = lookup("ENVGRID_DEFAULT_ENVIRONMENT") {
            self.files.default_environment = Some(environment);
        }
        if let Some(level) = lookup("ENVGRID_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("ENVGRID_LOG_FORMAT") {
            self.logging.format = format;
        }
    }

    /// Command line grid options take precedence over everything else
    pub fn merge_grid_args(&mut self, args: &GridArgs) {
        if let Some(base) = &args.base_directory {
            self.files.base_directory = base.clone();
        }
        if let Some(source) = &args.config_source {
            self.grid.source = source.clone();
        }
        if let Some(delimiter) = args.csv_delimiter {
            self.grid.delimiter = delimiter.to_string();
        }
        if let Some(quote) = args.csv_quote {
            self.grid.quote = quote.to_string();
        }
        if args.strict_quotes {
            self.grid.strict_quotes = true;
        }
        if args.lenient {
            self.grid.lenient = true;
        }
    }

    /// The value grid path; a relative source is resolved against the base directory
    pub fn grid_path(&self) -> PathBuf {
        self.files.base_directory.join(&self.grid.source)
    }

    pub fn reader_options(&self) -> Result<ReaderOptions> {
        let delimiter = parse_char_option(&self.grid.delimiter)
            .map_err(|e| anyhow!("Invalid delimiter: {}", e))?;
        let quote =
            parse_char_option(&self.grid.quote).map_err(|e| anyhow!("Invalid quote: {}", e))?;
        Ok(ReaderOptions::new(delimiter, quote)?.with_strict_quotes(self.grid.strict_quotes))
    }

    /// Default environment for copy-back, `None` when unset or blank
    pub fn default_environment(&self) -> Option<String> {
        self.files
            .default_environment
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.grid.source, PathBuf::from("ConfigValues.csv"));
        assert_eq!(config.files.file_mask, "*.template.*");
        assert_eq!(config.files.output_transform, r"\.template\.=>.<env>.");
        assert_eq!(config.default_environment().as_deref(), Some("dev"));
        assert_eq!(config.grid_path(), PathBuf::from("./ConfigValues.csv"));

        let options = config.reader_options().unwrap();
        assert_eq!(options.delimiter(), ',');
        assert_eq!(options.quote(), '"');
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("envgrid.yaml");

        let config_content = r#"
grid:
  source: values.csv
  delimiter: "\\t"
  quote: "'"
files:
  base_directory: conf
  default_environment: prod
logging:
  level: debug
  format: compact
"#;
        fs::write(&config_path, config_content).unwrap();

        let config = Config::load(Some(config_path)).unwrap();
        assert_eq!(config.grid_path(), PathBuf::from("conf/values.csv"));
        assert_eq!(config.files.file_mask, "*.template.*");
        assert_eq!(config.logging.format, "compact");

        let options = config.reader_options().unwrap();
        assert_eq!(options.delimiter(), '\t');
        assert_eq!(options.quote(), '\'');
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = tempdir().unwrap();
        let config = Config::load(Some(temp_dir.path().join("absent.yaml"))).unwrap();
        assert_eq!(config.files.output_directory, PathBuf::from("."));
    }

    #[test]
    fn test_precedence() {
        let mut config = Config::default();
        let env: HashMap<&str, &str> = [
            ("ENVGRID_CONFIG_SOURCE", "from-env.csv"),
            ("ENVGRID_DEFAULT_ENVIRONMENT", "uat"),
            ("ENVGRID_LOG_LEVEL", "warn"),
        ]
        .into_iter()
        .collect();
        config.merge_env_from(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.grid.source, PathBuf::from("from-env.csv"));
        assert_eq!(config.default_environment().as_deref(), Some("uat"));
        assert_eq!(config.logging.level, "warn");

        config.merge_grid_args(&GridArgs {
            config_source: Some(PathBuf::from("from-cli.csv")),
            csv_quote: Some('#'),
            ..GridArgs::default()
        });
        assert_eq!(config.grid.source, PathBuf::from("from-cli.csv"));
        assert_eq!(config.reader_options().unwrap().quote(), '#');
    }

    #[test]
    fn test_blank_default_environment_disables_copyback() {
        let mut config = Config::default();
        config.files.default_environment = Some("  ".to_string());
        assert_eq!(config.default_environment(), None);
    }

    #[test]
    fn test_invalid_reader_options() {
        let mut config = Config::default();
        config.grid.quote = ",".to_string();
        assert!(config.reader_options().is_err());
        config.grid.quote = "ab".to_string();
        assert!(config.reader_options().is_err());
    }
}
