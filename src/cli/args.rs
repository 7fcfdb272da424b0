// ABOUTME: Command line argument definitions and parsing using Clap
// ABOUTME: Defines the envgrid subcommands and the shared value grid options

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "envgrid")]
#[command(about = "Render per-environment configuration files from templates and a CSV value grid")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Path to configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Disable colored output")]
    pub no_color: bool,
}

/// Where the value grid lives and how to read it
#[derive(clap::Args, Debug, Clone, Default)]
pub struct GridArgs {
    #[arg(
        long = "base-directory",
        help = "Directory other paths are resolved against and templates are searched in"
    )]
    pub base_directory: Option<PathBuf>,

    #[arg(long = "config-source", help = "Value grid file, relative to the base directory")]
    pub config_source: Option<PathBuf>,

    #[arg(
        long = "csv-delimiter",
        value_parser = parse_char_option,
        help = "Delimiter character (a single character or an escape such as \\t)"
    )]
    pub csv_delimiter: Option<char>,

    #[arg(
        long = "csv-quote",
        value_parser = parse_char_option,
        help = "Quote character (a single character or an escape such as \\')"
    )]
    pub csv_quote: Option<char>,

    #[arg(long, help = "Reject malformed quoting in the value grid")]
    pub strict_quotes: bool,

    #[arg(long, help = "Skip name and key checks and keep names exactly as written")]
    pub lenient: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render every matching template for every environment
    Apply {
        #[command(flatten)]
        grid: GridArgs,

        #[arg(long = "file-mask", help = "File name pattern selecting templates")]
        file_mask: Option<String>,

        #[arg(long = "output-transform", help = "Output naming rule: pattern=>replacement with <env>")]
        output_transform: Option<String>,

        #[arg(long = "output-directory", help = "Output directory relative to each template")]
        output_directory: Option<PathBuf>,

        #[arg(
            long = "default-environment",
            help = "Environment copied back to the name without an environment"
        )]
        default_environment: Option<String>,

        #[arg(long, help = "Disable the default environment copy-back")]
        no_copyback: bool,

        #[arg(long, help = "Log what would be written without touching any file")]
        dry_run: bool,

        #[arg(long, help = "Write a JSON run report to this path")]
        report: Option<PathBuf>,
    },

    /// Check the value grid for errors
    Validate {
        #[command(flatten)]
        grid: GridArgs,
    },

    /// List the environments defined in the value grid
    List {
        #[command(flatten)]
        grid: GridArgs,
    },

    /// Render one template for one environment to stdout
    Render {
        #[arg(help = "Environment name")]
        environment: String,

        #[arg(help = "Path to the template file")]
        template: PathBuf,

        #[command(flatten)]
        grid: GridArgs,
    },

    /// Print an environment's keys and values as CSV
    Show {
        #[arg(help = "Environment name")]
        environment: String,

        #[command(flatten)]
        grid: GridArgs,
    },
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Commands {
    pub fn grid_args(&self) -> &GridArgs {
        match self {
            Commands::Apply { grid, .. }
            | Commands::Validate { grid }
            | Commands::List { grid }
            | Commands::Render { grid, .. }
            | Commands::Show { grid, .. } => grid,
        }
    }
}

/// Parse a single-character option.
///
/// Accepts one literal character, an empty string (NUL), or a two-character
/// backslash escape.
pub fn parse_char_option(value: &str) -> Result<char, String> {
    let mut chars = value.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (None, _, _) => Ok('\0'),
        (Some(ch), None, _) => Ok(ch),
        (Some('\\'), Some(escaped), None) => match escaped {
            't' => Ok('\t'),
            'r' => Ok('\r'),
            'n' => Ok('\n'),
            '0' => Ok('\0'),
            '\\' => Ok('\\'),
            '"' => Ok('"'),
            '\'' => Ok('\''),
            other => Err(format!("unknown escape '\\{}'", other)),
        },
        _ => Err(format!("'{}' is not a single character", value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_parse_char_option() {
        assert_eq!(parse_char_option(","), Ok(','));
        assert_eq!(parse_char_option("|"), Ok('|'));
        assert_eq!(parse_char_option("é"), Ok('é'));
        assert_eq!(parse_char_option(""), Ok('\0'));
        assert_eq!(parse_char_option("\\t"), Ok('\t'));
        assert_eq!(parse_char_option("\\'"), Ok('\''));
        assert_eq!(parse_char_option("\\\\"), Ok('\\'));
    }

    #[test]
    fn test_parse_char_option_invalid() {
        assert!(parse_char_option("ab").is_err());
        assert!(parse_char_option("\\q").is_err());
        assert!(parse_char_option(",,,").is_err());
    }

    #[test]
    fn test_command_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_apply_arguments() {
        let args = Args::try_parse_from([
            "envgrid",
            "apply",
            "--csv-delimiter",
            "\\t",
            "--default-environment",
            "uat",
            "--dry-run",
            "-v",
        ])
        .unwrap();

        assert!(args.verbose);
        match args.command {
            Commands::Apply {
                ref grid,
                ref default_environment,
                dry_run,
                ..
            } => {
                assert_eq!(grid.csv_delimiter, Some('\t'));
                assert_eq!(default_environment.as_deref(), Some("uat"));
                assert!(dry_run);
            }
            _ => panic!("expected apply"),
        }
    }

    #[test]
    fn test_render_arguments() {
        let args = Args::try_parse_from(["envgrid", "render", "prod", "web.template.config"]).unwrap();
        match &args.command {
            Commands::Render {
                environment,
                template,
                ..
            } => {
                assert_eq!(environment, "prod");
                assert_eq!(template, &PathBuf::from("web.template.config"));
            }
            _ => panic!("expected render"),
        }
        assert!(args.command.grid_args().config_source.is_none());
    }

    #[test]
    fn test_bad_quote_rejected() {
        assert!(Args::try_parse_from(["envgrid", "list", "--csv-quote", "xy"]).is_err());
    }
}
