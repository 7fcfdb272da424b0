// ABOUTME: Main library module for envgrid, per-environment configuration rendering
// ABOUTME: Exports the grid reader, templating, registry and apply engine

pub mod cli;
pub mod csv;
pub mod engine;
pub mod registry;
pub mod template;

// Re-export commonly used types
pub use cli::{App, Args, Config};
pub use csv::{CsvReader, Field, ReaderOptions, TabularReader};
pub use engine::{OutputNaming, RunResult, TemplateDiscovery, TemplateExecutor};
pub use registry::{Environment, EnvironmentRegistry, RegistryLoader};
pub use template::{transform_with, Token, Tokenizer};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
